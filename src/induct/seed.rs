//! Positive and negative seed selection.
//!
//! Distances are collected into a per-call evaluation table rather than
//! stored on the examples. Ties on equal scores go to the lowest example id.

use std::cmp::Ordering;

use crate::category::Category;
use crate::example::{Example, ExampleIdx, TrainingSet};

use super::complex::Coverage;
use super::similarity::SimilarityMetric;
use super::star::Star;

/// A candidate example and its distance to the reference group.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Evaluation {
    pub idx: ExampleIdx,
    pub score: f64,
}

/// Most dissimilar uncovered positive example.
///
/// Every uncovered example of the category is scored by its distance to the
/// covered part of the training set (training minus uncovered). Returns
/// `None` when no uncovered example belongs to the category.
pub fn positive_seed(
    metric: &SimilarityMetric<'_>,
    training: &TrainingSet,
    uncovered: &Coverage,
    category: &Category,
) -> Option<ExampleIdx> {
    let covered: Vec<&Example> = training
        .indices()
        .filter(|idx| !uncovered.contains(idx))
        .map(|idx| training.get(idx))
        .collect();

    let evaluations = uncovered
        .iter()
        .copied()
        .filter(|&idx| category.contains(training.get(idx)))
        .map(|idx| Evaluation {
            idx,
            score: metric.distance(training.get(idx), covered.iter().copied()),
        });

    let seed = pick(evaluations, training, Ordering::Greater);
    tracing::debug!(category = %category, seed = ?seed.map(|e| &training.get(e.idx).id), "positive seed");
    seed.map(|e| e.idx)
}

/// Nearest miss: the covered negative example closest to the positive seed.
///
/// Candidates are all training examples the star covers that do not belong
/// to the category. Returns `None` once the star excludes every negative.
pub fn negative_seed(
    metric: &SimilarityMetric<'_>,
    training: &TrainingSet,
    star: &Star,
    positive: ExampleIdx,
    category: &Category,
) -> Option<ExampleIdx> {
    let positive_example = training.get(positive);
    let evaluations = training
        .indices()
        .filter(|&idx| {
            let ex = training.get(idx);
            star.covers(ex) && !category.contains(ex)
        })
        .map(|idx| Evaluation {
            idx,
            score: metric.distance(training.get(idx), [positive_example]),
        });

    let seed = pick(evaluations, training, Ordering::Less);
    tracing::debug!(category = %category, seed = ?seed.map(|e| &training.get(e.idx).id), "negative seed");
    seed.map(|e| e.idx)
}

/// The evaluation whose score compares as `wanted` against all others,
/// ties broken by the lowest example id.
fn pick(
    evaluations: impl Iterator<Item = Evaluation>,
    training: &TrainingSet,
    wanted: Ordering,
) -> Option<Evaluation> {
    evaluations.reduce(|best, candidate| {
        match candidate.score.total_cmp(&best.score) {
            ord if ord == wanted => candidate,
            Ordering::Equal if training.get(candidate.idx).id < training.get(best.idx).id => {
                candidate
            }
            _ => best,
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::category::Relation;
    use crate::config::DomainBounds;
    use crate::entity::{EntityCatalog, EntityKind};
    use crate::example::{NumericAttribute, SetAttribute};

    fn catalog() -> EntityCatalog {
        EntityCatalog::new()
            .with(EntityKind::Symptom, "fever")
            .with(EntityKind::Symptom, "cough")
            .with(EntityKind::Symptom, "rash")
            .with(EntityKind::Disease, "flu")
    }

    fn flu(ex: Example) -> Example {
        ex.with_outcome(Relation::HasDisease, "flu")
    }

    #[test]
    fn positive_seed_is_most_distant_from_covered() {
        let catalog = catalog();
        let metric = SimilarityMetric::new(&catalog, DomainBounds::default());
        let training = TrainingSet::new(vec![
            flu(Example::new("covered").with_set(SetAttribute::Symptoms, &["fever"])),
            flu(Example::new("near").with_set(SetAttribute::Symptoms, &["fever"])),
            flu(Example::new("far").with_set(SetAttribute::Symptoms, &["cough", "rash"])),
            Example::new("other").with_set(SetAttribute::Symptoms, &["cough", "rash", "fever"]),
        ])
        .unwrap();
        let uncovered = Coverage::from([1, 2, 3]);
        let category = Category::new("flu", Relation::HasDisease);
        // "other" is farther still but not in the category
        assert_eq!(positive_seed(&metric, &training, &uncovered, &category), Some(2));
    }

    #[test]
    fn positive_seed_none_without_uncovered_positive() {
        let catalog = catalog();
        let metric = SimilarityMetric::new(&catalog, DomainBounds::default());
        let training = TrainingSet::new(vec![flu(Example::new("a")), Example::new("b")]).unwrap();
        let category = Category::new("flu", Relation::HasDisease);
        assert_eq!(positive_seed(&metric, &training, &Coverage::from([1]), &category), None);
    }

    #[test]
    fn positive_seed_ties_go_to_lowest_id() {
        let catalog = catalog();
        let metric = SimilarityMetric::new(&catalog, DomainBounds::default());
        let training = TrainingSet::new(vec![flu(Example::new("b")), flu(Example::new("a"))]).unwrap();
        let category = Category::new("flu", Relation::HasDisease);
        // nothing covered yet: every distance is 0
        let seed = positive_seed(&metric, &training, &Coverage::from([0, 1]), &category);
        assert_eq!(seed, Some(1));
    }

    #[test]
    fn negative_seed_is_nearest_miss() {
        let catalog = catalog();
        let metric = SimilarityMetric::new(&catalog, DomainBounds::default());
        let training = TrainingSet::new(vec![
            flu(Example::new("pos")
                .with_set(SetAttribute::Symptoms, &["fever"])
                .with_numeric(NumericAttribute::Age, 40)),
            Example::new("far")
                .with_set(SetAttribute::Symptoms, &["cough", "rash"])
                .with_numeric(NumericAttribute::Age, 90),
            Example::new("close")
                .with_set(SetAttribute::Symptoms, &["fever"])
                .with_numeric(NumericAttribute::Age, 45),
        ])
        .unwrap();
        let category = Category::new("flu", Relation::HasDisease);
        let star = Star::new(5);
        assert_eq!(negative_seed(&metric, &training, &star, 0, &category), Some(2));
    }

    #[test]
    fn negative_seed_none_when_star_excludes_negatives() {
        use crate::induct::complex::Complex;
        use crate::induct::selector::{Selector, SetSelector};

        let catalog = catalog();
        let metric = SimilarityMetric::new(&catalog, DomainBounds::default());
        let training = TrainingSet::new(vec![
            flu(Example::new("pos").with_set(SetAttribute::Symptoms, &["fever"])),
            Example::new("neg").with_set(SetAttribute::Symptoms, &["cough"]),
        ])
        .unwrap();
        let category = Category::new("flu", Relation::HasDisease);
        let mut star = Star::new(5);
        star.conjoin(&[Complex::from_selector(Selector::Set(
            SetAttribute::Symptoms,
            SetSelector::single("fever".into()),
        ))]);
        assert_eq!(negative_seed(&metric, &training, &star, 0, &category), None);
    }
}
