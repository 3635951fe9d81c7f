//! Sequential covering for one category.

use crate::category::Category;
use crate::config::InductionConfig;
use crate::error::{InductionError, InductionResult};
use crate::example::{ExampleIdx, TrainingSet};
use crate::rule::{Rule, rule_name};

use super::complex::{Complex, Coverage};
use super::seed::{negative_seed, positive_seed};
use super::similarity::SimilarityMetric;
use super::specialize::partial_star;
use super::star::Star;

/// Learns the rules of one category from an immutable training set.
///
/// Holds no state shared with other categories; one instance per task.
#[derive(Debug, Clone, Copy)]
pub struct CoveringTask<'a> {
    training: &'a TrainingSet,
    metric: SimilarityMetric<'a>,
    config: &'a InductionConfig,
}

impl<'a> CoveringTask<'a> {
    pub fn new(
        training: &'a TrainingSet,
        metric: SimilarityMetric<'a>,
        config: &'a InductionConfig,
    ) -> Self {
        Self {
            training,
            metric,
            config,
        }
    }

    /// Cover every positive example of `category`, one rule at a time.
    ///
    /// Each accepted complex covers at least its positive seed, so the
    /// uncovered set shrinks every round.
    pub fn run(&self, category: &Category) -> InductionResult<Vec<Rule>> {
        let mut uncovered: Coverage = self.training.indices().collect();
        let mut rules = Vec::new();

        while let Some(positive) =
            positive_seed(&self.metric, self.training, &uncovered, category)
        {
            let complex = self.find_complex(positive, category)?;
            uncovered.retain(|&idx| !complex.covers(self.training.get(idx)));

            let name = rule_name(&self.config.rule_prefix, category, rules.len() + 1);
            tracing::debug!(rule = %name, condition = %complex, "accepted complex");
            rules.push(Rule::from_complex(name, &complex, category)?);
        }

        if !rules.is_empty() {
            tracing::info!(category = %category, rules = rules.len(), "category covered");
        }
        Ok(rules)
    }

    /// Specialize a star around `positive` until it covers no negative example,
    /// then return its best complex.
    ///
    /// Without any negative example to exclude the empty complex is returned.
    pub fn find_complex(
        &self,
        positive: ExampleIdx,
        category: &Category,
    ) -> InductionResult<Complex> {
        let mut star = Star::new(self.config.beam_width);
        let positive_example = self.training.get(positive);
        let mut negative = negative_seed(&self.metric, self.training, &star, positive, category);

        while let Some(neg) = negative {
            let negative_example = self.training.get(neg);
            let partial = partial_star(
                positive_example,
                negative_example,
                self.config.epsilon,
                category,
            )?;
            star.refine(&partial, category, self.training);
            tracing::debug!(
                positive = %positive_example.id,
                negative = %negative_example.id,
                members = star.len(),
                "star refined"
            );
            if star.is_empty() {
                return Err(InductionError::HypothesisSpaceExhausted {
                    positive: positive_example.id.clone(),
                    negative: negative_example.id.clone(),
                    category: category.to_string(),
                });
            }
            negative = negative_seed(&self.metric, self.training, &star, positive, category);
        }

        Ok(star.best().cloned().unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::category::Relation;
    use crate::config::DomainBounds;
    use crate::entity::{EntityCatalog, EntityKind};
    use crate::example::{Example, NumericAttribute, SetAttribute};

    fn catalog() -> EntityCatalog {
        EntityCatalog::new()
            .with(EntityKind::Symptom, "fever")
            .with(EntityKind::Symptom, "cough")
            .with(EntityKind::Symptom, "rash")
            .with(EntityKind::Symptom, "s1")
            .with(EntityKind::Symptom, "s2")
            .with(EntityKind::Disease, "flu")
    }

    fn flu(ex: Example) -> Example {
        ex.with_outcome(Relation::HasDisease, "flu")
    }

    fn category() -> Category {
        Category::new("flu", Relation::HasDisease)
    }

    #[test]
    fn covers_all_positives_and_excludes_negatives() {
        let catalog = catalog();
        let config = InductionConfig::default();
        let training = TrainingSet::new(vec![
            flu(Example::new("p1").with_set(SetAttribute::Symptoms, &["fever", "cough"])),
            flu(Example::new("p2")
                .with_set(SetAttribute::Symptoms, &["fever"])
                .with_numeric(NumericAttribute::Age, 30)),
            flu(Example::new("p3")
                .with_set(SetAttribute::Symptoms, &["rash"])
                .with_numeric(NumericAttribute::Age, 20)),
            Example::new("n1").with_set(SetAttribute::Symptoms, &["cough"]),
            Example::new("n2")
                .with_set(SetAttribute::Symptoms, &["rash"])
                .with_numeric(NumericAttribute::Age, 70),
        ])
        .unwrap();
        let task = CoveringTask::new(
            &training,
            SimilarityMetric::new(&catalog, DomainBounds::default()),
            &config,
        );
        let rules = task.run(&category()).unwrap();
        assert!(!rules.is_empty());

        for ex in training.examples() {
            let covered = rules.iter().any(|r| r.condition().covers(ex));
            assert_eq!(covered, category().contains(ex), "example {}", ex.id);
        }
        let names: Vec<&str> = rules.iter().map(Rule::name).collect();
        assert!(names.iter().all(|n| n.starts_with("generated_hasDisease_flu_")));
    }

    #[test]
    fn no_negatives_yields_unconditional_rule() {
        let catalog = catalog();
        let config = InductionConfig::default();
        let training = TrainingSet::new(vec![
            flu(Example::new("a").with_set(SetAttribute::Symptoms, &["fever"])),
            flu(Example::new("b")),
        ])
        .unwrap();
        let task = CoveringTask::new(
            &training,
            SimilarityMetric::new(&catalog, DomainBounds::default()),
            &config,
        );
        let rules = task.run(&category()).unwrap();
        assert_eq!(rules.len(), 1);
        assert!(rules[0].condition().is_empty());
        assert_eq!(rules[0].name(), "generated_hasDisease_flu_1");
    }

    #[test]
    fn category_without_positives_yields_nothing() {
        let catalog = catalog();
        let config = InductionConfig::default();
        let training = TrainingSet::new(vec![Example::new("a"), Example::new("b")]).unwrap();
        let task = CoveringTask::new(
            &training,
            SimilarityMetric::new(&catalog, DomainBounds::default()),
            &config,
        );
        assert!(task.run(&category()).unwrap().is_empty());
    }

    #[test]
    fn indistinguishable_pair_aborts_category() {
        let catalog = catalog();
        let config = InductionConfig::default();
        let training = TrainingSet::new(vec![
            flu(Example::new("pos").with_set(SetAttribute::Symptoms, &["fever"])),
            Example::new("neg").with_set(SetAttribute::Symptoms, &["fever"]),
        ])
        .unwrap();
        let task = CoveringTask::new(
            &training,
            SimilarityMetric::new(&catalog, DomainBounds::default()),
            &config,
        );
        let err = task.run(&category()).unwrap_err();
        assert!(matches!(err, InductionError::NoDiscriminatingCondition { .. }));
    }

    #[test]
    fn unexpressible_conjunction_is_reported() {
        let catalog = catalog();
        let config = InductionConfig::default();
        // Only "s1 and s2 together" separates the positive from both negatives.
        let training = TrainingSet::new(vec![
            flu(Example::new("pos").with_set(SetAttribute::Symptoms, &["s1", "s2"])),
            Example::new("neg1").with_set(SetAttribute::Symptoms, &["s1"]),
            Example::new("neg2").with_set(SetAttribute::Symptoms, &["s2"]),
        ])
        .unwrap();
        let task = CoveringTask::new(
            &training,
            SimilarityMetric::new(&catalog, DomainBounds::default()),
            &config,
        );
        let err = task.run(&category()).unwrap_err();
        assert!(matches!(err, InductionError::HypothesisSpaceExhausted { .. }));
    }

    #[test]
    fn scenario_age_threshold() {
        let catalog = catalog();
        let config = InductionConfig::default();
        let training = TrainingSet::new(vec![
            flu(Example::new("young").with_numeric(NumericAttribute::Age, 40)),
            Example::new("old").with_numeric(NumericAttribute::Age, 60),
        ])
        .unwrap();
        let task = CoveringTask::new(
            &training,
            SimilarityMetric::new(&catalog, DomainBounds::default()),
            &config,
        );
        let complex = task.find_complex(0, &category()).unwrap();
        assert_eq!(complex.to_string(), "age <= 50");
    }
}
