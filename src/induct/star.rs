//! The star: a bounded beam of competing complexes.
//!
//! One refinement step conjoins the star with a partial star, drops members
//! whose coverage is contained in another member's, ranks the survivors and
//! keeps the best `beam_width`.

use std::cmp::Ordering;
use std::collections::BTreeSet;

use crate::category::Category;
use crate::example::{Example, TrainingSet};

use super::complex::{Complex, Coverage};

/// Ordered, deduplicated, size-bounded set of complexes.
#[derive(Debug, Clone)]
pub struct Star {
    complexes: Vec<Complex>,
    beam_width: usize,
}

/// Coverage counts used to rank a complex for one category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quality {
    pub positives: usize,
    pub negatives: usize,
}

impl Quality {
    pub fn measure(complex: &Complex, category: &Category, training: &TrainingSet) -> Self {
        let mut quality = Self {
            positives: 0,
            negatives: 0,
        };
        for ex in training.examples() {
            if complex.covers(ex) {
                if category.contains(ex) {
                    quality.positives += 1;
                } else {
                    quality.negatives += 1;
                }
            }
        }
        quality
    }

    /// Positive minus negative coverage.
    pub fn score(&self) -> i64 {
        self.positives as i64 - self.negatives as i64
    }
}

impl Star {
    pub fn new(beam_width: usize) -> Self {
        Self {
            complexes: Vec::new(),
            beam_width,
        }
    }

    pub fn len(&self) -> usize {
        self.complexes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.complexes.is_empty()
    }

    pub fn members(&self) -> &[Complex] {
        &self.complexes
    }

    /// The top-ranked complex.
    pub fn best(&self) -> Option<&Complex> {
        self.complexes.first()
    }

    /// Whether any member covers the example.
    ///
    /// A star without members places no constraint yet and covers everything.
    pub fn covers(&self, example: &Example) -> bool {
        self.complexes.is_empty() || self.complexes.iter().any(|c| c.covers(example))
    }

    /// Replace the star with its conjunction with `partial`.
    ///
    /// An empty star simply becomes `partial`. Otherwise every member is
    /// conjoined with every partial complex and only the satisfiable results
    /// are kept. Duplicates are removed either way.
    pub fn conjoin(&mut self, partial: &[Complex]) {
        let next: BTreeSet<Complex> = if self.complexes.is_empty() {
            partial.iter().cloned().collect()
        } else {
            self.complexes
                .iter()
                .flat_map(|c| partial.iter().filter_map(move |p| c.conjoin(p)))
                .collect()
        };
        self.complexes = next.into_iter().collect();
    }

    /// Drop every member whose coverage is a subset of another member's.
    ///
    /// Of several members with equal coverage only the one with the fewest
    /// selectors (then the earliest) survives.
    pub fn remove_dominated(&mut self, training: &TrainingSet) {
        let coverages: Vec<Coverage> = self.complexes.iter().map(|c| c.coverage(training)).collect();
        let key = |i: usize| (self.complexes[i].len(), i);

        let keep: Vec<bool> = (0..self.complexes.len())
            .map(|i| {
                !(0..self.complexes.len()).any(|j| {
                    if i == j || !coverages[i].is_subset(&coverages[j]) {
                        return false;
                    }
                    coverages[i].len() < coverages[j].len() || key(j) < key(i)
                })
            })
            .collect();

        let mut flags = keep.into_iter();
        self.complexes.retain(|_| flags.next().unwrap_or(false));
    }

    /// Sort members best first.
    ///
    /// Higher `positives − negatives` wins; ties go to fewer negatives, then
    /// fewer selectors, then wider coverage, then canonical order.
    pub fn rank(&mut self, category: &Category, training: &TrainingSet) {
        let mut scored: Vec<(Quality, Complex)> = self
            .complexes
            .drain(..)
            .map(|c| (Quality::measure(&c, category, training), c))
            .collect();
        scored.sort_by(|(qa, ca), (qb, cb)| compare(qa, ca, qb, cb));
        self.complexes = scored.into_iter().map(|(_, c)| c).collect();
    }

    /// Keep only the first `beam_width` members.
    pub fn truncate(&mut self) {
        self.complexes.truncate(self.beam_width);
    }

    /// One full refinement step with a new partial star.
    pub fn refine(&mut self, partial: &[Complex], category: &Category, training: &TrainingSet) {
        self.conjoin(partial);
        self.remove_dominated(training);
        self.rank(category, training);
        self.truncate();
    }
}

fn compare(qa: &Quality, ca: &Complex, qb: &Quality, cb: &Complex) -> Ordering {
    qb.score()
        .cmp(&qa.score())
        .then(qa.negatives.cmp(&qb.negatives))
        .then(ca.len().cmp(&cb.len()))
        .then((qb.positives + qb.negatives).cmp(&(qa.positives + qa.negatives)))
        .then_with(|| ca.cmp(cb))
}
