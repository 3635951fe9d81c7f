//! Normalized dissimilarity between one example and a reference group.
//!
//! Scores are returned to the caller instead of being written back onto the
//! examples, so concurrent category tasks never share an evaluation field.

use crate::config::DomainBounds;
use crate::entity::EntityCatalog;
use crate::example::{Example, NumericAttribute, SetAttribute};

/// Dissimilarity metric over the six attribute dimensions.
#[derive(Debug, Clone, Copy)]
pub struct SimilarityMetric<'a> {
    catalog: &'a EntityCatalog,
    bounds: DomainBounds,
}

impl<'a> SimilarityMetric<'a> {
    pub fn new(catalog: &'a EntityCatalog, bounds: DomainBounds) -> Self {
        Self { catalog, bounds }
    }

    /// Distance of `example` to `group`; `0.0` for an empty group.
    ///
    /// Each set dimension accumulates the symmetric-difference size against
    /// every group member and is divided by `|group| × |entities of that kind|`.
    /// Each numeric dimension accumulates absolute differences where both
    /// values are known and is divided by `|group| × (max − min)`. The result
    /// is the unweighted sum of the six components.
    pub fn distance<'g, I>(&self, example: &Example, group: I) -> f64
    where
        I: IntoIterator<Item = &'g Example>,
    {
        let mut set_diff = [0usize; 3];
        let mut num_diff = [0u64; 3];
        let mut size = 0usize;

        for other in group {
            size += 1;
            for (slot, attr) in SetAttribute::ALL.into_iter().enumerate() {
                set_diff[slot] += example
                    .set(attr)
                    .symmetric_difference(other.set(attr))
                    .count();
            }
            for (slot, attr) in NumericAttribute::ALL.into_iter().enumerate() {
                if let (Some(a), Some(b)) = (example.numeric(attr), other.numeric(attr)) {
                    num_diff[slot] += u64::from(a.abs_diff(b));
                }
            }
        }

        if size == 0 {
            return 0.0;
        }

        let size = size as f64;
        let mut score = 0.0;
        for (slot, attr) in SetAttribute::ALL.into_iter().enumerate() {
            let known = self.catalog.count(attr.entity_kind());
            if known > 0 {
                score += set_diff[slot] as f64 / (size * known as f64);
            }
        }
        for (slot, attr) in NumericAttribute::ALL.into_iter().enumerate() {
            let span = self.bounds.range(attr).span();
            if span > 0 {
                score += num_diff[slot] as f64 / (size * f64::from(span));
            }
        }
        score
    }
}
