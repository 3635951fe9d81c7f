//! Partial stars: single-selector complexes that separate a positive seed
//! from a negative seed.

use crate::category::Category;
use crate::error::{InductionError, InductionResult};
use crate::example::{Example, NumericAttribute, SetAttribute};

use super::complex::Complex;
use super::selector::{LinearSelector, Selector, SetSelector};

/// Every single-selector complex true of `positive` and false of `negative`.
///
/// Set dimensions yield one complex per entity the positive example has and
/// the negative example lacks. Numeric dimensions yield at most one
/// threshold complex each (see [`threshold_selector`]).
///
/// Fails with [`InductionError::NoDiscriminatingCondition`] when the two
/// examples cannot be told apart on any dimension.
pub fn partial_star(
    positive: &Example,
    negative: &Example,
    epsilon: f64,
    category: &Category,
) -> InductionResult<Vec<Complex>> {
    let mut complexes = Vec::new();

    for attr in SetAttribute::ALL {
        let negatives = negative.set(attr);
        complexes.extend(
            positive
                .set(attr)
                .iter()
                .filter(|id| !negatives.contains(*id))
                .map(|id| {
                    Complex::from_selector(Selector::Set(attr, SetSelector::single(id.clone())))
                }),
        );
    }

    for attr in NumericAttribute::ALL {
        if let Some(sel) = threshold_selector(positive.numeric(attr), negative.numeric(attr), epsilon)
        {
            complexes.push(Complex::from_selector(Selector::Linear(attr, sel)));
        }
    }

    if complexes.is_empty() {
        tracing::debug!(positive = %positive.id, negative = %negative.id, "partial star is empty");
        return Err(InductionError::NoDiscriminatingCondition {
            positive: positive.id.clone(),
            negative: negative.id.clone(),
            category: category.to_string(),
        });
    }
    Ok(complexes)
}

/// Threshold separating a positive value from a negative one.
///
/// The split point is `pos + (neg − pos) × epsilon`, rounded half away from
/// zero. Below a larger positive value the selector is `≥ mid`, or `> mid`
/// when the split lands exactly on the negative value; above a smaller
/// positive value it is `≤ mid`, or `< mid` in the same case. `None` when
/// either value is unknown or both are equal.
pub fn threshold_selector(
    positive: Option<u32>,
    negative: Option<u32>,
    epsilon: f64,
) -> Option<LinearSelector> {
    let (pos, neg) = (i64::from(positive?), i64::from(negative?));
    if pos == neg {
        return None;
    }
    let mid = (pos as f64 + (neg - pos) as f64 * epsilon).round() as i64;
    Some(match (neg < pos, mid == neg) {
        (true, true) => LinearSelector::greater_than(mid),
        (true, false) => LinearSelector::at_least(mid),
        (false, true) => LinearSelector::less_than(mid),
        (false, false) => LinearSelector::at_most(mid),
    })
}
