//! Atomic conditions on a single attribute dimension.
//!
//! A [`Selector`] is either a set-membership test over an entity-set
//! attribute or a threshold test over a numeric attribute. Both kinds are
//! immutable; conjunction produces a new selector or `None` when the two
//! conditions cannot hold together.

use std::collections::BTreeSet;

use crate::entity::EntityId;
use crate::example::{Example, NumericAttribute, SetAttribute};

// ---------------------------------------------------------------------------
// Set selector
// ---------------------------------------------------------------------------

/// Satisfied when the example's set contains at least one of the entities.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SetSelector {
    entities: BTreeSet<EntityId>,
}

impl SetSelector {
    pub fn single(id: EntityId) -> Self {
        Self {
            entities: BTreeSet::from([id]),
        }
    }

    /// Returns `None` for an empty entity set, which no example could satisfy.
    pub fn new(entities: impl IntoIterator<Item = EntityId>) -> Option<Self> {
        let entities: BTreeSet<EntityId> = entities.into_iter().collect();
        (!entities.is_empty()).then_some(Self { entities })
    }

    pub fn entities(&self) -> &BTreeSet<EntityId> {
        &self.entities
    }

    pub fn covers(&self, values: &BTreeSet<EntityId>) -> bool {
        self.entities.iter().any(|e| values.contains(e))
    }

    /// Keep only the entities both selectors accept; `None` if none remain.
    pub fn conjoin(&self, other: &Self) -> Option<Self> {
        Self::new(self.entities.intersection(&other.entities).cloned())
    }
}

// ---------------------------------------------------------------------------
// Linear selector
// ---------------------------------------------------------------------------

/// The four threshold comparisons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Comparison {
    GreaterThan,
    AtLeast,
    LessThan,
    AtMost,
}

impl Comparison {
    pub fn holds(self, value: i64, threshold: i64) -> bool {
        match self {
            Comparison::GreaterThan => value > threshold,
            Comparison::AtLeast => value >= threshold,
            Comparison::LessThan => value < threshold,
            Comparison::AtMost => value <= threshold,
        }
    }

    /// SWRL built-in implementing the comparison.
    pub fn builtin(self) -> &'static str {
        match self {
            Comparison::GreaterThan => "greaterThan",
            Comparison::AtLeast => "greaterThanOrEqual",
            Comparison::LessThan => "lessThan",
            Comparison::AtMost => "lessThanOrEqual",
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Comparison::GreaterThan => ">",
            Comparison::AtLeast => ">=",
            Comparison::LessThan => "<",
            Comparison::AtMost => "<=",
        }
    }
}

/// One end of a numeric interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
struct Bound {
    value: i64,
    inclusive: bool,
}

/// A threshold test on a numeric attribute.
///
/// Built from one of the four comparisons. Conjoining a lower and an upper
/// threshold on the same attribute keeps both ends, so the selector is an
/// interval with at least one bound. Unknown values never satisfy it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LinearSelector {
    lower: Option<Bound>,
    upper: Option<Bound>,
}

impl LinearSelector {
    pub fn new(comparison: Comparison, threshold: i64) -> Self {
        match comparison {
            Comparison::GreaterThan => Self::lower(threshold, false),
            Comparison::AtLeast => Self::lower(threshold, true),
            Comparison::LessThan => Self::upper(threshold, false),
            Comparison::AtMost => Self::upper(threshold, true),
        }
    }

    pub fn greater_than(threshold: i64) -> Self {
        Self::new(Comparison::GreaterThan, threshold)
    }

    pub fn at_least(threshold: i64) -> Self {
        Self::new(Comparison::AtLeast, threshold)
    }

    pub fn less_than(threshold: i64) -> Self {
        Self::new(Comparison::LessThan, threshold)
    }

    pub fn at_most(threshold: i64) -> Self {
        Self::new(Comparison::AtMost, threshold)
    }

    fn lower(value: i64, inclusive: bool) -> Self {
        Self {
            lower: Some(Bound { value, inclusive }),
            upper: None,
        }
    }

    fn upper(value: i64, inclusive: bool) -> Self {
        Self {
            lower: None,
            upper: Some(Bound { value, inclusive }),
        }
    }

    /// The active comparisons, lower bound first.
    pub fn conditions(&self) -> Vec<(Comparison, i64)> {
        let mut out = Vec::with_capacity(2);
        if let Some(b) = self.lower {
            let cmp = if b.inclusive {
                Comparison::AtLeast
            } else {
                Comparison::GreaterThan
            };
            out.push((cmp, b.value));
        }
        if let Some(b) = self.upper {
            let cmp = if b.inclusive {
                Comparison::AtMost
            } else {
                Comparison::LessThan
            };
            out.push((cmp, b.value));
        }
        out
    }

    pub fn covers(&self, value: Option<u32>) -> bool {
        let Some(value) = value else {
            return false;
        };
        let value = i64::from(value);
        let above = self.lower.is_none_or(|b| {
            if b.inclusive { value >= b.value } else { value > b.value }
        });
        let below = self.upper.is_none_or(|b| {
            if b.inclusive { value <= b.value } else { value < b.value }
        });
        above && below
    }

    /// Intersect the two intervals; `None` if no integer value satisfies both.
    pub fn conjoin(&self, other: &Self) -> Option<Self> {
        let lower = tighter(self.lower, other.lower, |a, b| {
            a.value > b.value || (a.value == b.value && !a.inclusive)
        });
        let upper = tighter(self.upper, other.upper, |a, b| {
            a.value < b.value || (a.value == b.value && !a.inclusive)
        });
        if let (Some(lo), Some(hi)) = (lower, upper) {
            let lo = if lo.inclusive { lo.value } else { lo.value + 1 };
            let hi = if hi.inclusive { hi.value } else { hi.value - 1 };
            if lo > hi {
                return None;
            }
        }
        Some(Self { lower, upper })
    }
}

fn tighter(
    a: Option<Bound>,
    b: Option<Bound>,
    prefer_a: impl Fn(Bound, Bound) -> bool,
) -> Option<Bound> {
    match (a, b) {
        (Some(a), Some(b)) => Some(if prefer_a(a, b) { a } else { b }),
        (a, None) => a,
        (None, b) => b,
    }
}

// ---------------------------------------------------------------------------
// Selector
// ---------------------------------------------------------------------------

/// A selector bound to its attribute dimension.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Selector {
    Set(SetAttribute, SetSelector),
    Linear(NumericAttribute, LinearSelector),
}

impl Selector {
    pub fn covers(&self, example: &Example) -> bool {
        match self {
            Selector::Set(attr, sel) => sel.covers(example.set(*attr)),
            Selector::Linear(attr, sel) => sel.covers(example.numeric(*attr)),
        }
    }
}

impl std::fmt::Display for Selector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Selector::Set(attr, sel) => {
                let ids: Vec<&str> = sel.entities().iter().map(EntityId::as_str).collect();
                write!(f, "{attr} ∋ {{{}}}", ids.join(", "))
            }
            Selector::Linear(attr, sel) => {
                let parts: Vec<String> = sel
                    .conditions()
                    .into_iter()
                    .map(|(cmp, v)| format!("{attr} {} {v}", cmp.symbol()))
                    .collect();
                f.write_str(&parts.join(" ∧ "))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(list: &[&str]) -> BTreeSet<EntityId> {
        list.iter().map(|s| EntityId::new(s)).collect()
    }

    #[test]
    fn set_selector_needs_intersection() {
        let sel = SetSelector::new(ids(&["fever", "rash"])).unwrap();
        assert!(sel.covers(&ids(&["rash"])));
        assert!(!sel.covers(&ids(&["cough"])));
        assert!(!sel.covers(&BTreeSet::new()));
        assert!(SetSelector::new(Vec::new()).is_none());
    }

    #[test]
    fn conflicting_set_selectors_do_not_conjoin() {
        let a = SetSelector::single(EntityId::new("fever"));
        let b = SetSelector::single(EntityId::new("cough"));
        assert!(a.conjoin(&b).is_none());
        let c = SetSelector::new(ids(&["fever", "cough"])).unwrap();
        assert_eq!(a.conjoin(&c), Some(a.clone()));
    }

    #[test]
    fn comparisons() {
        assert!(LinearSelector::greater_than(50).covers(Some(51)));
        assert!(!LinearSelector::greater_than(50).covers(Some(50)));
        assert!(LinearSelector::at_least(50).covers(Some(50)));
        assert!(LinearSelector::less_than(50).covers(Some(49)));
        assert!(!LinearSelector::less_than(50).covers(Some(50)));
        assert!(LinearSelector::at_most(50).covers(Some(50)));
        assert!(!LinearSelector::at_most(50).covers(None));
    }

    #[test]
    fn same_direction_keeps_tighter_bound() {
        let a = LinearSelector::at_least(30);
        let b = LinearSelector::greater_than(40);
        assert_eq!(a.conjoin(&b), Some(b.clone()));
        let c = LinearSelector::at_least(40);
        assert_eq!(c.conjoin(&b), Some(b));
    }

    #[test]
    fn opposite_directions_form_interval() {
        let range = LinearSelector::at_least(30)
            .conjoin(&LinearSelector::at_most(50))
            .unwrap();
        assert_eq!(
            range.conditions(),
            vec![(Comparison::AtLeast, 30), (Comparison::AtMost, 50)]
        );
        assert!(range.covers(Some(40)));
        assert!(!range.covers(Some(51)));
    }

    #[test]
    fn empty_interval_does_not_conjoin() {
        assert!(LinearSelector::at_least(60)
            .conjoin(&LinearSelector::at_most(50))
            .is_none());
        // no integer strictly between 50 and 51
        assert!(LinearSelector::greater_than(50)
            .conjoin(&LinearSelector::less_than(51))
            .is_none());
        assert!(LinearSelector::at_least(50)
            .conjoin(&LinearSelector::at_most(50))
            .is_some());
    }

    #[test]
    fn display_is_readable() {
        let s = Selector::Linear(NumericAttribute::Age, LinearSelector::at_most(45));
        assert_eq!(s.to_string(), "age <= 45");
        let s = Selector::Set(SetAttribute::Symptoms, SetSelector::single("fever".into()));
        assert_eq!(s.to_string(), "symptoms ∋ {fever}");
    }
}
