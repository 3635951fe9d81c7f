//! Conjunctive rule conditions.

use std::collections::{BTreeMap, BTreeSet};

use crate::example::{Example, ExampleIdx, NumericAttribute, SetAttribute, TrainingSet};

use super::selector::{LinearSelector, Selector, SetSelector};

/// Indices of the training examples a complex covers.
pub type Coverage = BTreeSet<ExampleIdx>;

/// A conjunction of at most one selector per attribute dimension.
///
/// The empty complex covers every example.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Complex {
    sets: BTreeMap<SetAttribute, SetSelector>,
    linear: BTreeMap<NumericAttribute, LinearSelector>,
}

impl Complex {
    pub fn new() -> Self {
        Self::default()
    }

    /// A complex holding a single selector.
    pub fn from_selector(selector: Selector) -> Self {
        Self::new().with(selector)
    }

    /// Set the selector for the selector's dimension, replacing any previous one.
    pub fn with(mut self, selector: Selector) -> Self {
        match selector {
            Selector::Set(attr, sel) => {
                self.sets.insert(attr, sel);
            }
            Selector::Linear(attr, sel) => {
                self.linear.insert(attr, sel);
            }
        }
        self
    }

    pub fn set_selector(&self, attr: SetAttribute) -> Option<&SetSelector> {
        self.sets.get(&attr)
    }

    pub fn linear_selector(&self, attr: NumericAttribute) -> Option<&LinearSelector> {
        self.linear.get(&attr)
    }

    /// Active selectors, set dimensions first.
    pub fn selectors(&self) -> impl Iterator<Item = Selector> + '_ {
        let sets = self
            .sets
            .iter()
            .map(|(attr, sel)| Selector::Set(*attr, sel.clone()));
        let linear = self
            .linear
            .iter()
            .map(|(attr, sel)| Selector::Linear(*attr, sel.clone()));
        sets.chain(linear)
    }

    /// Number of active selectors.
    pub fn len(&self) -> usize {
        self.sets.len() + self.linear.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn covers(&self, example: &Example) -> bool {
        self.sets
            .iter()
            .all(|(attr, sel)| sel.covers(example.set(*attr)))
            && self
                .linear
                .iter()
                .all(|(attr, sel)| sel.covers(example.numeric(*attr)))
    }

    /// Covered examples of the training set.
    pub fn coverage(&self, training: &TrainingSet) -> Coverage {
        training
            .indices()
            .filter(|&idx| self.covers(training.get(idx)))
            .collect()
    }

    /// Conjunction of two complexes.
    ///
    /// Selectors on dimensions only one side constrains are copied; selectors
    /// on shared dimensions are conjoined. Returns `None` as soon as one
    /// shared dimension becomes unsatisfiable.
    pub fn conjoin(&self, other: &Self) -> Option<Self> {
        let mut out = self.clone();
        for (attr, sel) in &other.sets {
            let merged = match out.sets.get(attr) {
                Some(existing) => existing.conjoin(sel)?,
                None => sel.clone(),
            };
            out.sets.insert(*attr, merged);
        }
        for (attr, sel) in &other.linear {
            let merged = match out.linear.get(attr) {
                Some(existing) => existing.conjoin(sel)?,
                None => sel.clone(),
            };
            out.linear.insert(*attr, merged);
        }
        Some(out)
    }
}

impl std::fmt::Display for Complex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_empty() {
            return f.write_str("⊤");
        }
        let parts: Vec<String> = self.selectors().map(|s| s.to_string()).collect();
        f.write_str(&parts.join(" ∧ "))
    }
}
