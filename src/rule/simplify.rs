//! Post-hoc rule simplification.

use std::collections::BTreeMap;
use std::collections::BTreeSet;

use super::{Atom, Rule};

/// Merge rules whose declarations and bodies are set-equal.
///
/// The first rule of each group keeps its name and absorbs the heads of the
/// later ones, which are dropped. Order of first occurrence is preserved, so
/// simplifying an already simplified collection returns it unchanged.
pub fn simplify_rules(rules: Vec<Rule>) -> Vec<Rule> {
    let mut merged: Vec<Rule> = Vec::with_capacity(rules.len());
    let mut by_body: BTreeMap<(BTreeSet<Atom>, BTreeSet<Atom>), usize> = BTreeMap::new();

    for rule in rules {
        let key = (rule.declarations().clone(), rule.body().clone());
        match by_body.get(&key) {
            Some(&idx) => {
                tracing::debug!(kept = merged[idx].name(), dropped = rule.name(), "merging rules");
                merged[idx].absorb(rule);
            }
            None => {
                by_body.insert(key, merged.len());
                merged.push(rule);
            }
        }
    }
    merged
}
