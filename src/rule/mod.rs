//! Rules generated from accepted complexes.
//!
//! A [`Rule`] owns its atoms in three sets (declarations, body, head) and
//! keeps the complex it was generated from, so it can be applied to new
//! examples without a reasoner.

pub mod atom;
pub mod simplify;
pub mod sink;

use std::collections::BTreeSet;

use crate::category::Category;
use crate::entity::{EntityId, EntityKind};
use crate::error::{InductionError, InductionResult};
use crate::example::{Example, SetAttribute};
use crate::induct::complex::Complex;
use crate::induct::selector::Selector;

pub use atom::{Atom, Term};
pub use simplify::simplify_rules;
pub use sink::{MemoryRuleSink, PublishReport, RuleSink, publish_rules};

/// Variable standing for the patient in every rule.
const PATIENT_VAR: &str = "p";
const PATIENT_CLASS: &str = "Patient";

/// Deterministic name of the `index`-th rule learned for a category.
pub fn rule_name(prefix: &str, category: &Category, index: usize) -> String {
    format!(
        "{prefix}_{}_{}_{index}",
        category.relation.property(),
        category.target
    )
}

/// An induced rule: `declarations ∧ body → head`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    name: String,
    declarations: BTreeSet<Atom>,
    body: BTreeSet<Atom>,
    head: BTreeSet<Atom>,
    condition: Complex,
    conclusions: BTreeSet<Category>,
}

impl Rule {
    /// Translate an accepted complex into a rule concluding `category`.
    ///
    /// Set selectors become one class declaration and one property atom per
    /// entity; numeric selectors bind a variable and add one built-in
    /// comparison per bound. A set selector accepting several entities is a
    /// disjunction and cannot be written as a conjunctive rule.
    pub fn from_complex(
        name: impl Into<String>,
        complex: &Complex,
        category: &Category,
    ) -> InductionResult<Self> {
        let name = name.into();
        let patient = Term::var(PATIENT_VAR);
        let mut declarations = BTreeSet::from([Atom::class(PATIENT_CLASS, patient.clone())]);
        let mut body = BTreeSet::new();

        for selector in complex.selectors() {
            match selector {
                Selector::Set(attr, sel) => {
                    let mut entities = sel.entities().iter();
                    let (Some(entity), None) = (entities.next(), entities.next()) else {
                        return Err(InductionError::RuleConstruction {
                            rule: name,
                            message: format!(
                                "{attr} selector accepts {} entities, a rule body can express one",
                                sel.entities().len()
                            ),
                        });
                    };
                    declarations.insert(Atom::class(
                        attr.entity_kind().class_name(),
                        Term::Entity(entity.clone()),
                    ));
                    body.insert(Atom::property(
                        attr.property(),
                        patient.clone(),
                        Term::Entity(entity.clone()),
                    ));
                }
                Selector::Linear(attr, sel) => {
                    let var = Term::var(attr.variable());
                    declarations.insert(Atom::property(attr.property(), patient.clone(), var.clone()));
                    for (cmp, threshold) in sel.conditions() {
                        body.insert(Atom::builtin(cmp.builtin(), var.clone(), Term::Literal(threshold)));
                    }
                }
            }
        }

        Ok(Self {
            name,
            declarations,
            body,
            head: BTreeSet::from([head_atom(category)]),
            condition: complex.clone(),
            conclusions: BTreeSet::from([category.clone()]),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn declarations(&self) -> &BTreeSet<Atom> {
        &self.declarations
    }

    pub fn body(&self) -> &BTreeSet<Atom> {
        &self.body
    }

    pub fn head(&self) -> &BTreeSet<Atom> {
        &self.head
    }

    pub fn condition(&self) -> &Complex {
        &self.condition
    }

    pub fn conclusions(&self) -> &BTreeSet<Category> {
        &self.conclusions
    }

    /// Whether the two rules have set-equal declarations and bodies.
    pub fn same_body(&self, other: &Rule) -> bool {
        self.declarations == other.declarations && self.body == other.body
    }

    /// Union `other`'s head into this rule.
    pub fn absorb(&mut self, other: Rule) {
        self.head.extend(other.head);
        self.conclusions.extend(other.conclusions);
    }

    /// Every entity the rule refers to, with the catalog partition it belongs to.
    pub fn entities(&self) -> Vec<(EntityKind, &EntityId)> {
        let mut out = Vec::new();
        for attr in SetAttribute::ALL {
            if let Some(sel) = self.condition.set_selector(attr) {
                out.extend(sel.entities().iter().map(|id| (attr.entity_kind(), id)));
            }
        }
        out.extend(
            self.conclusions
                .iter()
                .map(|c| (c.relation.target_kind(), &c.target)),
        );
        out
    }

    /// Fire the rule on an example: if the condition covers it, record every
    /// conclusion. Returns whether the rule fired.
    pub fn apply(&self, example: &mut Example) -> bool {
        if !self.condition.covers(example) {
            return false;
        }
        for category in &self.conclusions {
            category.assign(example);
        }
        true
    }
}

impl std::fmt::Display for Rule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let antecedent = join_atoms(self.declarations.iter().chain(self.body.iter()));
        let consequent = join_atoms(self.head.iter());
        write!(f, "{antecedent} -> {consequent}")
    }
}

fn join_atoms<'a>(atoms: impl Iterator<Item = &'a Atom>) -> String {
    atoms.map(ToString::to_string).collect::<Vec<_>>().join(" ^ ")
}

fn head_atom(category: &Category) -> Atom {
    Atom::property(
        category.relation.property(),
        Term::var(PATIENT_VAR),
        Term::Entity(category.target.clone()),
    )
}

/// Apply every rule to the example. Returns how many rules fired.
///
/// Rule bodies never read outcome sets, so one pass reaches the fixpoint.
pub fn apply_rules(rules: &[Rule], example: &mut Example) -> usize {
    rules.iter().filter(|rule| rule.apply(example)).count()
}
