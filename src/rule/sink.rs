//! Boundary to the rule knowledge base.
//!
//! The learner only produces in-memory [`Rule`]s. A [`RuleSink`] stores them
//! (as rule text) and deletes them by name; [`publish_rules`] replaces the
//! previously generated rules of a sink with a freshly learned set.

use std::collections::BTreeMap;

use crate::entity::EntityCatalog;
use crate::error::{InductionError, InductionResult};

use super::Rule;

/// A durable store of rules, addressed by name.
pub trait RuleSink {
    /// Store a rule. Fails with [`InductionError::DuplicateRule`] on a name
    /// collision and [`InductionError::RuleConstruction`] when the rule text
    /// is rejected.
    fn add_rule(&mut self, rule: &Rule) -> InductionResult<()>;

    /// Delete a rule by name. Returns whether it existed.
    fn delete_rule(&mut self, name: &str) -> bool;

    /// Names of all stored rules.
    fn rule_names(&self) -> Vec<String>;
}

/// In-memory sink holding rule text by name.
///
/// With a catalog attached, rules referring to entities the catalog does not
/// know are rejected.
#[derive(Debug, Clone, Default)]
pub struct MemoryRuleSink {
    rules: BTreeMap<String, String>,
    catalog: Option<EntityCatalog>,
}

impl MemoryRuleSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_catalog(catalog: EntityCatalog) -> Self {
        Self {
            rules: BTreeMap::new(),
            catalog: Some(catalog),
        }
    }

    /// Stored text of a rule.
    pub fn text(&self, name: &str) -> Option<&str> {
        self.rules.get(name).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    fn check(&self, rule: &Rule) -> InductionResult<()> {
        let reject = |message: String| InductionError::RuleConstruction {
            rule: rule.name().to_string(),
            message,
        };
        if rule.name().is_empty() || rule.name().contains(char::is_whitespace) {
            return Err(reject("rule names must be non-empty and contain no whitespace".into()));
        }
        if rule.head().is_empty() {
            return Err(reject("rule has no head atoms".into()));
        }
        if let Some(catalog) = &self.catalog {
            for (kind, id) in rule.entities() {
                if !catalog.contains(kind, id) {
                    return Err(reject(format!("unknown {kind} entity {id}")));
                }
            }
        }
        Ok(())
    }
}

impl RuleSink for MemoryRuleSink {
    fn add_rule(&mut self, rule: &Rule) -> InductionResult<()> {
        if self.rules.contains_key(rule.name()) {
            return Err(InductionError::DuplicateRule {
                rule: rule.name().to_string(),
            });
        }
        self.check(rule)?;
        self.rules.insert(rule.name().to_string(), rule.to_string());
        Ok(())
    }

    fn delete_rule(&mut self, name: &str) -> bool {
        self.rules.remove(name).is_some()
    }

    fn rule_names(&self) -> Vec<String> {
        self.rules.keys().cloned().collect()
    }
}

/// Outcome of [`publish_rules`].
#[derive(Debug, Default)]
pub struct PublishReport {
    /// Previously generated rules deleted before publishing.
    pub removed: Vec<String>,
    /// Names of the rules the sink accepted.
    pub accepted: Vec<String>,
    /// Per-rule failures; accepted rules are not rolled back.
    pub failures: Vec<InductionError>,
}

/// Replace a sink's generated rules with `rules`.
///
/// Every stored rule whose name starts with `prefix` is deleted first. Each
/// new rule is then added independently: a rejected rule is recorded in the
/// report and does not affect the others.
pub fn publish_rules<S: RuleSink + ?Sized>(
    sink: &mut S,
    rules: &[Rule],
    prefix: &str,
) -> PublishReport {
    let mut report = PublishReport::default();

    for name in sink.rule_names() {
        if name.starts_with(prefix) && sink.delete_rule(&name) {
            report.removed.push(name);
        }
    }

    for rule in rules {
        match sink.add_rule(rule) {
            Ok(()) => report.accepted.push(rule.name().to_string()),
            Err(e) => {
                tracing::warn!(rule = rule.name(), error = %e, "rule rejected by sink");
                report.failures.push(e);
            }
        }
    }

    tracing::info!(
        removed = report.removed.len(),
        accepted = report.accepted.len(),
        failed = report.failures.len(),
        "published rules"
    );
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::category::{Category, Relation};
    use crate::entity::EntityKind;
    use crate::example::SetAttribute;
    use crate::induct::complex::Complex;
    use crate::induct::selector::{Selector, SetSelector};

    fn fever_rule(name: &str, disease: &str) -> Rule {
        let complex = Complex::from_selector(Selector::Set(
            SetAttribute::Symptoms,
            SetSelector::single("fever".into()),
        ));
        Rule::from_complex(name, &complex, &Category::new(disease, Relation::HasDisease)).unwrap()
    }

    #[test]
    fn stores_rule_text() {
        let mut sink = MemoryRuleSink::new();
        sink.add_rule(&fever_rule("r1", "flu")).unwrap();
        assert_eq!(
            sink.text("r1"),
            Some("Patient(?p) ^ Symptom(fever) ^ hasSymptom(?p, fever) -> hasDisease(?p, flu)")
        );
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let mut sink = MemoryRuleSink::new();
        sink.add_rule(&fever_rule("r1", "flu")).unwrap();
        let err = sink.add_rule(&fever_rule("r1", "cold")).unwrap_err();
        assert!(matches!(err, InductionError::DuplicateRule { ref rule } if rule == "r1"));
    }

    #[test]
    fn unknown_entities_are_rejected_with_catalog() {
        let catalog = EntityCatalog::new()
            .with(EntityKind::Symptom, "fever")
            .with(EntityKind::Disease, "flu");
        let mut sink = MemoryRuleSink::with_catalog(catalog);
        assert!(sink.add_rule(&fever_rule("ok", "flu")).is_ok());
        let err = sink.add_rule(&fever_rule("bad", "plague")).unwrap_err();
        assert!(matches!(err, InductionError::RuleConstruction { .. }));
        assert_eq!(sink.len(), 1);
    }

    #[test]
    fn publish_replaces_generated_rules_best_effort() {
        let mut sink = MemoryRuleSink::new();
        sink.add_rule(&fever_rule("generated_old", "flu")).unwrap();
        sink.add_rule(&fever_rule("manual", "flu")).unwrap();

        let rules = vec![
            fever_rule("generated_a", "flu"),
            fever_rule("manual", "cold"),
            fever_rule("generated_b", "cold"),
        ];
        let report = publish_rules(&mut sink, &rules, "generated");

        assert_eq!(report.removed, vec!["generated_old".to_string()]);
        assert_eq!(report.accepted, vec!["generated_a".to_string(), "generated_b".to_string()]);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(
            sink.rule_names(),
            vec!["generated_a".to_string(), "generated_b".to_string(), "manual".to_string()]
        );
    }

    #[test]
    fn delete_reports_existence() {
        let mut sink = MemoryRuleSink::new();
        sink.add_rule(&fever_rule("r1", "flu")).unwrap();
        assert!(sink.delete_rule("r1"));
        assert!(!sink.delete_rule("r1"));
        assert!(sink.is_empty());
    }
}
