//! End-to-end induction over a small synthetic ward.
//!
//! Labels are functions of the recorded attributes, so the learned rules must
//! reproduce every label of the training data exactly.

use aq_star::category::{Category, Relation};
use aq_star::config::InductionConfig;
use aq_star::dataset::Dataset;
use aq_star::error::InductionError;
use aq_star::example::Example;
use aq_star::induct::Learner;
use aq_star::rule::{MemoryRuleSink, Rule, RuleSink, apply_rules, publish_rules};

const WARD: &str = r#"{
    "catalog": {
        "symptoms": ["fever", "cough", "rash", "headache", "joint_pain"],
        "diseases": ["flu", "measles", "arthritis"],
        "tests": ["xray"],
        "treatments": ["rest", "ibuprofen"],
        "causes": ["virus"]
    },
    "examples": [
        {"id": "p1", "symptoms": ["fever", "cough"], "age": 25,
         "diseases": ["flu"], "treatments": ["rest"], "causes": ["virus"]},
        {"id": "p2", "symptoms": ["fever", "headache"], "age": 40,
         "diseases": ["flu"], "treatments": ["rest"], "causes": ["virus"]},
        {"id": "p3", "symptoms": ["rash"], "age": 8,
         "diseases": ["measles"], "causes": ["virus"]},
        {"id": "p4", "symptoms": ["rash", "fever"], "age": 12,
         "diseases": ["measles", "flu"], "treatments": ["rest"], "causes": ["virus"]},
        {"id": "p5", "symptoms": ["joint_pain"], "age": 70,
         "diseases": ["arthritis"], "tests": ["xray"], "treatments": ["ibuprofen"]},
        {"id": "p6", "symptoms": ["cough"], "age": 65,
         "diseases": ["arthritis"], "tests": ["xray"], "treatments": ["ibuprofen"]},
        {"id": "p7", "symptoms": ["headache"], "age": 30},
        {"id": "p8", "symptoms": ["cough"], "age": 50}
    ]
}"#;

fn ward() -> Dataset {
    Dataset::from_json(WARD, "ward").unwrap()
}

fn learn(dataset: &Dataset, config: InductionConfig) -> Vec<Rule> {
    Learner::new(&dataset.catalog, config)
        .unwrap()
        .learn(&dataset.training)
        .unwrap()
}

fn unlabeled(example: &Example) -> Example {
    let mut copy = example.clone();
    for relation in Relation::ALL {
        copy.outcomes_mut(relation).clear();
    }
    copy
}

#[test]
fn rules_reproduce_training_labels() {
    let dataset = ward();
    let rules = learn(&dataset, InductionConfig::default());
    assert!(!rules.is_empty());

    for example in dataset.training.examples() {
        let mut inferred = unlabeled(example);
        apply_rules(&rules, &mut inferred);
        for relation in Relation::ALL {
            assert_eq!(
                inferred.outcomes(relation),
                example.outcomes(relation),
                "{relation} of {}",
                example.id
            );
        }
    }
}

#[test]
fn categories_with_equal_extensions_share_one_rule() {
    let dataset = ward();
    let rules = learn(&dataset, InductionConfig::default());

    let concludes = |rule: &Rule, target: &str, relation: Relation| {
        rule.conclusions().contains(&Category::new(target, relation))
    };
    assert!(rules.iter().any(|r| {
        concludes(r, "arthritis", Relation::HasDisease)
            && concludes(r, "xray", Relation::ShouldMakeTest)
            && concludes(r, "ibuprofen", Relation::ShouldBeTreatedWith)
    }));
    assert!(rules.iter().any(|r| {
        concludes(r, "flu", Relation::HasDisease) && concludes(r, "rest", Relation::ShouldBeTreatedWith)
    }));

    // Rule names stay unique after merging.
    let mut names: Vec<&str> = rules.iter().map(Rule::name).collect();
    names.sort_unstable();
    names.dedup();
    assert_eq!(names.len(), rules.len());
}

#[test]
fn induction_is_deterministic() {
    let dataset = ward();
    let parallel = learn(&dataset, InductionConfig::default());
    let serial = learn(
        &dataset,
        InductionConfig {
            threads: Some(1),
            ..Default::default()
        },
    );
    assert_eq!(parallel, serial);
}

#[test]
fn rule_text_uses_rule_syntax() {
    let dataset = ward();
    let rules = learn(&dataset, InductionConfig::default());
    for rule in &rules {
        let text = rule.to_string();
        assert!(text.starts_with("Patient(?p)"), "{text}");
        assert!(text.contains(" -> "), "{text}");
        assert!(rule.name().starts_with("generated_"));
    }
}

#[test]
fn published_rules_are_accepted_by_catalog_checked_sink() {
    let dataset = ward();
    let rules = learn(&dataset, InductionConfig::default());
    let mut sink = MemoryRuleSink::with_catalog(dataset.catalog.clone());

    let first = publish_rules(&mut sink, &rules, "generated");
    assert!(first.failures.is_empty());
    assert_eq!(first.accepted.len(), rules.len());

    // Republishing replaces the earlier generation instead of colliding.
    let second = publish_rules(&mut sink, &rules, "generated");
    assert_eq!(second.removed.len(), rules.len());
    assert!(second.failures.is_empty());
    assert_eq!(sink.rule_names().len(), rules.len());
}

#[test]
fn custom_prefix_names_rules() {
    let dataset = ward();
    let rules = learn(
        &dataset,
        InductionConfig {
            rule_prefix: "ward".into(),
            ..Default::default()
        },
    );
    assert!(rules.iter().all(|r| r.name().starts_with("ward_")));
}

#[test]
fn contradictory_pair_fails_the_whole_run() {
    // p9 repeats p1's attributes without any label.
    let json = WARD.replace(
        r#"{"id": "p8", "symptoms": ["cough"], "age": 50}"#,
        r#"{"id": "p8", "symptoms": ["cough"], "age": 50},
        {"id": "p9", "symptoms": ["fever", "cough"], "age": 25}"#,
    );
    let dataset = Dataset::from_json(&json, "ward").unwrap();
    assert_eq!(dataset.training.len(), 9);

    let err = Learner::new(&dataset.catalog, InductionConfig::default())
        .unwrap()
        .learn(&dataset.training)
        .unwrap_err();
    assert!(err.is_search_failure());
    assert!(matches!(
        err,
        InductionError::NoDiscriminatingCondition { ref category, .. } if category == "hasDisease(flu)"
    ));
}
