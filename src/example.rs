//! Training examples (patients) and the immutable training set.
//!
//! An [`Example`] carries three entity-set attributes, three bounded numeric
//! attributes and four outcome sets. The outcome sets are the ground truth
//! a [`Category`](crate::category::Category) tests against.

use std::collections::{BTreeSet, HashSet};

use serde::{Deserialize, Deserializer, Serialize};

use crate::category::Relation;
use crate::entity::{EntityId, EntityKind};
use crate::error::{InductionError, InductionResult};

// ---------------------------------------------------------------------------
// Attribute dimensions
// ---------------------------------------------------------------------------

/// An entity-set attribute dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SetAttribute {
    Symptoms,
    NegativeTests,
    PreviousDiseases,
}

impl SetAttribute {
    pub const ALL: [SetAttribute; 3] = [
        SetAttribute::Symptoms,
        SetAttribute::NegativeTests,
        SetAttribute::PreviousDiseases,
    ];

    /// Catalog partition the attribute's entities are drawn from.
    pub fn entity_kind(self) -> EntityKind {
        match self {
            SetAttribute::Symptoms => EntityKind::Symptom,
            SetAttribute::NegativeTests => EntityKind::Test,
            SetAttribute::PreviousDiseases => EntityKind::Disease,
        }
    }

    /// Object property linking a patient to an entity of this dimension.
    pub fn property(self) -> &'static str {
        match self {
            SetAttribute::Symptoms => "hasSymptom",
            SetAttribute::NegativeTests => "negativeTestResult",
            SetAttribute::PreviousDiseases => "hadOrHasDisease",
        }
    }
}

impl std::fmt::Display for SetAttribute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            SetAttribute::Symptoms => "symptoms",
            SetAttribute::NegativeTests => "negative tests",
            SetAttribute::PreviousDiseases => "previous diseases",
        };
        f.write_str(s)
    }
}

/// A bounded numeric attribute dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NumericAttribute {
    Age,
    Height,
    Weight,
}

impl NumericAttribute {
    pub const ALL: [NumericAttribute; 3] = [
        NumericAttribute::Age,
        NumericAttribute::Height,
        NumericAttribute::Weight,
    ];

    /// Data property holding the value on a patient.
    pub fn property(self) -> &'static str {
        match self {
            NumericAttribute::Age => "hasAge",
            NumericAttribute::Height => "hasHeight",
            NumericAttribute::Weight => "hasWeight",
        }
    }

    /// Rule variable bound to the value.
    pub fn variable(self) -> &'static str {
        match self {
            NumericAttribute::Age => "age",
            NumericAttribute::Height => "height",
            NumericAttribute::Weight => "weight",
        }
    }
}

impl std::fmt::Display for NumericAttribute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.variable())
    }
}

// ---------------------------------------------------------------------------
// Example
// ---------------------------------------------------------------------------

/// A labeled training instance.
///
/// Numeric attributes are `None` when unknown. On input a negative number is
/// accepted as the "unknown" sentinel as well.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Example {
    pub id: String,
    pub symptoms: BTreeSet<EntityId>,
    pub negative_tests: BTreeSet<EntityId>,
    pub previous_diseases: BTreeSet<EntityId>,
    #[serde(deserialize_with = "known_or_none")]
    pub age: Option<u32>,
    #[serde(deserialize_with = "known_or_none")]
    pub height: Option<u32>,
    #[serde(deserialize_with = "known_or_none")]
    pub weight: Option<u32>,
    pub diseases: BTreeSet<EntityId>,
    pub causes: BTreeSet<EntityId>,
    pub tests: BTreeSet<EntityId>,
    pub treatments: BTreeSet<EntityId>,
}

fn known_or_none<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<i64>::deserialize(deserializer)?;
    Ok(raw.and_then(|v| u32::try_from(v).ok()))
}

impl Example {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Default::default()
        }
    }

    pub fn set(&self, attr: SetAttribute) -> &BTreeSet<EntityId> {
        match attr {
            SetAttribute::Symptoms => &self.symptoms,
            SetAttribute::NegativeTests => &self.negative_tests,
            SetAttribute::PreviousDiseases => &self.previous_diseases,
        }
    }

    pub fn set_mut(&mut self, attr: SetAttribute) -> &mut BTreeSet<EntityId> {
        match attr {
            SetAttribute::Symptoms => &mut self.symptoms,
            SetAttribute::NegativeTests => &mut self.negative_tests,
            SetAttribute::PreviousDiseases => &mut self.previous_diseases,
        }
    }

    pub fn numeric(&self, attr: NumericAttribute) -> Option<u32> {
        match attr {
            NumericAttribute::Age => self.age,
            NumericAttribute::Height => self.height,
            NumericAttribute::Weight => self.weight,
        }
    }

    pub fn numeric_mut(&mut self, attr: NumericAttribute) -> &mut Option<u32> {
        match attr {
            NumericAttribute::Age => &mut self.age,
            NumericAttribute::Height => &mut self.height,
            NumericAttribute::Weight => &mut self.weight,
        }
    }

    /// The outcome set a relation reads and writes.
    pub fn outcomes(&self, relation: Relation) -> &BTreeSet<EntityId> {
        match relation {
            Relation::HasDisease => &self.diseases,
            Relation::CauseOfDisease => &self.causes,
            Relation::ShouldMakeTest => &self.tests,
            Relation::ShouldBeTreatedWith => &self.treatments,
        }
    }

    pub fn outcomes_mut(&mut self, relation: Relation) -> &mut BTreeSet<EntityId> {
        match relation {
            Relation::HasDisease => &mut self.diseases,
            Relation::CauseOfDisease => &mut self.causes,
            Relation::ShouldMakeTest => &mut self.tests,
            Relation::ShouldBeTreatedWith => &mut self.treatments,
        }
    }

    // Builder helpers, mostly for tests and small programmatic datasets.

    pub fn with_set(mut self, attr: SetAttribute, ids: &[&str]) -> Self {
        self.set_mut(attr).extend(ids.iter().map(|id| EntityId::new(id)));
        self
    }

    pub fn with_numeric(mut self, attr: NumericAttribute, value: u32) -> Self {
        *self.numeric_mut(attr) = Some(value);
        self
    }

    pub fn with_outcome(mut self, relation: Relation, id: &str) -> Self {
        self.outcomes_mut(relation).insert(EntityId::new(id));
        self
    }
}

// ---------------------------------------------------------------------------
// Training set
// ---------------------------------------------------------------------------

/// Index of an example inside a [`TrainingSet`].
pub type ExampleIdx = usize;

/// The immutable snapshot every category task reads.
///
/// Examples are addressed by position; ids are guaranteed unique.
#[derive(Debug, Clone, Default)]
pub struct TrainingSet {
    examples: Vec<Example>,
}

impl TrainingSet {
    pub fn new(examples: Vec<Example>) -> InductionResult<Self> {
        let mut seen = HashSet::with_capacity(examples.len());
        for ex in &examples {
            if !seen.insert(ex.id.as_str()) {
                return Err(InductionError::DuplicateExample { id: ex.id.clone() });
            }
        }
        Ok(Self { examples })
    }

    pub fn len(&self) -> usize {
        self.examples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.examples.is_empty()
    }

    pub fn get(&self, idx: ExampleIdx) -> &Example {
        &self.examples[idx]
    }

    pub fn examples(&self) -> &[Example] {
        &self.examples
    }

    pub fn indices(&self) -> std::ops::Range<ExampleIdx> {
        0..self.examples.len()
    }
}
