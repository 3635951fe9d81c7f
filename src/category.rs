//! Target categories: a (target entity, relation) pair.

use serde::{Deserialize, Serialize};

use crate::entity::{EntityId, EntityKind};
use crate::example::Example;

/// The four relation kinds rules are learned for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Relation {
    HasDisease,
    ShouldMakeTest,
    ShouldBeTreatedWith,
    CauseOfDisease,
}

impl Relation {
    /// Enumeration order of the learner's fan-out.
    pub const ALL: [Relation; 4] = [
        Relation::HasDisease,
        Relation::ShouldMakeTest,
        Relation::ShouldBeTreatedWith,
        Relation::CauseOfDisease,
    ];

    /// Catalog partition holding the targets of this relation.
    pub fn target_kind(self) -> EntityKind {
        match self {
            Relation::HasDisease => EntityKind::Disease,
            Relation::ShouldMakeTest => EntityKind::Test,
            Relation::ShouldBeTreatedWith => EntityKind::Treatment,
            Relation::CauseOfDisease => EntityKind::Cause,
        }
    }

    /// Object property used in rule heads and rule names.
    pub fn property(self) -> &'static str {
        match self {
            Relation::HasDisease => "hasDisease",
            Relation::ShouldMakeTest => "shouldMakeTest",
            Relation::ShouldBeTreatedWith => "shouldBeTreatedWith",
            Relation::CauseOfDisease => "causeOfDisease",
        }
    }
}

impl std::fmt::Display for Relation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.property())
    }
}

/// One class of rule to induce.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Category {
    pub relation: Relation,
    pub target: EntityId,
}

impl Category {
    pub fn new(target: impl Into<EntityId>, relation: Relation) -> Self {
        Self {
            relation,
            target: target.into(),
        }
    }

    /// Membership test: does the example exhibit the target under the relation?
    pub fn contains(&self, example: &Example) -> bool {
        example.outcomes(self.relation).contains(&self.target)
    }

    /// Side effect: record the target into the example's outcome set.
    ///
    /// Returns `true` if the example did not already carry the outcome.
    pub fn assign(&self, example: &mut Example) -> bool {
        example.outcomes_mut(self.relation).insert(self.target.clone())
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}({})", self.relation, self.target)
    }
}
