//! JSON dataset adapter: entity catalog plus labeled examples.
//!
//! ```json
//! {
//!   "catalog": {
//!     "symptoms": ["fever", {"id": "cough", "name": "Dry cough"}],
//!     "diseases": ["flu"]
//!   },
//!   "examples": [
//!     {"id": "p1", "symptoms": ["fever"], "age": 30, "diseases": ["flu"]}
//!   ]
//! }
//! ```
//!
//! Every entity reference is checked against the catalog partition of its
//! dimension before the examples become a [`TrainingSet`].

use std::path::Path;

use serde::Deserialize;

use crate::category::Relation;
use crate::entity::{Entity, EntityCatalog, EntityKind};
use crate::error::{InductionError, InductionResult};
use crate::example::{Example, SetAttribute, TrainingSet};

// ── JSON deserialization helpers ────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum CatalogEntry {
    Id(String),
    Named { id: String, name: Option<String> },
}

impl CatalogEntry {
    fn into_entity(self, kind: EntityKind) -> Entity {
        match self {
            Self::Id(id) => Entity::new(id.as_str(), kind),
            Self::Named { id, name } => {
                let entity = Entity::new(id.as_str(), kind);
                match name {
                    Some(name) => entity.with_name(name),
                    None => entity,
                }
            }
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct CatalogJson {
    symptoms: Vec<CatalogEntry>,
    diseases: Vec<CatalogEntry>,
    tests: Vec<CatalogEntry>,
    treatments: Vec<CatalogEntry>,
    causes: Vec<CatalogEntry>,
}

impl CatalogJson {
    fn into_catalog(self) -> EntityCatalog {
        let mut catalog = EntityCatalog::new();
        let partitions = [
            (EntityKind::Symptom, self.symptoms),
            (EntityKind::Disease, self.diseases),
            (EntityKind::Test, self.tests),
            (EntityKind::Treatment, self.treatments),
            (EntityKind::Cause, self.causes),
        ];
        for (kind, entries) in partitions {
            for entry in entries {
                catalog.insert(entry.into_entity(kind));
            }
        }
        catalog
    }
}

#[derive(Debug, Deserialize)]
struct DatasetJson {
    #[serde(default)]
    catalog: CatalogJson,
    #[serde(default)]
    examples: Vec<Example>,
}

// ── Dataset ─────────────────────────────────────────────────────────────

/// A validated catalog and training set, ready for induction.
#[derive(Debug, Clone)]
pub struct Dataset {
    pub catalog: EntityCatalog,
    pub training: TrainingSet,
}

impl Dataset {
    /// Read and validate a dataset file.
    pub fn load(path: &Path) -> InductionResult<Self> {
        let json = read(path)?;
        Self::from_json(&json, &path.display().to_string())
    }

    /// Parse and validate a dataset document. `origin` names the source in
    /// error messages.
    pub fn from_json(json: &str, origin: &str) -> InductionResult<Self> {
        let parsed: DatasetJson =
            serde_json::from_str(json).map_err(|e| InductionError::DatasetParse {
                path: origin.to_string(),
                message: e.to_string(),
            })?;
        let catalog = parsed.catalog.into_catalog();
        for example in &parsed.examples {
            validate_example(&catalog, example, true)?;
        }
        let training = TrainingSet::new(parsed.examples)?;
        tracing::info!(
            origin,
            examples = training.len(),
            symptoms = catalog.count(EntityKind::Symptom),
            diseases = catalog.count(EntityKind::Disease),
            "loaded dataset"
        );
        Ok(Self { catalog, training })
    }
}

/// Read unlabeled patients (a JSON array of examples) to diagnose.
///
/// Attribute references are validated against `catalog`; outcome sets are
/// ignored and cleared.
pub fn load_patients(path: &Path, catalog: &EntityCatalog) -> InductionResult<Vec<Example>> {
    let json = read(path)?;
    let mut patients: Vec<Example> =
        serde_json::from_str(&json).map_err(|e| InductionError::DatasetParse {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
    for patient in &mut patients {
        validate_example(catalog, patient, false)?;
        for relation in Relation::ALL {
            patient.outcomes_mut(relation).clear();
        }
    }
    Ok(patients)
}

fn read(path: &Path) -> InductionResult<String> {
    std::fs::read_to_string(path).map_err(|e| InductionError::DatasetRead {
        path: path.display().to_string(),
        source: e,
    })
}

fn validate_example(
    catalog: &EntityCatalog,
    example: &Example,
    with_outcomes: bool,
) -> InductionResult<()> {
    for attr in SetAttribute::ALL {
        for id in example.set(attr) {
            catalog.require(attr.entity_kind(), id)?;
        }
    }
    if with_outcomes {
        for relation in Relation::ALL {
            for id in example.outcomes(relation) {
                catalog.require(relation.target_kind(), id)?;
            }
        }
    }
    Ok(())
}
