//! Induction settings, persisted as TOML.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{InductionError, InductionResult};
use crate::example::NumericAttribute;

/// Inclusive domain range of one numeric attribute.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NumericRange {
    pub min: u32,
    pub max: u32,
}

impl NumericRange {
    pub const fn new(min: u32, max: u32) -> Self {
        Self { min, max }
    }

    /// `max - min`, the normalizer of the similarity metric.
    pub fn span(&self) -> u32 {
        self.max.saturating_sub(self.min)
    }
}

/// Domain bounds for the numeric attributes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DomainBounds {
    pub age: NumericRange,
    pub height: NumericRange,
    pub weight: NumericRange,
}

impl DomainBounds {
    pub fn range(&self, attr: NumericAttribute) -> NumericRange {
        match attr {
            NumericAttribute::Age => self.age,
            NumericAttribute::Height => self.height,
            NumericAttribute::Weight => self.weight,
        }
    }
}

impl Default for DomainBounds {
    fn default() -> Self {
        Self {
            age: NumericRange::new(0, 120),
            height: NumericRange::new(0, 250),
            weight: NumericRange::new(0, 300),
        }
    }
}

/// Configuration for the induction engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InductionConfig {
    /// Threshold split bias: 0 places the split at the positive value
    /// (restrictive), 1 at the negative value (general). Default: 0.5.
    pub epsilon: f64,
    /// Maximum star size kept after each refinement (default: 5).
    pub beam_width: usize,
    /// Worker threads for the category fan-out. `None` uses rayon's global pool.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub threads: Option<usize>,
    /// Prefix of generated rule names (default: `generated`).
    pub rule_prefix: String,
    pub bounds: DomainBounds,
}

impl Default for InductionConfig {
    fn default() -> Self {
        Self {
            epsilon: 0.5,
            beam_width: 5,
            threads: None,
            rule_prefix: "generated".into(),
            bounds: DomainBounds::default(),
        }
    }
}

impl InductionConfig {
    pub fn validate(&self) -> InductionResult<()> {
        if !(0.0..=1.0).contains(&self.epsilon) {
            return Err(InductionError::InvalidConfig {
                message: format!("epsilon must be within [0, 1], got {}", self.epsilon),
            });
        }
        if self.beam_width == 0 {
            return Err(InductionError::InvalidConfig {
                message: "beam_width must be >= 1".into(),
            });
        }
        if self.threads == Some(0) {
            return Err(InductionError::InvalidConfig {
                message: "threads must be >= 1 when set".into(),
            });
        }
        if self.rule_prefix.is_empty() {
            return Err(InductionError::InvalidConfig {
                message: "rule_prefix must not be empty".into(),
            });
        }
        for attr in NumericAttribute::ALL {
            let range = self.bounds.range(attr);
            if range.span() == 0 {
                return Err(InductionError::InvalidConfig {
                    message: format!(
                        "{attr} range must satisfy min < max, got {}..={}",
                        range.min, range.max
                    ),
                });
            }
        }
        Ok(())
    }

    /// Load from a TOML file. Missing keys take their defaults.
    pub fn load(path: &Path) -> InductionResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| InductionError::ConfigRead {
            path: path.display().to_string(),
            source: e,
        })?;
        let config: Self = toml::from_str(&content).map_err(|e| InductionError::ConfigParse {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Save to a TOML file.
    pub fn save(&self, path: &Path) -> InductionResult<()> {
        let content = toml::to_string_pretty(self).map_err(|e| InductionError::ConfigParse {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| InductionError::ConfigWrite {
                path: parent.display().to_string(),
                source: e,
            })?;
        }
        std::fs::write(path, content).map_err(|e| InductionError::ConfigWrite {
            path: path.display().to_string(),
            source: e,
        })
    }
}
