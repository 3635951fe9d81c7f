//! Rich diagnostic error types for the induction engine.
//!
//! Every variant carries a miette error code and help text so a failed run
//! tells the user which pair of examples (or which rule) caused it and what
//! to change in the data.

use miette::Diagnostic;
use thiserror::Error;

/// Top-level error type for rule induction, rule publication and loading.
#[derive(Debug, Error, Diagnostic)]
pub enum InductionError {
    // -----------------------------------------------------------------------
    // Search failures (category-fatal and run-fatal)
    // -----------------------------------------------------------------------
    #[error(
        "no discriminating condition between positive example {positive} and negative example {negative} for {category}"
    )]
    #[diagnostic(
        code(aq::induct::no_discriminating_condition),
        help(
            "The two examples have identical symptoms, negative tests, previous diseases \
             and known age/height/weight, yet only one of them belongs to the category. \
             Fix the labels or record an attribute that tells them apart."
        )
    )]
    NoDiscriminatingCondition {
        positive: String,
        negative: String,
        category: String,
    },

    #[error(
        "hypothesis space exhausted while separating {positive} from {negative} for {category}"
    )]
    #[diagnostic(
        code(aq::induct::hypothesis_space_exhausted),
        help(
            "Every conjunction of the current star with the new discriminating conditions \
             was unsatisfiable. The positive example can only be separated from its \
             counterexamples by a combination of several entities on one dimension, \
             which a single set selector cannot express. Review the labels of the \
             examples involved or widen the beam."
        )
    )]
    HypothesisSpaceExhausted {
        positive: String,
        negative: String,
        category: String,
    },

    // -----------------------------------------------------------------------
    // Rule knowledge base
    // -----------------------------------------------------------------------
    #[error("cannot construct rule '{rule}': {message}")]
    #[diagnostic(
        code(aq::rule::construction),
        help("The rule knowledge base rejected the generated rule text. Check the entity catalog.")
    )]
    RuleConstruction { rule: String, message: String },

    #[error("rule '{rule}' already exists")]
    #[diagnostic(
        code(aq::rule::duplicate),
        help("Delete the existing rule first, or choose a different rule prefix in the configuration.")
    )]
    DuplicateRule { rule: String },

    // -----------------------------------------------------------------------
    // Data
    // -----------------------------------------------------------------------
    #[error("duplicate example id: {id}")]
    #[diagnostic(
        code(aq::data::duplicate_example),
        help("Every training example needs a unique id.")
    )]
    DuplicateExample { id: String },

    #[error("unknown {kind} entity: {id}")]
    #[diagnostic(
        code(aq::data::unknown_entity),
        help("Add the entity to the matching catalog partition, or fix the reference.")
    )]
    UnknownEntity { id: String, kind: String },

    #[error("failed to read dataset: {path}")]
    #[diagnostic(code(aq::data::io), help("Ensure the file exists and is readable."))]
    DatasetRead {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse dataset {path}: {message}")]
    #[diagnostic(
        code(aq::data::parse),
        help("The dataset is a JSON document with a `catalog` object and an `examples` array.")
    )]
    DatasetParse { path: String, message: String },

    // -----------------------------------------------------------------------
    // Configuration
    // -----------------------------------------------------------------------
    #[error("invalid configuration: {message}")]
    #[diagnostic(
        code(aq::config::invalid),
        help("Check the induction settings: epsilon in [0, 1], beam width >= 1, non-empty ranges.")
    )]
    InvalidConfig { message: String },

    #[error("failed to read configuration: {path}")]
    #[diagnostic(code(aq::config::io), help("Ensure the file exists and is readable."))]
    ConfigRead {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write configuration: {path}")]
    #[diagnostic(code(aq::config::write), help("Check that the directory is writable."))]
    ConfigWrite {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse configuration {path}: {message}")]
    #[diagnostic(
        code(aq::config::parse),
        help("Write a default file with `aq-star config --write <FILE>` and edit from there.")
    )]
    ConfigParse { path: String, message: String },

    #[error("failed to build worker pool: {message}")]
    #[diagnostic(
        code(aq::induct::thread_pool),
        help("Lower `threads` in the configuration or leave it unset to use all cores.")
    )]
    ThreadPool { message: String },
}

/// Convenience result type for the induction engine.
pub type InductionResult<T> = std::result::Result<T, InductionError>;

impl InductionError {
    /// Whether this error aborts an induction run (as opposed to a per-rule
    /// publication failure).
    pub fn is_search_failure(&self) -> bool {
        matches!(
            self,
            Self::NoDiscriminatingCondition { .. } | Self::HypothesisSpaceExhausted { .. }
        )
    }
}
