// thiserror's #[error("...{field}...")] format strings reference struct fields,
// but the compiler doesn't see through the derive macro and reports false positives.
#![allow(unused_assignments)]

//! # aq-star
//!
//! Star-based sequential covering (AQ): learns conjunctive diagnosis rules
//! from labeled patient examples and renders them as SWRL-like rule text.
//!
//! ## Architecture
//!
//! - **Domain** (`entity`, `example`, `category`): catalog, training examples
//!   and the (entity, relation) categories to learn
//! - **Induction** (`induct`): similarity metric, selectors, complexes, stars
//!   and the per-category covering loop, fanned out over rayon
//! - **Rules** (`rule`): atoms, rule text, simplification and the rule sink
//! - **Loading** (`dataset`, `config`): JSON datasets and TOML settings
//!
//! ## Library usage
//!
//! ```no_run
//! use std::path::Path;
//! use aq_star::config::InductionConfig;
//! use aq_star::dataset::Dataset;
//! use aq_star::induct::Learner;
//!
//! let dataset = Dataset::load(Path::new("ward.json")).unwrap();
//! let learner = Learner::new(&dataset.catalog, InductionConfig::default()).unwrap();
//! for rule in learner.learn(&dataset.training).unwrap() {
//!     println!("{}: {rule}", rule.name());
//! }
//! ```

pub mod category;
pub mod config;
pub mod dataset;
pub mod entity;
pub mod error;
pub mod example;
pub mod induct;
pub mod rule;
