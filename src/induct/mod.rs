//! AQ star-based rule induction.
//!
//! For every category the learner repeatedly picks the positive example least
//! similar to the positives already covered, grows a star of complexes that
//! cover it while excluding every negative, and turns the best complex into a
//! rule. Categories are learned independently on rayon's pool.

pub mod complex;
pub mod covering;
pub mod learner;
pub mod seed;
pub mod selector;
pub mod similarity;
pub mod specialize;
pub mod star;

pub use complex::{Complex, Coverage};
pub use covering::CoveringTask;
pub use learner::Learner;
pub use selector::{Comparison, LinearSelector, Selector, SetSelector};
pub use similarity::SimilarityMetric;
pub use star::{Quality, Star};
