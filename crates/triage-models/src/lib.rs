//! # triage-models
//!
//! Classifier artifacts and lookup tables for Triage.
//!
//! - [`Classifier`] is the seam every model sits behind: class labels plus a
//!   probability vector over them.
//! - [`NaiveBayesClassifier`] is the shipped artifact format: a categorical
//!   naive Bayes model stored as JSON, trained offline on the 14-column
//!   feature schema.
//! - [`LookupTable`] maps category/subcategory codes emitted by the models
//!   to the display labels the ticket store expects.
//!
//! Loaded models are immutable. Share them by reference or `Arc`.

pub mod classifier;
pub mod error;
pub mod lookup;
pub mod naive_bayes;

pub use classifier::{Classifier, argmax};
pub use error::ModelError;
pub use lookup::{LookupRow, LookupTable};
pub use naive_bayes::NaiveBayesClassifier;
