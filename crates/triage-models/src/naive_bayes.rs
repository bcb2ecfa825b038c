//! Categorical naive Bayes artifacts.
//!
//! Artifact format (JSON):
//!
//! ```json
//! {
//!   "target": "assignment_group",
//!   "classes": ["Service Desk", "Network Ops"],
//!   "class_log_prior": [-0.51, -0.92],
//!   "features": {
//!     "Category": { "software": [-0.22, -1.61], "network": [-2.30, -0.11] },
//!     "Hour":     { "9": [-1.20, -1.90] }
//!   },
//!   "unseen_log_prob": -9.0
//! }
//! ```
//!
//! Each feature table maps a feature value (as text) to one log-likelihood
//! per class. Values missing from a table contribute `unseen_log_prob` to
//! every class. Columns the artifact does not list are ignored.

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use triage_core::FeatureVector;

use crate::{classifier::Classifier, error::ModelError};

const fn default_unseen_log_prob() -> f64 {
    -9.0
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NaiveBayesClassifier {
    /// What the model predicts; informational.
    #[serde(default)]
    pub target: String,
    classes: Vec<String>,
    class_log_prior: Vec<f64>,
    #[serde(default)]
    features: HashMap<String, HashMap<String, Vec<f64>>>,
    #[serde(default = "default_unseen_log_prob")]
    unseen_log_prob: f64,
}

impl NaiveBayesClassifier {
    /// Load and validate an artifact from disk.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::Io`] if the file cannot be read,
    /// [`ModelError::Parse`] if it is not a valid artifact, or
    /// [`ModelError::Invalid`] if its tables disagree with its classes.
    pub fn from_path(path: &Path) -> Result<Self, ModelError> {
        let text = std::fs::read_to_string(path).map_err(|source| ModelError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let model: Self = serde_json::from_str(&text).map_err(|e| ModelError::Parse {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        model.validate()?;
        tracing::debug!(
            path = %path.display(),
            target = %model.target,
            classes = model.classes.len(),
            "loaded classifier"
        );
        Ok(model)
    }

    /// Parse and validate an artifact from a JSON string.
    ///
    /// # Errors
    ///
    /// Same as [`Self::from_path`], minus I/O.
    pub fn from_json_str(json: &str) -> Result<Self, ModelError> {
        let model: Self = serde_json::from_str(json).map_err(|e| ModelError::Parse {
            path: "<inline>".into(),
            reason: e.to_string(),
        })?;
        model.validate()?;
        Ok(model)
    }

    fn validate(&self) -> Result<(), ModelError> {
        if self.classes.is_empty() {
            return Err(ModelError::NoClasses);
        }
        let n = self.classes.len();
        if self.class_log_prior.len() != n {
            return Err(ModelError::Invalid(format!(
                "class_log_prior has {} entries for {n} classes",
                self.class_log_prior.len()
            )));
        }
        for (column, table) in &self.features {
            if !FeatureVector::NAMES.contains(&column.as_str()) {
                return Err(ModelError::Invalid(format!("unknown feature column '{column}'")));
            }
            if let Some((value, row)) = table.iter().find(|(_, row)| row.len() != n) {
                return Err(ModelError::Invalid(format!(
                    "{column}={value} has {} entries for {n} classes",
                    row.len()
                )));
            }
        }
        Ok(())
    }

    fn joint_log_likelihood(&self, features: &FeatureVector) -> Vec<f64> {
        let mut scores = self.class_log_prior.clone();
        for (column, value) in features.iter() {
            let Some(table) = self.features.get(column) else {
                continue;
            };
            match table.get(&value.to_string()) {
                Some(row) => {
                    for (score, ll) in scores.iter_mut().zip(row) {
                        *score += ll;
                    }
                }
                None => {
                    for score in &mut scores {
                        *score += self.unseen_log_prob;
                    }
                }
            }
        }
        scores
    }
}

impl Classifier for NaiveBayesClassifier {
    fn classes(&self) -> &[String] {
        &self.classes
    }

    fn predict_proba(&self, features: &FeatureVector) -> Result<Vec<f64>, ModelError> {
        Ok(softmax(&self.joint_log_likelihood(features)))
    }
}

fn softmax(scores: &[f64]) -> Vec<f64> {
    let max = scores.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let exps: Vec<f64> = scores.iter().map(|s| (s - max).exp()).collect();
    let total: f64 = exps.iter().sum();
    exps.into_iter().map(|e| e / total).collect()
}
