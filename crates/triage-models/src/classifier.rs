//! The classifier seam.

use triage_core::FeatureVector;

use crate::error::ModelError;

/// A trained single-label classifier over the shared feature schema.
///
/// Implementations hold no per-call mutable state, so one loaded instance
/// can serve concurrent predictions through `&self`.
pub trait Classifier: Send + Sync {
    /// Class labels, in the order [`Classifier::predict_proba`] reports them.
    fn classes(&self) -> &[String];

    /// One probability per class, summing to 1.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError`] if the model cannot score these features.
    fn predict_proba(&self, features: &FeatureVector) -> Result<Vec<f64>, ModelError>;

    /// The most probable class and its probability.
    ///
    /// Ties go to the class listed first.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::NoClasses`] if the model has no classes, or
    /// any error from [`Classifier::predict_proba`].
    fn predict_top(&self, features: &FeatureVector) -> Result<(String, f64), ModelError> {
        let proba = self.predict_proba(features)?;
        let (index, max) = argmax(&proba).ok_or(ModelError::NoClasses)?;
        let label = self
            .classes()
            .get(index)
            .cloned()
            .ok_or(ModelError::NoClasses)?;
        Ok((label, max))
    }

    /// The most probable class.
    ///
    /// # Errors
    ///
    /// Same as [`Classifier::predict_top`].
    fn predict(&self, features: &FeatureVector) -> Result<String, ModelError> {
        self.predict_top(features).map(|(label, _)| label)
    }
}

/// Index and value of the largest element. `None` for an empty slice.
#[must_use]
pub fn argmax(values: &[f64]) -> Option<(usize, f64)> {
    values
        .iter()
        .copied()
        .enumerate()
        .fold(None, |best, (i, v)| match best {
            Some((_, b)) if v <= b => best,
            _ => Some((i, v)),
        })
}
