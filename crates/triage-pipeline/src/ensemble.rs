//! The inference context: three classifiers, two lookup tables and the
//! priority rules, loaded once and shared read-only.

use chrono::NaiveDateTime;
use triage_config::ModelsConfig;
use triage_core::{FeatureVector, FieldPrediction, PipelineError, TicketBatch, TicketPredictions, TicketRecord};
use triage_models::{Classifier, LookupTable, ModelError, NaiveBayesClassifier};

use crate::normalize::{AcceptedTicket, normalize_batch, parse_opened_at};
use crate::priority::map_priority;

/// Predictions for one ticket, next to the record they were made from.
#[derive(Debug, Clone)]
pub struct PredictedTicket<'a> {
    pub record: &'a TicketRecord,
    pub predictions: TicketPredictions,
}

pub struct ModelEnsemble {
    assignment_group: Box<dyn Classifier>,
    category: Box<dyn Classifier>,
    subcategory: Box<dyn Classifier>,
    category_labels: LookupTable,
    subcategory_labels: LookupTable,
}

impl ModelEnsemble {
    #[must_use]
    pub fn new(
        assignment_group: Box<dyn Classifier>,
        category: Box<dyn Classifier>,
        subcategory: Box<dyn Classifier>,
        category_labels: LookupTable,
        subcategory_labels: LookupTable,
    ) -> Self {
        Self {
            assignment_group,
            category,
            subcategory,
            category_labels,
            subcategory_labels,
        }
    }

    /// Load every artifact named in the `models` config section.
    ///
    /// # Errors
    ///
    /// Returns the first [`ModelError`] hit while reading an artifact or
    /// lookup table.
    pub fn load(config: &ModelsConfig) -> Result<Self, ModelError> {
        let ensemble = Self::new(
            Box::new(NaiveBayesClassifier::from_path(&config.assignment_group)?),
            Box::new(NaiveBayesClassifier::from_path(&config.category)?),
            Box::new(NaiveBayesClassifier::from_path(&config.subcategory)?),
            LookupTable::from_path(&config.category_lookup)?,
            LookupTable::from_path(&config.subcategory_lookup)?,
        );
        tracing::info!(
            category_labels = ensemble.category_labels.len(),
            subcategory_labels = ensemble.subcategory_labels.len(),
            "models loaded"
        );
        Ok(ensemble)
    }

    /// Predict all four fields for one normalized ticket.
    ///
    /// Category and subcategory codes are mapped to display labels; a code
    /// with no label becomes the lookup-miss sentinel at the model's
    /// confidence. Confidences are rounded to two decimals.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::Inference`] if any classifier fails.
    pub fn predict(
        &self,
        record: &TicketRecord,
        features: &FeatureVector,
    ) -> Result<TicketPredictions, PipelineError> {
        let incident_id = record.incident_number().unwrap_or_default();
        let infer = |model: &dyn Classifier| {
            model
                .predict_top(features)
                .map(|(label, confidence)| (label, round2(confidence)))
                .map_err(|e| PipelineError::Inference {
                    incident: incident_id.clone(),
                    reason: e.to_string(),
                })
        };

        let (group, group_conf) = infer(self.assignment_group.as_ref())?;
        let (category_code, category_conf) = infer(self.category.as_ref())?;
        let (subcategory_code, subcategory_conf) = infer(self.subcategory.as_ref())?;

        let priority = map_priority(record.impact.as_ref(), record.urgency.as_ref());

        Ok(TicketPredictions {
            opened_at: parse_opened_at(record),
            assignment_group: FieldPrediction::new(group, group_conf),
            category: labelled(&self.category_labels, &category_code, category_conf),
            subcategory: labelled(&self.subcategory_labels, &subcategory_code, subcategory_conf),
            priority: FieldPrediction::new(priority.label, round2(priority.confidence)),
            incident_id,
        })
    }

    /// Normalize and predict a whole batch.
    ///
    /// Tickets rejected by the normalizer are logged and left out. Each
    /// remaining ticket yields its own `Result`, so one failed inference
    /// never hides the others.
    #[must_use]
    pub fn predict_batch<'a>(
        &self,
        batch: &'a TicketBatch,
        as_of: NaiveDateTime,
    ) -> Vec<Result<PredictedTicket<'a>, PipelineError>> {
        normalize_batch(batch, as_of)
            .into_iter()
            .map(|AcceptedTicket { record, features }| {
                self.predict(record, &features)
                    .map(|predictions| PredictedTicket { record, predictions })
            })
            .inspect(|result| {
                if let Err(error) = result {
                    tracing::warn!(%error, "prediction failed");
                }
            })
            .collect()
    }
}

impl std::fmt::Debug for ModelEnsemble {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelEnsemble")
            .field("assignment_group", &self.assignment_group.classes().len())
            .field("category", &self.category.classes().len())
            .field("subcategory", &self.subcategory.classes().len())
            .field("category_labels", &self.category_labels.len())
            .field("subcategory_labels", &self.subcategory_labels.len())
            .finish()
    }
}

fn labelled(table: &LookupTable, code: &str, confidence: f64) -> FieldPrediction {
    table.lookup(code).map_or_else(
        || {
            tracing::debug!(code, "no display label for code");
            FieldPrediction::lookup_miss(confidence)
        },
        |label| FieldPrediction::new(label, confidence),
    )
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
