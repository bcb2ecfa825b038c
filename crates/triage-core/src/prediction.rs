//! Per-field predictions.

use std::fmt;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Label produced when a category/subcategory code has no display label.
///
/// A prediction carrying this label is never applied, whatever its
/// confidence.
pub const LOOKUP_MISS: &str = "not found";

/// The ticket fields the pipeline predicts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TicketField {
    AssignmentGroup,
    Category,
    Subcategory,
    Priority,
}

impl TicketField {
    /// All fields, in update-payload order.
    pub const ALL: [Self; 4] = [
        Self::AssignmentGroup,
        Self::Category,
        Self::Subcategory,
        Self::Priority,
    ];

    /// ServiceNow column name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::AssignmentGroup => "assignment_group",
            Self::Category => "category",
            Self::Subcategory => "subcategory",
            Self::Priority => "priority",
        }
    }
}

impl fmt::Display for TicketField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A predicted label and the model's certainty in it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldPrediction {
    pub label: String,
    /// In `[0, 1]`.
    pub confidence: f64,
}

impl FieldPrediction {
    #[must_use]
    pub fn new(label: impl Into<String>, confidence: f64) -> Self {
        Self {
            label: label.into(),
            confidence: confidence.clamp(0.0, 1.0),
        }
    }

    /// A prediction whose code could not be mapped to a display label.
    #[must_use]
    pub fn lookup_miss(confidence: f64) -> Self {
        Self::new(LOOKUP_MISS, confidence)
    }

    #[must_use]
    pub fn is_lookup_miss(&self) -> bool {
        self.label == LOOKUP_MISS
    }

    /// Whether the label can be written to a ticket at all.
    #[must_use]
    pub fn has_usable_label(&self) -> bool {
        !self.label.trim().is_empty() && !self.is_lookup_miss()
    }
}

/// All four predictions for one ticket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TicketPredictions {
    pub incident_id: String,
    /// Present only if the ticket's own `opened_at` parsed.
    pub opened_at: Option<NaiveDateTime>,
    pub assignment_group: FieldPrediction,
    pub category: FieldPrediction,
    pub subcategory: FieldPrediction,
    pub priority: FieldPrediction,
}

impl TicketPredictions {
    #[must_use]
    pub const fn field(&self, field: TicketField) -> &FieldPrediction {
        match field {
            TicketField::AssignmentGroup => &self.assignment_group,
            TicketField::Category => &self.category,
            TicketField::Subcategory => &self.subcategory,
            TicketField::Priority => &self.priority,
        }
    }

    /// Iterate `(field, prediction)` pairs in [`TicketField::ALL`] order.
    pub fn fields(&self) -> impl Iterator<Item = (TicketField, &FieldPrediction)> {
        TicketField::ALL.into_iter().map(|f| (f, self.field(f)))
    }
}
