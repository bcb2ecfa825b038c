//! Change observations and the date-grouped summary.
//!
//! An observation records, per ticket, which of the four fields "changed".
//! There are two ways to decide that and they answer different questions:
//!
//! - [`ChangeMode::Confidence`]: the prediction cleared the reporting gate.
//! - [`ChangeMode::Comparison`]: the predicted label differs from the value
//!   the ticket actually holds.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use triage_core::{Reference, TicketField, TicketPredictions, TicketRecord, ticket::scalar_text};

use crate::gate::ConfidenceGate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeMode {
    Confidence,
    Comparison,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeObservation {
    pub incident_id: String,
    /// The ticket's opened date, or the processing date if unknown.
    pub date: NaiveDate,
    pub priority: bool,
    pub category: bool,
    pub subcategory: bool,
    pub assignment_group: bool,
    pub mode: ChangeMode,
}

impl ChangeObservation {
    /// Reporting mode: a field changed if its prediction passes `gate`.
    #[must_use]
    pub fn from_confidence(
        predictions: &TicketPredictions,
        gate: &ConfidenceGate,
        processing_date: NaiveDate,
    ) -> Self {
        let changed = |field| gate.passes(predictions.field(field));
        Self {
            incident_id: predictions.incident_id.clone(),
            date: observation_date(predictions, processing_date),
            priority: changed(TicketField::Priority),
            category: changed(TicketField::Category),
            subcategory: changed(TicketField::Subcategory),
            assignment_group: changed(TicketField::AssignmentGroup),
            mode: ChangeMode::Confidence,
        }
    }

    /// Comparison mode: a field changed if the predicted label differs
    /// literally from the ticket's current value. A blank or lookup-miss
    /// label is never a change, whatever the ticket holds.
    #[must_use]
    pub fn from_comparison(
        predictions: &TicketPredictions,
        record: &TicketRecord,
        processing_date: NaiveDate,
    ) -> Self {
        let differs = |field| {
            let predicted = predictions.field(field);
            predicted.has_usable_label() && predicted.label != actual_value(record, field)
        };
        Self {
            incident_id: record
                .effective_number()
                .unwrap_or_else(|| predictions.incident_id.clone()),
            date: observation_date(predictions, processing_date),
            priority: differs(TicketField::Priority),
            category: differs(TicketField::Category),
            subcategory: differs(TicketField::Subcategory),
            assignment_group: differs(TicketField::AssignmentGroup),
            mode: ChangeMode::Comparison,
        }
    }

    #[must_use]
    pub const fn changed(&self, field: TicketField) -> bool {
        match field {
            TicketField::AssignmentGroup => self.assignment_group,
            TicketField::Category => self.category,
            TicketField::Subcategory => self.subcategory,
            TicketField::Priority => self.priority,
        }
    }

    /// How many of the four fields changed.
    #[must_use]
    pub fn changed_count(&self) -> u32 {
        TicketField::ALL
            .into_iter()
            .map(|f| u32::from(self.changed(f)))
            .sum()
    }
}

/// The value a ticket currently holds for `field`.
///
/// Reference fields contribute their `value`; anything else its trimmed
/// text. Missing values compare as the empty string.
#[must_use]
pub fn actual_value(record: &TicketRecord, field: TicketField) -> String {
    let raw = match field {
        TicketField::AssignmentGroup => record.assignment_group.as_ref(),
        TicketField::Category => record.category.as_ref(),
        TicketField::Subcategory => record.subcategory.as_ref(),
        TicketField::Priority => record.priority.as_ref(),
    };
    let reference = Reference::from_raw(raw);
    if reference.has_value {
        reference.value
    } else {
        raw.and_then(scalar_text).unwrap_or_default()
    }
}

fn observation_date(predictions: &TicketPredictions, processing_date: NaiveDate) -> NaiveDate {
    predictions
        .opened_at
        .map_or(processing_date, |opened| opened.date())
}

/// Per-date change counts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportRow {
    #[serde(with = "display_date")]
    pub date: NaiveDate,
    pub priority_changed: u32,
    pub category_changed: u32,
    pub subcategory_changed: u32,
    pub assignment_group_changed: u32,
    /// Always the sum of the four field counts.
    pub total_changed: u32,
}

impl ReportRow {
    fn empty(date: NaiveDate) -> Self {
        Self {
            date,
            priority_changed: 0,
            category_changed: 0,
            subcategory_changed: 0,
            assignment_group_changed: 0,
            total_changed: 0,
        }
    }

    fn add(&mut self, observation: &ChangeObservation) {
        self.priority_changed += u32::from(observation.priority);
        self.category_changed += u32::from(observation.category);
        self.subcategory_changed += u32::from(observation.subcategory);
        self.assignment_group_changed += u32::from(observation.assignment_group);
        self.total_changed = self.priority_changed
            + self.category_changed
            + self.subcategory_changed
            + self.assignment_group_changed;
    }
}

/// Group observations by date and sum each field, oldest date first.
#[must_use]
pub fn summarize(observations: &[ChangeObservation]) -> Vec<ReportRow> {
    let mut rows: BTreeMap<NaiveDate, ReportRow> = BTreeMap::new();
    for observation in observations {
        rows.entry(observation.date)
            .or_insert_with(|| ReportRow::empty(observation.date))
            .add(observation);
    }
    rows.into_values().collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Flag {
    Yes,
    No,
}

impl From<bool> for Flag {
    fn from(value: bool) -> Self {
        if value { Self::Yes } else { Self::No }
    }
}

/// Per-incident row of the comparison (KPI) store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncidentChangeRow {
    pub incident_id: String,
    #[serde(with = "display_date")]
    pub date: NaiveDate,
    pub assignment_group_changed: Flag,
    pub category_changed: Flag,
    pub subcategory_changed: Flag,
    pub priority_changed: Flag,
    pub global_change: u32,
}

impl From<&ChangeObservation> for IncidentChangeRow {
    fn from(observation: &ChangeObservation) -> Self {
        Self {
            incident_id: observation.incident_id.clone(),
            date: observation.date,
            assignment_group_changed: observation.assignment_group.into(),
            category_changed: observation.category.into(),
            subcategory_changed: observation.subcategory.into(),
            priority_changed: observation.priority.into(),
            global_change: observation.changed_count(),
        }
    }
}

/// `DD-MM-YYYY` dates in report rows.
pub mod display_date {
    use chrono::NaiveDate;
    use serde::{Deserialize, Deserializer, Serializer};

    pub const FORMAT: &str = "%d-%m-%Y";

    /// # Errors
    ///
    /// Propagates serializer errors.
    pub fn serialize<S: Serializer>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&date.format(FORMAT))
    }

    /// # Errors
    ///
    /// Fails if the value is not a `DD-MM-YYYY` string.
    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDate, D::Error> {
        let raw = String::deserialize(deserializer)?;
        NaiveDate::parse_from_str(&raw, FORMAT).map_err(serde::de::Error::custom)
    }
}
