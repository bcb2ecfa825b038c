//! The partial update sent back to the ticket store.

use std::collections::BTreeMap;

use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::prediction::TicketField;

/// Column that carries the actor marker on every update.
pub const ACTOR_FIELD: &str = "sys_updated_by";

/// Gated predictions cleared for writing, plus the actor marker.
///
/// Serializes to a flat JSON object:
/// `{ "sys_updated_by": "...", "assignment_group": "...", ... }`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdatePayload {
    actor: String,
    fields: BTreeMap<TicketField, String>,
}

impl UpdatePayload {
    #[must_use]
    pub fn new(actor: impl Into<String>) -> Self {
        Self {
            actor: actor.into(),
            fields: BTreeMap::new(),
        }
    }

    pub fn insert(&mut self, field: TicketField, label: impl Into<String>) {
        self.fields.insert(field, label.into());
    }

    #[must_use]
    pub fn get(&self, field: TicketField) -> Option<&str> {
        self.fields.get(&field).map(String::as_str)
    }

    #[must_use]
    pub fn contains(&self, field: TicketField) -> bool {
        self.fields.contains_key(&field)
    }

    /// The assignment group is the trigger for any update.
    #[must_use]
    pub fn has_trigger(&self) -> bool {
        self.contains(TicketField::AssignmentGroup)
    }

    #[must_use]
    pub fn actor(&self) -> &str {
        &self.actor
    }

    /// Number of predicted fields (the actor marker is not counted).
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn fields(&self) -> impl Iterator<Item = (TicketField, &str)> {
        self.fields.iter().map(|(f, v)| (*f, v.as_str()))
    }
}

impl Serialize for UpdatePayload {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len() + 1))?;
        map.serialize_entry(ACTOR_FIELD, &self.actor)?;
        for (field, label) in &self.fields {
            map.serialize_entry(field.as_str(), label)?;
        }
        map.end()
    }
}
