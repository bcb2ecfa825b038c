//! Encoded-query builder for Table API list calls.

use chrono::NaiveDateTime;

/// Incident `state` codes used in filters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IncidentState {
    Resolved,
    Closed,
}

impl IncidentState {
    #[must_use]
    pub const fn code(self) -> u8 {
        match self {
            Self::Resolved => 6,
            Self::Closed => 7,
        }
    }
}

/// Which incidents a list call returns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TicketFilter {
    /// Active incidents created at or after the timestamp (UTC).
    CreatedSince(NaiveDateTime),
    /// Incidents in any of the given states.
    StateIn(Vec<IncidentState>),
    /// Operator-supplied `sysparm_query`, passed through unchanged.
    Raw(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TicketQuery {
    pub filter: TicketFilter,
    /// `sysparm_fields` projection. Empty means all fields.
    pub fields: Vec<String>,
    /// `sysparm_limit` cap.
    pub limit: Option<u32>,
}

impl TicketQuery {
    #[must_use]
    pub const fn new(filter: TicketFilter) -> Self {
        Self {
            filter,
            fields: Vec::new(),
            limit: None,
        }
    }

    /// Active incidents created since `since`.
    #[must_use]
    pub const fn created_since(since: NaiveDateTime) -> Self {
        Self::new(TicketFilter::CreatedSince(since))
    }

    /// Resolved or closed incidents, for comparing predictions with outcomes.
    #[must_use]
    pub fn resolved_or_closed() -> Self {
        Self::new(TicketFilter::StateIn(vec![
            IncidentState::Resolved,
            IncidentState::Closed,
        ]))
    }

    #[must_use]
    pub fn with_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fields = fields.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub const fn with_limit(mut self, limit: Option<u32>) -> Self {
        self.limit = limit;
        self
    }

    /// The unencoded `sysparm_query` value.
    #[must_use]
    pub fn sysparm_query(&self) -> String {
        match &self.filter {
            TicketFilter::CreatedSince(since) => format!(
                "sys_created_on>={}^active=true",
                since.format("%Y-%m-%d %H:%M:%S")
            ),
            TicketFilter::StateIn(states) => states
                .iter()
                .enumerate()
                .map(|(i, s)| {
                    if i == 0 {
                        format!("state={}", s.code())
                    } else {
                        format!("^ORstate={}", s.code())
                    }
                })
                .collect(),
            TicketFilter::Raw(raw) => raw.clone(),
        }
    }

    /// URL query string (without the leading `?`).
    #[must_use]
    pub fn to_query_string(&self) -> String {
        let mut parts = vec![format!(
            "sysparm_query={}",
            urlencoding::encode(&self.sysparm_query())
        )];
        if !self.fields.is_empty() {
            parts.push(format!(
                "sysparm_fields={}",
                urlencoding::encode(&self.fields.join(","))
            ));
        }
        if let Some(limit) = self.limit {
            parts.push(format!("sysparm_limit={limit}"));
        }
        parts.join("&")
    }
}
