use std::path::Path;

use anyhow::Context;
use chrono::{Duration, NaiveDateTime, Utc};
use triage_core::{TicketBatch, TicketPredictions};
use triage_servicenow::TicketQuery;

use crate::context::AppContext;
use crate::progress::Spinner;

/// Columns requested from the incident table.
pub const TICKET_FIELDS: &[&str] = &[
    "number",
    "task_effective_number",
    "subcategory",
    "category",
    "priority",
    "cmdb_ci",
    "location",
    "business_unit",
    "company",
    "team_classification",
    "caller_id",
    "opened_by",
    "assignment_group",
    "opened_at",
    "impact",
    "urgency",
];

/// Result cap with precedence: global flag -> config.
#[must_use]
pub fn effective_limit(flag: Option<u32>, configured: Option<u32>) -> Option<u32> {
    flag.or(configured)
}

/// The timestamp stamped on a run: fallback `opened_at` and report date.
#[must_use]
pub fn processing_time() -> NaiveDateTime {
    Utc::now().naive_utc()
}

/// The poll query: active incidents created in the last `window_minutes`.
#[must_use]
pub fn window_query(now: NaiveDateTime, window_minutes: u32, limit: Option<u32>) -> TicketQuery {
    TicketQuery::created_since(now - Duration::minutes(i64::from(window_minutes)))
        .with_fields(TICKET_FIELDS.iter().copied())
        .with_limit(limit)
}

/// Read tickets from a saved dump, or run `query` against ServiceNow.
///
/// An unreadable or unparseable dump aborts the run: there is nothing to
/// recover tickets from.
pub async fn load_tickets(
    input: Option<&Path>,
    query: &TicketQuery,
    ctx: &AppContext,
) -> anyhow::Result<TicketBatch> {
    if let Some(path) = input {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read ticket dump {}", path.display()))?;
        let mut batch = TicketBatch::from_response_text(&text)
            .with_context(|| format!("failed to parse ticket dump {}", path.display()))?;
        if let Some(limit) = query.limit {
            batch.result.truncate(usize::try_from(limit).unwrap_or(usize::MAX));
        }
        tracing::info!(
            path = %path.display(),
            count = batch.len(),
            rejected = batch.rejected,
            "loaded ticket dump"
        );
        return Ok(batch);
    }

    let client = ctx.servicenow()?;
    let spinner = Spinner::start("Fetching incidents from ServiceNow");
    match client.list_incidents(query).await {
        Ok(batch) => {
            spinner.finish(&format!("Fetched {} incidents", batch.len()));
            Ok(batch)
        }
        Err(error) => {
            spinner.fail("Fetch failed");
            Err(error).context("failed to fetch incidents")
        }
    }
}

/// Predictions for every ticket that made it through normalization and
/// inference. Failures are logged by the pipeline and dropped here.
pub fn predict_all(
    ctx: &AppContext,
    batch: &TicketBatch,
    as_of: NaiveDateTime,
) -> anyhow::Result<Vec<TicketPredictions>> {
    let ensemble = ctx.ensemble()?;
    Ok(ensemble
        .predict_batch(batch, as_of)
        .into_iter()
        .flatten()
        .map(|ticket| ticket.predictions)
        .collect())
}
