use triage_pipeline::{ChangeObservation, Flag, IncidentChangeRow, summarize};
use triage_servicenow::{TicketFilter, TicketQuery};

use crate::cli::GlobalFlags;
use crate::cli::root_commands::CompareArgs;
use crate::commands::shared;
use crate::context::AppContext;
use crate::output::{Tabular, output};

impl Tabular for IncidentChangeRow {
    const HEADERS: &'static [&'static str] = &[
        "incident",
        "date",
        "assignment_group",
        "category",
        "subcategory",
        "priority",
        "global",
    ];

    fn cells(&self) -> Vec<String> {
        let flag = |f: Flag| format!("{f:?}");
        vec![
            self.incident_id.clone(),
            self.date.format(triage_pipeline::report::display_date::FORMAT).to_string(),
            flag(self.assignment_group_changed),
            flag(self.category_changed),
            flag(self.subcategory_changed),
            flag(self.priority_changed),
            self.global_change.to_string(),
        ]
    }
}

fn compare_query(args: &CompareArgs, limit: Option<u32>) -> TicketQuery {
    let query = args.query.clone().map_or_else(TicketQuery::resolved_or_closed, |raw| {
        TicketQuery::new(TicketFilter::Raw(raw))
    });
    query
        .with_fields(shared::TICKET_FIELDS.iter().copied())
        .with_limit(limit)
}

/// Handle `triage compare`.
///
/// Predicts on resolved/closed tickets and records, per incident, which
/// predicted fields differ from what the ticket ended up with.
pub async fn handle(args: &CompareArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let now = shared::processing_time();
    let limit = shared::effective_limit(flags.limit, ctx.config.source.limit);
    let batch = shared::load_tickets(args.input.as_deref(), &compare_query(args, limit), ctx).await?;

    let ensemble = ctx.ensemble()?;
    let observations: Vec<ChangeObservation> = ensemble
        .predict_batch(&batch, now)
        .into_iter()
        .flatten()
        .map(|ticket| ChangeObservation::from_comparison(&ticket.predictions, ticket.record, now.date()))
        .collect();

    let rows: Vec<IncidentChangeRow> = observations.iter().map(IncidentChangeRow::from).collect();
    ctx.changes_store().append(&rows)?;
    let summary = summarize(&observations);
    ctx.summary_store().append(&summary)?;
    tracing::info!(
        incidents = rows.len(),
        days = summary.len(),
        changed = rows.iter().filter(|r| r.global_change > 0).count(),
        "comparison recorded"
    );

    output(&rows, flags.format)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_query_targets_resolved_and_closed() {
        let args = CompareArgs {
            input: None,
            query: None,
        };
        let query = compare_query(&args, Some(100));
        assert_eq!(query.sysparm_query(), "state=6^ORstate=7");
        assert_eq!(query.limit, Some(100));
    }

    #[test]
    fn raw_query_overrides_default() {
        let args = CompareArgs {
            input: None,
            query: Some("state=7^assignment_group!=NULL".into()),
        };
        assert_eq!(
            compare_query(&args, None).sysparm_query(),
            "state=7^assignment_group!=NULL"
        );
    }
}
