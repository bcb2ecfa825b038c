use triage_pipeline::{IncidentChangeRow, ReportRow};

use crate::cli::GlobalFlags;
use crate::cli::root_commands::ReportArgs;
use crate::context::AppContext;
use crate::output::{Tabular, output};

impl Tabular for ReportRow {
    const HEADERS: &'static [&'static str] = &[
        "date",
        "priority",
        "category",
        "subcategory",
        "assignment_group",
        "total",
    ];

    fn cells(&self) -> Vec<String> {
        vec![
            self.date.format(triage_pipeline::report::display_date::FORMAT).to_string(),
            self.priority_changed.to_string(),
            self.category_changed.to_string(),
            self.subcategory_changed.to_string(),
            self.assignment_group_changed.to_string(),
            self.total_changed.to_string(),
        ]
    }
}

/// The most recent `limit` rows, oldest first.
fn tail<T>(mut rows: Vec<T>, limit: Option<u32>) -> Vec<T> {
    if let Some(limit) = limit.and_then(|l| usize::try_from(l).ok()) {
        let skip = rows.len().saturating_sub(limit);
        rows.drain(..skip);
    }
    rows
}

/// Handle `triage report`.
pub fn handle(args: &ReportArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    if args.changes {
        let rows: Vec<IncidentChangeRow> = ctx.changes_store().load()?;
        output(&tail(rows, flags.limit), flags.format)
    } else {
        let rows: Vec<ReportRow> = ctx.summary_store().load()?;
        output(&tail(rows, flags.limit), flags.format)
    }
}
