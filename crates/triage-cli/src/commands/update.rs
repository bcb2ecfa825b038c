use serde::Serialize;
use triage_core::{PipelineError, TicketPredictions};
use triage_pipeline::{
    BatchOutcome, ChangeObservation, ReconciliationRecord, reconcile_batch, summarize,
};

use crate::cli::GlobalFlags;
use crate::cli::root_commands::SourceArgs;
use crate::commands::{predict, shared};
use crate::context::AppContext;
use crate::output::{Tabular, output};
use crate::progress::Spinner;

/// Per-ticket outcome of `triage update`.
#[derive(Debug, Serialize)]
struct UpdateRow {
    incident_id: String,
    state: String,
    sys_id: Option<String>,
    fields: Vec<String>,
    error: Option<String>,
}

impl UpdateRow {
    fn from_result(
        ticket: &TicketPredictions,
        result: &Result<ReconciliationRecord, PipelineError>,
    ) -> Self {
        match result {
            Ok(record) => Self {
                incident_id: record.incident_id.clone(),
                state: record.state.to_string(),
                sys_id: Some(record.sys_id.clone()),
                fields: record.gated_fields.iter().map(ToString::to_string).collect(),
                error: None,
            },
            Err(error) => Self {
                incident_id: ticket.incident_id.clone(),
                state: error
                    .terminal_state()
                    .map_or_else(|| "error".to_string(), |s| s.to_string()),
                sys_id: None,
                fields: Vec::new(),
                error: Some(error.to_string()),
            },
        }
    }
}

impl Tabular for UpdateRow {
    const HEADERS: &'static [&'static str] = &["incident", "state", "fields", "error"];

    fn cells(&self) -> Vec<String> {
        vec![
            self.incident_id.clone(),
            self.state.clone(),
            self.fields.join(","),
            self.error.clone().unwrap_or_default(),
        ]
    }
}

/// Handle `triage update`.
pub async fn handle(args: &SourceArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let predictions = predict::run(args, ctx, flags).await?;
    let client = ctx.servicenow()?;

    let spinner = Spinner::start(&format!("Reconciling {} tickets", predictions.len()));
    let outcome: BatchOutcome = reconcile_batch(
        &client,
        &ctx.update_gate(),
        &ctx.config.update.actor,
        &predictions,
    )
    .await;
    spinner.finish("Reconciled");

    if let Some(response) = &outcome.last_response {
        tracing::debug!(%response, "last update response");
    }

    let processing_date = shared::processing_time().date();
    let report_gate = ctx.report_gate();
    let observations: Vec<ChangeObservation> = predictions
        .iter()
        .map(|p| ChangeObservation::from_confidence(p, &report_gate, processing_date))
        .collect();
    let appended = ctx.summary_store().append(&summarize(&observations))?;
    tracing::info!(rows = appended, path = %ctx.summary_store().path().display(), "summary updated");

    let rows: Vec<UpdateRow> = predictions
        .iter()
        .zip(&outcome.results)
        .map(|(ticket, result)| UpdateRow::from_result(ticket, result))
        .collect();
    output(&rows, flags.format)
}
