use triage_core::TicketPredictions;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::SourceArgs;
use crate::commands::shared;
use crate::context::AppContext;
use crate::output::{Tabular, confidence, output};

impl Tabular for TicketPredictions {
    const HEADERS: &'static [&'static str] = &[
        "incident",
        "assignment_group",
        "conf",
        "category",
        "conf",
        "subcategory",
        "conf",
        "priority",
        "conf",
    ];

    fn cells(&self) -> Vec<String> {
        let mut cells = vec![self.incident_id.clone()];
        for (_, prediction) in self.fields() {
            cells.push(prediction.label.clone());
            cells.push(confidence(prediction.confidence));
        }
        cells
    }
}

/// Handle `triage predict`.
pub async fn handle(args: &SourceArgs, ctx: &AppContext, flags: &GlobalFlags) -> anyhow::Result<()> {
    let predictions = run(args, ctx, flags).await?;
    output(&predictions, flags.format)
}

/// Fetch, normalize and predict. Shared with `triage update`.
pub async fn run(
    args: &SourceArgs,
    ctx: &AppContext,
    flags: &GlobalFlags,
) -> anyhow::Result<Vec<TicketPredictions>> {
    let now = shared::processing_time();
    let window = args.window_minutes.unwrap_or(ctx.config.source.window_minutes);
    let limit = shared::effective_limit(flags.limit, ctx.config.source.limit);
    let query = shared::window_query(now, window, limit);

    let batch = shared::load_tickets(args.input.as_deref(), &query, ctx).await?;
    let predictions = shared::predict_all(ctx, &batch, now)?;
    tracing::info!(
        fetched = batch.len(),
        predicted = predictions.len(),
        "prediction cycle finished"
    );
    Ok(predictions)
}
