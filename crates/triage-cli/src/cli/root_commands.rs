use std::path::PathBuf;

use clap::{Args, Subcommand};

/// Top-level command tree.
#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    /// Predict assignment group, category, subcategory and priority.
    Predict(SourceArgs),
    /// Predict, then write confident predictions back to ServiceNow.
    Update(SourceArgs),
    /// Compare predictions against resolved tickets' actual values.
    Compare(CompareArgs),
    /// Show the accumulated report store.
    Report(ReportArgs),
}

/// Where `predict` and `update` read tickets from.
#[derive(Clone, Debug, Args)]
pub struct SourceArgs {
    /// Saved API response to read instead of querying ServiceNow.
    #[arg(long)]
    pub input: Option<PathBuf>,
    /// Poll window: tickets created in the last N minutes.
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    pub window_minutes: Option<u32>,
}

/// Arguments for `triage compare`.
#[derive(Clone, Debug, Args)]
pub struct CompareArgs {
    /// Saved API response to read instead of querying ServiceNow.
    #[arg(long)]
    pub input: Option<PathBuf>,
    /// Encoded query overriding the default resolved/closed filter.
    #[arg(long, conflicts_with = "input")]
    pub query: Option<String>,
}

/// Arguments for `triage report`.
#[derive(Clone, Debug, Args)]
pub struct ReportArgs {
    /// Show per-incident change rows instead of the daily summary.
    #[arg(long)]
    pub changes: bool,
}
