use clap::{Args, ValueEnum};

/// How command results are written to stdout.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, ValueEnum)]
pub enum OutputFormat {
    /// Pretty-printed JSON
    #[default]
    Json,
    /// Aligned columns
    Table,
    /// One compact JSON document per line
    Raw,
}

/// Flags accepted before or after any subcommand.
#[derive(Clone, Copy, Debug, Default, Args)]
pub struct GlobalFlags {
    /// Output format
    #[arg(short, long, global = true, value_enum, default_value_t)]
    pub format: OutputFormat,

    /// Max tickets to fetch, or report rows to show
    #[arg(short, long, global = true)]
    pub limit: Option<u32>,

    /// Errors only
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}
