use clap::Parser;

pub mod global;
pub mod root_commands;

pub use global::{GlobalFlags, OutputFormat};
pub use root_commands::Commands;

/// `triage` command line.
#[derive(Debug, Parser)]
#[command(
    name = "triage",
    version,
    about = "Confidence-gated ServiceNow incident classification"
)]
pub struct Cli {
    #[command(flatten)]
    pub flags: GlobalFlags,

    #[command(subcommand)]
    pub command: Commands,
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use clap::{CommandFactory, Parser};

    use super::{Cli, Commands, OutputFormat};

    #[test]
    fn clap_command_tree_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn global_flags_parse_before_subcommand() {
        let cli = Cli::try_parse_from(["triage", "--format", "table", "--limit", "10", "predict"])
            .expect("cli should parse");

        assert_eq!(cli.flags.format, OutputFormat::Table);
        assert_eq!(cli.flags.limit, Some(10));
        assert!(matches!(cli.command, Commands::Predict(_)));
    }

    #[test]
    fn global_flags_parse_after_subcommand() {
        let cli = Cli::try_parse_from(["triage", "report", "--format", "raw", "--quiet"])
            .expect("cli should parse");

        assert_eq!(cli.flags.format, OutputFormat::Raw);
        assert!(cli.flags.quiet);
        assert!(matches!(cli.command, Commands::Report(ref args) if !args.changes));
    }

    #[test]
    fn source_args_parse() {
        let cli = Cli::try_parse_from([
            "triage",
            "update",
            "--input",
            "dump.txt",
            "--window-minutes",
            "30",
        ])
        .expect("cli should parse");

        let Commands::Update(args) = cli.command else {
            panic!("expected update");
        };
        assert_eq!(args.input, Some(PathBuf::from("dump.txt")));
        assert_eq!(args.window_minutes, Some(30));
    }

    #[test]
    fn zero_window_is_rejected() {
        let parsed = Cli::try_parse_from(["triage", "predict", "--window-minutes", "0"]);
        assert!(parsed.is_err());
    }

    #[test]
    fn compare_rejects_input_with_query() {
        let parsed = Cli::try_parse_from([
            "triage", "compare", "--input", "dump.txt", "--query", "state=7",
        ]);
        assert!(parsed.is_err());
    }

    #[test]
    fn format_defaults_to_json() {
        let cli = Cli::try_parse_from(["triage", "report"]).expect("cli should parse");
        assert_eq!(cli.flags.format, OutputFormat::Json);
        assert_eq!(cli.flags.limit, None);
    }

    #[test]
    fn quiet_and_verbose_conflict() {
        assert!(Cli::try_parse_from(["triage", "-q", "-v", "report"]).is_err());
    }

    #[test]
    fn output_format_rejects_invalid_value() {
        assert!(Cli::try_parse_from(["triage", "--format", "xml", "report"]).is_err());
    }
}
