//! Terminal capabilities, resolved once at startup.

use std::io::IsTerminal;
use std::sync::OnceLock;

use crate::cli::{GlobalFlags, OutputFormat};

/// Narrower `COLUMNS` values are ignored.
const MIN_WIDTH: usize = 40;

#[derive(Clone, Copy, Debug, Default)]
pub struct UiPrefs {
    /// Colour table headers and flags.
    pub table_color: bool,
    /// Draw spinners on stderr while talking to ServiceNow.
    pub progress: bool,
    /// Width tables are shrunk to fit, when known.
    pub term_width: Option<usize>,
}

impl UiPrefs {
    fn detect(flags: &GlobalFlags) -> Self {
        let no_color = std::env::var_os("NO_COLOR").is_some();
        Self {
            table_color: flags.format == OutputFormat::Table
                && !no_color
                && std::io::stdout().is_terminal(),
            progress: !(flags.quiet || flags.verbose) && std::io::stderr().is_terminal(),
            term_width: std::env::var("COLUMNS")
                .ok()
                .and_then(|raw| raw.trim().parse().ok())
                .filter(|width| *width >= MIN_WIDTH),
        }
    }
}

static PREFS: OnceLock<UiPrefs> = OnceLock::new();

pub fn init(flags: &GlobalFlags) {
    PREFS.get_or_init(|| UiPrefs::detect(flags));
}

/// Plain output (no colour, no spinners) until [`init`] runs.
#[must_use]
pub fn prefs() -> UiPrefs {
    PREFS.get().copied().unwrap_or_default()
}
