use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

use crate::ui;

const TICK: Duration = Duration::from_millis(120);

/// Spinner shown while a ServiceNow call is in flight.
///
/// Without a terminal on stderr (or with `--quiet`/`--verbose`) every method
/// does nothing.
pub struct Spinner(Option<ProgressBar>);

impl Spinner {
    #[must_use]
    pub fn start(message: &str) -> Self {
        Self(ui::prefs().progress.then(|| {
            let style = ProgressStyle::with_template("{spinner:.cyan} {msg} ({elapsed})")
                .unwrap_or_else(|_| ProgressStyle::default_spinner());
            let bar = ProgressBar::new_spinner()
                .with_style(style)
                .with_message(message.to_owned());
            bar.enable_steady_tick(TICK);
            bar
        }))
    }

    pub fn finish(&self, message: &str) {
        self.0
            .iter()
            .for_each(|bar| bar.finish_with_message(message.to_owned()));
    }

    pub fn fail(&self, message: &str) {
        self.0
            .iter()
            .for_each(|bar| bar.abandon_with_message(message.to_owned()));
    }
}

impl Drop for Spinner {
    // A spinner dropped on an early `?` return is cleared rather than left ticking.
    fn drop(&mut self) {
        for bar in self.0.iter().filter(|bar| !bar.is_finished()) {
            bar.finish_and_clear();
        }
    }
}
