//! In-place progress line for a running remux

use std::io::IsTerminal;

use indicatif::{ProgressBar, ProgressStyle};

use crate::utils::time::format_hms;

/// Shows the largest timestamp copied so far, redrawn on one line of stderr
pub struct ProgressReporter {
    bar: ProgressBar,
    max_seconds: f64,
    packets: u64,
}

impl ProgressReporter {
    /// A visible spinner when `enabled` and stderr is a terminal, otherwise a no-op reporter
    pub fn new(enabled: bool) -> Self {
        if !enabled || !std::io::stderr().is_terminal() {
            return Self::hidden();
        }

        let bar = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::with_template("  {spinner:.magenta} time: {msg}") {
            bar.set_style(style);
        }
        bar.set_message(format_hms(0.0));

        Self {
            bar,
            max_seconds: 0.0,
            packets: 0,
        }
    }

    pub fn hidden() -> Self {
        Self {
            bar: ProgressBar::hidden(),
            max_seconds: 0.0,
            packets: 0,
        }
    }

    /// Record one copied packet stamped at `seconds`
    pub fn observe(&mut self, seconds: Option<f64>) {
        self.packets += 1;
        if let Some(seconds) = seconds.filter(|s| s.is_finite()) {
            if seconds > self.max_seconds {
                self.max_seconds = seconds;
                self.bar.set_message(format_hms(seconds));
            }
        }
        self.bar.tick();
    }

    /// Largest timestamp seen, in seconds
    pub fn max_seconds(&self) -> f64 {
        self.max_seconds
    }

    pub fn packets(&self) -> u64 {
        self.packets
    }

    /// Remove the line from the terminal
    pub fn finish(&self) {
        self.bar.finish_and_clear();
    }
}
