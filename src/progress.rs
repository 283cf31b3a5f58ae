//! Progress bar utilities for fast-forwarded and live sessions
//!
//! Visual feedback while the scheduler chews through simulated time, using
//! the indicatif crate.

use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Progress bar over simulated seconds
pub struct SimulationProgress {
    pub progress: ProgressBar,
    pub total_seconds: u64,
}

impl SimulationProgress {
    /// Create a new progress bar covering `total_seconds` of simulated time
    pub fn new(total_seconds: u64) -> Self {
        let progress = ProgressBar::new(total_seconds);
        let style = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len}s\n{msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-");
        progress.set_style(style);

        Self {
            progress,
            total_seconds,
        }
    }

    /// Update with the current simulated second and account value
    pub fn update(&self, second: u64, net_worth: f64, event: Option<&str>) {
        self.progress.set_position(second.min(self.total_seconds));
        match event {
            Some(headline) => self.progress.set_message(format!("💼 ${:.2} | 📰 {}", net_worth, headline)),
            None => self.progress.set_message(format!("💼 ${:.2}", net_worth)),
        }
    }

    /// Mark the run as complete
    pub fn finish(&self, net_worth: f64, trades: u64) {
        self.progress.finish_with_message(format!(
            "✅ Simulation complete! Net worth ${:.2}, {} market prints",
            net_worth, trades
        ));
    }

    /// Mark the run as failed
    pub fn finish_with_error(&self, error: &str) {
        self.progress.finish_with_message(format!("❌ Failed: {}", error));
    }
}

/// Spinner for wall-clock sessions
pub struct Spinner {
    pub spinner: ProgressBar,
}

impl Spinner {
    /// Create a new spinner
    pub fn new(message: &str) -> Self {
        let spinner = ProgressBar::new_spinner();
        let style = ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]);
        spinner.set_style(style);
        spinner.enable_steady_tick(Duration::from_millis(100));
        spinner.set_message(message.to_string());

        Self { spinner }
    }

    /// Update spinner message
    pub fn update(&self, message: &str) {
        self.spinner.set_message(message.to_string());
    }

    /// Finish spinner with success
    pub fn finish(&self, message: &str) {
        self.spinner.finish_with_message(format!("✅ {}", message));
    }
}
