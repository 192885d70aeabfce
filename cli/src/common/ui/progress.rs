//! # PkgRS Progress Reporting
//!
//! File: cli/src/common/ui/progress.rs
//! Author: Christi Mahu
//!
//! **DISCLAIMER:** This repository is in the early phases of being rewritten
//! and is not suitable for production development yet.
//!
//! ## Overview
//!
//! Purely informational progress updates for long-running flows. Increments
//! add up to 100 over a complete flow.
//!
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// One progress step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressUpdate {
    pub message: String,
    pub increment: u64,
}

impl ProgressUpdate {
    pub fn new(message: impl Into<String>, increment: u64) -> Self {
        Self {
            message: message.into(),
            increment,
        }
    }
}

/// Receives progress updates.
pub trait ProgressSink: Send + Sync {
    fn report(&self, update: ProgressUpdate);

    /// Called once the flow is over, successful or not.
    fn finish(&self) {}
}

/// Discards every update.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoProgress;

impl ProgressSink for NoProgress {
    fn report(&self, _update: ProgressUpdate) {}
}

/// Progress bar on stderr. Hidden automatically when stderr is not a terminal.
pub struct TerminalProgress {
    bar: ProgressBar,
}

impl TerminalProgress {
    pub fn new(title: &str) -> Self {
        let bar = ProgressBar::new(100);
        if let Ok(style) =
            ProgressStyle::with_template("{spinner} {prefix} [{bar:30}] {pos:>3}% {msg}")
        {
            bar.set_style(style.progress_chars("=> "));
        }
        bar.set_prefix(title.to_string());
        bar.enable_steady_tick(Duration::from_millis(120));
        Self { bar }
    }
}

impl ProgressSink for TerminalProgress {
    fn report(&self, update: ProgressUpdate) {
        self.bar.inc(update.increment);
        self.bar.set_message(update.message);
    }

    fn finish(&self) {
        self.bar.finish();
    }
}

// --- Unit Tests ---
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_progress_accumulates_increments() {
        let progress = TerminalProgress::new("Install");
        progress.report(ProgressUpdate::new("Checking", 0));
        progress.report(ProgressUpdate::new("Installing", 10));
        progress.report(ProgressUpdate::new("Installed", 90));
        assert_eq!(progress.bar.position(), 100);
        assert_eq!(progress.bar.message(), "Installed");
        progress.finish();
    }
}
