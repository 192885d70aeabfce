//! # PkgRS Process Execution (`common::process`)
//!
//! File: cli/src/common/process/mod.rs
//! Author: Christi Mahu
//!
//! **DISCLAIMER:** This repository is in the early phases of being rewritten
//! and is not suitable for production development yet.
//!

//! ## Overview
//!
//! Running external commands and interpreting what they did:
//!
//! - **`runner`**: spawns one process per command line, streams its output to
//!   an observability sink and resolves with a [`ProcessOutcome`]. Exposes a
//!   forceful kill.
//! - **`sink`**: the line-event channel between a running process and the
//!   [`OutputSink`] that observes it.
//! - **`normalize`**: turns a `ProcessOutcome` into a `TaskResult`.
//!
//! A `ProcessOutcome` is created once per run, consumed immediately by
//! `normalize` and discarded.
//!
pub mod normalize;
pub mod runner;
pub mod sink;

pub use normalize::normalize;
pub use runner::{CommandRunner, ProcessRunner};
pub use sink::{OutputSink, TracingSink};

/// The OS could not launch the process at all.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpawnError {
    /// Error kind name, e.g. `NotFound` or `PermissionDenied`.
    pub kind: String,
    pub detail: String,
}

impl From<&std::io::Error> for SpawnError {
    fn from(e: &std::io::Error) -> Self {
        Self {
            kind: format!("{:?}", e.kind()),
            detail: e.to_string(),
        }
    }
}

/// Raw result of one process execution.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessOutcome {
    pub stdout: String,
    pub stderr: String,
    /// Absent when the process never started or was terminated by a signal.
    pub exit_code: Option<i32>,
    /// Present only if the OS could not launch the process.
    pub spawn_error: Option<SpawnError>,
}

impl ProcessOutcome {
    /// Outcome of a process that could not be started.
    pub fn spawn_failed(error: SpawnError) -> Self {
        Self {
            spawn_error: Some(error),
            ..Default::default()
        }
    }

    /// Outcome of a process that ran and exited with `code`.
    #[cfg(test)]
    pub fn exited(code: i32, stdout: impl Into<String>, stderr: impl Into<String>) -> Self {
        Self {
            stdout: stdout.into(),
            stderr: stderr.into(),
            exit_code: Some(code),
            spawn_error: None,
        }
    }
}
