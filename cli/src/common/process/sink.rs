//! # PkgRS Process Output Sink
//!
//! File: cli/src/common/process/sink.rs
//! Author: Christi Mahu
//!
//! **DISCLAIMER:** This repository is in the early phases of being rewritten
//! and is not suitable for production development yet.
//!
//! ## Overview
//!
//! The observability side channel of a running process. The runner turns
//! everything a process prints into [`OutputEvent`]s and pushes them through an
//! unbounded channel; a dedicated task drains the channel into an
//! [`OutputSink`]. The channel only carries line events. Termination is
//! reported separately by the runner's one-shot outcome, so a consumer can tell
//! "more output coming" from "process exited".
//!
//! Sinks cannot fail a command: their methods return nothing and a closed
//! channel is ignored by the producer.
//!
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// A single observation of a running process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputEvent {
    Started { pid: u32 },
    Stdout(String),
    Stderr(String),
    Finished { pid: u32, exit_code: Option<i32> },
}

/// Receives process output as it arrives.
pub trait OutputSink: Send + Sync {
    /// A line written to stdout (line terminator stripped).
    fn log(&self, line: &str);

    /// A line written to stderr (line terminator stripped).
    fn log_error(&self, line: &str);

    fn started(&self, _pid: u32) {}

    fn finished(&self, _pid: u32, _exit_code: Option<i32>) {}
}

/// Default sink: forwards everything to `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl OutputSink for TracingSink {
    fn log(&self, line: &str) {
        info!(target: "pkgrs::output", "{}", line);
    }

    fn log_error(&self, line: &str) {
        warn!(target: "pkgrs::output", "{}", line);
    }

    fn started(&self, pid: u32) {
        debug!(target: "pkgrs::output", "PID [{}] started", pid);
    }

    fn finished(&self, pid: u32, exit_code: Option<i32>) {
        debug!(target: "pkgrs::output", "PID [{}] finished (exit code: {:?})", pid, exit_code);
    }
}

/// Spawns the task that drains events into `sink`.
///
/// The task ends once every sender has been dropped.
pub fn forward_events(
    sink: Arc<dyn OutputSink>,
) -> (mpsc::UnboundedSender<OutputEvent>, JoinHandle<()>) {
    let (tx, mut rx) = mpsc::unbounded_channel::<OutputEvent>();
    let handle = tokio::spawn(async move {
        while let Some(event) = rx.recv().await {
            match event {
                OutputEvent::Started { pid } => sink.started(pid),
                OutputEvent::Stdout(line) => sink.log(&line),
                OutputEvent::Stderr(line) => sink.log_error(&line),
                OutputEvent::Finished { pid, exit_code } => sink.finished(pid, exit_code),
            }
        }
    });
    (tx, handle)
}
