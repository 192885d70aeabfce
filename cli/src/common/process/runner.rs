//! # PkgRS Process Runner
//!
//! File: cli/src/common/process/runner.rs
//! Author: Christi Mahu
//!
//! **DISCLAIMER:** This repository is in the early phases of being rewritten
//! and is not suitable for production development yet.
//!
//! ## Overview
//!
//! Spawns one OS process per command line and resolves with a
//! [`ProcessOutcome`]. The process is started immediately by
//! [`ProcessRunner::spawn`]; the caller suspends on [`RunningProcess::wait`]
//! until it exits.
//!
//! ## Architecture
//!
//! `spawn` hands the child to a supervisor task which:
//! 1. Emits a `Started` event and starts one reader task per output pipe. Each
//!    reader appends raw text to a shared buffer and sends every line to the
//!    output sink as it arrives.
//! 2. Waits for the child to exit, or for the kill switch to fire, in which
//!    case the child is killed forcefully (no graceful negotiation).
//! 3. Drains the readers (bounded by a short grace period after a kill, since
//!    grandchildren may keep the pipes open), emits `Finished`, waits for the
//!    sink to flush and finally sends the outcome on a one-shot channel.
//!
//! A killed process still resolves normally, carrying whatever output was
//! captured before termination. There is no built-in timeout: race `wait`
//! against a timer and call `kill` on expiry.
//!
//! ```rust
//! let running = runner.spawn("choco upgrade all -y");
//! let kill = running.kill_switch();
//! let timer = tokio::spawn(async move {
//!     tokio::time::sleep(Duration::from_secs(600)).await;
//!     kill.kill();
//! });
//! let outcome = running.wait().await; // partial output if the timer fired
//! timer.abort();
//! ```
//!
use super::sink::{forward_events, OutputEvent, OutputSink};
use super::{ProcessOutcome, SpawnError};
use async_trait::async_trait;
use std::process::Stdio;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::{Child, Command};
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, instrument, warn};

/// How long readers may keep draining after a kill before being abandoned.
const KILL_DRAIN_GRACE: Duration = Duration::from_millis(250);

/// Anything that can turn a command line into a [`ProcessOutcome`].
///
/// [`ProcessRunner`] is the real implementation; tests substitute scripted
/// runners at this seam.
#[async_trait]
pub trait CommandRunner: Send + Sync {
    async fn run(&self, command_line: &str) -> ProcessOutcome;
}

/// Launches command lines through a shell program.
pub struct ProcessRunner {
    program: String,
    args: Vec<String>,
    sink: Arc<dyn OutputSink>,
}

impl ProcessRunner {
    /// `program` is invoked as `program <args...> <command_line>`.
    pub fn new(program: impl Into<String>, args: Vec<String>, sink: Arc<dyn OutputSink>) -> Self {
        Self {
            program: program.into(),
            args,
            sink,
        }
    }

    /// Starts the process and returns a handle to it.
    ///
    /// Must be called from within a Tokio runtime. A spawn failure does not
    /// panic or error: the handle resolves with an outcome carrying the
    /// spawn error.
    #[instrument(skip_all, fields(shell = %self.program))]
    pub fn spawn(&self, command_line: &str) -> RunningProcess {
        let mut command = Command::new(&self.program);
        command
            .args(&self.args)
            .arg(command_line)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let cancel = CancellationToken::new();
        let (outcome_tx, outcome_rx) = oneshot::channel();

        let pid = match command.spawn() {
            Ok(child) => {
                let pid = child.id();
                debug!("Spawned process {:?}", pid);
                tokio::spawn(supervise(
                    child,
                    cancel.clone(),
                    Arc::clone(&self.sink),
                    outcome_tx,
                ));
                pid
            }
            Err(e) => {
                warn!("Failed to spawn '{}': {}", self.program, e);
                let _ = outcome_tx.send(ProcessOutcome::spawn_failed(SpawnError::from(&e)));
                None
            }
        };

        RunningProcess {
            pid,
            kill_switch: KillSwitch(cancel),
            outcome: outcome_rx,
        }
    }
}

#[async_trait]
impl CommandRunner for ProcessRunner {
    async fn run(&self, command_line: &str) -> ProcessOutcome {
        self.spawn(command_line).wait().await
    }
}

/// Cloneable handle that forcefully terminates a running process.
#[derive(Debug, Clone)]
pub struct KillSwitch(CancellationToken);

impl KillSwitch {
    /// Sends the kill. A no-op once the process has exited.
    pub fn kill(&self) {
        self.0.cancel();
    }
}

/// A spawned process whose outcome has not been collected yet.
#[derive(Debug)]
pub struct RunningProcess {
    pid: Option<u32>,
    kill_switch: KillSwitch,
    outcome: oneshot::Receiver<ProcessOutcome>,
}

impl RunningProcess {
    /// OS process id, absent when the spawn failed.
    #[allow(dead_code)] // Kill/timeout API; the CLI commands only run to completion.
    pub fn pid(&self) -> Option<u32> {
        self.pid
    }

    #[allow(dead_code)] // Kill/timeout API; the CLI commands only run to completion.
    pub fn kill(&self) {
        self.kill_switch.kill();
    }

    #[allow(dead_code)] // Kill/timeout API; the CLI commands only run to completion.
    pub fn kill_switch(&self) -> KillSwitch {
        self.kill_switch.clone()
    }

    /// Suspends until the process has exited and returns its outcome.
    pub async fn wait(self) -> ProcessOutcome {
        self.outcome.await.unwrap_or_else(|_| {
            ProcessOutcome::spawn_failed(SpawnError {
                kind: "Interrupted".to_string(),
                detail: "process supervisor stopped before reporting an outcome".to_string(),
            })
        })
    }
}

#[derive(Clone, Copy)]
enum Stream {
    Stdout,
    Stderr,
}

impl Stream {
    fn event(self, line: String) -> OutputEvent {
        match self {
            Stream::Stdout => OutputEvent::Stdout(line),
            Stream::Stderr => OutputEvent::Stderr(line),
        }
    }
}

async fn supervise(
    mut child: Child,
    cancel: CancellationToken,
    sink: Arc<dyn OutputSink>,
    outcome_tx: oneshot::Sender<ProcessOutcome>,
) {
    let pid = child.id().unwrap_or_default();
    let (events, sink_task) = forward_events(sink);
    let _ = events.send(OutputEvent::Started { pid });

    let stdout_buf = Arc::new(Mutex::new(String::new()));
    let stderr_buf = Arc::new(Mutex::new(String::new()));
    let readers: Vec<JoinHandle<()>> = [
        child.stdout.take().map(|out| {
            tokio::spawn(read_lines(
                out,
                Stream::Stdout,
                events.clone(),
                Arc::clone(&stdout_buf),
            ))
        }),
        child.stderr.take().map(|err| {
            tokio::spawn(read_lines(
                err,
                Stream::Stderr,
                events.clone(),
                Arc::clone(&stderr_buf),
            ))
        }),
    ]
    .into_iter()
    .flatten()
    .collect();

    let (status, killed) = tokio::select! {
        status = child.wait() => (status, false),
        _ = cancel.cancelled() => {
            debug!("Killing process {}", pid);
            if let Err(e) = child.start_kill() {
                debug!("Kill of process {} failed: {}", pid, e);
            }
            (child.wait().await, true)
        }
    };

    for reader in readers {
        if killed {
            let abort = reader.abort_handle();
            if tokio::time::timeout(KILL_DRAIN_GRACE, reader).await.is_err() {
                abort.abort();
            }
        } else if let Err(e) = reader.await {
            warn!("Output reader for process {} failed: {}", pid, e);
        }
    }

    let exit_code = match status {
        Ok(status) => status.code(),
        Err(e) => {
            warn!("Waiting on process {} failed: {}", pid, e);
            None
        }
    };
    let _ = events.send(OutputEvent::Finished { pid, exit_code });
    drop(events);
    let _ = sink_task.await;

    let outcome = ProcessOutcome {
        stdout: take_buffer(&stdout_buf),
        stderr: take_buffer(&stderr_buf),
        exit_code,
        spawn_error: None,
    };
    // The receiver may be gone if the caller dropped the handle.
    let _ = outcome_tx.send(outcome);
}

async fn read_lines<R: AsyncRead + Unpin>(
    pipe: R,
    stream: Stream,
    events: mpsc::UnboundedSender<OutputEvent>,
    buffer: Arc<Mutex<String>>,
) {
    let mut reader = BufReader::new(pipe);
    let mut raw = Vec::new();
    loop {
        raw.clear();
        match reader.read_until(b'\n', &mut raw).await {
            Ok(0) => break, // EOF
            Ok(_) => {
                let chunk = String::from_utf8_lossy(&raw);
                buffer
                    .lock()
                    .unwrap_or_else(|poisoned| poisoned.into_inner())
                    .push_str(&chunk);
                let line = chunk.trim_end_matches(|c| c == '\n' || c == '\r');
                let _ = events.send(stream.event(line.to_string()));
            }
            Err(e) => {
                warn!("Error reading process output: {}", e);
                break;
            }
        }
    }
}

fn take_buffer(buffer: &Mutex<String>) -> String {
    std::mem::take(&mut *buffer.lock().unwrap_or_else(|poisoned| poisoned.into_inner()))
}
