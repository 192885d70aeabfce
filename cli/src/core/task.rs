//! # PkgRS Task Result
//!
//! File: cli/src/core/task.rs
//! Author: Christi Mahu
//!
//! **DISCLAIMER:** This repository is in the early phases of being rewritten
//! and is not suitable for production development yet.
//!
//! ## Overview
//!
//! `TaskResult` is the single return contract of every command-executing
//! operation in PkgRS. It is a tagged union with exactly one active variant:
//!
//! - `Success { message, aux_error }`: the command succeeded. `aux_error` keeps
//!   whatever the process printed on stderr, for diagnostics.
//! - `Error { message, aux_output }`: the command failed. `aux_output` keeps
//!   captured stdout when it is useful separately from the message.
//!
//! Messages are always whitespace-trimmed; the constructors enforce it, so
//! build values through them rather than the variants directly.
//!
use crate::core::error::FailureKind;
use serde::Serialize;
use tracing::debug;

/// Uniform Success/Error outcome of a command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum TaskResult {
    Success {
        message: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        aux_error: Option<String>,
    },
    Error {
        message: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        aux_output: Option<String>,
    },
}

/// Trims and drops empty auxiliary text.
fn aux(text: Option<String>) -> Option<String> {
    text.map(|t| t.trim().to_string()).filter(|t| !t.is_empty())
}

impl TaskResult {
    /// Builds a `Success` with a trimmed message.
    pub fn success(message: impl AsRef<str>) -> Self {
        TaskResult::Success {
            message: message.as_ref().trim().to_string(),
            aux_error: None,
        }
    }

    /// Builds a `Success` that also keeps the process's stderr.
    pub fn success_with_stderr(message: impl AsRef<str>, stderr: Option<String>) -> Self {
        TaskResult::Success {
            message: message.as_ref().trim().to_string(),
            aux_error: aux(stderr),
        }
    }

    /// Builds an `Error` with a trimmed message.
    pub fn error(message: impl AsRef<str>) -> Self {
        TaskResult::Error {
            message: message.as_ref().trim().to_string(),
            aux_output: None,
        }
    }

    /// Builds an `Error` for a classified failure, recording the kind in the log.
    pub fn failed(kind: FailureKind, message: impl AsRef<str>, output: Option<String>) -> Self {
        debug!(?kind, "Task failed");
        TaskResult::Error {
            message: message.as_ref().trim().to_string(),
            aux_output: aux(output),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, TaskResult::Success { .. })
    }

    /// The trimmed message of whichever variant is active.
    pub fn message(&self) -> &str {
        match self {
            TaskResult::Success { message, .. } | TaskResult::Error { message, .. } => message,
        }
    }
}
