//! # PkgRS Result Normalizer
//!
//! File: cli/src/common/process/normalize.rs
//! Author: Christi Mahu
//!
//! **DISCLAIMER:** This repository is in the early phases of being rewritten
//! and is not suitable for production development yet.
//!
//! ## Overview
//!
//! Maps a raw [`ProcessOutcome`] to a [`TaskResult`]. The rules are applied in
//! order:
//!
//! 1. Spawn error present: `Error`, message `<kind>: <detail>`.
//! 2. Exit code 0: `Success` with stdout as message, stderr kept as `aux_error`.
//! 3. Non-zero or absent exit code with stderr: `Error` with stderr as message,
//!    followed by stdout when there is any. Partial stdout is never discarded.
//! 4. Non-zero or absent exit code without stderr: `Success` with stdout.
//!    Some shells report a non-zero code for benign conditions without writing
//!    to stderr.
//!
//! Whitespace-only stdout or stderr counts as empty.
//!
use super::ProcessOutcome;
use crate::core::error::FailureKind;
use crate::core::task::TaskResult;

/// Applies the exit-code/stderr policy to a process outcome.
pub fn normalize(outcome: ProcessOutcome) -> TaskResult {
    let ProcessOutcome {
        stdout,
        stderr,
        exit_code,
        spawn_error,
    } = outcome;

    if let Some(error) = spawn_error {
        return TaskResult::failed(
            FailureKind::SpawnFailure,
            format!("{}: {}", error.kind, error.detail),
            None,
        );
    }

    if exit_code == Some(0) {
        return TaskResult::success_with_stderr(stdout, Some(stderr));
    }

    if !stderr.trim().is_empty() {
        let message = if stdout.trim().is_empty() {
            stderr.trim().to_string()
        } else {
            format!("{}\n{}", stderr.trim(), stdout.trim())
        };
        return TaskResult::failed(FailureKind::NonZeroExit, message, None);
    }

    // TODO: revisit as an Error if a supported shell turns out to fail
    // silently with a non-zero code.
    TaskResult::success(stdout)
}
