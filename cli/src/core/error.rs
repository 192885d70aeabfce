//! # PkgRS Error Types
//!
//! File: cli/src/core/error.rs
//! Author: Christi Mahu
//!
//! **DISCLAIMER:** This repository is in the early phases of being rewritten
//! and is not suitable for production development yet.
//!
//! ## Overview
//!
//! PkgRS has two error channels and this module defines the hard one.
//!
//! - Command outcomes (a process failed, the user declined elevation, an
//!   install could not be verified) are **not** Rust errors. They are carried
//!   as the `Error` variant of [`TaskResult`](crate::core::task::TaskResult)
//!   and classified by [`FailureKind`].
//! - Hard failures (no package manager for this host, an unreadable or invalid
//!   configuration) are `PkgError` values propagated with `anyhow`.
//!
//! ## Examples
//!
//! ```rust
//! // Hard failure: no facade exists for this host.
//! return Err(PkgError::UnsupportedPlatform { os: "linux".into() })?;
//!
//! // Adding context with anyhow
//! let content = fs::read_to_string(&path)
//!     .with_context(|| format!("Failed to read file: {}", path.display()))?;
//! ```
//!
use thiserror::Error;

/// Hard-failure error type for PkgRS.
#[derive(Error, Debug)]
pub enum PkgError {
    /// No package manager facade exists for the host OS. This is a build or
    /// deployment mismatch, never a recoverable runtime condition.
    #[error("Platform not supported: '{os}'")]
    UnsupportedPlatform { os: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Credential prompt failed: {0}")]
    Prompt(String),

    /// A command returned an `Error` result. The message is already final.
    #[error("{0}")]
    TaskFailed(String),
}

/// Classification of a failed command outcome.
///
/// Every kind except the ones raised as [`PkgError`] ends up as the `Error`
/// variant of a `TaskResult`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// The OS could not create the process.
    SpawnFailure,
    /// The process ran and reported failure via its exit code and/or stderr.
    NonZeroExit,
    /// The user did not supply a required credential.
    DeclinedElevation,
    /// The bootstrap ran but the package manager still cannot be detected.
    PostInstallVerificationFailed,
}

/// Message returned by the shell engine when elevation is declined.
pub const NO_ROOT_PASSWORD_PROVIDED: &str = "Error: No root password provided";

/// Message returned by the install flow when elevation is declined.
pub const NO_ROOT_PASSWORD_ENTERED: &str = "no root password was entered";

/// Builds the message reported when an install could not be verified.
pub fn manual_install_message(manager: &str) -> String {
    format!(
        "{} could not be installed automatically. Try to install it manually.",
        manager
    )
}

/// Type alias for Result using anyhow::Error for broad compatibility.
pub type Result<T> = anyhow::Result<T>;
