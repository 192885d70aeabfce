//! # PkgRS System Utilities Module (`common::system`)
//!
//! File: cli/src/common/system/mod.rs
//! Author: Christi Mahu
//!
//! **DISCLAIMER:** This repository is in the early phases of being rewritten
//! and is not suitable for production development yet.
//!

//! ## Overview
//!
//! Host inspection shared by the shell engine and the package manager
//! facades:
//!
//! - **`HostOs`**: the host operating system, probed once at startup from
//!   `std::env::consts::OS` and never re-checked per call.
//! - **`HostContext`**: the process-wide context object. It owns the memoized
//!   "program data" path (`%ProgramData%` on Windows), resolved lazily on first
//!   access. `OnceLock` guarantees concurrent first accesses resolve it once and
//!   every later access returns the cached value.
//!
//! ## Usage
//!
//! ```rust
//! use crate::common::system::HostContext;
//! use std::sync::Arc;
//!
//! let host = Arc::new(HostContext::detect());
//! let log = host.program_data_path().join("chocolatey").join("logs");
//! ```
//!
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use tracing::debug;

/// Fallback used when `%ProgramData%` is not set.
const DEFAULT_PROGRAM_DATA: &str = r"C:\ProgramData";

/// Host operating system, as far as PkgRS cares.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostOs {
    Windows,
    MacOs,
    Linux,
    /// Any other identifier reported by the standard library.
    Other(String),
}

impl HostOs {
    /// Probes the OS the binary was built for.
    pub fn detect() -> Self {
        Self::from_identifier(std::env::consts::OS)
    }

    /// Maps an OS identifier (`std::env::consts::OS` style) to a `HostOs`.
    pub fn from_identifier(id: &str) -> Self {
        match id {
            "windows" | "win32" => HostOs::Windows,
            "macos" | "darwin" => HostOs::MacOs,
            "linux" => HostOs::Linux,
            other => HostOs::Other(other.to_string()),
        }
    }
}

impl fmt::Display for HostOs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HostOs::Windows => write!(f, "windows"),
            HostOs::MacOs => write!(f, "macos"),
            HostOs::Linux => write!(f, "linux"),
            HostOs::Other(id) => write!(f, "{}", id),
        }
    }
}

/// Process-wide host context.
#[derive(Debug)]
pub struct HostContext {
    os: HostOs,
    program_data: OnceLock<PathBuf>,
}

impl HostContext {
    pub fn new(os: HostOs) -> Self {
        Self {
            os,
            program_data: OnceLock::new(),
        }
    }

    /// Context for the current host.
    pub fn detect() -> Self {
        Self::new(HostOs::detect())
    }

    /// Context with a pre-resolved program data path.
    #[cfg(test)]
    pub fn with_program_data(os: HostOs, program_data: PathBuf) -> Self {
        Self {
            os,
            program_data: OnceLock::from(program_data),
        }
    }

    pub fn os(&self) -> &HostOs {
        &self.os
    }

    /// The system-wide program data directory, resolved on first access.
    pub fn program_data_path(&self) -> &Path {
        self.program_data.get_or_init(resolve_program_data)
    }
}

fn resolve_program_data() -> PathBuf {
    let path = std::env::var_os("ProgramData")
        .filter(|value| !value.is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_PROGRAM_DATA));
    debug!("Resolved program data path: {}", path.display());
    path
}
