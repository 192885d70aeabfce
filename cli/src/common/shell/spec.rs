//! # PkgRS Command Specification
//!
//! File: cli/src/common/shell/spec.rs
//! Author: Christi Mahu
//!
//! **DISCLAIMER:** This repository is in the early phases of being rewritten
//! and is not suitable for production development yet.
//!
//! ## Overview
//!
//! - [`CommandSpec`]: a logical command plus how it must run (elevated or not,
//!   which executable must be resolvable first). Built with chained
//!   by-value setters, immutable afterwards, consumed by one execution.
//! - [`RootCredential`]: the secret piped to the privilege-escalation prefix.
//!   It has no `Display`, a redacted `Debug` and lives for one invocation.
//!
use std::fmt;

/// A logical command to run in the host shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    command: String,
    elevated: bool,
    required_executable: Option<String>,
    skip_environment_check: bool,
    sensitive: bool,
}

impl CommandSpec {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            elevated: false,
            required_executable: None,
            skip_environment_check: false,
            sensitive: false,
        }
    }

    /// Run with administrator/root privileges.
    pub fn with_elevation(mut self) -> Self {
        self.elevated = true;
        self
    }

    /// Reload PATH first if `executable` is not resolvable.
    pub fn requiring(mut self, executable: impl Into<String>) -> Self {
        self.required_executable = Some(executable.into());
        self
    }

    /// Do not prepend any PATH reload guard.
    pub fn skip_environment_check(mut self) -> Self {
        self.skip_environment_check = true;
        self
    }

    /// The command text embeds a secret and must never be logged.
    pub fn sensitive(mut self) -> Self {
        self.sensitive = true;
        self
    }

    pub fn command(&self) -> &str {
        &self.command
    }

    pub fn is_elevated(&self) -> bool {
        self.elevated
    }

    pub fn required_executable(&self) -> Option<&str> {
        self.required_executable.as_deref()
    }

    pub fn skips_environment_check(&self) -> bool {
        self.skip_environment_check
    }

    #[cfg(test)]
    pub fn is_sensitive(&self) -> bool {
        self.sensitive
    }

    /// Command text safe for logs.
    pub fn display_command(&self) -> &str {
        if self.sensitive {
            "<redacted>"
        } else {
            &self.command
        }
    }
}

/// Root/administrator password for a single elevated invocation.
#[derive(Clone, PartialEq, Eq)]
pub struct RootCredential(String);

impl RootCredential {
    /// Wraps a secret; an empty secret counts as no credential.
    pub fn new(secret: impl Into<String>) -> Option<Self> {
        let secret = secret.into();
        if secret.is_empty() {
            None
        } else {
            Some(Self(secret))
        }
    }

    /// Raw secret, for building the command line only.
    pub(crate) fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for RootCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("RootCredential(<redacted>)")
    }
}
