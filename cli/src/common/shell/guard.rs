//! # PkgRS Precondition Injector
//!
//! File: cli/src/common/shell/guard.rs
//! Author: Christi Mahu
//!
//! **DISCLAIMER:** This repository is in the early phases of being rewritten
//! and is not suitable for production development yet.
//!
//! ## Overview
//!
//! Installing a package manager changes the durable PATH, which a long-lived
//! process does not observe. The guard built here is prepended to a command
//! line as a separate statement: when the required executable cannot be
//! resolved, PATH is reloaded from the durable store before the real command
//! runs in the same shell invocation.
//!
//! - PowerShell reloads `Path` from the Machine and User environment stores.
//! - POSIX shells reload from `path_helper` (the `/etc/paths` store on macOS).
//!
//! The executable comes from the command spec's `required_executable`,
//! falling back to the package manager's own executable.
//! `skip_environment_check` disables the guard entirely.
//!
use super::dialect::ShellDialect;
use super::spec::CommandSpec;

/// Guard statement (including its trailing separator) for `executable`.
pub fn path_reload_guard(dialect: ShellDialect, executable: &str) -> String {
    match dialect {
        ShellDialect::PowerShell => format!(
            "if (-Not (Get-Command {} -ErrorAction SilentlyContinue)) {{ \
             $env:Path = [System.Environment]::GetEnvironmentVariable(\"Path\",\"Machine\") \
             + \";\" + \
             [System.Environment]::GetEnvironmentVariable(\"Path\",\"User\") }}; ",
            executable
        ),
        ShellDialect::Posix => format!(
            "if ! command -v {} >/dev/null 2>&1; then \
             [ -x /usr/libexec/path_helper ] && eval \"$(/usr/libexec/path_helper -s)\"; fi; ",
            shell_words::quote(executable)
        ),
    }
}

/// Prepends the guard the command spec asks for, if any, to `command_line`.
pub fn inject(
    dialect: ShellDialect,
    spec: &CommandSpec,
    default_executable: Option<&str>,
    command_line: String,
) -> String {
    if spec.skips_environment_check() {
        return command_line;
    }
    match spec.required_executable().or(default_executable) {
        Some(executable) => format!("{}{}", path_reload_guard(dialect, executable), command_line),
        None => command_line,
    }
}
