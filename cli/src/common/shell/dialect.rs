//! # PkgRS Shell Dialect Adapter
//!
//! File: cli/src/common/shell/dialect.rs
//! Author: Christi Mahu
//!
//! **DISCLAIMER:** This repository is in the early phases of being rewritten
//! and is not suitable for production development yet.
//!
//! ## Overview
//!
//! Turns a [`CommandSpec`] into the concrete command line for the host shell.
//! This is a pure function of the command spec, the default guard executable
//! and the credential; nothing is spawned here.
//!
//! | Dialect      | Elevated                                                            | Plain |
//! |--------------|---------------------------------------------------------------------|-------|
//! | `PowerShell` | `Start-Process powershell -Verb RunAs` around the command           | as is |
//! | `Posix`      | `printf '%s\n' <cred> \| sudo -S echo foo > /dev/zero && <command>` | as is |
//!
//! ### PowerShell elevation
//!
//! The elevated shell is a separate process that receives the command as one
//! double-quoted argument, which cannot span lines. Line breaks are therefore
//! stripped, and the characters the outer shell would interpret inside double
//! quotes are backtick-escaped: backticks, `"` and `$`. The wrapper waits
//! for the elevated process and exits with its exit code.
//!
//! ### POSIX elevation
//!
//! The credential is piped to `sudo -S`, validating privileges once before
//! `&&` lets the real command run. It goes through `printf '%s\n'` rather
//! than `echo`, which rewrites backslash escapes and a leading `-n` under
//! some `/bin/sh` implementations. A wrong credential makes the probe fail,
//! so the command line exits non-zero with sudo's message on stderr. Without a
//! credential no command line can be built.
//!
use super::guard;
use super::spec::{CommandSpec, RootCredential};
use crate::common::system::HostOs;
use crate::core::config::ShellConfig;
use thiserror::Error;

/// Elevation on this dialect needs a credential and none was supplied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("No root password provided")]
pub struct MissingCredential;

/// Command-line language of the host shell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShellDialect {
    /// Windows PowerShell.
    PowerShell,
    /// `/bin/sh` compatible shells (macOS, Linux).
    Posix,
}

impl ShellDialect {
    pub fn for_host(os: &HostOs) -> Self {
        match os {
            HostOs::Windows => ShellDialect::PowerShell,
            _ => ShellDialect::Posix,
        }
    }

    /// Whether elevation goes through a piped credential.
    pub fn needs_credential(self) -> bool {
        matches!(self, ShellDialect::Posix)
    }

    /// Shell program from the configuration.
    pub fn program(self, config: &ShellConfig) -> &str {
        match self {
            ShellDialect::PowerShell => &config.windows_program,
            ShellDialect::Posix => &config.posix_program,
        }
    }

    /// Arguments placed before the command line.
    pub fn invocation_args(self) -> Vec<String> {
        let args: &[&str] = match self {
            ShellDialect::PowerShell => &[
                "-NoProfile",
                "-NonInteractive",
                "-ExecutionPolicy",
                "Bypass",
                "-Command",
            ],
            ShellDialect::Posix => &["-c"],
        };
        args.iter().map(|arg| arg.to_string()).collect()
    }

    /// Full command line for `spec`: guard first, then the (possibly elevated) command.
    pub fn build_command_line(
        self,
        spec: &CommandSpec,
        default_executable: Option<&str>,
        credential: Option<&RootCredential>,
    ) -> Result<String, MissingCredential> {
        let command = if spec.is_elevated() {
            match self {
                ShellDialect::PowerShell => elevate_powershell(spec.command()),
                ShellDialect::Posix => {
                    elevate_posix(spec.command(), credential.ok_or(MissingCredential)?)
                }
            }
        } else {
            spec.command().to_string()
        };
        Ok(guard::inject(self, spec, default_executable, command))
    }
}

/// Makes `command` safe as the body of a double-quoted, single-line PowerShell argument.
pub fn escape_for_elevation(command: &str) -> String {
    let mut escaped = String::with_capacity(command.len());
    for c in command.chars() {
        match c {
            '\r' | '\n' => {}
            '`' => escaped.push_str("``"),
            '"' => escaped.push_str("`\""),
            '$' => escaped.push_str("`$"),
            other => escaped.push(other),
        }
    }
    escaped
}

fn elevate_powershell(command: &str) -> String {
    format!(
        "$p = Start-Process -FilePath \"powershell\" -Wait -PassThru -Verb RunAs -ErrorAction Stop \
         -ArgumentList \"-noprofile\", \"-command &{{{}}}\"; exit $p.ExitCode",
        escape_for_elevation(command)
    )
}

fn elevate_posix(command: &str, credential: &RootCredential) -> String {
    format!(
        "printf '%s\\n' {} | sudo -S echo foo > /dev/zero && {}",
        shell_words::quote(credential.expose()),
        command
    )
}

// --- Unit Tests ---
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dialect_for_host() {
        assert_eq!(ShellDialect::for_host(&HostOs::Windows), ShellDialect::PowerShell);
        assert_eq!(ShellDialect::for_host(&HostOs::MacOs), ShellDialect::Posix);
        assert_eq!(ShellDialect::for_host(&HostOs::Linux), ShellDialect::Posix);
        assert!(ShellDialect::Posix.needs_credential());
        assert!(!ShellDialect::PowerShell.needs_credential());
    }

    #[test]
    fn test_invocation_args() {
        assert_eq!(ShellDialect::Posix.invocation_args(), vec!["-c"]);
        let ps = ShellDialect::PowerShell.invocation_args();
        assert_eq!(ps.first().map(String::as_str), Some("-NoProfile"));
        assert_eq!(ps.last().map(String::as_str), Some("-Command"));
    }

    #[test]
    fn test_plain_commands_pass_through() {
        let spec = CommandSpec::new("choco -v").skip_environment_check();
        for dialect in [ShellDialect::PowerShell, ShellDialect::Posix] {
            assert_eq!(
                dialect.build_command_line(&spec, Some("choco"), None).unwrap(),
                "choco -v"
            );
        }
    }

    #[test]
    fn test_windows_elevation_is_single_line_with_escaped_quotes() {
        let spec = CommandSpec::new("Write-Output \"hello\"\r\nWrite-Output \"world\"\n")
            .with_elevation()
            .skip_environment_check();
        let line = ShellDialect::PowerShell
            .build_command_line(&spec, None, None)
            .unwrap();

        assert!(!line.contains('\n') && !line.contains('\r'));
        assert!(line.starts_with(
            "$p = Start-Process -FilePath \"powershell\" -Wait -PassThru -Verb RunAs"
        ));
        assert!(line.contains(
            "\"-command &{Write-Output `\"hello`\"Write-Output `\"world`\"}\"; exit $p.ExitCode"
        ));
    }

    #[test]
    fn test_every_inner_quote_is_escaped() {
        let escaped = escape_for_elevation("a \"b\" \"\" c\n\"d\"");
        let bytes: Vec<char> = escaped.chars().collect();
        for (i, c) in bytes.iter().enumerate() {
            if *c == '"' {
                assert!(i > 0 && bytes[i - 1] == '`', "unescaped quote in {}", escaped);
            }
        }
        assert!(!escaped.contains('\n'));
    }

    #[test]
    fn test_dollar_and_backtick_are_escaped_for_outer_shell() {
        assert_eq!(escape_for_elevation("$env:Path"), "`$env:Path");
        assert_eq!(escape_for_elevation("a`b"), "a``b");
    }

    #[test]
    fn test_posix_elevation_pipes_quoted_credential() {
        let cred = RootCredential::new("pa ss'word").unwrap();
        let spec = CommandSpec::new("brew uninstall foo").with_elevation();
        let line = ShellDialect::Posix
            .build_command_line(&spec, None, Some(&cred))
            .unwrap();
        assert_eq!(
            line,
            "printf '%s\\n' 'pa ss'\\''word' | sudo -S echo foo > /dev/zero && brew uninstall foo"
        );
    }

    #[test]
    fn test_posix_elevation_without_credential_fails() {
        let spec = CommandSpec::new("brew uninstall foo").with_elevation();
        assert_eq!(
            ShellDialect::Posix.build_command_line(&spec, Some("brew"), None),
            Err(MissingCredential)
        );
    }

    #[test]
    fn test_guard_precedes_elevation_prefix() {
        let cred = RootCredential::new("pw").unwrap();
        let spec = CommandSpec::new("brew cleanup").with_elevation();
        let line = ShellDialect::Posix
            .build_command_line(&spec, Some("brew"), Some(&cred))
            .unwrap();
        assert!(line.starts_with("if ! command -v brew"));
        assert!(
            line.ends_with("fi; printf '%s\\n' pw | sudo -S echo foo > /dev/zero && brew cleanup")
        );
    }
}
