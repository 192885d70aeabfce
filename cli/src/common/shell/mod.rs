//! # PkgRS Shell Engine (`common::shell`)
//!
//! File: cli/src/common/shell/mod.rs
//! Author: Christi Mahu
//!
//! **DISCLAIMER:** This repository is in the early phases of being rewritten
//! and is not suitable for production development yet.
//!

//! ## Overview
//!
//! The privileged-command execution engine. [`OsShell`] takes a
//! [`CommandSpec`] and returns a [`TaskResult`], whatever the host OS:
//!
//! 1. Acquire a credential when the command spec is elevated and the dialect
//!    pipes one to `sudo`. A declined prompt ends here with
//!    `"Error: No root password provided"`; nothing is spawned.
//! 2. Build the command line (`dialect`), prefixed with the PATH reload guard
//!    (`guard`).
//! 3. Run it (`CommandRunner`) and normalize the outcome.
//!
//! Each execution is independent: no ordering or locking between concurrent
//! calls. Callers that need serialization must provide it.
//!
//! ## Usage
//!
//! ```rust
//! let shell = dispatcher.shell();
//! let result = shell
//!     .execute(CommandSpec::new("choco upgrade all -y").with_elevation())
//!     .await;
//! ```
//!
pub mod dialect;
pub mod guard;
pub mod spec;

pub use dialect::{MissingCredential, ShellDialect};
pub use spec::{CommandSpec, RootCredential};

use crate::common::process::{normalize, CommandRunner};
use crate::common::ui::prompt::CredentialProvider;
use crate::core::error::{FailureKind, NO_ROOT_PASSWORD_PROVIDED};
use crate::core::task::TaskResult;
use std::sync::Arc;
use tracing::info;

/// Executes command specs in the host shell.
#[derive(Clone)]
pub struct OsShell {
    dialect: ShellDialect,
    runner: Arc<dyn CommandRunner>,
    credentials: Arc<dyn CredentialProvider>,
    default_executable: Option<String>,
}

impl OsShell {
    pub fn new(
        dialect: ShellDialect,
        runner: Arc<dyn CommandRunner>,
        credentials: Arc<dyn CredentialProvider>,
    ) -> Self {
        Self {
            dialect,
            runner,
            credentials,
            default_executable: None,
        }
    }

    /// Executable the PATH guard is keyed on when a spec names none.
    pub fn with_default_executable(mut self, executable: impl Into<String>) -> Self {
        self.default_executable = Some(executable.into());
        self
    }

    /// Asks the credential provider for a secret. `None` means declined.
    pub async fn request_credential(&self, reason: &str) -> Option<RootCredential> {
        self.credentials.prompt_for_secret(Some(reason)).await
    }

    /// Runs `spec`, prompting for a credential when elevation needs one.
    pub async fn execute(&self, spec: CommandSpec) -> TaskResult {
        let credential = if spec.is_elevated() && self.dialect.needs_credential() {
            match self.request_credential("to run an elevated command.").await {
                Some(credential) => Some(credential),
                None => {
                    return TaskResult::failed(
                        FailureKind::DeclinedElevation,
                        NO_ROOT_PASSWORD_PROVIDED,
                        None,
                    )
                }
            }
        } else {
            None
        };
        self.execute_with(spec, credential.as_ref()).await
    }

    /// Runs `spec` with an already acquired credential.
    pub async fn execute_with(
        &self,
        spec: CommandSpec,
        credential: Option<&RootCredential>,
    ) -> TaskResult {
        info!(
            elevated = spec.is_elevated(),
            "Executing: {}",
            spec.display_command()
        );
        let line = match self.dialect.build_command_line(
            &spec,
            self.default_executable.as_deref(),
            credential,
        ) {
            Ok(line) => line,
            Err(MissingCredential) => {
                return TaskResult::failed(
                    FailureKind::DeclinedElevation,
                    NO_ROOT_PASSWORD_PROVIDED,
                    None,
                )
            }
        };
        normalize(self.runner.run(&line).await)
    }
}



#[cfg(all(test, unix))]
mod posix_tests {
    use super::testing::FixedCredentials;
    use super::*;
    use crate::common::process::{OutputSink, ProcessRunner};
    use std::os::unix::fs::PermissionsExt;
    use std::path::Path;
    use tempfile::tempdir;

    struct Quiet;

    impl OutputSink for Quiet {
        fn log(&self, _line: &str) {}
        fn log_error(&self, _line: &str) {}
    }

    /// A `sudo` stand-in that stores whatever arrives on its stdin.
    fn install_fake_sudo(bin: &Path, capture: &Path) {
        let script = bin.join("sudo");
        std::fs::write(&script, format!("#!/bin/sh\ncat > '{}'\n", capture.display())).unwrap();
        std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();
    }

    #[tokio::test]
    async fn test_sudo_receives_credential_byte_for_byte() {
        let dir = tempdir().unwrap();
        let capture = dir.path().join("stdin");
        install_fake_sudo(dir.path(), &capture);

        let path = format!("PATH={}:/usr/bin:/bin", dir.path().display());
        for secret in ["pa\\cword", "-n", "a\\nb", "-e x\\t", "it's $HOME `id`"] {
            let runner = ProcessRunner::new(
                "/usr/bin/env",
                vec![path.clone(), "/bin/sh".to_string(), "-c".to_string()],
                Arc::new(Quiet),
            );
            let shell = OsShell::new(
                ShellDialect::Posix,
                Arc::new(runner),
                FixedCredentials::new(Some(secret)),
            );

            let result = shell
                .execute(
                    CommandSpec::new("echo ran")
                        .with_elevation()
                        .skip_environment_check(),
                )
                .await;

            assert_eq!(result, TaskResult::success("ran"), "secret {:?}", secret);
            let received = std::fs::read(&capture).unwrap();
            assert_eq!(
                received,
                format!("{}\n", secret).into_bytes(),
                "secret {:?}",
                secret
            );
        }
    }
}
