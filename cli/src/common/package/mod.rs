//! # PkgRS Package Manager Module (`common::package`)
//!
//! File: cli/src/common/package/mod.rs
//! Author: Christi Mahu
//!
//! **DISCLAIMER:** This repository is in the early phases of being rewritten
//! and is not suitable for production development yet.
//!

//! ## Overview
//!
//! Everything PkgRS knows about the system package manager of the host:
//!
//! - **`PackageManagerFacade`**: the capability interface. One implementation
//!   per supported host (`chocolatey` on Windows, `homebrew` on macOS). A
//!   facade only describes *what* to run; it never spawns anything itself.
//! - **`PackageManager`**: drives a facade through an [`OsShell`]. It owns the
//!   install state machine:
//!
//! ```text
//! Unknown -> Checking -> Installed
//!                     -> NotInstalled -> Installing -> Installed
//!                                                   -> InstallFailed
//! ```
//!
//! - **`dispatch`**: picks the facade for the host OS, once, at startup.
//!
//! The re-check after a bootstrap, not the bootstrap's own exit status,
//! decides whether an install succeeded. One bootstrap attempt and one
//! re-check are made; there are no automatic retries.
//!
pub mod chocolatey;
pub mod dispatch;
pub mod homebrew;

pub use chocolatey::Chocolatey;
pub use dispatch::Dispatcher;
pub use homebrew::Homebrew;

use crate::common::shell::{CommandSpec, OsShell, RootCredential};
use crate::common::ui::progress::{ProgressSink, ProgressUpdate};
use crate::core::error::{manual_install_message, FailureKind, NO_ROOT_PASSWORD_ENTERED};
use crate::core::task::TaskResult;
use async_trait::async_trait;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Message for execution-policy operations on hosts without them.
pub const EXECUTION_POLICY_UNAVAILABLE: &str = "Execution policy is only available on Windows";

/// Describes how to query, install and drive one package manager.
#[async_trait]
pub trait PackageManagerFacade: Send + Sync {
    /// Display name, e.g. `Chocolatey`.
    fn name(&self) -> &'static str;

    /// Executable the PATH guard is keyed on.
    fn executable(&self) -> &'static str;

    /// Command printing the installed version on its first line.
    fn version_query(&self) -> CommandSpec;

    /// Whether the bootstrap needs a root credential up front.
    fn install_needs_credential(&self) -> bool;

    /// The bootstrap command, teeing installer output to `log_path` when given.
    fn bootstrap(
        &self,
        credential: Option<&RootCredential>,
        log_path: Option<&Path>,
    ) -> CommandSpec;

    /// Elevated removal of `package`, optionally pinned to `version`.
    fn uninstall_command(&self, package: &str, version: Option<&str>) -> CommandSpec;

    /// The package manager's own install log.
    fn install_log_path(&self) -> PathBuf;

    async fn get_execution_policy(&self, _shell: &OsShell) -> TaskResult {
        TaskResult::error(EXECUTION_POLICY_UNAVAILABLE)
    }

    async fn set_execution_policy(&self, _shell: &OsShell) -> TaskResult {
        TaskResult::error(EXECUTION_POLICY_UNAVAILABLE)
    }
}

/// Install lifecycle of a package manager.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstallState {
    Unknown,
    Checking,
    Installed {
        version: String,
    },
    NotInstalled,
    Installing,
    InstallFailed {
        kind: FailureKind,
        message: String,
        output: Option<String>,
    },
}

impl InstallState {
    pub fn is_installed(&self) -> bool {
        matches!(self, InstallState::Installed { .. })
    }

    /// Collapses the state into the uniform result type.
    pub fn into_task_result(self, manager: &str) -> TaskResult {
        match self {
            InstallState::Installed { version } => TaskResult::success(version),
            InstallState::InstallFailed {
                kind,
                message,
                output,
            } => TaskResult::failed(kind, message, output),
            InstallState::NotInstalled => {
                TaskResult::error(format!("{} is not installed", manager))
            }
            other => {
                TaskResult::error(format!("{} is in an unexpected state: {}", manager, other))
            }
        }
    }
}

impl fmt::Display for InstallState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InstallState::Unknown => write!(f, "Unknown"),
            InstallState::Checking => write!(f, "Checking"),
            InstallState::Installed { version } => write!(f, "Installed ({})", version),
            InstallState::NotInstalled => write!(f, "NotInstalled"),
            InstallState::Installing => write!(f, "Installing"),
            InstallState::InstallFailed { kind, .. } => write!(f, "InstallFailed ({:?})", kind),
        }
    }
}

/// A facade bound to the shell that executes its commands.
pub struct PackageManager {
    facade: Box<dyn PackageManagerFacade>,
    shell: OsShell,
}

impl PackageManager {
    /// Binds `facade` to `shell`, keying the shell's PATH guard on the
    /// facade's executable.
    pub fn new(facade: Box<dyn PackageManagerFacade>, shell: OsShell) -> Self {
        let shell = shell.with_default_executable(facade.executable());
        Self { facade, shell }
    }

    pub fn name(&self) -> &'static str {
        self.facade.name()
    }

    pub fn shell(&self) -> &OsShell {
        &self.shell
    }

    fn transition(&self, from: &InstallState, to: &InstallState) {
        debug!("{}: {} -> {}", self.facade.name(), from, to);
    }

    /// Runs the version query. Success with output means installed.
    pub async fn check(&self) -> InstallState {
        self.transition(&InstallState::Unknown, &InstallState::Checking);
        let result = self.shell.execute(self.facade.version_query()).await;
        let state = match result {
            TaskResult::Success { ref message, .. } if !message.is_empty() => {
                let version = message.lines().next().unwrap_or_default().trim().to_string();
                InstallState::Installed { version }
            }
            _ => InstallState::NotInstalled,
        };
        self.transition(&InstallState::Checking, &state);
        state
    }

    /// Checks, then installs when needed. Progress increments sum to 100.
    pub async fn install(
        &self,
        log_path: Option<&Path>,
        progress: &dyn ProgressSink,
    ) -> InstallState {
        let name = self.facade.name();
        progress.report(ProgressUpdate::new(format!("Checking {}", name), 0));
        let state = self.check().await;
        let state = self.install_from(state, log_path, progress).await;
        progress.finish();
        state
    }

    /// Continues the state machine from an already checked state.
    pub async fn install_from(
        &self,
        state: InstallState,
        log_path: Option<&Path>,
        progress: &dyn ProgressSink,
    ) -> InstallState {
        let name = self.facade.name();
        if state.is_installed() {
            info!("{} is already installed", name);
            progress.report(ProgressUpdate::new(format!("{} installed", name), 100));
            return state;
        }

        self.transition(&state, &InstallState::Installing);
        let credential = if self.facade.install_needs_credential() {
            match self
                .shell
                .request_credential(&format!("to install {}.", name))
                .await
            {
                Some(credential) => Some(credential),
                None => {
                    let failed = InstallState::InstallFailed {
                        kind: FailureKind::DeclinedElevation,
                        message: NO_ROOT_PASSWORD_ENTERED.to_string(),
                        output: None,
                    };
                    self.transition(&InstallState::Installing, &failed);
                    return failed;
                }
            }
        } else {
            None
        };

        progress.report(ProgressUpdate::new(format!("Installing {}", name), 10));
        let bootstrap = self.facade.bootstrap(credential.as_ref(), log_path);
        let outcome = self.shell.execute_with(bootstrap, credential.as_ref()).await;
        if !outcome.is_success() {
            warn!("{} bootstrap reported: {}", name, outcome.message());
        }

        let state = match self.check().await {
            installed @ InstallState::Installed { .. } => {
                progress.report(ProgressUpdate::new(format!("{} installed", name), 90));
                installed
            }
            _ => InstallState::InstallFailed {
                kind: FailureKind::PostInstallVerificationFailed,
                message: manual_install_message(name),
                output: Some(outcome.message().to_string()),
            },
        };
        self.transition(&InstallState::Installing, &state);
        state
    }

    /// Removes a package. Always elevated.
    pub async fn uninstall(&self, package: &str, version: Option<&str>) -> TaskResult {
        self.shell
            .execute(self.facade.uninstall_command(package, version))
            .await
    }

    pub async fn get_execution_policy(&self) -> TaskResult {
        self.facade.get_execution_policy(&self.shell).await
    }

    pub async fn set_execution_policy(&self) -> TaskResult {
        self.facade.set_execution_policy(&self.shell).await
    }

    pub fn install_log_path(&self) -> PathBuf {
        self.facade.install_log_path()
    }

    /// Contents of the install log.
    pub async fn install_log(&self) -> TaskResult {
        let path = self.facade.install_log_path();
        match tokio::fs::read_to_string(&path).await {
            Ok(content) => TaskResult::success(content),
            Err(e) => TaskResult::error(format!(
                "Failed to read install log {}: {}",
                path.display(),
                e
            )),
        }
    }

    /// Number of lines in the install log, 0 when it cannot be read.
    pub async fn install_log_line_count(&self) -> usize {
        let path = self.facade.install_log_path();
        match tokio::fs::read_to_string(&path).await {
            Ok(content) => content.lines().count(),
            Err(e) => {
                debug!("Install log {} unreadable: {}", path.display(), e);
                0
            }
        }
    }
}

// --- Unit Tests ---
#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::process::{ProcessOutcome, SpawnError};
    use crate::common::shell::testing::{FixedCredentials, ScriptedRunner};
    use crate::common::shell::ShellDialect;
    use crate::common::system::{HostContext, HostOs};
    use crate::common::ui::progress::NoProgress;
    use std::sync::{Arc, Mutex};
    use tempfile::tempdir;

    #[derive(Default)]
    struct RecordingProgress {
        updates: Mutex<Vec<ProgressUpdate>>,
    }

    impl ProgressSink for RecordingProgress {
        fn report(&self, update: ProgressUpdate) {
            self.updates.lock().unwrap().push(update);
        }
    }

    impl RecordingProgress {
        fn total(&self) -> u64 {
            self.updates.lock().unwrap().iter().map(|u| u.increment).sum()
        }

        fn last_message(&self) -> Option<String> {
            self.updates.lock().unwrap().last().map(|u| u.message.clone())
        }
    }

    fn not_found() -> ProcessOutcome {
        ProcessOutcome::spawn_failed(SpawnError {
            kind: "NotFound".into(),
            detail: "choco: command not found".into(),
        })
    }

    fn chocolatey(runner: Arc<ScriptedRunner>, program_data: &Path) -> PackageManager {
        let host = Arc::new(HostContext::with_program_data(
            HostOs::Windows,
            program_data.to_path_buf(),
        ));
        let shell = OsShell::new(ShellDialect::PowerShell, runner, FixedCredentials::new(None))
            .with_default_executable("choco");
        PackageManager::new(
            Box::new(Chocolatey::new(host, "https://chocolatey.org/install.ps1")),
            shell,
        )
    }

    fn homebrew(runner: Arc<ScriptedRunner>, credentials: Arc<FixedCredentials>) -> PackageManager {
        let shell =
            OsShell::new(ShellDialect::Posix, runner, credentials).with_default_executable("brew");
        PackageManager::new(
            Box::new(Homebrew::new(
                "/opt/pkgrs/scripts/install_brew.sh",
                "/tmp/pkgrs/brew-install.log",
            )),
            shell,
        )
    }

    #[tokio::test]
    async fn test_version_query_success_means_installed() {
        let runner = ScriptedRunner::new(vec![ProcessOutcome::exited(0, "1.2.3\n", "")]);
        let pm = chocolatey(runner.clone(), Path::new("C:\\ProgramData"));

        assert_eq!(
            pm.check().await,
            InstallState::Installed {
                version: "1.2.3".into()
            }
        );
        assert!(runner.lines()[0].ends_with("choco -v"));
    }

    #[tokio::test]
    async fn test_bootstrap_then_successful_recheck_installs() {
        let runner = ScriptedRunner::new(vec![
            not_found(),
            ProcessOutcome::exited(0, "Chocolatey installed\n", ""),
            ProcessOutcome::exited(0, "2.2.2\n", ""),
        ]);
        let pm = chocolatey(runner.clone(), Path::new("C:\\ProgramData"));
        let progress = RecordingProgress::default();

        let state = pm.install(None, &progress).await;

        assert_eq!(
            state,
            InstallState::Installed {
                version: "2.2.2".into()
            }
        );
        let lines = runner.lines();
        assert_eq!(lines.len(), 3);
        assert!(lines[1].contains("-Verb RunAs"));
        assert!(lines[1].contains("DownloadString('https://chocolatey.org/install.ps1')"));
        assert_eq!(progress.total(), 100);
        assert_eq!(progress.last_message().as_deref(), Some("Chocolatey installed"));
    }

    #[tokio::test]
    async fn test_failed_recheck_reports_manual_install() {
        let runner = ScriptedRunner::new(vec![
            not_found(),
            ProcessOutcome::exited(0, "done\n", ""),
            not_found(),
        ]);
        let pm = chocolatey(runner, Path::new("C:\\ProgramData"));

        let state = pm.install(None, &NoProgress).await;

        match &state {
            InstallState::InstallFailed { kind, message, output } => {
                assert_eq!(*kind, FailureKind::PostInstallVerificationFailed);
                assert!(message.contains("manually"));
                assert_eq!(output.as_deref(), Some("done"));
            }
            other => panic!("unexpected state: {}", other),
        }
        assert!(!state.into_task_result("Chocolatey").is_success());
    }

    #[tokio::test]
    async fn test_recheck_is_authoritative_over_bootstrap_exit_code() {
        let runner = ScriptedRunner::new(vec![
            not_found(),
            ProcessOutcome::exited(1, "", "installer warning"),
            ProcessOutcome::exited(0, "2.0.0", ""),
        ]);
        let pm = chocolatey(runner, Path::new("C:\\ProgramData"));
        assert!(pm.install(None, &NoProgress).await.is_installed());
    }

    #[tokio::test]
    async fn test_install_when_installed_spawns_nothing_more() {
        let runner = ScriptedRunner::new(vec![ProcessOutcome::exited(0, "1.2.3\n", "")]);
        let pm = chocolatey(runner.clone(), Path::new("C:\\ProgramData"));
        let progress = RecordingProgress::default();

        let state = pm.install(None, &progress).await;

        assert_eq!(
            state.into_task_result("Chocolatey"),
            TaskResult::success("1.2.3")
        );
        assert_eq!(runner.lines().len(), 1);
        assert_eq!(progress.total(), 100);
        assert_eq!(progress.last_message().as_deref(), Some("Chocolatey installed"));

        let runner = ScriptedRunner::new(vec![]);
        let pm = chocolatey(runner.clone(), Path::new("C:\\ProgramData"));
        let state = pm
            .install_from(
                InstallState::Installed {
                    version: "1.2.3".into(),
                },
                None,
                &NoProgress,
            )
            .await;
        assert!(state.is_installed());
        assert!(runner.lines().is_empty());
    }

    #[tokio::test]
    async fn test_declined_credential_fails_without_bootstrap() {
        let runner =
            ScriptedRunner::new(vec![ProcessOutcome::exited(127, "", "brew: not found")]);
        let credentials = FixedCredentials::new(None);
        let pm = homebrew(runner.clone(), credentials.clone());

        let state = pm.install(None, &NoProgress).await;

        assert_eq!(
            state,
            InstallState::InstallFailed {
                kind: FailureKind::DeclinedElevation,
                message: "no root password was entered".into(),
                output: None,
            }
        );
        assert_eq!(runner.lines().len(), 1);
        assert_eq!(credentials.prompt_count(), 1);
    }

    #[tokio::test]
    async fn test_homebrew_bootstrap_receives_credential() {
        let runner = ScriptedRunner::new(vec![
            ProcessOutcome::exited(127, "", "brew: not found"),
            ProcessOutcome::exited(0, "==> Installation successful!\nSuccess.\n", ""),
            ProcessOutcome::exited(
                0,
                "Homebrew 4.1.0\nHomebrew/homebrew-core (git revision 1)\n",
                "",
            ),
        ]);
        let pm = homebrew(runner.clone(), FixedCredentials::new(Some("hunter2")));

        let state = pm.install(None, &NoProgress).await;

        assert_eq!(
            state,
            InstallState::Installed {
                version: "Homebrew 4.1.0".into()
            }
        );
        let bootstrap = &runner.lines()[1];
        assert!(bootstrap.contains("cat -s /opt/pkgrs/scripts/install_brew.sh | bash -s hunter2"));
        assert!(bootstrap.contains("tee /tmp/pkgrs/brew-install.log"));
    }

    #[tokio::test]
    async fn test_uninstall_with_version_builds_exact_inner_command() {
        let runner = ScriptedRunner::new(vec![ProcessOutcome::exited(0, "uninstalled", "")]);
        let pm = chocolatey(runner.clone(), Path::new("C:\\ProgramData"));

        let result = pm.uninstall("foo", Some("4.0")).await;

        assert!(result.is_success());
        assert!(runner.lines()[0].contains("&{cuninst -y foo --version 4.0}"));
    }

    #[tokio::test]
    async fn test_execution_policy_unavailable_off_windows() {
        let runner = ScriptedRunner::new(vec![]);
        let pm = homebrew(runner.clone(), FixedCredentials::new(None));
        assert_eq!(
            pm.get_execution_policy().await,
            TaskResult::error(EXECUTION_POLICY_UNAVAILABLE)
        );
        assert_eq!(
            pm.set_execution_policy().await,
            TaskResult::error(EXECUTION_POLICY_UNAVAILABLE)
        );
        assert!(runner.lines().is_empty());
    }

    #[tokio::test]
    async fn test_install_log_reading() {
        let dir = tempdir().unwrap();
        let logs = dir.path().join("chocolatey").join("logs");
        std::fs::create_dir_all(&logs).unwrap();
        std::fs::write(logs.join("choco.summary.log"), "one\ntwo\nthree\n").unwrap();

        let pm = chocolatey(ScriptedRunner::new(vec![]), dir.path());
        assert_eq!(pm.install_log().await.message(), "one\ntwo\nthree");
        assert_eq!(pm.install_log_line_count().await, 3);

        let empty = tempdir().unwrap();
        let pm = chocolatey(ScriptedRunner::new(vec![]), empty.path());
        assert!(!pm.install_log().await.is_success());
        assert_eq!(pm.install_log_line_count().await, 0);
    }

    #[test]
    fn test_not_installed_state_as_result() {
        assert_eq!(
            InstallState::NotInstalled.into_task_result("Homebrew"),
            TaskResult::error("Homebrew is not installed")
        );
    }
}
