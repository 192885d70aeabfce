//! # PkgRS Platform Dispatcher
//!
//! File: cli/src/common/package/dispatch.rs
//! Author: Christi Mahu
//!
//! **DISCLAIMER:** This repository is in the early phases of being rewritten
//! and is not suitable for production development yet.
//!
//! ## Overview
//!
//! Wires the engine together for one host: shell dialect, process runner,
//! credential provider and, where one exists, the package manager facade.
//! An OS without a facade is a hard `UnsupportedPlatform` failure; the shell
//! itself stays usable on any host with a dialect.
//!
use super::{Chocolatey, Homebrew, PackageManager, PackageManagerFacade};
use crate::common::process::{CommandRunner, OutputSink, ProcessRunner};
use crate::common::shell::{OsShell, ShellDialect};
use crate::common::system::{HostContext, HostOs};
use crate::common::ui::prompt::CredentialProvider;
use crate::core::config::Config;
use crate::core::error::PkgError;
use std::sync::Arc;
use tracing::debug;

pub struct Dispatcher {
    host: Arc<HostContext>,
    shell: OsShell,
    package_manager: Option<PackageManager>,
}

impl Dispatcher {
    /// Selects the facade for the host OS, once.
    pub fn new(
        host: Arc<HostContext>,
        config: Config,
        runner: Arc<dyn CommandRunner>,
        credentials: Arc<dyn CredentialProvider>,
    ) -> Self {
        let shell = OsShell::new(ShellDialect::for_host(host.os()), runner, credentials);
        let facade: Option<Box<dyn PackageManagerFacade>> = match host.os() {
            HostOs::Windows => Some(Box::new(Chocolatey::new(
                Arc::clone(&host),
                config.chocolatey.install_script_url.clone(),
            ))),
            HostOs::MacOs => Some(Box::new(Homebrew::new(
                config.homebrew.install_script_path(),
                config.homebrew.install_log_path(),
            ))),
            other => {
                debug!("No package manager for host {}", other);
                None
            }
        };
        let package_manager = facade.map(|facade| PackageManager::new(facade, shell.clone()));
        Self {
            host,
            shell,
            package_manager,
        }
    }

    /// Builds a dispatcher that spawns real processes in the host shell.
    pub fn for_host(
        host: Arc<HostContext>,
        config: Config,
        sink: Arc<dyn OutputSink>,
        credentials: Arc<dyn CredentialProvider>,
    ) -> Self {
        let dialect = ShellDialect::for_host(host.os());
        let runner = ProcessRunner::new(
            dialect.program(&config.shell),
            dialect.invocation_args(),
            sink,
        );
        debug!("Using {:?} shell for host {}", dialect, host.os());
        Self::new(host, config, Arc::new(runner), credentials)
    }

    /// Shell for arbitrary commands. On hosts with a package manager its
    /// default PATH guard is keyed on the package manager's executable.
    pub fn shell(&self) -> &OsShell {
        self.package_manager
            .as_ref()
            .map(PackageManager::shell)
            .unwrap_or(&self.shell)
    }

    /// The package manager of this host.
    pub fn package_manager(&self) -> Result<&PackageManager, PkgError> {
        self.package_manager
            .as_ref()
            .ok_or_else(|| PkgError::UnsupportedPlatform {
                os: self.host.os().to_string(),
            })
    }
}
