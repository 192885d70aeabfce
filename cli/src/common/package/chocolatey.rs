//! # PkgRS Chocolatey Facade
//!
//! File: cli/src/common/package/chocolatey.rs
//! Author: Christi Mahu
//!
//! **DISCLAIMER:** This repository is in the early phases of being rewritten
//! and is not suitable for production development yet.
//!
//! ## Overview
//!
//! Windows package manager. All commands are PowerShell; elevation goes
//! through `Start-Process -Verb RunAs`, so no credential is ever prompted.
//!
//! The bootstrap is idempotent on its own: it only downloads the installer
//! when `%ProgramData%\Chocolatey` is absent, and relaxes the execution policy
//! to `RemoteSigned` first unless it is already permissive.
//!
use super::PackageManagerFacade;
use crate::common::shell::{CommandSpec, OsShell, RootCredential};
use crate::common::system::HostContext;
use crate::core::task::TaskResult;
use async_trait::async_trait;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;
use tracing::{info, warn};

/// PowerShell script execution policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionPolicy {
    Restricted,
    AllSigned,
    RemoteSigned,
    Unrestricted,
    Bypass,
    Undefined,
}

impl ExecutionPolicy {
    /// `RemoteSigned` and `AllSigned` are never downgraded.
    pub fn is_permissive(self) -> bool {
        matches!(self, ExecutionPolicy::RemoteSigned | ExecutionPolicy::AllSigned)
    }
}

impl FromStr for ExecutionPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "restricted" => Ok(ExecutionPolicy::Restricted),
            "allsigned" => Ok(ExecutionPolicy::AllSigned),
            "remotesigned" => Ok(ExecutionPolicy::RemoteSigned),
            "unrestricted" => Ok(ExecutionPolicy::Unrestricted),
            "bypass" => Ok(ExecutionPolicy::Bypass),
            "undefined" => Ok(ExecutionPolicy::Undefined),
            other => Err(format!("Unknown execution policy: '{}'", other)),
        }
    }
}

impl fmt::Display for ExecutionPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ExecutionPolicy::Restricted => "Restricted",
            ExecutionPolicy::AllSigned => "AllSigned",
            ExecutionPolicy::RemoteSigned => "RemoteSigned",
            ExecutionPolicy::Unrestricted => "Unrestricted",
            ExecutionPolicy::Bypass => "Bypass",
            ExecutionPolicy::Undefined => "Undefined",
        };
        f.write_str(name)
    }
}

pub struct Chocolatey {
    host: Arc<HostContext>,
    install_script_url: String,
}

impl Chocolatey {
    pub fn new(host: Arc<HostContext>, install_script_url: impl Into<String>) -> Self {
        Self {
            host,
            install_script_url: install_script_url.into(),
        }
    }

    fn policy_query() -> CommandSpec {
        CommandSpec::new("Get-ExecutionPolicy").skip_environment_check()
    }
}

/// Single-quoted PowerShell literal.
fn ps_literal(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

#[async_trait]
impl PackageManagerFacade for Chocolatey {
    fn name(&self) -> &'static str {
        "Chocolatey"
    }

    fn executable(&self) -> &'static str {
        "choco"
    }

    fn version_query(&self) -> CommandSpec {
        CommandSpec::new("choco -v")
    }

    fn install_needs_credential(&self) -> bool {
        false
    }

    fn bootstrap(
        &self,
        _credential: Option<&RootCredential>,
        log_path: Option<&Path>,
    ) -> CommandSpec {
        let log_to = match log_path {
            Some(path) => format!(
                "Tee-Object -FilePath {} | Write-Output",
                ps_literal(&path.to_string_lossy())
            ),
            None => "Write-Output".to_string(),
        };
        let script = format!(
            "if (-Not (Test-Path -Path \"$env:ProgramData\\Chocolatey\")) {{ \
             if (\"RemoteSigned\", \"AllSigned\" -notcontains $(Get-ExecutionPolicy)) {{ \
             Set-ExecutionPolicy -f -ExecutionPolicy RemoteSigned }}; \
             Invoke-Expression((New-Object System.Net.WebClient).DownloadString({})) | {} \
             }} else {{ Write-Output \"Chocolatey already installed\" }}",
            ps_literal(&self.install_script_url),
            log_to
        );
        CommandSpec::new(script).with_elevation()
    }

    fn uninstall_command(&self, package: &str, version: Option<&str>) -> CommandSpec {
        let command = match version {
            Some(version) => format!("cuninst -y {} --version {}", package, version),
            None => format!("cuninst -y {}", package),
        };
        CommandSpec::new(command).with_elevation()
    }

    fn install_log_path(&self) -> PathBuf {
        self.host
            .program_data_path()
            .join("chocolatey")
            .join("logs")
            .join("choco.summary.log")
    }

    async fn get_execution_policy(&self, shell: &OsShell) -> TaskResult {
        shell.execute(Self::policy_query()).await
    }

    async fn set_execution_policy(&self, shell: &OsShell) -> TaskResult {
        let current = self.get_execution_policy(shell).await;
        if !current.is_success() {
            return current;
        }
        match current.message().parse::<ExecutionPolicy>() {
            Ok(policy) if policy.is_permissive() => {
                info!("Execution policy already {}", policy);
                return TaskResult::success(policy.to_string());
            }
            Ok(policy) => info!("Relaxing execution policy from {}", policy),
            Err(e) => warn!("{}", e),
        }

        let spec = CommandSpec::new("Set-ExecutionPolicy -f -ExecutionPolicy RemoteSigned")
            .with_elevation()
            .skip_environment_check();
        let result = shell.execute(spec).await;
        if result.is_success() {
            TaskResult::success(ExecutionPolicy::RemoteSigned.to_string())
        } else {
            result
        }
    }
}
