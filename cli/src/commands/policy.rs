//! # PkgRS Execution Policy Command
//!
//! File: cli/src/commands/policy.rs
//! Author: Christi Mahu
//!
//! **DISCLAIMER:** This repository is in the early phases of being rewritten
//! and is not suitable for production development yet.
//!
//! ## Overview
//!
//! `pkgrs policy get|set` reads or relaxes the PowerShell execution policy.
//! `set` only changes a policy that is not already `RemoteSigned` or
//! `AllSigned`. On macOS both report an error result.
//!
use super::Session;
use crate::core::error::Result;
use clap::{Parser, Subcommand};

/// Arguments for the `policy` command.
#[derive(Parser, Debug)]
pub struct PolicyArgs {
    #[command(subcommand)]
    pub command: PolicyCommand,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum PolicyCommand {
    /// Print the current execution policy
    Get,
    /// Set the policy to RemoteSigned unless already permissive
    Set,
}

pub async fn handle_policy(session: &Session, args: PolicyArgs) -> Result<()> {
    let pm = session.package_manager()?;
    let result = match args.command {
        PolicyCommand::Get => pm.get_execution_policy().await,
        PolicyCommand::Set => pm.set_execution_policy().await,
    };
    session.report(result)
}

// --- Unit Tests ---
#[cfg(test)]
mod tests {
    use super::super::tests::session;
    use super::*;
    use crate::common::process::ProcessOutcome;
    use crate::common::shell::testing::ScriptedRunner;
    use crate::common::system::HostOs;

    #[test]
    fn test_policy_args_parsing() {
        let args = PolicyArgs::try_parse_from(["policy", "get"]).unwrap();
        assert_eq!(args.command, PolicyCommand::Get);
        assert!(PolicyArgs::try_parse_from(["policy"]).is_err());
    }

    #[tokio::test]
    async fn test_policy_on_macos_is_an_error_result() {
        let session = session(HostOs::MacOs, ScriptedRunner::new(vec![]));
        let err = handle_policy(&session, PolicyArgs { command: PolicyCommand::Set })
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Execution policy is only available on Windows");
    }

    #[tokio::test]
    async fn test_get_policy_on_windows() {
        let runner = ScriptedRunner::new(vec![ProcessOutcome::exited(0, "Bypass\r\n", "")]);
        let session = session(HostOs::Windows, runner.clone());
        handle_policy(&session, PolicyArgs { command: PolicyCommand::Get })
            .await
            .unwrap();
        assert_eq!(runner.lines(), vec!["Get-ExecutionPolicy"]);
    }
}
