//! # PkgRS Install Log Command
//!
//! File: cli/src/commands/log.rs
//! Author: Christi Mahu
//!
//! **DISCLAIMER:** This repository is in the early phases of being rewritten
//! and is not suitable for production development yet.
//!
use super::Session;
use crate::core::error::Result;
use crate::core::task::TaskResult;
use clap::{Parser, Subcommand};

/// Arguments for the `log` command.
#[derive(Parser, Debug)]
pub struct LogArgs {
    #[command(subcommand)]
    pub command: LogCommand,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum LogCommand {
    /// Print the package manager's install log
    Show,
    /// Print the number of lines in the install log (0 if unreadable)
    Count,
}

pub async fn handle_log(session: &Session, args: LogArgs) -> Result<()> {
    let pm = session.package_manager()?;
    tracing::debug!("Install log: {}", pm.install_log_path().display());
    let result = match args.command {
        LogCommand::Show => pm.install_log().await,
        LogCommand::Count => TaskResult::success(pm.install_log_line_count().await.to_string()),
    };
    session.report(result)
}
