//! # PkgRS Status Command
//!
//! File: cli/src/commands/status.rs
//! Author: Christi Mahu
//!
//! **DISCLAIMER:** This repository is in the early phases of being rewritten
//! and is not suitable for production development yet.
//!
//! ## Overview
//!
//! `pkgrs status [--require]` prints the installed package manager version.
//! A missing package manager is reported but is not a failure unless
//! `--require` is given.
//!
use super::Session;
use crate::common::package::InstallState;
use crate::core::error::Result;
use crate::core::task::TaskResult;
use clap::Parser;

/// Arguments for the `status` command.
#[derive(Parser, Debug)]
pub struct StatusArgs {
    /// Exit with an error when the package manager is not installed.
    #[arg(long)]
    pub require: bool,
}

pub async fn handle_status(session: &Session, args: StatusArgs) -> Result<()> {
    tracing::info!("Handling status command...");
    let pm = session.package_manager()?;
    let state = pm.check().await;
    let result = match state {
        InstallState::Installed { .. } => state.into_task_result(pm.name()),
        _ if args.require => state.into_task_result(pm.name()),
        _ => TaskResult::success(format!("{} is not installed", pm.name())),
    };
    session.report(result)
}
