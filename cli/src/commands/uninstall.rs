//! # PkgRS Uninstall Command
//!
//! File: cli/src/commands/uninstall.rs
//! Author: Christi Mahu
//!
//! **DISCLAIMER:** This repository is in the early phases of being rewritten
//! and is not suitable for production development yet.
//!
use super::Session;
use crate::core::error::Result;
use clap::Parser;

/// Arguments for the `uninstall` command. Always runs elevated.
#[derive(Parser, Debug)]
pub struct UninstallArgs {
    /// Package to remove.
    pub package: String,
    /// Only remove this version.
    #[arg(long)]
    pub version: Option<String>,
}

pub async fn handle_uninstall(session: &Session, args: UninstallArgs) -> Result<()> {
    tracing::info!("Handling uninstall command for '{}'...", args.package);
    let pm = session.package_manager()?;
    let result = pm.uninstall(&args.package, args.version.as_deref()).await;
    session.report(result)
}
