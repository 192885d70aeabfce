//! # PkgRS Install Command
//!
//! File: cli/src/commands/install.rs
//! Author: Christi Mahu
//!
//! **DISCLAIMER:** This repository is in the early phases of being rewritten
//! and is not suitable for production development yet.
//!
//! ## Overview
//!
//! `pkgrs install [--log-path <file>]` installs the host package manager when
//! it is missing, with a progress bar on stderr. Already installed is success.
//!
use super::Session;
use crate::common::package::InstallState;
use crate::common::ui::progress::{NoProgress, ProgressSink, TerminalProgress};
use crate::core::error::Result;
use crate::core::task::TaskResult;
use clap::Parser;
use std::path::PathBuf;

/// Arguments for the `install` command.
#[derive(Parser, Debug)]
pub struct InstallArgs {
    /// Tee the installer output to this file.
    #[arg(long, value_name = "FILE")]
    pub log_path: Option<PathBuf>,
}

pub async fn handle_install(session: &Session, args: InstallArgs) -> Result<()> {
    tracing::info!("Handling install command...");
    let pm = session.package_manager()?;
    let progress: Box<dyn ProgressSink> = if session.json() {
        Box::new(NoProgress)
    } else {
        Box::new(TerminalProgress::new(&format!("Install {}", pm.name())))
    };

    let state = pm.install(args.log_path.as_deref(), progress.as_ref()).await;
    let result = match state {
        InstallState::Installed { version } => {
            TaskResult::success(format!("{} installed: {}", pm.name(), version))
        }
        other => other.into_task_result(pm.name()),
    };
    session.report(result)
}
