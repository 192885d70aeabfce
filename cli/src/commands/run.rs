//! # PkgRS Run Command
//!
//! File: cli/src/commands/run.rs
//! Author: Christi Mahu
//!
//! **DISCLAIMER:** This repository is in the early phases of being rewritten
//! and is not suitable for production development yet.
//!
//! ## Overview
//!
//! `pkgrs run <command>` sends one command line through the shell engine.
//! Unlike the other commands it works on any host with a shell dialect, since
//! it needs no package manager facade.
//!
//! ```bash
//! pkgrs run "brew update" --elevated
//! pkgrs run "node -v" --requires node
//! ```
//!
use super::Session;
use crate::common::shell::CommandSpec;
use crate::core::error::Result;
use clap::Parser;

/// Arguments for the `run` command.
#[derive(Parser, Debug)]
pub struct RunArgs {
    /// The command line to run.
    pub command: String,
    /// Run with administrator/root privileges.
    #[arg(long)]
    pub elevated: bool,
    /// Reload PATH first if this executable cannot be found.
    #[arg(long, value_name = "EXECUTABLE")]
    pub requires: Option<String>,
    /// Do not prepend the PATH reload guard.
    #[arg(long)]
    pub skip_env_check: bool,
}

impl RunArgs {
    fn to_spec(&self) -> CommandSpec {
        let mut spec = CommandSpec::new(self.command.clone());
        if self.elevated {
            spec = spec.with_elevation();
        }
        if let Some(executable) = &self.requires {
            spec = spec.requiring(executable.clone());
        }
        if self.skip_env_check {
            spec = spec.skip_environment_check();
        }
        spec
    }
}

pub async fn handle_run(session: &Session, args: RunArgs) -> Result<()> {
    tracing::info!("Handling run command...");
    let result = session.dispatcher().shell().execute(args.to_spec()).await;
    session.report(result)
}
