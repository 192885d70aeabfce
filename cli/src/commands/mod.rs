//! # PkgRS Command Modules
//!
//! File: cli/src/commands/mod.rs
//! Author: Christi Mahu
//!
//! **DISCLAIMER:** This repository is in the early phases of being rewritten
//! and is not suitable for production development yet.
//!
//! ## Overview
//!
//! One module per top-level subcommand. Handlers receive the parsed args and
//! a [`Session`], do their work through the engine, and hand the resulting
//! [`TaskResult`] back to [`Session::report`], which prints it and turns an
//! `Error` result into a failed exit.
//!

/// `status`: is the package manager installed, and which version.
pub mod status;
/// `install`: install the package manager if missing.
pub mod install;
/// `uninstall`: remove a package.
pub mod uninstall;
/// `run`: run an arbitrary command in the host shell.
pub mod run;
/// `policy`: PowerShell execution policy (Windows only).
pub mod policy;
/// `log`: the package manager's install log.
pub mod log;

use crate::common::package::{Dispatcher, PackageManager};
use crate::common::process::TracingSink;
use crate::common::system::HostContext;
use crate::common::ui::prompt::TerminalCredentialProvider;
use crate::core::config::Config;
use crate::core::error::{PkgError, Result};
use crate::core::task::TaskResult;
use std::sync::Arc;

/// Per-invocation state shared by all handlers.
pub struct Session {
    dispatcher: Dispatcher,
    json: bool,
}

impl Session {
    /// Session for the detected host, prompting on the terminal.
    pub fn new(config: Config, json: bool) -> Self {
        let dispatcher = Dispatcher::for_host(
            Arc::new(HostContext::detect()),
            config,
            Arc::new(TracingSink),
            Arc::new(TerminalCredentialProvider),
        );
        Self::with_dispatcher(dispatcher, json)
    }

    pub fn with_dispatcher(dispatcher: Dispatcher, json: bool) -> Self {
        Self { dispatcher, json }
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    pub fn json(&self) -> bool {
        self.json
    }

    pub fn package_manager(&self) -> Result<&PackageManager> {
        Ok(self.dispatcher.package_manager()?)
    }

    /// Prints `result` and maps an `Error` result to [`PkgError::TaskFailed`].
    pub fn report(&self, result: TaskResult) -> Result<()> {
        if self.json {
            println!("{}", serde_json::to_string(&result)?);
        } else if let TaskResult::Success { message, .. } = &result {
            if !message.is_empty() {
                println!("{}", message);
            }
        }
        match result {
            TaskResult::Success { .. } => Ok(()),
            TaskResult::Error { message, .. } => Err(PkgError::TaskFailed(message).into()),
        }
    }
}
