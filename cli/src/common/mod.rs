//! # PkgRS Common Utilities (`common`)
//!
//! File: cli/src/common/mod.rs
//! Author: Christi Mahu
//!
//! **DISCLAIMER:** This repository is in the early phases of being rewritten
//! and is not suitable for production development yet.
//!

//! ## Overview
//!
//! The engine shared by every command, layered bottom-up:
//!
//! - **`system`**: host OS detection and the process-wide `HostContext`.
//! - **`process`**: spawns one shell process per command, streams its output
//!   lines to an `OutputSink`, and normalizes the outcome into a `TaskResult`.
//! - **`shell`**: `CommandSpec`, the per-OS dialect (elevation wrapping) and
//!   the PATH reload guard, tied together by `OsShell`.
//! - **`package`**: the Chocolatey and Homebrew facades, the install state
//!   machine and the platform dispatcher.
//! - **`ui`**: the terminal credential prompt and progress bar.
//!
//! Command handlers (`commands::`) only talk to `package::Dispatcher` and the
//! types it hands out.
//!
pub mod package;
pub mod process;
pub mod shell;
pub mod system;
pub mod ui;
