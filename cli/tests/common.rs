//! # PkgRS CLI Integration Test Common Helpers
//!
//! File: cli/tests/common.rs
//! Author: Christi Mahu
//!
//! ## Overview
//!
//! Shared helpers for the integration tests in `cli/tests/`. Each test file
//! declares `mod common;` and runs the compiled `pkgrs` binary through
//! `assert_cmd`.
//!
#![allow(dead_code)]

pub use assert_cmd::Command;
use std::fs;
use tempfile::TempDir;

/// Command for the compiled `pkgrs` binary.
///
/// ## Panics
/// Panics if the binary cannot be found via `Command::cargo_bin`.
pub fn pkgrs_cmd() -> Command {
    Command::cargo_bin("pkgrs").expect("Failed to find pkgrs binary for testing")
}

/// `pkgrs` pinned to an empty configuration file, so the user's own
/// configuration never leaks into a test. Keep the returned dir alive.
pub fn isolated_pkgrs_cmd() -> (Command, TempDir) {
    let dir = tempfile::tempdir().expect("Failed to create temp config dir");
    let config = dir.path().join("config.toml");
    fs::write(&config, "").expect("Failed to write empty config");
    let mut cmd = pkgrs_cmd();
    cmd.env("PKGRS_CONFIG", &config).env_remove("RUST_LOG");
    (cmd, dir)
}
