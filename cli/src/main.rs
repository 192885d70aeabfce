//! # PkgRS Main Entry Point
//!
//! File: cli/src/main.rs
//! Author: Christi Mahu
//!
//! **DISCLAIMER:** This repository is in the early phases of being rewritten
//! and is not suitable for production development yet.
//!
//! ## Overview
//!
//! This file serves as the main entry point for the PkgRS CLI application.
//! It handles:
//! - Command-line argument parsing using Clap
//! - Setting up the logging system based on verbosity flags
//! - Loading the configuration and building the per-host engine
//! - Routing execution to appropriate command handlers
//!
//! ## Examples
//!
//! ```bash
//! # Is Chocolatey / Homebrew installed?
//! pkgrs status
//!
//! # Install it, teeing the installer output
//! pkgrs install --log-path ./install.log
//!
//! # Run an elevated command, JSON result on stdout
//! pkgrs --json run --elevated "brew cleanup"
//! ```
//!
//! Command processing flow:
//! 1. Parse command-line args via Clap
//! 2. Configure logging based on verbosity level
//! 3. Load configuration, route to the command handler
//! 4. Print any error; an `Error` task result exits with status 1
//!
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::{fmt, EnvFilter};

mod commands;
mod common;
mod core;

use crate::core::error::PkgError;

#[derive(Parser, Debug)]
#[command(
    name = "pkgrs",
    about = "PkgRS: privileged commands and package manager provisioning",
    long_about = "Check for, install and drive the host package manager (Chocolatey on Windows,\n\
                  Homebrew on macOS), and run commands with or without elevation.",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
    /// Configuration file (defaults to the user config file)
    #[arg(long, global = true, value_name = "FILE", env = "PKGRS_CONFIG")]
    config: Option<PathBuf>,
    /// Print task results as JSON
    #[arg(long, global = true)]
    json: bool,
}

#[derive(Parser, Debug)]
enum Commands {
    /// Show whether the package manager is installed
    #[command(alias = "s")]
    Status(commands::status::StatusArgs),
    /// Install the package manager if it is missing
    #[command(alias = "i")]
    Install(commands::install::InstallArgs),
    /// Uninstall a package (elevated)
    Uninstall(commands::uninstall::UninstallArgs),
    /// Run a command in the host shell
    #[command(alias = "r")]
    Run(commands::run::RunArgs),
    /// Read or relax the PowerShell execution policy (Windows)
    Policy(commands::policy::PolicyArgs),
    /// Show the package manager's install log
    Log(commands::log::LogArgs),
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = core::config::load_config(cli.config.as_deref())?;
    let session = commands::Session::new(config, cli.json);

    match cli.command {
        Commands::Status(args) => commands::status::handle_status(&session, args).await,
        Commands::Install(args) => commands::install::handle_install(&session, args).await,
        Commands::Uninstall(args) => commands::uninstall::handle_uninstall(&session, args).await,
        Commands::Run(args) => commands::run::handle_run(&session, args).await,
        Commands::Policy(args) => commands::policy::handle_policy(&session, args).await,
        Commands::Log(args) => commands::log::handle_log(&session, args).await,
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));
    fmt::Subscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();

    tracing::debug!("Parsed CLI arguments: {:?}", cli);

    if let Err(e) = run(cli).await {
        tracing::debug!("Command execution failed: {:?}", e);
        match e.downcast_ref::<PkgError>() {
            Some(PkgError::TaskFailed(message)) => eprintln!("{}", message),
            _ => eprintln!("Error: {}", e),
        }
        std::process::exit(1);
    }

    Ok(())
}
