//! # PkgRS Configuration System
//!
//! File: cli/src/core/config.rs
//! Author: Christi Mahu
//!
//! **DISCLAIMER:** This repository is in the early phases of being rewritten
//! and is not suitable for production development yet.
//!
//! ## Overview
//!
//! This module loads, expands and validates the PkgRS configuration. Every
//! setting has a default, so running without a configuration file is the
//! normal case.
//!
//! Configuration sources (in order of precedence):
//! 1. A file passed explicitly with `--config <path>`
//! 2. User-specific `<config_dir>/pkgrs/config.toml`
//! 3. Default values defined in the code
//!
//! ## Example file
//!
//! ```toml
//! [chocolatey]
//! install_script_url = "https://chocolatey.org/install.ps1"
//!
//! [homebrew]
//! install_script = "~/tools/install_brew.sh"
//! install_log = "~/Library/Logs/pkgrs/brew-install.log"
//!
//! [shell]
//! windows_program = "pwsh"
//! posix_program = "/bin/bash"
//! ```
//!
use crate::core::error::{PkgError, Result};
use anyhow::{anyhow, Context};
use directories::ProjectDirs;
use serde::Deserialize;
use std::{
    fs,
    path::{Path, PathBuf},
};
use tracing::{debug, info};

/// Represents the main configuration structure, loaded from TOML files.
#[derive(Deserialize, Debug, Default, Clone)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub chocolatey: ChocolateyConfig,
    #[serde(default)]
    pub homebrew: HomebrewConfig,
    #[serde(default)]
    pub shell: ShellConfig,
}

/// Settings for the Windows package manager.
#[derive(Deserialize, Debug, Clone)]
#[serde(deny_unknown_fields)]
pub struct ChocolateyConfig {
    /// Remote bootstrap script fetched and evaluated by the elevated shell.
    #[serde(default = "default_choco_script_url")]
    pub install_script_url: String,
}

/// Settings for the macOS package manager.
#[derive(Deserialize, Debug, Clone)]
#[serde(deny_unknown_fields)]
pub struct HomebrewConfig {
    /// Installer script shipped alongside PkgRS (can use ~).
    #[serde(default = "default_brew_script")]
    pub install_script: String,
    /// File the installer output is teed to (can use ~).
    #[serde(default = "default_brew_log")]
    pub install_log: String,
}

/// Shell programs used to run command lines.
#[derive(Deserialize, Debug, Clone)]
#[serde(deny_unknown_fields)]
pub struct ShellConfig {
    #[serde(default = "default_windows_program")]
    pub windows_program: String,
    #[serde(default = "default_posix_program")]
    pub posix_program: String,
}

impl Default for ChocolateyConfig {
    fn default() -> Self {
        Self {
            install_script_url: default_choco_script_url(),
        }
    }
}

impl Default for HomebrewConfig {
    fn default() -> Self {
        Self {
            install_script: default_brew_script(),
            install_log: default_brew_log(),
        }
    }
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            windows_program: default_windows_program(),
            posix_program: default_posix_program(),
        }
    }
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("com", "PkgRS", "pkgrs")
}

fn default_choco_script_url() -> String {
    "https://chocolatey.org/install.ps1".to_string()
}

/// The installer ships in `scripts/` next to the executable.
fn default_brew_script() -> String {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|dir| dir.join("scripts").join("install_brew.sh")))
        .map(|p| p.to_string_lossy().into_owned())
        .unwrap_or_else(|| "./scripts/install_brew.sh".to_string())
}

fn default_brew_log() -> String {
    project_dirs()
        .map(|dirs| dirs.data_dir().join("brew-install.log"))
        .map(|p| p.to_string_lossy().into_owned())
        .unwrap_or_else(|| "~/.pkgrs/brew-install.log".to_string())
}

fn default_windows_program() -> String {
    "powershell".to_string()
}

fn default_posix_program() -> String {
    "/bin/sh".to_string()
}

const USER_CONFIG_FILENAME: &str = "config.toml";

/// Loads the configuration, preferring an explicit file over the user file.
pub fn load_config(explicit: Option<&Path>) -> Result<Config> {
    let mut config = match explicit {
        Some(path) => {
            info!("Loading configuration from: {}", path.display());
            load_config_from_path(path)?
        }
        None => load_user_config()?.unwrap_or_default(),
    };
    expand_config_paths(&mut config);
    validate_config(&config).context("Configuration validation failed")?;
    debug!("Final loaded configuration: {:?}", config);
    Ok(config)
}

fn load_user_config() -> Result<Option<Config>> {
    let Some(dirs) = project_dirs() else {
        debug!("Could not determine user config directory.");
        return Ok(None);
    };
    let config_path = dirs.config_dir().join(USER_CONFIG_FILENAME);
    if config_path.is_file() {
        info!("Loading user configuration from: {}", config_path.display());
        load_config_from_path(&config_path).map(Some)
    } else {
        debug!(
            "User configuration file not found at {}",
            config_path.display()
        );
        Ok(None)
    }
}

fn load_config_from_path(path: &Path) -> Result<Config> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read configuration file: {}", path.display()))?;
    toml::from_str(&content)
        .with_context(|| format!("Failed to parse TOML from file: {}", path.display()))
}

fn expand_config_paths(config: &mut Config) {
    config.homebrew.install_script =
        shellexpand::tilde(&config.homebrew.install_script).into_owned();
    config.homebrew.install_log = shellexpand::tilde(&config.homebrew.install_log).into_owned();
    debug!(
        "Expanded Homebrew paths: script={}, log={}",
        config.homebrew.install_script, config.homebrew.install_log
    );
}

fn validate_config(config: &Config) -> Result<()> {
    if !config.chocolatey.install_script_url.starts_with("https://") {
        return Err(anyhow!(PkgError::Config(format!(
            "Chocolatey install script URL must use https: '{}'",
            config.chocolatey.install_script_url
        ))));
    }
    if config.shell.windows_program.trim().is_empty()
        || config.shell.posix_program.trim().is_empty()
    {
        return Err(anyhow!(PkgError::Config(
            "Shell programs cannot be empty.".to_string()
        )));
    }
    if config.homebrew.install_log.trim().is_empty() {
        return Err(anyhow!(PkgError::Config(
            "Homebrew install log path cannot be empty.".to_string()
        )));
    }
    Ok(())
}

impl HomebrewConfig {
    pub fn install_script_path(&self) -> PathBuf {
        PathBuf::from(&self.install_script)
    }

    pub fn install_log_path(&self) -> PathBuf {
        PathBuf::from(&self.install_log)
    }
}

// --- Unit Tests ---
#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_deserialize_basic_toml() {
        let toml_content = r#"
            [homebrew]
            install_script = "/opt/pkgrs/install_brew.sh"

            [shell]
            posix_program = "/bin/bash"
        "#;

        let config: Config = toml::from_str(toml_content).expect("Failed to parse TOML");

        assert_eq!(config.homebrew.install_script, "/opt/pkgrs/install_brew.sh");
        assert_eq!(config.homebrew.install_log, default_brew_log()); // Default
        assert_eq!(config.shell.posix_program, "/bin/bash");
        assert_eq!(config.shell.windows_program, "powershell"); // Default
        assert_eq!(
            config.chocolatey.install_script_url,
            "https://chocolatey.org/install.ps1"
        );
    }

    #[test]
    fn test_unknown_fields_rejected() {
        let result: std::result::Result<Config, _> = toml::from_str("[shell]\nfish = true\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_path_expansion() {
        let mut config = Config {
            homebrew: HomebrewConfig {
                install_script: "~/brew/install.sh".to_string(),
                install_log: "/absolute/brew.log".to_string(),
            },
            ..Default::default()
        };

        expand_config_paths(&mut config);

        assert!(!config.homebrew.install_script.starts_with('~'));
        assert!(config.homebrew.install_script.ends_with("brew/install.sh"));
        assert_eq!(config.homebrew.install_log, "/absolute/brew.log"); // Absolute path unchanged
    }

    #[test]
    fn test_validate_config_rejects_plain_http() {
        let config = Config {
            chocolatey: ChocolateyConfig {
                install_script_url: "http://chocolatey.org/install.ps1".to_string(),
            },
            ..Default::default()
        };
        let result = validate_config(&config);
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("must use https"));
    }

    #[test]
    fn test_validate_config_rejects_empty_shell() {
        let config = Config {
            shell: ShellConfig {
                windows_program: "powershell".into(),
                posix_program: "  ".into(),
            },
            ..Default::default()
        };
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_load_config_from_explicit_file() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("pkgrs.toml");
        fs::write(&path, "[homebrew]\ninstall_log = \"/tmp/brew.log\"\n").unwrap();

        let config = load_config(Some(&path)).unwrap();
        assert_eq!(config.homebrew.install_log_path(), PathBuf::from("/tmp/brew.log"));
    }

    #[test]
    fn test_load_config_missing_explicit_file_fails() {
        let temp_dir = tempdir().unwrap();
        let result = load_config(Some(&temp_dir.path().join("absent.toml")));
        assert!(result.is_err());
    }
}
