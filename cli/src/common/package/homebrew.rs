//! # PkgRS Homebrew Facade
//!
//! File: cli/src/common/package/homebrew.rs
//! Author: Christi Mahu
//!
//! **DISCLAIMER:** This repository is in the early phases of being rewritten
//! and is not suitable for production development yet.
//!
//! ## Overview
//!
//! macOS package manager. The bootstrap is the installer script shipped next
//! to the binary; it is fed to `bash` with the root password as its first
//! positional argument, so the credential is requested before the bootstrap
//! rather than through `sudo` elevation.
//!
use super::PackageManagerFacade;
use crate::common::shell::{CommandSpec, RootCredential};
use std::path::{Path, PathBuf};

pub struct Homebrew {
    install_script: PathBuf,
    install_log: PathBuf,
}

impl Homebrew {
    pub fn new(install_script: impl Into<PathBuf>, install_log: impl Into<PathBuf>) -> Self {
        Self {
            install_script: install_script.into(),
            install_log: install_log.into(),
        }
    }
}

fn quote_path(path: &Path) -> String {
    shell_words::quote(&path.to_string_lossy()).into_owned()
}

impl PackageManagerFacade for Homebrew {
    fn name(&self) -> &'static str {
        "Homebrew"
    }

    fn executable(&self) -> &'static str {
        "brew"
    }

    fn version_query(&self) -> CommandSpec {
        CommandSpec::new("brew -v")
    }

    fn install_needs_credential(&self) -> bool {
        true
    }

    /// `mkdir -p <dir> && cat -s <script> | bash -s <cred> 2>&1 | tee <log> && echo "Success."`
    fn bootstrap(
        &self,
        credential: Option<&RootCredential>,
        log_path: Option<&Path>,
    ) -> CommandSpec {
        let log = log_path.unwrap_or(&self.install_log);
        let mut command = String::new();
        if let Some(dir) = log.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            command.push_str(&format!("mkdir -p {} && ", quote_path(dir)));
        }
        command.push_str(&format!("cat -s {} | bash -s", quote_path(&self.install_script)));
        if let Some(credential) = credential {
            command.push(' ');
            command.push_str(&shell_words::quote(credential.expose()));
        }
        command.push_str(&format!(" 2>&1 | tee {} && echo \"Success.\"", quote_path(log)));
        CommandSpec::new(command).sensitive()
    }

    fn uninstall_command(&self, package: &str, version: Option<&str>) -> CommandSpec {
        let target = match version {
            Some(version) => format!("{}@{}", package, version),
            None => package.to_string(),
        };
        CommandSpec::new(format!("brew uninstall {}", target)).with_elevation()
    }

    fn install_log_path(&self) -> PathBuf {
        self.install_log.clone()
    }
}

// --- Unit Tests ---
#[cfg(test)]
mod tests {
    use super::*;

    fn facade() -> Homebrew {
        Homebrew::new(
            "/Applications/PkgRS/scripts/install_brew.sh",
            "/Users/me/Library/pkgrs/brew install.log",
        )
    }

    #[test]
    fn test_bootstrap_command_line() {
        let cred = RootCredential::new("s3cr3t $x").unwrap();
        let spec = facade().bootstrap(Some(&cred), None);

        assert_eq!(
            spec.command(),
            "mkdir -p /Users/me/Library/pkgrs && \
             cat -s /Applications/PkgRS/scripts/install_brew.sh | bash -s 's3cr3t $x' 2>&1 | \
             tee '/Users/me/Library/pkgrs/brew install.log' && echo \"Success.\""
        );
        assert!(!spec.is_elevated());
        assert!(spec.is_sensitive());
        assert!(!spec.display_command().contains("s3cr3t"));
    }

    #[test]
    fn test_bootstrap_honours_log_override() {
        let spec = facade().bootstrap(None, Some(Path::new("brew.log")));
        assert_eq!(
            spec.command(),
            "cat -s /Applications/PkgRS/scripts/install_brew.sh | bash -s 2>&1 | \
             tee brew.log && echo \"Success.\""
        );
    }

    #[test]
    fn test_uninstall_commands() {
        let brew = facade();
        let spec = brew.uninstall_command("node", Some("18"));
        assert_eq!(spec.command(), "brew uninstall node@18");
        assert!(spec.is_elevated());
        assert_eq!(brew.uninstall_command("node", None).command(), "brew uninstall node");
        assert_eq!(brew.version_query().command(), "brew -v");
    }
}
