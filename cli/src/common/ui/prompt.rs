//! # PkgRS Credential Prompt
//!
//! File: cli/src/common/ui/prompt.rs
//! Author: Christi Mahu
//!
//! **DISCLAIMER:** This repository is in the early phases of being rewritten
//! and is not suitable for production development yet.
//!
//! ## Overview
//!
//! Obtains the root password for one elevated invocation. An absent answer is
//! an explicit decline, not an error. The prompt blocks on user input with no
//! timeout, so it runs on a blocking thread to keep the runtime free.
//!
use crate::common::shell::RootCredential;
use crate::core::error::PkgError;
use async_trait::async_trait;
use dialoguer::Password;
use std::io::IsTerminal;
use tracing::{debug, warn};

const PROMPT_TEXT: &str = "Root Password (used to login to your computer)";

/// Source of root credentials.
#[async_trait]
pub trait CredentialProvider: Send + Sync {
    /// Returns the secret, or `None` when the user declined.
    async fn prompt_for_secret(&self, reason: Option<&str>) -> Option<RootCredential>;
}

/// Hidden-input prompt on the controlling terminal.
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalCredentialProvider;

#[async_trait]
impl CredentialProvider for TerminalCredentialProvider {
    async fn prompt_for_secret(&self, reason: Option<&str>) -> Option<RootCredential> {
        if !std::io::stdin().is_terminal() {
            debug!("stdin is not a terminal; treating the credential prompt as declined");
            return None;
        }
        let prompt = prompt_text(reason);
        let answer = tokio::task::spawn_blocking(move || {
            Password::new()
                .with_prompt(prompt)
                .allow_empty_password(true)
                .interact()
        })
        .await;

        match answer {
            Ok(Ok(secret)) => RootCredential::new(secret),
            Ok(Err(e)) => {
                warn!("{}", PkgError::Prompt(e.to_string()));
                None
            }
            Err(e) => {
                warn!("{}", PkgError::Prompt(e.to_string()));
                None
            }
        }
    }
}

fn prompt_text(reason: Option<&str>) -> String {
    match reason {
        Some(reason) if !reason.trim().is_empty() => format!("{} {}", PROMPT_TEXT, reason.trim()),
        _ => PROMPT_TEXT.to_string(),
    }
}

// --- Unit Tests ---
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_text_appends_reason() {
        assert_eq!(prompt_text(None), PROMPT_TEXT);
        assert_eq!(prompt_text(Some("  ")), PROMPT_TEXT);
        assert_eq!(
            prompt_text(Some("to install Homebrew.")),
            "Root Password (used to login to your computer) to install Homebrew."
        );
    }
}
