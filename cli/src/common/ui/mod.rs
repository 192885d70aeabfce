//! # PkgRS UI Utilities Module (`common::ui`)
//!
//! File: cli/src/common/ui/mod.rs
//! Author: Christi Mahu
//!
//! **DISCLAIMER:** This repository is in the early phases of being rewritten
//! and is not suitable for production development yet.
//!

//! ## Overview
//!
//! The two interactive collaborators of the engine, each behind a trait so the
//! engine never touches the terminal directly:
//!
//! - **`prompt`**: the credential provider. `prompt_for_secret` returns a
//!   [`RootCredential`](crate::common::shell::RootCredential) or `None` when the
//!   user declines. The terminal implementation uses `dialoguer`.
//! - **`progress`**: the progress sink receiving `{message, increment}` updates
//!   during an install. The terminal implementation draws an `indicatif` bar.
//!
pub mod progress;
pub mod prompt;
