//! # PkgRS Core Infrastructure
//!
//! File: cli/src/core/mod.rs
//! Author: Christi Mahu
//!
//! **DISCLAIMER:** This repository is in the early phases of being rewritten
//! and is not suitable for production development yet.
//!
//! ## Overview
//!
//! This module aggregates the foundational pieces shared by every part of
//! PkgRS:
//! - `config`: Configuration loading, path expansion and validation
//! - `error`: Hard-failure error type and failure classification
//! - `task`: The `TaskResult` contract returned by every command operation
//!
//! ## Usage
//!
//! ```rust
//! use crate::core::config; // For loading configuration
//! use crate::core::error::{PkgError, Result}; // For error handling
//! use crate::core::task::TaskResult; // For command outcomes
//! ```
//!
pub mod config;
pub mod error;
pub mod task;
