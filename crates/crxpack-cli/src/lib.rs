//! crxpack CLI - command-line interface for the extension build pipeline.
//!
//! This crate exposes the `crxpack-bundler` pipeline through a CLI with
//! clear error messages and a small terminal UI.
//!
//! # Architecture
//!
//! - [`cli`] - clap-derive command and flag definitions
//! - [`commands`] - individual command implementations
//! - [`config`] - configuration loading with CLI > Env > File > Defaults
//! - [`error`] - structured error types and miette conversion
//! - [`logger`] - tracing-based structured logging
//! - [`ui`] - terminal status messages and formatting helpers

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod logger;
pub mod ui;

pub use error::{CliError, Result};
