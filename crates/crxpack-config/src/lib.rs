//! Build configuration for the crxpack extension bundler.
//!
//! This crate owns everything that parameterizes a build before the pipeline
//! runs: the active [`Mode`], the [`BuildConfig`] describing entries and
//! output locations, alias overrides resolved by the [`environment`] module,
//! and the [`ProjectMetadata`] merged into the extension manifest.
//!
//! The mode is an explicit value threaded through every component call, never
//! ambient process state: multiple builds with different configurations can
//! run in the same process without interference. Reading `NODE_ENV` and
//! `ASSET_PATH` happens once at the CLI boundary; everything below consumes
//! the resolved values.
//!
//! # Example
//!
//! ```no_run
//! use crxpack_config::{BuildConfig, Mode, environment};
//! use std::path::Path;
//!
//! # fn main() -> Result<(), crxpack_config::ConfigError> {
//! let root = Path::new(".");
//! let env = environment::resolve(root, Some("production"))?;
//! let config = BuildConfig::for_project(root, env);
//! config.validate()?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod environment;
pub mod error;
pub mod metadata;
pub mod mode;
pub mod validation;

pub use config::{BuildConfig, EntryPoint};
pub use environment::Environment;
pub use error::{ConfigError, Result};
pub use metadata::ProjectMetadata;
pub use mode::Mode;
