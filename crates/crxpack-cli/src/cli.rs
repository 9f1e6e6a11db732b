//! Command-line interface definition for the crxpack pipeline.
//!
//! Defines the complete CLI structure using clap v4's derive macros.
//!
//! # Command Structure
//!
//! - `crxpack build` - Compile the extension source tree into the bundle directory
//! - `crxpack check` - Load and validate configuration without building

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// crxpack - a build pipeline for browser extensions
#[derive(Parser, Debug)]
#[command(
    name = "crxpack",
    version,
    about = "A build pipeline for browser extensions",
    long_about = "crxpack compiles a multi-surface extension source tree (popup, background,\n\
                  editor) into a deployable bundle directory: per-entry module graphs,\n\
                  asset emission, manifest synthesis, and mode-specific optimization."
)]
pub struct Cli {
    /// Enable verbose logging (debug level)
    ///
    /// Shows detailed information about the pipeline, including module
    /// transforms, dependency resolution, and stale-artifact removals.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Compile the extension into the output directory
    Build(BuildArgs),

    /// Validate configuration without building
    Check(CheckArgs),
}

#[derive(Args, Debug, Default)]
pub struct BuildArgs {
    /// Build mode: development or production
    ///
    /// Overrides the NODE_ENV environment variable. Development attaches
    /// source maps; production minifies with dead-code elimination.
    #[arg(long, value_name = "MODE")]
    pub mode: Option<String>,

    /// Output directory for all build artifacts
    #[arg(long, value_name = "DIR")]
    pub out_dir: Option<PathBuf>,

    /// Path to a configuration file (default: crxpack.config.json if present)
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Public-path prefix for runtime asset URLs
    ///
    /// Overrides the ASSET_PATH environment variable.
    #[arg(long, value_name = "PREFIX")]
    pub public_path: Option<String>,

    /// Project root directory (default: current directory)
    #[arg(long, value_name = "DIR")]
    pub project_root: Option<PathBuf>,
}

#[derive(Args, Debug, Default)]
pub struct CheckArgs {
    /// Build mode to validate against
    #[arg(long, value_name = "MODE")]
    pub mode: Option<String>,

    /// Path to a configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Project root directory (default: current directory)
    #[arg(long, value_name = "DIR")]
    pub project_root: Option<PathBuf>,
}
