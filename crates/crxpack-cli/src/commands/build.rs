//! Build command implementation.
//!
//! # Build Process
//!
//! 1. Load and validate configuration (CLI > Env > File > Defaults)
//! 2. Run the pipeline: clean, compile entries, emit assets and manifest
//! 3. Display the build summary

use std::time::Instant;

use crate::cli::BuildArgs;
use crate::config;
use crate::error::Result;
use crate::ui;

/// Execute the build command.
///
/// # Errors
///
/// Returns errors for invalid configuration, transform failures, manifest
/// corruption, and file system errors, all fatal, surfaced with a non-zero
/// exit.
pub fn execute(args: BuildArgs) -> Result<()> {
    let start_time = Instant::now();

    ui::info("Loading configuration...");
    let (build_config, metadata) = config::load(&args)?;

    ui::info(&format!("Mode: {}", build_config.mode));
    ui::info(&format!(
        "Entries: {}",
        build_config
            .entries
            .keys()
            .cloned()
            .collect::<Vec<_>>()
            .join(", ")
    ));
    ui::info(&format!("Output: {}", build_config.output_dir.display()));

    let report = crxpack_bundler::build(&build_config, &metadata)?;

    for artifact in &report.artifacts {
        ui::info(&format!(
            "  {} ({})",
            artifact.name,
            ui::format_size(artifact.size)
        ));
    }
    if !report.removed.is_empty() {
        ui::info(&format!(
            "Removed {} stale artifact(s)",
            report.removed.len()
        ));
    }

    ui::success(&format!(
        "Build completed in {}",
        ui::format_duration(start_time.elapsed())
    ));

    Ok(())
}
