//! Check command implementation: validate configuration without building.

use crate::cli::{BuildArgs, CheckArgs};
use crate::config;
use crate::error::Result;
use crate::ui;

/// Execute the check command.
///
/// Loads the merged configuration and runs the same validation the build
/// performs, without touching the output directory.
pub fn execute(args: CheckArgs) -> Result<()> {
    let build_args = BuildArgs {
        mode: args.mode,
        config: args.config,
        project_root: args.project_root,
        ..BuildArgs::default()
    };

    let (build_config, _) = config::load(&build_args)?;
    build_config.validate().map_err(crate::error::CliError::Config)?;

    ui::info(&format!("Mode: {}", build_config.mode));
    for (name, entry) in &build_config.entries {
        let reload = if entry.hot_reload { "" } else { " (no live-reload)" };
        ui::info(&format!("  {name}: {}{reload}", entry.source.display()));
    }
    ui::success("Configuration is valid");

    Ok(())
}
