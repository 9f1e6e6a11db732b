//! Configuration loading with multi-source precedence.
//!
//! Merges settings from CLI args, environment variables, and an optional
//! `crxpack.config.json`. Priority: CLI > Environment > File > Defaults.
//! The environment variables are read here, once, at the CLI boundary;
//! everything below the CLI consumes explicit values.

use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::Deserialize;
use tracing::debug;

use crxpack_config::{BuildConfig, EntryPoint, ProjectMetadata, environment};

use crate::cli::BuildArgs;
use crate::error::{CliError, Result};

/// Default configuration file name, looked up in the project root.
pub const CONFIG_FILE_NAME: &str = "crxpack.config.json";

/// The file-loadable configuration surface.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct FileConfig {
    /// Build mode (development | production)
    #[serde(default)]
    pub mode: Option<String>,

    /// Output directory, relative to the project root
    #[serde(default)]
    pub out_dir: Option<PathBuf>,

    /// Public-path prefix for runtime asset URLs
    #[serde(default)]
    pub public_path: Option<String>,

    /// Entry map overriding the default three surfaces
    #[serde(default)]
    pub entries: Option<IndexMap<String, PathBuf>>,

    /// Entry names exempt from live-reload injection
    #[serde(default)]
    pub no_reload: Option<Vec<String>>,
}

/// Load and merge the full build configuration plus project metadata.
pub fn load(args: &BuildArgs) -> Result<(BuildConfig, ProjectMetadata)> {
    let project_root = resolve_project_root(args.project_root.as_deref())?;
    let file = load_file(&project_root, args.config.as_deref())?;

    // Mode precedence: CLI > NODE_ENV > file > default (development).
    let raw_mode = args
        .mode
        .clone()
        .or_else(|| std::env::var("NODE_ENV").ok().filter(|v| !v.is_empty()))
        .or_else(|| file.mode.clone());
    let env = environment::resolve(&project_root, raw_mode.as_deref())?;

    let mut config = BuildConfig::for_project(&project_root, env);

    if let Some(prefix) = args
        .public_path
        .clone()
        .or_else(|| std::env::var("ASSET_PATH").ok().filter(|v| !v.is_empty()))
        .or_else(|| file.public_path.clone())
    {
        config.public_path = prefix;
    }

    if let Some(dir) = args.out_dir.clone().or_else(|| file.out_dir.clone()) {
        config.output_dir = resolve_path(&dir, &project_root);
    }

    if let Some(entries) = &file.entries {
        let mut map = IndexMap::new();
        for (name, source) in entries {
            map.insert(
                name.clone(),
                EntryPoint::new(resolve_path(source, &project_root)),
            );
        }
        config.entries = map;
    }

    if let Some(no_reload) = &file.no_reload {
        for name in no_reload {
            if let Some(entry) = config.entries.get_mut(name) {
                entry.hot_reload = false;
            }
        }
    }

    let metadata = ProjectMetadata::from_package_json(&project_root)?.with_env_fallback();

    debug!(
        mode = %config.mode,
        entries = config.entries.len(),
        output = %config.output_dir.display(),
        "configuration resolved"
    );

    Ok((config, metadata))
}

/// Read the config file: an explicit `--config` path must exist; the default
/// file is optional.
fn load_file(project_root: &Path, explicit: Option<&Path>) -> Result<FileConfig> {
    let path = match explicit {
        Some(path) => {
            let path = resolve_path(path, project_root);
            if !path.is_file() {
                return Err(CliError::ConfigFileNotFound(path));
            }
            path
        }
        None => {
            let path = project_root.join(CONFIG_FILE_NAME);
            if !path.is_file() {
                return Ok(FileConfig::default());
            }
            path
        }
    };

    let text = std::fs::read_to_string(&path)?;
    serde_json::from_str(&text).map_err(|source| CliError::InvalidConfigFile { path, source })
}

fn resolve_project_root(explicit: Option<&Path>) -> Result<PathBuf> {
    let cwd = std::env::current_dir()?;
    let root = match explicit {
        Some(path) => resolve_path(path, &cwd),
        None => cwd,
    };
    if !root.is_dir() {
        return Err(CliError::InvalidArgument(format!(
            "project root is not a directory: {}",
            root.display()
        )));
    }
    Ok(root)
}

fn resolve_path(path: &Path, base: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::fs;
    use tempfile::TempDir;

    fn args_for(temp: &TempDir) -> BuildArgs {
        BuildArgs {
            project_root: Some(temp.path().to_path_buf()),
            ..BuildArgs::default()
        }
    }

    #[test]
    #[serial]
    fn defaults_apply_without_file_or_flags() {
        let temp = TempDir::new().unwrap();
        let (config, _) = load(&args_for(&temp)).unwrap();

        assert_eq!(config.public_path, "/");
        assert_eq!(config.output_dir, temp.path().join("build"));
        assert_eq!(config.entries.len(), 3);
    }

    #[test]
    #[serial]
    fn cli_mode_wins_over_environment() {
        let temp = TempDir::new().unwrap();
        unsafe {
            std::env::set_var("NODE_ENV", "development");
        }

        let mut args = args_for(&temp);
        args.mode = Some("production".to_string());
        let (config, _) = load(&args).unwrap();
        assert!(config.mode.is_production());

        unsafe {
            std::env::remove_var("NODE_ENV");
        }
    }

    #[test]
    #[serial]
    fn file_settings_fill_in_below_flags() {
        let temp = TempDir::new().unwrap();
        fs::write(
            temp.path().join(CONFIG_FILE_NAME),
            r#"{ "outDir": "dist", "publicPath": "/assets/" }"#,
        )
        .unwrap();

        let (config, _) = load(&args_for(&temp)).unwrap();
        assert_eq!(config.output_dir, temp.path().join("dist"));
        assert_eq!(config.public_path, "/assets/");
    }

    #[test]
    #[serial]
    fn file_entries_replace_the_default_surfaces() {
        let temp = TempDir::new().unwrap();
        fs::write(
            temp.path().join(CONFIG_FILE_NAME),
            r#"{ "entries": { "popup": "app/popup.js", "worker": "app/worker.js" },
                 "noReload": ["worker"] }"#,
        )
        .unwrap();

        let (config, _) = load(&args_for(&temp)).unwrap();
        assert_eq!(config.entries.len(), 2);
        assert_eq!(
            config.entries["popup"].source,
            temp.path().join("app/popup.js")
        );
        assert_eq!(config.no_reload_entries(), ["worker"]);
    }

    #[test]
    #[serial]
    fn explicit_config_path_must_exist() {
        let temp = TempDir::new().unwrap();
        let mut args = args_for(&temp);
        args.config = Some(temp.path().join("missing.json"));

        assert!(matches!(
            load(&args),
            Err(CliError::ConfigFileNotFound(_))
        ));
    }

    #[test]
    #[serial]
    fn unknown_file_keys_are_rejected() {
        let temp = TempDir::new().unwrap();
        fs::write(
            temp.path().join(CONFIG_FILE_NAME),
            r#"{ "outputDirectory": "dist" }"#,
        )
        .unwrap();

        assert!(matches!(
            load(&args_for(&temp)),
            Err(CliError::InvalidConfigFile { .. })
        ));
    }
}
