//! Environment resolution: build mode and alias overrides.
//!
//! Runs before every other component and parameterizes all of them. Beyond
//! parsing the mode value this registers module-resolution aliases: the
//! fixed `react-dom` substitution the hot-reload collaborator expects, and,
//! when the file exists on disk, a mode-specific `secrets.<mode>.js`
//! override so environment-specific values can be injected without touching
//! source.

use std::path::Path;

use indexmap::IndexMap;
use tracing::debug;

use crate::error::Result;
use crate::mode::Mode;

/// The alias name source modules import environment overrides under.
pub const SECRETS_ALIAS: &str = "secrets";

/// Resolved environment: the active mode plus alias overrides.
#[derive(Debug, Clone, Default)]
pub struct Environment {
    pub mode: Mode,

    /// Module specifier → substituted target (a path or a package name).
    /// Declaration order is resolution order, so an `IndexMap` keeps it
    /// deterministic.
    pub alias_overrides: IndexMap<String, String>,
}

/// Resolve the build environment for a project root.
///
/// `raw_mode` is the value of the mode selector variable (`NODE_ENV`), read
/// by the caller and threaded in explicitly. The only side effect is a
/// filesystem existence check for the secrets override; its absence is a
/// normal case, never an error.
///
/// # Errors
///
/// Returns [`crate::ConfigError::InvalidMode`] if `raw_mode` is set to an
/// unrecognized value.
pub fn resolve(project_root: &Path, raw_mode: Option<&str>) -> Result<Environment> {
    let mode = Mode::from_env_value(raw_mode)?;

    let mut alias_overrides = IndexMap::new();
    alias_overrides.insert(
        "react-dom".to_string(),
        "@hot-loader/react-dom".to_string(),
    );

    let secrets_path = project_root.join(format!("secrets.{mode}.js"));
    if secrets_path.is_file() {
        debug!(path = %secrets_path.display(), "registering secrets override");
        alias_overrides.insert(
            SECRETS_ALIAS.to_string(),
            secrets_path.to_string_lossy().into_owned(),
        );
    }

    Ok(Environment {
        mode,
        alias_overrides,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use tempfile::TempDir;

    #[test]
    fn missing_secrets_file_is_not_an_error() {
        let temp = TempDir::new().unwrap();

        let env = resolve(temp.path(), Some("development")).unwrap();
        assert_eq!(env.mode, Mode::Development);
        assert!(!env.alias_overrides.contains_key(SECRETS_ALIAS));
    }

    #[test]
    fn secrets_file_registers_alias_for_active_mode() {
        let temp = TempDir::new().unwrap();
        File::create(temp.path().join("secrets.production.js")).unwrap();

        let env = resolve(temp.path(), Some("production")).unwrap();
        let target = env.alias_overrides.get(SECRETS_ALIAS).unwrap();
        assert!(target.ends_with("secrets.production.js"));
    }

    #[test]
    fn secrets_file_for_other_mode_is_ignored() {
        let temp = TempDir::new().unwrap();
        File::create(temp.path().join("secrets.production.js")).unwrap();

        let env = resolve(temp.path(), Some("development")).unwrap();
        assert!(!env.alias_overrides.contains_key(SECRETS_ALIAS));
    }

    #[test]
    fn hot_reload_substitution_is_always_registered() {
        let temp = TempDir::new().unwrap();

        let env = resolve(temp.path(), None).unwrap();
        assert_eq!(
            env.alias_overrides.get("react-dom").map(String::as_str),
            Some("@hot-loader/react-dom")
        );
    }

    #[test]
    fn invalid_mode_fails_resolution() {
        let temp = TempDir::new().unwrap();
        assert!(resolve(temp.path(), Some("staging")).is_err());
    }
}
