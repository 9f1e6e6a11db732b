//! Pre-build configuration validation.
//!
//! Every check here runs before the pipeline touches the output directory:
//! a configuration error must abort before any write.

use crate::config::BuildConfig;
use crate::error::{ConfigError, Result};

impl BuildConfig {
    /// Check the configuration invariants.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::NoEntries`] if the entry map is empty.
    /// - [`ConfigError::EntryNotFound`] if an entry source does not resolve
    ///   to an existing module.
    /// - [`ConfigError::InputNotFound`] if the manifest template, an icon,
    ///   or the HTML template is missing.
    /// - [`ConfigError::OutputNotADirectory`] if the output path exists and
    ///   is a plain file.
    pub fn validate(&self) -> Result<()> {
        if self.entries.is_empty() {
            return Err(ConfigError::NoEntries);
        }

        for (name, entry) in &self.entries {
            if !entry.source.is_file() {
                return Err(ConfigError::EntryNotFound {
                    name: name.clone(),
                    path: entry.source.clone(),
                });
            }
        }

        if !self.manifest_template.is_file() {
            return Err(ConfigError::InputNotFound(self.manifest_template.clone()));
        }

        for icon in &self.icons {
            if !icon.is_file() {
                return Err(ConfigError::InputNotFound(icon.clone()));
            }
        }

        if !self.popup_template.is_file() {
            return Err(ConfigError::InputNotFound(self.popup_template.clone()));
        }

        if self.output_dir.exists() && !self.output_dir.is_dir() {
            return Err(ConfigError::OutputNotADirectory(self.output_dir.clone()));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EntryPoint;
    use crate::environment::Environment;
    use std::fs;
    use tempfile::TempDir;

    /// Lay out a minimal valid project on disk.
    fn scaffold(temp: &TempDir) -> BuildConfig {
        let root = temp.path();
        for page in ["popup", "background", "editor"] {
            let dir = root.join("src/pages").join(page);
            fs::create_dir_all(&dir).unwrap();
            fs::write(dir.join("index.js"), "export default 1;\n").unwrap();
        }
        fs::write(root.join("src/manifest.json"), "{}").unwrap();
        let img = root.join("src/assets/img");
        fs::create_dir_all(&img).unwrap();
        fs::write(img.join("icon-128.png"), b"\x89PNG").unwrap();
        fs::write(img.join("icon-34.png"), b"\x89PNG").unwrap();
        fs::write(root.join("src/pages/popup/index.html"), "<html></html>").unwrap();

        BuildConfig::for_project(root, Environment::default())
    }

    #[test]
    fn complete_project_validates() {
        let temp = TempDir::new().unwrap();
        let config = scaffold(&temp);
        config.validate().unwrap();
    }

    #[test]
    fn empty_entry_map_is_rejected() {
        let temp = TempDir::new().unwrap();
        let mut config = scaffold(&temp);
        config.entries.clear();
        assert!(matches!(config.validate(), Err(ConfigError::NoEntries)));
    }

    #[test]
    fn missing_entry_source_is_rejected() {
        let temp = TempDir::new().unwrap();
        let mut config = scaffold(&temp);
        config.entries.insert(
            "options".to_string(),
            EntryPoint::new(temp.path().join("src/pages/options/index.js")),
        );

        let err = config.validate().unwrap_err();
        assert!(matches!(err, ConfigError::EntryNotFound { name, .. } if name == "options"));
    }

    #[test]
    fn missing_manifest_template_is_rejected() {
        let temp = TempDir::new().unwrap();
        let config = scaffold(&temp);
        fs::remove_file(&config.manifest_template).unwrap();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InputNotFound(_))
        ));
    }

    #[test]
    fn output_path_colliding_with_a_file_is_rejected() {
        let temp = TempDir::new().unwrap();
        let mut config = scaffold(&temp);
        let collision = temp.path().join("build-as-file");
        fs::write(&collision, "").unwrap();
        config.output_dir = collision;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::OutputNotADirectory(_))
        ));
    }
}
