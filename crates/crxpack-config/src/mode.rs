//! The two-valued build mode selecting an optimization preset.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Active build mode.
///
/// Selected once per build and never transitioned mid-build. Development
/// favors rebuild speed (source maps, no minification); production favors
/// shipped size (dead-code elimination, minification, comment stripping).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    #[default]
    Development,
    Production,
}

impl Mode {
    /// Parse an optional raw mode value, typically from `NODE_ENV`.
    ///
    /// Unset means development. Any value other than the two recognized
    /// modes is a configuration error, not a silent fallback.
    pub fn from_env_value(raw: Option<&str>) -> Result<Self, ConfigError> {
        match raw {
            None | Some("") => Ok(Mode::Development),
            Some(s) => s.parse(),
        }
    }

    /// The string form used in file names (`secrets.<mode>.js`) and logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Development => "development",
            Mode::Production => "production",
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Mode::Production)
    }
}

impl std::str::FromStr for Mode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "development" => Ok(Mode::Development),
            "production" => Ok(Mode::Production),
            other => Err(ConfigError::InvalidMode(other.to_string())),
        }
    }
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
