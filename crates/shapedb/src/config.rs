//! TOML-backed settings for schema validation and migration.

use serde::{Deserialize, Serialize};
use shapedb_schema::validate::ValidateOptions;
use std::{fs, path::Path};
use thiserror::Error as ThisError;

///
/// ConfigError
///

#[derive(Debug, ThisError)]
pub enum ConfigError {
    #[error("failed to read config '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

///
/// Config
///
/// Every section and field is optional; an empty document yields the
/// defaults.
///

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub schema: SchemaConfig,
    pub migration: MigrationConfig,
}

impl Config {
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;

        Self::from_toml_str(&contents)
    }

    #[must_use]
    pub const fn validate_options(&self) -> ValidateOptions {
        ValidateOptions {
            strict_names: self.schema.strict_names,
        }
    }
}

///
/// SchemaConfig
///

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct SchemaConfig {
    /// Require class and property names to be ASCII identifiers.
    pub strict_names: bool,
}

///
/// MigrationConfig
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct MigrationConfig {
    /// Allow removals and type changes that drop stored data.
    pub allow_destructive: bool,

    /// Log every applied change at info level.
    pub log_changes: bool,
}

impl Default for MigrationConfig {
    fn default() -> Self {
        Self {
            allow_destructive: false,
            log_changes: true,
        }
    }
}

///
/// TESTS
///
