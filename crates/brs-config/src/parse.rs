//! Configuration file parsing.
//!
//! Parses individual `.brs.toml` files into intermediate `RawConfig` structures
//! that preserve the optional nature of all fields before merging.

use std::{collections::BTreeMap, fs, path::Path};

use brs_query::FieldIndex;
use serde::Deserialize;
use serde_with::{DisplayFromStr, OneOrMany, serde_as};
#[cfg(test)]
use toml::de::Error as TomlError;

use crate::{ConfigError, DefaultOperator, ScoringModel};

/// Raw configuration as parsed directly from a TOML file.
///
/// All fields are optional to support partial configs that will be merged.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawConfig {
    /// When true, stop discovery here - ignore parent and global configs.
    pub root: Option<bool>,
    /// Index settings section.
    pub index: Option<RawIndexSettings>,
    /// Search settings section.
    pub search: Option<RawSearchSettings>,
}

/// Raw index settings.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawIndexSettings {
    /// Index directory, relative to the config file.
    pub path: Option<String>,
    /// Indexing memory budget in megabytes.
    pub memory_limit_mb: Option<usize>,
    /// Indexing threads (0 = one per CPU).
    pub workers: Option<usize>,
}

/// Raw search settings.
#[serde_as]
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawSearchSettings {
    /// Maximum results per query.
    pub limit: Option<usize>,
    /// Longest accepted query, in characters.
    pub max_query_length: Option<usize>,
    /// Fields searched by terms without a suffix. Accepts a single name or a list.
    #[serde_as(as = "Option<OneOrMany<DisplayFromStr>>")]
    pub default_fields: Option<Vec<FieldIndex>>,
    /// Connective joining adjacent operands.
    pub default_operator: Option<DefaultOperator>,
    /// Scoring model.
    pub scoring: Option<ScoringModel>,
    /// Per-field score multipliers.
    #[serde_as(as = "Option<BTreeMap<DisplayFromStr, _>>")]
    pub boosts: Option<BTreeMap<FieldIndex, f32>>,
}

/// Parses a configuration file from disk.
pub fn parse_config_file(path: &Path) -> Result<RawConfig, ConfigError> {
    let contents = fs::read_to_string(path).map_err(|source| ConfigError::ReadFile {
        path: path.to_path_buf(),
        source,
    })?;

    parse_config_str(&contents, path)
}

/// Parses configuration from a TOML string.
///
/// The `path` parameter is used for error reporting.
pub fn parse_config_str(contents: &str, path: &Path) -> Result<RawConfig, ConfigError> {
    toml::from_str(contents).map_err(|source| ConfigError::ParseToml {
        path: path.to_path_buf(),
        source,
    })
}

/// Parses configuration from a TOML string without path context.
#[cfg(test)]
pub fn parse_config(contents: &str) -> Result<RawConfig, TomlError> {
    toml::from_str(contents)
}

/// Checks if a config file has `root = true` set.
///
/// Returns false if the file cannot be read or parsed.
pub fn is_root_config(path: &Path) -> bool {
    let Ok(contents) = fs::read_to_string(path) else {
        return false;
    };
    let Ok(config) = toml::from_str::<RawConfig>(&contents) else {
        return false;
    };
    config.root == Some(true)
}
