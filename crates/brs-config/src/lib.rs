//! Configuration system for brs.
//!
//! brs uses TOML configuration files named `.brs.toml`. Configuration is resolved by walking up
//! the directory tree from the current working directory, collecting any `.brs.toml` files found,
//! then loading `~/.brs.toml` as the global config with lowest precedence.

#![warn(missing_docs)]

mod discovery;
mod error;
mod merge;
mod parse;
mod resolve;
mod templates;
#[cfg(test)]
mod test_support;
mod validate;

use std::{
    collections::BTreeMap,
    fmt,
    path::{Path, PathBuf},
    str::FromStr,
};

use brs_query::{BoolOp, FieldIndex};
pub use discovery::{CONFIG_FILENAME, discover_config_files, global_config_path, is_global_config};
pub use error::ConfigError;
pub use merge::{ParsedConfig, merge_configs};
pub use parse::{
    RawConfig, RawIndexSettings, RawSearchSettings, parse_config_file, parse_config_str,
};
pub use resolve::resolve_index_path;
use serde::{Deserialize, Serialize};
use serde_with::{DisplayFromStr, serde_as};
pub use templates::{global_template, local_template};
pub use validate::ConfigWarning;
use validate::validate_config;

/// Index directory used when no configuration names one, relative to the
/// most specific config file (or the working directory).
pub const DEFAULT_INDEX_DIR: &str = ".brs/index";

/// Top-level merged configuration for brs.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Index location and build settings.
    pub index: IndexSettings,
    /// Query settings.
    pub search: SearchSettings,
    /// Directory containing the most specific config file.
    pub config_root: Option<PathBuf>,
}

impl Config {
    /// Loads configuration by discovering and merging all relevant `.brs.toml` files.
    ///
    /// Returns `Ok(Config::default())` if no configuration files are found.
    pub fn load(cwd: &Path) -> Result<Self, ConfigError> {
        let config_files = discover_config_files(cwd);
        Self::load_from_files(&config_files)
    }

    /// Loads configuration from a specific list of config file paths.
    ///
    /// Files should be provided in precedence order: highest precedence first.
    pub fn load_from_files(files: &[PathBuf]) -> Result<Self, ConfigError> {
        if files.is_empty() {
            return Ok(Self::default());
        }

        let parsed: Vec<ParsedConfig> = files
            .iter()
            .map(|path| {
                let config = parse_config_file(path)?;
                Ok(ParsedConfig {
                    path: path.clone(),
                    config,
                })
            })
            .collect::<Result<Vec<_>, ConfigError>>()?;

        merge_configs(&parsed)
    }

    /// Returns the index directory.
    ///
    /// An explicitly configured path wins; otherwise [`DEFAULT_INDEX_DIR`] under
    /// the config root, or under `cwd` when no config file was found.
    pub fn index_dir(&self, cwd: &Path) -> PathBuf {
        if let Some(path) = &self.index.path {
            return path.clone();
        }
        self.config_root
            .as_deref()
            .unwrap_or(cwd)
            .join(DEFAULT_INDEX_DIR)
    }

    /// Validates the configuration and returns any warnings.
    pub fn validate(&self) -> Vec<ConfigWarning> {
        validate_config(self)
    }

    /// Serializes the effective settings to TOML format.
    pub fn settings_to_toml(&self) -> Result<String, ConfigError> {
        let serializable = SerializableSettings {
            index: SerializableIndexSettings {
                path: self.index.path.as_ref().map(|p| p.display().to_string()),
                memory_limit_mb: self.index.memory_limit_mb,
                workers: self.index.workers,
            },
            search: self.search.clone(),
        };
        Ok(toml::to_string_pretty(&serializable)?)
    }
}

/// Index location and build settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexSettings {
    /// Resolved index directory, if configured.
    pub path: Option<PathBuf>,
    /// Indexing memory budget in megabytes, shared by all workers.
    pub memory_limit_mb: usize,
    /// Indexing threads (0 = one per CPU).
    pub workers: usize,
}

impl Default for IndexSettings {
    fn default() -> Self {
        Self {
            path: None,
            memory_limit_mb: 512,
            workers: 0,
        }
    }
}

/// Connective joining adjacent operands that have no explicit connective.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DefaultOperator {
    /// Adjacent operands must all match.
    #[default]
    And,
    /// Any adjacent operand may match.
    Or,
}

impl DefaultOperator {
    /// Returns the equivalent query connective.
    pub fn bool_op(self) -> BoolOp {
        match self {
            Self::And => BoolOp::And,
            Self::Or => BoolOp::Or,
        }
    }
}

/// How matching documents are scored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoringModel {
    /// Term frequency times inverse document frequency.
    #[default]
    TfIdf,
    /// Raw term frequency.
    Frequency,
}

impl fmt::Display for ScoringModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TfIdf => f.write_str("tf_idf"),
            Self::Frequency => f.write_str("frequency"),
        }
    }
}

impl FromStr for ScoringModel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "tf_idf" => Ok(Self::TfIdf),
            "frequency" => Ok(Self::Frequency),
            _ => Err(format!(
                "unknown scoring model '{s}' (expected tf_idf or frequency)"
            )),
        }
    }
}

/// Query settings.
#[serde_as]
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchSettings {
    /// Maximum results per query.
    pub limit: usize,
    /// Longest accepted query, in characters.
    pub max_query_length: usize,
    /// Fields searched by terms without a suffix; empty requires a suffix on every term.
    #[serde_as(as = "Vec<DisplayFromStr>")]
    pub default_fields: Vec<FieldIndex>,
    /// Connective joining adjacent operands.
    pub default_operator: DefaultOperator,
    /// Scoring model.
    pub scoring: ScoringModel,
    /// Per-field score multipliers (missing fields use 1.0).
    #[serde_as(as = "BTreeMap<DisplayFromStr, _>")]
    pub boosts: BTreeMap<FieldIndex, f32>,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            limit: 50,
            max_query_length: 10_000,
            default_fields: FieldIndex::TEXT.to_vec(),
            default_operator: DefaultOperator::And,
            scoring: ScoringModel::TfIdf,
            boosts: BTreeMap::new(),
        }
    }
}

impl SearchSettings {
    /// Returns the boost for a field.
    pub fn boost(&self, field: FieldIndex) -> f32 {
        self.boosts.get(&field).copied().unwrap_or(1.0)
    }
}

/// Internal struct for TOML serialization of settings.
#[derive(Serialize)]
struct SerializableSettings {
    /// Index settings.
    index: SerializableIndexSettings,
    /// Query settings.
    search: SearchSettings,
}

/// Index settings with the path rendered as a string.
#[derive(Serialize)]
struct SerializableIndexSettings {
    /// Resolved index directory, if configured.
    #[serde(skip_serializing_if = "Option::is_none")]
    path: Option<String>,
    /// Indexing memory budget in megabytes.
    memory_limit_mb: usize,
    /// Indexing threads.
    workers: usize,
}
