//! Configuration merging.
//!
//! Merges multiple `RawConfig` files into a single resolved `Config`, applying
//! precedence rules and resolving the index path.

use std::path::{Path, PathBuf};

use crate::{
    Config, ConfigError, IndexSettings, SearchSettings,
    parse::{RawConfig, RawIndexSettings, RawSearchSettings},
    resolve::resolve_index_path,
};

/// A parsed config file with its source path.
pub struct ParsedConfig {
    /// Path to the config file.
    pub path: PathBuf,
    /// Parsed raw configuration.
    pub config: RawConfig,
}

impl ParsedConfig {
    /// Directory containing the config file.
    fn dir(&self) -> &Path {
        self.path.parent().unwrap_or_else(|| Path::new("."))
    }
}

/// Merges multiple configuration files into a single resolved `Config`.
///
/// Configs should be provided in precedence order: highest precedence first (closest to CWD),
/// lowest precedence last (global config).
///
/// Merge rules:
/// - Scalar settings: first defined value wins
/// - Boosts: merged per field, first definition for each field wins
/// - The index path is resolved relative to the file that defines it
pub fn merge_configs(configs: &[ParsedConfig]) -> Result<Config, ConfigError> {
    if configs.is_empty() {
        return Ok(Config::default());
    }

    let index = merge_index_settings(configs)?;
    let search = merge_search_settings(configs);
    let config_root = configs.first().map(|c| c.dir().to_path_buf());

    Ok(Config {
        index,
        search,
        config_root,
    })
}

/// Merges index settings, taking the first defined value for each field.
fn merge_index_settings(configs: &[ParsedConfig]) -> Result<IndexSettings, ConfigError> {
    let mut result = IndexSettings::default();

    // Lowest precedence first so higher precedence overwrites.
    for parsed in configs.iter().rev() {
        if let Some(ref index) = parsed.config.index {
            apply_raw_index(&mut result, index, parsed.dir())?;
        }
    }

    Ok(result)
}

/// Applies raw index settings to result, overwriting any present values.
fn apply_raw_index(
    result: &mut IndexSettings,
    raw: &RawIndexSettings,
    config_dir: &Path,
) -> Result<(), ConfigError> {
    if let Some(ref path) = raw.path {
        result.path = Some(resolve_index_path(path, config_dir)?);
    }
    if let Some(v) = raw.memory_limit_mb {
        result.memory_limit_mb = v;
    }
    if let Some(v) = raw.workers {
        result.workers = v;
    }
    Ok(())
}

/// Merges search settings.
fn merge_search_settings(configs: &[ParsedConfig]) -> SearchSettings {
    let mut result = SearchSettings::default();

    for parsed in configs.iter().rev() {
        if let Some(ref search) = parsed.config.search {
            apply_raw_search(&mut result, search);
        }
    }

    result
}

/// Applies raw search settings to result.
fn apply_raw_search(result: &mut SearchSettings, raw: &RawSearchSettings) {
    if let Some(v) = raw.limit {
        result.limit = v;
    }
    if let Some(v) = raw.max_query_length {
        result.max_query_length = v;
    }
    if let Some(ref v) = raw.default_fields {
        result.default_fields = v.clone();
    }
    if let Some(v) = raw.default_operator {
        result.default_operator = v;
    }
    if let Some(v) = raw.scoring {
        result.scoring = v;
    }
    if let Some(ref boosts) = raw.boosts {
        for (field, boost) in boosts {
            result.boosts.insert(*field, *boost);
        }
    }
}
