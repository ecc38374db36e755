//! Shared context for running CLI commands.

use std::{
    env,
    path::{Path, PathBuf},
    process::ExitCode,
};

use brs_config::Config;
use brs_index::Searcher;
use brs_query::ParseOptions;

/// Command execution context built once per CLI invocation.
pub struct CommandContext {
    /// Current working directory.
    pub cwd: PathBuf,
    /// Loaded configuration (may be default if no config files found).
    pub config: Config,
}

impl CommandContext {
    /// Loads the current directory and configuration.
    pub fn load() -> Result<Self, ExitCode> {
        let cwd = current_dir_or_failure()?;
        let config = load_config_or_failure(&cwd)?;
        Ok(Self { cwd, config })
    }

    /// Loads only the current directory, skipping configuration parsing.
    ///
    /// Used by `init`, which should work even when an existing config file is invalid.
    pub fn load_cwd_only() -> Result<Self, ExitCode> {
        let cwd = current_dir_or_failure()?;
        Ok(Self {
            cwd,
            config: Config::default(),
        })
    }

    /// Returns the index directory, preferring an explicit override.
    ///
    /// A relative override is taken relative to the working directory.
    pub fn index_dir(&self, dir_override: Option<&Path>) -> PathBuf {
        match dir_override {
            Some(dir) => self.cwd.join(dir),
            None => self.config.index_dir(&self.cwd),
        }
    }

    /// Options for parsing queries with the configured defaults.
    pub fn parse_options(&self) -> ParseOptions {
        ParseOptions {
            default_fields: self.config.search.default_fields.clone(),
            default_operator: self.config.search.default_operator.bool_op(),
        }
    }

    /// Opens a searcher over the index, exiting with a consistent error on failure.
    pub fn searcher(&self, dir_override: Option<&Path>) -> Result<Searcher, ExitCode> {
        let dir = self.index_dir(dir_override);
        Searcher::open_with_config(&dir, &self.config).map_err(|e| {
            eprintln!("error: failed to open index: {e}");
            eprintln!("Run 'brs index <FILE>' to build an index first.");
            ExitCode::FAILURE
        })
    }
}

/// Returns the current working directory or exits with a consistent error.
fn current_dir_or_failure() -> Result<PathBuf, ExitCode> {
    env::current_dir().map_err(|e| {
        eprintln!("error: could not determine current directory: {e}");
        ExitCode::FAILURE
    })
}

/// Loads configuration from the provided directory or exits with an error.
fn load_config_or_failure(cwd: &Path) -> Result<Config, ExitCode> {
    Config::load(cwd).map_err(|e| {
        eprintln!("error: failed to load configuration: {e}");
        ExitCode::FAILURE
    })
}

#[cfg(test)]
mod tests {
    use brs_query::{BoolOp, FieldIndex};

    use super::*;

    fn context(config: Config) -> CommandContext {
        CommandContext {
            cwd: PathBuf::from("/work"),
            config,
        }
    }

    #[test]
    fn index_dir_override_is_relative_to_cwd() {
        let ctx = context(Config::default());
        assert_eq!(
            ctx.index_dir(Some(Path::new("idx"))),
            PathBuf::from("/work/idx")
        );
        assert_eq!(
            ctx.index_dir(Some(Path::new("/abs/idx"))),
            PathBuf::from("/abs/idx")
        );
    }

    #[test]
    fn index_dir_defaults_to_config() {
        let ctx = context(Config::default());
        assert_eq!(ctx.index_dir(None), PathBuf::from("/work/.brs/index"));
    }

    #[test]
    fn parse_options_follow_search_settings() {
        let mut config = Config::default();
        config.search.default_fields = vec![FieldIndex::Title];
        let options = context(config).parse_options();
        assert_eq!(options.default_fields, vec![FieldIndex::Title]);
        assert_eq!(options.default_operator, BoolOp::And);
    }
}
