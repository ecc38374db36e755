//! Path resolution for the index location.

use std::path::{Path, PathBuf};

use directories::BaseDirs;

use crate::ConfigError;

/// Resolves a configured index path to an absolute path.
///
/// Tilde paths expand to the home directory, relative paths are taken relative
/// to `config_dir`. The directory does not have to exist yet.
pub fn resolve_index_path(path: &str, config_dir: &Path) -> Result<PathBuf, ConfigError> {
    let expanded = expand_tilde(path)?;

    if expanded.is_absolute() {
        Ok(expanded)
    } else {
        Ok(config_dir.join(expanded))
    }
}

/// Expands a tilde prefix to the home directory.
fn expand_tilde(path: &str) -> Result<PathBuf, ConfigError> {
    if path == "~" {
        return home_dir();
    }

    if let Some(rest) = path.strip_prefix("~/") {
        return Ok(home_dir()?.join(rest));
    }

    Ok(PathBuf::from(path))
}

/// Returns the home directory.
fn home_dir() -> Result<PathBuf, ConfigError> {
    BaseDirs::new()
        .map(|dirs| dirs.home_dir().to_path_buf())
        .ok_or(ConfigError::NoHomeDirectory)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relative_path_joins_config_dir() {
        let resolved = resolve_index_path(".brs/index", Path::new("/work/project")).unwrap();
        assert_eq!(resolved, PathBuf::from("/work/project/.brs/index"));
    }

    #[test]
    fn absolute_path_is_kept() {
        let resolved = resolve_index_path("/data/index", Path::new("/work")).unwrap();
        assert_eq!(resolved, PathBuf::from("/data/index"));
    }

    #[test]
    fn tilde_expands_to_home() {
        let home = home_dir().unwrap();
        assert_eq!(resolve_index_path("~", Path::new("/work")).unwrap(), home);
        assert_eq!(
            resolve_index_path("~/idx", Path::new("/work")).unwrap(),
            home.join("idx")
        );
    }

    #[test]
    fn missing_directory_is_fine() {
        let resolved = resolve_index_path("does/not/exist", Path::new("/tmp")).unwrap();
        assert!(resolved.is_absolute());
    }
}
