//! Configuration file discovery.
//!
//! Every ancestor of the working directory may hold a `.brs.toml`; the closest one has the
//! highest precedence and the global `~/.brs.toml` the lowest. A file with `root = true`
//! ends the search, shutting out both its ancestors and the global file.

use std::path::{Path, PathBuf};

use directories::BaseDirs;

use crate::parse::is_root_config;

/// The configuration filename.
pub const CONFIG_FILENAME: &str = ".brs.toml";

/// Discovers all configuration files relevant to the given directory.
///
/// Returns paths in precedence order: closest to `cwd` first, global last.
pub fn discover_config_files(cwd: &Path) -> Vec<PathBuf> {
    let mut configs = Vec::new();

    for dir in cwd.ancestors() {
        let candidate = dir.join(CONFIG_FILENAME);
        if !candidate.is_file() {
            continue;
        }
        let stop = is_root_config(&candidate);
        configs.push(candidate);
        if stop {
            return configs;
        }
    }

    if let Some(global) = global_config_path().filter(|p| p.is_file())
        && !configs.contains(&global)
    {
        configs.push(global);
    }
    configs
}

/// Returns the path of `~/.brs.toml`, or `None` without a home directory.
pub fn global_config_path() -> Option<PathBuf> {
    let dirs = BaseDirs::new()?;
    Some(dirs.home_dir().join(CONFIG_FILENAME))
}

/// Returns true if `path` is the global configuration file.
pub fn is_global_config(path: &Path) -> bool {
    global_config_path().is_some_and(|global| path == global)
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;
    use crate::test_support::ConfigTree;

    /// Discovered files, minus any real global config on the test machine.
    fn discovered(cwd: &Path) -> Vec<PathBuf> {
        discover_config_files(cwd)
            .into_iter()
            .filter(|p| !is_global_config(p))
            .collect()
    }

    #[test]
    fn empty_tree_finds_nothing() {
        let tree = ConfigTree::new();
        assert!(discovered(&tree.dir("a/b/c")).is_empty());
    }

    #[test]
    fn closer_files_come_first() {
        let tree = ConfigTree::new();
        let outer = tree.config("", "");
        let inner = tree.config("patents/us", "[search]\nlimit = 5\n");
        let cwd = tree.dir("patents/us/2024/q1");

        assert_eq!(discovered(&cwd), vec![inner, outer]);
    }

    #[test]
    fn config_in_cwd_is_found() {
        let tree = ConfigTree::new();
        let here = tree.config("work", "");
        assert_eq!(discovered(&tree.dir("work")), vec![here]);
    }

    #[test]
    fn directory_with_config_name_is_ignored() {
        let tree = ConfigTree::new();
        fs::create_dir_all(tree.path().join(CONFIG_FILENAME)).unwrap();
        assert!(discovered(&tree.dir("sub")).is_empty());
    }

    #[test]
    fn root_marker_ends_the_walk() {
        let tree = ConfigTree::new();
        tree.config("", "");
        let project = tree.config("project", "root = true\n");
        let nested = tree.config("project/corpus", "");
        let cwd = tree.dir("project/corpus/raw");

        // Nothing is filtered: the global file must not appear either.
        assert_eq!(discover_config_files(&cwd), vec![nested, project]);
    }

    #[test]
    fn root_false_keeps_walking() {
        let tree = ConfigTree::new();
        let outer = tree.config("", "");
        let project = tree.config("project", "root = false\n");

        assert_eq!(discovered(&tree.dir("project/src")), vec![project, outer]);
    }

    #[test]
    fn global_path_is_in_home() {
        let path = global_config_path().unwrap();
        assert_eq!(path.file_name().unwrap(), CONFIG_FILENAME);
        assert!(is_global_config(&path));
        assert!(!is_global_config(Path::new("/srv/patents/.brs.toml")));
    }
}
