use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::Config;

/// Finds every existing source file under the root, in file name order.
///
/// Subdirectories are only searched if the configuration is recursive.
/// Unreadable entries are skipped.
#[must_use]
pub fn collect_sources(root: &Path, config: &Config) -> Vec<PathBuf> {
    let walker = WalkDir::new(root).sort_by_file_name();
    let walker = if config.recursive {
        walker
    } else {
        walker.max_depth(1)
    };

    walker
        .into_iter()
        .filter_map(|entry| {
            entry
                .map_err(|e| tracing::debug!("Skipping unreadable entry: {e}"))
                .ok()
        })
        .filter(|entry| entry.file_type().is_file())
        .filter(|entry| config.is_source(entry.path()))
        .map(walkdir::DirEntry::into_path)
        .collect()
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;

    fn seed() -> TempDir {
        let tmp = TempDir::new().unwrap();
        let root = tmp.path();
        fs::create_dir_all(root.join("sub/deeper")).unwrap();
        fs::create_dir_all(root.join("folder.txt")).unwrap();
        fs::write(root.join("b.txt"), "b").unwrap();
        fs::write(root.join("a.txt"), "a").unwrap();
        fs::write(root.join("a.html"), "a").unwrap();
        fs::write(root.join("sub/c.txt"), "c").unwrap();
        fs::write(root.join("sub/deeper/d.txt"), "d").unwrap();
        tmp
    }

    fn relative(root: &Path, paths: Vec<PathBuf>) -> Vec<String> {
        paths
            .into_iter()
            .map(|p| {
                p.strip_prefix(root)
                    .unwrap()
                    .to_string_lossy()
                    .replace('\\', "/")
            })
            .collect()
    }

    #[test]
    fn recursive_walk_finds_nested_sources() {
        let tmp = seed();
        let found = collect_sources(tmp.path(), &Config::default());
        assert_eq!(
            relative(tmp.path(), found),
            ["a.txt", "b.txt", "sub/c.txt", "sub/deeper/d.txt"]
        );
    }

    #[test]
    fn non_recursive_walk_stays_at_root() {
        let tmp = seed();
        let mut config = Config::default();
        config.recursive = false;
        let found = collect_sources(tmp.path(), &config);
        assert_eq!(relative(tmp.path(), found), ["a.txt", "b.txt"]);
    }
}
