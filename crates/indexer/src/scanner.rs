use crate::config::IndexerConfig;
use crate::error::{IndexerError, Result};
use regex::Regex;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Scanner for finding source files under a root
pub struct FileScanner {
    root: PathBuf,
    include: Regex,
    exclude: Regex,
}

impl FileScanner {
    pub fn new(root: impl AsRef<Path>, config: &IndexerConfig) -> Result<Self> {
        Ok(Self {
            root: root.as_ref().to_path_buf(),
            include: config.include_regex()?,
            exclude: config.exclude_regex()?,
        })
    }

    /// Walk the tree depth-first, entries sorted by file name.
    ///
    /// Excluded directories are pruned before they are entered. Any unreadable
    /// entry fails the whole walk.
    pub fn scan(&self) -> Result<Vec<PathBuf>> {
        let root = std::fs::canonicalize(&self.root).map_err(|source| IndexerError::Walk {
            path: self.root.clone(),
            source,
        })?;

        let walker = WalkDir::new(&root)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| entry.depth() == 0 || !self.is_excluded(entry.path()));

        let mut files = Vec::new();
        for entry in walker {
            let entry = entry.map_err(|err| walk_error(&root, err))?;
            if entry.file_type().is_dir() {
                continue;
            }
            if !self.is_included(entry.path()) {
                continue;
            }
            files.push(entry.into_path());
        }

        log::info!("Found {} source files under {}", files.len(), root.display());
        Ok(files)
    }

    fn is_excluded(&self, path: &Path) -> bool {
        let excluded = self.exclude.is_match(&path.to_string_lossy());
        if excluded {
            log::debug!("Skipping excluded path {}", path.display());
        }
        excluded
    }

    fn is_included(&self, path: &Path) -> bool {
        path.file_name()
            .map(|name| self.include.is_match(&name.to_string_lossy()))
            .unwrap_or(false)
    }
}

fn walk_error(root: &Path, err: walkdir::Error) -> IndexerError {
    let path = err.path().map_or_else(|| root.to_path_buf(), Path::to_path_buf);
    IndexerError::Walk {
        path,
        source: std::io::Error::from(err),
    }
}

/// Collect files under `root` whose name matches `include`, pruning paths
/// that match `exclude`
pub fn walk(root: impl AsRef<Path>, config: &IndexerConfig) -> Result<Vec<PathBuf>> {
    FileScanner::new(root, config)?.scan()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::fs;
    use tempfile::tempdir;

    fn names(root: &Path, files: &[PathBuf]) -> Vec<String> {
        let root = fs::canonicalize(root).unwrap();
        files
            .iter()
            .map(|p| {
                p.strip_prefix(&root)
                    .unwrap()
                    .to_string_lossy()
                    .replace('\\', "/")
            })
            .collect()
    }

    #[test]
    fn includes_only_source_files() {
        let temp = tempdir().unwrap();
        fs::write(temp.path().join("index.ts"), "").unwrap();
        fs::write(temp.path().join("App.tsx"), "").unwrap();
        fs::write(temp.path().join("README.md"), "").unwrap();
        fs::write(temp.path().join("styles.css"), "").unwrap();

        let files = walk(temp.path(), &IndexerConfig::default()).unwrap();
        assert_eq!(names(temp.path(), &files), vec!["App.tsx", "index.ts"]);
        assert!(files.iter().all(|p| p.is_absolute()));
    }

    #[test]
    fn prunes_excluded_directories() {
        let temp = tempdir().unwrap();
        let modules = temp.path().join("node_modules").join("lib");
        fs::create_dir_all(&modules).unwrap();
        fs::write(modules.join("dep.js"), "function dep() {}").unwrap();
        let git = temp.path().join(".git");
        fs::create_dir_all(&git).unwrap();
        fs::write(git.join("hook.js"), "").unwrap();
        fs::write(temp.path().join("main.js"), "").unwrap();

        let files = walk(temp.path(), &IndexerConfig::default()).unwrap();
        assert_eq!(names(temp.path(), &files), vec!["main.js"]);
    }

    #[cfg(unix)]
    fn lock_dir(path: &Path) -> bool {
        use std::os::unix::fs::PermissionsExt;

        fs::create_dir_all(path).unwrap();
        fs::write(path.join("inside.ts"), "").unwrap();
        fs::set_permissions(path, fs::Permissions::from_mode(0o000)).unwrap();
        // Root ignores permission bits
        fs::read_dir(path).is_err()
    }

    #[cfg(unix)]
    fn unlock_dir(path: &Path) {
        use std::os::unix::fs::PermissionsExt;

        fs::set_permissions(path, fs::Permissions::from_mode(0o755)).unwrap();
    }

    #[cfg(unix)]
    #[test]
    fn unreadable_directory_fails_the_walk() {
        let temp = tempdir().unwrap();
        fs::write(temp.path().join("main.ts"), "").unwrap();
        let locked = temp.path().join("src").join("locked");
        if !lock_dir(&locked) {
            unlock_dir(&locked);
            return;
        }

        let result = walk(temp.path(), &IndexerConfig::default());
        unlock_dir(&locked);
        assert!(matches!(result, Err(IndexerError::Walk { .. })));
    }

    #[cfg(unix)]
    #[test]
    fn excluded_directory_is_never_entered() {
        let temp = tempdir().unwrap();
        fs::write(temp.path().join("main.ts"), "").unwrap();
        let locked = temp.path().join("node_modules").join("locked");
        if !lock_dir(&locked) {
            unlock_dir(&locked);
            return;
        }

        let result = walk(temp.path(), &IndexerConfig::default());
        unlock_dir(&locked);
        let files = result.unwrap();
        assert_eq!(names(temp.path(), &files), vec!["main.ts"]);
    }

    #[test]
    fn walks_depth_first_in_name_order() {
        let temp = tempdir().unwrap();
        fs::create_dir_all(temp.path().join("b/inner")).unwrap();
        fs::create_dir_all(temp.path().join("a")).unwrap();
        fs::write(temp.path().join("b/inner/deep.ts"), "").unwrap();
        fs::write(temp.path().join("b/z.ts"), "").unwrap();
        fs::write(temp.path().join("a/one.ts"), "").unwrap();
        fs::write(temp.path().join("c.ts"), "").unwrap();

        let files = walk(temp.path(), &IndexerConfig::default()).unwrap();
        assert_eq!(
            names(temp.path(), &files),
            vec!["a/one.ts", "b/inner/deep.ts", "b/z.ts", "c.ts"]
        );
        assert_eq!(files, walk(temp.path(), &IndexerConfig::default()).unwrap());
    }

    #[test]
    fn missing_root_fails() {
        let temp = tempdir().unwrap();
        let err = walk(temp.path().join("absent"), &IndexerConfig::default()).unwrap_err();
        assert!(matches!(err, IndexerError::Walk { .. }));
    }

    #[test]
    fn custom_patterns() {
        let temp = tempdir().unwrap();
        fs::create_dir_all(temp.path().join("dist")).unwrap();
        fs::write(temp.path().join("dist/bundle.mjs"), "").unwrap();
        fs::write(temp.path().join("entry.mjs"), "").unwrap();
        fs::write(temp.path().join("entry.ts"), "").unwrap();

        let config = IndexerConfig {
            include_pattern: r"\.mjs$".to_string(),
            exclude_pattern: "dist".to_string(),
            ..Default::default()
        };
        let files = walk(temp.path(), &config).unwrap();
        assert_eq!(names(temp.path(), &files), vec!["entry.mjs"]);
    }
}
