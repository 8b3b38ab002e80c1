use crate::config::ScanConfig;
use crate::errors::SkippedFile;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::{DirEntry, WalkDir};

/// Files found under a root, plus the entries that could not be read.
#[derive(Debug, Default, Clone)]
pub struct WalkResult {
    pub files: Vec<PathBuf>,
    pub skipped: Vec<SkippedFile>,
    /// True when the file ceiling stopped the walk early
    pub truncated: bool,
}

/// Recursive, extension-filtered directory walk.
///
/// Entries are visited in file-name order so the same tree always yields the
/// same list. Unreadable directories are recorded in `skipped` and the walk
/// carries on with their siblings. Symlinks are not followed.
pub struct FileWalker {
    root: PathBuf,
    extensions: Vec<String>,
    exclude_dirs: Vec<String>,
    max_files: usize,
}

impl FileWalker {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let defaults = ScanConfig::default();
        Self {
            root: root.into(),
            extensions: vec![],
            exclude_dirs: defaults.exclude_dirs,
            max_files: defaults.max_files,
        }
    }

    pub fn with_extensions<S: AsRef<str>>(mut self, extensions: &[S]) -> Self {
        self.extensions = extensions
            .iter()
            .map(|ext| ext.as_ref().to_ascii_lowercase())
            .collect();
        self
    }

    pub fn with_config(mut self, config: &ScanConfig) -> Self {
        self.exclude_dirs = config.exclude_dirs.clone();
        self.max_files = config.max_files;
        self
    }

    pub fn walk(&self) -> WalkResult {
        let root = std::path::absolute(&self.root).unwrap_or_else(|_| self.root.clone());
        let mut result = WalkResult::default();

        let walker = WalkDir::new(&root)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| !self.is_excluded_dir(entry));

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    let path = err.path().unwrap_or(&root).to_path_buf();
                    warn!("Failed to read {}: {}", path.display(), err);
                    result
                        .skipped
                        .push(SkippedFile::new(&root, &path, err.to_string()));
                    continue;
                }
            };

            if !entry.file_type().is_file() || !self.matches_extension(entry.path()) {
                continue;
            }

            if result.files.len() >= self.max_files {
                warn!(
                    "File ceiling of {} reached under {}; remaining files ignored",
                    self.max_files,
                    root.display()
                );
                result.truncated = true;
                break;
            }
            result.files.push(entry.into_path());
        }

        debug!(
            "Found {} files under {} ({} skipped)",
            result.files.len(),
            root.display(),
            result.skipped.len()
        );
        result
    }

    fn is_excluded_dir(&self, entry: &DirEntry) -> bool {
        entry.depth() > 0
            && entry.file_type().is_dir()
            && self
                .exclude_dirs
                .iter()
                .any(|name| entry.file_name() == name.as_str())
    }

    fn matches_extension(&self, path: &Path) -> bool {
        let name = match path.file_name() {
            Some(name) => name.to_string_lossy().to_ascii_lowercase(),
            None => return false,
        };
        self.extensions.iter().any(|ext| name.ends_with(ext.as_str()))
    }
}

/// Walk `root` with default settings, keeping files ending in one of `extensions`.
pub fn find_source_files<S: AsRef<str>>(root: &Path, extensions: &[S]) -> WalkResult {
    FileWalker::new(root).with_extensions(extensions).walk()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn touch(root: &Path, rel: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "").unwrap();
    }

    #[test]
    fn test_walk_filters_by_extension_case_insensitively() {
        let temp = TempDir::new().unwrap();
        touch(temp.path(), "src/app.js");
        touch(temp.path(), "src/routes/Users.TS");
        touch(temp.path(), "README.md");

        let result = find_source_files(temp.path(), &[".js", ".ts"]);
        let names: Vec<_> = result
            .files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, vec!["app.js", "Users.TS"]);
        assert!(result.skipped.is_empty());
    }

    #[test]
    fn test_walk_is_deterministic() {
        let temp = TempDir::new().unwrap();
        for name in ["b.py", "a.py", "z/c.py", "m/n/d.py"] {
            touch(temp.path(), name);
        }
        let first = find_source_files(temp.path(), &[".py"]).files;
        let second = find_source_files(temp.path(), &[".py"]).files;
        assert_eq!(first, second);
        assert_eq!(first.len(), 4);
    }

    #[test]
    fn test_walk_skips_excluded_directories() {
        let temp = TempDir::new().unwrap();
        touch(temp.path(), ".git/hooks/pre-commit.js");
        touch(temp.path(), "index.js");

        let result = find_source_files(temp.path(), &[".js"]);
        assert_eq!(result.files.len(), 1);
        assert!(result.files[0].ends_with("index.js"));
    }

    #[test]
    fn test_walk_stops_at_file_ceiling() {
        let temp = TempDir::new().unwrap();
        for i in 0..5 {
            touch(temp.path(), &format!("f{i}.rb"));
        }
        let config = ScanConfig {
            max_files: 3,
            ..ScanConfig::default()
        };
        let result = FileWalker::new(temp.path())
            .with_extensions(&[".rb"])
            .with_config(&config)
            .walk();
        assert_eq!(result.files.len(), 3);
        assert!(result.truncated);
    }

    #[test]
    fn test_walk_missing_root_is_not_fatal() {
        let temp = TempDir::new().unwrap();
        let result = find_source_files(&temp.path().join("absent"), &[".js"]);
        assert!(result.files.is_empty());
        assert_eq!(result.skipped.len(), 1);
    }

    #[cfg(unix)]
    #[test]
    fn test_walk_skips_unreadable_directory_and_keeps_siblings() {
        use std::os::unix::fs::PermissionsExt;

        let temp = TempDir::new().unwrap();
        touch(temp.path(), "a/first.js");
        touch(temp.path(), "locked/hidden.js");
        touch(temp.path(), "z/last.js");
        let locked = temp.path().join("locked");
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

        // Permission bits do not bind root.
        if fs::read_dir(&locked).is_ok() {
            fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
            return;
        }

        let result = find_source_files(temp.path(), &[".js"]);
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();

        let names: Vec<_> = result
            .files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, vec!["first.js", "last.js"]);
        assert_eq!(result.skipped.len(), 1);
        assert_eq!(result.skipped[0].file, PathBuf::from("locked"));
        assert!(!result.truncated);
    }

    #[test]
    fn test_walk_returns_absolute_paths_under_root() {
        let temp = TempDir::new().unwrap();
        touch(temp.path(), "pkg/mod.java");
        let result = find_source_files(temp.path(), &[".java"]);
        assert_eq!(result.files.len(), 1);
        assert!(result.files[0].is_absolute());
        assert!(result.files[0].starts_with(temp.path()));
    }
}
