mod loader;

pub use loader::{directory_ancestors, load_config, load_config_from, parse_config};

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Top-level configuration, read from `.routemap.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct RoutemapConfig {
    #[serde(default)]
    pub scan: ScanConfig,

    #[serde(default)]
    pub workspace: WorkspaceConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScanConfig {
    /// Ceiling on files collected per walk; the input repository is untrusted
    #[serde(default = "default_max_files")]
    pub max_files: usize,

    /// Directory names that are never descended into
    #[serde(default = "default_exclude_dirs")]
    pub exclude_dirs: Vec<String>,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            max_files: default_max_files(),
            exclude_dirs: default_exclude_dirs(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WorkspaceConfig {
    /// Parent directory for per-request workspaces (OS temp dir when unset)
    #[serde(default)]
    pub base_dir: Option<PathBuf>,

    /// History depth fetched by the clone
    #[serde(default = "default_clone_depth")]
    pub clone_depth: i32,

    /// Restrict the clone to this branch
    #[serde(default)]
    pub branch: Option<String>,
}

impl Default for WorkspaceConfig {
    fn default() -> Self {
        Self {
            base_dir: None,
            clone_depth: default_clone_depth(),
            branch: None,
        }
    }
}

impl WorkspaceConfig {
    pub fn base_dir(&self) -> PathBuf {
        self.base_dir.clone().unwrap_or_else(std::env::temp_dir)
    }
}

pub fn default_max_files() -> usize {
    10_000
}

pub fn default_exclude_dirs() -> Vec<String> {
    vec![".git".to_string()]
}

pub fn default_clone_depth() -> i32 {
    1 // shallow
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = RoutemapConfig::default();
        assert_eq!(config.scan.max_files, 10_000);
        assert_eq!(config.scan.exclude_dirs, vec![".git".to_string()]);
        assert_eq!(config.workspace.clone_depth, 1);
        assert!(config.workspace.branch.is_none());
        assert_eq!(config.workspace.base_dir(), std::env::temp_dir());
    }
}
