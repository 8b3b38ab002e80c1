use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use super::RoutemapConfig;

pub const CONFIG_FILE_NAME: &str = ".routemap.toml";

/// Parse a configuration from TOML text; missing sections take their defaults.
pub fn parse_config(contents: &str) -> Result<RoutemapConfig, String> {
    let config = toml::from_str::<RoutemapConfig>(contents)
        .map_err(|e| format!("Failed to parse {}: {}", CONFIG_FILE_NAME, e))?;

    if config.scan.max_files == 0 {
        return Err("scan.max_files must be greater than zero".to_string());
    }
    if config.workspace.clone_depth < 1 {
        return Err("workspace.clone_depth must be at least 1".to_string());
    }

    Ok(config)
}

pub(crate) fn try_load_config_from_path(config_path: &Path) -> Option<RoutemapConfig> {
    let contents = match fs::read_to_string(config_path) {
        Ok(contents) => contents,
        Err(e) => {
            // Only log actual errors, not "file not found"
            if e.kind() != std::io::ErrorKind::NotFound {
                warn!(
                    "Failed to read config file {}: {}",
                    config_path.display(),
                    e
                );
            }
            return None;
        }
    };

    match parse_config(&contents) {
        Ok(config) => {
            debug!("Loaded config from {}", config_path.display());
            Some(config)
        }
        Err(e) => {
            warn!("{}. Using defaults.", e);
            None
        }
    }
}

/// Directory ancestors of `start`, nearest first, up to `max_depth` entries
pub fn directory_ancestors(start: PathBuf, max_depth: usize) -> impl Iterator<Item = PathBuf> {
    std::iter::successors(Some(start), |dir| {
        let mut parent = dir.clone();
        if parent.pop() {
            Some(parent)
        } else {
            None
        }
    })
    .take(max_depth)
}

/// Search for a config file from `start` upward.
pub fn load_config_from(start: &Path) -> RoutemapConfig {
    const MAX_TRAVERSAL_DEPTH: usize = 10;

    directory_ancestors(start.to_path_buf(), MAX_TRAVERSAL_DEPTH)
        .map(|dir| dir.join(CONFIG_FILE_NAME))
        .find_map(|path| try_load_config_from_path(&path))
        .unwrap_or_else(|| {
            debug!(
                "No config found after checking {} directories. Using default config.",
                MAX_TRAVERSAL_DEPTH
            );
            RoutemapConfig::default()
        })
}

pub fn load_config() -> RoutemapConfig {
    match std::env::current_dir() {
        Ok(dir) => load_config_from(&dir),
        Err(e) => {
            warn!(
                "Failed to get current directory: {}. Using default config.",
                e
            );
            RoutemapConfig::default()
        }
    }
}
