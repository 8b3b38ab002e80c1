//! Per-request workspaces.
//!
//! A [`Workspace`] is a uniquely named directory that exists for exactly one
//! scan. It is removed when the value is dropped, so every exit path of the
//! owner (early `?` return, panic unwinding, a consumer hanging up on a
//! stream) ends with the directory gone. Removal failures are logged and
//! never replace the outcome of the request.

use crate::config::WorkspaceConfig;
use crate::errors::{Result, ScanError};
use git2::build::RepoBuilder;
use git2::{Direction, FetchOptions, Remote};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, info_span};
use uuid::Uuid;

/// Transports the clone backend accepts.
pub const SUPPORTED_SCHEMES: &[&str] = &["https://", "http://", "ssh://", "git://", LOCAL_SCHEME];

const LOCAL_SCHEME: &str = "file://";

const WORKSPACE_PREFIX: &str = "repo-";

#[derive(Debug)]
pub struct Workspace {
    path: PathBuf,
    released: bool,
}

impl Workspace {
    /// Validate `repo_url`, create a fresh workspace and shallow-clone into it.
    pub fn acquire(repo_url: &str, config: &WorkspaceConfig) -> Result<Self> {
        let repo_url = validate_repo_url(repo_url)?;
        let workspace = Self::create_in(&config.base_dir())?;

        let _span = info_span!("clone", url = repo_url).entered();
        clone_into(repo_url, workspace.path(), config)?;
        info!("Cloned repository into workspace");

        Ok(workspace)
    }

    /// Create an empty workspace directory under `base_dir`.
    pub fn create_in(base_dir: &Path) -> Result<Self> {
        let path = base_dir.join(format!("{}{}", WORKSPACE_PREFIX, Uuid::new_v4()));

        if path.exists() {
            debug!("Removing stale workspace {}", path.display());
            fs::remove_dir_all(&path).map_err(|e| {
                ScanError::clone_failed(format!("could not clear stale workspace: {e}"))
            })?;
        }
        fs::create_dir_all(&path)
            .map_err(|e| ScanError::clone_failed(format!("could not create workspace: {e}")))?;

        debug!("Created workspace {}", path.display());
        Ok(Self {
            path,
            released: false,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Remove the workspace now instead of waiting for drop.
    pub fn release(mut self) {
        self.remove();
    }

    fn remove(&mut self) {
        if self.released {
            return;
        }
        self.released = true;

        match fs::remove_dir_all(&self.path) {
            Ok(()) => debug!("Removed workspace {}", self.path.display()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => {
                let err = ScanError::CleanupFailed {
                    message: e.to_string(),
                };
                error!("{} ({})", err, self.path.display());
            }
        }
    }
}

impl Drop for Workspace {
    fn drop(&mut self) {
        self.remove();
    }
}

/// Reject empty references and transports the clone backend cannot fetch.
pub fn validate_repo_url(repo_url: &str) -> Result<&str> {
    let trimmed = repo_url.trim();
    if trimmed.is_empty() {
        return Err(ScanError::invalid_input("Repository URL is required"));
    }

    let lowered = trimmed.to_ascii_lowercase();
    let scheme = SUPPORTED_SCHEMES
        .iter()
        .find(|scheme| lowered.starts_with(**scheme))
        .ok_or_else(|| {
            ScanError::invalid_input(format!(
                "unsupported transport (expected one of {})",
                SUPPORTED_SCHEMES.join(", ")
            ))
        })?;

    if trimmed.len() == scheme.len() {
        return Err(ScanError::invalid_input("repository location is missing"));
    }
    Ok(trimmed)
}

fn clone_into(repo_url: &str, dest: &Path, config: &WorkspaceConfig) -> Result<()> {
    let branch = match &config.branch {
        Some(branch) => branch.clone(),
        None => remote_default_branch(repo_url)?,
    };
    debug!("Cloning branch {}", branch);

    let mut fetch = FetchOptions::new();
    fetch.depth(fetch_depth(repo_url, config));

    let mut builder = RepoBuilder::new();
    builder.fetch_options(fetch);
    builder.branch(&branch);
    // Only fetch the one head.
    builder.remote_create(move |repo, name, url| {
        let refspec = format!("+refs/heads/{branch}:refs/remotes/{name}/{branch}");
        repo.remote_with_fetch(name, url, &refspec)
    });

    builder.clone(repo_url, dest)?;
    Ok(())
}

/// Ask the remote which branch its `HEAD` points at.
fn remote_default_branch(repo_url: &str) -> Result<String> {
    let mut remote = Remote::create_detached(repo_url)?;
    remote.connect(Direction::Fetch)?;
    let head = remote.default_branch()?;
    remote.disconnect()?;

    let head = head
        .as_str()
        .ok_or_else(|| ScanError::clone_failed("remote default branch is not valid UTF-8"))?;
    Ok(head.strip_prefix("refs/heads/").unwrap_or(head).to_string())
}

/// libgit2's local transport cannot serve shallow fetches, so `file://`
/// clones take the full history of the single branch.
fn fetch_depth(repo_url: &str, config: &WorkspaceConfig) -> i32 {
    if repo_url.to_ascii_lowercase().starts_with(LOCAL_SCHEME) {
        0
    } else {
        config.clone_depth.max(1)
    }
}
