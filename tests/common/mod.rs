// Shared fixtures for routemap integration tests
#![allow(dead_code)]

use git2::{IndexAddOption, Oid, Repository, RepositoryInitOptions, Signature};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// Write `contents` to `root/rel`, creating parent directories.
pub fn write_file(root: &Path, rel: &str, contents: &str) {
    let path = root.join(rel);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, contents).unwrap();
}

/// A temporary repository populated from `(relative path, contents)` pairs.
pub fn repo_with(files: &[(&str, &str)]) -> TempDir {
    let temp = TempDir::new().unwrap();
    for (rel, contents) in files {
        write_file(temp.path(), rel, contents);
    }
    temp
}

/// Number of entries directly under `dir`.
pub fn entry_count(dir: &Path) -> usize {
    fs::read_dir(dir).map(|entries| entries.count()).unwrap_or(0)
}

/// A git repository with `files` committed on `main`, and an `other` branch
/// one commit ahead that adds `other-only.js`. Returns the checkout and its
/// `file://` URL.
pub fn git_fixture(files: &[(&str, &str)]) -> (TempDir, String) {
    let temp = repo_with(files);
    let mut opts = RepositoryInitOptions::new();
    opts.initial_head("main");
    let repo = Repository::init_opts(temp.path(), &opts).unwrap();

    let main = commit_all(&repo, "HEAD", "initial");
    repo.reference("refs/heads/other", main, false, "branch other")
        .unwrap();
    write_file(temp.path(), "other-only.js", "app.get('/other', h);\n");
    commit_all(&repo, "refs/heads/other", "other work");

    let url = format!("file://{}", temp.path().display());
    (temp, url)
}

fn commit_all(repo: &Repository, update_ref: &str, message: &str) -> Oid {
    let mut index = repo.index().unwrap();
    index
        .add_all(["*"].iter(), IndexAddOption::DEFAULT, None)
        .unwrap();
    index.write().unwrap();
    let tree = repo.find_tree(index.write_tree().unwrap()).unwrap();
    let signature = Signature::now("routemap", "routemap@example.com").unwrap();
    let parent = repo
        .refname_to_id(update_ref)
        .ok()
        .map(|id| repo.find_commit(id).unwrap());
    let parents: Vec<_> = parent.iter().collect();
    repo.commit(
        Some(update_ref),
        &signature,
        &signature,
        message,
        &tree,
        &parents,
    )
    .unwrap()
}

/// Names of the remote-tracking branches in a clone, without `origin/HEAD`.
pub fn remote_branches(checkout: &Path) -> Vec<String> {
    let repo = Repository::open(checkout).unwrap();
    let mut names: Vec<String> = repo
        .references_glob("refs/remotes/origin/*")
        .unwrap()
        .map(|reference| reference.unwrap().name().unwrap().to_string())
        .filter(|name| name != "refs/remotes/origin/HEAD")
        .collect();
    names.sort();
    names
}
