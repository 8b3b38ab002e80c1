//! Property-based tests for the tree walker
//!
//! - every returned path lies under the root
//! - every matching file that exists is returned, and nothing else
//! - two walks of the same tree agree

use proptest::prelude::*;
use routemap::io::FileWalker;
use std::collections::BTreeSet;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

const EXTENSIONS: &[&str] = &[".js", ".py", ".java", ".rb", ".txt", ".JS"];

/// Relative file paths up to three directories deep.
fn relative_paths() -> impl Strategy<Value = BTreeSet<PathBuf>> {
    let segment = "[a-z]{1,6}";
    let file = (
        prop::collection::vec(segment, 0..3),
        segment,
        prop::sample::select(EXTENSIONS),
    )
        .prop_map(|(dirs, stem, ext)| {
            let mut path: PathBuf = dirs.iter().collect();
            path.push(format!("{stem}{ext}"));
            path
        });
    prop::collection::btree_set(file, 0..25)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn prop_walk_returns_exactly_matching_files_under_root(paths in relative_paths()) {
        let temp = TempDir::new().unwrap();
        let root = temp.path().to_path_buf();
        for rel in &paths {
            let full = root.join(rel);
            fs::create_dir_all(full.parent().unwrap()).unwrap();
            fs::write(&full, "x").unwrap();
        }

        let walk = FileWalker::new(&root).with_extensions(&[".js", ".py"]).walk();

        let expected: BTreeSet<PathBuf> = paths
            .iter()
            .filter(|rel| {
                let name = rel.to_string_lossy().to_ascii_lowercase();
                name.ends_with(".js") || name.ends_with(".py")
            })
            .cloned()
            .collect();
        let found: BTreeSet<PathBuf> = walk
            .files
            .iter()
            .map(|file| {
                prop_assert!(file.is_absolute());
                let rel = file.strip_prefix(&root);
                prop_assert!(rel.is_ok(), "{} escaped the root", file.display());
                Ok(rel.unwrap().to_path_buf())
            })
            .collect::<Result<_, TestCaseError>>()?;

        prop_assert_eq!(found, expected);
        prop_assert!(walk.skipped.is_empty());
        prop_assert!(!walk.truncated);

        let again = FileWalker::new(&root).with_extensions(&[".js", ".py"]).walk();
        prop_assert_eq!(again.files, walk.files);
    }
}
