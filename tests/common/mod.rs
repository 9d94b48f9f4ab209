#![allow(dead_code)]

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf, MAIN_SEPARATOR};

use wildpath::{Entry, WildpathError};

/// Create the standard fixture tree.
///
/// Structure:
/// ```text
/// tmp/
///   dir1/
///     subdir/
///       test.txt
///     subdir2/
///   dir2/
///   dir3/
///     subdir/
///       test.txt
///       test2.txt
/// ```
pub fn setup_tree() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path();

    fs::create_dir_all(root.join("dir1").join("subdir")).unwrap();
    fs::create_dir_all(root.join("dir1").join("subdir2")).unwrap();
    fs::create_dir_all(root.join("dir2")).unwrap();
    fs::create_dir_all(root.join("dir3").join("subdir")).unwrap();

    fs::write(root.join("dir1").join("subdir").join("test.txt"), "test").unwrap();
    fs::write(root.join("dir3").join("subdir").join("test.txt"), "test").unwrap();
    fs::write(root.join("dir3").join("subdir").join("test2.txt"), "test").unwrap();

    dir
}

/// A wide tree for cancellation tests: `big/dNN/fNN.dat`.
pub fn setup_wide_tree(dirs: usize, files: usize) -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    for d in 0..dirs {
        let sub = dir.path().join("big").join(format!("d{d:02}"));
        fs::create_dir_all(&sub).unwrap();
        for f in 0..files {
            fs::write(sub.join(format!("f{f:02}.dat")), "x").unwrap();
        }
    }
    dir
}

/// Rewrite `/` to the host separator so patterns read the same everywhere.
pub fn sep(pattern: &str) -> String {
    pattern.replace('/', &MAIN_SEPARATOR.to_string())
}

/// `root` joined with a `/`-separated relative path.
pub fn under(root: &Path, rel: &str) -> PathBuf {
    rel.split('/').fold(root.to_path_buf(), |p, part| p.join(part))
}

/// Collect entry paths, panicking on any error.
pub fn paths<I>(items: I) -> Vec<PathBuf>
where
    I: IntoIterator<Item = Result<Entry, WildpathError>>,
{
    items.into_iter().map(|r| r.unwrap().path).collect()
}

pub fn set(paths: Vec<PathBuf>) -> BTreeSet<PathBuf> {
    paths.into_iter().collect()
}
