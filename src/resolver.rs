use std::fs;
use std::io;
use std::iter::FusedIterator;
use std::path::{Path, PathBuf};

use ignore::{DirEntry, Walk, WalkBuilder};
use tracing::trace;

use crate::entry::{Entry, EntryKind};
use crate::error::WildpathError;
use crate::finder::Finder;
use crate::pattern::{parse, Parsed, SegmentMatcher, Split};

// ---------------------------------------------------------------------------
// Targets shared by both resolvers
// ---------------------------------------------------------------------------

/// Something left to resolve.
pub(crate) enum Target {
    /// `rest` still holds wildcards and is resolved below the concrete `base`.
    Pattern { base: PathBuf, rest: String },

    /// A concrete path, checked for existence.
    Leaf(PathBuf),
}

impl Target {
    pub(crate) fn root(pattern: String) -> Self {
        Self::Pattern { base: PathBuf::new(), rest: pattern }
    }
}

/// `base` joined with a pattern fragment, without a trailing separator for
/// empty fragments.
pub(crate) fn join(base: &Path, fragment: &str) -> PathBuf {
    if base.as_os_str().is_empty() {
        PathBuf::from(fragment)
    } else if fragment.is_empty() {
        base.to_path_buf()
    } else {
        base.join(fragment)
    }
}

/// Directory a split lists. An empty `left` means the finder's current dir.
pub(crate) fn listing_dir(finder: &Finder, base: &Path, split: &Split<'_>) -> PathBuf {
    let dir = join(base, split.left);
    if dir.as_os_str().is_empty() {
        finder.current_dir().to_path_buf()
    } else {
        dir
    }
}

/// Turn matched children into targets: directories first, then files.
///
/// A file can't satisfy a pattern that continues past it, so files are
/// only kept when the wildcard segment was the last one.
pub(crate) fn child_targets(children: Vec<(PathBuf, bool)>, right: &str) -> Vec<Target> {
    let mut dirs = Vec::new();
    let mut files = Vec::new();
    for (path, is_dir) in children {
        if is_dir {
            dirs.push(if right.is_empty() {
                Target::Leaf(path)
            } else {
                Target::Pattern { base: path, rest: right.to_owned() }
            });
        } else if right.is_empty() {
            files.push(Target::Leaf(path));
        }
    }
    dirs.extend(files);
    dirs
}

/// Nothing exists at the path, as opposed to it being unreadable.
pub(crate) fn is_missing(err: &io::Error) -> bool {
    matches!(err.kind(), io::ErrorKind::NotFound | io::ErrorKind::NotADirectory)
}

// ---------------------------------------------------------------------------
// Files
// ---------------------------------------------------------------------------

enum Frame {
    Target(Target),

    /// Walking a matched directory. Depth 0 is the directory itself.
    Walk(Walk),
}

/// Lazy, depth-first iterator over the entries a pattern resolves to.
///
/// Created by [`Finder::files`]. Fused: after yielding an error it ends.
pub struct Files {
    finder: Finder,
    stack:  Vec<Frame>,
    done:   bool,
}

impl Files {
    pub(crate) fn new(finder: Finder, base_patterns: Vec<String>) -> Self {
        let stack = base_patterns
            .into_iter()
            .rev()
            .map(|p| Frame::Target(Target::root(p)))
            .collect();
        Self { finder, stack, done: false }
    }

    fn step(&mut self, frame: Frame) -> Result<Option<Entry>, WildpathError> {
        match frame {
            Frame::Target(Target::Pattern { base, rest }) => {
                self.expand(&base, &rest)?;
                Ok(None)
            }
            Frame::Target(Target::Leaf(path)) => self.leaf(path),
            Frame::Walk(mut walk) => match walk.next() {
                None => Ok(None),
                Some(res) => {
                    let dent = res.map_err(map_ignore_error)?;
                    self.stack.push(Frame::Walk(walk));
                    Ok(self.walked(dent))
                }
            },
        }
    }

    fn expand(&mut self, base: &Path, rest: &str) -> Result<(), WildpathError> {
        let split = match parse(rest) {
            Parsed::Literal(path) => {
                self.stack.push(Frame::Target(Target::Leaf(join(base, path))));
                return Ok(());
            }
            Parsed::Wildcard(split) => split,
        };

        let dir = listing_dir(&self.finder, base, &split);
        let matcher = SegmentMatcher::new(split.segment)?;
        let children = list_matches(&dir, &matcher)?;
        trace!(dir = %dir.display(), segment = split.segment, matches = children.len(), "listed directory");

        let targets = child_targets(children, split.right);
        self.stack.extend(targets.into_iter().rev().map(Frame::Target));
        Ok(())
    }

    fn leaf(&mut self, path: PathBuf) -> Result<Option<Entry>, WildpathError> {
        match fs::metadata(&path) {
            Ok(meta) if meta.is_dir() => {
                self.stack.push(Frame::Walk(walker(&path)));
                Ok(None)
            }
            Ok(meta) => Ok(Some(Entry::new(path, EntryKind::from_file_type(meta.file_type()), 0))),
            Err(e) if is_missing(&e) => Ok(self
                .finder
                .create_non_existing()
                .then(|| Entry::new(path, EntryKind::Missing, 0))),
            Err(e) => Err(WildpathError::io(path, e)),
        }
    }

    fn walked(&self, dent: DirEntry) -> Option<Entry> {
        let depth = dent.depth();
        let kind = if depth == 0 {
            EntryKind::Dir
        } else {
            dent.file_type().map(EntryKind::from_file_type).unwrap_or(EntryKind::Other)
        };

        if kind == EntryKind::Dir && !self.finder.include_directories() {
            return None;
        }
        Some(Entry::new(dent.into_path(), kind, depth))
    }
}

impl Iterator for Files {
    type Item = Result<Entry, WildpathError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        while let Some(frame) = self.stack.pop() {
            match self.step(frame) {
                Ok(Some(entry)) => {
                    self.finder.record(&entry);
                    return Some(Ok(entry));
                }
                Ok(None) => continue,
                Err(e) => {
                    self.done = true;
                    self.stack.clear();
                    return Some(Err(e));
                }
            }
        }
        self.done = true;
        None
    }
}

impl FusedIterator for Files {}

// ---------------------------------------------------------------------------
// Filesystem helpers
// ---------------------------------------------------------------------------

/// Immediate children of `dir` whose name matches, with whether each is a
/// directory (symlinks followed). A missing `dir` has no children.
fn list_matches(dir: &Path, matcher: &SegmentMatcher) -> Result<Vec<(PathBuf, bool)>, WildpathError> {
    let read = match fs::read_dir(dir) {
        Ok(read) => read,
        Err(e) if is_missing(&e) => return Ok(Vec::new()),
        Err(e) => return Err(WildpathError::io(dir, e)),
    };

    let mut out = Vec::new();
    for child in read {
        let child = child.map_err(|e| WildpathError::io(dir, e))?;
        if !matcher.is_match(&child.file_name()) {
            continue;
        }
        let path = child.path();
        let ft = child.file_type().map_err(|e| WildpathError::io(&path, e))?;
        let is_dir = ft.is_dir() || (ft.is_symlink() && crate::predicates::is_directory(&path));
        out.push((path, is_dir));
    }
    Ok(out)
}

/// Depth-first walk of everything below `root`, root first, no filtering.
fn walker(root: &Path) -> Walk {
    WalkBuilder::new(root)
        .standard_filters(false)
        .ignore(false)
        .parents(false)
        .hidden(false)
        .follow_links(false)
        .same_file_system(false)
        .build()
}

// ---------------------------------------------------------------------------
// Map ignore::Error to WildpathError
// ---------------------------------------------------------------------------

fn map_ignore_error(e: ignore::Error) -> WildpathError {
    match e {
        ignore::Error::WithPath { path, err } => match *err {
            ignore::Error::Io(io_err) => WildpathError::io(path, io_err),
            other => WildpathError::Io {
                path,
                source: io::Error::other(other.to_string()),
            },
        },
        ignore::Error::WithDepth { err, .. } => map_ignore_error(*err),
        ignore::Error::Io(io_err) => WildpathError::io(PathBuf::new(), io_err),
        other => WildpathError::Io {
            path:   PathBuf::new(),
            source: io::Error::other(other.to_string()),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn join_skips_empty_parts() {
        assert_eq!(join(Path::new(""), "a"), PathBuf::from("a"));
        assert_eq!(join(Path::new("a"), ""), PathBuf::from("a"));
        assert_eq!(join(Path::new("a"), "b"), Path::new("a").join("b"));
    }

    #[test]
    fn child_targets_put_directories_first_and_drop_files_mid_pattern() {
        let children = vec![
            (PathBuf::from("f1"), false),
            (PathBuf::from("d1"), true),
            (PathBuf::from("d2"), true),
        ];

        let last = child_targets(children.clone(), "");
        assert!(matches!(&last[0], Target::Leaf(p) if p == Path::new("d1")));
        assert!(matches!(&last[1], Target::Leaf(p) if p == Path::new("d2")));
        assert!(matches!(&last[2], Target::Leaf(p) if p == Path::new("f1")));

        let mid = child_targets(children, "s*dir");
        assert_eq!(mid.len(), 2);
        assert!(matches!(&mid[0], Target::Pattern { base, rest } if base == Path::new("d1") && rest == "s*dir"));
    }

    #[test]
    fn missing_left_directory_lists_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let matcher = SegmentMatcher::new("*").unwrap();
        let got = list_matches(&dir.path().join("nope"), &matcher).unwrap();
        assert!(got.is_empty());
    }
}
