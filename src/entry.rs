use std::path::{Component, PathBuf};

/// A single path produced by resolving a pattern.
///
/// `offset` counts the path components appended below a matched directory
/// while walking into it. Direct wildcard and literal matches have offset 0.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    /// Full path to the entry.
    pub path: PathBuf,

    /// What kind of entry this is.
    pub kind: EntryKind,

    /// Components added by directory walking. Direct match = 0.
    pub offset: usize,
}

/// The kind of a resolved entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    /// A regular file.
    File,

    /// A directory.
    Dir,

    /// A symbolic link that was not followed.
    Symlink,

    /// Anything else (device files, pipes, sockets, etc.).
    Other,

    /// Nothing exists at this path yet. Only produced when the finder was
    /// built with `create_non_existing(true)`.
    Missing,
}

impl EntryKind {
    pub(crate) fn from_file_type(ft: std::fs::FileType) -> Self {
        if ft.is_dir() {
            Self::Dir
        } else if ft.is_file() {
            Self::File
        } else if ft.is_symlink() {
            Self::Symlink
        } else {
            Self::Other
        }
    }
}

impl Entry {
    pub(crate) fn new(path: PathBuf, kind: EntryKind, offset: usize) -> Self {
        Self { path, kind, offset }
    }

    /// Name of this entry relative to the pattern that produced it.
    ///
    /// The last `offset + 1` normal components, joined with `/`. For a file
    /// found while walking `logs/` this is `logs/2024/app.log`, for a direct
    /// match just `app.log`. Archive writers use this as the member name.
    pub fn relative_name(&self) -> String {
        let parts: Vec<_> = self
            .path
            .components()
            .filter_map(|c| match c {
                Component::Normal(s) => Some(s.to_string_lossy()),
                _ => None,
            })
            .collect();
        let keep = (self.offset + 1).min(parts.len());
        parts[parts.len() - keep..].join("/")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relative_name_of_direct_match_is_file_name() {
        let e = Entry::new("/data/logs/app.log".into(), EntryKind::File, 0);
        assert_eq!(e.relative_name(), "app.log");
    }

    #[test]
    fn relative_name_keeps_walked_components() {
        let e = Entry::new("/data/logs/2024/app.log".into(), EntryKind::File, 2);
        assert_eq!(e.relative_name(), "logs/2024/app.log");
    }

    #[test]
    fn relative_name_is_clamped_to_path_length() {
        let e = Entry::new("/a/b".into(), EntryKind::File, 9);
        assert_eq!(e.relative_name(), "a/b");
    }
}
