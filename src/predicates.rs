use std::path::Path;

/// Returns `true` if `path` exists and is a directory.
///
/// A path that does not exist (or cannot be inspected) is reported as not a
/// directory rather than as an error. Symlinks are followed.
pub fn is_directory(path: impl AsRef<Path>) -> bool {
    std::fs::metadata(path).map(|m| m.is_dir()).unwrap_or(false)
}

/// Append `extension` to `path` unless it already has one.
///
/// The leading dot is optional: `"txt"` and `".txt"` behave the same.
/// Works on patterns too, `di?3/s*dir*/test` becomes `di?3/s*dir*/test.txt`.
///
/// The last component has an extension when it contains a dot that is not
/// its final character. So `.bashrc` is kept, while `notes.` gains one.
pub fn ensure_extension(path: &str, extension: &str) -> String {
    let extension = extension.trim_start_matches('.');
    if extension.is_empty() || has_extension(path) {
        return path.to_owned();
    }
    format!("{path}.{extension}")
}

fn has_extension(path: &str) -> bool {
    let name = path.rsplit(['/', std::path::MAIN_SEPARATOR]).next().unwrap_or(path);
    matches!(name.rfind('.'), Some(dot) if dot + 1 < name.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ensure_extension_appends_when_missing() {
        assert_eq!(ensure_extension("Windows/winhlp32", ".exe"), "Windows/winhlp32.exe");
        assert_eq!(ensure_extension("notes", "md"), "notes.md");
    }

    #[test]
    fn ensure_extension_keeps_existing_extension() {
        assert_eq!(ensure_extension("report.txt", ".exe"), "report.txt");
        assert_eq!(ensure_extension("d?r*/s*dir/*.log", ".txt"), "d?r*/s*dir/*.log");
    }

    #[test]
    fn ensure_extension_treats_leading_dot_as_extension() {
        assert_eq!(ensure_extension(".bashrc", ".txt"), ".bashrc");
        assert_eq!(ensure_extension("home/.profile", "txt"), "home/.profile");
    }

    #[test]
    fn ensure_extension_fills_in_trailing_dot() {
        assert_eq!(ensure_extension("notes.", ".txt"), "notes..txt");
        assert_eq!(ensure_extension("v1.2/readme", ".md"), "v1.2/readme.md");
    }

    #[test]
    fn ensure_extension_is_idempotent() {
        let once = ensure_extension("di?3/s*dir*/test", ".txt");
        assert_eq!(ensure_extension(&once, ".txt"), once);
        assert_eq!(once, "di?3/s*dir*/test.txt");
    }

    #[test]
    fn ensure_extension_ignores_empty_extension() {
        assert_eq!(ensure_extension("plain", ""), "plain");
        assert_eq!(ensure_extension("plain", "."), "plain");
    }

    #[test]
    fn is_directory_distinguishes_dirs_files_and_missing() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("hosts");
        std::fs::write(&file, "127.0.0.1 localhost").unwrap();

        assert!(is_directory(dir.path()));
        assert!(!is_directory(&file));
        assert!(!is_directory(dir.path().join("WinTestDir")));
    }
}
