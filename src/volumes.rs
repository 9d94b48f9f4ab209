use std::path::{Path, PathBuf, MAIN_SEPARATOR};

use tracing::debug;

use crate::pattern::{normalize, WILDCARDS};
use crate::traits::Volumes;

// ---------------------------------------------------------------------------
// Volume sources
// ---------------------------------------------------------------------------

/// Volumes reported by the operating system.
///
/// On Windows every drive letter whose root is currently readable. Drives
/// that are not ready (empty card readers, disconnected shares) are skipped.
/// Elsewhere there is a single root, `/`.
#[derive(Debug, Clone, Copy, Default)]
pub struct HostVolumes;

impl Volumes for HostVolumes {
    #[cfg(windows)]
    fn roots(&self) -> Vec<PathBuf> {
        (b'A'..=b'Z')
            .map(|letter| PathBuf::from(format!("{}:\\", letter as char)))
            .filter(|root| root.exists())
            .collect()
    }

    #[cfg(not(windows))]
    fn roots(&self) -> Vec<PathBuf> {
        vec![PathBuf::from("/")]
    }
}

/// A fixed list of volume roots.
#[derive(Debug, Clone, Default)]
pub struct FixedVolumes(pub Vec<PathBuf>);

impl Volumes for FixedVolumes {
    fn roots(&self) -> Vec<PathBuf> {
        self.0.clone()
    }
}

// ---------------------------------------------------------------------------
// base_patterns()
// ---------------------------------------------------------------------------

/// Expand a raw pattern into the fully qualified patterns resolution starts from.
///
/// - `*:\rest` / `?:\rest`: one pattern per ready volume.
/// - `*\rest` / `?\rest`: one per ready volume, plus `rest` under `cwd`,
///   since the leading segment may just as well name a relative directory.
/// - rooted, or drive-qualified on Windows: the pattern itself.
/// - anything else: the pattern under `cwd`. On Unix `a:/x` is an ordinary
///   relative path.
///
/// `*:\rest` with no ready volumes gives an empty list. No current-directory
/// candidate is added for it, so the result is not always non-empty.
pub fn base_patterns(pattern: &str, cwd: &Path, volumes: &dyn Volumes) -> Vec<String> {
    let pattern = normalize(pattern);
    let mut chars = pattern.chars();
    let first = chars.next();
    let second = chars.next();
    let third = chars.next();

    let starts_wild = matches!(first, Some(c) if WILDCARDS.contains(&c));
    let mut out = Vec::new();

    if starts_wild && second == Some(':') && third == Some(MAIN_SEPARATOR) {
        out.extend(on_volumes(&pattern[3..], volumes));
    } else if starts_wild && second == Some(MAIN_SEPARATOR) {
        out.extend(on_volumes(&pattern[2..], volumes));
        out.push(under(cwd, &pattern));
    } else if is_qualified(&pattern) {
        out.push(pattern.clone());
    } else {
        out.push(under(cwd, &pattern));
    }

    debug!(pattern = %pattern, count = out.len(), "expanded base patterns");
    out
}

fn is_qualified(pattern: &str) -> bool {
    pattern.starts_with(MAIN_SEPARATOR) || (cfg!(windows) && pattern.chars().nth(1) == Some(':'))
}

fn on_volumes<'a>(rest: &'a str, volumes: &dyn Volumes) -> impl Iterator<Item = String> + 'a {
    volumes.roots().into_iter().map(move |root| under(&root, rest))
}

fn under(base: &Path, rest: &str) -> String {
    let base = base.to_string_lossy();
    if rest.is_empty() {
        base.into_owned()
    } else if base.ends_with(MAIN_SEPARATOR) {
        format!("{base}{rest}")
    } else {
        format!("{base}{MAIN_SEPARATOR}{rest}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sep(s: &str) -> String {
        s.replace('/', &MAIN_SEPARATOR.to_string())
    }

    fn disks() -> FixedVolumes {
        FixedVolumes(vec![PathBuf::from(sep("/mnt/a/")), PathBuf::from(sep("/mnt/b"))])
    }

    #[test]
    fn relative_pattern_is_placed_under_cwd() {
        let got = base_patterns(&sep("d?r*/s*dir"), Path::new(&sep("/work")), &disks());
        assert_eq!(got, vec![sep("/work/d?r*/s*dir")]);
    }

    #[test]
    fn rooted_pattern_is_kept_as_is() {
        let got = base_patterns(&sep("/etc/host*"), Path::new(&sep("/work")), &disks());
        assert_eq!(got, vec![sep("/etc/host*")]);
    }

    #[cfg(windows)]
    #[test]
    fn drive_letter_pattern_is_kept_as_is() {
        let got = base_patterns(&sep("C:Windows/winhlp32.exe"), Path::new(&sep("/work")), &disks());
        assert_eq!(got, vec![sep("C:/Windows/winhlp32.exe")]);
    }

    #[cfg(not(windows))]
    #[test]
    fn colon_directory_is_relative_off_windows() {
        let got = base_patterns("a:file*", Path::new("/work"), &disks());
        assert_eq!(got, vec!["/work/a:/file*".to_owned()]);
    }

    #[test]
    fn drive_wildcard_expands_over_every_volume() {
        let got = base_patterns(&sep("?:/Windows/winhlp32.exe"), Path::new(&sep("/work")), &disks());
        assert_eq!(
            got,
            vec![sep("/mnt/a/Windows/winhlp32.exe"), sep("/mnt/b/Windows/winhlp32.exe")]
        );
    }

    #[test]
    fn root_wildcard_also_tries_cwd() {
        let got = base_patterns(&sep("*/s*dir"), Path::new(&sep("/work")), &disks());
        assert_eq!(
            got,
            vec![sep("/mnt/a/s*dir"), sep("/mnt/b/s*dir"), sep("/work/*/s*dir")]
        );
    }

    #[test]
    fn no_ready_volumes_is_not_an_error() {
        let got = base_patterns(&sep("*:/x"), Path::new(&sep("/work")), &FixedVolumes::default());
        assert!(got.is_empty());
    }
}
