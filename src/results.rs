use std::path::PathBuf;
use std::time::Duration;

use crate::entry::{Entry, EntryKind};
use crate::error::WildpathError;

/// Everything a drained resolve produced.
#[derive(Debug, Default)]
pub struct Results {
    /// Resolved entries, in the order they were yielded.
    pub entries: Vec<Entry>,

    /// Errors yielded along the way. The sequential resolver stops at the
    /// first one, the concurrent resolver keeps one per failed unit.
    /// Use [`WildpathError::is_recoverable`] to distinguish warnings from failures.
    pub errors: Vec<WildpathError>,

    /// Resolve statistics.
    pub stats: ScanStats,
}

impl Results {
    pub(crate) fn push(&mut self, item: Result<Entry, WildpathError>) {
        match item {
            Ok(entry) => {
                match entry.kind {
                    EntryKind::Dir => self.stats.dirs += 1,
                    EntryKind::Missing => {}
                    _ => self.stats.files += 1,
                }
                self.entries.push(entry);
            }
            Err(err) => self.errors.push(err),
        }
    }

    pub(crate) fn finish(&mut self, duration: Duration) {
        self.stats = ScanStats::compute(self.stats.files, self.stats.dirs, duration);
    }

    /// Paths of all resolved entries.
    pub fn paths(&self) -> Vec<PathBuf> {
        self.entries.iter().map(|e| e.path.clone()).collect()
    }

    /// `true` if the resolve was cut short by cancellation.
    pub fn was_cancelled(&self) -> bool {
        self.errors.iter().any(|e| matches!(e, WildpathError::Cancelled))
    }
}

/// Statistics for a drained resolve.
#[derive(Debug, Default, Clone, Copy)]
pub struct ScanStats {
    /// Number of non-directory entries yielded.
    pub files: usize,

    /// Number of directory entries yielded.
    pub dirs: usize,

    /// Wall-clock time from first pull to exhaustion.
    pub duration: Duration,

    /// Entries yielded per second. Equals `(files + dirs) / duration`,
    /// clamped to 0 on zero-duration runs.
    pub entries_per_sec: usize,
}

impl ScanStats {
    pub(crate) fn compute(files: usize, dirs: usize, duration: Duration) -> Self {
        let secs = duration.as_secs_f64();
        let entries_per_sec = match secs > 0.0 {
            true => ((files + dirs) as f64 / secs) as usize,
            false => 0,
        };
        Self { files, dirs, duration, entries_per_sec }
    }
}
