use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Instant;

use tokio_stream::StreamExt;
use tokio_util::sync::CancellationToken;

use crate::concurrent::{self, FileStream};
use crate::entry::Entry;
use crate::resolver::Files;
use crate::results::Results;
use crate::traits::Volumes;
use crate::volumes::base_patterns;

/// A configured wildcard path resolver.
///
/// Cheap to clone: the volume source and the offset table are shared.
/// Flags are fixed at construction and never change.
#[derive(Clone)]
pub struct Finder {
    include_directories: bool,
    create_non_existing: bool,
    cwd:                 Arc<Path>,
    volumes:             Arc<dyn Volumes>,
    max_concurrency:     usize,
    channel_capacity:    usize,
    offsets:             Arc<Mutex<HashMap<PathBuf, usize>>>,
}

impl Finder {
    pub(crate) fn new(
        include_directories: bool,
        create_non_existing: bool,
        cwd: PathBuf,
        volumes: Arc<dyn Volumes>,
        max_concurrency: usize,
        channel_capacity: usize,
    ) -> Self {
        Self {
            include_directories,
            create_non_existing,
            cwd: Arc::from(cwd),
            volumes,
            max_concurrency,
            channel_capacity,
            offsets: Arc::default(),
        }
    }

    pub fn include_directories(&self) -> bool {
        self.include_directories
    }

    pub fn create_non_existing(&self) -> bool {
        self.create_non_existing
    }

    pub fn current_dir(&self) -> &Path {
        &self.cwd
    }

    pub(crate) fn max_concurrency(&self) -> usize {
        self.max_concurrency
    }

    pub(crate) fn channel_capacity(&self) -> usize {
        self.channel_capacity
    }

    /// The qualified patterns `pattern` is resolved from.
    pub fn base_patterns(&self, pattern: &str) -> Vec<String> {
        base_patterns(pattern, &self.cwd, self.volumes.as_ref())
    }

    // ── Resolve ───────────────────────────────────────────────────────────

    /// Resolve `pattern` lazily, depth first, on the calling thread.
    ///
    /// The first IO error is yielded as `Err` and ends the iteration.
    pub fn files(&self, pattern: &str) -> Files {
        self.reset_offsets();
        Files::new(self.clone(), self.base_patterns(pattern))
    }

    /// Resolve `pattern` on the Tokio runtime, fanning out across base
    /// patterns and directories.
    ///
    /// Yields the same set of entries as [`files`](Self::files), in no
    /// particular order. A failing unit yields one
    /// [`BasePattern`](crate::WildpathError::BasePattern) error and the rest
    /// keep going. If `cancel` fires, units stop at their next check and the
    /// stream ends with [`Cancelled`](crate::WildpathError::Cancelled).
    ///
    /// # Panics
    ///
    /// Panics when called outside a Tokio runtime.
    pub fn files_async(&self, pattern: &str, cancel: CancellationToken) -> FileStream {
        self.reset_offsets();
        concurrent::spawn(self.clone(), self.base_patterns(pattern), cancel)
    }

    /// Drain [`files`](Self::files) into a [`Results`].
    pub fn collect(&self, pattern: &str) -> Results {
        let start = Instant::now();
        let mut results = Results::default();
        for item in self.files(pattern) {
            results.push(item);
        }
        results.finish(start.elapsed());
        results
    }

    /// Drain [`files_async`](Self::files_async) into a [`Results`].
    pub async fn collect_async(&self, pattern: &str, cancel: CancellationToken) -> Results {
        let start = Instant::now();
        let mut results = Results::default();
        let mut stream = self.files_async(pattern, cancel);
        while let Some(item) = stream.next().await {
            results.push(item);
        }
        results.finish(start.elapsed());
        results
    }

    // ── Offsets ───────────────────────────────────────────────────────────

    /// Components `path` gained by directory walking during the most recent
    /// resolve on this finder. 0 for direct matches and for paths that
    /// resolve did not yield.
    pub fn entry_offset(&self, path: impl AsRef<Path>) -> usize {
        self.offsets
            .lock()
            .ok()
            .and_then(|o| o.get(path.as_ref()).copied())
            .unwrap_or(0)
    }

    pub(crate) fn record(&self, entry: &Entry) {
        if let Ok(mut offsets) = self.offsets.lock() {
            offsets.insert(entry.path.clone(), entry.offset);
        }
    }

    pub(crate) fn forget(&self, path: &Path) {
        if let Ok(mut offsets) = self.offsets.lock() {
            offsets.remove(path);
        }
    }

    /// Each resolve starts from an empty table.
    fn reset_offsets(&self) {
        if let Ok(mut offsets) = self.offsets.lock() {
            offsets.clear();
        }
    }
}
