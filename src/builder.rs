use std::path::PathBuf;
use std::sync::Arc;

use crate::error::WildpathError;
use crate::finder::Finder;
use crate::traits::Volumes;
use crate::volumes::HostVolumes;

/// Default bound of the concurrent output channel.
const DEFAULT_CHANNEL_CAPACITY: usize = 256;

// ---------------------------------------------------------------------------
// FinderBuilder
// ---------------------------------------------------------------------------

/// Entry point for configuring a [`Finder`].
///
/// Created via [`wildpath::finder()`](crate::finder). Configure with chained
/// builder methods, then call [`build()`](FinderBuilder::build).
///
/// # Example
///
/// ```rust,no_run
/// let finder = wildpath::finder()
///     .include_directories(true)
///     .current_dir("/srv/data")
///     .build()?;
///
/// for entry in finder.files("d?r*/s*dir") {
///     println!("{}", entry?.path.display());
/// }
/// # Ok::<(), wildpath::WildpathError>(())
/// ```
pub struct FinderBuilder {
    include_directories: bool,
    create_non_existing: bool,
    current_dir:         Option<PathBuf>,
    volumes:             Option<Arc<dyn Volumes>>,
    max_concurrency:     usize,
    channel_capacity:    usize,
}

impl Default for FinderBuilder {
    fn default() -> Self {
        Self {
            include_directories: false,
            create_non_existing: false,
            current_dir:         None,
            volumes:             None,
            max_concurrency:     num_cpus(),
            channel_capacity:    DEFAULT_CHANNEL_CAPACITY,
        }
    }
}

impl FinderBuilder {
    // ── Resolution ────────────────────────────────────────────────────────

    /// Yield matched directories and every directory found below them.
    ///
    /// Files below a matched directory are always yielded. This switch only
    /// decides whether the directories themselves appear in the output.
    pub fn include_directories(mut self, yes: bool) -> Self {
        self.include_directories = yes;
        self
    }

    /// Yield a wildcard-free path even when nothing exists there yet.
    ///
    /// Such entries carry [`EntryKind::Missing`](crate::EntryKind::Missing).
    /// Useful for output files named by a pattern.
    pub fn create_non_existing(mut self, yes: bool) -> Self {
        self.create_non_existing = yes;
        self
    }

    // ── Context ───────────────────────────────────────────────────────────

    /// Directory that relative patterns are resolved against.
    ///
    /// Defaults to the process working directory at `build()` time.
    pub fn current_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.current_dir = Some(dir.into());
        self
    }

    /// Volume source used for root wildcards like `*:\Windows`.
    ///
    /// Defaults to [`HostVolumes`].
    pub fn volumes(mut self, v: impl Volumes + 'static) -> Self {
        self.volumes = Some(Arc::new(v));
        self
    }

    // ── Concurrency ───────────────────────────────────────────────────────

    /// Maximum number of concurrent units running at once in
    /// [`Finder::files_async`]. Defaults to the number of logical CPU cores.
    pub fn max_concurrency(mut self, n: usize) -> Self {
        self.max_concurrency = n;
        self
    }

    /// Capacity of the channel feeding [`FileStream`](crate::FileStream).
    ///
    /// Units wait when the consumer falls this far behind.
    pub fn channel_capacity(mut self, n: usize) -> Self {
        self.channel_capacity = n;
        self
    }

    // ── Build ─────────────────────────────────────────────────────────────

    /// Validate the configuration and create the finder.
    ///
    /// # Errors
    ///
    /// Returns `Err` when `max_concurrency` or `channel_capacity` is zero,
    /// or when no current directory was given and the process working
    /// directory cannot be read.
    pub fn build(self) -> Result<Finder, WildpathError> {
        if self.max_concurrency == 0 {
            return Err(WildpathError::InvalidConcurrency(self.max_concurrency));
        }
        if self.channel_capacity == 0 {
            return Err(WildpathError::InvalidConcurrency(self.channel_capacity));
        }

        let cwd = match self.current_dir {
            Some(dir) => dir,
            None => std::env::current_dir().map_err(|e| WildpathError::io(".", e))?,
        };

        let volumes: Arc<dyn Volumes> = match self.volumes {
            Some(v) => v,
            None    => Arc::new(HostVolumes),
        };

        Ok(Finder::new(
            self.include_directories,
            self.create_non_existing,
            cwd,
            volumes,
            self.max_concurrency,
            self.channel_capacity,
        ))
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Get the logical CPU count, with a safe fallback.
fn num_cpus() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(4)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_concurrency_is_rejected() {
        let err = FinderBuilder::default().max_concurrency(0).build().err();
        assert!(matches!(err, Some(WildpathError::InvalidConcurrency(0))));
    }

    #[test]
    fn zero_channel_capacity_is_rejected() {
        let err = FinderBuilder::default().channel_capacity(0).build().err();
        assert!(matches!(err, Some(WildpathError::InvalidConcurrency(0))));
    }

    #[test]
    fn flags_reach_the_finder() {
        let finder = FinderBuilder::default()
            .include_directories(true)
            .create_non_existing(true)
            .current_dir("/work")
            .build()
            .unwrap();
        assert!(finder.include_directories());
        assert!(finder.create_non_existing());
        assert_eq!(finder.current_dir(), std::path::Path::new("/work"));
    }
}
