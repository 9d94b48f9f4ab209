//! # wildpath
//!
//! Resolve path patterns with `*` and `?` in any segment, including the
//! drive or root, into the concrete files and directories they name.
//!
//! A pattern is split around its first wildcard segment into a fixed
//! prefix, the segment itself, and the rest. The prefix is listed, every
//! matching child is substituted back in, and the result is resolved again
//! until no wildcards remain. A root wildcard (`*:\Windows`, `?/data`) is
//! expanded over the mounted volumes instead of a directory listing.
//!
//! Two resolvers share those rules:
//!
//! - [`Finder::files`]: a lazy, depth-first iterator on the calling thread.
//! - [`Finder::files_async`]: a cancellable [`Stream`](tokio_stream::Stream)
//!   that resolves base patterns and walked directories concurrently on Tokio.
//!
//! Both yield the same set of entries.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! let finder = wildpath::finder()
//!     .current_dir("/srv/data")
//!     .build()?;
//!
//! // Every file named like *st* two levels below d?r* directories.
//! for entry in finder.files("d?r*/s*dir/*st*") {
//!     let entry = entry?;
//!     println!("{}", entry.path.display());
//! }
//! # Ok::<(), wildpath::WildpathError>(())
//! ```
//!
//! # Concurrent resolution
//!
//! ```rust,no_run
//! use tokio_stream::StreamExt;
//! use tokio_util::sync::CancellationToken;
//!
//! # async fn demo() -> Result<(), wildpath::WildpathError> {
//! let finder = wildpath::finder().include_directories(true).build()?;
//! let cancel = CancellationToken::new();
//!
//! let mut stream = finder.files_async("logs/*", cancel.clone());
//! while let Some(entry) = stream.next().await {
//!     match entry {
//!         Ok(entry) => println!("{}", entry.relative_name()),
//!         Err(err)  => eprintln!("skipped: {err}"),
//!     }
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Fixed volumes
//!
//! Root wildcards consult a [`Volumes`] source. Inject one to make results
//! independent of the machine:
//!
//! ```rust,no_run
//! use wildpath::FixedVolumes;
//!
//! let finder = wildpath::finder()
//!     .volumes(FixedVolumes(vec!["/mnt/a".into(), "/mnt/b".into()]))
//!     .build()?;
//!
//! let hits = finder.collect("?:/Windows/winhlp32.exe");
//! # Ok::<(), wildpath::WildpathError>(())
//! ```

#![forbid(unsafe_code)]

pub mod pattern;

mod builder;
mod concurrent;
mod entry;
mod error;
mod finder;
mod predicates;
mod resolver;
mod results;
mod traits;
mod volumes;

// ── Public re-exports ─────────────────────────────────────────────────────────

pub use builder::FinderBuilder;
pub use concurrent::FileStream;
pub use entry::{Entry, EntryKind};
pub use error::WildpathError;
pub use finder::Finder;
pub use pattern::{normalize, split};
pub use predicates::{ensure_extension, is_directory};
pub use resolver::Files;
pub use results::{Results, ScanStats};
pub use traits::Volumes;
pub use volumes::{base_patterns, FixedVolumes, HostVolumes};

// ── Entry points ──────────────────────────────────────────────────────────────

/// Create a new [`FinderBuilder`] to configure a resolver.
///
/// # Example
///
/// ```rust
/// let finder = wildpath::finder()
///     .include_directories(true)
///     .current_dir(std::env::temp_dir())
///     .build()
///     .unwrap();
///
/// assert!(finder.include_directories());
/// ```
pub fn finder() -> FinderBuilder {
    FinderBuilder::default()
}

/// Resolve `pattern` against the process working directory and host volumes.
///
/// Shorthand for building a [`Finder`] with the two flags and calling
/// [`Finder::files`].
pub fn get_files(
    pattern: &str,
    include_directories: bool,
    create_non_existing: bool,
) -> Result<Files, WildpathError> {
    let finder = finder()
        .include_directories(include_directories)
        .create_non_existing(create_non_existing)
        .build()?;
    Ok(finder.files(pattern))
}

/// Concurrent counterpart of [`get_files`].
///
/// # Panics
///
/// Panics when called outside a Tokio runtime.
pub fn get_files_async(
    pattern: &str,
    cancel: tokio_util::sync::CancellationToken,
    include_directories: bool,
    create_non_existing: bool,
) -> Result<FileStream, WildpathError> {
    let finder = finder()
        .include_directories(include_directories)
        .create_non_existing(create_non_existing)
        .build()?;
    Ok(finder.files_async(pattern, cancel))
}
