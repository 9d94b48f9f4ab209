use std::path::PathBuf;

/// The set of mounted volumes a root wildcard (`*:\...`, `?/...`) expands over.
///
/// Implement this to pin resolution to a fixed view of the machine, for
/// tests or sandboxed callers. [`HostVolumes`](crate::HostVolumes) asks the
/// operating system.
///
/// # Thread Safety
///
/// `Send + Sync` are required. A finder is cloned into every concurrent
/// unit and all of them share the same volume source.
///
/// # Example
///
/// ```rust
/// use std::path::PathBuf;
/// use wildpath::Volumes;
///
/// struct TwoDisks;
///
/// impl Volumes for TwoDisks {
///     fn roots(&self) -> Vec<PathBuf> {
///         vec![PathBuf::from("/mnt/a"), PathBuf::from("/mnt/b")]
///     }
/// }
/// ```
pub trait Volumes: Send + Sync {
    /// Roots of the volumes that are currently ready.
    ///
    /// Volumes that cannot be read right now must be left out rather than
    /// reported as errors.
    fn roots(&self) -> Vec<PathBuf>;
}
