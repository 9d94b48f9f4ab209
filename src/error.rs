use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum WildpathError {
    // Pattern
    #[error("invalid pattern: {0}")]
    InvalidPattern(String),

    // Traversal
    #[error("permission denied: {}", .0.display())]
    PermissionDenied(PathBuf),

    #[error("path not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("IO error at {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // Concurrent resolution
    #[error("resolution cancelled")]
    Cancelled,

    #[error("failed to resolve base pattern {pattern}")]
    BasePattern {
        pattern: String,
        #[source]
        source: Box<WildpathError>,
    },

    // Config
    #[error("invalid concurrency setting")]
    InvalidConcurrency(usize),
}

impl WildpathError {
    /// Classify an `std::io::Error` raised while touching `path`.
    pub(crate) fn io(path: impl Into<PathBuf>, err: std::io::Error) -> Self {
        let path = path.into();
        match err.kind() {
            std::io::ErrorKind::PermissionDenied => Self::PermissionDenied(path),
            std::io::ErrorKind::NotFound => Self::NotFound(path),
            _ => Self::Io { path, source: err },
        }
    }

    /// Filesystem path the failure is tied to. Looks through `BasePattern`
    /// to the underlying error; `None` for cancellation and config errors.
    pub fn path(&self) -> Option<&PathBuf> {
        match self {
            Self::PermissionDenied(p) | Self::NotFound(p) | Self::Io { path: p, .. } => Some(p),
            Self::BasePattern { source, .. } => source.path(),
            _ => None,
        }
    }

    /// Whether resolution of other patterns can continue after this error.
    ///
    /// IO failures are scoped to the sub-expansion that hit them. Cancellation
    /// and configuration errors are not.
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::PermissionDenied(_) | Self::NotFound(_) | Self::Io { .. } => true,
            Self::BasePattern { source, .. } => source.is_recoverable(),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn io_errors_are_classified_by_kind() {
        let denied = WildpathError::io("/root/x", io::Error::from(io::ErrorKind::PermissionDenied));
        assert!(matches!(denied, WildpathError::PermissionDenied(_)));

        let missing = WildpathError::io("/nope", io::Error::from(io::ErrorKind::NotFound));
        assert!(matches!(missing, WildpathError::NotFound(_)));

        let other = WildpathError::io("/dev/x", io::Error::other("device gone"));
        assert!(matches!(other, WildpathError::Io { .. }));
    }

    #[test]
    fn base_pattern_errors_delegate_to_their_source() {
        let err = WildpathError::BasePattern {
            pattern: "/mnt/*/logs".into(),
            source:  Box::new(WildpathError::PermissionDenied("/mnt/a".into())),
        };
        assert!(err.is_recoverable());
        assert_eq!(err.path(), Some(&PathBuf::from("/mnt/a")));
        assert!(!WildpathError::Cancelled.is_recoverable());
    }
}
