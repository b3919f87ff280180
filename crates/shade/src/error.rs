//! Error types for storage and configuration.

use std::io;
use std::path::PathBuf;

/// Errors raised by a [`KeyValueStore`](crate::KeyValueStore).
///
/// The theme store never propagates these; they surface only to callers
/// using a storage backend directly.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// The store cannot be reached at all (disabled, sandboxed, no window).
    #[error("storage unavailable: {0}")]
    Unavailable(String),

    /// Writing would exceed the store's capacity.
    #[error("storage quota exceeded: {needed} bytes needed, limit is {limit}")]
    QuotaExceeded { needed: usize, limit: usize },

    /// The host refused the operation for another reason.
    #[error("storage rejected the operation: {0}")]
    Rejected(String),

    /// Reading or writing the backing file failed.
    #[error("storage I/O error: {0}")]
    Io(#[from] io::Error),

    /// The backing file does not hold a string map.
    #[error("storage file is malformed: {0}")]
    Format(#[from] serde_json::Error),
}

/// Errors raised while loading or validating a [`ThemeConfig`](crate::ThemeConfig).
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The configuration is not valid YAML for the expected shape.
    #[error("failed to parse theme config: {0}")]
    Parse(#[from] serde_yaml::Error),

    /// The configuration parsed but violates a constraint.
    #[error("invalid theme config: {0}")]
    Invalid(String),
}

impl ConfigError {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        Self::Invalid(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quota_display() {
        let err = StorageError::QuotaExceeded {
            needed: 12,
            limit: 8,
        };
        assert_eq!(
            err.to_string(),
            "storage quota exceeded: 12 bytes needed, limit is 8"
        );
    }

    #[test]
    fn test_from_io_error() {
        let io_err = io::Error::new(io::ErrorKind::PermissionDenied, "denied");
        let err: StorageError = io_err.into();
        assert!(matches!(err, StorageError::Io(_)));
    }

    #[test]
    fn test_read_error_mentions_path() {
        let err = ConfigError::Read {
            path: PathBuf::from("/etc/theme.yaml"),
            source: io::Error::new(io::ErrorKind::NotFound, "missing"),
        };
        assert!(err.to_string().contains("/etc/theme.yaml"));
    }
}
