//! # Cache Error Types
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                    │
//! │                                                                         │
//! │  std::io::Error / prost::DecodeError / ValidationError                 │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  CacheError (this module) ← Adds path and categorization               │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Caller falls back to a full sync                                      │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::path::PathBuf;

use thiserror::Error;
use warden_core::ValidationError;

/// File cache errors.
#[derive(Debug, Error)]
pub enum CacheError {
    /// The file was written by a different schema version.
    ///
    /// ## When This Occurs
    /// - The cache was written by an older or newer build
    /// - The file is not a cache file at all (version 0)
    #[error("Cache version mismatch: found {found}, expected {expected}")]
    VersionMismatch { found: i32, expected: i32 },

    /// The bytes are not a valid encoding.
    #[error("Cache decode failed: {0}")]
    Decode(#[from] prost::DecodeError),

    /// The encoding is valid but an entity inside it is not.
    #[error("Invalid cached {entity}: {source}")]
    Invalid {
        entity: String,
        #[source]
        source: ValidationError,
    },

    /// File system error.
    #[error("Cache I/O failed for {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl CacheError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        CacheError::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn invalid(entity: impl Into<String>, source: ValidationError) -> Self {
        CacheError::Invalid {
            entity: entity.into(),
            source,
        }
    }

    /// Whether the file should simply be discarded and rebuilt by a full
    /// sync, as opposed to an environment problem worth alerting on.
    pub fn is_stale(&self) -> bool {
        matches!(
            self,
            CacheError::VersionMismatch { .. } | CacheError::Decode(_) | CacheError::Invalid { .. }
        )
    }
}

/// Result type alias for cache operations.
pub type CacheResult<T> = Result<T, CacheError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stale_classification() {
        let mismatch = CacheError::VersionMismatch {
            found: 0,
            expected: 1,
        };
        assert!(mismatch.is_stale());
        assert_eq!(
            mismatch.to_string(),
            "Cache version mismatch: found 0, expected 1"
        );

        let io = CacheError::io(
            "/nonexistent",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        assert!(!io.is_stale());
    }
}
