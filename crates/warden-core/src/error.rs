//! # Error Types
//!
//! Domain-specific error types for warden-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  warden-core errors (this file)                                        │
//! │  └── ValidationError  - An entity or field failed its invariants       │
//! │                                                                         │
//! │  warden-cache errors (separate crate)                                  │
//! │  └── CacheError       - Snapshot load/store failures                   │
//! │                                                                         │
//! │  warden-sync errors (separate crate)                                   │
//! │  └── SyncError        - Backend, protocol and conversion failures      │
//! │                                                                         │
//! │  Flow: ValidationError → SyncError::Conversion / CacheError::Invalid   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Every constructor in this crate that enforces an invariant returns one of
/// these. The `field` names the offending field, including an index suffix
/// (`dedicated_ips[2]`) when the value came out of a list.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters, got {len}")]
    TooLong { field: String, max: usize, len: usize },

    /// Field value contains a character outside the allowed set.
    #[error("{field} has invalid character {ch:?} at index {index}")]
    BadChar {
        field: String,
        ch: char,
        index: usize,
    },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}, got {value}")]
    OutOfRange {
        field: String,
        min: i64,
        max: i64,
        value: i64,
    },

    /// Invalid format (e.g., malformed address bytes, unknown time zone).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

impl ValidationError {
    /// Creates a Required error.
    pub fn required(field: impl Into<String>) -> Self {
        ValidationError::Required {
            field: field.into(),
        }
    }

    /// Creates an InvalidFormat error.
    pub fn invalid(field: impl Into<String>, reason: impl Into<String>) -> Self {
        ValidationError::InvalidFormat {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Returns the name of the field that failed validation.
    pub fn field(&self) -> &str {
        match self {
            ValidationError::Required { field }
            | ValidationError::TooLong { field, .. }
            | ValidationError::BadChar { field, .. }
            | ValidationError::OutOfRange { field, .. }
            | ValidationError::InvalidFormat { field, .. } => field,
        }
    }

    /// Prefixes the field name with a parent path, e.g. `devices[1].` + `name`.
    pub fn within(self, parent: &str) -> Self {
        let join = |field: String| format!("{parent}.{field}");
        match self {
            ValidationError::Required { field } => ValidationError::Required { field: join(field) },
            ValidationError::TooLong { field, max, len } => ValidationError::TooLong {
                field: join(field),
                max,
                len,
            },
            ValidationError::BadChar { field, ch, index } => ValidationError::BadChar {
                field: join(field),
                ch,
                index,
            },
            ValidationError::OutOfRange {
                field,
                min,
                max,
                value,
            } => ValidationError::OutOfRange {
                field: join(field),
                min,
                max,
                value,
            },
            ValidationError::InvalidFormat { field, reason } => ValidationError::InvalidFormat {
                field: join(field),
                reason,
            },
        }
    }
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with ValidationError.
pub type ValidationResult<T> = Result<T, ValidationError>;
