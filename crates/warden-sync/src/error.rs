//! # Sync Error Types
//!
//! Error types for backend calls.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Sync Error Categories                             │
//! │                                                                         │
//! │  ┌─────────────────┐  ┌─────────────────┐  ┌─────────────────────────┐ │
//! │  │  Configuration  │  │   Transport     │  │  Server (typed details) │ │
//! │  │                 │  │                 │  │                         │ │
//! │  │  InvalidConfig  │  │  Transport      │  │  AuthenticationFailed   │ │
//! │  │  InvalidUrl     │  │  Timeout        │  │  BadRequest             │ │
//! │  │  ConfigLoad/    │  │  Canceled       │  │  DeviceQuotaExceeded    │ │
//! │  │  SaveFailed     │  │                 │  │  RateLimited, NotFound  │ │
//! │  └─────────────────┘  └─────────────────┘  └─────────────────────────┘ │
//! │                                                                         │
//! │  ┌─────────────────┐  ┌──────────────────────────────────────────────┐ │
//! │  │    Protocol     │  │   Per-record (reported, never returned       │ │
//! │  │  (fatal to call)│  │   from a sync call)                          │ │
//! │  │  MissingSyncTime│  │                                              │ │
//! │  │  BadSyncTime    │  │   Conversion { context, source }             │ │
//! │  │  InvalidResponse│  │                                              │ │
//! │  └─────────────────┘  └──────────────────────────────────────────────┘ │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::time::Duration;

use thiserror::Error;
use warden_core::ValidationError;

use crate::metrics::ErrorClass;

/// Result type alias for sync operations.
pub type SyncResult<T> = Result<T, SyncError>;

/// Errors of the sync clients.
#[derive(Debug, Error)]
pub enum SyncError {
    // =========================================================================
    // Configuration Errors
    // =========================================================================
    /// Invalid configuration.
    #[error("Invalid sync configuration: {0}")]
    InvalidConfig(String),

    /// Invalid backend URL.
    #[error("Invalid backend URL: {0}")]
    InvalidUrl(String),

    /// Failed to load config file.
    #[error("Failed to load config: {0}")]
    ConfigLoadFailed(String),

    /// Failed to save config file.
    #[error("Failed to save config: {0}")]
    ConfigSaveFailed(String),

    // =========================================================================
    // Transport Errors
    // =========================================================================
    /// The call failed without a recognized error detail.
    #[error("Backend call failed: {0}")]
    Transport(#[source] tonic::Status),

    /// The call's deadline passed.
    #[error("Backend call timed out")]
    Timeout,

    /// The call was canceled.
    #[error("Backend call canceled")]
    Canceled,

    // =========================================================================
    // Server Errors
    // =========================================================================
    /// The backend rejected our credentials.
    #[error("Authentication failed: {message}")]
    AuthenticationFailed { message: String },

    /// The backend rejected the request as malformed.
    #[error("Bad request: {message}")]
    BadRequest { message: String },

    /// The profile has reached its device limit.
    #[error("Device quota exceeded: {message}")]
    DeviceQuotaExceeded { message: String },

    /// The backend asks us to slow down.
    #[error("Rate limited, retry in {retry_delay:?}: {message}")]
    RateLimited {
        message: String,
        retry_delay: Duration,
    },

    /// The requested entity does not exist.
    #[error("Not found: {message}")]
    NotFound { message: String },

    // =========================================================================
    // Protocol Errors
    // =========================================================================
    /// The stream ended without the sync-time trailer.
    #[error("Response has no sync_time trailer")]
    MissingSyncTime,

    /// The sync-time trailer is not an epoch-millisecond integer.
    #[error("Bad sync_time trailer {value:?}: {reason}")]
    BadSyncTime { value: String, reason: String },

    /// A unary response lacks required data.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    // =========================================================================
    // Conversion Errors
    // =========================================================================
    /// A record or an element of it failed validation.
    #[error("{context}: {source}")]
    Conversion {
        context: String,
        #[source]
        source: ValidationError,
    },
}

// =============================================================================
// Error Conversions
// =============================================================================

impl From<toml::de::Error> for SyncError {
    fn from(err: toml::de::Error) -> Self {
        SyncError::ConfigLoadFailed(err.to_string())
    }
}

impl From<toml::ser::Error> for SyncError {
    fn from(err: toml::ser::Error) -> Self {
        SyncError::ConfigSaveFailed(err.to_string())
    }
}

impl From<url::ParseError> for SyncError {
    fn from(err: url::ParseError) -> Self {
        SyncError::InvalidUrl(err.to_string())
    }
}

impl From<tokio::time::error::Elapsed> for SyncError {
    fn from(_: tokio::time::error::Elapsed) -> Self {
        SyncError::Timeout
    }
}

// =============================================================================
// Error Categorization
// =============================================================================

impl SyncError {
    pub(crate) fn conversion(context: impl Into<String>, source: ValidationError) -> Self {
        SyncError::Conversion {
            context: context.into(),
            source,
        }
    }

    /// Returns true if the caller's scheduler may retry the call.
    ///
    /// ## Retryable Errors
    /// - Transport failures and timeouts
    /// - Rate limiting (after `retry_delay`)
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            SyncError::Transport(_) | SyncError::Timeout | SyncError::RateLimited { .. }
        )
    }

    /// Returns true if this error indicates a configuration problem.
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            SyncError::InvalidConfig(_)
                | SyncError::InvalidUrl(_)
                | SyncError::ConfigLoadFailed(_)
                | SyncError::ConfigSaveFailed(_)
        )
    }

    /// Returns true if the backend broke the protocol.
    pub fn is_protocol_error(&self) -> bool {
        matches!(
            self,
            SyncError::MissingSyncTime
                | SyncError::BadSyncTime { .. }
                | SyncError::InvalidResponse(_)
        )
    }

    /// The class this error is counted under.
    pub fn metrics_class(&self) -> ErrorClass {
        match self {
            SyncError::Timeout => ErrorClass::Timeout,
            SyncError::AuthenticationFailed { .. } => ErrorClass::Auth,
            SyncError::BadRequest { .. } => ErrorClass::BadRequest,
            SyncError::DeviceQuotaExceeded { .. } => ErrorClass::Quota,
            SyncError::RateLimited { .. } => ErrorClass::RateLimited,
            SyncError::NotFound { .. } => ErrorClass::NotFound,
            _ => ErrorClass::Other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable_errors() {
        assert!(SyncError::Timeout.is_retryable());
        assert!(SyncError::Transport(tonic::Status::unavailable("down")).is_retryable());
        assert!(SyncError::RateLimited {
            message: "slow down".into(),
            retry_delay: Duration::from_secs(1),
        }
        .is_retryable());

        assert!(!SyncError::MissingSyncTime.is_retryable());
        assert!(!SyncError::AuthenticationFailed {
            message: "bad key".into()
        }
        .is_retryable());
    }

    #[test]
    fn test_categories() {
        assert!(SyncError::MissingSyncTime.is_protocol_error());
        assert!(SyncError::InvalidUrl("x".into()).is_config_error());
        assert_eq!(SyncError::Timeout.metrics_class(), ErrorClass::Timeout);
        assert_eq!(SyncError::Canceled.metrics_class(), ErrorClass::Other);
    }

    #[test]
    fn test_conversion_display() {
        let err = SyncError::conversion("profile prof1", ValidationError::required("device_id"));
        assert!(err.to_string().starts_with("profile prof1: "));
        assert!(err.to_string().contains("device_id"));
    }
}
