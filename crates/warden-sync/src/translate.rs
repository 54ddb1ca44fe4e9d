//! # Error Translation
//!
//! Turns a failed backend call into a [`SyncError`] and counts it.
//!
//! ## Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  tonic::Status                                                          │
//! │     │                                                                   │
//! │     ├── code DeadlineExceeded ──────────────────────► Timeout           │
//! │     ├── code Cancelled ─────────────────────────────► Canceled          │
//! │     ├── details: google.rpc.Status                                      │
//! │     │     └── first known Any in details ───────────► typed SyncError   │
//! │     │         (AuthenticationFailed, BadRequest, DeviceQuotaExceeded,   │
//! │     │          RateLimited{retry_delay}, NotFound)                      │
//! │     └── anything else ──────────────────────────────► Transport(status) │
//! │                                                                         │
//! │  every result ──► metrics.increment_grpc_error(class)                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::Arc;
use std::time::Duration;

use prost::Message;
use tonic::{Code, Status};

use crate::error::SyncError;
use crate::metrics::{BackendMetrics, ErrorClass};
use crate::proto::{
    AuthenticationFailedError, BadRequestError, DeviceQuotaExceededError, NotFoundError,
    RateLimitedError, RpcStatus, PACKAGE,
};

/// Translates and counts backend errors.
#[derive(Clone)]
pub struct ErrorTranslator {
    metrics: Arc<dyn BackendMetrics>,
}

impl ErrorTranslator {
    pub fn new(metrics: Arc<dyn BackendMetrics>) -> Self {
        Self { metrics }
    }

    /// Translates a failed call and counts it under its class.
    pub fn translate(&self, status: Status) -> SyncError {
        let (err, class) = translate_status(status);
        self.metrics.increment_grpc_error(class);
        err
    }

    /// Counts an error that did not come from a status, such as a local
    /// deadline.
    pub fn count(&self, err: &SyncError) {
        self.metrics.increment_grpc_error(err.metrics_class());
    }
}

/// Translates a failed call into an application error and its class.
pub fn translate_status(status: Status) -> (SyncError, ErrorClass) {
    let err = match status.code() {
        Code::DeadlineExceeded => SyncError::Timeout,
        Code::Cancelled => SyncError::Canceled,
        _ => from_details(&status).unwrap_or(SyncError::Transport(status)),
    };

    let class = err.metrics_class();
    (err, class)
}

fn from_details(status: &Status) -> Option<SyncError> {
    if status.details().is_empty() {
        return None;
    }

    let rpc = RpcStatus::decode(status.details()).ok()?;
    rpc.details
        .iter()
        .find_map(|any| from_any(&any.type_url, &any.value, status.message()))
}

fn from_any(type_url: &str, value: &[u8], fallback: &str) -> Option<SyncError> {
    let name = type_url.rsplit('/').next()?;
    let name = name.strip_prefix(PACKAGE)?.strip_prefix('.')?;

    let message = |m: String| if m.is_empty() { fallback.to_string() } else { m };

    let err = match name {
        "AuthenticationFailedError" => SyncError::AuthenticationFailed {
            message: message(AuthenticationFailedError::decode(value).ok()?.message),
        },
        "BadRequestError" => SyncError::BadRequest {
            message: message(BadRequestError::decode(value).ok()?.message),
        },
        "DeviceQuotaExceededError" => SyncError::DeviceQuotaExceeded {
            message: message(DeviceQuotaExceededError::decode(value).ok()?.message),
        },
        "RateLimitedError" => {
            let e = RateLimitedError::decode(value).ok()?;
            SyncError::RateLimited {
                message: message(e.message),
                retry_delay: e
                    .retry_delay
                    .and_then(|d| Duration::try_from(d).ok())
                    .unwrap_or_default(),
            }
        }
        "NotFoundError" => SyncError::NotFound {
            message: message(NotFoundError::decode(value).ok()?.message),
        },
        _ => return None,
    };

    Some(err)
}
