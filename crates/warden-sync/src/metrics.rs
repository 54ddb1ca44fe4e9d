//! # Backend Metrics
//!
//! The narrow interface the sync clients report through. The exporter
//! behind it belongs to the embedding service; [`EmptyBackendMetrics`] is
//! used when metrics are disabled.

use std::fmt;
use std::time::Duration;

use warden_core::SyncKind;

use crate::stats::SyncStatsSummary;

/// Classification of a failed backend call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorClass {
    Timeout,
    Auth,
    BadRequest,
    Quota,
    RateLimited,
    NotFound,
    Other,
}

impl ErrorClass {
    /// Label value for the error counter.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorClass::Timeout => "timeout",
            ErrorClass::Auth => "auth",
            ErrorClass::BadRequest => "bad_request",
            ErrorClass::Quota => "quota",
            ErrorClass::RateLimited => "rate_limited",
            ErrorClass::NotFound => "not_found",
            ErrorClass::Other => "other",
        }
    }
}

impl fmt::Display for ErrorClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Metrics sink of the sync clients.
pub trait BackendMetrics: Send + Sync {
    /// Counts one failed backend call.
    fn increment_grpc_error(&self, class: ErrorClass);

    /// Records the statistics of a finished profile sync.
    fn observe_sync(&self, kind: SyncKind, stats: &SyncStatsSummary);

    /// Number of devices dropped as invalid by the last sync.
    fn set_invalid_devices(&self, count: usize);

    /// Number of valid session tickets received by the last fetch.
    fn observe_session_tickets(&self, count: usize);

    /// Duration and size of a billing-statistics upload.
    fn observe_billstat_upload(&self, records: usize, elapsed: Duration);
}

/// Metrics sink that drops everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmptyBackendMetrics;

impl BackendMetrics for EmptyBackendMetrics {
    fn increment_grpc_error(&self, _class: ErrorClass) {}

    fn observe_sync(&self, _kind: SyncKind, _stats: &SyncStatsSummary) {}

    fn set_invalid_devices(&self, _count: usize) {}

    fn observe_session_tickets(&self, _count: usize) {}

    fn observe_billstat_upload(&self, _records: usize, _elapsed: Duration) {}
}
