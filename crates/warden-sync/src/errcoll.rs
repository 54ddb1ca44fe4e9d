//! Error collection.
//!
//! Per-record failures never fail a sync call; they are handed to an
//! [`ErrorCollector`] instead, which forwards them to whatever error
//! reporting the embedding service uses.

use tracing::warn;

use crate::error::SyncError;

/// Receiver of non-fatal errors.
pub trait ErrorCollector: Send + Sync {
    fn collect(&self, err: SyncError);
}

/// Collector that discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmptyErrorCollector;

impl ErrorCollector for EmptyErrorCollector {
    fn collect(&self, _err: SyncError) {}
}

/// Collector that logs each error at `warn`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingErrorCollector;

impl ErrorCollector for LoggingErrorCollector {
    fn collect(&self, err: SyncError) {
        warn!(error = %err, "Sync error collected");
    }
}
