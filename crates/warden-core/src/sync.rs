//! # Sync Watermarks
//!
//! The backend marks each sync response with a server-side time; the next
//! incremental sync asks for changes since that time.
//!
//! Whether a sync is full or incremental is an explicit [`SyncRequest`]
//! variant rather than a sentinel watermark, so an epoch-zero watermark is a
//! valid incremental request.

use std::fmt;

use chrono::{DateTime, Utc};

/// Server-side sync time with millisecond precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct SyncTime(i64);

impl SyncTime {
    /// The Unix epoch.
    pub const EPOCH: SyncTime = SyncTime(0);

    /// Creates a sync time from milliseconds since the Unix epoch.
    #[inline]
    pub const fn from_millis(millis: i64) -> Self {
        SyncTime(millis)
    }

    /// Milliseconds since the Unix epoch.
    #[inline]
    pub const fn as_millis(&self) -> i64 {
        self.0
    }

    /// Converts to a `DateTime`, if representable.
    pub fn to_datetime(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.0)
    }
}

impl From<DateTime<Utc>> for SyncTime {
    fn from(dt: DateTime<Utc>) -> Self {
        SyncTime(dt.timestamp_millis())
    }
}

impl fmt::Display for SyncTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_datetime() {
            Some(dt) => write!(f, "{}", dt.to_rfc3339()),
            None => write!(f, "{}ms", self.0),
        }
    }
}

/// Kind of sync to request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncRequest {
    /// Return every profile and device.
    Full,
    /// Return what changed since the given watermark.
    Incremental { since: SyncTime },
}

impl SyncRequest {
    /// Whether this is a full sync.
    pub fn is_full(&self) -> bool {
        matches!(self, SyncRequest::Full)
    }

    /// Short name of the sync kind, for logs and metrics.
    pub fn kind(&self) -> SyncKind {
        match self {
            SyncRequest::Full => SyncKind::Full,
            SyncRequest::Incremental { .. } => SyncKind::Incremental,
        }
    }
}

/// Full or incremental, without the watermark.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SyncKind {
    Full,
    Incremental,
}

impl fmt::Display for SyncKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SyncKind::Full => write!(f, "full"),
            SyncKind::Incremental => write!(f, "incremental"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sync_time_roundtrips_datetime() {
        let t = SyncTime::from_millis(1_700_000_000_123);
        let dt = t.to_datetime().unwrap();
        assert_eq!(SyncTime::from(dt), t);
        assert_eq!(SyncTime::EPOCH.to_string(), "1970-01-01T00:00:00+00:00");
    }

    #[test]
    fn test_epoch_watermark_is_incremental() {
        let req = SyncRequest::Incremental {
            since: SyncTime::EPOCH,
        };
        assert!(!req.is_full());
        assert_eq!(req.kind(), SyncKind::Incremental);
        assert_eq!(SyncRequest::Full.kind().to_string(), "full");
    }
}
