//! # Sync Statistics
//!
//! Timing of one profile sync. The accumulator lives on the stack of the
//! call that owns it and is summarized once the stream is drained.
//!
//! ```text
//!  call start          msg 1          msg 2          msg N      end
//!      │─── first_receive ──│── recv ──│── recv ── … ─│
//!                           │decode│    │decode│        │decode│
//! ```
//!
//! The first receive includes call setup, so it is kept apart from the
//! average of the others.

use std::time::{Duration, Instant};

use tracing::{debug, info};
use warden_core::SyncKind;

/// Finished statistics of one sync.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SyncStatsSummary {
    /// Records received.
    pub records: usize,
    /// Records dropped because they failed conversion.
    pub invalid_records: usize,
    /// Devices dropped because they failed conversion.
    pub invalid_devices: usize,
    /// From call start to the first record.
    pub first_receive: Duration,
    /// Average receive time of the records after the first.
    pub avg_receive: Duration,
    /// Average conversion time per record.
    pub avg_decode: Duration,
    /// Whole call, including reading the trailer.
    pub total: Duration,
}

#[derive(Debug)]
pub(crate) struct SyncStats {
    started: Instant,
    mark: Instant,
    first_receive: Option<Duration>,
    receive_total: Duration,
    receive_count: usize,
    decode_total: Duration,
    decode_count: usize,
    invalid_records: usize,
    invalid_devices: usize,
}

impl SyncStats {
    pub(crate) fn new() -> Self {
        let now = Instant::now();
        Self {
            started: now,
            mark: now,
            first_receive: None,
            receive_total: Duration::ZERO,
            receive_count: 0,
            decode_total: Duration::ZERO,
            decode_count: 0,
            invalid_records: 0,
            invalid_devices: 0,
        }
    }

    /// Marks the start of a receive. Before the first record the mark stays
    /// at call start.
    pub(crate) fn begin_receive(&mut self) {
        if self.first_receive.is_some() {
            self.mark = Instant::now();
        }
    }

    /// Records a received message.
    pub(crate) fn end_receive(&mut self) {
        let elapsed = self.mark.elapsed();
        match self.first_receive {
            None => self.first_receive = Some(elapsed),
            Some(_) => {
                self.receive_total += elapsed;
                self.receive_count += 1;
            }
        }
    }

    pub(crate) fn record_decode(&mut self, elapsed: Duration) {
        self.decode_total += elapsed;
        self.decode_count += 1;
    }

    pub(crate) fn record_invalid(&mut self, records: usize, devices: usize) {
        self.invalid_records += records;
        self.invalid_devices += devices;
    }

    pub(crate) fn summary(&self) -> SyncStatsSummary {
        let records = self.receive_count + usize::from(self.first_receive.is_some());

        SyncStatsSummary {
            records,
            invalid_records: self.invalid_records,
            invalid_devices: self.invalid_devices,
            first_receive: self.first_receive.unwrap_or_default(),
            avg_receive: average(self.receive_total, self.receive_count),
            avg_decode: average(self.decode_total, self.decode_count),
            total: self.started.elapsed(),
        }
    }
}

fn average(total: Duration, count: usize) -> Duration {
    u32::try_from(count)
        .ok()
        .and_then(|n| total.checked_div(n))
        .unwrap_or_default()
}

/// Logs a finished sync: full syncs at `info`, incremental ones at `debug`.
pub(crate) fn log_summary(kind: SyncKind, s: &SyncStatsSummary) {
    match kind {
        SyncKind::Full => info!(
            kind = %kind,
            records = s.records,
            invalid_records = s.invalid_records,
            invalid_devices = s.invalid_devices,
            first_receive = ?s.first_receive,
            avg_receive = ?s.avg_receive,
            avg_decode = ?s.avg_decode,
            total = ?s.total,
            "Profile sync finished"
        ),
        SyncKind::Incremental => debug!(
            kind = %kind,
            records = s.records,
            invalid_records = s.invalid_records,
            invalid_devices = s.invalid_devices,
            first_receive = ?s.first_receive,
            avg_receive = ?s.avg_receive,
            avg_decode = ?s.avg_decode,
            total = ?s.total,
            "Profile sync finished"
        ),
    }
}
