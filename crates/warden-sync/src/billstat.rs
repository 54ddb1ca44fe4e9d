//! # Billing Statistics Upload
//!
//! Sends per-device usage counters to the backend as one client stream.
//!
//! ```text
//!  BTreeMap<DeviceId, Option<BillStatRecord>>
//!     │  None entries ──► ErrorCollector (skipped)
//!     ▼
//!  stream DeviceBillingStat ──► SaveDevicesBillingStat ──► ()
//! ```

use std::collections::BTreeMap;
use std::time::Instant;

use chrono::{DateTime, Utc};
use tracing::{debug, info};
use warden_core::{Asn, DeviceId, ValidationError};

use crate::client::BackendClient;
use crate::error::{SyncError, SyncResult};
use crate::proto::DeviceBillingStat;

/// Protocol a device last used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum Protocol {
    Dns = 1,
    DnsOverHttps = 2,
    DnsOverTls = 3,
    DnsOverQuic = 4,
    DnsCrypt = 5,
}

/// Usage counters of one device since the previous upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BillStatRecord {
    pub last_activity: DateTime<Utc>,
    /// ISO 3166-1 alpha-2 code of the last client, if known.
    pub country: Option<String>,
    pub asn: Option<Asn>,
    pub queries: u32,
    pub protocol: Protocol,
}

/// Uploader of billing statistics.
#[derive(Debug, Clone)]
pub struct BillStatUploader {
    client: BackendClient,
}

impl BillStatUploader {
    pub fn new(client: BackendClient) -> Self {
        Self { client }
    }

    /// Uploads the records. Missing records are reported and skipped; an
    /// empty upload makes no call.
    pub async fn upload(&self, records: BTreeMap<DeviceId, Option<BillStatRecord>>) -> SyncResult<()> {
        let mut wire = Vec::with_capacity(records.len());
        for (device_id, record) in records {
            match record {
                Some(r) => wire.push(to_wire(&device_id, r)),
                None => self.client.report(SyncError::conversion(
                    format!("billstat for device {device_id}"),
                    ValidationError::required("record"),
                )),
            }
        }

        if wire.is_empty() {
            debug!("No billing statistics to upload");
            return Ok(());
        }

        let count = wire.len();
        let started = Instant::now();
        self.client
            .call(self.client.backend().save_devices_billing_stat(wire))
            .await?;

        let elapsed = started.elapsed();
        self.client.metrics().observe_billstat_upload(count, elapsed);
        info!(records = count, elapsed = ?elapsed, "Billing statistics uploaded");

        Ok(())
    }
}

fn to_wire(device_id: &DeviceId, r: BillStatRecord) -> DeviceBillingStat {
    DeviceBillingStat {
        last_activity_time: Some(prost_types::Timestamp {
            seconds: r.last_activity.timestamp(),
            nanos: r.last_activity.timestamp_subsec_nanos() as i32,
        }),
        device_id: device_id.to_string(),
        client_country: r.country.unwrap_or_default(),
        proto: r.protocol as u32,
        asn: r.asn.map_or(0, |a| a.get()),
        queries: r.queries,
    }
}
