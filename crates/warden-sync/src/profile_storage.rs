//! # Profile Storage
//!
//! Pulls profiles and devices from the backend's `GetDNSProfiles` stream.
//!
//! ## Sync Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  sync(SyncRequest)                                                      │
//! │     │                                                                   │
//! │     ├── Full              ──► request without sync_time                 │
//! │     ├── Incremental{since}──► request with sync_time = since            │
//! │     ▼                                                                   │
//! │  for each record (in order, one at a time):                             │
//! │     convert ──► ok:   profile, devices, DeviceUpdate appended           │
//! │             └─► err:  reported to the ErrorCollector, record skipped    │
//! │     a repeated profile id replaces the earlier record                   │
//! │     ▼                                                                   │
//! │  end of stream ──► trailer "sync_time" (epoch ms)                       │
//! │     missing / malformed ──► whole call fails, nothing returned          │
//! │     ▼                                                                   │
//! │  stats logged and sent to BackendMetrics                                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Cancellation
//! The whole call, stream included, runs under the sync timeout or the
//! deadline given to [`ProfileStorage::sync_until`]. A caller-side cancel
//! signal goes through [`ProfileStorage::sync_until_canceled`] and yields
//! [`SyncError::Canceled`]. Dropping the returned future aborts the stream.

use std::collections::HashMap;
use std::future::Future;
use std::time::{Duration, Instant};

use tonic::metadata::MetadataMap;
use tracing::{debug, info, warn};
use warden_core::{
    BindSet, Device, DeviceType, DeviceUpdate, HumanIdLower, Profile, ProfileId, SyncKind,
    SyncRequest, SyncTime,
};

use crate::client::BackendClient;
use crate::convert::{
    device_from_wire, device_type_to_wire, profile_from_wire, Conversion, ConvertedProfile,
};
use crate::error::{SyncError, SyncResult};
use crate::proto::{CreateDeviceRequest, DnsProfile, DnsProfilesRequest, SYNC_TIME_TRAILER};
use crate::stats::{log_summary, SyncStats};

/// Result of one profile sync.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncResponse {
    /// Converted profiles, deleted ones included.
    pub profiles: Vec<Profile>,
    /// Devices carried by the response: full lists and upserts.
    pub devices: Vec<Device>,
    /// What each returned profile's device set should become.
    pub device_updates: HashMap<ProfileId, DeviceUpdate>,
    /// Watermark to send with the next incremental sync.
    pub sync_time: SyncTime,
}

/// Converted records of one call, in stream order. A later record for the
/// same profile replaces the earlier one, devices included.
#[derive(Debug, Default)]
struct Collected {
    index: HashMap<ProfileId, usize>,
    records: Vec<ConvertedProfile>,
}

impl Collected {
    fn push(&mut self, c: ConvertedProfile) {
        match self.index.get(&c.profile.id) {
            Some(&i) => {
                warn!(profile_id = %c.profile.id, "Duplicate profile in sync stream, keeping the last");
                self.records[i] = c;
            }
            None => {
                self.index.insert(c.profile.id.clone(), self.records.len());
                self.records.push(c);
            }
        }
    }

    fn into_response(self) -> SyncResponse {
        let mut resp = SyncResponse::default();
        for c in self.records {
            resp.device_updates.insert(c.profile.id.clone(), c.device_update);
            resp.devices.extend(c.devices);
            resp.profiles.push(c.profile);
        }
        resp
    }
}

/// Client of the profile sync stream.
#[derive(Debug, Clone)]
pub struct ProfileStorage {
    client: BackendClient,
    bind_set: BindSet,
    sync_timeout: Duration,
}

impl ProfileStorage {
    /// Creates a profile storage. Dedicated device IPs must lie in `bind_set`.
    pub fn new(client: BackendClient, bind_set: BindSet, sync_timeout: Duration) -> Self {
        Self {
            client,
            bind_set,
            sync_timeout,
        }
    }

    /// Runs one sync under the configured sync timeout.
    pub async fn sync(&self, req: SyncRequest) -> SyncResult<SyncResponse> {
        self.sync_until(req, tokio::time::Instant::now() + self.sync_timeout)
            .await
    }

    /// Runs one sync that must finish before `deadline`.
    pub async fn sync_until(
        &self,
        req: SyncRequest,
        deadline: tokio::time::Instant,
    ) -> SyncResult<SyncResponse> {
        match tokio::time::timeout_at(deadline, self.run(req)).await {
            Ok(res) => res,
            Err(elapsed) => {
                let err = SyncError::from(elapsed);
                self.client.translator().count(&err);
                Err(err)
            }
        }
    }

    /// Runs one sync that must finish before `deadline` and stops with
    /// [`SyncError::Canceled`] as soon as `cancel` completes.
    pub async fn sync_until_canceled<C>(
        &self,
        req: SyncRequest,
        deadline: tokio::time::Instant,
        cancel: C,
    ) -> SyncResult<SyncResponse>
    where
        C: Future<Output = ()>,
    {
        let kind = req.kind();
        tokio::select! {
            res = self.sync_until(req, deadline) => res,
            () = cancel => {
                info!(kind = %kind, "Profile sync canceled");
                Err(SyncError::Canceled)
            }
        }
    }

    async fn run(&self, req: SyncRequest) -> SyncResult<SyncResponse> {
        let kind = req.kind();
        let wire = DnsProfilesRequest {
            sync_time: match req {
                SyncRequest::Full => None,
                SyncRequest::Incremental { since } => Some(timestamp(since)),
            },
        };

        debug!(kind = %kind, "Starting profile sync");

        let mut stats = SyncStats::new();
        let mut stream = self
            .client
            .backend()
            .get_dns_profiles(wire)
            .await
            .map_err(|s| self.client.translator().translate(s))?;

        let mut collected = Collected::default();
        loop {
            stats.begin_receive();
            let record = stream
                .message()
                .await
                .map_err(|s| self.client.translator().translate(s))?;
            let Some(record) = record else {
                break;
            };
            stats.end_receive();

            let started = Instant::now();
            self.add_record(record, kind, &mut collected, &mut stats);
            stats.record_decode(started.elapsed());
        }

        let trailers = stream
            .trailers()
            .await
            .map_err(|s| self.client.translator().translate(s))?;
        let mut resp = collected.into_response();
        resp.sync_time = sync_time_from_trailers(trailers.as_ref())?;

        let summary = stats.summary();
        log_summary(kind, &summary);
        self.client.metrics().observe_sync(kind, &summary);
        self.client.metrics().set_invalid_devices(summary.invalid_devices);

        Ok(resp)
    }

    fn add_record(
        &self,
        record: DnsProfile,
        kind: SyncKind,
        collected: &mut Collected,
        stats: &mut SyncStats,
    ) {
        let context = format!("profile {}", record.dns_id);
        let mut cx = Conversion::new(&self.bind_set);
        let converted = profile_from_wire(record, kind, &mut cx);

        for err in cx.take_errors() {
            self.client.report(SyncError::conversion(&context, err));
        }

        match converted {
            Ok(c) => {
                stats.record_invalid(0, cx.invalid_devices());
                collected.push(c);
            }
            Err(err) => {
                stats.record_invalid(1, cx.invalid_devices());
                self.client.report(SyncError::conversion(context, err));
            }
        }
    }

    /// Asks the backend to create a device for an unknown human id and
    /// returns it, validated like a synced device.
    pub async fn create_auto_device(
        &self,
        profile_id: &ProfileId,
        human_id: &str,
        device_type: DeviceType,
    ) -> SyncResult<Device> {
        let human_id = HumanIdLower::new(human_id)
            .map_err(|e| SyncError::conversion(format!("auto device for profile {profile_id}"), e))?;

        let req = CreateDeviceRequest {
            dns_id: profile_id.to_string(),
            human_id: human_id.to_string(),
            device_type: device_type_to_wire(device_type) as i32,
        };
        let resp = self
            .client
            .call(self.client.backend().create_device_by_human_id(req))
            .await?;

        let device = resp
            .device
            .ok_or_else(|| SyncError::InvalidResponse("create device: no device".to_string()))?;
        let device = device_from_wire(device, &self.bind_set)
            .map_err(|e| SyncError::conversion(format!("auto device for profile {profile_id}"), e))?;

        info!(
            profile_id = %profile_id,
            device_id = %device.id,
            device_type = device_type.name(),
            "Auto device created"
        );

        Ok(device)
    }
}

/// Reads the new sync time from the stream trailers.
pub fn sync_time_from_trailers(trailers: Option<&MetadataMap>) -> SyncResult<SyncTime> {
    let value = trailers
        .and_then(|md| md.get(SYNC_TIME_TRAILER))
        .ok_or(SyncError::MissingSyncTime)?;

    let text = value.to_str().map_err(|e| SyncError::BadSyncTime {
        value: format!("{value:?}"),
        reason: e.to_string(),
    })?;
    let millis = text.parse::<i64>().map_err(|e| SyncError::BadSyncTime {
        value: text.to_string(),
        reason: e.to_string(),
    })?;
    if millis < 0 {
        return Err(SyncError::BadSyncTime {
            value: text.to_string(),
            reason: "negative".to_string(),
        });
    }

    Ok(SyncTime::from_millis(millis))
}

fn timestamp(t: SyncTime) -> prost_types::Timestamp {
    let millis = t.as_millis();
    prost_types::Timestamp {
        seconds: millis.div_euclid(1000),
        // Always below 1e9, so it fits.
        nanos: (millis.rem_euclid(1000) * 1_000_000) as i32,
    }
}
