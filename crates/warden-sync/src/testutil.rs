//! In-memory fakes for the sync client tests.

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use tonic::metadata::{Ascii, MetadataMap, MetadataValue};
use tonic::Status;
use warden_core::SyncKind;

use crate::backend::{DnsBackend, RecordStream};
use crate::errcoll::ErrorCollector;
use crate::error::SyncError;
use crate::metrics::{BackendMetrics, ErrorClass};
use crate::proto::{
    remote_kv_get_response, CreateDeviceRequest, CreateDeviceResponse,
    CustomDomainCertificateRequest, CustomDomainCertificateResponse, DeviceBillingStat,
    DeviceSettings, DnsProfile, DnsProfilesRequest, GlobalAccessSettingsResponse,
    RateLimitSettingsResponse, RemoteKvEmpty, RemoteKvGetRequest, RemoteKvGetResponse,
    RemoteKvSetRequest, SessionTicketResponse, SYNC_TIME_TRAILER,
};
use crate::stats::SyncStatsSummary;

// =============================================================================
// Wire Builders
// =============================================================================

pub(crate) fn wire_device(id: &str, name: &str) -> DeviceSettings {
    DeviceSettings {
        id: id.to_string(),
        name: name.to_string(),
        filtering_enabled: true,
        ..DeviceSettings::default()
    }
}

pub(crate) fn wire_profile(id: &str, devices: Vec<DeviceSettings>) -> DnsProfile {
    DnsProfile {
        dns_id: id.to_string(),
        account_id: "acc-1".to_string(),
        filtering_enabled: true,
        devices,
        ..DnsProfile::default()
    }
}

pub(crate) fn sync_time_trailers(value: &str) -> MetadataMap {
    let mut md = MetadataMap::new();
    if let Ok(v) = value.parse::<MetadataValue<Ascii>>() {
        md.insert(SYNC_TIME_TRAILER, v);
    }
    md
}

// =============================================================================
// Fake Stream
// =============================================================================

/// A scripted profile stream.
#[derive(Default)]
pub(crate) struct FakeStream {
    pub(crate) records: VecDeque<Result<DnsProfile, Status>>,
    pub(crate) trailers: Option<MetadataMap>,
    /// Never yields a record; used for deadline tests.
    pub(crate) hang: bool,
}

impl FakeStream {
    pub(crate) fn new(records: Vec<DnsProfile>, sync_time_ms: i64) -> Self {
        Self {
            records: records.into_iter().map(Ok).collect(),
            trailers: Some(sync_time_trailers(&sync_time_ms.to_string())),
            hang: false,
        }
    }

    pub(crate) fn without_trailer(records: Vec<DnsProfile>) -> Self {
        Self {
            records: records.into_iter().map(Ok).collect(),
            trailers: None,
            hang: false,
        }
    }

    pub(crate) fn hanging() -> Self {
        Self {
            hang: true,
            ..Self::default()
        }
    }
}

#[async_trait]
impl RecordStream<DnsProfile> for FakeStream {
    async fn message(&mut self) -> Result<Option<DnsProfile>, Status> {
        if self.hang {
            std::future::pending::<()>().await;
        }

        self.records.pop_front().transpose()
    }

    async fn trailers(&mut self) -> Result<Option<MetadataMap>, Status> {
        Ok(self.trailers.take())
    }
}

// =============================================================================
// Fake Backend
// =============================================================================

/// Backend answering from canned responses. Unset responses fail with
/// `Unimplemented`.
#[derive(Default)]
pub(crate) struct FakeBackend {
    pub(crate) streams: Mutex<VecDeque<FakeStream>>,
    pub(crate) profile_requests: Mutex<Vec<DnsProfilesRequest>>,

    pub(crate) create_device: Mutex<Option<Result<CreateDeviceResponse, Status>>>,
    pub(crate) create_requests: Mutex<Vec<CreateDeviceRequest>>,

    pub(crate) billstat_error: Mutex<Option<Status>>,
    pub(crate) billstat_uploads: Mutex<Vec<Vec<DeviceBillingStat>>>,

    pub(crate) rate_limit: Mutex<Option<Result<RateLimitSettingsResponse, Status>>>,
    pub(crate) global_access: Mutex<Option<Result<GlobalAccessSettingsResponse, Status>>>,
    pub(crate) tickets: Mutex<Option<Result<SessionTicketResponse, Status>>>,

    pub(crate) certificates: Mutex<HashMap<String, CustomDomainCertificateResponse>>,

    pub(crate) kv: Mutex<HashMap<String, Vec<u8>>>,
    pub(crate) kv_sets: Mutex<Vec<RemoteKvSetRequest>>,
}

impl FakeBackend {
    pub(crate) fn with_streams(streams: Vec<FakeStream>) -> Self {
        Self {
            streams: Mutex::new(streams.into()),
            ..Self::default()
        }
    }

    fn canned<T>(slot: &Mutex<Option<Result<T, Status>>>) -> Result<T, Status> {
        slot.lock()
            .unwrap()
            .take()
            .unwrap_or_else(|| Err(Status::unimplemented("no canned response")))
    }
}

#[async_trait]
impl DnsBackend for FakeBackend {
    async fn get_dns_profiles(
        &self,
        req: DnsProfilesRequest,
    ) -> Result<Box<dyn RecordStream<DnsProfile>>, Status> {
        self.profile_requests.lock().unwrap().push(req);
        let stream = self
            .streams
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| Status::unimplemented("no canned stream"))?;
        Ok(Box::new(stream))
    }

    async fn create_device_by_human_id(
        &self,
        req: CreateDeviceRequest,
    ) -> Result<CreateDeviceResponse, Status> {
        self.create_requests.lock().unwrap().push(req);
        Self::canned(&self.create_device)
    }

    async fn save_devices_billing_stat(&self, records: Vec<DeviceBillingStat>) -> Result<(), Status> {
        if let Some(status) = self.billstat_error.lock().unwrap().take() {
            return Err(status);
        }
        self.billstat_uploads.lock().unwrap().push(records);
        Ok(())
    }

    async fn get_rate_limit_settings(&self) -> Result<RateLimitSettingsResponse, Status> {
        Self::canned(&self.rate_limit)
    }

    async fn get_global_access_settings(&self) -> Result<GlobalAccessSettingsResponse, Status> {
        Self::canned(&self.global_access)
    }

    async fn get_session_tickets(&self) -> Result<SessionTicketResponse, Status> {
        Self::canned(&self.tickets)
    }

    async fn get_custom_domain_certificate(
        &self,
        req: CustomDomainCertificateRequest,
    ) -> Result<CustomDomainCertificateResponse, Status> {
        self.certificates
            .lock()
            .unwrap()
            .get(&req.cert_name)
            .cloned()
            .ok_or_else(|| Status::not_found(req.cert_name))
    }

    async fn remote_kv_get(&self, req: RemoteKvGetRequest) -> Result<RemoteKvGetResponse, Status> {
        let value = match self.kv.lock().unwrap().get(&req.key) {
            Some(data) => remote_kv_get_response::Value::Data(data.clone()),
            None => remote_kv_get_response::Value::Empty(RemoteKvEmpty {}),
        };
        Ok(RemoteKvGetResponse { value: Some(value) })
    }

    async fn remote_kv_set(&self, req: RemoteKvSetRequest) -> Result<(), Status> {
        self.kv.lock().unwrap().insert(req.key.clone(), req.data.clone());
        self.kv_sets.lock().unwrap().push(req);
        Ok(())
    }
}

// =============================================================================
// Recording Collaborators
// =============================================================================

#[derive(Default)]
pub(crate) struct RecordingMetrics {
    errors: Mutex<Vec<ErrorClass>>,
    syncs: Mutex<Vec<(SyncKind, SyncStatsSummary)>>,
    invalid_devices: Mutex<Option<usize>>,
    tickets: Mutex<Vec<usize>>,
    billstat: Mutex<Vec<usize>>,
}

impl RecordingMetrics {
    pub(crate) fn errors(&self) -> Vec<ErrorClass> {
        self.errors.lock().unwrap().clone()
    }

    pub(crate) fn syncs(&self) -> Vec<(SyncKind, SyncStatsSummary)> {
        self.syncs.lock().unwrap().clone()
    }

    pub(crate) fn invalid_devices(&self) -> Option<usize> {
        *self.invalid_devices.lock().unwrap()
    }

    pub(crate) fn tickets(&self) -> Vec<usize> {
        self.tickets.lock().unwrap().clone()
    }

    pub(crate) fn billstat(&self) -> Vec<usize> {
        self.billstat.lock().unwrap().clone()
    }
}

impl BackendMetrics for RecordingMetrics {
    fn increment_grpc_error(&self, class: ErrorClass) {
        self.errors.lock().unwrap().push(class);
    }

    fn observe_sync(&self, kind: SyncKind, stats: &SyncStatsSummary) {
        self.syncs.lock().unwrap().push((kind, *stats));
    }

    fn set_invalid_devices(&self, count: usize) {
        *self.invalid_devices.lock().unwrap() = Some(count);
    }

    fn observe_session_tickets(&self, count: usize) {
        self.tickets.lock().unwrap().push(count);
    }

    fn observe_billstat_upload(&self, records: usize, _elapsed: Duration) {
        self.billstat.lock().unwrap().push(records);
    }
}

#[derive(Default)]
pub(crate) struct RecordingErrorCollector {
    errors: Mutex<Vec<String>>,
}

impl RecordingErrorCollector {
    /// Display strings of the collected errors.
    pub(crate) fn messages(&self) -> Vec<String> {
        self.errors.lock().unwrap().clone()
    }

    pub(crate) fn len(&self) -> usize {
        self.errors.lock().unwrap().len()
    }
}

impl ErrorCollector for RecordingErrorCollector {
    fn collect(&self, err: SyncError) {
        self.errors.lock().unwrap().push(err.to_string());
    }
}
