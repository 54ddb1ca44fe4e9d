//! # Backend Seam
//!
//! Every call the sync clients make to the business-logic backend goes
//! through [`DnsBackend`]. Production code uses [`GrpcBackend`]; tests plug
//! in an in-memory fake.
//!
//! ## Call Shapes
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  get_dns_profiles            request ──► RecordStream<DnsProfile>       │
//! │                                          message()… then trailers()     │
//! │  save_devices_billing_stat   Vec<record> ──► client stream ──► ()       │
//! │  everything else             request ──► response (unary)               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::time::Duration;

use async_trait::async_trait;
use tonic::metadata::MetadataMap;
use tonic::service::interceptor::InterceptedService;
use tonic::transport::{Channel, ClientTlsConfig, Endpoint};
use tonic::{Request, Status};
use tracing::info;

use crate::auth::AuthInterceptor;
use crate::config::BackendSettings;
use crate::error::{SyncError, SyncResult};
use crate::proto::custom_domain_service_client::CustomDomainServiceClient;
use crate::proto::dns_service_client::DnsServiceClient;
use crate::proto::remote_kv_service_client::RemoteKvServiceClient;
use crate::proto::session_ticket_service_client::SessionTicketServiceClient;
use crate::proto::{
    CreateDeviceRequest, CreateDeviceResponse, CustomDomainCertificateRequest,
    CustomDomainCertificateResponse, DeviceBillingStat, DnsProfile, DnsProfilesRequest,
    GlobalAccessSettingsRequest, GlobalAccessSettingsResponse, RateLimitSettingsRequest,
    RateLimitSettingsResponse, RemoteKvGetRequest, RemoteKvGetResponse, RemoteKvSetRequest,
    SessionTicketRequest, SessionTicketResponse,
};

// =============================================================================
// Traits
// =============================================================================

/// A server stream of records followed by trailing metadata.
#[async_trait]
pub trait RecordStream<T>: Send {
    /// The next record, or `None` at end of stream.
    async fn message(&mut self) -> Result<Option<T>, Status>;

    /// Trailing metadata. Only meaningful after `message` returned `None`.
    async fn trailers(&mut self) -> Result<Option<MetadataMap>, Status>;
}

#[async_trait]
impl<T: Send + 'static> RecordStream<T> for tonic::Streaming<T> {
    async fn message(&mut self) -> Result<Option<T>, Status> {
        tonic::Streaming::message(self).await
    }

    async fn trailers(&mut self) -> Result<Option<MetadataMap>, Status> {
        tonic::Streaming::trailers(self).await
    }
}

/// The backend's RPCs, returning raw wire messages.
#[async_trait]
pub trait DnsBackend: Send + Sync {
    async fn get_dns_profiles(
        &self,
        req: DnsProfilesRequest,
    ) -> Result<Box<dyn RecordStream<DnsProfile>>, Status>;

    async fn create_device_by_human_id(
        &self,
        req: CreateDeviceRequest,
    ) -> Result<CreateDeviceResponse, Status>;

    async fn save_devices_billing_stat(&self, records: Vec<DeviceBillingStat>) -> Result<(), Status>;

    async fn get_rate_limit_settings(&self) -> Result<RateLimitSettingsResponse, Status>;

    async fn get_global_access_settings(&self) -> Result<GlobalAccessSettingsResponse, Status>;

    async fn get_session_tickets(&self) -> Result<SessionTicketResponse, Status>;

    async fn get_custom_domain_certificate(
        &self,
        req: CustomDomainCertificateRequest,
    ) -> Result<CustomDomainCertificateResponse, Status>;

    async fn remote_kv_get(&self, req: RemoteKvGetRequest) -> Result<RemoteKvGetResponse, Status>;

    async fn remote_kv_set(&self, req: RemoteKvSetRequest) -> Result<(), Status>;
}

// =============================================================================
// gRPC Implementation
// =============================================================================

type Authed = InterceptedService<Channel, AuthInterceptor>;

/// [`DnsBackend`] over a tonic channel.
///
/// The channel connects lazily and reconnects on its own; each request
/// carries a `grpc-timeout` of the configured request timeout.
#[derive(Debug, Clone)]
pub struct GrpcBackend {
    channel: Channel,
    auth: AuthInterceptor,
    request_timeout: Duration,
}

impl GrpcBackend {
    /// Creates a backend from settings without connecting.
    pub fn new(settings: &BackendSettings) -> SyncResult<Self> {
        let auth = AuthInterceptor::new(settings.api_key.as_deref())?;

        let mut endpoint = Endpoint::from_shared(settings.endpoint.clone())
            .map_err(|e| SyncError::InvalidUrl(format!("{}: {e}", settings.endpoint)))?
            .connect_timeout(settings.connect_timeout());

        if endpoint.uri().scheme_str() == Some("https") {
            endpoint = endpoint
                .tls_config(ClientTlsConfig::new().with_native_roots())
                .map_err(|e| SyncError::InvalidConfig(format!("backend tls: {e}")))?;
        }

        info!(
            url = %settings.endpoint,
            authenticated = auth.is_authenticated(),
            "Backend client configured"
        );

        Ok(Self {
            channel: endpoint.connect_lazy(),
            auth,
            request_timeout: settings.request_timeout(),
        })
    }

    fn request<T>(&self, msg: T) -> Request<T> {
        let mut req = Request::new(msg);
        req.set_timeout(self.request_timeout);
        req
    }

    fn dns(&self) -> DnsServiceClient<Authed> {
        DnsServiceClient::with_interceptor(self.channel.clone(), self.auth.clone())
    }

    fn tickets(&self) -> SessionTicketServiceClient<Authed> {
        SessionTicketServiceClient::with_interceptor(self.channel.clone(), self.auth.clone())
    }

    fn custom_domains(&self) -> CustomDomainServiceClient<Authed> {
        CustomDomainServiceClient::with_interceptor(self.channel.clone(), self.auth.clone())
    }

    fn remote_kv(&self) -> RemoteKvServiceClient<Authed> {
        RemoteKvServiceClient::with_interceptor(self.channel.clone(), self.auth.clone())
    }
}

#[async_trait]
impl DnsBackend for GrpcBackend {
    async fn get_dns_profiles(
        &self,
        req: DnsProfilesRequest,
    ) -> Result<Box<dyn RecordStream<DnsProfile>>, Status> {
        // The stream may outlive the unary deadline; the caller bounds it.
        let stream = self.dns().get_dns_profiles(Request::new(req)).await?.into_inner();
        Ok(Box::new(stream))
    }

    async fn create_device_by_human_id(
        &self,
        req: CreateDeviceRequest,
    ) -> Result<CreateDeviceResponse, Status> {
        Ok(self
            .dns()
            .create_device_by_human_id(self.request(req))
            .await?
            .into_inner())
    }

    async fn save_devices_billing_stat(&self, records: Vec<DeviceBillingStat>) -> Result<(), Status> {
        self.dns()
            .save_devices_billing_stat(self.request(tokio_stream::iter(records)))
            .await?;
        Ok(())
    }

    async fn get_rate_limit_settings(&self) -> Result<RateLimitSettingsResponse, Status> {
        Ok(self
            .dns()
            .get_rate_limit_settings(self.request(RateLimitSettingsRequest {}))
            .await?
            .into_inner())
    }

    async fn get_global_access_settings(&self) -> Result<GlobalAccessSettingsResponse, Status> {
        Ok(self
            .dns()
            .get_global_access_settings(self.request(GlobalAccessSettingsRequest {}))
            .await?
            .into_inner())
    }

    async fn get_session_tickets(&self) -> Result<SessionTicketResponse, Status> {
        Ok(self
            .tickets()
            .get_session_tickets(self.request(SessionTicketRequest {}))
            .await?
            .into_inner())
    }

    async fn get_custom_domain_certificate(
        &self,
        req: CustomDomainCertificateRequest,
    ) -> Result<CustomDomainCertificateResponse, Status> {
        Ok(self
            .custom_domains()
            .get_custom_domain_certificate(self.request(req))
            .await?
            .into_inner())
    }

    async fn remote_kv_get(&self, req: RemoteKvGetRequest) -> Result<RemoteKvGetResponse, Status> {
        Ok(self.remote_kv().get(self.request(req)).await?.into_inner())
    }

    async fn remote_kv_set(&self, req: RemoteKvSetRequest) -> Result<(), Status> {
        self.remote_kv().set(self.request(req)).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_new_does_not_connect() {
        let settings = BackendSettings {
            endpoint: "http://127.0.0.1:1".to_string(),
            api_key: Some("secret".to_string()),
            ..BackendSettings::default()
        };

        let backend = GrpcBackend::new(&settings).unwrap();
        assert!(backend.auth.is_authenticated());
        assert_eq!(backend.request_timeout, settings.request_timeout());
    }

    #[test]
    fn test_new_rejects_bad_endpoint() {
        let settings = BackendSettings {
            endpoint: "not a uri".to_string(),
            ..BackendSettings::default()
        };

        assert!(matches!(GrpcBackend::new(&settings), Err(SyncError::InvalidUrl(_))));
    }
}
