//! # Shared Client Plumbing
//!
//! Every sync client holds a [`BackendClient`]: the backend, the error
//! translator and the two collaborators, plus the deadline for unary calls.
//!
//! ```text
//!   client method ──► BackendClient::call(rpc future)
//!                        │  tokio::time::timeout(request_timeout)
//!                        ├── Ok(response) ───────────────► Ok
//!                        ├── Err(Status) ── translate ───► Err(SyncError) + counted
//!                        └── elapsed ──────────────────────► Err(Timeout) + counted
//! ```

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tonic::Status;

use crate::backend::{DnsBackend, GrpcBackend};
use crate::config::BackendSettings;
use crate::errcoll::{EmptyErrorCollector, ErrorCollector};
use crate::error::{SyncError, SyncResult};
use crate::metrics::{BackendMetrics, EmptyBackendMetrics};
use crate::translate::ErrorTranslator;

/// Backend handle shared by the sync clients.
///
/// Cheap to clone; clones share the backend and the collaborators.
#[derive(Clone)]
pub struct BackendClient {
    backend: Arc<dyn DnsBackend>,
    translator: ErrorTranslator,
    metrics: Arc<dyn BackendMetrics>,
    errors: Arc<dyn ErrorCollector>,
    request_timeout: Duration,
}

impl BackendClient {
    /// Wraps a backend with no-op metrics and error collection.
    pub fn new(backend: Arc<dyn DnsBackend>, request_timeout: Duration) -> Self {
        let metrics: Arc<dyn BackendMetrics> = Arc::new(EmptyBackendMetrics);
        Self {
            backend,
            translator: ErrorTranslator::new(metrics.clone()),
            metrics,
            errors: Arc::new(EmptyErrorCollector),
            request_timeout,
        }
    }

    /// Creates a client over gRPC from settings. Does not connect.
    pub fn from_settings(settings: &BackendSettings) -> SyncResult<Self> {
        let backend = GrpcBackend::new(settings)?;
        Ok(Self::new(Arc::new(backend), settings.request_timeout()))
    }

    pub fn with_metrics(mut self, metrics: Arc<dyn BackendMetrics>) -> Self {
        self.translator = ErrorTranslator::new(metrics.clone());
        self.metrics = metrics;
        self
    }

    pub fn with_error_collector(mut self, errors: Arc<dyn ErrorCollector>) -> Self {
        self.errors = errors;
        self
    }

    pub(crate) fn backend(&self) -> &dyn DnsBackend {
        self.backend.as_ref()
    }

    pub(crate) fn metrics(&self) -> &dyn BackendMetrics {
        self.metrics.as_ref()
    }

    pub(crate) fn translator(&self) -> &ErrorTranslator {
        &self.translator
    }

    /// Hands a non-fatal error to the error collector.
    pub(crate) fn report(&self, err: SyncError) {
        self.errors.collect(err);
    }

    /// Runs one unary call under the request timeout.
    pub(crate) async fn call<T, F>(&self, rpc: F) -> SyncResult<T>
    where
        F: Future<Output = Result<T, Status>>,
    {
        match tokio::time::timeout(self.request_timeout, rpc).await {
            Ok(Ok(resp)) => Ok(resp),
            Ok(Err(status)) => Err(self.translator.translate(status)),
            Err(elapsed) => {
                let err = SyncError::from(elapsed);
                self.translator.count(&err);
                Err(err)
            }
        }
    }
}

impl std::fmt::Debug for BackendClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BackendClient")
            .field("request_timeout", &self.request_timeout)
            .finish_non_exhaustive()
    }
}
