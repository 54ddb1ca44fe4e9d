//! # warden-sync: Backend Sync Clients for Warden
//!
//! Pulls filtering profiles and devices from the business-logic backend and
//! talks to its satellite services.
//!
//! ## Architecture Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Warden Sync Layer                                │
//! │                                                                         │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │                 ProfileStorage (stream pull)                     │  │
//! │  │                                                                  │  │
//! │  │  SyncRequest::{Full, Incremental} ──► GetDNSProfiles stream      │  │
//! │  │  record ──► convert ──► Profile / Device / DeviceUpdate          │  │
//! │  │  trailer sync_time ──► next watermark                            │  │
//! │  └────────────────────────────┬─────────────────────────────────────┘  │
//! │                               │                                         │
//! │         ┌─────────────────────┼─────────────────────┐                  │
//! │         ▼                     ▼                     ▼                   │
//! │  ┌────────────────┐  ┌────────────────┐  ┌────────────────────────┐    │
//! │  │ BackendClient  │  │ ErrorTranslator│  │ Satellite clients      │    │
//! │  │                │  │                │  │                        │    │
//! │  │ DnsBackend +   │  │ Status details │  │ billstat, settings,    │    │
//! │  │ timeout +      │  │ → SyncError    │  │ tickets, certificates, │    │
//! │  │ collaborators  │  │ + counter      │  │ remote kv              │    │
//! │  └───────┬────────┘  └────────────────┘  └────────────────────────┘    │
//! │          ▼                                                              │
//! │  ┌────────────────┐   authorization: Bearer <api key>                   │
//! │  │  GrpcBackend   │ ──────────────────────────────────► backend         │
//! │  └────────────────┘                                                     │
//! │                                                                         │
//! │  COLLABORATORS (null objects when disabled):                           │
//! │  • BackendMetrics - error counters, sync stats, ticket/billstat gauges │
//! │  • ErrorCollector - per-record failures that did not fail the call     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! ### Profile Sync
//! - [`profile_storage`] - `ProfileStorage`, `SyncResponse`
//! - [`stats`] - Per-call timing statistics
//!
//! ### Plumbing
//! - [`backend`] - `DnsBackend` seam and its gRPC implementation
//! - [`client`] - `BackendClient`, shared by every client
//! - [`translate`] - `ErrorTranslator`
//! - [`auth`] - Bearer-token interceptor
//! - [`proto`] - Wire messages and generated gRPC clients
//!
//! ### Satellite Clients
//! - [`billstat`] - Billing statistics upload
//! - [`settings`] - Rate-limit allowlist and standard access settings
//! - [`tickets`] - TLS session tickets
//! - [`certificate`] - Custom-domain certificates
//! - [`remote_kv`] - Remote key/value store
//!
//! ### Support
//! - [`config`] - `WardenConfig` (TOML + environment)
//! - [`metrics`] - `BackendMetrics`
//! - [`errcoll`] - `ErrorCollector`
//! - [`error`] - `SyncError`
//!
//! ## Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use warden_core::SyncRequest;
//! use warden_sync::{BackendClient, LoggingErrorCollector, ProfileStorage, WardenConfig};
//!
//! let config = WardenConfig::load_or_default(None);
//! let client = BackendClient::from_settings(&config.backend)?
//!     .with_error_collector(Arc::new(LoggingErrorCollector));
//!
//! let storage = ProfileStorage::new(
//!     client,
//!     config.network.bind_set.clone(),
//!     config.backend.sync_timeout(),
//! );
//!
//! let full = storage.sync(SyncRequest::Full).await?;
//! let next = storage
//!     .sync(SyncRequest::Incremental { since: full.sync_time })
//!     .await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

// Profile sync
pub mod profile_storage;
pub mod stats;

// Plumbing
pub mod auth;
pub mod backend;
pub mod client;
pub mod proto;
pub mod translate;

mod convert;

// Satellite clients
pub mod billstat;
pub mod certificate;
pub mod remote_kv;
pub mod settings;
pub mod tickets;

// Support
pub mod config;
pub mod errcoll;
pub mod error;
pub mod metrics;

#[cfg(test)]
mod testutil;

// =============================================================================
// Re-exports
// =============================================================================

// Profile sync
pub use profile_storage::{sync_time_from_trailers, ProfileStorage, SyncResponse};
pub use stats::SyncStatsSummary;

// Plumbing
pub use auth::AuthInterceptor;
pub use backend::{DnsBackend, GrpcBackend, RecordStream};
pub use client::BackendClient;
pub use translate::{translate_status, ErrorTranslator};

// Satellite clients
pub use billstat::{BillStatRecord, BillStatUploader, Protocol};
pub use certificate::{CertificateClient, CertificateData};
pub use remote_kv::RemoteKv;
pub use settings::SettingsClient;
pub use tickets::TicketClient;

// Support
pub use config::{BackendSettings, CacheSettings, NetworkSettings, RemoteKvSettings, WardenConfig};
pub use errcoll::{EmptyErrorCollector, ErrorCollector, LoggingErrorCollector};
pub use error::{SyncError, SyncResult};
pub use metrics::{BackendMetrics, EmptyBackendMetrics, ErrorClass};
