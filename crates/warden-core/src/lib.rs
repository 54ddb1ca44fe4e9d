//! # warden-core: Domain Types for Warden
//!
//! Entities the DNS service filters with, exactly as the sync and cache
//! layers hand them out: validated on construction, freshly owned by each
//! caller, with no back-references to any container.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Warden Data Flow                                │
//! │                                                                         │
//! │  Business-logic backend ──gRPC──► warden-sync ──┐                       │
//! │                                                 │  Profile, Device,     │
//! │  Local disk ──────────────────► warden-cache ───┤  DeviceUpdate         │
//! │                                                 ▼                       │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │               ★ warden-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │  profile  │  │  device   │  │ blocking  │  │ validation│  │   │
//! │  │   │  access   │  │  net      │  │ schedule  │  │ ids       │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO NETWORK • PURE FUNCTIONS                          │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`ids`] - Validated identifier newtypes
//! - [`validation`] - Format rules behind the identifiers
//! - [`profile`] - `Profile` and its filtering settings
//! - [`device`] - `Device`, device sets and `DeviceUpdate`
//! - [`blocking`] - `BlockingMode`
//! - [`access`] - `AccessConfig`
//! - [`ratelimit`] - `RatelimitConfig`
//! - [`custom_domain`] - Custom domains and their certificate state
//! - [`schedule`] - Parental control and weekly schedules
//! - [`net`] - IP prefixes and the bind set
//! - [`sync`] - Sync watermarks and full/incremental requests
//! - [`error`] - `ValidationError`

// =============================================================================
// Module Declarations
// =============================================================================

pub mod access;
pub mod blocking;
pub mod custom_domain;
pub mod device;
pub mod error;
pub mod ids;
pub mod net;
pub mod profile;
pub mod ratelimit;
pub mod schedule;
pub mod sync;
pub mod validation;

// =============================================================================
// Re-exports
// =============================================================================

pub use access::{AccessConfig, Asn};
pub use blocking::BlockingMode;
pub use custom_domain::{CustomDomain, CustomDomainConfig, CustomDomainState};
pub use device::{
    Device, DeviceAuth, DeviceChangeId, DeviceIdSet, DeviceType, DeviceUpdate, PasswordHash,
};
pub use error::{ValidationError, ValidationResult};
pub use ids::{
    AccountId, BlockedServiceId, CertName, DeviceId, DeviceName, HumanIdLower, ProfileId,
    RuleListId,
};
pub use net::{BindSet, IpPrefix};
pub use profile::{Profile, ProfileFlags, RuleListConfig, SafeBrowsingConfig};
pub use ratelimit::RatelimitConfig;
pub use schedule::{DayInterval, ParentalConfig, WeeklySchedule};
pub use sync::{SyncKind, SyncRequest, SyncTime};
