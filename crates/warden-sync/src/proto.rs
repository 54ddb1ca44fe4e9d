//! # Wire Schema
//!
//! protobuf messages of the `warden.backend.v1` package, written with prost
//! derives, plus the tonic clients generated by `build.rs`.
//!
//! ## Services
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  DnsService                                                             │
//! │    GetDNSProfiles          DnsProfilesRequest → stream DnsProfile       │
//! │                            trailer: sync_time = "<epoch ms>"            │
//! │    CreateDeviceByHumanId   CreateDeviceRequest → CreateDeviceResponse   │
//! │    SaveDevicesBillingStat  stream DeviceBillingStat → (empty)           │
//! │    GetRateLimitSettings    → RateLimitSettingsResponse                  │
//! │    GetGlobalAccessSettings → GlobalAccessSettingsResponse               │
//! │                                                                         │
//! │  SessionTicketService      GetSessionTickets                            │
//! │  CustomDomainService       GetCustomDomainCertificate                   │
//! │  RemoteKvService           Get, Set                                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use prost_types::{Duration, Timestamp};

/// Package of every message and service below.
pub const PACKAGE: &str = "warden.backend.v1";

/// Trailer key carrying the new sync time.
pub const SYNC_TIME_TRAILER: &str = "sync_time";

// =============================================================================
// Generated Clients
// =============================================================================

include!(concat!(env!("OUT_DIR"), "/warden.backend.v1.DnsService.rs"));
include!(concat!(env!("OUT_DIR"), "/warden.backend.v1.SessionTicketService.rs"));
include!(concat!(env!("OUT_DIR"), "/warden.backend.v1.CustomDomainService.rs"));
include!(concat!(env!("OUT_DIR"), "/warden.backend.v1.RemoteKvService.rs"));

// =============================================================================
// Profiles
// =============================================================================

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct DnsProfilesRequest {
    /// Unset requests a full sync.
    #[prost(message, optional, tag = "1")]
    pub sync_time: Option<Timestamp>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct DnsProfile {
    #[prost(string, tag = "1")]
    pub dns_id: String,
    #[prost(bool, tag = "2")]
    pub filtering_enabled: bool,
    #[prost(bool, tag = "3")]
    pub query_log_enabled: bool,
    #[prost(bool, tag = "4")]
    pub deleted: bool,
    #[prost(message, optional, tag = "5")]
    pub safe_browsing: Option<SafeBrowsingSettings>,
    #[prost(message, optional, tag = "6")]
    pub parental: Option<ParentalSettings>,
    #[prost(message, optional, tag = "7")]
    pub rule_lists: Option<RuleListsSettings>,
    /// Full device list.
    #[prost(message, repeated, tag = "8")]
    pub devices: Vec<DeviceSettings>,
    #[prost(string, repeated, tag = "9")]
    pub custom_rules: Vec<String>,
    #[prost(message, optional, tag = "10")]
    pub filtered_response_ttl: Option<Duration>,
    #[prost(message, optional, tag = "11")]
    pub blocking_mode: Option<BlockingModeSettings>,
    #[prost(bool, tag = "12")]
    pub ip_log_enabled: bool,
    #[prost(message, optional, tag = "13")]
    pub access: Option<AccessSettings>,
    #[prost(bool, tag = "14")]
    pub auto_devices_enabled: bool,
    #[prost(bool, tag = "15")]
    pub block_chrome_prefetch: bool,
    #[prost(bool, tag = "16")]
    pub block_firefox_canary: bool,
    #[prost(bool, tag = "17")]
    pub block_private_relay: bool,
    #[prost(string, tag = "18")]
    pub account_id: String,
    #[prost(message, optional, tag = "19")]
    pub ratelimit: Option<RateLimitSettings>,
    /// Device patch; only sent on incremental syncs.
    #[prost(message, repeated, tag = "20")]
    pub device_changes: Vec<DeviceSettingsChange>,
    #[prost(message, optional, tag = "21")]
    pub custom_domain: Option<CustomDomainSettings>,
    #[prost(message, optional, tag = "22")]
    pub adult_blocking_mode: Option<BlockingModeSettings>,
    #[prost(message, optional, tag = "23")]
    pub safe_browsing_blocking_mode: Option<BlockingModeSettings>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct SafeBrowsingSettings {
    #[prost(bool, tag = "1")]
    pub enabled: bool,
    #[prost(bool, tag = "2")]
    pub block_dangerous_domains: bool,
    #[prost(bool, tag = "3")]
    pub block_nrd: bool,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct RuleListsSettings {
    #[prost(bool, tag = "1")]
    pub enabled: bool,
    #[prost(string, repeated, tag = "2")]
    pub ids: Vec<String>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ParentalSettings {
    #[prost(bool, tag = "1")]
    pub enabled: bool,
    #[prost(bool, tag = "2")]
    pub block_adult: bool,
    #[prost(bool, tag = "3")]
    pub general_safe_search: bool,
    #[prost(bool, tag = "4")]
    pub youtube_safe_search: bool,
    #[prost(string, repeated, tag = "5")]
    pub blocked_services: Vec<String>,
    #[prost(message, optional, tag = "6")]
    pub schedule: Option<ScheduleSettings>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ScheduleSettings {
    /// IANA time zone name.
    #[prost(string, tag = "1")]
    pub tmz: String,
    #[prost(message, optional, tag = "2")]
    pub weekly_range: Option<WeeklyRange>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct WeeklyRange {
    #[prost(message, optional, tag = "1")]
    pub mon: Option<DayRange>,
    #[prost(message, optional, tag = "2")]
    pub tue: Option<DayRange>,
    #[prost(message, optional, tag = "3")]
    pub wed: Option<DayRange>,
    #[prost(message, optional, tag = "4")]
    pub thu: Option<DayRange>,
    #[prost(message, optional, tag = "5")]
    pub fri: Option<DayRange>,
    #[prost(message, optional, tag = "6")]
    pub sat: Option<DayRange>,
    #[prost(message, optional, tag = "7")]
    pub sun: Option<DayRange>,
}

/// Offsets from local midnight.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct DayRange {
    #[prost(message, optional, tag = "1")]
    pub start: Option<Duration>,
    #[prost(message, optional, tag = "2")]
    pub end: Option<Duration>,
}

// =============================================================================
// Blocking Modes
// =============================================================================

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct BlockingModeSettings {
    #[prost(oneof = "blocking_mode_settings::Mode", tags = "1, 2, 3, 4")]
    pub mode: Option<blocking_mode_settings::Mode>,
}

pub mod blocking_mode_settings {
    #[derive(Clone, PartialEq, ::prost::Oneof)]
    pub enum Mode {
        #[prost(message, tag = "1")]
        CustomIp(super::BlockingModeCustomIp),
        #[prost(message, tag = "2")]
        NxDomain(super::BlockingModeNxDomain),
        #[prost(message, tag = "3")]
        NullIp(super::BlockingModeNullIp),
        #[prost(message, tag = "4")]
        Refused(super::BlockingModeRefused),
    }
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct BlockingModeCustomIp {
    #[prost(bytes = "vec", repeated, tag = "1")]
    pub ipv4: Vec<Vec<u8>>,
    #[prost(bytes = "vec", repeated, tag = "2")]
    pub ipv6: Vec<Vec<u8>>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct BlockingModeNxDomain {}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct BlockingModeNullIp {}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct BlockingModeRefused {}

// =============================================================================
// Devices
// =============================================================================

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct DeviceSettings {
    #[prost(string, tag = "1")]
    pub id: String,
    #[prost(string, tag = "2")]
    pub name: String,
    #[prost(bool, tag = "3")]
    pub filtering_enabled: bool,
    /// 4 or 16 bytes; empty when unset.
    #[prost(bytes = "vec", tag = "4")]
    pub linked_ip: Vec<u8>,
    #[prost(bytes = "vec", repeated, tag = "5")]
    pub dedicated_ips: Vec<Vec<u8>>,
    #[prost(message, optional, tag = "6")]
    pub authentication: Option<AuthenticationSettings>,
    #[prost(string, tag = "7")]
    pub human_id_lower: String,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct AuthenticationSettings {
    #[prost(bool, tag = "1")]
    pub doh_auth_only: bool,
    #[prost(oneof = "authentication_settings::DohPasswordHash", tags = "2")]
    pub doh_password_hash: Option<authentication_settings::DohPasswordHash>,
    #[prost(bool, tag = "3")]
    pub enabled: bool,
}

pub mod authentication_settings {
    #[derive(Clone, PartialEq, ::prost::Oneof)]
    pub enum DohPasswordHash {
        #[prost(bytes = "vec", tag = "2")]
        PasswordHashBcrypt(Vec<u8>),
    }
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct DeviceSettingsChange {
    #[prost(oneof = "device_settings_change::Change", tags = "1, 2")]
    pub change: Option<device_settings_change::Change>,
}

pub mod device_settings_change {
    #[derive(Clone, PartialEq, ::prost::Oneof)]
    pub enum Change {
        #[prost(message, tag = "1")]
        Deleted(super::DeletedDevice),
        #[prost(message, tag = "2")]
        Upserted(super::UpsertedDevice),
    }
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct DeletedDevice {
    #[prost(string, tag = "1")]
    pub device_id: String,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct UpsertedDevice {
    #[prost(message, optional, tag = "1")]
    pub device: Option<DeviceSettings>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
#[repr(i32)]
pub enum DeviceType {
    Invalid = 0,
    Windows = 1,
    Android = 2,
    MacOs = 3,
    Ios = 4,
    Linux = 5,
    Router = 6,
    SmartTv = 7,
    GameConsole = 8,
    Other = 9,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct CreateDeviceRequest {
    #[prost(string, tag = "1")]
    pub dns_id: String,
    #[prost(string, tag = "2")]
    pub human_id: String,
    #[prost(enumeration = "DeviceType", tag = "3")]
    pub device_type: i32,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct CreateDeviceResponse {
    #[prost(message, optional, tag = "1")]
    pub device: Option<DeviceSettings>,
}

// =============================================================================
// Access and Rate Limits
// =============================================================================

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct CidrRange {
    #[prost(bytes = "vec", tag = "1")]
    pub address: Vec<u8>,
    #[prost(uint32, tag = "2")]
    pub prefix: u32,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct AccessSettings {
    #[prost(message, repeated, tag = "1")]
    pub allowlist_cidr: Vec<CidrRange>,
    #[prost(message, repeated, tag = "2")]
    pub blocklist_cidr: Vec<CidrRange>,
    #[prost(uint32, repeated, tag = "3")]
    pub allowlist_asn: Vec<u32>,
    #[prost(uint32, repeated, tag = "4")]
    pub blocklist_asn: Vec<u32>,
    #[prost(string, repeated, tag = "5")]
    pub blocklist_domain_rules: Vec<String>,
    #[prost(bool, tag = "6")]
    pub enabled: bool,
    #[prost(bool, tag = "7")]
    pub standard_blocking_enabled: bool,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct RateLimitSettings {
    #[prost(bool, tag = "1")]
    pub enabled: bool,
    #[prost(uint32, tag = "2")]
    pub rps: u32,
    #[prost(message, repeated, tag = "3")]
    pub client_cidr: Vec<CidrRange>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct RateLimitSettingsRequest {}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct RateLimitSettingsResponse {
    #[prost(message, repeated, tag = "1")]
    pub allowed_subnets: Vec<CidrRange>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct GlobalAccessSettingsRequest {}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct GlobalAccessSettingsResponse {
    #[prost(message, optional, tag = "1")]
    pub standard: Option<AccessSettings>,
}

// =============================================================================
// Custom Domains
// =============================================================================

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct CustomDomainSettings {
    #[prost(bool, tag = "1")]
    pub enabled: bool,
    #[prost(message, repeated, tag = "2")]
    pub domains: Vec<CustomDomain>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct CustomDomain {
    #[prost(string, repeated, tag = "1")]
    pub domains: Vec<String>,
    #[prost(oneof = "custom_domain::State", tags = "2, 3")]
    pub state: Option<custom_domain::State>,
}

pub mod custom_domain {
    #[derive(Clone, PartialEq, ::prost::Oneof)]
    pub enum State {
        #[prost(message, tag = "2")]
        Pending(super::CustomDomainPending),
        #[prost(message, tag = "3")]
        Current(super::CustomDomainCurrent),
    }
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct CustomDomainPending {
    #[prost(string, tag = "1")]
    pub well_known_path: String,
    #[prost(message, optional, tag = "2")]
    pub expire: Option<Timestamp>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct CustomDomainCurrent {
    #[prost(string, tag = "1")]
    pub cert_name: String,
    #[prost(message, optional, tag = "2")]
    pub not_before: Option<Timestamp>,
    #[prost(message, optional, tag = "3")]
    pub not_after: Option<Timestamp>,
    #[prost(bool, tag = "4")]
    pub enabled: bool,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct CustomDomainCertificateRequest {
    #[prost(string, tag = "1")]
    pub cert_name: String,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct CustomDomainCertificateResponse {
    /// PEM-encoded chain.
    #[prost(bytes = "vec", tag = "1")]
    pub certificate_chain: Vec<u8>,
    /// PEM-encoded key.
    #[prost(bytes = "vec", tag = "2")]
    pub private_key: Vec<u8>,
}

// =============================================================================
// Billing Statistics
// =============================================================================

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct DeviceBillingStat {
    #[prost(message, optional, tag = "1")]
    pub last_activity_time: Option<Timestamp>,
    #[prost(string, tag = "2")]
    pub device_id: String,
    /// ISO 3166-1 alpha-2 code of the client's country.
    #[prost(string, tag = "3")]
    pub client_country: String,
    #[prost(uint32, tag = "4")]
    pub proto: u32,
    #[prost(uint32, tag = "5")]
    pub asn: u32,
    #[prost(uint32, tag = "6")]
    pub queries: u32,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct SaveDevicesBillingStatResponse {}

// =============================================================================
// Session Tickets
// =============================================================================

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct SessionTicketRequest {}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct SessionTicketResponse {
    #[prost(message, repeated, tag = "1")]
    pub tickets: Vec<SessionTicket>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct SessionTicket {
    #[prost(string, tag = "1")]
    pub name: String,
    #[prost(bytes = "vec", tag = "2")]
    pub data: Vec<u8>,
}

// =============================================================================
// Remote Key/Value
// =============================================================================

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct RemoteKvGetRequest {
    #[prost(string, tag = "1")]
    pub key: String,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct RemoteKvGetResponse {
    #[prost(oneof = "remote_kv_get_response::Value", tags = "1, 2")]
    pub value: Option<remote_kv_get_response::Value>,
}

pub mod remote_kv_get_response {
    #[derive(Clone, PartialEq, ::prost::Oneof)]
    pub enum Value {
        #[prost(bytes = "vec", tag = "1")]
        Data(Vec<u8>),
        #[prost(message, tag = "2")]
        Empty(super::RemoteKvEmpty),
    }
}

/// Marks a key without a value.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct RemoteKvEmpty {}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct RemoteKvSetRequest {
    #[prost(string, tag = "1")]
    pub key: String,
    #[prost(bytes = "vec", tag = "2")]
    pub data: Vec<u8>,
    #[prost(message, optional, tag = "3")]
    pub ttl: Option<Duration>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct RemoteKvSetResponse {}

// =============================================================================
// Error Details
// =============================================================================
//
// Carried in the `grpc-status-details-bin` trailer as a `google.rpc.Status`
// whose `details` hold one of the messages below.

/// `google.rpc.Status`.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct RpcStatus {
    #[prost(int32, tag = "1")]
    pub code: i32,
    #[prost(string, tag = "2")]
    pub message: String,
    #[prost(message, repeated, tag = "3")]
    pub details: Vec<prost_types::Any>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct AuthenticationFailedError {
    #[prost(string, tag = "1")]
    pub message: String,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct BadRequestError {
    #[prost(string, tag = "1")]
    pub message: String,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct DeviceQuotaExceededError {
    #[prost(string, tag = "1")]
    pub message: String,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct RateLimitedError {
    #[prost(string, tag = "1")]
    pub message: String,
    #[prost(message, optional, tag = "2")]
    pub retry_delay: Option<Duration>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct NotFoundError {
    #[prost(string, tag = "1")]
    pub message: String,
}

/// Fully qualified name of an error detail message, as it appears after the
/// last `/` of an `Any` type URL.
pub fn detail_type_name(message: &str) -> String {
    format!("{PACKAGE}.{message}")
}
