//! # On-Disk Schema
//!
//! protobuf messages of the cache file. Field tags are part of the file
//! format: never reuse or renumber them, bump `FILE_CACHE_VERSION` instead.
//!
//! ```text
//! FileCache
//! ├── 1 sync_time_ms        int64
//! ├── 2 profiles            repeated Profile
//! ├── 3 devices             repeated Device
//! └── 4 version             int32   ← read first, via VersionHeader
//! ```

use prost_types::{Duration, Timestamp};

/// Only the version field of [`FileCache`]. Decoding the file as this
/// message skips everything else, so the version can be checked before any
/// payload is interpreted.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct VersionHeader {
    #[prost(int32, tag = "4")]
    pub version: i32,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct FileCache {
    #[prost(int64, tag = "1")]
    pub sync_time_ms: i64,
    #[prost(message, repeated, tag = "2")]
    pub profiles: Vec<Profile>,
    #[prost(message, repeated, tag = "3")]
    pub devices: Vec<Device>,
    #[prost(int32, tag = "4")]
    pub version: i32,
}

// =============================================================================
// Profile
// =============================================================================

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Profile {
    #[prost(string, tag = "1")]
    pub id: String,
    #[prost(string, tag = "2")]
    pub account_id: String,
    #[prost(string, repeated, tag = "3")]
    pub device_ids: Vec<String>,
    #[prost(string, repeated, tag = "4")]
    pub custom_rules: Vec<String>,
    #[prost(message, optional, tag = "5")]
    pub rule_lists: Option<RuleLists>,
    #[prost(message, optional, tag = "6")]
    pub parental: Option<Parental>,
    #[prost(message, optional, tag = "7")]
    pub safe_browsing: Option<SafeBrowsing>,
    #[prost(message, optional, tag = "8")]
    pub access: Option<Access>,
    #[prost(message, optional, tag = "9")]
    pub ratelimit: Option<Ratelimit>,
    #[prost(message, optional, tag = "10")]
    pub blocking_mode: Option<BlockingMode>,
    #[prost(message, optional, tag = "11")]
    pub adult_blocking_mode: Option<BlockingMode>,
    #[prost(message, optional, tag = "12")]
    pub safe_browsing_blocking_mode: Option<BlockingMode>,
    #[prost(message, optional, tag = "13")]
    pub filtered_response_ttl: Option<Duration>,
    #[prost(message, optional, tag = "14")]
    pub custom_domains: Option<CustomDomains>,
    #[prost(bool, tag = "15")]
    pub filtering_enabled: bool,
    #[prost(bool, tag = "16")]
    pub query_log_enabled: bool,
    #[prost(bool, tag = "17")]
    pub ip_log_enabled: bool,
    #[prost(bool, tag = "18")]
    pub auto_devices_enabled: bool,
    #[prost(bool, tag = "19")]
    pub block_chrome_prefetch: bool,
    #[prost(bool, tag = "20")]
    pub block_firefox_canary: bool,
    #[prost(bool, tag = "21")]
    pub block_private_relay: bool,
    #[prost(bool, tag = "22")]
    pub deleted: bool,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct RuleLists {
    #[prost(bool, tag = "1")]
    pub enabled: bool,
    #[prost(string, repeated, tag = "2")]
    pub ids: Vec<String>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct SafeBrowsing {
    #[prost(bool, tag = "1")]
    pub enabled: bool,
    #[prost(bool, tag = "2")]
    pub block_dangerous_domains: bool,
    #[prost(bool, tag = "3")]
    pub block_newly_registered_domains: bool,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Parental {
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
    pub schedule: Option<Schedule>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Schedule {
    #[prost(string, tag = "1")]
    pub time_zone: String,
    #[prost(message, optional, tag = "2")]
    pub mon: Option<DayInterval>,
    #[prost(message, optional, tag = "3")]
    pub tue: Option<DayInterval>,
    #[prost(message, optional, tag = "4")]
    pub wed: Option<DayInterval>,
    #[prost(message, optional, tag = "5")]
    pub thu: Option<DayInterval>,
    #[prost(message, optional, tag = "6")]
    pub fri: Option<DayInterval>,
    #[prost(message, optional, tag = "7")]
    pub sat: Option<DayInterval>,
    #[prost(message, optional, tag = "8")]
    pub sun: Option<DayInterval>,
}

/// Minutes since local midnight.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct DayInterval {
    #[prost(uint32, tag = "1")]
    pub start: u32,
    #[prost(uint32, tag = "2")]
    pub end: u32,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Prefix {
    #[prost(bytes = "vec", tag = "1")]
    pub addr: Vec<u8>,
    #[prost(uint32, tag = "2")]
    pub len: u32,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Access {
    #[prost(message, repeated, tag = "1")]
    pub allowed_nets: Vec<Prefix>,
    #[prost(message, repeated, tag = "2")]
    pub blocked_nets: Vec<Prefix>,
    #[prost(uint32, repeated, tag = "3")]
    pub allowed_asns: Vec<u32>,
    #[prost(uint32, repeated, tag = "4")]
    pub blocked_asns: Vec<u32>,
    #[prost(string, repeated, tag = "5")]
    pub blocklist_domain_rules: Vec<String>,
    #[prost(bool, tag = "6")]
    pub standard_enabled: bool,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Ratelimit {
    #[prost(bool, tag = "1")]
    pub enabled: bool,
    #[prost(uint32, tag = "2")]
    pub rps: u32,
    #[prost(message, repeated, tag = "3")]
    pub client_subnets: Vec<Prefix>,
}

// =============================================================================
// Blocking Modes
// =============================================================================

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct BlockingMode {
    #[prost(oneof = "blocking_mode::Mode", tags = "1, 2, 3, 4")]
    pub mode: Option<blocking_mode::Mode>,
}

pub mod blocking_mode {
    #[derive(Clone, PartialEq, ::prost::Oneof)]
    pub enum Mode {
        #[prost(message, tag = "1")]
        CustomIp(super::CustomIp),
        #[prost(message, tag = "2")]
        NxDomain(super::Unit),
        #[prost(message, tag = "3")]
        NullIp(super::Unit),
        #[prost(message, tag = "4")]
        Refused(super::Unit),
    }
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct CustomIp {
    #[prost(bytes = "vec", repeated, tag = "1")]
    pub ipv4: Vec<Vec<u8>>,
    #[prost(bytes = "vec", repeated, tag = "2")]
    pub ipv6: Vec<Vec<u8>>,
}

/// Marker for variants without data.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Unit {}

// =============================================================================
// Custom Domains
// =============================================================================

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct CustomDomains {
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
        Pending(super::PendingDomain),
        #[prost(message, tag = "3")]
        Current(super::CurrentDomain),
    }
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct PendingDomain {
    #[prost(string, tag = "1")]
    pub well_known_path: String,
    #[prost(message, optional, tag = "2")]
    pub expire: Option<Timestamp>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct CurrentDomain {
    #[prost(string, tag = "1")]
    pub cert_name: String,
    #[prost(message, optional, tag = "2")]
    pub not_before: Option<Timestamp>,
    #[prost(message, optional, tag = "3")]
    pub not_after: Option<Timestamp>,
    #[prost(bool, tag = "4")]
    pub enabled: bool,
}

// =============================================================================
// Device
// =============================================================================

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Device {
    #[prost(string, tag = "1")]
    pub id: String,
    #[prost(string, tag = "2")]
    pub name: String,
    #[prost(string, tag = "3")]
    pub human_id_lower: String,
    #[prost(bytes = "vec", tag = "4")]
    pub linked_ip: Vec<u8>,
    #[prost(bytes = "vec", repeated, tag = "5")]
    pub dedicated_ips: Vec<Vec<u8>>,
    #[prost(bool, tag = "6")]
    pub auth_enabled: bool,
    #[prost(bool, tag = "7")]
    pub doh_auth_only: bool,
    #[prost(oneof = "device::PasswordHash", tags = "8")]
    pub password_hash: Option<device::PasswordHash>,
    #[prost(bool, tag = "9")]
    pub filtering_enabled: bool,
}

pub mod device {
    #[derive(Clone, PartialEq, ::prost::Oneof)]
    pub enum PasswordHash {
        #[prost(bytes = "vec", tag = "8")]
        Bcrypt(Vec<u8>),
    }
}
