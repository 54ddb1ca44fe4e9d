//! # Snapshot Codec
//!
//! Converts between the domain snapshot and its on-disk encoding.
//!
//! ## Decoding Order
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  bytes                                                                  │
//! │    │                                                                    │
//! │    ├──► VersionHeader ──► version != FILE_CACHE_VERSION? ──► Mismatch  │
//! │    │                                                                    │
//! │    └──► schema::FileCache ──► domain constructors ──► FileCache         │
//! │                                (every invariant re-checked)             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};
use std::time::Duration;

use chrono::{DateTime, Utc};
use prost::Message;
use warden_core::net::{ip_from_bytes, ip_to_bytes, opt_ip_from_bytes};
use warden_core::{
    AccessConfig, AccountId, Asn, BlockedServiceId, BlockingMode, CertName, CustomDomain,
    CustomDomainConfig, CustomDomainState, DayInterval, Device, DeviceAuth, DeviceId, DeviceName,
    HumanIdLower, IpPrefix, ParentalConfig, PasswordHash, Profile, ProfileFlags, ProfileId,
    RatelimitConfig, RuleListConfig, RuleListId, SafeBrowsingConfig, SyncTime, ValidationError,
    ValidationResult, WeeklySchedule,
};

use crate::error::{CacheError, CacheResult};
use crate::schema::{self, blocking_mode::Mode, custom_domain::State};

/// Current schema version of the cache file. Bump on any incompatible
/// change to [`schema`].
pub const FILE_CACHE_VERSION: i32 = 1;

/// A snapshot of the last successful sync.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileCache {
    /// Watermark of the sync that produced the snapshot.
    pub sync_time: SyncTime,
    pub profiles: Vec<Profile>,
    pub devices: Vec<Device>,
    /// Schema version the snapshot is written with.
    pub version: i32,
}

impl FileCache {
    /// Creates a snapshot with the current schema version.
    pub fn new(sync_time: SyncTime, profiles: Vec<Profile>, devices: Vec<Device>) -> Self {
        Self {
            sync_time,
            profiles,
            devices,
            version: FILE_CACHE_VERSION,
        }
    }
}

// =============================================================================
// Public API
// =============================================================================

/// Encodes a snapshot.
pub fn encode(cache: &FileCache) -> Vec<u8> {
    schema::FileCache {
        sync_time_ms: cache.sync_time.as_millis(),
        profiles: cache.profiles.iter().map(profile_to_schema).collect(),
        devices: cache.devices.iter().map(device_to_schema).collect(),
        version: cache.version,
    }
    .encode_to_vec()
}

/// Decodes a snapshot, rejecting other schema versions before anything
/// else is looked at.
pub fn decode(data: &[u8]) -> CacheResult<FileCache> {
    let header = schema::VersionHeader::decode(data)?;
    if header.version != FILE_CACHE_VERSION {
        return Err(CacheError::VersionMismatch {
            found: header.version,
            expected: FILE_CACHE_VERSION,
        });
    }

    let msg = schema::FileCache::decode(data)?;

    let profiles = msg
        .profiles
        .into_iter()
        .map(|p| {
            let id = p.id.clone();
            profile_from_schema(p).map_err(|e| CacheError::invalid(format!("profile {id:?}"), e))
        })
        .collect::<CacheResult<Vec<_>>>()?;

    let devices = msg
        .devices
        .into_iter()
        .map(|d| {
            let id = d.id.clone();
            device_from_schema(d).map_err(|e| CacheError::invalid(format!("device {id:?}"), e))
        })
        .collect::<CacheResult<Vec<_>>>()?;

    Ok(FileCache {
        sync_time: SyncTime::from_millis(msg.sync_time_ms),
        profiles,
        devices,
        version: msg.version,
    })
}

// =============================================================================
// Profile
// =============================================================================

fn profile_to_schema(p: &Profile) -> schema::Profile {
    schema::Profile {
        id: p.id.to_string(),
        account_id: p.account_id.to_string(),
        device_ids: p.device_ids.iter().map(ToString::to_string).collect(),
        custom_rules: p.custom_rules.clone(),
        rule_lists: Some(schema::RuleLists {
            enabled: p.rule_lists.enabled,
            ids: p.rule_lists.ids.iter().map(ToString::to_string).collect(),
        }),
        parental: Some(parental_to_schema(&p.parental)),
        safe_browsing: Some(schema::SafeBrowsing {
            enabled: p.safe_browsing.enabled,
            block_dangerous_domains: p.safe_browsing.block_dangerous_domains,
            block_newly_registered_domains: p.safe_browsing.block_newly_registered_domains,
        }),
        access: Some(access_to_schema(&p.access)),
        ratelimit: Some(schema::Ratelimit {
            enabled: p.ratelimit.enabled,
            rps: p.ratelimit.rps,
            client_subnets: p.ratelimit.client_subnets.iter().map(prefix_to_schema).collect(),
        }),
        blocking_mode: Some(blocking_mode_to_schema(&p.blocking_mode)),
        adult_blocking_mode: p.adult_blocking_mode.as_ref().map(blocking_mode_to_schema),
        safe_browsing_blocking_mode: p
            .safe_browsing_blocking_mode
            .as_ref()
            .map(blocking_mode_to_schema),
        filtered_response_ttl: Some(duration_to_schema(p.filtered_response_ttl)),
        custom_domains: Some(schema::CustomDomains {
            enabled: p.custom_domains.enabled,
            domains: p.custom_domains.domains.iter().map(custom_domain_to_schema).collect(),
        }),
        filtering_enabled: p.flags.filtering_enabled,
        query_log_enabled: p.flags.query_log_enabled,
        ip_log_enabled: p.flags.ip_log_enabled,
        auto_devices_enabled: p.flags.auto_devices_enabled,
        block_chrome_prefetch: p.flags.block_chrome_prefetch,
        block_firefox_canary: p.flags.block_firefox_canary,
        block_private_relay: p.flags.block_private_relay,
        deleted: p.deleted,
    }
}

fn profile_from_schema(p: schema::Profile) -> ValidationResult<Profile> {
    let rule_lists = p.rule_lists.unwrap_or_default();
    let safe_browsing = p.safe_browsing.unwrap_or_default();
    let ratelimit = p.ratelimit.unwrap_or_default();
    let custom_domains = p.custom_domains.unwrap_or_default();

    Ok(Profile {
        id: ProfileId::new(p.id)?,
        account_id: AccountId::new(p.account_id)?,
        device_ids: p
            .device_ids
            .into_iter()
            .map(DeviceId::new)
            .collect::<ValidationResult<_>>()?,
        custom_rules: p.custom_rules,
        rule_lists: RuleListConfig {
            enabled: rule_lists.enabled,
            ids: rule_lists
                .ids
                .into_iter()
                .map(RuleListId::new)
                .collect::<ValidationResult<_>>()?,
        },
        parental: parental_from_schema(p.parental.unwrap_or_default())?,
        safe_browsing: SafeBrowsingConfig {
            enabled: safe_browsing.enabled,
            block_dangerous_domains: safe_browsing.block_dangerous_domains,
            block_newly_registered_domains: safe_browsing.block_newly_registered_domains,
        },
        access: access_from_schema(p.access.unwrap_or_default())?,
        ratelimit: RatelimitConfig {
            enabled: ratelimit.enabled,
            rps: ratelimit.rps,
            client_subnets: prefixes_from_schema("client_subnets", ratelimit.client_subnets)?,
        },
        blocking_mode: match p.blocking_mode {
            Some(m) => blocking_mode_from_schema(m)?,
            None => BlockingMode::default(),
        },
        adult_blocking_mode: p.adult_blocking_mode.map(blocking_mode_from_schema).transpose()?,
        safe_browsing_blocking_mode: p
            .safe_browsing_blocking_mode
            .map(blocking_mode_from_schema)
            .transpose()?,
        filtered_response_ttl: duration_from_schema(p.filtered_response_ttl)?,
        custom_domains: CustomDomainConfig {
            enabled: custom_domains.enabled,
            domains: custom_domains
                .domains
                .into_iter()
                .map(custom_domain_from_schema)
                .collect::<ValidationResult<_>>()?,
        },
        flags: ProfileFlags {
            filtering_enabled: p.filtering_enabled,
            query_log_enabled: p.query_log_enabled,
            ip_log_enabled: p.ip_log_enabled,
            auto_devices_enabled: p.auto_devices_enabled,
            block_chrome_prefetch: p.block_chrome_prefetch,
            block_firefox_canary: p.block_firefox_canary,
            block_private_relay: p.block_private_relay,
        },
        deleted: p.deleted,
    })
}

// =============================================================================
// Parental
// =============================================================================

fn parental_to_schema(p: &ParentalConfig) -> schema::Parental {
    schema::Parental {
        enabled: p.enabled,
        block_adult: p.block_adult,
        general_safe_search: p.general_safe_search,
        youtube_safe_search: p.youtube_safe_search,
        blocked_services: p.blocked_services.iter().map(ToString::to_string).collect(),
        schedule: p.schedule.as_ref().map(schedule_to_schema),
    }
}

fn parental_from_schema(p: schema::Parental) -> ValidationResult<ParentalConfig> {
    Ok(ParentalConfig {
        enabled: p.enabled,
        block_adult: p.block_adult,
        general_safe_search: p.general_safe_search,
        youtube_safe_search: p.youtube_safe_search,
        blocked_services: p
            .blocked_services
            .into_iter()
            .map(BlockedServiceId::new)
            .collect::<ValidationResult<_>>()?,
        schedule: p.schedule.map(schedule_from_schema).transpose()?,
    })
}

fn schedule_to_schema(s: &WeeklySchedule) -> schema::Schedule {
    let day = |i: usize| {
        s.days()[i].map(|iv| schema::DayInterval {
            start: u32::from(iv.start()),
            end: u32::from(iv.end()),
        })
    };

    schema::Schedule {
        time_zone: s.time_zone().name().to_string(),
        mon: day(0),
        tue: day(1),
        wed: day(2),
        thu: day(3),
        fri: day(4),
        sat: day(5),
        sun: day(6),
    }
}

fn schedule_from_schema(s: schema::Schedule) -> ValidationResult<WeeklySchedule> {
    let day = |iv: Option<schema::DayInterval>| -> ValidationResult<Option<DayInterval>> {
        iv.map(|iv| {
            let start = u16::try_from(iv.start)
                .map_err(|_| ValidationError::invalid("start", "minute out of range"))?;
            let end = u16::try_from(iv.end)
                .map_err(|_| ValidationError::invalid("end", "minute out of range"))?;
            DayInterval::new(start, end)
        })
        .transpose()
    };

    let days = [
        day(s.mon)?,
        day(s.tue)?,
        day(s.wed)?,
        day(s.thu)?,
        day(s.fri)?,
        day(s.sat)?,
        day(s.sun)?,
    ];

    WeeklySchedule::new(days, &s.time_zone)
}

// =============================================================================
// Access
// =============================================================================

fn prefix_to_schema(p: &IpPrefix) -> schema::Prefix {
    schema::Prefix {
        addr: ip_to_bytes(&p.addr()),
        len: u32::from(p.len()),
    }
}

fn prefixes_from_schema(field: &str, prefixes: Vec<schema::Prefix>) -> ValidationResult<Vec<IpPrefix>> {
    prefixes
        .into_iter()
        .enumerate()
        .map(|(i, p)| IpPrefix::from_wire(&format!("{field}[{i}]"), &p.addr, p.len))
        .collect()
}

fn access_to_schema(a: &AccessConfig) -> schema::Access {
    schema::Access {
        allowed_nets: a.allowed_nets.iter().map(prefix_to_schema).collect(),
        blocked_nets: a.blocked_nets.iter().map(prefix_to_schema).collect(),
        allowed_asns: a.allowed_asns.iter().map(Asn::get).collect(),
        blocked_asns: a.blocked_asns.iter().map(Asn::get).collect(),
        blocklist_domain_rules: a.blocklist_domain_rules.clone(),
        standard_enabled: a.standard_enabled,
    }
}

fn access_from_schema(a: schema::Access) -> ValidationResult<AccessConfig> {
    Ok(AccessConfig {
        allowed_nets: prefixes_from_schema("allowed_nets", a.allowed_nets)?,
        blocked_nets: prefixes_from_schema("blocked_nets", a.blocked_nets)?,
        allowed_asns: a.allowed_asns.into_iter().map(Asn::new).collect::<ValidationResult<_>>()?,
        blocked_asns: a.blocked_asns.into_iter().map(Asn::new).collect::<ValidationResult<_>>()?,
        blocklist_domain_rules: a.blocklist_domain_rules,
        standard_enabled: a.standard_enabled,
    })
}

// =============================================================================
// Blocking Modes
// =============================================================================

fn blocking_mode_to_schema(m: &BlockingMode) -> schema::BlockingMode {
    let mode = match m {
        BlockingMode::CustomIp { ipv4, ipv6 } => Mode::CustomIp(schema::CustomIp {
            ipv4: ipv4.iter().map(|ip| ip.octets().to_vec()).collect(),
            ipv6: ipv6.iter().map(|ip| ip.octets().to_vec()).collect(),
        }),
        BlockingMode::NxDomain => Mode::NxDomain(schema::Unit {}),
        BlockingMode::NullIp => Mode::NullIp(schema::Unit {}),
        BlockingMode::Refused => Mode::Refused(schema::Unit {}),
    };

    schema::BlockingMode { mode: Some(mode) }
}

fn blocking_mode_from_schema(m: schema::BlockingMode) -> ValidationResult<BlockingMode> {
    match m.mode {
        Some(Mode::CustomIp(c)) => {
            let ipv4 = c
                .ipv4
                .iter()
                .enumerate()
                .map(|(i, b)| match ip_from_bytes(&format!("ipv4[{i}]"), b)? {
                    IpAddr::V4(ip) => Ok(ip),
                    IpAddr::V6(_) => Err(ValidationError::invalid(format!("ipv4[{i}]"), "not IPv4")),
                })
                .collect::<ValidationResult<Vec<Ipv4Addr>>>()?;
            let ipv6 = c
                .ipv6
                .iter()
                .enumerate()
                .map(|(i, b)| match ip_from_bytes(&format!("ipv6[{i}]"), b)? {
                    IpAddr::V6(ip) => Ok(ip),
                    IpAddr::V4(_) => Err(ValidationError::invalid(format!("ipv6[{i}]"), "not IPv6")),
                })
                .collect::<ValidationResult<Vec<Ipv6Addr>>>()?;

            BlockingMode::custom_ip(ipv4, ipv6)
        }
        Some(Mode::NxDomain(_)) => Ok(BlockingMode::NxDomain),
        Some(Mode::NullIp(_)) => Ok(BlockingMode::NullIp),
        Some(Mode::Refused(_)) => Ok(BlockingMode::Refused),
        None => Err(ValidationError::required("blocking_mode")),
    }
}

// =============================================================================
// Custom Domains
// =============================================================================

fn custom_domain_to_schema(d: &CustomDomain) -> schema::CustomDomain {
    let state = match &d.state {
        CustomDomainState::Pending {
            well_known_path,
            expire,
        } => State::Pending(schema::PendingDomain {
            well_known_path: well_known_path.clone(),
            expire: Some(timestamp_to_schema(expire)),
        }),
        CustomDomainState::Current {
            cert_name,
            not_before,
            not_after,
            enabled,
        } => State::Current(schema::CurrentDomain {
            cert_name: cert_name.to_string(),
            not_before: Some(timestamp_to_schema(not_before)),
            not_after: Some(timestamp_to_schema(not_after)),
            enabled: *enabled,
        }),
    };

    schema::CustomDomain {
        domains: d.domains.clone(),
        state: Some(state),
    }
}

fn custom_domain_from_schema(d: schema::CustomDomain) -> ValidationResult<CustomDomain> {
    let state = match d.state {
        Some(State::Pending(p)) => {
            CustomDomainState::pending(p.well_known_path, timestamp_from_schema("expire", p.expire)?)?
        }
        Some(State::Current(c)) => CustomDomainState::current(
            CertName::new(c.cert_name)?,
            timestamp_from_schema("not_before", c.not_before)?,
            timestamp_from_schema("not_after", c.not_after)?,
            c.enabled,
        )?,
        None => return Err(ValidationError::required("state")),
    };

    CustomDomain::new(d.domains, state)
}

// =============================================================================
// Device
// =============================================================================

fn device_to_schema(d: &Device) -> schema::Device {
    schema::Device {
        id: d.id.to_string(),
        name: d.name.to_string(),
        human_id_lower: d
            .human_id_lower
            .as_ref()
            .map(|h| h.as_str().to_string())
            .unwrap_or_default(),
        linked_ip: d.linked_ip.as_ref().map(ip_to_bytes).unwrap_or_default(),
        dedicated_ips: d.dedicated_ips.iter().map(ip_to_bytes).collect(),
        auth_enabled: d.auth.enabled,
        doh_auth_only: d.auth.doh_auth_only,
        password_hash: match &d.auth.password_hash {
            PasswordHash::None => None,
            PasswordHash::Bcrypt(h) => Some(schema::device::PasswordHash::Bcrypt(h.clone())),
        },
        filtering_enabled: d.filtering_enabled,
    }
}

fn device_from_schema(d: schema::Device) -> ValidationResult<Device> {
    let human_id_lower = if d.human_id_lower.is_empty() {
        None
    } else {
        Some(HumanIdLower::new(&d.human_id_lower)?)
    };

    Ok(Device {
        id: DeviceId::new(d.id)?,
        name: DeviceName::new(d.name)?,
        human_id_lower,
        linked_ip: opt_ip_from_bytes("linked_ip", &d.linked_ip)?,
        dedicated_ips: d
            .dedicated_ips
            .iter()
            .enumerate()
            .map(|(i, b)| ip_from_bytes(&format!("dedicated_ips[{i}]"), b))
            .collect::<ValidationResult<_>>()?,
        auth: DeviceAuth {
            enabled: d.auth_enabled,
            doh_auth_only: d.doh_auth_only,
            password_hash: match d.password_hash {
                Some(schema::device::PasswordHash::Bcrypt(h)) => PasswordHash::Bcrypt(h),
                None => PasswordHash::None,
            },
        },
        filtering_enabled: d.filtering_enabled,
    })
}

// =============================================================================
// Time
// =============================================================================

fn timestamp_to_schema(dt: &DateTime<Utc>) -> prost_types::Timestamp {
    prost_types::Timestamp {
        seconds: dt.timestamp(),
        nanos: dt.timestamp_subsec_nanos() as i32,
    }
}

fn timestamp_from_schema(
    field: &str,
    ts: Option<prost_types::Timestamp>,
) -> ValidationResult<DateTime<Utc>> {
    let ts = ts.ok_or_else(|| ValidationError::required(field))?;
    u32::try_from(ts.nanos)
        .ok()
        .and_then(|nanos| DateTime::from_timestamp(ts.seconds, nanos))
        .ok_or_else(|| ValidationError::invalid(field, "timestamp out of range"))
}

fn duration_to_schema(d: Duration) -> prost_types::Duration {
    prost_types::Duration {
        seconds: i64::try_from(d.as_secs()).unwrap_or(i64::MAX),
        nanos: d.subsec_nanos() as i32,
    }
}

fn duration_from_schema(d: Option<prost_types::Duration>) -> ValidationResult<Duration> {
    match d {
        Some(d) => Duration::try_from(d)
            .map_err(|e| ValidationError::invalid("filtered_response_ttl", e.to_string())),
        None => Ok(Duration::ZERO),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use warden_core::DeviceIdSet;

    fn dt(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(secs, 0).unwrap()
    }

    fn profile(id: &str, devices: &[&str]) -> Profile {
        Profile {
            id: ProfileId::new(id).unwrap(),
            account_id: AccountId::new("acc1").unwrap(),
            device_ids: devices.iter().map(|d| DeviceId::new(*d).unwrap()).collect(),
            custom_rules: vec!["||example.org^".to_string()],
            rule_lists: RuleListConfig {
                enabled: true,
                ids: vec![RuleListId::new("adguard_dns_filter").unwrap()],
            },
            parental: ParentalConfig {
                enabled: true,
                block_adult: true,
                general_safe_search: true,
                youtube_safe_search: false,
                blocked_services: vec![BlockedServiceId::new("tiktok").unwrap()],
                schedule: Some(
                    WeeklySchedule::new(
                        [
                            Some(DayInterval::new(0, 480).unwrap()),
                            None,
                            None,
                            None,
                            None,
                            Some(DayInterval::new(600, 1440).unwrap()),
                            None,
                        ],
                        "Europe/Berlin",
                    )
                    .unwrap(),
                ),
            },
            safe_browsing: SafeBrowsingConfig {
                enabled: true,
                block_dangerous_domains: true,
                block_newly_registered_domains: false,
            },
            access: AccessConfig {
                allowed_nets: vec!["192.0.2.0/24".parse().unwrap()],
                blocked_nets: vec!["2001:db8::/32".parse().unwrap()],
                allowed_asns: vec![Asn::new(64496).unwrap()],
                blocked_asns: vec![Asn::new(64511).unwrap()],
                blocklist_domain_rules: vec!["|blocked.example^".to_string()],
                standard_enabled: true,
            },
            ratelimit: RatelimitConfig::enabled(100, vec!["10.0.0.0/8".parse().unwrap()]),
            blocking_mode: BlockingMode::custom_ip(
                vec!["192.0.2.10".parse().unwrap()],
                vec!["2001:db8::10".parse().unwrap()],
            )
            .unwrap(),
            adult_blocking_mode: Some(BlockingMode::NxDomain),
            safe_browsing_blocking_mode: Some(BlockingMode::Refused),
            filtered_response_ttl: Duration::from_secs(10),
            custom_domains: CustomDomainConfig {
                enabled: true,
                domains: vec![
                    CustomDomain::new(
                        vec!["dns.example.com".to_string()],
                        CustomDomainState::pending("/.well-known/pki-validation/abc", dt(2_000))
                            .unwrap(),
                    )
                    .unwrap(),
                    CustomDomain::new(
                        vec!["*.example.net".to_string(), "example.net".to_string()],
                        CustomDomainState::current(
                            CertName::new("cert1").unwrap(),
                            dt(1_000),
                            dt(5_000),
                            true,
                        )
                        .unwrap(),
                    )
                    .unwrap(),
                ],
            },
            flags: ProfileFlags {
                filtering_enabled: true,
                query_log_enabled: true,
                ip_log_enabled: false,
                auto_devices_enabled: true,
                block_chrome_prefetch: true,
                block_firefox_canary: true,
                block_private_relay: false,
            },
            deleted: false,
        }
    }

    fn device(id: &str) -> Device {
        Device {
            id: DeviceId::new(id).unwrap(),
            name: DeviceName::new("Living room TV").unwrap(),
            human_id_lower: Some(HumanIdLower::new("my-tv").unwrap()),
            linked_ip: Some("198.51.100.7".parse().unwrap()),
            dedicated_ips: vec!["192.0.2.1".parse().unwrap()],
            auth: DeviceAuth {
                enabled: true,
                doh_auth_only: true,
                password_hash: PasswordHash::Bcrypt(b"$2y$10$hash".to_vec()),
            },
            filtering_enabled: true,
        }
    }

    #[test]
    fn test_roundtrip_full_snapshot() {
        let mut plain = profile("prof2", &[]);
        plain.blocking_mode = BlockingMode::NullIp;
        plain.adult_blocking_mode = None;
        plain.safe_browsing_blocking_mode = None;
        plain.parental.schedule = None;
        plain.custom_domains = CustomDomainConfig::default();

        let mut bare = device("dev2");
        bare.human_id_lower = None;
        bare.linked_ip = None;
        bare.dedicated_ips.clear();
        bare.auth = DeviceAuth::default();

        let cache = FileCache::new(
            SyncTime::from_millis(1_700_000_000_000),
            vec![profile("prof1", &["dev1", "dev2"]), plain],
            vec![device("dev1"), bare],
        );

        let bytes = encode(&cache);
        let decoded = decode(&bytes).unwrap();
        assert_eq!(decoded, cache);
        assert_eq!(encode(&decoded), bytes);
    }

    #[test]
    fn test_version_checked_first() {
        let mut cache = FileCache::new(SyncTime::EPOCH, vec![profile("prof1", &[])], vec![]);
        cache.version = FILE_CACHE_VERSION + 1;

        let err = decode(&encode(&cache)).unwrap_err();
        assert!(matches!(
            err,
            CacheError::VersionMismatch { found, expected }
                if found == FILE_CACHE_VERSION + 1 && expected == FILE_CACHE_VERSION
        ));
    }

    #[test]
    fn test_invalid_entity_rejected() {
        let mut msg = schema::FileCache::decode(
            encode(&FileCache::new(SyncTime::EPOCH, vec![profile("prof1", &[])], vec![])).as_slice(),
        )
        .unwrap();
        msg.profiles[0].blocking_mode = Some(schema::BlockingMode {
            mode: Some(Mode::CustomIp(schema::CustomIp::default())),
        });

        let err = decode(&msg.encode_to_vec()).unwrap_err();
        assert!(matches!(err, CacheError::Invalid { .. }));
        assert!(err.is_stale());
    }

    #[test]
    fn test_empty_input_is_version_zero() {
        let err = decode(&[]).unwrap_err();
        assert!(matches!(err, CacheError::VersionMismatch { found: 0, .. }));
    }

    #[test]
    fn test_device_ids_stay_a_set() {
        let cache = FileCache::new(SyncTime::EPOCH, vec![profile("prof1", &["b", "a"])], vec![]);
        let decoded = decode(&encode(&cache)).unwrap();

        let expected: DeviceIdSet = ["a", "b"].iter().map(|d| DeviceId::new(*d).unwrap()).collect();
        assert_eq!(decoded.profiles[0].device_ids, expected);
    }
}
