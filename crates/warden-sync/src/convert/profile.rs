//! Profile records.
//!
//! ## Device Lists
//! ```text
//! ┌──────────────┬──────────────────────┬─────────────────────────────────┐
//! │ sync kind    │ populated field      │ DeviceUpdate                    │
//! ├──────────────┼──────────────────────┼─────────────────────────────────┤
//! │ full         │ devices (or nothing) │ Replace(valid devices)          │
//! │ incremental  │ device_changes       │ Patch { upserted, deleted }     │
//! │ incremental  │ devices              │ Replace(valid devices)          │
//! │ incremental  │ nothing              │ Unchanged                       │
//! │ any          │ deleted profile      │ Replace(empty)                  │
//! └──────────────┴──────────────────────┴─────────────────────────────────┘
//! ```

use std::collections::BTreeMap;
use std::time::Duration;

use tracing::debug;
use warden_core::{
    AccountId, BlockingMode, Device, DeviceChangeId, DeviceId, DeviceIdSet, DeviceUpdate,
    Profile, ProfileFlags, ProfileId, RuleListConfig, RuleListId, SafeBrowsingConfig, SyncKind,
    ValidationError, ValidationResult,
};

use super::access::{access_from_wire, ratelimit_from_wire};
use super::blocking::blocking_mode_from_wire;
use super::custom_domain::custom_domains_from_wire;
use super::device::device_from_wire;
use super::schedule::parental_from_wire;
use super::{duration_from_wire, Conversion};
use crate::proto::{device_settings_change::Change, DeviceSettings, DeviceSettingsChange, DnsProfile};

/// TTL of blocked responses when the backend sends none.
pub(crate) const DEFAULT_FILTERED_RESPONSE_TTL: Duration = Duration::from_secs(10);

/// A converted profile record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ConvertedProfile {
    pub(crate) profile: Profile,
    /// Devices carried by the record: the full list or the upserted ones.
    pub(crate) devices: Vec<Device>,
    pub(crate) device_update: DeviceUpdate,
}

/// Converts one profile record.
///
/// Returns a hard error when the profile as a whole cannot be trusted; soft
/// errors are left in `cx`.
pub(crate) fn profile_from_wire(
    p: DnsProfile,
    kind: SyncKind,
    cx: &mut Conversion<'_>,
) -> ValidationResult<ConvertedProfile> {
    let id = ProfileId::new(p.dns_id)?;
    let account_id = AccountId::new(p.account_id)?;

    if p.deleted {
        return Ok(deleted_profile(id, account_id));
    }

    let (devices, device_update) = devices_from_wire(p.devices, p.device_changes, kind, cx);
    let device_ids = match &device_update {
        DeviceUpdate::Replace(ids) => ids.clone(),
        DeviceUpdate::Patch { upserted, .. } => upserted.clone(),
        DeviceUpdate::Unchanged => DeviceIdSet::new(),
    };

    let blocking_mode =
        blocking_mode_from_wire("blocking_mode", p.blocking_mode, cx)?.unwrap_or_default();
    let adult_blocking_mode = blocking_mode_from_wire("adult_blocking_mode", p.adult_blocking_mode, cx)?;
    let safe_browsing_blocking_mode =
        blocking_mode_from_wire("safe_browsing_blocking_mode", p.safe_browsing_blocking_mode, cx)?;

    let filtered_response_ttl = p
        .filtered_response_ttl
        .map(|d| duration_from_wire("filtered_response_ttl", d))
        .transpose()?
        .unwrap_or(DEFAULT_FILTERED_RESPONSE_TTL);

    let rule_lists = match p.rule_lists {
        Some(r) => RuleListConfig {
            enabled: r.enabled,
            ids: cx.collect_valid("rule_lists.ids", r.ids, RuleListId::new),
        },
        None => RuleListConfig::default(),
    };

    let safe_browsing = p
        .safe_browsing
        .map(|s| SafeBrowsingConfig {
            enabled: s.enabled,
            block_dangerous_domains: s.block_dangerous_domains,
            block_newly_registered_domains: s.block_nrd,
        })
        .unwrap_or_default();

    let profile = Profile {
        id,
        account_id,
        device_ids,
        custom_rules: p
            .custom_rules
            .into_iter()
            .filter(|r| !r.trim().is_empty())
            .collect(),
        rule_lists,
        parental: parental_from_wire(p.parental, cx)?,
        safe_browsing,
        access: access_from_wire(p.access, cx),
        ratelimit: ratelimit_from_wire(p.ratelimit, cx),
        blocking_mode,
        adult_blocking_mode,
        safe_browsing_blocking_mode,
        filtered_response_ttl,
        custom_domains: custom_domains_from_wire(p.custom_domain, cx),
        flags: ProfileFlags {
            filtering_enabled: p.filtering_enabled,
            query_log_enabled: p.query_log_enabled,
            ip_log_enabled: p.ip_log_enabled,
            auto_devices_enabled: p.auto_devices_enabled,
            block_chrome_prefetch: p.block_chrome_prefetch,
            block_firefox_canary: p.block_firefox_canary,
            block_private_relay: p.block_private_relay,
        },
        deleted: false,
    };

    Ok(ConvertedProfile {
        profile,
        devices,
        device_update,
    })
}

fn deleted_profile(id: ProfileId, account_id: AccountId) -> ConvertedProfile {
    ConvertedProfile {
        profile: Profile {
            id,
            account_id,
            device_ids: DeviceIdSet::new(),
            custom_rules: Vec::new(),
            rule_lists: RuleListConfig::default(),
            parental: Default::default(),
            safe_browsing: SafeBrowsingConfig::default(),
            access: Default::default(),
            ratelimit: Default::default(),
            blocking_mode: BlockingMode::default(),
            adult_blocking_mode: None,
            safe_browsing_blocking_mode: None,
            filtered_response_ttl: DEFAULT_FILTERED_RESPONSE_TTL,
            custom_domains: Default::default(),
            flags: ProfileFlags::default(),
            deleted: true,
        },
        devices: Vec::new(),
        device_update: DeviceUpdate::Replace(DeviceIdSet::new()),
    }
}

// =============================================================================
// Devices
// =============================================================================

fn devices_from_wire(
    devices: Vec<DeviceSettings>,
    changes: Vec<DeviceSettingsChange>,
    kind: SyncKind,
    cx: &mut Conversion<'_>,
) -> (Vec<Device>, DeviceUpdate) {
    match kind {
        SyncKind::Full => {
            if !changes.is_empty() {
                cx.report(ValidationError::invalid(
                    "device_changes",
                    "ignored in a full sync",
                ));
            }
            full_list(devices, cx)
        }
        SyncKind::Incremental if !changes.is_empty() => {
            if !devices.is_empty() {
                cx.report(ValidationError::invalid(
                    "devices",
                    "ignored when device_changes is set",
                ));
            }
            patch(changes, cx)
        }
        SyncKind::Incremental if !devices.is_empty() => full_list(devices, cx),
        SyncKind::Incremental => (Vec::new(), DeviceUpdate::Unchanged),
    }
}

fn full_list(devices: Vec<DeviceSettings>, cx: &mut Conversion<'_>) -> (Vec<Device>, DeviceUpdate) {
    let mut by_id = BTreeMap::new();
    for (i, d) in devices.into_iter().enumerate() {
        match device_from_wire(d, cx.bind_set()) {
            Ok(dev) => {
                if let Some(prev) = by_id.insert(dev.id.clone(), dev) {
                    debug!(device_id = %prev.id, "Duplicate device in list, keeping the last");
                }
            }
            Err(e) => cx.report_invalid_device(e.within(&format!("devices[{i}]"))),
        }
    }

    let ids = by_id.keys().cloned().collect();
    (by_id.into_values().collect(), DeviceUpdate::Replace(ids))
}

/// Applies the changes in order; the last change to a device wins, so the
/// returned devices are exactly the patch's upserted set.
fn patch(changes: Vec<DeviceSettingsChange>, cx: &mut Conversion<'_>) -> (Vec<Device>, DeviceUpdate) {
    let mut upserted: BTreeMap<DeviceId, Device> = BTreeMap::new();
    let mut ids = Vec::with_capacity(changes.len());

    for (i, change) in changes.into_iter().enumerate() {
        let field = format!("device_changes[{i}]");
        let converted = match change.change {
            Some(Change::Deleted(d)) => DeviceId::new(d.device_id).map(|id| {
                upserted.remove(&id);
                DeviceChangeId::Deleted(id)
            }),
            Some(Change::Upserted(u)) => u
                .device
                .ok_or_else(|| ValidationError::required("device"))
                .and_then(|d| device_from_wire(d, cx.bind_set()))
                .map(|dev| {
                    let id = dev.id.clone();
                    upserted.insert(id.clone(), dev);
                    DeviceChangeId::Upserted(id)
                }),
            None => Err(ValidationError::required("change")),
        };

        match converted {
            Ok(id) => ids.push(id),
            Err(e) => cx.report_invalid_device(e.within(&field)),
        }
    }

    (upserted.into_values().collect(), DeviceUpdate::patch(ids))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::proto::{
        blocking_mode_settings::Mode, BlockingModeCustomIp, BlockingModeRefused,
        BlockingModeSettings, DeletedDevice, UpsertedDevice,
    };
    use crate::testutil::{wire_device, wire_profile};
    use warden_core::BindSet;

    fn ids(list: &[&str]) -> DeviceIdSet {
        list.iter().map(|s| DeviceId::new(*s).unwrap()).collect()
    }

    fn upsert(d: DeviceSettings) -> DeviceSettingsChange {
        DeviceSettingsChange {
            change: Some(Change::Upserted(UpsertedDevice { device: Some(d) })),
        }
    }

    fn delete(id: &str) -> DeviceSettingsChange {
        DeviceSettingsChange {
            change: Some(Change::Deleted(DeletedDevice {
                device_id: id.to_string(),
            })),
        }
    }

    #[test]
    fn test_invalid_device_is_isolated() {
        let bind_set = BindSet::default();
        let mut cx = Conversion::new(&bind_set);

        let mut bad = wire_device("dev2", "Broken");
        bad.linked_ip = vec![1, 2, 3];
        let p = wire_profile("prof1", vec![wire_device("dev1", "Phone"), bad]);

        let got = profile_from_wire(p, SyncKind::Full, &mut cx).unwrap();
        assert_eq!(got.devices.len(), 1);
        assert_eq!(got.devices[0].id.as_str(), "dev1");
        assert_eq!(got.device_update, DeviceUpdate::Replace(ids(&["dev1"])));
        assert_eq!(got.profile.device_ids, ids(&["dev1"]));

        assert_eq!(cx.invalid_devices(), 1);
        let errors = cx.take_errors();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].field().starts_with("devices[1]"));
    }

    #[test]
    fn test_full_sync_without_devices_means_none() {
        let bind_set = BindSet::default();
        let mut cx = Conversion::new(&bind_set);

        let got = profile_from_wire(wire_profile("prof1", vec![]), SyncKind::Full, &mut cx).unwrap();
        assert_eq!(got.device_update, DeviceUpdate::Replace(DeviceIdSet::new()));
    }

    #[test]
    fn test_incremental_without_devices_is_unchanged() {
        let bind_set = BindSet::default();
        let mut cx = Conversion::new(&bind_set);

        let got =
            profile_from_wire(wire_profile("prof1", vec![]), SyncKind::Incremental, &mut cx).unwrap();
        assert_eq!(got.device_update, DeviceUpdate::Unchanged);
        assert!(got.profile.device_ids.is_empty());
    }

    #[test]
    fn test_incremental_device_list_replaces() {
        let bind_set = BindSet::default();
        let mut cx = Conversion::new(&bind_set);

        let p = wire_profile("prof1", vec![wire_device("dev1", "Phone")]);
        let got = profile_from_wire(p, SyncKind::Incremental, &mut cx).unwrap();
        assert_eq!(got.device_update, DeviceUpdate::Replace(ids(&["dev1"])));
    }

    #[test]
    fn test_incremental_changes_patch() {
        let bind_set = BindSet::default();
        let mut cx = Conversion::new(&bind_set);

        let mut p = wire_profile("prof1", vec![]);
        p.device_changes = vec![
            upsert(wire_device("a", "A")),
            delete("b"),
            delete("not valid!"),
            DeviceSettingsChange { change: None },
        ];

        let got = profile_from_wire(p, SyncKind::Incremental, &mut cx).unwrap();
        assert_eq!(
            got.device_update,
            DeviceUpdate::Patch {
                upserted: ids(&["a"]),
                deleted: ids(&["b"]),
            }
        );
        assert_eq!(got.devices.len(), 1);
        assert_eq!(got.devices[0].id.as_str(), "a");
        assert_eq!(cx.invalid_devices(), 2);
    }

    #[test]
    fn test_patch_last_change_wins() {
        let bind_set = BindSet::default();
        let mut cx = Conversion::new(&bind_set);

        let mut p = wire_profile("prof1", vec![]);
        p.device_changes = vec![
            upsert(wire_device("a", "A")),
            upsert(wire_device("a", "A2")),
            delete("a"),
            upsert(wire_device("b", "B")),
            upsert(wire_device("b", "B2")),
        ];

        let got = profile_from_wire(p, SyncKind::Incremental, &mut cx).unwrap();
        assert_eq!(
            got.device_update,
            DeviceUpdate::Patch {
                upserted: ids(&["b"]),
                deleted: ids(&["a"]),
            }
        );
        assert_eq!(got.devices.len(), 1);
        assert_eq!(got.devices[0].id.as_str(), "b");
        assert_eq!(got.devices[0].name.as_str(), "B2");
        assert!(cx.take_errors().is_empty());
    }

    #[test]
    fn test_full_list_repeated_id_keeps_last() {
        let bind_set = BindSet::default();
        let mut cx = Conversion::new(&bind_set);

        let p = wire_profile(
            "prof1",
            vec![wire_device("dev1", "Old"), wire_device("dev2", "Tablet"), wire_device("dev1", "New")],
        );

        let got = profile_from_wire(p, SyncKind::Full, &mut cx).unwrap();
        assert_eq!(got.device_update, DeviceUpdate::Replace(ids(&["dev1", "dev2"])));
        assert_eq!(got.devices.len(), 2);
        let dev1 = got.devices.iter().find(|d| d.id.as_str() == "dev1").unwrap();
        assert_eq!(dev1.name.as_str(), "New");
    }

    #[test]
    fn test_full_sync_ignores_changes() {
        let bind_set = BindSet::default();
        let mut cx = Conversion::new(&bind_set);

        let mut p = wire_profile("prof1", vec![wire_device("dev1", "Phone")]);
        p.device_changes = vec![delete("dev1")];

        let got = profile_from_wire(p, SyncKind::Full, &mut cx).unwrap();
        assert_eq!(got.device_update, DeviceUpdate::Replace(ids(&["dev1"])));
        assert_eq!(cx.take_errors()[0].field(), "device_changes");
    }

    #[test]
    fn test_blocking_mode_defaults() {
        let bind_set = BindSet::default();
        let mut cx = Conversion::new(&bind_set);

        let got = profile_from_wire(wire_profile("prof1", vec![]), SyncKind::Full, &mut cx).unwrap();
        assert_eq!(got.profile.blocking_mode, BlockingMode::NullIp);
        assert_eq!(got.profile.adult_blocking_mode, None);
        assert_eq!(got.profile.safe_browsing_blocking_mode, None);
        assert_eq!(got.profile.filtered_response_ttl, DEFAULT_FILTERED_RESPONSE_TTL);

        let mut p = wire_profile("prof1", vec![]);
        p.adult_blocking_mode = Some(BlockingModeSettings {
            mode: Some(Mode::Refused(BlockingModeRefused {})),
        });
        let got = profile_from_wire(p, SyncKind::Full, &mut cx).unwrap();
        assert_eq!(got.profile.adult_blocking_mode, Some(BlockingMode::Refused));
        assert_eq!(got.profile.effective_safe_browsing_blocking_mode(), &BlockingMode::NullIp);
    }

    #[test]
    fn test_empty_custom_ip_rejects_profile() {
        let bind_set = BindSet::default();
        let mut cx = Conversion::new(&bind_set);

        let mut p = wire_profile("prof1", vec![]);
        p.blocking_mode = Some(BlockingModeSettings {
            mode: Some(Mode::CustomIp(BlockingModeCustomIp {
                ipv4: vec![vec![1, 2, 3]],
                ipv6: vec![],
            })),
        });

        assert!(profile_from_wire(p, SyncKind::Full, &mut cx).is_err());
    }

    #[test]
    fn test_bad_ids_reject_profile() {
        let bind_set = BindSet::default();
        let mut cx = Conversion::new(&bind_set);

        let bad_id = wire_profile("", vec![]);
        assert!(profile_from_wire(bad_id, SyncKind::Full, &mut cx).is_err());

        let mut bad_account = wire_profile("prof1", vec![]);
        bad_account.account_id = "acc 1".to_string();
        assert!(profile_from_wire(bad_account, SyncKind::Full, &mut cx).is_err());
    }

    #[test]
    fn test_deleted_profile_skips_settings() {
        let bind_set = BindSet::default();
        let mut cx = Conversion::new(&bind_set);

        let mut p = wire_profile("prof1", vec![wire_device("dev1", "Phone")]);
        p.deleted = true;
        p.blocking_mode = Some(BlockingModeSettings {
            mode: Some(Mode::CustomIp(BlockingModeCustomIp::default())),
        });

        let got = profile_from_wire(p, SyncKind::Incremental, &mut cx).unwrap();
        assert!(got.profile.deleted);
        assert!(got.devices.is_empty());
        assert_eq!(got.device_update, DeviceUpdate::Replace(DeviceIdSet::new()));
        assert!(cx.take_errors().is_empty());
    }

    #[test]
    fn test_settings_and_flags() {
        let bind_set = BindSet::default();
        let mut cx = Conversion::new(&bind_set);

        let mut p = wire_profile("prof1", vec![]);
        p.custom_rules = vec!["||a.example^".to_string(), "  ".to_string()];
        p.rule_lists = Some(crate::proto::RuleListsSettings {
            enabled: true,
            ids: vec!["adguard_dns".to_string(), "bad id".to_string()],
        });
        p.filtered_response_ttl = Some(prost_types::Duration {
            seconds: 60,
            nanos: 0,
        });
        p.block_private_relay = true;
        p.query_log_enabled = true;

        let got = profile_from_wire(p, SyncKind::Full, &mut cx).unwrap().profile;
        assert_eq!(got.custom_rules, vec!["||a.example^".to_string()]);
        assert!(got.rule_lists.enabled);
        assert_eq!(got.rule_lists.ids.len(), 1);
        assert_eq!(got.filtered_response_ttl, Duration::from_secs(60));
        assert!(got.flags.block_private_relay && got.flags.query_log_enabled);
        assert!(got.flags.filtering_enabled);
        assert_eq!(cx.take_errors().len(), 1);
    }
}
