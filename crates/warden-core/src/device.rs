//! # Devices
//!
//! Devices belong to a profile and are how DNS clients are identified:
//! by device ID in the DoH path or TLS server name, by linked IP, or by a
//! dedicated IP of the service.
//!
//! ## Device Updates
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      DeviceUpdate per Profile                           │
//! │                                                                         │
//! │  Replace(ids)       full list: the profile has exactly these devices    │
//! │  Patch{up, del}     change list: add/refresh `up`, drop `del`           │
//! │  Unchanged          incremental sync without device information         │
//! │                                                                         │
//! │  apply(current):                                                        │
//! │    Replace   → current = ids                                            │
//! │    Patch     → current = (current − del) ∪ up                           │
//! │    Unchanged → current                                                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::BTreeSet;
use std::net::IpAddr;

use crate::error::{ValidationError, ValidationResult};
use crate::ids::{DeviceId, DeviceName, HumanIdLower};
use crate::net::BindSet;

/// Set of device IDs. A set, so it never holds duplicates.
pub type DeviceIdSet = BTreeSet<DeviceId>;

// =============================================================================
// Authentication
// =============================================================================

/// Hash of the password a device must present in DoH basic authentication.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum PasswordHash {
    /// No password configured; any credentials are accepted.
    #[default]
    None,
    /// bcrypt hash of the password.
    Bcrypt(Vec<u8>),
}

/// Authentication settings of a device.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DeviceAuth {
    /// Whether authentication is enabled.
    pub enabled: bool,
    /// Whether the device may only be reached via DoH.
    pub doh_auth_only: bool,
    /// Password hash variant.
    pub password_hash: PasswordHash,
}

// =============================================================================
// Device
// =============================================================================

/// A device of a profile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Device {
    /// Unique device ID.
    pub id: DeviceId,
    /// Human-readable name.
    pub name: DeviceName,
    /// Lower-cased human ID, set for auto-provisioned devices.
    pub human_id_lower: Option<HumanIdLower>,
    /// Client IP linked to the device for plain-DNS identification.
    pub linked_ip: Option<IpAddr>,
    /// Service addresses dedicated to this device.
    pub dedicated_ips: Vec<IpAddr>,
    /// Authentication settings.
    pub auth: DeviceAuth,
    /// Whether filtering is enabled for the device.
    pub filtering_enabled: bool,
}

impl Device {
    /// Checks that every dedicated IP lies inside the bind set.
    pub fn check_dedicated_ips(&self, bind_set: &BindSet) -> ValidationResult<()> {
        check_dedicated_ips(&self.dedicated_ips, bind_set)
    }
}

/// Checks that every address in `ips` lies inside `bind_set`.
pub fn check_dedicated_ips(ips: &[IpAddr], bind_set: &BindSet) -> ValidationResult<()> {
    for (i, ip) in ips.iter().enumerate() {
        if !bind_set.contains(ip) {
            return Err(ValidationError::invalid(
                format!("dedicated_ips[{i}]"),
                format!("{ip} is not in the bind set"),
            ));
        }
    }

    Ok(())
}

/// Operating system reported when a device is auto-provisioned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeviceType {
    Windows,
    Android,
    MacOs,
    Ios,
    Linux,
    Router,
    SmartTv,
    GameConsole,
    Other,
}

impl DeviceType {
    /// Short name, for logs.
    pub fn name(&self) -> &'static str {
        match self {
            DeviceType::Windows => "win",
            DeviceType::Android => "adr",
            DeviceType::MacOs => "mac",
            DeviceType::Ios => "ios",
            DeviceType::Linux => "lnx",
            DeviceType::Router => "rtr",
            DeviceType::SmartTv => "stv",
            DeviceType::GameConsole => "gam",
            DeviceType::Other => "otr",
        }
    }
}

// =============================================================================
// Device Updates
// =============================================================================

/// What a sync response says about a profile's set of devices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeviceUpdate {
    /// The complete device set; replaces whatever the caller had.
    Replace(DeviceIdSet),
    /// A patch. The two sets are always disjoint.
    Patch {
        upserted: DeviceIdSet,
        deleted: DeviceIdSet,
    },
    /// No device information; keep the current set.
    Unchanged,
}

impl DeviceUpdate {
    /// Builds a patch from changes in the order received. A later change to
    /// the same device overrides an earlier one, so the result never lists a
    /// device as both upserted and deleted.
    pub fn patch<I>(changes: I) -> Self
    where
        I: IntoIterator<Item = DeviceChangeId>,
    {
        let mut upserted = DeviceIdSet::new();
        let mut deleted = DeviceIdSet::new();

        for change in changes {
            match change {
                DeviceChangeId::Upserted(id) => {
                    deleted.remove(&id);
                    upserted.insert(id);
                }
                DeviceChangeId::Deleted(id) => {
                    upserted.remove(&id);
                    deleted.insert(id);
                }
            }
        }

        DeviceUpdate::Patch { upserted, deleted }
    }

    /// Applies the update to the caller's current set.
    pub fn apply(&self, current: &mut DeviceIdSet) {
        match self {
            DeviceUpdate::Replace(ids) => current.clone_from(ids),
            DeviceUpdate::Patch { upserted, deleted } => {
                current.retain(|id| !deleted.contains(id));
                current.extend(upserted.iter().cloned());
            }
            DeviceUpdate::Unchanged => {}
        }
    }

    /// Whether the update replaces the whole set.
    pub fn is_full(&self) -> bool {
        matches!(self, DeviceUpdate::Replace(_))
    }
}

/// A single device change, reduced to the affected ID.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeviceChangeId {
    Upserted(DeviceId),
    Deleted(DeviceId),
}
