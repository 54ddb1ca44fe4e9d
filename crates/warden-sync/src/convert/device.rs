//! Device records.

use warden_core::device::check_dedicated_ips;
use warden_core::net::{ip_from_bytes, opt_ip_from_bytes};
use warden_core::{
    BindSet, Device, DeviceAuth, DeviceId, DeviceName, DeviceType, HumanIdLower, PasswordHash,
    ValidationResult,
};

use crate::proto::{self, authentication_settings::DohPasswordHash, AuthenticationSettings, DeviceSettings};

/// Converts one device. Any failure rejects the whole device.
pub(crate) fn device_from_wire(d: DeviceSettings, bind_set: &BindSet) -> ValidationResult<Device> {
    let id = DeviceId::new(d.id)?;
    let name = DeviceName::new(d.name)?;

    let human_id_lower = if d.human_id_lower.is_empty() {
        None
    } else {
        Some(HumanIdLower::new(&d.human_id_lower)?)
    };

    let linked_ip = opt_ip_from_bytes("linked_ip", &d.linked_ip)?;
    let dedicated_ips = d
        .dedicated_ips
        .iter()
        .enumerate()
        .map(|(i, b)| ip_from_bytes(&format!("dedicated_ips[{i}]"), b))
        .collect::<ValidationResult<Vec<_>>>()?;
    check_dedicated_ips(&dedicated_ips, bind_set)?;

    Ok(Device {
        id,
        name,
        human_id_lower,
        linked_ip,
        dedicated_ips,
        auth: auth_from_wire(d.authentication),
        filtering_enabled: d.filtering_enabled,
    })
}

fn auth_from_wire(a: Option<AuthenticationSettings>) -> DeviceAuth {
    let Some(a) = a else {
        return DeviceAuth::default();
    };

    let password_hash = match a.doh_password_hash {
        Some(DohPasswordHash::PasswordHashBcrypt(hash)) if !hash.is_empty() => {
            PasswordHash::Bcrypt(hash)
        }
        _ => PasswordHash::None,
    };

    DeviceAuth {
        enabled: a.enabled,
        doh_auth_only: a.doh_auth_only,
        password_hash,
    }
}

pub(crate) fn device_type_to_wire(t: DeviceType) -> proto::DeviceType {
    match t {
        DeviceType::Windows => proto::DeviceType::Windows,
        DeviceType::Android => proto::DeviceType::Android,
        DeviceType::MacOs => proto::DeviceType::MacOs,
        DeviceType::Ios => proto::DeviceType::Ios,
        DeviceType::Linux => proto::DeviceType::Linux,
        DeviceType::Router => proto::DeviceType::Router,
        DeviceType::SmartTv => proto::DeviceType::SmartTv,
        DeviceType::GameConsole => proto::DeviceType::GameConsole,
        DeviceType::Other => proto::DeviceType::Other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::wire_device;

    fn bind_set() -> BindSet {
        BindSet::new(vec!["192.0.2.0/24".parse().unwrap()])
    }

    #[test]
    fn test_full_device() {
        let mut d = wire_device("dev1", "Phone");
        d.human_id_lower = "My-Phone".to_string();
        d.linked_ip = vec![198, 51, 100, 7];
        d.dedicated_ips = vec![vec![192, 0, 2, 10]];
        d.authentication = Some(AuthenticationSettings {
            enabled: true,
            doh_auth_only: true,
            doh_password_hash: Some(DohPasswordHash::PasswordHashBcrypt(b"$2y$hash".to_vec())),
        });

        let dev = device_from_wire(d, &bind_set()).unwrap();
        assert_eq!(dev.id.as_str(), "dev1");
        assert_eq!(dev.human_id_lower.unwrap().as_str(), "my-phone");
        assert_eq!(dev.linked_ip, Some("198.51.100.7".parse().unwrap()));
        assert_eq!(dev.dedicated_ips, vec!["192.0.2.10".parse::<std::net::IpAddr>().unwrap()]);
        assert!(dev.auth.enabled && dev.auth.doh_auth_only);
        assert_eq!(dev.auth.password_hash, PasswordHash::Bcrypt(b"$2y$hash".to_vec()));
    }

    #[test]
    fn test_minimal_device_defaults() {
        let dev = device_from_wire(wire_device("dev2", "Laptop"), &BindSet::default()).unwrap();
        assert_eq!(dev.linked_ip, None);
        assert!(dev.dedicated_ips.is_empty());
        assert_eq!(dev.auth, DeviceAuth::default());
    }

    #[test]
    fn test_rejects_bad_device() {
        let mut bad_ip = wire_device("dev1", "Phone");
        bad_ip.linked_ip = vec![1, 2, 3];

        let mut outside = wire_device("dev1", "Phone");
        outside.dedicated_ips = vec![vec![203, 0, 113, 1]];

        let bad_id = wire_device("dev-with-long-id", "Phone");
        let bad_name = wire_device("dev1", "");

        for d in [bad_ip, outside, bad_id, bad_name] {
            assert!(device_from_wire(d, &bind_set()).is_err());
        }
    }
}
