//! # Network Types
//!
//! IP prefixes (CIDR ranges), the service's bind set, and helpers to decode
//! addresses from their raw big-endian byte form.

use std::fmt;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{ValidationError, ValidationResult};

// =============================================================================
// Address Decoding
// =============================================================================

/// Decodes an address from 4 (IPv4) or 16 (IPv6) raw bytes.
pub fn ip_from_bytes(field: &str, bytes: &[u8]) -> ValidationResult<IpAddr> {
    match bytes.len() {
        4 => {
            let mut octets = [0u8; 4];
            octets.copy_from_slice(bytes);
            Ok(IpAddr::V4(Ipv4Addr::from(octets)))
        }
        16 => {
            let mut octets = [0u8; 16];
            octets.copy_from_slice(bytes);
            Ok(IpAddr::V6(Ipv6Addr::from(octets)))
        }
        n => Err(ValidationError::invalid(
            field,
            format!("bad ip length {n}, want 4 or 16"),
        )),
    }
}

/// Decodes an optional address: an empty slice means "not set".
pub fn opt_ip_from_bytes(field: &str, bytes: &[u8]) -> ValidationResult<Option<IpAddr>> {
    if bytes.is_empty() {
        return Ok(None);
    }

    ip_from_bytes(field, bytes).map(Some)
}

/// Encodes an address as raw bytes, the inverse of [`ip_from_bytes`].
pub fn ip_to_bytes(ip: &IpAddr) -> Vec<u8> {
    match ip {
        IpAddr::V4(v4) => v4.octets().to_vec(),
        IpAddr::V6(v6) => v6.octets().to_vec(),
    }
}

// =============================================================================
// IP Prefix
// =============================================================================

/// A CIDR range such as `192.0.2.0/24`.
///
/// The stored address is always masked, so `192.0.2.77/24` and `192.0.2.0/24`
/// compare equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct IpPrefix {
    addr: IpAddr,
    len: u8,
}

impl IpPrefix {
    /// Creates a prefix, masking host bits.
    pub fn new(addr: IpAddr, len: u8) -> ValidationResult<Self> {
        let max = match addr {
            IpAddr::V4(_) => 32,
            IpAddr::V6(_) => 128,
        };
        if len > max {
            return Err(ValidationError::OutOfRange {
                field: "prefix_len".to_string(),
                min: 0,
                max: i64::from(max),
                value: i64::from(len),
            });
        }

        Ok(Self {
            addr: mask(addr, len),
            len,
        })
    }

    /// Creates a prefix from raw address bytes and a prefix length as they
    /// appear on the wire.
    pub fn from_wire(field: &str, bytes: &[u8], len: u32) -> ValidationResult<Self> {
        let addr = ip_from_bytes(field, bytes)?;
        let len = u8::try_from(len).map_err(|_| {
            ValidationError::invalid(field, format!("prefix length {len} does not fit"))
        })?;

        Self::new(addr, len).map_err(|e| e.within(field))
    }

    /// Creates a single-address prefix (/32 or /128).
    pub fn host(addr: IpAddr) -> Self {
        let len = match addr {
            IpAddr::V4(_) => 32,
            IpAddr::V6(_) => 128,
        };
        Self { addr, len }
    }

    /// The network address.
    #[inline]
    pub fn addr(&self) -> IpAddr {
        self.addr
    }

    /// The prefix length in bits.
    #[inline]
    pub fn len(&self) -> u8 {
        self.len
    }

    /// Whether this prefix matches every address of its family.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Reports whether `ip` lies within this prefix. Addresses of the other
    /// family never match.
    pub fn contains(&self, ip: &IpAddr) -> bool {
        match (self.addr, ip) {
            (IpAddr::V4(_), IpAddr::V4(_)) | (IpAddr::V6(_), IpAddr::V6(_)) => {
                mask(*ip, self.len) == self.addr
            }
            _ => false,
        }
    }
}

fn mask(addr: IpAddr, len: u8) -> IpAddr {
    match addr {
        IpAddr::V4(v4) => {
            let bits = u32::from(v4);
            let mask = u32::MAX.checked_shl(32 - u32::from(len)).unwrap_or(0);
            IpAddr::V4(Ipv4Addr::from(bits & mask))
        }
        IpAddr::V6(v6) => {
            let bits = u128::from(v6);
            let mask = u128::MAX.checked_shl(128 - u32::from(len)).unwrap_or(0);
            IpAddr::V6(Ipv6Addr::from(bits & mask))
        }
    }
}

impl fmt::Display for IpPrefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.addr, self.len)
    }
}

impl FromStr for IpPrefix {
    type Err = ValidationError;

    /// Parses `addr/len`, or a bare address as a host prefix.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bad = |reason: String| ValidationError::invalid("prefix", reason);

        match s.split_once('/') {
            Some((addr, len)) => {
                let addr: IpAddr = addr.parse().map_err(|e| bad(format!("{s:?}: {e}")))?;
                let len: u8 = len.parse().map_err(|e| bad(format!("{s:?}: {e}")))?;
                Self::new(addr, len)
            }
            None => {
                let addr: IpAddr = s.parse().map_err(|e| bad(format!("{s:?}: {e}")))?;
                Ok(Self::host(addr))
            }
        }
    }
}

impl TryFrom<String> for IpPrefix {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<IpPrefix> for String {
    fn from(prefix: IpPrefix) -> Self {
        prefix.to_string()
    }
}

// =============================================================================
// Bind Set
// =============================================================================

/// The set of networks the DNS service listens on.
///
/// A device's dedicated IPs must all lie inside the bind set, otherwise the
/// service could never receive queries addressed to them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BindSet(Vec<IpPrefix>);

impl BindSet {
    /// Creates a bind set from prefixes.
    pub fn new(prefixes: Vec<IpPrefix>) -> Self {
        Self(prefixes)
    }

    /// Reports whether any prefix contains `ip`.
    pub fn contains(&self, ip: &IpAddr) -> bool {
        self.0.iter().any(|p| p.contains(ip))
    }

    /// The prefixes in this set.
    pub fn prefixes(&self) -> &[IpPrefix] {
        &self.0
    }

    /// Whether the set contains no prefixes.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<IpPrefix> for BindSet {
    fn from_iter<I: IntoIterator<Item = IpPrefix>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefix_masks_host_bits() {
        let p: IpPrefix = "192.0.2.77/24".parse().unwrap();
        assert_eq!(p.to_string(), "192.0.2.0/24");
        assert!(p.contains(&"192.0.2.1".parse().unwrap()));
        assert!(!p.contains(&"192.0.3.1".parse().unwrap()));
        assert!(!p.contains(&"2001:db8::1".parse().unwrap()));
    }

    #[test]
    fn test_prefix_edges() {
        let all: IpPrefix = "0.0.0.0/0".parse().unwrap();
        assert!(all.contains(&"203.0.113.9".parse().unwrap()));
        assert!("10.0.0.0/33".parse::<IpPrefix>().is_err());

        let v6: IpPrefix = "2001:db8::/32".parse().unwrap();
        assert!(v6.contains(&"2001:db8:1::5".parse().unwrap()));

        let host: IpPrefix = "198.51.100.7".parse().unwrap();
        assert_eq!(host.len(), 32);
    }

    #[test]
    fn test_prefix_from_wire() {
        let p = IpPrefix::from_wire("cidr", &[10, 1, 2, 3], 8).unwrap();
        assert_eq!(p.to_string(), "10.0.0.0/8");
        assert!(IpPrefix::from_wire("cidr", &[10, 1, 2], 8).is_err());
        assert!(IpPrefix::from_wire("cidr", &[10, 1, 2, 3], 300).is_err());
    }

    #[test]
    fn test_ip_bytes() {
        let ip = ip_from_bytes("ip", &[192, 0, 2, 1]).unwrap();
        assert_eq!(ip_to_bytes(&ip), vec![192, 0, 2, 1]);
        assert_eq!(opt_ip_from_bytes("ip", &[]).unwrap(), None);
        assert!(ip_from_bytes("ip", &[1, 2, 3]).is_err());
    }

    #[test]
    fn test_bind_set_contains() {
        let set: BindSet = ["192.0.2.0/24", "2001:db8::/64"]
            .iter()
            .map(|s| s.parse().unwrap())
            .collect();
        assert!(set.contains(&"192.0.2.200".parse().unwrap()));
        assert!(set.contains(&"2001:db8::53".parse().unwrap()));
        assert!(!set.contains(&"198.51.100.1".parse().unwrap()));
    }

    #[test]
    fn test_prefix_serde_as_string() {
        #[derive(Deserialize)]
        struct Wrapper {
            bind: BindSet,
        }

        let w: Wrapper = toml::from_str(r#"bind = ["192.0.2.0/24"]"#).unwrap();
        assert_eq!(w.bind.prefixes().len(), 1);
    }
}
