//! # Access Rules
//!
//! Per-profile allow/deny lists applied before filtering: client networks,
//! client ASNs, and domain rules that are refused outright.

use std::fmt;
use std::net::IpAddr;

use crate::error::{ValidationError, ValidationResult};
use crate::net::IpPrefix;

/// Autonomous system number. Zero is reserved and never valid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Asn(u32);

impl Asn {
    /// Creates an ASN, rejecting the reserved value 0.
    pub fn new(value: u32) -> ValidationResult<Self> {
        if value == 0 {
            return Err(ValidationError::OutOfRange {
                field: "asn".to_string(),
                min: 1,
                max: i64::from(u32::MAX),
                value: 0,
            });
        }

        Ok(Self(value))
    }

    /// The numeric value.
    #[inline]
    pub fn get(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for Asn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AS{}", self.0)
    }
}

/// Maximum length of a blocklisted domain rule.
pub const MAX_DOMAIN_RULE_LEN: usize = 1024;

/// Validates one blocklisted-domain rule string.
pub fn validate_domain_rule(rule: &str) -> ValidationResult<()> {
    if rule.trim().is_empty() {
        return Err(ValidationError::required("domain_rule"));
    }
    if rule.len() > MAX_DOMAIN_RULE_LEN {
        return Err(ValidationError::TooLong {
            field: "domain_rule".to_string(),
            max: MAX_DOMAIN_RULE_LEN,
            len: rule.len(),
        });
    }
    if let Some((index, ch)) = rule.chars().enumerate().find(|(_, c)| c.is_control()) {
        return Err(ValidationError::BadChar {
            field: "domain_rule".to_string(),
            ch,
            index,
        });
    }

    Ok(())
}

/// Access configuration of a profile.
///
/// An empty configuration (the default) allows every client.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AccessConfig {
    /// Client networks that are always allowed, even if also denied.
    pub allowed_nets: Vec<IpPrefix>,
    /// Client networks that are refused.
    pub blocked_nets: Vec<IpPrefix>,
    /// Client ASNs that are always allowed.
    pub allowed_asns: Vec<Asn>,
    /// Client ASNs that are refused.
    pub blocked_asns: Vec<Asn>,
    /// Domain rules whose matching queries are refused.
    pub blocklist_domain_rules: Vec<String>,
    /// Whether the shared "standard" access blocklist also applies.
    pub standard_enabled: bool,
}

impl AccessConfig {
    /// Whether this configuration restricts nothing.
    pub fn is_empty(&self) -> bool {
        self.allowed_nets.is_empty()
            && self.blocked_nets.is_empty()
            && self.allowed_asns.is_empty()
            && self.blocked_asns.is_empty()
            && self.blocklist_domain_rules.is_empty()
            && !self.standard_enabled
    }

    /// Reports whether a client is blocked by its address or ASN. The allow
    /// lists take precedence over the block lists.
    pub fn is_client_blocked(&self, ip: &IpAddr, asn: Option<Asn>) -> bool {
        if self.allowed_nets.iter().any(|p| p.contains(ip)) {
            return false;
        }
        if let Some(asn) = asn {
            if self.allowed_asns.contains(&asn) {
                return false;
            }
            if self.blocked_asns.contains(&asn) {
                return true;
            }
        }

        self.blocked_nets.iter().any(|p| p.contains(ip))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_asn_rejects_zero() {
        assert!(Asn::new(0).is_err());
        assert_eq!(Asn::new(64496).unwrap().to_string(), "AS64496");
    }

    #[test]
    fn test_domain_rule_validation() {
        assert!(validate_domain_rule("||example.org^").is_ok());
        assert!(validate_domain_rule("  ").is_err());
        assert!(validate_domain_rule("a\nb").is_err());
    }

    #[test]
    fn test_allow_list_wins() {
        let access = AccessConfig {
            allowed_nets: vec!["192.0.2.10/32".parse().unwrap()],
            blocked_nets: vec!["192.0.2.0/24".parse().unwrap()],
            blocked_asns: vec![Asn::new(64500).unwrap()],
            ..Default::default()
        };

        assert!(!access.is_client_blocked(&"192.0.2.10".parse().unwrap(), None));
        assert!(access.is_client_blocked(&"192.0.2.11".parse().unwrap(), None));
        assert!(access.is_client_blocked(
            &"198.51.100.1".parse().unwrap(),
            Some(Asn::new(64500).unwrap())
        ));
        assert!(AccessConfig::default().is_empty());
    }
}
