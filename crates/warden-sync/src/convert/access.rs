//! Access and rate-limit settings.

use warden_core::access::validate_domain_rule;
use warden_core::{AccessConfig, Asn, IpPrefix, RatelimitConfig, ValidationResult};

use super::Conversion;
use crate::proto::{AccessSettings, CidrRange, RateLimitSettings};

pub(crate) fn prefix_from_wire(c: CidrRange) -> ValidationResult<IpPrefix> {
    IpPrefix::from_wire("address", &c.address, c.prefix)
}

/// Converts access settings. Unset or disabled settings restrict nothing;
/// invalid list elements are dropped and reported.
pub(crate) fn access_from_wire(a: Option<AccessSettings>, cx: &mut Conversion<'_>) -> AccessConfig {
    let Some(a) = a.filter(|a| a.enabled) else {
        return AccessConfig::default();
    };

    AccessConfig {
        allowed_nets: cx.collect_valid("access.allowlist_cidr", a.allowlist_cidr, prefix_from_wire),
        blocked_nets: cx.collect_valid("access.blocklist_cidr", a.blocklist_cidr, prefix_from_wire),
        allowed_asns: cx.collect_valid("access.allowlist_asn", a.allowlist_asn, Asn::new),
        blocked_asns: cx.collect_valid("access.blocklist_asn", a.blocklist_asn, Asn::new),
        blocklist_domain_rules: cx.collect_valid(
            "access.blocklist_domain_rules",
            a.blocklist_domain_rules,
            |rule| validate_domain_rule(&rule).map(|()| rule),
        ),
        standard_enabled: a.standard_blocking_enabled,
    }
}

/// Converts rate-limit settings. Unset or disabled settings defer to the
/// global limiter.
pub(crate) fn ratelimit_from_wire(
    r: Option<RateLimitSettings>,
    cx: &mut Conversion<'_>,
) -> RatelimitConfig {
    match r.filter(|r| r.enabled) {
        Some(r) => RatelimitConfig::enabled(
            r.rps,
            cx.collect_valid("ratelimit.client_cidr", r.client_cidr, prefix_from_wire),
        ),
        None => RatelimitConfig::disabled(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use warden_core::BindSet;

    fn cidr(address: Vec<u8>, prefix: u32) -> CidrRange {
        CidrRange { address, prefix }
    }

    #[test]
    fn test_disabled_access_is_empty() {
        let bind_set = BindSet::default();
        let mut cx = Conversion::new(&bind_set);

        let disabled = AccessSettings {
            enabled: false,
            blocklist_asn: vec![64496],
            ..AccessSettings::default()
        };
        assert!(access_from_wire(Some(disabled), &mut cx).is_empty());
        assert!(access_from_wire(None, &mut cx).is_empty());
    }

    #[test]
    fn test_access_drops_invalid_elements() {
        let bind_set = BindSet::default();
        let mut cx = Conversion::new(&bind_set);

        let a = AccessSettings {
            enabled: true,
            allowlist_cidr: vec![cidr(vec![192, 0, 2, 0], 24), cidr(vec![192, 0, 2, 0], 33)],
            blocklist_asn: vec![0, 64496],
            blocklist_domain_rules: vec!["||ads.example^".to_string(), " ".to_string()],
            standard_blocking_enabled: true,
            ..AccessSettings::default()
        };

        let access = access_from_wire(Some(a), &mut cx);
        assert_eq!(access.allowed_nets.len(), 1);
        assert_eq!(access.blocked_asns, vec![Asn::new(64496).unwrap()]);
        assert_eq!(access.blocklist_domain_rules, vec!["||ads.example^".to_string()]);
        assert!(access.standard_enabled);

        let fields: Vec<_> = cx.take_errors().iter().map(|e| e.field().to_string()).collect();
        assert_eq!(fields.len(), 3);
        assert!(fields[0].starts_with("access.allowlist_cidr[1]"));
        assert!(fields[1].starts_with("access.blocklist_asn[0]"));
        assert!(fields[2].starts_with("access.blocklist_domain_rules[1]"));
    }

    #[test]
    fn test_ratelimit() {
        let bind_set = BindSet::default();
        let mut cx = Conversion::new(&bind_set);

        assert_eq!(ratelimit_from_wire(None, &mut cx), RatelimitConfig::disabled());

        let r = RateLimitSettings {
            enabled: true,
            rps: 100,
            client_cidr: vec![cidr(vec![10, 0, 0, 0], 8), cidr(vec![1], 8)],
        };
        let got = ratelimit_from_wire(Some(r), &mut cx);
        assert!(got.enabled);
        assert_eq!(got.rps, 100);
        assert_eq!(got.client_subnets.len(), 1);
        assert_eq!(cx.take_errors().len(), 1);
    }
}
