//! Custom domains.

use warden_core::{
    CertName, CustomDomain, CustomDomainConfig, CustomDomainState, ValidationError,
    ValidationResult,
};

use super::{datetime_from_wire, Conversion};
use crate::proto::{custom_domain::State, CustomDomainSettings};

/// Converts the custom-domain settings. A bad entry drops only that entry.
pub(crate) fn custom_domains_from_wire(
    c: Option<CustomDomainSettings>,
    cx: &mut Conversion<'_>,
) -> CustomDomainConfig {
    let Some(c) = c else {
        return CustomDomainConfig::default();
    };

    CustomDomainConfig {
        enabled: c.enabled,
        domains: cx.collect_valid("custom_domain.domains", c.domains, entry_from_wire),
    }
}

fn entry_from_wire(d: crate::proto::CustomDomain) -> ValidationResult<CustomDomain> {
    let state = match d.state {
        Some(State::Pending(p)) => CustomDomainState::pending(
            p.well_known_path,
            datetime_from_wire("expire", p.expire)?,
        )?,
        Some(State::Current(c)) => CustomDomainState::current(
            CertName::new(c.cert_name)?,
            datetime_from_wire("not_before", c.not_before)?,
            datetime_from_wire("not_after", c.not_after)?,
            c.enabled,
        )?,
        None => return Err(ValidationError::required("state")),
    };

    CustomDomain::new(d.domains, state)
}
