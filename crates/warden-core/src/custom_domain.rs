//! # Custom Domains
//!
//! Customer-owned domain names that serve DNS-over-TLS/HTTPS for a profile.
//!
//! ## Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │   Pending ──────────────────────────────► Current                      │
//! │   ───────                                 ───────                       │
//! │   well_known_path: served for ACME        cert_name: stored certificate │
//! │   expire: validation deadline             not_before < not_after        │
//! │                                           enabled: serving or paused    │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};

use crate::error::{ValidationError, ValidationResult};
use crate::ids::CertName;
use crate::validation::validate_domain_name;

/// State of one custom-domain entry. Exactly one variant is active.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CustomDomainState {
    /// Domain ownership is being validated.
    Pending {
        /// HTTP path served for the validation challenge.
        well_known_path: String,
        /// When the validation attempt expires.
        expire: DateTime<Utc>,
    },
    /// A certificate has been issued.
    Current {
        /// Name of the certificate in the certificate store.
        cert_name: CertName,
        /// Start of certificate validity.
        not_before: DateTime<Utc>,
        /// End of certificate validity; strictly after `not_before`.
        not_after: DateTime<Utc>,
        /// Whether the domain is being served.
        enabled: bool,
    },
}

impl CustomDomainState {
    /// Creates a pending state; the path must not be empty.
    pub fn pending(well_known_path: impl Into<String>, expire: DateTime<Utc>) -> ValidationResult<Self> {
        let well_known_path = well_known_path.into();
        if well_known_path.is_empty() {
            return Err(ValidationError::required("well_known_path"));
        }

        Ok(CustomDomainState::Pending {
            well_known_path,
            expire,
        })
    }

    /// Creates a current state; `not_before` must strictly precede `not_after`.
    pub fn current(
        cert_name: CertName,
        not_before: DateTime<Utc>,
        not_after: DateTime<Utc>,
        enabled: bool,
    ) -> ValidationResult<Self> {
        if not_before >= not_after {
            return Err(ValidationError::invalid(
                "not_before",
                format!("{not_before} is not before not_after {not_after}"),
            ));
        }

        Ok(CustomDomainState::Current {
            cert_name,
            not_before,
            not_after,
            enabled,
        })
    }

    /// Whether the domain should be answered at `now`: a current, enabled
    /// certificate inside its validity window.
    pub fn is_serving(&self, now: DateTime<Utc>) -> bool {
        match self {
            CustomDomainState::Pending { .. } => false,
            CustomDomainState::Current {
                not_before,
                not_after,
                enabled,
                ..
            } => *enabled && *not_before <= now && now < *not_after,
        }
    }
}

/// One custom-domain entry: a group of names sharing a state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomDomain {
    /// Lower-cased domain names; may start with a `*.` wildcard.
    pub domains: Vec<String>,
    /// Validation or certificate state.
    pub state: CustomDomainState,
}

impl CustomDomain {
    /// Creates an entry, validating and lower-casing every domain name.
    /// The list must not be empty.
    pub fn new(domains: Vec<String>, state: CustomDomainState) -> ValidationResult<Self> {
        if domains.is_empty() {
            return Err(ValidationError::required("domains"));
        }

        let domains = domains
            .into_iter()
            .enumerate()
            .map(|(i, d)| {
                let d = d.to_ascii_lowercase();
                validate_domain_name(&d).map_err(|e| e.within(&format!("domains[{i}]")))?;
                Ok(d)
            })
            .collect::<ValidationResult<Vec<_>>>()?;

        Ok(Self { domains, state })
    }
}

/// Custom-domain configuration of a profile.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CustomDomainConfig {
    /// Whether custom domains are enabled for the profile at all.
    pub enabled: bool,
    /// Configured entries.
    pub domains: Vec<CustomDomain>,
}
