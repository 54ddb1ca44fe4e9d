//! # Blocking Modes
//!
//! How a blocked DNS query is answered.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Mode       Answer                                                      │
//! │  ─────────  ─────────────────────────────────────────────────────────   │
//! │  CustomIp   A / AAAA records with the configured addresses              │
//! │  NxDomain   NXDOMAIN response code                                      │
//! │  NullIp     0.0.0.0 / :: (default)                                      │
//! │  Refused    REFUSED response code                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A profile has three slots: the default mode (always set, falls back to
//! `NullIp`), and optional overrides for adult-content and safe-browsing
//! blocks (unset means "use the default mode").

use std::fmt;
use std::net::{Ipv4Addr, Ipv6Addr};

use crate::error::{ValidationError, ValidationResult};

/// Strategy for answering a blocked query.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum BlockingMode {
    /// Respond with custom addresses. At least one address is always present.
    CustomIp {
        ipv4: Vec<Ipv4Addr>,
        ipv6: Vec<Ipv6Addr>,
    },
    /// Respond with NXDOMAIN.
    NxDomain,
    /// Respond with the unspecified address of the queried family.
    #[default]
    NullIp,
    /// Respond with REFUSED.
    Refused,
}

impl BlockingMode {
    /// Creates a custom-IP mode. Fails when both lists are empty.
    pub fn custom_ip(ipv4: Vec<Ipv4Addr>, ipv6: Vec<Ipv6Addr>) -> ValidationResult<Self> {
        if ipv4.is_empty() && ipv6.is_empty() {
            return Err(ValidationError::invalid(
                "custom_ip",
                "no valid ipv4 or ipv6 addresses",
            ));
        }

        Ok(BlockingMode::CustomIp { ipv4, ipv6 })
    }

    /// Short name of the variant, for logs.
    pub fn name(&self) -> &'static str {
        match self {
            BlockingMode::CustomIp { .. } => "custom_ip",
            BlockingMode::NxDomain => "nxdomain",
            BlockingMode::NullIp => "null_ip",
            BlockingMode::Refused => "refused",
        }
    }
}

impl fmt::Display for BlockingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
