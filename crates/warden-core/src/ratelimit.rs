//! Per-profile rate limiting settings.

use crate::net::IpPrefix;

/// Rate-limit configuration of a profile.
///
/// When `enabled` is false the profile has no limiter of its own and the
/// service-wide (global) limiter applies; `rps` and `client_subnets` are then
/// meaningless and kept empty.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RatelimitConfig {
    /// Whether the profile-specific limiter is active.
    pub enabled: bool,
    /// Allowed requests per second per client.
    pub rps: u32,
    /// Client subnets that are never rate limited.
    pub client_subnets: Vec<IpPrefix>,
}

impl RatelimitConfig {
    /// A disabled configuration, deferring to the global limiter.
    pub fn disabled() -> Self {
        Self::default()
    }

    /// Creates an enabled configuration.
    pub fn enabled(rps: u32, client_subnets: Vec<IpPrefix>) -> Self {
        Self {
            enabled: true,
            rps,
            client_subnets,
        }
    }

    /// Whether the global limiter should be used for this profile.
    pub fn uses_global(&self) -> bool {
        !self.enabled
    }

    /// Whether requests from `ip` bypass the limiter.
    pub fn is_exempt(&self, ip: &std::net::IpAddr) -> bool {
        self.client_subnets.iter().any(|p| p.contains(ip))
    }
}
