//! # Profiles
//!
//! A profile is one customer's filtering configuration, shared by all of its
//! devices.
//!
//! ## Profile Layout
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                              Profile                                    │
//! │                                                                         │
//! │  identity        id, account_id, deleted                                │
//! │  devices         device_ids (set)                                       │
//! │  filtering       custom_rules, rule_lists, parental, safe_browsing      │
//! │  blocking        blocking_mode, adult_blocking_mode,                    │
//! │                  safe_browsing_blocking_mode, filtered_response_ttl     │
//! │  access          access, ratelimit                                      │
//! │  domains         custom_domains                                         │
//! │  flags           filtering/query log/ip log/auto devices/browser knobs  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::time::Duration;

use crate::access::AccessConfig;
use crate::blocking::BlockingMode;
use crate::custom_domain::CustomDomainConfig;
use crate::device::DeviceIdSet;
use crate::ids::{AccountId, ProfileId, RuleListId};
use crate::ratelimit::RatelimitConfig;
use crate::schedule::ParentalConfig;

/// Rule-list settings of a profile.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RuleListConfig {
    /// Whether rule lists are applied.
    pub enabled: bool,
    /// IDs of the enabled lists.
    pub ids: Vec<RuleListId>,
}

/// Safe-browsing settings of a profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SafeBrowsingConfig {
    /// Whether safe browsing is enabled.
    pub enabled: bool,
    /// Block domains known to host malware or phishing.
    pub block_dangerous_domains: bool,
    /// Block newly registered domains.
    pub block_newly_registered_domains: bool,
}

/// Boolean feature switches of a profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ProfileFlags {
    /// Whether filtering is enabled at all.
    pub filtering_enabled: bool,
    /// Whether queries are written to the query log.
    pub query_log_enabled: bool,
    /// Whether client IPs are written to the query log.
    pub ip_log_enabled: bool,
    /// Whether unknown human IDs provision devices automatically.
    pub auto_devices_enabled: bool,
    /// Block Chrome's prefetch proxy domain.
    pub block_chrome_prefetch: bool,
    /// Block Firefox's DoH canary domain.
    pub block_firefox_canary: bool,
    /// Block iCloud Private Relay domains.
    pub block_private_relay: bool,
}

/// A filtering profile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Profile {
    pub id: ProfileId,
    pub account_id: AccountId,

    /// Devices of the profile. See `DeviceUpdate` for how a sync response
    /// qualifies this set.
    pub device_ids: DeviceIdSet,

    pub custom_rules: Vec<String>,
    pub rule_lists: RuleListConfig,
    pub parental: ParentalConfig,
    pub safe_browsing: SafeBrowsingConfig,

    pub access: AccessConfig,
    pub ratelimit: RatelimitConfig,

    /// Answer strategy for blocked queries.
    pub blocking_mode: BlockingMode,
    /// Override for adult-content blocks; `None` uses `blocking_mode`.
    pub adult_blocking_mode: Option<BlockingMode>,
    /// Override for safe-browsing blocks; `None` uses `blocking_mode`.
    pub safe_browsing_blocking_mode: Option<BlockingMode>,
    /// TTL of blocked responses.
    pub filtered_response_ttl: Duration,

    pub custom_domains: CustomDomainConfig,
    pub flags: ProfileFlags,

    /// The profile has been deleted and must be dropped by the caller.
    pub deleted: bool,
}

impl Profile {
    /// Blocking mode to use for adult-content blocks.
    pub fn effective_adult_blocking_mode(&self) -> &BlockingMode {
        self.adult_blocking_mode
            .as_ref()
            .unwrap_or(&self.blocking_mode)
    }

    /// Blocking mode to use for safe-browsing blocks.
    pub fn effective_safe_browsing_blocking_mode(&self) -> &BlockingMode {
        self.safe_browsing_blocking_mode
            .as_ref()
            .unwrap_or(&self.blocking_mode)
    }
}
