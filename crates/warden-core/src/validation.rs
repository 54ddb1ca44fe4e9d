//! # Validation Module
//!
//! Format rules for every identifier and name the backend sends us.
//!
//! ## Identifier Rules
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Identifier          Length    Characters                               │
//! │  ──────────────────  ────────  ─────────────────────────────────────    │
//! │  profile id          1..=8     A-Z a-z 0-9                              │
//! │  device id           1..=8     A-Z a-z 0-9                              │
//! │  account id          1..=64    A-Z a-z 0-9 -                            │
//! │  human id            1..=63    A-Z a-z 0-9 - (not at either end)        │
//! │  device name         1..=128   any printable                            │
//! │  rule list id        1..=128   A-Z a-z 0-9 _ . -                        │
//! │  blocked service id  1..=64    a-z 0-9 _                                │
//! │  certificate name    1..=64    A-Z a-z 0-9 _ . -                        │
//! │  domain name         1..=253   labels of A-Z a-z 0-9 -, optional "*."   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::error::{ValidationError, ValidationResult};

/// Maximum length of profile and device IDs.
pub const MAX_SHORT_ID_LEN: usize = 8;

/// Maximum length of account IDs.
pub const MAX_ACCOUNT_ID_LEN: usize = 64;

/// Maximum length of human-readable device IDs.
pub const MAX_HUMAN_ID_LEN: usize = 63;

/// Maximum length of device names, in characters.
pub const MAX_DEVICE_NAME_LEN: usize = 128;

/// Maximum length of rule list IDs.
pub const MAX_RULE_LIST_ID_LEN: usize = 128;

/// Maximum length of blocked service IDs.
pub const MAX_BLOCKED_SERVICE_ID_LEN: usize = 64;

/// Maximum length of certificate names.
pub const MAX_CERT_NAME_LEN: usize = 64;

/// Maximum length of a domain name.
pub const MAX_DOMAIN_NAME_LEN: usize = 253;

/// Maximum length of a single domain label.
pub const MAX_DOMAIN_LABEL_LEN: usize = 63;

// =============================================================================
// Generic Helpers
// =============================================================================

/// Checks that `value` is non-empty, at most `max` characters long, and made
/// only of characters accepted by `allowed`.
pub fn validate_chars(
    field: &str,
    value: &str,
    max: usize,
    allowed: impl Fn(char) -> bool,
) -> ValidationResult<()> {
    if value.is_empty() {
        return Err(ValidationError::required(field));
    }

    let len = value.chars().count();
    if len > max {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max,
            len,
        });
    }

    if let Some((index, ch)) = value.chars().enumerate().find(|&(_, c)| !allowed(c)) {
        return Err(ValidationError::BadChar {
            field: field.to_string(),
            ch,
            index,
        });
    }

    Ok(())
}

fn is_alnum(c: char) -> bool {
    c.is_ascii_alphanumeric()
}

// =============================================================================
// Identifier Validators
// =============================================================================

/// Validates a profile ID.
///
/// ## Example
/// ```rust
/// use warden_core::validation::validate_profile_id;
///
/// assert!(validate_profile_id("prof1234").is_ok());
/// assert!(validate_profile_id("").is_err());
/// assert!(validate_profile_id("too-long-id").is_err());
/// ```
pub fn validate_profile_id(id: &str) -> ValidationResult<()> {
    validate_chars("profile_id", id, MAX_SHORT_ID_LEN, is_alnum)
}

/// Validates a device ID.
pub fn validate_device_id(id: &str) -> ValidationResult<()> {
    validate_chars("device_id", id, MAX_SHORT_ID_LEN, is_alnum)
}

/// Validates an account ID.
pub fn validate_account_id(id: &str) -> ValidationResult<()> {
    validate_chars("account_id", id, MAX_ACCOUNT_ID_LEN, |c| {
        is_alnum(c) || c == '-'
    })
}

/// Validates a human-readable device ID, as typed by a user when a device is
/// provisioned automatically.
pub fn validate_human_id(id: &str) -> ValidationResult<()> {
    validate_chars("human_id", id, MAX_HUMAN_ID_LEN, |c| is_alnum(c) || c == '-')?;

    if id.starts_with('-') || id.ends_with('-') {
        return Err(ValidationError::invalid(
            "human_id",
            "must not start or end with a hyphen",
        ));
    }

    Ok(())
}

/// Validates a device name.
///
/// ## Rules
/// - Must not be empty
/// - At most 128 characters (not bytes)
/// - No control characters
pub fn validate_device_name(name: &str) -> ValidationResult<()> {
    validate_chars("device_name", name, MAX_DEVICE_NAME_LEN, |c| !c.is_control())
}

/// Validates a rule list ID.
pub fn validate_rule_list_id(id: &str) -> ValidationResult<()> {
    validate_chars("rule_list_id", id, MAX_RULE_LIST_ID_LEN, |c| {
        is_alnum(c) || matches!(c, '_' | '.' | '-')
    })
}

/// Validates a blocked service ID.
pub fn validate_blocked_service_id(id: &str) -> ValidationResult<()> {
    validate_chars("blocked_service_id", id, MAX_BLOCKED_SERVICE_ID_LEN, |c| {
        c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_'
    })
}

/// Validates a TLS certificate name.
pub fn validate_cert_name(name: &str) -> ValidationResult<()> {
    validate_chars("cert_name", name, MAX_CERT_NAME_LEN, |c| {
        is_alnum(c) || matches!(c, '_' | '.' | '-')
    })
}

/// Validates a domain name.
///
/// A single leading `*.` wildcard label is accepted.
///
/// ## Example
/// ```rust
/// use warden_core::validation::validate_domain_name;
///
/// assert!(validate_domain_name("dns.example.com").is_ok());
/// assert!(validate_domain_name("*.example.com").is_ok());
/// assert!(validate_domain_name("bad..example").is_err());
/// ```
pub fn validate_domain_name(name: &str) -> ValidationResult<()> {
    const FIELD: &str = "domain";

    validate_chars(FIELD, name, MAX_DOMAIN_NAME_LEN, |c| {
        is_alnum(c) || matches!(c, '-' | '.' | '*')
    })?;

    let host = name.strip_prefix("*.").unwrap_or(name);
    for label in host.split('.') {
        if label.is_empty() {
            return Err(ValidationError::invalid(FIELD, "empty label"));
        }
        if label.len() > MAX_DOMAIN_LABEL_LEN {
            return Err(ValidationError::TooLong {
                field: FIELD.to_string(),
                max: MAX_DOMAIN_LABEL_LEN,
                len: label.len(),
            });
        }
        if label.contains('*') {
            return Err(ValidationError::invalid(
                FIELD,
                "wildcard is only allowed as the first label",
            ));
        }
        if label.starts_with('-') || label.ends_with('-') {
            return Err(ValidationError::invalid(
                FIELD,
                "label must not start or end with a hyphen",
            ));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_ids() {
        assert!(validate_device_id("abcd1234").is_ok());
        assert!(validate_device_id("abcd12345").is_err());
        assert!(matches!(
            validate_device_id("ab_c"),
            Err(ValidationError::BadChar { ch: '_', index: 2, .. })
        ));
        assert!(matches!(
            validate_profile_id(""),
            Err(ValidationError::Required { .. })
        ));
    }

    #[test]
    fn test_human_id() {
        assert!(validate_human_id("My-Phone-1").is_ok());
        assert!(validate_human_id("-phone").is_err());
        assert!(validate_human_id("phone-").is_err());
        assert!(validate_human_id("my phone").is_err());
    }

    #[test]
    fn test_device_name_counts_chars() {
        let name = "ä".repeat(MAX_DEVICE_NAME_LEN);
        assert!(validate_device_name(&name).is_ok());
        assert!(validate_device_name(&format!("{name}x")).is_err());
        assert!(validate_device_name("tab\there").is_err());
    }

    #[test]
    fn test_domain_names() {
        assert!(validate_domain_name("a.example.com").is_ok());
        assert!(validate_domain_name("*.example.com").is_ok());
        assert!(validate_domain_name("a.*.example.com").is_err());
        assert!(validate_domain_name("-a.example.com").is_err());
        assert!(validate_domain_name(".example.com").is_err());
        assert!(validate_domain_name(&format!("{}.com", "a".repeat(64))).is_err());
    }

    #[test]
    fn test_list_ids() {
        assert!(validate_rule_list_id("adguard_dns_filter").is_ok());
        assert!(validate_rule_list_id("list 1").is_err());
        assert!(validate_blocked_service_id("youtube").is_ok());
        assert!(validate_blocked_service_id("YouTube").is_err());
        assert!(validate_cert_name("cert.example-1").is_ok());
        assert!(validate_cert_name("cert/1").is_err());
    }
}
