//! # Identifiers
//!
//! Validated string newtypes. A value of one of these types has always passed
//! the matching validator in [`crate::validation`], so code holding a
//! `DeviceId` never needs to re-check it.

use std::fmt;
use std::str::FromStr;

use crate::error::{ValidationError, ValidationResult};
use crate::validation;

macro_rules! validated_string {
    ($(#[$meta:meta])* $name:ident => $validate:path) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $name(String);

        impl $name {
            /// Validates `value` and wraps it.
            pub fn new(value: impl Into<String>) -> ValidationResult<Self> {
                let value = value.into();
                $validate(&value)?;
                Ok(Self(value))
            }

            /// Returns the identifier as a string slice.
            #[inline]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Unwraps the identifier.
            #[inline]
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl FromStr for $name {
            type Err = ValidationError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::new(s)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

validated_string! {
    /// Unique identifier of a filtering profile.
    ProfileId => validation::validate_profile_id
}

validated_string! {
    /// Unique identifier of a device.
    DeviceId => validation::validate_device_id
}

validated_string! {
    /// Identifier of the account that owns a profile.
    AccountId => validation::validate_account_id
}

validated_string! {
    /// Human-readable device name.
    DeviceName => validation::validate_device_name
}

validated_string! {
    /// Identifier of a filtering rule list.
    RuleListId => validation::validate_rule_list_id
}

validated_string! {
    /// Identifier of a blockable service (e.g. `youtube`).
    BlockedServiceId => validation::validate_blocked_service_id
}

validated_string! {
    /// Name under which a custom-domain TLS certificate is stored.
    CertName => validation::validate_cert_name
}

// =============================================================================
// Human ID
// =============================================================================

/// Lower-cased human-readable device ID used by auto-provisioned devices.
///
/// Unlike the other identifiers, construction normalizes the case instead of
/// rejecting upper-case input, so `"My-Phone"` and `"my-phone"` are equal.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct HumanIdLower(String);

impl HumanIdLower {
    /// Validates `value` and stores it lower-cased.
    pub fn new(value: impl AsRef<str>) -> ValidationResult<Self> {
        let value = value.as_ref();
        validation::validate_human_id(value)?;
        Ok(Self(value.to_ascii_lowercase()))
    }

    /// Returns the identifier as a string slice.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for HumanIdLower {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_validate_on_construction() {
        assert_eq!(DeviceId::new("dev1").unwrap().as_str(), "dev1");
        assert!(DeviceId::new("dev-1").is_err());
        assert!("prof1".parse::<ProfileId>().is_ok());
        assert!("".parse::<AccountId>().is_err());
    }

    #[test]
    fn test_human_id_lowercases() {
        let id = HumanIdLower::new("My-Phone").unwrap();
        assert_eq!(id.as_str(), "my-phone");
        assert_eq!(id, HumanIdLower::new("my-phone").unwrap());
    }
}
