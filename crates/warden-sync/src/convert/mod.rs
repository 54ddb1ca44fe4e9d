//! # Record Conversion
//!
//! Pure functions from wire records to `warden-core` entities.
//!
//! ## Failure Scopes
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Failure                                  Scope                         │
//! │  ───────────────────────────────────────  ────────────────────────────  │
//! │  bad profile id / account id              whole profile (hard error)    │
//! │  bad schedule, custom IP mode w/o addrs   whole profile (hard error)    │
//! │  bad device                               that device (reported)        │
//! │  bad custom-domain entry                  that entry (reported)         │
//! │  bad list element (CIDR, ASN, id, ...)    that element (reported)       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A hard error is the `Err` of a converter. Everything softer is pushed onto
//! the [`Conversion`] context and the converter carries on with what is left.

mod access;
mod blocking;
mod custom_domain;
mod device;
mod profile;
mod schedule;

use chrono::{DateTime, Utc};
use warden_core::{BindSet, ValidationError, ValidationResult};

pub(crate) use access::{access_from_wire, prefix_from_wire};
pub(crate) use device::{device_from_wire, device_type_to_wire};
pub(crate) use profile::{profile_from_wire, ConvertedProfile};

/// Per-record conversion context: the bind set dedicated IPs are checked
/// against, and the soft errors found so far.
#[derive(Debug)]
pub(crate) struct Conversion<'a> {
    bind_set: &'a BindSet,
    errors: Vec<ValidationError>,
    invalid_devices: usize,
}

impl<'a> Conversion<'a> {
    pub(crate) fn new(bind_set: &'a BindSet) -> Self {
        Self {
            bind_set,
            errors: Vec::new(),
            invalid_devices: 0,
        }
    }

    pub(crate) fn bind_set(&self) -> &BindSet {
        self.bind_set
    }

    pub(crate) fn report(&mut self, err: ValidationError) {
        self.errors.push(err);
    }

    pub(crate) fn report_invalid_device(&mut self, err: ValidationError) {
        self.invalid_devices += 1;
        self.errors.push(err);
    }

    pub(crate) fn invalid_devices(&self) -> usize {
        self.invalid_devices
    }

    /// Takes the soft errors collected so far.
    pub(crate) fn take_errors(&mut self) -> Vec<ValidationError> {
        std::mem::take(&mut self.errors)
    }

    /// Converts every element with `f`, keeping the ones that convert and
    /// reporting the others as `field[i]`.
    pub(crate) fn collect_valid<T, U, F>(&mut self, field: &str, items: Vec<T>, mut f: F) -> Vec<U>
    where
        F: FnMut(T) -> ValidationResult<U>,
    {
        let mut out = Vec::with_capacity(items.len());
        for (i, item) in items.into_iter().enumerate() {
            match f(item) {
                Ok(v) => out.push(v),
                Err(e) => self.report(e.within(&format!("{field}[{i}]"))),
            }
        }
        out
    }
}

// =============================================================================
// Well-known Types
// =============================================================================

pub(crate) fn datetime_from_wire(
    field: &str,
    ts: Option<prost_types::Timestamp>,
) -> ValidationResult<DateTime<Utc>> {
    let ts = ts.ok_or_else(|| ValidationError::required(field))?;
    let nanos = u32::try_from(ts.nanos)
        .map_err(|_| ValidationError::invalid(field, format!("negative nanos {}", ts.nanos)))?;

    DateTime::from_timestamp(ts.seconds, nanos)
        .ok_or_else(|| ValidationError::invalid(field, format!("out of range: {}s", ts.seconds)))
}

pub(crate) fn duration_from_wire(
    field: &str,
    d: prost_types::Duration,
) -> ValidationResult<std::time::Duration> {
    std::time::Duration::try_from(d).map_err(|e| ValidationError::invalid(field, e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collect_valid_keeps_good_elements() {
        let bind_set = BindSet::default();
        let mut cx = Conversion::new(&bind_set);

        let got = cx.collect_valid("asn", vec![1u32, 0, 3], |n| {
            if n == 0 {
                Err(ValidationError::invalid("value", "zero"))
            } else {
                Ok(n * 10)
            }
        });

        assert_eq!(got, vec![10, 30]);
        let errors = cx.take_errors();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field(), "asn[1].value");
        assert!(cx.take_errors().is_empty());
    }

    #[test]
    fn test_datetime_from_wire() {
        let ts = prost_types::Timestamp {
            seconds: 1_700_000_000,
            nanos: 5,
        };
        let dt = datetime_from_wire("expire", Some(ts)).unwrap();
        assert_eq!(dt.timestamp(), 1_700_000_000);

        assert!(datetime_from_wire("expire", None).is_err());
        let bad = prost_types::Timestamp {
            seconds: 0,
            nanos: -1,
        };
        assert!(datetime_from_wire("expire", Some(bad)).is_err());
    }

    #[test]
    fn test_duration_rejects_negative() {
        let neg = prost_types::Duration {
            seconds: -1,
            nanos: 0,
        };
        assert!(duration_from_wire("ttl", neg).is_err());
    }
}
