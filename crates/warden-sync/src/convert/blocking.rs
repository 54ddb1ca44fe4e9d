//! Blocking modes.

use std::net::{Ipv4Addr, Ipv6Addr};

use warden_core::{BlockingMode, ValidationError, ValidationResult};

use super::Conversion;
use crate::proto::{blocking_mode_settings::Mode, BlockingModeSettings};

/// Converts one blocking-mode slot. `None` when the slot or its variant is
/// unset; callers decide what that means for their slot.
///
/// Malformed custom addresses are dropped and reported; a custom mode left
/// without any address is a hard error.
pub(crate) fn blocking_mode_from_wire(
    field: &str,
    settings: Option<BlockingModeSettings>,
    cx: &mut Conversion<'_>,
) -> ValidationResult<Option<BlockingMode>> {
    let Some(mode) = settings.and_then(|s| s.mode) else {
        return Ok(None);
    };

    let mode = match mode {
        Mode::CustomIp(custom) => {
            let ipv4 = cx.collect_valid(&format!("{field}.ipv4"), custom.ipv4, |b| {
                <[u8; 4]>::try_from(b.as_slice())
                    .map(Ipv4Addr::from)
                    .map_err(|_| ValidationError::invalid("ip", format!("bad ipv4 length {}", b.len())))
            });
            let ipv6 = cx.collect_valid(&format!("{field}.ipv6"), custom.ipv6, |b| {
                <[u8; 16]>::try_from(b.as_slice())
                    .map(Ipv6Addr::from)
                    .map_err(|_| ValidationError::invalid("ip", format!("bad ipv6 length {}", b.len())))
            });

            BlockingMode::custom_ip(ipv4, ipv6).map_err(|e| e.within(field))?
        }
        Mode::NxDomain(_) => BlockingMode::NxDomain,
        Mode::NullIp(_) => BlockingMode::NullIp,
        Mode::Refused(_) => BlockingMode::Refused,
    };

    Ok(Some(mode))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::proto::{BlockingModeCustomIp, BlockingModeNxDomain};
    use warden_core::BindSet;

    fn custom(ipv4: Vec<Vec<u8>>, ipv6: Vec<Vec<u8>>) -> Option<BlockingModeSettings> {
        Some(BlockingModeSettings {
            mode: Some(Mode::CustomIp(BlockingModeCustomIp { ipv4, ipv6 })),
        })
    }

    #[test]
    fn test_unset_is_none() {
        let bind_set = BindSet::default();
        let mut cx = Conversion::new(&bind_set);

        assert_eq!(blocking_mode_from_wire("m", None, &mut cx).unwrap(), None);
        let empty = Some(BlockingModeSettings { mode: None });
        assert_eq!(blocking_mode_from_wire("m", empty, &mut cx).unwrap(), None);
    }

    #[test]
    fn test_simple_variants() {
        let bind_set = BindSet::default();
        let mut cx = Conversion::new(&bind_set);

        let nx = Some(BlockingModeSettings {
            mode: Some(Mode::NxDomain(BlockingModeNxDomain {})),
        });
        assert_eq!(
            blocking_mode_from_wire("m", nx, &mut cx).unwrap(),
            Some(BlockingMode::NxDomain)
        );
    }

    #[test]
    fn test_custom_ip_drops_bad_addresses() {
        let bind_set = BindSet::default();
        let mut cx = Conversion::new(&bind_set);

        let got = blocking_mode_from_wire(
            "blocking_mode",
            custom(vec![vec![10, 0, 0, 1], vec![1, 2]], vec![]),
            &mut cx,
        )
        .unwrap();

        assert_eq!(
            got,
            Some(BlockingMode::CustomIp {
                ipv4: vec![Ipv4Addr::new(10, 0, 0, 1)],
                ipv6: vec![],
            })
        );
        let errors = cx.take_errors();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field(), "blocking_mode.ipv4[1].ip");
    }

    #[test]
    fn test_custom_ip_without_valid_addresses_is_hard_error() {
        let bind_set = BindSet::default();
        let mut cx = Conversion::new(&bind_set);

        assert!(blocking_mode_from_wire("m", custom(vec![vec![1]], vec![]), &mut cx).is_err());
        assert!(blocking_mode_from_wire("m", custom(vec![], vec![]), &mut cx).is_err());
    }
}
