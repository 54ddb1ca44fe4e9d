//! Parental settings and their weekly schedule.

use warden_core::{
    BlockedServiceId, DayInterval, ParentalConfig, ValidationError, ValidationResult,
    WeeklySchedule,
};

use super::{duration_from_wire, Conversion};
use crate::proto::{DayRange, ParentalSettings, ScheduleSettings};

/// Converts parental settings. A bad schedule is a hard error; bad blocked
/// service ids are dropped and reported.
pub(crate) fn parental_from_wire(
    p: Option<ParentalSettings>,
    cx: &mut Conversion<'_>,
) -> ValidationResult<ParentalConfig> {
    let Some(p) = p else {
        return Ok(ParentalConfig::default());
    };

    let schedule = p
        .schedule
        .map(schedule_from_wire)
        .transpose()
        .map_err(|e| e.within("parental.schedule"))?;

    Ok(ParentalConfig {
        enabled: p.enabled,
        block_adult: p.block_adult,
        general_safe_search: p.general_safe_search,
        youtube_safe_search: p.youtube_safe_search,
        blocked_services: cx.collect_valid(
            "parental.blocked_services",
            p.blocked_services,
            BlockedServiceId::new,
        ),
        schedule,
    })
}

fn schedule_from_wire(s: ScheduleSettings) -> ValidationResult<WeeklySchedule> {
    let w = s
        .weekly_range
        .ok_or_else(|| ValidationError::required("weekly_range"))?;

    let days = [
        ("mon", w.mon),
        ("tue", w.tue),
        ("wed", w.wed),
        ("thu", w.thu),
        ("fri", w.fri),
        ("sat", w.sat),
        ("sun", w.sun),
    ];

    let mut out = [None; 7];
    for (slot, (name, range)) in out.iter_mut().zip(days) {
        *slot = range
            .map(day_from_wire)
            .transpose()
            .map_err(|e| e.within(&format!("weekly_range.{name}")))?;
    }

    WeeklySchedule::new(out, &s.tmz)
}

fn day_from_wire(r: DayRange) -> ValidationResult<DayInterval> {
    let start = minutes("start", r.start)?;
    let end = minutes("end", r.end)?;
    DayInterval::new(start, end)
}

/// A time of day as whole minutes since midnight; unset is midnight.
fn minutes(field: &str, d: Option<prost_types::Duration>) -> ValidationResult<u16> {
    let secs = match d {
        Some(d) => duration_from_wire(field, d)?.as_secs(),
        None => 0,
    };

    u16::try_from(secs / 60).map_err(|_| ValidationError::OutOfRange {
        field: field.to_string(),
        min: 0,
        max: i64::from(u16::MAX),
        value: i64::try_from(secs / 60).unwrap_or(i64::MAX),
    })
}
