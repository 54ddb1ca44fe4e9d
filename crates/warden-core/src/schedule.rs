//! # Parental Control
//!
//! Parental-control settings and the weekly schedule during which they are
//! active.
//!
//! ## Schedule Model
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Mon  [ 09:00 ─────────── 17:00 ]                                      │
//! │  Tue  [ 09:00 ─────────── 17:00 ]                                      │
//! │  Wed  (none)                                                           │
//! │  ...                                                                   │
//! │  Sun  [ 00:00 ──────────────────────────── 24:00 ]                     │
//! │                                                                         │
//! │  Intervals are minutes of the day in the schedule's own time zone,     │
//! │  start inclusive, end exclusive, start <= end <= 1440.                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Datelike, Timelike, Utc, Weekday};
use chrono_tz::Tz;

use crate::error::{ValidationError, ValidationResult};
use crate::ids::BlockedServiceId;

/// Number of minutes in a day; the largest valid interval end.
pub const MINUTES_PER_DAY: u16 = 24 * 60;

// =============================================================================
// Day Interval
// =============================================================================

/// A span of one day, in minutes since local midnight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayInterval {
    start: u16,
    end: u16,
}

impl DayInterval {
    /// Creates an interval; requires `start <= end <= 1440`.
    pub fn new(start: u16, end: u16) -> ValidationResult<Self> {
        if end > MINUTES_PER_DAY {
            return Err(ValidationError::OutOfRange {
                field: "end".to_string(),
                min: 0,
                max: i64::from(MINUTES_PER_DAY),
                value: i64::from(end),
            });
        }
        if start > end {
            return Err(ValidationError::OutOfRange {
                field: "start".to_string(),
                min: 0,
                max: i64::from(end),
                value: i64::from(start),
            });
        }

        Ok(Self { start, end })
    }

    /// Start minute (inclusive).
    #[inline]
    pub fn start(&self) -> u16 {
        self.start
    }

    /// End minute (exclusive).
    #[inline]
    pub fn end(&self) -> u16 {
        self.end
    }

    /// Whether the minute of the day falls inside the interval.
    pub fn contains(&self, minute: u16) -> bool {
        self.start <= minute && minute < self.end
    }
}

// =============================================================================
// Weekly Schedule
// =============================================================================

/// Seven optional day intervals, Monday first, in a named time zone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeeklySchedule {
    days: [Option<DayInterval>; 7],
    time_zone: Tz,
}

impl WeeklySchedule {
    /// Creates a schedule. The time zone must be a known IANA zone name.
    pub fn new(days: [Option<DayInterval>; 7], time_zone: &str) -> ValidationResult<Self> {
        let time_zone = parse_time_zone(time_zone)?;
        Ok(Self { days, time_zone })
    }

    /// The interval for a given weekday, if any.
    pub fn interval(&self, day: Weekday) -> Option<DayInterval> {
        self.days[day.num_days_from_monday() as usize]
    }

    /// All seven days, Monday first.
    pub fn days(&self) -> &[Option<DayInterval>; 7] {
        &self.days
    }

    /// The schedule's time zone.
    pub fn time_zone(&self) -> Tz {
        self.time_zone
    }

    /// Whether `now` falls inside the interval for its local weekday.
    pub fn contains(&self, now: DateTime<Utc>) -> bool {
        let local = now.with_timezone(&self.time_zone);
        let minute = (local.hour() * 60 + local.minute()) as u16;

        self.interval(local.weekday())
            .is_some_and(|iv| iv.contains(minute))
    }
}

/// Resolves an IANA time zone name.
pub fn parse_time_zone(name: &str) -> ValidationResult<Tz> {
    name.parse::<Tz>()
        .map_err(|e| ValidationError::invalid("time_zone", format!("{name:?}: {e}")))
}

// =============================================================================
// Parental Settings
// =============================================================================

/// Parental-control configuration of a profile.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ParentalConfig {
    /// Whether parental control is enabled.
    pub enabled: bool,
    /// Block adult content.
    pub block_adult: bool,
    /// Enforce safe search on general search engines.
    pub general_safe_search: bool,
    /// Enforce restricted mode on YouTube.
    pub youtube_safe_search: bool,
    /// Services blocked for this profile.
    pub blocked_services: Vec<BlockedServiceId>,
    /// When parental control applies; `None` means always.
    pub schedule: Option<WeeklySchedule>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_day_interval_bounds() {
        assert!(DayInterval::new(0, MINUTES_PER_DAY).is_ok());
        assert!(DayInterval::new(10, 10).is_ok());
        assert!(DayInterval::new(11, 10).is_err());
        assert!(DayInterval::new(0, MINUTES_PER_DAY + 1).is_err());
    }

    #[test]
    fn test_unknown_time_zone() {
        let days = [None; 7];
        assert!(WeeklySchedule::new(days, "Europe/Brussels").is_ok());
        assert!(WeeklySchedule::new(days, "Mars/Olympus_Mons").is_err());
    }

    #[test]
    fn test_schedule_contains_uses_local_time() {
        let mut days = [None; 7];
        // Monday 09:00-17:00 local.
        days[0] = Some(DayInterval::new(9 * 60, 17 * 60).unwrap());
        let schedule = WeeklySchedule::new(days, "Asia/Tokyo").unwrap();

        // 2024-01-01 is a Monday; 01:00 UTC is 10:00 in Tokyo.
        let inside = Utc.with_ymd_and_hms(2024, 1, 1, 1, 0, 0).unwrap();
        assert!(schedule.contains(inside));

        // 09:00 UTC is 18:00 in Tokyo.
        let outside = Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap();
        assert!(!schedule.contains(outside));
    }
}
