//! Date range for listing and searching events.

use chrono::{DateTime, Duration};
use chrono_tz::Tz;

use crate::clock::Clock;
use crate::error::{OcalError, OcalResult};
use crate::timeutils::{end_of_day, is_date_only, parse_datetime, start_of_day};

/// Days covered by the agenda when no end is given.
pub const DEFAULT_AGENDA_DAYS: i64 = 7;

/// Days searched when no range is given.
pub const DEFAULT_SEARCH_DAYS: i64 = 30;

/// A half-open window of time, `start <= t < end`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateRange {
    pub start: DateTime<Tz>,
    pub end: DateTime<Tz>,
}

impl DateRange {
    pub fn new(start: DateTime<Tz>, end: DateTime<Tz>) -> OcalResult<Self> {
        if end <= start {
            return Err(OcalError::InvalidDateTime(format!(
                "range end ({end}) must be after its start ({start})"
            )));
        }
        Ok(DateRange { start, end })
    }

    /// Build a range from optional user input.
    /// - `start`: defaults to midnight today
    /// - `end`: defaults to start + DEFAULT_AGENDA_DAYS; a bare date means the end of that day
    pub fn parse(
        start: Option<&str>,
        end: Option<&str>,
        tz: &Tz,
        clock: &impl Clock,
    ) -> OcalResult<Self> {
        let start_dt = match start {
            Some(s) => parse_datetime(s, tz)?,
            None => start_of_day(clock.now().with_timezone(tz).date_naive(), tz),
        };

        let end_dt = match end {
            Some(s) if is_date_only(s) => {
                let date = parse_datetime(s, tz)?.date_naive();
                end_of_day(date, tz)
            }
            Some(s) => parse_datetime(s, tz)?,
            None => start_dt + Duration::days(DEFAULT_AGENDA_DAYS),
        };

        DateRange::new(start_dt, end_dt)
    }

    /// The whole calendar day containing `day` (default: today).
    pub fn day(day: Option<&str>, tz: &Tz, clock: &impl Clock) -> OcalResult<Self> {
        let date = match day {
            Some(s) => parse_datetime(s, tz)?.date_naive(),
            None => clock.now().with_timezone(tz).date_naive(),
        };
        DateRange::new(start_of_day(date, tz), end_of_day(date, tz))
    }

    /// From now until `days` ahead.
    pub fn upcoming(days: i64, tz: &Tz, clock: &impl Clock) -> Self {
        let start = clock.now().with_timezone(tz);
        DateRange {
            start,
            end: start + Duration::days(days),
        }
    }
}
