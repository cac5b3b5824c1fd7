//! Date/time parsing and all-day helpers.

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use chrono_tz::Tz;

use crate::error::{OcalError, OcalResult};
use crate::timezone::localize;

const NAIVE_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

/// Parse a user-supplied date or date-time.
///
/// - RFC 3339 (`2025-01-15T10:00:00+01:00`): same instant, expressed in `tz`
/// - `YYYY-MM-DD HH:MM[:SS]` or with a `T`: local time in `tz`
/// - `YYYY-MM-DD`: midnight in `tz`
pub fn parse_datetime(text: &str, tz: &Tz) -> OcalResult<DateTime<Tz>> {
    let text = text.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Ok(dt.with_timezone(tz));
    }

    for format in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(text, format) {
            return Ok(localize(tz, naive));
        }
    }

    if let Ok(date) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
        return Ok(start_of_day(date, tz));
    }

    Err(OcalError::InvalidDateTime(format!(
        "'{text}'. Expected YYYY-MM-DD, YYYY-MM-DD HH:MM or RFC 3339"
    )))
}

/// Whether `text` carries only a date.
pub fn is_date_only(text: &str) -> bool {
    NaiveDate::parse_from_str(text.trim(), "%Y-%m-%d").is_ok()
}

/// Local midnight of `date` in `tz`.
pub fn start_of_day(date: NaiveDate, tz: &Tz) -> DateTime<Tz> {
    localize(tz, date.and_time(NaiveTime::MIN))
}

/// Last representable microsecond of `date` in `tz`.
pub fn end_of_day(date: NaiveDate, tz: &Tz) -> DateTime<Tz> {
    let last = NaiveTime::MIN - Duration::microseconds(1);
    localize(tz, date.and_time(last))
}

fn is_midnight<T: Timelike>(t: &T) -> bool {
    t.hour() == 0 && t.minute() == 0 && t.second() == 0
}

/// Both bounds at midnight on different dates.
pub fn is_all_day_span(start: &DateTime<Tz>, end: &DateTime<Tz>) -> bool {
    is_midnight(start) && is_midnight(end) && start.date_naive() != end.date_naive()
}

/// Midnight and the last microsecond of the date of `instant`.
pub fn all_day_bounds(instant: &DateTime<Tz>) -> (DateTime<Tz>, DateTime<Tz>) {
    let tz = instant.timezone();
    let date = instant.date_naive();
    (start_of_day(date, &tz), end_of_day(date, &tz))
}

/// Bounds of a date span whose end date is exclusive.
///
/// A single day becomes an all-day event within that date. Longer spans
/// cannot satisfy the same-date rule and are kept as timed events from
/// midnight to midnight.
pub fn all_day_span(
    start_date: NaiveDate,
    end_date_exclusive: NaiveDate,
    tz: &Tz,
) -> OcalResult<(DateTime<Tz>, DateTime<Tz>, bool)> {
    let days = (end_date_exclusive - start_date).num_days();
    match days {
        d if d < 1 => Err(OcalError::InvalidEvent(format!(
            "All-day span ends ({end_date_exclusive}) before it starts ({start_date})"
        ))),
        1 => Ok((start_of_day(start_date, tz), end_of_day(start_date, tz), true)),
        _ => Ok((
            start_of_day(start_date, tz),
            start_of_day(end_date_exclusive, tz),
            false,
        )),
    }
}
