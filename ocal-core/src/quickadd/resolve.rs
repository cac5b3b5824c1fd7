//! Turning a day reference and a time phrase into an instant.

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveTime, Utc};
use chrono_tz::Tz;

use super::segment::DayReference;
use crate::timezone::localize;

/// 09:00, used when no time is given or the phrase is unusable.
fn default_time() -> NaiveTime {
    NaiveTime::MIN + Duration::hours(9)
}

/// Resolve `day` relative to `today`.
///
/// A weekday always lands 1 to 7 days ahead: asking for today's weekday
/// schedules it a week out.
pub fn resolve_date(day: Option<DayReference>, today: NaiveDate) -> NaiveDate {
    match day.unwrap_or(DayReference::Today) {
        DayReference::Today => today,
        DayReference::Tomorrow => today + Duration::days(1),
        DayReference::Weekday(target) => {
            let current = today.weekday().num_days_from_monday() as i64;
            let mut days_ahead = target.num_days_from_monday() as i64 - current;
            if days_ahead <= 0 {
                days_ahead += 7;
            }
            today + Duration::days(days_ahead)
        }
    }
}

/// Parse `4pm`, `9:30`, `12 AM` or `14:00` into a time of day.
///
/// Anything unparseable or out of range yields 09:00.
pub fn parse_time_phrase(phrase: &str) -> NaiveTime {
    parse_clock_time(phrase).unwrap_or_else(|| {
        tracing::debug!(phrase, "unusable time phrase, defaulting to 09:00");
        default_time()
    })
}

fn parse_clock_time(phrase: &str) -> Option<NaiveTime> {
    let lower = phrase.trim().to_lowercase();
    let (digits, meridiem) = if let Some(rest) = lower.strip_suffix("pm") {
        (rest.trim_end(), Some(Meridiem::Pm))
    } else if let Some(rest) = lower.strip_suffix("am") {
        (rest.trim_end(), Some(Meridiem::Am))
    } else {
        (lower.as_str(), None)
    };

    let (hour, minute) = match digits.split_once(':') {
        Some((h, m)) => (h.trim().parse::<u32>().ok()?, m.trim().parse::<u32>().ok()?),
        None => (digits.trim().parse::<u32>().ok()?, 0),
    };

    let hour = match meridiem {
        Some(_) if !(1..=12).contains(&hour) => return None,
        Some(Meridiem::Pm) if hour != 12 => hour + 12,
        Some(Meridiem::Am) if hour == 12 => 0,
        _ => hour,
    };

    NaiveTime::from_hms_opt(hour, minute, 0)
}

#[derive(Debug, Clone, Copy)]
enum Meridiem {
    Am,
    Pm,
}

/// Start instant for a quick-add event in `tz`.
///
/// "Today" is the date of `now` as seen in `tz`.
pub fn resolve_start(
    day: Option<DayReference>,
    time: Option<&str>,
    tz: &Tz,
    now: DateTime<Utc>,
) -> DateTime<Tz> {
    let today = now.with_timezone(tz).date_naive();
    let date = resolve_date(day, today);
    let time = time.map(parse_time_phrase).unwrap_or_else(default_time);
    localize(tz, date.and_time(time))
}
