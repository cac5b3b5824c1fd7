use chrono::{DateTime, NaiveDate, NaiveDateTime, Weekday};
use chrono_tz::Tz;
use ocal_core::error::{OcalError, OcalResult};
use ocal_core::event::{Event, Frequency, Recurrence, Reminder};
use ocal_core::timeutils::all_day_span;
use ocal_core::timezone::{localize, resolve_timezone};

use super::types::{DateTimeTimeZone, GraphEvent, ItemBody, PatternedRecurrence};

/// Width used when flattening HTML bodies.
const BODY_WIDTH: usize = 100;

pub trait FromGraph {
    /// Decode a Graph event, expressing its times in `tz`.
    fn from_graph(event: GraphEvent, tz: &Tz) -> OcalResult<Self>
    where
        Self: Sized;
}

impl FromGraph for Event {
    fn from_graph(event: GraphEvent, tz: &Tz) -> OcalResult<Self> {
        let start = event
            .start
            .as_ref()
            .ok_or_else(|| OcalError::WireFormat("Event has no start time".into()))?;
        let end = event
            .end
            .as_ref()
            .ok_or_else(|| OcalError::WireFormat("Event has no end time".into()))?;

        let title = event.subject.unwrap_or_default();

        let decoded = if event.is_all_day.unwrap_or(false) {
            let (start, end, all_day) = all_day_span(wire_date(start)?, wire_date(end)?, tz)?;
            if all_day {
                Event::new_all_day(title, start, end)?
            } else {
                Event::new(title, start, end)?
            }
        } else {
            Event::new(title, wire_instant(start, tz)?, wire_instant(end, tz)?)?
        };

        let attendees = event
            .attendees
            .unwrap_or_default()
            .into_iter()
            .filter_map(|a| a.email_address.address)
            .filter(|address| !address.is_empty())
            .collect();

        let reminder = match event.is_reminder_on {
            Some(true) => Some(match event.reminder_minutes_before_start {
                Some(minutes) => Reminder::minutes_before(minutes),
                None => Reminder::default(),
            }),
            _ => None,
        };

        Ok(decoded
            .with_id(event.id)
            .with_body(event.body.and_then(body_text))
            .with_location(
                event
                    .location
                    .and_then(|l| l.display_name)
                    .filter(|name| !name.trim().is_empty()),
            )
            .with_attendees(attendees)
            .with_recurrence(event.recurrence.as_ref().and_then(recurrence_from_graph))
            .with_reminder(reminder))
    }
}

/// Pad or truncate the fractional seconds of a wire timestamp to exactly six
/// digits. A trailing `Z` becomes `+00:00`.
///
/// `2025-01-15T10:00:00.1234567Z` becomes `2025-01-15T10:00:00.123456+00:00`.
pub fn normalize_fractional_seconds(value: &str) -> String {
    let value = value.replace('Z', "+00:00");
    let Some(dot) = value.find('.') else {
        return value;
    };

    let after_dot = &value[dot + 1..];
    let fraction_len = after_dot
        .find('+')
        .or_else(|| after_dot.find('-'))
        .unwrap_or(after_dot.len());
    let (fraction, offset) = after_dot.split_at(fraction_len);

    let mut micros: String = fraction.chars().take(6).collect();
    while micros.len() < 6 {
        micros.push('0');
    }

    format!("{}.{micros}{offset}", &value[..dot])
}

/// Decode a timed wire value into `tz`.
///
/// Values carrying an offset keep their instant. Naive values are read in the
/// value's own `timeZone`; unknown zone names fall back to `tz`.
fn wire_instant(value: &DateTimeTimeZone, tz: &Tz) -> OcalResult<DateTime<Tz>> {
    let normalized = normalize_fractional_seconds(value.date_time.trim());

    if let Ok(dt) = DateTime::parse_from_rfc3339(&normalized) {
        return Ok(dt.with_timezone(tz));
    }

    let naive = NaiveDateTime::parse_from_str(&normalized, "%Y-%m-%dT%H:%M:%S%.f")
        .map_err(|e| OcalError::WireFormat(format!("Invalid dateTime '{}': {e}", value.date_time)))?;

    let zone = match value.time_zone.as_deref() {
        Some(name) => resolve_timezone(name).unwrap_or_else(|e| {
            tracing::warn!(error = %e, fallback = %tz, "unrecognised event timezone");
            *tz
        }),
        None => *tz,
    };

    Ok(localize(&zone, naive).with_timezone(tz))
}

/// The date part (first ten characters) of a wire value.
fn wire_date(value: &DateTimeTimeZone) -> OcalResult<NaiveDate> {
    let date_part = value.date_time.get(..10).unwrap_or(&value.date_time);
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d")
        .map_err(|e| OcalError::WireFormat(format!("Invalid date '{}': {e}", value.date_time)))
}

/// Plain text of an event body; HTML is flattened.
fn body_text(body: ItemBody) -> Option<String> {
    let text = if body.content_type.eq_ignore_ascii_case("html") {
        html2text::from_read(body.content.as_bytes(), BODY_WIDTH).unwrap_or_else(|e| {
            tracing::warn!(error = %e, "could not convert HTML body, keeping markup");
            body.content.clone()
        })
    } else {
        body.content
    };

    let text = text.trim();
    (!text.is_empty()).then(|| text.to_string())
}

fn recurrence_from_graph(recurrence: &PatternedRecurrence) -> Option<Recurrence> {
    let frequency = match recurrence.pattern.pattern_type.as_str() {
        "daily" => Frequency::Daily,
        "weekly" => Frequency::Weekly,
        "absoluteMonthly" | "relativeMonthly" => Frequency::Monthly,
        "absoluteYearly" | "relativeYearly" => Frequency::Yearly,
        other => {
            tracing::debug!(pattern = other, "unsupported recurrence pattern");
            return None;
        }
    };

    let range = &recurrence.range;
    let end_date = match range.range_type.as_str() {
        "endDate" => range
            .end_date
            .as_deref()
            .and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok()),
        _ => None,
    };
    let count = match range.range_type.as_str() {
        "numbered" => range.number_of_occurrences,
        _ => None,
    };

    Some(Recurrence {
        frequency,
        interval: recurrence.pattern.interval.max(1),
        days_of_week: recurrence
            .pattern
            .days_of_week
            .iter()
            .filter_map(|d| d.parse::<Weekday>().ok())
            .collect(),
        end_date,
        count,
    })
}
