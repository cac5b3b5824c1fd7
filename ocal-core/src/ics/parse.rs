//! ICS parsing using the icalendar crate's parser.

use chrono::{DateTime, NaiveDate};
use chrono_tz::Tz;
use icalendar::{
    CalendarDateTime, DatePerhapsTime,
    parser::{Component, Property, read_calendar, unfold},
};

use crate::error::{OcalError, OcalResult};
use crate::event::{Event, Recurrence, Reminder};
use crate::timeutils::all_day_span;
use crate::timezone::{localize, resolve_timezone};

/// Parse every VEVENT in `content` into an [`Event`].
///
/// Floating times and unknown TZIDs are attached to `tz`. Events that cannot
/// be converted are skipped with a warning.
pub fn parse_ics_events(content: &str, tz: &Tz) -> OcalResult<Vec<Event>> {
    let unfolded = unfold(content);
    let calendar = read_calendar(&unfolded).map_err(|e| OcalError::IcsParse(e.to_string()))?;

    let events = calendar
        .components
        .iter()
        .filter(|c| c.name == "VEVENT")
        .filter_map(|vevent| match parse_vevent(vevent, tz) {
            Ok(event) => Some(event),
            Err(e) => {
                let summary = vevent.find_prop("SUMMARY").map(|p| p.val.to_string());
                tracing::warn!(?summary, error = %e, "skipping calendar entry");
                None
            }
        })
        .collect::<Vec<_>>();

    tracing::debug!(count = events.len(), "parsed ICS events");
    Ok(events)
}

enum IcsTime {
    Date(NaiveDate),
    Instant(DateTime<Tz>),
}

fn parse_vevent(vevent: &Component<'_>, tz: &Tz) -> OcalResult<Event> {
    let title = text_prop(vevent, "SUMMARY").unwrap_or_default();
    let start = time_prop(vevent, "DTSTART", tz)?;
    let end = time_prop(vevent, "DTEND", tz)?;

    let event = match (start, end) {
        (IcsTime::Date(start), IcsTime::Date(end)) => {
            let (start, end, all_day) = all_day_span(start, end, tz)?;
            if all_day {
                Event::new_all_day(title, start, end)?
            } else {
                Event::new(title, start, end)?
            }
        }
        (IcsTime::Instant(start), IcsTime::Instant(end)) => Event::new(title, start, end)?,
        _ => {
            return Err(OcalError::IcsParse(
                "DTSTART and DTEND mix date and date-time values".into(),
            ));
        }
    };

    let attendees = vevent
        .properties
        .iter()
        .filter(|p| p.name == "ATTENDEE")
        .filter_map(attendee_email)
        .collect();

    let recurrence = vevent
        .find_prop("RRULE")
        .and_then(|p| match p.val.as_ref().parse::<Recurrence>() {
            Ok(rule) => Some(rule),
            Err(e) => {
                tracing::debug!(rule = p.val.as_ref(), error = %e, "dropping recurrence rule");
                None
            }
        });

    let reminder = vevent
        .components
        .iter()
        .filter(|c| c.name == "VALARM")
        .find_map(|alarm| parse_trigger_minutes(alarm.find_prop("TRIGGER")?.val.as_ref()))
        .filter(|minutes| *minutes >= 0)
        .map(Reminder::minutes_before);

    Ok(event
        .with_body(text_prop(vevent, "DESCRIPTION"))
        .with_location(text_prop(vevent, "LOCATION"))
        .with_attendees(attendees)
        .with_recurrence(recurrence)
        .with_reminder(reminder))
}

fn text_prop(vevent: &Component<'_>, name: &str) -> Option<String> {
    vevent
        .find_prop(name)
        .map(|p| p.val.to_string())
        .filter(|v| !v.trim().is_empty())
}

fn time_prop(vevent: &Component<'_>, name: &str, tz: &Tz) -> OcalResult<IcsTime> {
    let prop = vevent
        .find_prop(name)
        .ok_or_else(|| OcalError::IcsParse(format!("missing {name}")))?;
    let value = DatePerhapsTime::try_from(prop)
        .map_err(|_| OcalError::IcsParse(format!("invalid {name}: {}", prop.val.as_ref())))?;
    Ok(to_ics_time(value, tz))
}

/// Attach a zone to icalendar's DatePerhapsTime.
fn to_ics_time(dpt: DatePerhapsTime, tz: &Tz) -> IcsTime {
    match dpt {
        DatePerhapsTime::Date(d) => IcsTime::Date(d),
        DatePerhapsTime::DateTime(cal_dt) => IcsTime::Instant(match cal_dt {
            CalendarDateTime::Utc(dt) => dt.with_timezone(tz),
            CalendarDateTime::Floating(naive) => localize(tz, naive),
            CalendarDateTime::WithTimezone { date_time, tzid } => match resolve_timezone(&tzid) {
                Ok(zone) => localize(&zone, date_time),
                Err(e) => {
                    tracing::warn!(%tzid, fallback = %tz, error = %e, "unknown TZID");
                    localize(tz, date_time)
                }
            },
        }),
    }
}

/// E-mail address of an ATTENDEE property (`mailto:` stripped).
fn attendee_email(prop: &Property) -> Option<String> {
    let value = prop.val.as_ref().trim();
    let email = value
        .strip_prefix("mailto:")
        .or_else(|| value.strip_prefix("MAILTO:"))
        .unwrap_or(value);
    (!email.is_empty()).then(|| email.to_string())
}

/// Parse TRIGGER value to minutes before event (-PT30M, -P1D, etc.)
fn parse_trigger_minutes(value: &str) -> Option<i64> {
    let is_before = value.starts_with('-');
    let duration_str = value.trim_start_matches(['-', '+']);

    let duration = iso8601::duration(duration_str).ok()?;
    let std_duration: std::time::Duration = duration.into();
    let minutes = (std_duration.as_secs() / 60) as i64;

    Some(if is_before { minutes } else { -minutes })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::Frequency;
    use chrono::{Duration, TimeZone, Timelike, Weekday};

    const CALENDAR: &str = "BEGIN:VCALENDAR\r\n\
VERSION:2.0\r\n\
PRODID:TEST\r\n\
BEGIN:VEVENT\r\n\
UID:timed-1\r\n\
SUMMARY:Planning\r\n\
DESCRIPTION:Quarterly \r\n planning\r\n\
LOCATION:Room 4\r\n\
DTSTART:20250115T100000Z\r\n\
DTEND:20250115T110000Z\r\n\
ATTENDEE;CN=Alice:mailto:alice@example.com\r\n\
ATTENDEE:MAILTO:bob@example.com\r\n\
RRULE:FREQ=WEEKLY;BYDAY=WE;COUNT=4\r\n\
BEGIN:VALARM\r\n\
ACTION:DISPLAY\r\n\
TRIGGER:-PT30M\r\n\
END:VALARM\r\n\
END:VEVENT\r\n\
BEGIN:VEVENT\r\n\
UID:zoned-1\r\n\
SUMMARY:Call\r\n\
DTSTART;TZID=America/New_York:20250116T090000\r\n\
DTEND;TZID=America/New_York:20250116T093000\r\n\
END:VEVENT\r\n\
BEGIN:VEVENT\r\n\
UID:holiday-1\r\n\
SUMMARY:Holiday\r\n\
DTSTART;VALUE=DATE:20250120\r\n\
DTEND;VALUE=DATE:20250121\r\n\
END:VEVENT\r\n\
BEGIN:VEVENT\r\n\
UID:trip-1\r\n\
SUMMARY:Trip\r\n\
DTSTART;VALUE=DATE:20250201\r\n\
DTEND;VALUE=DATE:20250204\r\n\
END:VEVENT\r\n\
BEGIN:VEVENT\r\n\
UID:broken-1\r\n\
SUMMARY:No end\r\n\
DTSTART:20250115T100000Z\r\n\
END:VEVENT\r\n\
END:VCALENDAR\r\n";

    fn parsed() -> Vec<Event> {
        parse_ics_events(CALENDAR, &Tz::Europe__Dublin).unwrap()
    }

    #[test]
    fn skips_events_without_end() {
        let titles: Vec<_> = parsed().into_iter().map(|e| e.title).collect();
        assert_eq!(titles, vec!["Planning", "Call", "Holiday", "Trip"]);
    }

    #[test]
    fn timed_utc_event_fields() {
        let event = &parsed()[0];
        assert_eq!(event.start.timezone(), Tz::Europe__Dublin);
        assert_eq!(event.start.naive_utc().hour(), 10);
        assert_eq!(event.end - event.start, Duration::hours(1));
        assert_eq!(event.location.as_deref(), Some("Room 4"));
        assert_eq!(event.body.as_deref(), Some("Quarterly planning"));
        assert_eq!(event.attendees, vec!["alice@example.com", "bob@example.com"]);
        assert_eq!(event.reminder, Some(Reminder::minutes_before(30)));

        let rule = event.recurrence.as_ref().unwrap();
        assert_eq!(rule.frequency, Frequency::Weekly);
        assert_eq!(rule.days_of_week, vec![Weekday::Wed]);
        assert_eq!(rule.count, Some(4));
    }

    #[test]
    fn tzid_is_honoured() {
        let event = &parsed()[1];
        assert_eq!(
            event.start,
            Tz::America__New_York.with_ymd_and_hms(2025, 1, 16, 9, 0, 0).unwrap()
        );
        assert!(!event.all_day);
    }

    #[test]
    fn single_date_is_all_day() {
        let event = &parsed()[2];
        assert!(event.all_day);
        assert_eq!(event.start.date_naive(), NaiveDate::from_ymd_opt(2025, 1, 20).unwrap());
        assert_eq!(event.start.date_naive(), event.end.date_naive());
    }

    #[test]
    fn multi_date_span_is_timed() {
        let event = &parsed()[3];
        assert!(!event.all_day);
        assert_eq!(event.end - event.start, Duration::days(3));
    }

    #[test]
    fn floating_and_unknown_zones_use_target_timezone() {
        let ics = "BEGIN:VCALENDAR\r\n\
VERSION:2.0\r\n\
BEGIN:VEVENT\r\n\
SUMMARY:Floating\r\n\
DTSTART:20250301T080000\r\n\
DTEND:20250301T090000\r\n\
END:VEVENT\r\n\
BEGIN:VEVENT\r\n\
SUMMARY:Custom zone\r\n\
DTSTART;TZID=Custom Standard Time:20250301T080000\r\n\
DTEND;TZID=Custom Standard Time:20250301T090000\r\n\
END:VEVENT\r\n\
END:VCALENDAR\r\n";
        let events = parse_ics_events(ics, &Tz::Asia__Tokyo).unwrap();
        assert_eq!(events.len(), 2);
        for event in events {
            assert_eq!(event.start.timezone(), Tz::Asia__Tokyo);
            assert_eq!(event.start.hour(), 8);
        }
    }

    #[test]
    fn calendar_without_events() {
        let ics = "BEGIN:VCALENDAR\r\nVERSION:2.0\r\nPRODID:TEST\r\nEND:VCALENDAR\r\n";
        assert!(parse_ics_events(ics, &Tz::UTC).unwrap().is_empty());
    }

    #[test]
    fn trigger_minutes() {
        assert_eq!(parse_trigger_minutes("-PT15M"), Some(15));
        assert_eq!(parse_trigger_minutes("-P1D"), Some(1440));
        assert_eq!(parse_trigger_minutes("PT5M"), Some(-5));
        assert_eq!(parse_trigger_minutes("soon"), None);
    }
}
