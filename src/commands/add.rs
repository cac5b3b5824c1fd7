use anyhow::{Context, Result};
use chrono::{Duration, NaiveDate};
use chrono_tz::Tz;
use ocal_core::timeutils::{all_day_span, parse_datetime};
use ocal_core::{CalendarProvider, Event, Recurrence, Reminder};
use owo_colors::OwoColorize;

use crate::render::render_summary;
use crate::utils::tui::with_spinner;

pub struct AddArgs {
    pub subject: String,
    pub start: String,
    pub end: Option<String>,
    pub location: Option<String>,
    pub body: Option<String>,
    pub attendees: Vec<String>,
    pub reminder: Option<i64>,
    pub all_day: bool,
    pub recurrence: Option<String>,
}

pub async fn run(args: AddArgs, tz: Option<&str>) -> Result<()> {
    let config = super::load_config(tz, None)?;
    let timezone = super::timezone(&config)?;
    let event = build_event(args, &timezone)?;

    let provider = super::connect(&config)?;
    let id = with_spinner("Creating event...", provider.add(&event)).await?;

    println!("{}", format!("Event created: {id}").green());
    println!("{}", render_summary(&event));
    Ok(())
}

fn build_event(args: AddArgs, tz: &Tz) -> Result<Event> {
    let start = parse_datetime(&args.start, tz)?;

    let event = if args.all_day {
        let end_date = match &args.end {
            Some(end) => parse_datetime(end, tz)?.date_naive(),
            None => start.date_naive(),
        };
        all_day_event(args.subject, start.date_naive(), end_date, tz)?
    } else {
        let end = args
            .end
            .as_deref()
            .context("--end is required unless --all-day is given")?;
        Event::new(args.subject, start, parse_datetime(end, tz)?)?
    };

    let recurrence = args
        .recurrence
        .as_deref()
        .map(str::parse::<Recurrence>)
        .transpose()?;

    Ok(event
        .with_location(args.location)
        .with_body(args.body)
        .with_attendees(args.attendees)
        .with_reminder(args.reminder.map(Reminder::minutes_before))
        .with_recurrence(recurrence))
}

/// All-day event covering `start_date..=end_date`.
fn all_day_event(
    subject: String,
    start_date: NaiveDate,
    end_date: NaiveDate,
    tz: &Tz,
) -> Result<Event> {
    let (start, end, all_day) = all_day_span(start_date, end_date + Duration::days(1), tz)?;
    let event = if all_day {
        Event::new_all_day(subject, start, end)?
    } else {
        Event::new(subject, start, end)?
    };
    Ok(event)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Timelike};
    use ocal_core::Frequency;

    fn args(start: &str, end: Option<&str>) -> AddArgs {
        AddArgs {
            subject: "Planning".into(),
            start: start.into(),
            end: end.map(String::from),
            location: None,
            body: None,
            attendees: vec![],
            reminder: None,
            all_day: false,
            recurrence: None,
        }
    }

    #[test]
    fn timed_event_with_extras() {
        let tz = Tz::America__New_York;
        let event = build_event(
            AddArgs {
                location: Some("Room 1".into()),
                attendees: vec!["a@example.com".into()],
                reminder: Some(10),
                recurrence: Some("FREQ=WEEKLY;COUNT=4".into()),
                ..args("2025-03-20T15:00", Some("2025-03-20T16:00"))
            },
            &tz,
        )
        .unwrap();

        assert_eq!(event.start, tz.with_ymd_and_hms(2025, 3, 20, 15, 0, 0).unwrap());
        assert_eq!(event.end, tz.with_ymd_and_hms(2025, 3, 20, 16, 0, 0).unwrap());
        assert_eq!(event.location.as_deref(), Some("Room 1"));
        assert_eq!(event.reminder, Some(Reminder::minutes_before(10)));
        assert_eq!(event.recurrence.unwrap().frequency, Frequency::Weekly);
    }

    #[test]
    fn timed_event_needs_end() {
        assert!(build_event(args("2025-03-20T15:00", None), &Tz::UTC).is_err());
    }

    #[test]
    fn end_before_start_is_rejected() {
        assert!(build_event(args("2025-03-20T15:00", Some("2025-03-20T14:00")), &Tz::UTC).is_err());
    }

    #[test]
    fn single_all_day() {
        let event = build_event(
            AddArgs {
                all_day: true,
                ..args("2025-03-20", None)
            },
            &Tz::UTC,
        )
        .unwrap();

        assert!(event.all_day);
        assert_eq!(event.start.date_naive(), event.end.date_naive());
        assert_eq!(event.start.hour(), 0);
        assert_eq!(event.end.hour(), 23);
    }

    #[test]
    fn multi_day_all_day_spans_midnights() {
        let event = build_event(
            AddArgs {
                all_day: true,
                ..args("2025-03-20", Some("2025-03-22"))
            },
            &Tz::UTC,
        )
        .unwrap();

        assert!(!event.all_day);
        assert_eq!(event.end, Tz::UTC.with_ymd_and_hms(2025, 3, 23, 0, 0, 0).unwrap());
    }

    #[test]
    fn bad_recurrence_is_rejected() {
        let result = build_event(
            AddArgs {
                recurrence: Some("FREQ=HOURLY".into()),
                ..args("2025-03-20T15:00", Some("2025-03-20T16:00"))
            },
            &Tz::UTC,
        );
        assert!(result.is_err());
    }
}
