use chrono::{DateTime, Datelike, Duration, NaiveDate, Weekday};
use chrono_tz::Tz;
use ocal_core::event::{Event, EventPatch, Frequency, Recurrence, Reminder};

use super::types::{
    Attendee, DateTimeTimeZone, EmailAddress, GraphEvent, ItemBody, Location,
    PatternedRecurrence, RecurrencePattern, RecurrenceRange,
};

const WIRE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

pub trait ToGraph {
    fn to_graph(&self) -> GraphEvent;
}

impl ToGraph for Event {
    fn to_graph(&self) -> GraphEvent {
        let (start, end) = if self.all_day {
            let tz = self.timezone();
            let end_date = self.end.with_timezone(&tz).date_naive();
            (
                date_to_graph(self.start.date_naive(), &tz),
                date_to_graph(end_date + Duration::days(1), &tz),
            )
        } else {
            (time_to_graph(&self.start), time_to_graph(&self.end))
        };

        GraphEvent {
            id: None,
            subject: Some(self.title.clone()),
            body: self.body.as_deref().map(body_to_graph),
            location: self.location.as_deref().map(location_to_graph),
            start: Some(start),
            end: Some(end),
            is_all_day: Some(self.all_day),
            attendees: (!self.attendees.is_empty()).then(|| attendees_to_graph(&self.attendees)),
            recurrence: self
                .recurrence
                .as_ref()
                .map(|r| recurrence_to_graph(r, self.start.date_naive())),
            ..reminder_to_graph(self.reminder.as_ref())
        }
    }
}

impl ToGraph for EventPatch {
    fn to_graph(&self) -> GraphEvent {
        let reminder = match &self.reminder {
            Some(reminder) => reminder_to_graph(Some(reminder)),
            None => GraphEvent::default(),
        };

        GraphEvent {
            subject: self.title.clone(),
            body: self.body.as_deref().map(body_to_graph),
            location: self.location.as_deref().map(location_to_graph),
            start: self.start.as_ref().map(time_to_graph),
            end: self.end.as_ref().map(time_to_graph),
            attendees: self.attendees.as_deref().map(attendees_to_graph),
            ..reminder
        }
    }
}

/// Naive local time plus the IANA zone name.
fn time_to_graph(dt: &DateTime<Tz>) -> DateTimeTimeZone {
    DateTimeTimeZone {
        date_time: dt.naive_local().format(WIRE_FORMAT).to_string(),
        time_zone: Some(dt.timezone().name().to_string()),
    }
}

fn date_to_graph(date: NaiveDate, tz: &Tz) -> DateTimeTimeZone {
    DateTimeTimeZone {
        date_time: format!("{}T00:00:00", date.format("%Y-%m-%d")),
        time_zone: Some(tz.name().to_string()),
    }
}

fn body_to_graph(content: &str) -> ItemBody {
    ItemBody {
        content_type: "text".to_string(),
        content: content.to_string(),
    }
}

fn location_to_graph(name: &str) -> Location {
    Location {
        display_name: Some(name.to_string()),
    }
}

fn attendees_to_graph(emails: &[String]) -> Vec<Attendee> {
    emails
        .iter()
        .map(|email| Attendee {
            email_address: EmailAddress {
                address: Some(email.clone()),
                name: None,
            },
            attendee_type: Some("required".to_string()),
        })
        .collect()
}

/// Only the reminder fields are set.
fn reminder_to_graph(reminder: Option<&Reminder>) -> GraphEvent {
    match reminder {
        Some(r) if r.is_enabled => GraphEvent {
            is_reminder_on: Some(true),
            reminder_minutes_before_start: Some(r.minutes_before_start),
            ..Default::default()
        },
        _ => GraphEvent {
            is_reminder_on: Some(false),
            ..Default::default()
        },
    }
}

fn recurrence_to_graph(recurrence: &Recurrence, start_date: NaiveDate) -> PatternedRecurrence {
    let (pattern_type, day_of_month, month) = match recurrence.frequency {
        Frequency::Daily => ("daily", None, None),
        Frequency::Weekly => ("weekly", None, None),
        Frequency::Monthly => ("absoluteMonthly", Some(start_date.day()), None),
        Frequency::Yearly => ("absoluteYearly", Some(start_date.day()), Some(start_date.month())),
    };

    let mut days_of_week: Vec<String> = recurrence
        .days_of_week
        .iter()
        .map(|d| weekday_name(*d).to_string())
        .collect();
    if days_of_week.is_empty() && recurrence.frequency == Frequency::Weekly {
        days_of_week.push(weekday_name(start_date.weekday()).to_string());
    }

    let range = match (recurrence.end_date, recurrence.count) {
        (Some(end), _) => RecurrenceRange {
            range_type: "endDate".to_string(),
            start_date: Some(start_date.to_string()),
            end_date: Some(end.to_string()),
            number_of_occurrences: None,
        },
        (None, Some(count)) => RecurrenceRange {
            range_type: "numbered".to_string(),
            start_date: Some(start_date.to_string()),
            end_date: None,
            number_of_occurrences: Some(count),
        },
        (None, None) => RecurrenceRange {
            range_type: "noEnd".to_string(),
            start_date: Some(start_date.to_string()),
            end_date: None,
            number_of_occurrences: None,
        },
    };

    PatternedRecurrence {
        pattern: RecurrencePattern {
            pattern_type: pattern_type.to_string(),
            interval: recurrence.interval,
            days_of_week,
            day_of_month,
            month,
        },
        range,
    }
}

fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "monday",
        Weekday::Tue => "tuesday",
        Weekday::Wed => "wednesday",
        Weekday::Thu => "thursday",
        Weekday::Fri => "friday",
        Weekday::Sat => "saturday",
        Weekday::Sun => "sunday",
    }
}
