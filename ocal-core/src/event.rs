//! Normalized event types.
//!
//! These types are independent of any remote wire format. Providers convert
//! their API payloads into [`Event`], and the CLI and quick-add parser work
//! exclusively with them.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Weekday};
use chrono_tz::Tz;

use crate::error::{OcalError, OcalResult};

/// Default reminder lead time in minutes.
pub const DEFAULT_REMINDER_MINUTES: i64 = 15;

/// A calendar event with timezone-aware bounds.
///
/// `start < end` always holds, and an all-day event starts and ends on the
/// same calendar date in its timezone.
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    /// Remote identifier; absent until the provider assigns one.
    pub id: Option<String>,
    pub title: String,
    pub body: Option<String>,
    pub location: Option<String>,
    pub start: DateTime<Tz>,
    pub end: DateTime<Tz>,
    pub all_day: bool,
    /// Attendee e-mail addresses
    pub attendees: Vec<String>,
    pub recurrence: Option<Recurrence>,
    pub reminder: Option<Reminder>,
}

impl Event {
    /// Create a timed event, validating its bounds.
    pub fn new(
        title: impl Into<String>,
        start: DateTime<Tz>,
        end: DateTime<Tz>,
    ) -> OcalResult<Self> {
        let event = Self::unchecked(title.into(), start, end, false);
        event.validate()?;
        Ok(event)
    }

    /// Create an all-day event, validating its bounds.
    pub fn new_all_day(
        title: impl Into<String>,
        start: DateTime<Tz>,
        end: DateTime<Tz>,
    ) -> OcalResult<Self> {
        let event = Self::unchecked(title.into(), start, end, true);
        event.validate()?;
        Ok(event)
    }

    /// Callers must guarantee the invariants themselves.
    pub(crate) fn unchecked(
        title: String,
        start: DateTime<Tz>,
        end: DateTime<Tz>,
        all_day: bool,
    ) -> Self {
        Event {
            id: None,
            title,
            body: None,
            location: None,
            start,
            end,
            all_day,
            attendees: Vec::new(),
            recurrence: None,
            reminder: None,
        }
    }

    pub fn with_location(mut self, location: Option<String>) -> Self {
        self.location = location;
        self
    }

    pub fn with_body(mut self, body: Option<String>) -> Self {
        self.body = body;
        self
    }

    pub fn with_attendees(mut self, attendees: Vec<String>) -> Self {
        self.attendees = attendees;
        self
    }

    pub fn with_recurrence(mut self, recurrence: Option<Recurrence>) -> Self {
        self.recurrence = recurrence;
        self
    }

    pub fn with_reminder(mut self, reminder: Option<Reminder>) -> Self {
        self.reminder = reminder;
        self
    }

    pub fn with_id(mut self, id: Option<String>) -> Self {
        self.id = id;
        self
    }

    /// Check the ordering and all-day invariants.
    pub fn validate(&self) -> OcalResult<()> {
        if self.start >= self.end {
            return Err(OcalError::InvalidEvent(
                "Event start time must be before end time".into(),
            ));
        }

        let end_date = self.end.with_timezone(&self.start.timezone()).date_naive();
        if self.all_day && self.start.date_naive() != end_date {
            return Err(OcalError::InvalidEvent(
                "All-day events must start and end on the same day".into(),
            ));
        }

        Ok(())
    }

    /// The timezone the event was created in.
    pub fn timezone(&self) -> Tz {
        self.start.timezone()
    }

    /// Whether `query` occurs (case-insensitively) in the title, location or body.
    pub fn matches(&self, query: &str) -> bool {
        let needle = query.to_lowercase();
        [Some(&self.title), self.location.as_ref(), self.body.as_ref()]
            .into_iter()
            .flatten()
            .any(|field| field.to_lowercase().contains(&needle))
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.title.is_empty() {
            write!(f, "(No title)")
        } else {
            write!(f, "{}", self.title)
        }
    }
}

/// A partial update to an existing event.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventPatch {
    pub title: Option<String>,
    pub body: Option<String>,
    pub location: Option<String>,
    pub start: Option<DateTime<Tz>>,
    pub end: Option<DateTime<Tz>>,
    pub attendees: Option<Vec<String>>,
    pub reminder: Option<Reminder>,
}

impl EventPatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.body.is_none()
            && self.location.is_none()
            && self.start.is_none()
            && self.end.is_none()
            && self.attendees.is_none()
            && self.reminder.is_none()
    }

    pub fn validate(&self) -> OcalResult<()> {
        if let (Some(start), Some(end)) = (&self.start, &self.end)
            && start >= end
        {
            return Err(OcalError::InvalidEvent(
                "Event start time must be before end time".into(),
            ));
        }
        Ok(())
    }
}

/// Reminder settings for an event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reminder {
    pub minutes_before_start: i64,
    pub is_enabled: bool,
}

impl Reminder {
    pub fn minutes_before(minutes: i64) -> Self {
        Reminder {
            minutes_before_start: minutes,
            is_enabled: true,
        }
    }
}

impl Default for Reminder {
    fn default() -> Self {
        Reminder::minutes_before(DEFAULT_REMINDER_MINUTES)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Frequency {
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

impl FromStr for Frequency {
    type Err = OcalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "DAILY" => Ok(Frequency::Daily),
            "WEEKLY" => Ok(Frequency::Weekly),
            "MONTHLY" => Ok(Frequency::Monthly),
            "YEARLY" => Ok(Frequency::Yearly),
            other => Err(OcalError::InvalidEvent(format!(
                "Unsupported recurrence frequency: {other}"
            ))),
        }
    }
}

/// Recurrence pattern for an event.
///
/// Only the subset of RRULE needed to round-trip through the remote API is
/// understood: `FREQ`, `INTERVAL`, `BYDAY`, `COUNT` and `UNTIL`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recurrence {
    pub frequency: Frequency,
    pub interval: u32,
    pub days_of_week: Vec<Weekday>,
    pub end_date: Option<NaiveDate>,
    pub count: Option<u32>,
}

impl Recurrence {
    pub fn new(frequency: Frequency) -> Self {
        Recurrence {
            frequency,
            interval: 1,
            days_of_week: Vec::new(),
            end_date: None,
            count: None,
        }
    }
}

impl FromStr for Recurrence {
    type Err = OcalError;

    /// Parse `FREQ=WEEKLY;INTERVAL=2;BYDAY=MO,WE`. An `RRULE:` prefix is accepted.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let rule = s.trim();
        let rule = rule.strip_prefix("RRULE:").unwrap_or(rule);

        let mut frequency = None;
        let mut recurrence_parts = Recurrence::new(Frequency::Daily);

        for part in rule.split(';').filter(|p| !p.trim().is_empty()) {
            let (key, value) = part.split_once('=').ok_or_else(|| {
                OcalError::InvalidEvent(format!("Malformed recurrence rule part: {part}"))
            })?;
            let value = value.trim();

            match key.trim().to_ascii_uppercase().as_str() {
                "FREQ" => frequency = Some(value.parse::<Frequency>()?),
                "INTERVAL" => {
                    recurrence_parts.interval = value
                        .parse::<u32>()
                        .ok()
                        .filter(|n| *n >= 1)
                        .ok_or_else(|| OcalError::InvalidEvent(format!("Invalid INTERVAL: {value}")))?;
                }
                "COUNT" => {
                    recurrence_parts.count = Some(value.parse::<u32>().map_err(|_| {
                        OcalError::InvalidEvent(format!("Invalid COUNT: {value}"))
                    })?);
                }
                "UNTIL" => recurrence_parts.end_date = Some(parse_until(value)?),
                "BYDAY" => {
                    recurrence_parts.days_of_week = value
                        .split(',')
                        .map(|d| parse_byday(d.trim()))
                        .collect::<OcalResult<Vec<_>>>()?;
                }
                _ => tracing::debug!(part, "ignoring unsupported recurrence rule part"),
            }
        }

        let frequency =
            frequency.ok_or_else(|| OcalError::InvalidEvent("Recurrence rule has no FREQ".into()))?;

        Ok(Recurrence {
            frequency,
            ..recurrence_parts
        })
    }
}

/// `UNTIL` is either `YYYYMMDD` or `YYYYMMDDTHHMMSS[Z]`; only the date is kept.
fn parse_until(value: &str) -> OcalResult<NaiveDate> {
    let date_part = value.get(..8).unwrap_or(value);
    NaiveDate::parse_from_str(date_part, "%Y%m%d")
        .map_err(|_| OcalError::InvalidEvent(format!("Invalid UNTIL: {value}")))
}

/// Parse a BYDAY token such as `MO` or `WE`. Ordinal prefixes (`1MO`) are dropped.
fn parse_byday(token: &str) -> OcalResult<Weekday> {
    let code = token.trim_start_matches(|c: char| c == '+' || c == '-' || c.is_ascii_digit());
    match code.to_ascii_uppercase().as_str() {
        "MO" => Ok(Weekday::Mon),
        "TU" => Ok(Weekday::Tue),
        "WE" => Ok(Weekday::Wed),
        "TH" => Ok(Weekday::Thu),
        "FR" => Ok(Weekday::Fri),
        "SA" => Ok(Weekday::Sat),
        "SU" => Ok(Weekday::Sun),
        _ => Err(OcalError::InvalidEvent(format!("Invalid BYDAY value: {token}"))),
    }
}
