//! Natural-language quick-add parsing.
//!
//! Turns text such as `Tomorrow 4pm: Coffee with Ali @ Cafe Nero` into an
//! [`Event`]. Parsing never rejects its input: unrecognised text becomes the
//! title of an event today at 09:00. The only failure is an unknown timezone.

mod extract;
mod resolve;
mod segment;

use chrono::Duration;

pub use extract::extract_title_and_location;
pub use resolve::{parse_time_phrase, resolve_date, resolve_start};
pub use segment::{DayReference, ParsedSegments, segment};

use crate::clock::{Clock, SystemClock};
use crate::event::Event;
use crate::timezone::{SystemTimezone, TimezoneSource, UnknownTimezoneError, resolve_timezone};

/// Length of every quick-add event.
pub const QUICKADD_DURATION_MINUTES: i64 = 30;

/// Quick-add parser with injectable clock and default timezone.
#[derive(Debug, Clone, Default)]
pub struct QuickAdd<C = SystemClock, T = SystemTimezone> {
    clock: C,
    timezone: T,
}

impl QuickAdd {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<C: Clock, T: TimezoneSource> QuickAdd<C, T> {
    pub fn with_sources(clock: C, timezone: T) -> Self {
        QuickAdd { clock, timezone }
    }

    /// Parse `text` into an event. `timezone` overrides the default source.
    pub fn parse(&self, text: &str, timezone: Option<&str>) -> Result<Event, UnknownTimezoneError> {
        let tz_name = match timezone {
            Some(name) => name.to_string(),
            None => self.timezone.timezone_name(),
        };
        let text = text.trim();

        let segments = segment(text).unwrap_or_else(|| {
            tracing::debug!(text, "no day/time prefix, using the whole text as title");
            ParsedSegments {
                day: Some(DayReference::Today),
                time: None,
                rest: text.to_string(),
            }
        });

        let tz = resolve_timezone(&tz_name)?;
        let start = resolve_start(segments.day, segments.time.as_deref(), &tz, self.clock.now());
        let end = start + Duration::minutes(QUICKADD_DURATION_MINUTES);
        let (title, location) = extract_title_and_location(&segments.rest);

        tracing::debug!(%title, %start, ?location, "parsed quick-add text");

        Ok(Event::unchecked(title, start, end, false).with_location(location))
    }
}
