//! ICS (iCalendar) import.

mod parse;

pub use parse::parse_ics_events;
