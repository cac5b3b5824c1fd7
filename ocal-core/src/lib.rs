//! Core types for ocal.
//!
//! This crate provides everything that does not talk to a remote service:
//! - `Event` and related types
//! - the natural-language `quickadd` parser
//! - clock/timezone capabilities, date/time helpers and date ranges
//! - configuration, ICS import and the `CalendarProvider` trait

pub mod clock;
pub mod config;
pub mod date_range;
pub mod error;
pub mod event;
pub mod ics;
pub mod provider;
pub mod quickadd;
pub mod timeutils;
pub mod timezone;

// Re-export the common types at crate root for convenience
pub use clock::{Clock, FixedClock, SystemClock};
pub use config::OcalConfig;
pub use date_range::DateRange;
pub use error::{OcalError, OcalResult};
pub use event::*;
pub use provider::CalendarProvider;
pub use quickadd::QuickAdd;
pub use timezone::{
    FixedTimezone, SystemTimezone, TimezoneSource, UnknownTimezoneError, resolve_timezone,
};
