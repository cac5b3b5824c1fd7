//! Splitting quick-add text into its "when" and "what" parts.

use std::sync::OnceLock;

use chrono::Weekday;
use regex::{Captures, Regex};

const DAY: &str = r"(tomorrow|today|monday|tuesday|wednesday|thursday|friday|saturday|sunday)";
const TIME: &str = r"(\d{1,2}(?::\d{2})?(?:\s*[ap]m)?)";

/// A symbolic day, resolved against the current date later on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayReference {
    Today,
    Tomorrow,
    Weekday(Weekday),
}

impl DayReference {
    /// Case-insensitive lookup of a day word.
    pub fn from_word(word: &str) -> Option<Self> {
        let day = match word.trim().to_lowercase().as_str() {
            "today" => DayReference::Today,
            "tomorrow" => DayReference::Tomorrow,
            "monday" => DayReference::Weekday(Weekday::Mon),
            "tuesday" => DayReference::Weekday(Weekday::Tue),
            "wednesday" => DayReference::Weekday(Weekday::Wed),
            "thursday" => DayReference::Weekday(Weekday::Thu),
            "friday" => DayReference::Weekday(Weekday::Fri),
            "saturday" => DayReference::Weekday(Weekday::Sat),
            "sunday" => DayReference::Weekday(Weekday::Sun),
            _ => return None,
        };
        Some(day)
    }
}

/// Day reference, time phrase and remaining text of one quick-add input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedSegments {
    pub day: Option<DayReference>,
    pub time: Option<String>,
    pub rest: String,
}

type Matcher = fn(&str) -> Option<ParsedSegments>;

/// Matchers in priority order; the first hit wins.
const MATCHERS: [Matcher; 4] = [day_then_time, time_then_day, day_only, time_only];

/// Split `text` into segments, or `None` when no "when: what" shape is present.
pub fn segment(text: &str) -> Option<ParsedSegments> {
    MATCHERS.iter().find_map(|matcher| matcher(text))
}

/// "Tomorrow 4pm: Coffee"
fn day_then_time(text: &str) -> Option<ParsedSegments> {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    let re = REGEX.get_or_init(|| {
        Regex::new(&format!(r"(?i){DAY}\s+{TIME}\s*:\s*(.+)")).unwrap()
    });
    re.captures(text).map(|caps| day_and_time(&caps))
}

/// "4pm tomorrow: Coffee"
fn time_then_day(text: &str) -> Option<ParsedSegments> {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    let re = REGEX.get_or_init(|| {
        Regex::new(&format!(r"(?i){TIME}\s+{DAY}\s*:\s*(.+)")).unwrap()
    });
    re.captures(text).map(|caps| day_and_time(&caps))
}

/// "Tomorrow: Coffee"
fn day_only(text: &str) -> Option<ParsedSegments> {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    let re = REGEX.get_or_init(|| Regex::new(&format!(r"(?i){DAY}\s*:\s*(.+)")).unwrap());
    let caps = re.captures(text)?;
    Some(ParsedSegments {
        day: DayReference::from_word(&caps[1]),
        time: None,
        rest: caps[2].to_string(),
    })
}

/// "4pm: Coffee"
fn time_only(text: &str) -> Option<ParsedSegments> {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    let re = REGEX.get_or_init(|| Regex::new(&format!(r"(?i){TIME}\s*:\s*(.+)")).unwrap());
    let caps = re.captures(text)?;
    Some(ParsedSegments {
        day: Some(DayReference::Today),
        time: Some(caps[1].to_string()),
        rest: caps[2].to_string(),
    })
}

/// Shared by both two-token shapes: whichever capture is a day word is the day.
fn day_and_time(caps: &Captures<'_>) -> ParsedSegments {
    let (first, second) = (&caps[1], &caps[2]);
    let (day, time) = match DayReference::from_word(first) {
        Some(day) => (day, second),
        None => (DayReference::from_word(second).unwrap_or(DayReference::Today), first),
    };
    ParsedSegments {
        day: Some(day),
        time: Some(time.to_string()),
        rest: caps[3].to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn day_then_time_shape() {
        let seg = segment("Tomorrow 4pm: Coffee with Ali").unwrap();
        assert_eq!(seg.day, Some(DayReference::Tomorrow));
        assert_eq!(seg.time.as_deref(), Some("4pm"));
        assert_eq!(seg.rest, "Coffee with Ali");
    }

    #[test]
    fn time_then_day_shape() {
        let seg = segment("10:30 am friday: Review").unwrap();
        assert_eq!(seg.day, Some(DayReference::Weekday(Weekday::Fri)));
        assert_eq!(seg.time.as_deref(), Some("10:30 am"));
        assert_eq!(seg.rest, "Review");
    }

    #[test]
    fn day_only_shape_has_no_time() {
        let seg = segment("MONDAY : Planning").unwrap();
        assert_eq!(seg.day, Some(DayReference::Weekday(Weekday::Mon)));
        assert_eq!(seg.time, None);
        assert_eq!(seg.rest, "Planning");
    }

    #[test]
    fn time_only_shape_defaults_to_today() {
        let seg = segment("14:00: Dentist").unwrap();
        assert_eq!(seg.day, Some(DayReference::Today));
        assert_eq!(seg.time.as_deref(), Some("14:00"));
        assert_eq!(seg.rest, "Dentist");
    }

    #[test]
    fn rest_keeps_later_colons() {
        let seg = segment("today 9am: Sync: budget").unwrap();
        assert_eq!(seg.rest, "Sync: budget");
    }

    #[test]
    fn no_colon_is_no_match() {
        assert_eq!(segment("Some random text"), None);
        assert_eq!(segment("Tomorrow 4pm Coffee"), None);
        assert_eq!(segment(""), None);
    }

    #[test]
    fn day_words_are_case_insensitive() {
        assert_eq!(DayReference::from_word("ToDaY"), Some(DayReference::Today));
        assert_eq!(
            DayReference::from_word("sunday"),
            Some(DayReference::Weekday(Weekday::Sun))
        );
        assert_eq!(DayReference::from_word("someday"), None);
    }
}
