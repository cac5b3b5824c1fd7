//! Title and location extraction.

use std::sync::OnceLock;

use regex::Regex;

/// Split `text` into a title and an optional location.
///
/// `" @ "` is looked for across the whole text first, then `" at "`. The
/// title may come back empty.
pub fn extract_title_and_location(text: &str) -> (String, Option<String>) {
    static AT_SIGN: OnceLock<Regex> = OnceLock::new();
    static AT_WORD: OnceLock<Regex> = OnceLock::new();

    let delimiters = [
        AT_SIGN.get_or_init(|| Regex::new(r"(?i)(.+?)\s+@\s+(.+)").unwrap()),
        AT_WORD.get_or_init(|| Regex::new(r"(?i)(.+?)\s+at\s+(.+)").unwrap()),
    ];

    for re in delimiters {
        if let Some(caps) = re.captures(text) {
            return (caps[1].trim().to_string(), Some(caps[2].trim().to_string()));
        }
    }

    (text.trim().to_string(), None)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_on_at_sign() {
        let (title, location) = extract_title_and_location("Coffee with Ali @ Cafe Nero");
        assert_eq!(title, "Coffee with Ali");
        assert_eq!(location.as_deref(), Some("Cafe Nero"));
    }

    #[test]
    fn splits_on_at_word() {
        let (title, location) = extract_title_and_location("Lunch AT The Diner ");
        assert_eq!(title, "Lunch");
        assert_eq!(location.as_deref(), Some("The Diner"));
    }

    #[test]
    fn at_sign_wins_over_earlier_at_word() {
        let (title, location) = extract_title_and_location("Lunch at Joe's @ Diner");
        assert_eq!(title, "Lunch at Joe's");
        assert_eq!(location.as_deref(), Some("Diner"));
    }

    #[test]
    fn at_inside_words_is_not_a_delimiter() {
        let (title, location) = extract_title_and_location("  Catch up with Pat  ");
        assert_eq!(title, "Catch up with Pat");
        assert_eq!(location, None);

        let (title, location) = extract_title_and_location("me@example.com review");
        assert_eq!(title, "me@example.com review");
        assert_eq!(location, None);
    }

    #[test]
    fn empty_text_gives_empty_title() {
        assert_eq!(extract_title_and_location("   "), (String::new(), None));
    }
}
