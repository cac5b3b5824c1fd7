//! Terminal and JSON rendering of events.

use chrono::{DateTime, SecondsFormat};
use chrono_tz::Tz;
use ocal_core::Event;
use owo_colors::OwoColorize;
use serde::Serialize;

const TIME_FORMAT: &str = "%Y-%m-%d %H:%M";
const DATE_FORMAT: &str = "%Y-%m-%d";

/// Column gap in the event table.
const GAP: &str = "  ";

/// An event as printed by `--json`.
#[derive(Debug, Serialize)]
pub struct EventJson<'a> {
    pub id: Option<&'a str>,
    pub title: &'a str,
    pub start: String,
    pub end: String,
    pub location: Option<&'a str>,
    pub all_day: bool,
    pub attendees: &'a [String],
}

impl<'a> From<&'a Event> for EventJson<'a> {
    fn from(event: &'a Event) -> Self {
        EventJson {
            id: event.id.as_deref(),
            title: &event.title,
            start: rfc3339(&event.start),
            end: rfc3339(&event.end),
            location: event.location.as_deref(),
            all_day: event.all_day,
            attendees: &event.attendees,
        }
    }
}

fn rfc3339(dt: &DateTime<Tz>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Secs, false)
}

pub fn render_json(events: &[Event]) -> serde_json::Result<String> {
    let rows: Vec<EventJson> = events.iter().map(EventJson::from).collect();
    serde_json::to_string_pretty(&rows)
}

/// Start and end cells; all-day events show their date only.
fn time_cells(event: &Event) -> (String, String) {
    if event.all_day {
        let date = event.start.format(DATE_FORMAT).to_string();
        (date, "all day".to_string())
    } else {
        (
            event.start.format(TIME_FORMAT).to_string(),
            event.end.format(TIME_FORMAT).to_string(),
        )
    }
}

fn pad(text: &str, width: usize) -> String {
    let len = text.chars().count();
    format!("{text}{}", " ".repeat(width.saturating_sub(len)))
}

/// Coloured table with Start, End, Subject and Location columns.
pub fn render_table(title: &str, events: &[Event]) -> String {
    if events.is_empty() {
        return "No events found".dimmed().to_string();
    }

    let rows: Vec<[String; 4]> = events
        .iter()
        .map(|event| {
            let (start, end) = time_cells(event);
            [
                start,
                end,
                event.to_string(),
                event.location.clone().unwrap_or_default(),
            ]
        })
        .collect();

    let headers = ["Start", "End", "Subject", "Location"];
    let mut widths = headers.map(|h| h.len());
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut lines = vec![title.bold().to_string()];

    let header_line: Vec<String> = headers
        .iter()
        .zip(widths)
        .map(|(h, w)| pad(h, w).bold().to_string())
        .collect();
    lines.push(header_line.join(GAP).trim_end().to_string());

    for [start, end, subject, location] in &rows {
        let line = [
            pad(start, widths[0]).cyan().to_string(),
            pad(end, widths[1]).cyan().to_string(),
            pad(subject, widths[2]).green().to_string(),
            location.yellow().to_string(),
        ];
        lines.push(line.join(GAP));
    }

    lines.join("\n")
}

/// Short multi-line summary printed after creating or before deleting.
pub fn render_summary(event: &Event) -> String {
    let mut lines = vec![format!("Subject: {event}")];
    let (start, end) = time_cells(event);
    lines.push(format!("Start: {start}"));
    lines.push(format!("End: {end}"));
    if let Some(location) = &event.location {
        lines.push(format!("Location: {location}"));
    }
    lines.join("\n")
}
