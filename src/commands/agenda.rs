use anyhow::Result;
use ocal_core::date_range::DEFAULT_SEARCH_DAYS;
use ocal_core::{CalendarProvider, DateRange, Event, SystemClock};

use crate::render::{render_json, render_table};
use crate::utils::tui::with_spinner;

pub struct AgendaArgs {
    pub start: Option<String>,
    pub end: Option<String>,
    pub query: Option<String>,
    pub json: bool,
}

pub async fn run(args: AgendaArgs, tz: Option<&str>) -> Result<()> {
    let config = super::load_config(tz, None)?;
    let timezone = super::timezone(&config)?;
    let range = DateRange::parse(
        args.start.as_deref(),
        args.end.as_deref(),
        &timezone,
        &SystemClock,
    )?;

    let provider = super::connect(&config)?;
    let events = with_spinner(
        "Fetching events...",
        provider.agenda(&range, args.query.as_deref()),
    )
    .await?;

    print_events("Calendar Agenda", &events, args.json)
}

/// The events of one day.
pub async fn list(date: Option<&str>, tz: Option<&str>, json: bool) -> Result<()> {
    let config = super::load_config(tz, None)?;
    let timezone = super::timezone(&config)?;
    let range = DateRange::day(date, &timezone, &SystemClock)?;

    let provider = super::connect(&config)?;
    let events = with_spinner("Fetching events...", provider.agenda(&range, None)).await?;

    print_events("Calendar Agenda", &events, json)
}

pub async fn search(
    query: &str,
    start: Option<String>,
    end: Option<String>,
    tz: Option<&str>,
    json: bool,
) -> Result<()> {
    let config = super::load_config(tz, None)?;
    let timezone = super::timezone(&config)?;

    let range = match (&start, &end) {
        (None, None) => None,
        (Some(_), None) => {
            let range = DateRange::parse(start.as_deref(), None, &timezone, &SystemClock)?;
            Some(DateRange::new(
                range.start,
                range.start + chrono::Duration::days(DEFAULT_SEARCH_DAYS),
            )?)
        }
        _ => Some(DateRange::parse(
            start.as_deref(),
            end.as_deref(),
            &timezone,
            &SystemClock,
        )?),
    };

    let provider = super::connect(&config)?;
    let events = with_spinner("Searching...", provider.search(query, range.as_ref())).await?;

    print_events(&format!("Search Results for '{query}'"), &events, json)
}

fn print_events(title: &str, events: &[Event], json: bool) -> Result<()> {
    if json {
        println!("{}", render_json(events)?);
    } else {
        println!("{}", render_table(title, events));
    }
    Ok(())
}
