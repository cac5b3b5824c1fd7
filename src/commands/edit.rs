use anyhow::Result;
use chrono_tz::Tz;
use ocal_core::timeutils::parse_datetime;
use ocal_core::{CalendarProvider, EventPatch, Reminder};
use owo_colors::OwoColorize;

use crate::utils::tui::with_spinner;

pub struct EditArgs {
    pub subject: Option<String>,
    pub start: Option<String>,
    pub end: Option<String>,
    pub location: Option<String>,
    pub body: Option<String>,
    pub attendees: Vec<String>,
    pub reminder: Option<i64>,
}

pub async fn run(id: &str, args: EditArgs, tz: Option<&str>) -> Result<()> {
    let config = super::load_config(tz, None)?;
    let timezone = super::timezone(&config)?;
    let patch = build_patch(args, &timezone)?;

    if patch.is_empty() {
        println!("{}", "No changes specified".yellow());
        return Ok(());
    }

    let provider = super::connect(&config)?;
    let updated = with_spinner("Updating event...", provider.edit(id, &patch)).await?;

    println!("{}", format!("Event updated: {id}").green());
    println!("Subject: {updated}");
    Ok(())
}

fn build_patch(args: EditArgs, tz: &Tz) -> Result<EventPatch> {
    let patch = EventPatch {
        title: args.subject,
        body: args.body,
        location: args.location,
        start: args.start.map(|s| parse_datetime(&s, tz)).transpose()?,
        end: args.end.map(|s| parse_datetime(&s, tz)).transpose()?,
        attendees: (!args.attendees.is_empty()).then_some(args.attendees),
        reminder: args.reminder.map(Reminder::minutes_before),
    };
    patch.validate()?;
    Ok(patch)
}
