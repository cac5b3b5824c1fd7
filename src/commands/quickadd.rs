use anyhow::Result;
use ocal_core::{CalendarProvider, QuickAdd, SystemClock};
use owo_colors::OwoColorize;

use crate::render::render_summary;
use crate::utils::tui::with_spinner;

pub async fn run(text: &str, tz: Option<&str>) -> Result<()> {
    let config = super::load_config(tz, None)?;

    // The configured timezone is the default when --tz is absent
    let parser = QuickAdd::with_sources(SystemClock, config.clone());
    let event = parser.parse(text, tz)?;
    tracing::debug!(title = %event, start = %event.start, "parsed quick add");

    let provider = super::connect(&config)?;
    let id = with_spinner("Creating event...", provider.add(&event)).await?;

    println!("{}", format!("Event created: {id}").green());
    println!("{}", render_summary(&event));
    Ok(())
}
