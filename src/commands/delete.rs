use anyhow::Result;
use dialoguer::Confirm;
use ocal_core::CalendarProvider;
use owo_colors::OwoColorize;

use crate::render::render_summary;
use crate::utils::tui::with_spinner;

pub async fn run(id: &str, yes: bool) -> Result<()> {
    let config = super::load_config(None, None)?;
    let provider = super::connect(&config)?;

    // Show what is about to go unless --yes
    if !yes {
        let event = with_spinner("Fetching event...", provider.get(id)).await?;
        println!("{}\n", render_summary(&event));

        let confirmed = Confirm::new()
            .with_prompt("Are you sure you want to delete this event?")
            .default(false)
            .interact()?;

        if !confirmed {
            println!("Cancelled");
            return Ok(());
        }
    }

    with_spinner("Deleting event...", provider.delete(id)).await?;
    println!("{}", format!("Event {id} deleted").green());
    Ok(())
}
