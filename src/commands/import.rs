use std::path::Path;

use anyhow::{Context, Result};
use ocal_core::CalendarProvider;
use owo_colors::OwoColorize;

use crate::utils::tui::with_spinner;

pub async fn run(file: &Path, calendar: Option<&str>) -> Result<()> {
    if !file.exists() {
        anyhow::bail!("File {} not found", file.display());
    }
    let content = std::fs::read_to_string(file)
        .with_context(|| format!("Failed to read {}", file.display()))?;

    let config = super::load_config(None, calendar)?;
    let provider = super::connect(&config)?;

    let imported = with_spinner("Importing events...", provider.import_ics(&content)).await?;

    let label = if imported == 1 { "event" } else { "events" };
    println!("{}", format!("Imported {imported} {label}").green());
    Ok(())
}
