use anyhow::Result;
use dialoguer::Input;
use ocal_core::OcalConfig;
use ocal_core::timezone::resolve_timezone;
use ocal_provider_outlook::PRIMARY_CALENDAR;
use owo_colors::OwoColorize;

/// Prompt for the default timezone and calendar, then save the config file.
pub fn run() -> Result<()> {
    let mut config = OcalConfig::load()?;

    let timezone: String = Input::new()
        .with_prompt("  Timezone")
        .default(config.timezone_name())
        .validate_with(|input: &String| resolve_timezone(input).map(|_| ()))
        .interact_text()?;

    let calendar_id: String = Input::new()
        .with_prompt("  Calendar id")
        .default(
            config
                .calendar_id
                .clone()
                .unwrap_or_else(|| PRIMARY_CALENDAR.to_string()),
        )
        .interact_text()?;

    config.timezone = Some(timezone);
    config.calendar_id = Some(calendar_id).filter(|id| !id.is_empty() && id != PRIMARY_CALENDAR);

    let path = config.save()?;
    println!("{}", format!("Saved {}", path.display()).green());
    Ok(())
}
