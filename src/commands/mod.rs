pub mod add;
pub mod agenda;
pub mod configure;
pub mod delete;
pub mod edit;
pub mod import;
pub mod login;
pub mod quickadd;

use anyhow::{Context, Result};
use chrono_tz::Tz;
use ocal_core::OcalConfig;
use ocal_core::timezone::resolve_timezone;
use ocal_provider_outlook::{OutlookProvider, TokenStore};

/// Configuration with per-command overrides applied.
pub fn load_config(tz: Option<&str>, calendar: Option<&str>) -> Result<OcalConfig> {
    let mut config = OcalConfig::load().context("Failed to load configuration")?;

    if let Some(tz) = tz {
        resolve_timezone(tz)?;
        config.timezone = Some(tz.to_string());
    }
    if let Some(calendar) = calendar {
        config.calendar_id = Some(calendar.to_string());
    }

    Ok(config)
}

/// Outlook provider for the configured calendar, authenticated with the
/// stored or environment access token.
pub fn connect(config: &OcalConfig) -> Result<OutlookProvider> {
    let token = TokenStore::default_location()?.access_token()?;
    Ok(OutlookProvider::from_config(config, token)?)
}

/// Timezone the command works in.
pub fn timezone(config: &OcalConfig) -> Result<Tz> {
    Ok(resolve_timezone(&config.timezone_name())?)
}
