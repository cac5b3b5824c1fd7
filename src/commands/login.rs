use anyhow::{Context, Result};
use chrono::{Duration, Utc};
use ocal_provider_outlook::{StoredToken, TokenStore};
use owo_colors::OwoColorize;

/// Store an access token obtained elsewhere (e.g. Graph Explorer or the
/// Azure CLI) in the token cache.
pub fn run(token: Option<String>, expires_in: Option<i64>) -> Result<()> {
    let token = match token {
        Some(token) => token,
        None => rpassword::prompt_password("Access token: ")
            .context("Failed to read access token")?,
    };
    let token = token.trim();
    if token.is_empty() {
        anyhow::bail!("Access token cannot be empty");
    }

    let store = TokenStore::default_location()?;
    store.save(&StoredToken {
        access_token: token.to_string(),
        expires_at: expires_in.map(|minutes| Utc::now() + Duration::minutes(minutes)),
    })?;

    println!(
        "{}",
        format!("Token saved to {}", store.path().display()).green()
    );
    Ok(())
}

pub fn logout() -> Result<()> {
    let store = TokenStore::default_location()?;

    if store.clear()? {
        println!("{}", "Logged out".green());
    } else {
        println!("{}", "No stored token".dimmed());
    }
    Ok(())
}
