//! Access token storage.
//!
//! Tokens are obtained outside ocal and handed over either through the
//! `OCAL_ACCESS_TOKEN` environment variable or `ocal login`, which stores
//! them in ~/.config/ocal/tokens.json.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use ocal_core::config::config_dir;
use ocal_core::error::{OcalError, OcalResult};
use serde::{Deserialize, Serialize};

/// Environment variable holding a bearer token; wins over the token cache.
pub const ACCESS_TOKEN_ENV: &str = "OCAL_ACCESS_TOKEN";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredToken {
    pub access_token: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
}

impl StoredToken {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|expires_at| expires_at <= now)
    }
}

#[derive(Debug, Clone)]
pub struct TokenStore {
    path: PathBuf,
}

impl TokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        TokenStore { path: path.into() }
    }

    /// ~/.config/ocal/tokens.json
    pub fn default_location() -> OcalResult<Self> {
        Ok(Self::new(config_dir()?.join("tokens.json")))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self) -> OcalResult<Option<StoredToken>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let contents = std::fs::read_to_string(&self.path)?;
        let token = serde_json::from_str(&contents).map_err(|e| {
            OcalError::Authentication(format!(
                "Failed to parse tokens from {}: {e}",
                self.path.display()
            ))
        })?;

        Ok(Some(token))
    }

    pub fn save(&self, token: &StoredToken) -> OcalResult<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = serde_json::to_string_pretty(token)
            .map_err(|e| OcalError::Authentication(format!("Failed to serialize tokens: {e}")))?;
        std::fs::write(&self.path, contents)?;

        tracing::debug!(path = %self.path.display(), "saved access token");
        Ok(())
    }

    /// Remove the token cache. Returns whether there was one.
    pub fn clear(&self) -> OcalResult<bool> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    /// Token from `OCAL_ACCESS_TOKEN`, else from the cache.
    pub fn access_token(&self) -> OcalResult<String> {
        self.resolve_access_token(std::env::var(ACCESS_TOKEN_ENV).ok(), Utc::now())
    }

    pub fn resolve_access_token(
        &self,
        env_token: Option<String>,
        now: DateTime<Utc>,
    ) -> OcalResult<String> {
        if let Some(token) = env_token
            && !token.trim().is_empty()
        {
            tracing::debug!("using access token from {ACCESS_TOKEN_ENV}");
            return Ok(token.trim().to_string());
        }

        match self.load()? {
            Some(token) if token.is_expired(now) => Err(OcalError::Authentication(
                "Access token expired. Run `ocal login` with a new token.".into(),
            )),
            Some(token) => Ok(token.access_token),
            None => Err(OcalError::Authentication(format!(
                "No access token. Run `ocal login` or set {ACCESS_TOKEN_ENV}."
            ))),
        }
    }
}
