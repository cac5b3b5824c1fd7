//! Thin HTTP client for the Graph REST API.

use std::time::Duration;

use ocal_core::error::{OcalError, OcalResult};
use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use url::Url;

use crate::graph_event::types::ErrorResponse;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// Ask Graph to report all times in UTC.
const PREFER_UTC: &str = "outlook.timezone=\"UTC\"";

#[derive(Debug, Clone)]
pub struct GraphClient {
    http: reqwest::Client,
    base_url: Url,
    token: String,
}

impl GraphClient {
    pub fn new(base_url: &str, token: impl Into<String>) -> OcalResult<Self> {
        let base_url = Url::parse(base_url)
            .map_err(|e| OcalError::Config(format!("Invalid Graph URL '{base_url}': {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(OcalError::Config(format!("Invalid Graph URL '{base_url}'")));
        }

        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| OcalError::Api(format!("Failed to create HTTP client: {e}")))?;

        Ok(GraphClient {
            http,
            base_url,
            token: token.into(),
        })
    }

    /// `base_url` with `segments` appended, each percent-encoded.
    pub fn url<S: AsRef<str>>(&self, segments: &[S]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty();
            path.extend(segments);
        }
        url
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        tracing::debug!(%method, %url, "graph request");
        self.http
            .request(method, url)
            .bearer_auth(&self.token)
            .header("Prefer", PREFER_UTC)
    }

    pub async fn get<T: DeserializeOwned>(&self, url: Url) -> OcalResult<T> {
        let resp = self.send(self.request(Method::GET, url)).await?;
        decode(resp).await
    }

    pub async fn post<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        url: Url,
        body: &B,
    ) -> OcalResult<T> {
        let resp = self.send(self.request(Method::POST, url).json(body)).await?;
        decode(resp).await
    }

    pub async fn patch<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        url: Url,
        body: &B,
    ) -> OcalResult<T> {
        let resp = self.send(self.request(Method::PATCH, url).json(body)).await?;
        decode(resp).await
    }

    pub async fn delete(&self, url: Url) -> OcalResult<()> {
        self.send(self.request(Method::DELETE, url)).await?;
        Ok(())
    }

    /// Send a request and map error statuses to [`OcalError`].
    async fn send(&self, req: RequestBuilder) -> OcalResult<Response> {
        let resp = req
            .send()
            .await
            .map_err(|e| OcalError::Api(format!("Network error: {e}")))?;

        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }

        let detail = error_detail(resp).await;
        tracing::debug!(%status, %detail, "graph request failed");

        Err(match status {
            StatusCode::UNAUTHORIZED => OcalError::Authentication(format!(
                "{detail}. Run `ocal login` with a fresh access token."
            )),
            StatusCode::NOT_FOUND => OcalError::EventNotFound(detail),
            status => OcalError::Api(format!("{} - {detail}", status.as_u16())),
        })
    }
}

async fn decode<T: DeserializeOwned>(resp: Response) -> OcalResult<T> {
    let bytes = resp
        .bytes()
        .await
        .map_err(|e| OcalError::Api(format!("Network error: {e}")))?;
    serde_json::from_slice(&bytes).map_err(|e| OcalError::WireFormat(e.to_string()))
}

/// The `error.message` of a Graph error body, if there is one.
async fn error_detail(resp: Response) -> String {
    let body = resp.text().await.unwrap_or_default();
    serde_json::from_str::<ErrorResponse>(&body)
        .ok()
        .and_then(|e| e.error.message.or(e.error.code))
        .unwrap_or_else(|| "Unknown error".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_appends_encoded_segments() {
        let client = GraphClient::new("https://graph.microsoft.com/v1.0", "t").unwrap();
        let url = client.url(&["me", "calendar", "events", "AAMk/AD=="]);
        assert_eq!(
            url.as_str(),
            "https://graph.microsoft.com/v1.0/me/calendar/events/AAMk%2FAD=="
        );

        let trailing = GraphClient::new("http://localhost:8080/v1.0/", "t").unwrap();
        assert_eq!(
            trailing.url(&["me", "calendar"]).as_str(),
            "http://localhost:8080/v1.0/me/calendar"
        );
    }

    #[test]
    fn rejects_invalid_base_url() {
        assert!(matches!(
            GraphClient::new("not a url", "t"),
            Err(OcalError::Config(_))
        ));
        assert!(GraphClient::new("mailto:someone@example.com", "t").is_err());
    }
}
