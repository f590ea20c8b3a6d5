use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

use crate::{error::TransportError, model::Query};

use super::{ApiResponse, WeatherApiClient};

/// Default request timeout, matching the weather endpoint's own upstream timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// `reqwest`-backed client for the `/api/weather` endpoint.
#[derive(Debug, Clone)]
pub struct HttpWeatherClient {
    base_url: String,
    http: Client,
}

impl HttpWeatherClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http,
        })
    }

    pub fn endpoint(&self) -> String {
        format!("{}/api/weather", self.base_url)
    }
}

#[async_trait]
impl WeatherApiClient for HttpWeatherClient {
    async fn fetch(&self, query: &Query) -> Result<ApiResponse, TransportError> {
        let url = self.endpoint();
        tracing::debug!(%url, city = query.city(), mode = %query.mode(), "requesting weather");

        let res = self
            .http
            .get(&url)
            .query(&[("city", query.city()), ("type", query.mode().as_str())])
            .send()
            .await?;

        let status = res.status().as_u16();
        let response = received(status, res.text().await);

        tracing::debug!(status, body = %truncate_body(&response.body), "weather response received");

        Ok(response)
    }
}

/// A status line arrived, so this is a response even if the body did not.
/// An unreadable body is left empty and the status decides the outcome.
fn received<E: std::fmt::Display>(status: u16, body: Result<String, E>) -> ApiResponse {
    match body {
        Ok(body) => ApiResponse { status, body },
        Err(err) => {
            tracing::warn!(status, error = %err, "failed to read weather response body");
            ApiResponse { status, body: String::new() }
        }
    }
}

fn truncate_body(body: &str) -> &str {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => &body[..idx],
        None => body,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_strips_trailing_slash() {
        let client = HttpWeatherClient::new("http://localhost:8000/", DEFAULT_TIMEOUT).unwrap();
        assert_eq!(client.endpoint(), "http://localhost:8000/api/weather");
    }

    #[test]
    fn unreadable_body_keeps_status() {
        let response = received(404, Err::<String, _>("connection reset mid-body"));
        assert_eq!(response, ApiResponse::new(404, ""));

        let query = crate::validate::validate("Oslo", crate::model::Mode::Current).unwrap();
        let err = crate::api::interpret(&query, &response).unwrap_err();
        assert_eq!(err, crate::error::SearchError::NotFound { city: "Oslo".into() });
    }

    #[test]
    fn readable_body_is_kept() {
        let response = received(200, Ok::<_, std::io::Error>("{}".to_string()));
        assert_eq!(response, ApiResponse::new(200, "{}"));
    }

    #[test]
    fn truncate_body_respects_char_boundaries() {
        let long = "é".repeat(300);
        assert_eq!(truncate_body(&long).chars().count(), 200);
        assert_eq!(truncate_body("short"), "short");
    }
}
