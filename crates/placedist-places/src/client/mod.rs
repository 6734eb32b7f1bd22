//! HTTP client for the places text-search API.
//!
//! Wraps `reqwest` with API-key handling, a shared cap on in-flight requests,
//! transient-error retry, and typed decoding of the JSON envelope. Status
//! codes inside the envelope are surfaced as [`PlacesError`] variants.

mod fetch_all;

use std::sync::Arc;
use std::time::Duration;

use placedist_core::{AppConfig, Coordinate};
use reqwest::{Client, StatusCode, Url};
use tokio::sync::Semaphore;

use crate::error::PlacesError;
use crate::retry::retry_with_backoff;
use crate::types::{decode_place, SearchPage, TextSearchResponse};

const TEXT_SEARCH_PATH: &str = "textsearch/json";

/// Tuning knobs for [`PlacesClient`].
#[derive(Debug, Clone)]
pub struct SearchSettings {
    pub timeout_secs: u64,
    pub user_agent: String,
    /// Upper bound on pages fetched per (coordinate, category) search.
    pub max_pages: usize,
    /// Pause before each continuation request and before the one retry of a
    /// token that is not ready yet.
    pub page_token_delay_ms: u64,
    pub max_retries: u32,
    pub backoff_base_ms: u64,
    /// Requests allowed in flight at once across every search on this client.
    pub max_in_flight: usize,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            timeout_secs: 30,
            user_agent: "placedist/0.1 (nearest-place-distances)".to_owned(),
            max_pages: 3,
            page_token_delay_ms: 2_000,
            max_retries: 2,
            backoff_base_ms: 500,
            max_in_flight: 12,
        }
    }
}

impl SearchSettings {
    #[must_use]
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            timeout_secs: config.request_timeout_secs,
            user_agent: config.user_agent.clone(),
            max_pages: config.max_pages,
            page_token_delay_ms: config.page_token_delay_ms,
            max_retries: config.max_retries,
            backoff_base_ms: config.retry_backoff_base_ms,
            max_in_flight: config.max_in_flight_requests,
        }
    }
}

/// Client for the places text-search endpoint.
///
/// Build it with [`PlacesClient::from_app_config`], or with
/// [`PlacesClient::with_base_url`] to point at a mock server in tests.
pub struct PlacesClient {
    client: Client,
    api_key: String,
    search_url: Url,
    settings: SearchSettings,
    in_flight: Arc<Semaphore>,
}

impl PlacesClient {
    /// Creates a client from loaded application configuration.
    ///
    /// # Errors
    ///
    /// Same as [`PlacesClient::with_base_url`].
    pub fn from_app_config(config: &AppConfig) -> Result<Self, PlacesError> {
        Self::with_base_url(
            &config.places_api_key,
            SearchSettings::from_app_config(config),
            &config.places_base_url,
        )
    }

    /// Creates a client with a custom API root (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`PlacesError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`PlacesError::InvalidBaseUrl`] if
    /// `base_url` is not a valid URL.
    pub fn with_base_url(
        api_key: &str,
        settings: SearchSettings,
        base_url: &str,
    ) -> Result<Self, PlacesError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(settings.user_agent.as_str())
            .build()?;

        // Exactly one trailing slash, so joining keeps the last path segment.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let search_url = Url::parse(&normalised)
            .and_then(|root| root.join(TEXT_SEARCH_PATH))
            .map_err(|e| PlacesError::InvalidBaseUrl {
                base_url: base_url.to_owned(),
                reason: e.to_string(),
            })?;

        let in_flight = Arc::new(Semaphore::new(settings.max_in_flight.max(1)));

        Ok(Self {
            client,
            api_key: api_key.to_owned(),
            search_url,
            settings,
            in_flight,
        })
    }

    /// Fetches a single page of text-search results near `at`.
    ///
    /// Transient failures are retried per [`SearchSettings::max_retries`].
    ///
    /// # Errors
    ///
    /// - [`PlacesError::TokenNotReady`] if `page_token` was rejected as not yet valid.
    /// - [`PlacesError::RateLimited`] on HTTP 429 or `OVER_QUERY_LIMIT` after retries.
    /// - [`PlacesError::Api`] for any other error status in the envelope.
    /// - [`PlacesError::UnexpectedStatus`] / [`PlacesError::Http`] on HTTP failure.
    /// - [`PlacesError::Deserialize`] if the body is not the expected JSON.
    pub async fn fetch_page(
        &self,
        query: &str,
        at: Coordinate,
        page_token: Option<&str>,
    ) -> Result<SearchPage, PlacesError> {
        let url = self.build_url(query, at, page_token);
        retry_with_backoff(
            self.settings.max_retries,
            self.settings.backoff_base_ms,
            || self.request_page(&url, query, page_token.is_some()),
        )
        .await
    }

    async fn request_page(
        &self,
        url: &Url,
        query: &str,
        is_continuation: bool,
    ) -> Result<SearchPage, PlacesError> {
        // Held for the request only, so back-off sleeps do not occupy a slot.
        // The semaphore is owned by this client and never closed.
        let _permit = self.in_flight.acquire().await.ok();
        let response = self.client.get(url.clone()).send().await?;
        let status = response.status();

        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(PlacesError::RateLimited(format!("HTTP {status}")));
        }
        if !status.is_success() {
            return Err(PlacesError::UnexpectedStatus {
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;
        let parsed = serde_json::from_str::<TextSearchResponse>(&body).map_err(|e| {
            PlacesError::Deserialize {
                context: format!("text search for '{query}'"),
                source: e,
            }
        })?;

        Self::check_status(&parsed, is_continuation)?;

        let next_page_token = parsed
            .next_page_token
            .filter(|token| !token.trim().is_empty());
        Ok(SearchPage {
            results: parsed.results.into_iter().map(decode_place).collect(),
            next_page_token,
        })
    }

    /// Maps the envelope's `status` field onto an error, if it is not a success.
    ///
    /// A missing status is treated as success so bare `{"results": [...]}`
    /// bodies are accepted.
    fn check_status(body: &TextSearchResponse, is_continuation: bool) -> Result<(), PlacesError> {
        let status = body.status.as_deref().unwrap_or("OK");
        let message = || {
            body.error_message
                .clone()
                .unwrap_or_else(|| "no error message".to_owned())
        };
        match status {
            "OK" | "ZERO_RESULTS" => Ok(()),
            "INVALID_REQUEST" if is_continuation => Err(PlacesError::TokenNotReady),
            "OVER_QUERY_LIMIT" => Err(PlacesError::RateLimited(message())),
            other => Err(PlacesError::Api {
                status: other.to_owned(),
                message: message(),
            }),
        }
    }

    /// Builds the request URL with percent-encoded query parameters.
    fn build_url(&self, query: &str, at: Coordinate, page_token: Option<&str>) -> Url {
        let mut url = self.search_url.clone();
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("key", &self.api_key);
            pairs.append_pair("query", query);
            pairs.append_pair("location", &at.to_string());
            if let Some(token) = page_token {
                pairs.append_pair("pagetoken", token);
            }
        }
        url
    }
}

#[cfg(test)]
#[path = "../client_test.rs"]
mod tests;
