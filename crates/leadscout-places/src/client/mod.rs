//! HTTP client for the Places API (New) text search endpoint.

use std::time::Duration;

use leadscout_core::AppConfig;
use reqwest::Client;
use tokio_util::sync::CancellationToken;

use crate::error::PlacesError;
use crate::types::{
    ErrorEnvelope, SearchTextBody, SearchTextResponse, TextSearchPage, FIELD_MASK, MAX_PAGE_SIZE,
};

const SEARCH_TEXT_PATH: &str = "/v1/places:searchText";
const API_KEY_HEADER: &str = "X-Goog-Api-Key";
const FIELD_MASK_HEADER: &str = "X-Goog-FieldMask";

/// One page request against `places:searchText`.
#[derive(Debug, Clone, Copy)]
pub struct TextSearchRequest<'a> {
    pub text_query: &'a str,
    /// Token from the previous page; `None` requests the first page.
    pub page_token: Option<&'a str>,
    pub api_key: &'a str,
}

/// HTTP client for the places text search endpoint.
///
/// Non-2xx responses are mapped to typed errors. The client performs no
/// retries of its own; callers decide how to react to a failed page.
/// Every request races a [`CancellationToken`] so a stop request aborts the
/// in-flight call instead of waiting for it.
pub struct PlacesClient {
    client: Client,
    search_url: reqwest::Url,
    language_code: String,
}

impl PlacesClient {
    /// Creates a `PlacesClient` against `base_url` (e.g.
    /// `https://places.googleapis.com`) with the given timeout and `User-Agent`.
    ///
    /// # Errors
    ///
    /// Returns [`PlacesError::InvalidBaseUrl`] if `base_url` does not parse,
    /// or [`PlacesError::Http`] if the underlying `reqwest::Client` cannot be
    /// constructed.
    pub fn new(base_url: &str, timeout_secs: u64, user_agent: &str) -> Result<Self, PlacesError> {
        let search_url = Self::search_url(base_url)?;
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;
        Ok(Self {
            client,
            search_url,
            language_code: "en".to_string(),
        })
    }

    /// Builds a client from the application config.
    ///
    /// # Errors
    ///
    /// See [`PlacesClient::new`].
    pub fn from_app_config(config: &AppConfig) -> Result<Self, PlacesError> {
        Ok(Self::new(
            &config.places_base_url,
            config.request_timeout_secs,
            &config.user_agent,
        )?
        .with_language_code(&config.places_language_code))
    }

    #[must_use]
    pub fn with_language_code(mut self, language_code: &str) -> Self {
        self.language_code = language_code.to_string();
        self
    }

    /// Fetches one page of text search results.
    ///
    /// Resolves to [`PlacesError::Cancelled`] as soon as `cancel` fires,
    /// dropping the in-flight request.
    ///
    /// # Errors
    ///
    /// - [`PlacesError::MissingApiKey`]: `api_key` is blank; nothing is sent.
    /// - [`PlacesError::RateLimited`]: HTTP 429.
    /// - [`PlacesError::Api`]: any other non-2xx status.
    /// - [`PlacesError::Http`]: network or TLS failure.
    /// - [`PlacesError::Deserialize`]: response body is not the expected JSON.
    /// - [`PlacesError::Cancelled`]: `cancel` fired before the response arrived.
    pub async fn search_text(
        &self,
        request: &TextSearchRequest<'_>,
        cancel: &CancellationToken,
    ) -> Result<TextSearchPage, PlacesError> {
        if cancel.is_cancelled() {
            return Err(PlacesError::Cancelled);
        }

        tokio::select! {
            biased;
            () = cancel.cancelled() => Err(PlacesError::Cancelled),
            result = self.send_search_text(request) => result,
        }
    }

    async fn send_search_text(
        &self,
        request: &TextSearchRequest<'_>,
    ) -> Result<TextSearchPage, PlacesError> {
        if request.api_key.trim().is_empty() {
            return Err(PlacesError::MissingApiKey);
        }

        let body = SearchTextBody {
            text_query: request.text_query,
            page_size: MAX_PAGE_SIZE,
            language_code: &self.language_code,
            page_token: request.page_token,
        };

        tracing::debug!(
            text_query = request.text_query,
            has_page_token = request.page_token.is_some(),
            "places text search request"
        );

        let response = self
            .client
            .post(self.search_url.clone())
            .header(API_KEY_HEADER, request.api_key)
            .header(FIELD_MASK_HEADER, FIELD_MASK)
            .json(&body)
            .send()
            .await?;
        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after_secs = response
                .headers()
                .get(reqwest::header::RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(60);
            return Err(PlacesError::RateLimited { retry_after_secs });
        }

        let text = response.text().await?;

        if !status.is_success() {
            return Err(api_error(status.as_u16(), &text));
        }

        let parsed = serde_json::from_str::<SearchTextResponse>(&text).map_err(|e| {
            PlacesError::Deserialize {
                context: format!("text search page for \"{}\"", request.text_query),
                source: e,
            }
        })?;

        Ok(TextSearchPage::from(parsed))
    }

    /// Resolves the `places:searchText` URL against `base_url`.
    ///
    /// # Errors
    ///
    /// Returns [`PlacesError::InvalidBaseUrl`] if `base_url` is not an
    /// absolute http(s) URL.
    fn search_url(base_url: &str) -> Result<reqwest::Url, PlacesError> {
        let trimmed = base_url.trim().trim_end_matches('/');
        let url = reqwest::Url::parse(&format!("{trimmed}{SEARCH_TEXT_PATH}")).map_err(|e| {
            PlacesError::InvalidBaseUrl {
                base_url: base_url.to_owned(),
                reason: e.to_string(),
            }
        })?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(PlacesError::InvalidBaseUrl {
                base_url: base_url.to_owned(),
                reason: format!("unsupported scheme \"{}\"", url.scheme()),
            });
        }

        Ok(url)
    }
}

/// Maps a non-2xx body to [`PlacesError::Api`], using Google's error
/// envelope when present and the raw body otherwise.
fn api_error(status: u16, body: &str) -> PlacesError {
    match serde_json::from_str::<ErrorEnvelope>(body) {
        Ok(envelope) => PlacesError::Api {
            status,
            code: envelope.error.status,
            message: envelope.error.message,
        },
        Err(_) => PlacesError::Api {
            status,
            code: None,
            message: body.chars().take(200).collect(),
        },
    }
}

#[cfg(test)]
#[path = "../client_test.rs"]
mod tests;
