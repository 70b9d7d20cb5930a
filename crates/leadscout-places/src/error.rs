use thiserror::Error;

#[derive(Debug, Error)]
pub enum PlacesError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("rate limited by places API (retry after {retry_after_secs}s)")]
    RateLimited { retry_after_secs: u64 },

    /// Non-2xx response. `code` is the upstream `error.status` string
    /// (e.g. `"PERMISSION_DENIED"`) when the body carried one.
    #[error("places API returned HTTP {status}: {message}")]
    Api {
        status: u16,
        code: Option<String>,
        message: String,
    },

    #[error("places API key is not configured")]
    MissingApiKey,

    #[error("invalid places base URL \"{base_url}\": {reason}")]
    InvalidBaseUrl { base_url: String, reason: String },

    #[error("places request cancelled")]
    Cancelled,
}

impl PlacesError {
    /// Returns `true` if the error came from a cancellation signal rather
    /// than from the upstream service.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        matches!(self, PlacesError::Cancelled)
    }
}
