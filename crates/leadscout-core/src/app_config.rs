use std::path::PathBuf;

/// Upper bound accepted for the per-category lead cap.
///
/// This is a sanity limit on user input, not an upstream ceiling; the places
/// API decides for itself how many pages it is willing to serve.
pub const MAX_CATEGORY_CAP: usize = 200;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub log_level: String,
    pub categories_path: PathBuf,
    pub places_api_key: Option<String>,
    pub places_base_url: String,
    pub places_language_code: String,
    pub request_timeout_secs: u64,
    pub user_agent: String,
    pub category_cap: usize,
    pub page_retry_backoff_ms: u64,
    pub page_retries: u32,
    pub pagination_delay_ms: u64,
    pub inter_area_delay_ms: u64,
    pub inter_category_delay_ms: u64,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("log_level", &self.log_level)
            .field("categories_path", &self.categories_path)
            .field(
                "places_api_key",
                &self.places_api_key.as_ref().map(|_| "[redacted]"),
            )
            .field("places_base_url", &self.places_base_url)
            .field("places_language_code", &self.places_language_code)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("user_agent", &self.user_agent)
            .field("category_cap", &self.category_cap)
            .field("page_retry_backoff_ms", &self.page_retry_backoff_ms)
            .field("page_retries", &self.page_retries)
            .field("pagination_delay_ms", &self.pagination_delay_ms)
            .field("inter_area_delay_ms", &self.inter_area_delay_ms)
            .field("inter_category_delay_ms", &self.inter_category_delay_ms)
            .finish()
    }
}
