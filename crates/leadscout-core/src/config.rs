use crate::app_config::{AppConfig, Environment, MAX_CATEGORY_CAP};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Parsing and validation live here, decoupled from the process environment,
/// so tests can drive it with a plain `HashMap`.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::path::PathBuf;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        or_default(var, default)
            .parse::<u32>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        or_default(var, default)
            .parse::<u64>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        or_default(var, default)
            .parse::<usize>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let env = parse_environment(&or_default("LEADSCOUT_ENV", "development"))?;
    let log_level = or_default("LEADSCOUT_LOG_LEVEL", "info");
    let categories_path = PathBuf::from(or_default(
        "LEADSCOUT_CATEGORIES_PATH",
        "./config/categories.yaml",
    ));

    // An empty key is treated the same as an unset one.
    let places_api_key = lookup("GOOGLE_PLACES_API_KEY")
        .ok()
        .map(|k| k.trim().to_string())
        .filter(|k| !k.is_empty());

    let places_base_url = or_default("LEADSCOUT_PLACES_BASE_URL", "https://places.googleapis.com")
        .trim_end_matches('/')
        .to_string();
    let places_language_code = or_default("LEADSCOUT_LANGUAGE_CODE", "en");

    let request_timeout_secs = parse_u64("LEADSCOUT_REQUEST_TIMEOUT_SECS", "30")?;
    let user_agent = or_default("LEADSCOUT_USER_AGENT", "leadscout/0.1 (lead-generation)");

    let category_cap = parse_usize("LEADSCOUT_CATEGORY_CAP", "60")?;
    if category_cap == 0 || category_cap > MAX_CATEGORY_CAP {
        return Err(invalid(
            "LEADSCOUT_CATEGORY_CAP",
            format!("must be between 1 and {MAX_CATEGORY_CAP}, got {category_cap}"),
        ));
    }

    let page_retry_backoff_ms = parse_u64("LEADSCOUT_PAGE_RETRY_BACKOFF_MS", "2000")?;
    let page_retries = parse_u32("LEADSCOUT_PAGE_RETRIES", "1")?;
    let pagination_delay_ms = parse_u64("LEADSCOUT_PAGINATION_DELAY_MS", "2000")?;
    let inter_area_delay_ms = parse_u64("LEADSCOUT_INTER_AREA_DELAY_MS", "1000")?;
    let inter_category_delay_ms = parse_u64("LEADSCOUT_INTER_CATEGORY_DELAY_MS", "1500")?;

    Ok(AppConfig {
        env,
        log_level,
        categories_path,
        places_api_key,
        places_base_url,
        places_language_code,
        request_timeout_secs,
        user_agent,
        category_cap,
        page_retry_backoff_ms,
        page_retries,
        pagination_delay_ms,
        inter_area_delay_ms,
        inter_category_delay_ms,
    })
}

/// Parse a string into an `Environment` variant.
///
/// # Errors
///
/// Returns `ConfigError::InvalidEnvVar` for anything other than
/// `development`, `test`, or `production`.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "LEADSCOUT_ENV".to_string(),
            reason: format!("unknown environment '{other}'"),
        }),
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
