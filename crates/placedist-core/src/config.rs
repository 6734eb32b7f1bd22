use crate::app_config::AppConfig;
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
/// Decoupled from the real environment so it can be tested with a plain
/// `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingEnvVar(var.to_string()))
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u32>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let reject_zero = |var: &str| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason: "must be at least 1".to_string(),
    };

    // A zero timeout fails every request immediately.
    let parse_positive_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        match parse_u64(var, default)? {
            0 => Err(reject_zero(var)),
            value => Ok(value),
        }
    };

    // Pool sizes and page caps of zero would stall or skip every search.
    let parse_positive = |var: &str, default: &str| -> Result<usize, ConfigError> {
        let raw = or_default(var, default);
        let value = raw
            .parse::<usize>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })?;
        if value == 0 {
            return Err(reject_zero(var));
        }
        Ok(value)
    };

    let places_api_key = require("PLACES_API_KEY")?;
    let places_base_url = or_default(
        "PLACEDIST_PLACES_BASE_URL",
        "https://maps.googleapis.com/maps/api/place/",
    );
    let log_level = or_default("PLACEDIST_LOG_LEVEL", "info");

    let request_timeout_secs = parse_positive_u64("PLACEDIST_REQUEST_TIMEOUT_SECS", "30")?;
    let user_agent = or_default(
        "PLACEDIST_USER_AGENT",
        "placedist/0.1 (nearest-place-distances)",
    );
    let max_concurrent_coordinates = parse_positive("PLACEDIST_MAX_CONCURRENT_COORDINATES", "4")?;
    let max_in_flight_requests = parse_positive("PLACEDIST_MAX_IN_FLIGHT_REQUESTS", "12")?;
    let max_pages = parse_positive("PLACEDIST_MAX_PAGES", "3")?;
    let page_token_delay_ms = parse_u64("PLACEDIST_PAGE_TOKEN_DELAY_MS", "2000")?;
    let max_retries = parse_u32("PLACEDIST_MAX_RETRIES", "2")?;
    let retry_backoff_base_ms = parse_u64("PLACEDIST_RETRY_BACKOFF_BASE_MS", "500")?;

    Ok(AppConfig {
        places_api_key,
        places_base_url,
        log_level,
        request_timeout_secs,
        user_agent,
        max_concurrent_coordinates,
        max_in_flight_requests,
        max_pages,
        page_token_delay_ms,
        max_retries,
        retry_backoff_base_ms,
    })
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
