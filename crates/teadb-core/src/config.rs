use crate::app_config::{AppConfig, Environment};
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
/// Parsing and validation are decoupled from the process environment so
/// tests can drive them with a plain `HashMap`.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::path::PathBuf;

    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var).map_err(|_| ConfigError::MissingEnvVar(var.to_string()))
    };

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

    let database_url = require("DATABASE_URL")?;
    let env = parse_environment(&or_default("TEADB_ENV", "development"));
    let log_level = or_default("TEADB_LOG_LEVEL", "info");
    let reference_path = PathBuf::from(or_default(
        "TEADB_REFERENCE_PATH",
        "./config/reference.yaml",
    ));

    let db_max_connections = parse_u32("TEADB_DB_MAX_CONNECTIONS", "1")?;
    if db_max_connections == 0 {
        return Err(invalid(
            "TEADB_DB_MAX_CONNECTIONS",
            "must be at least 1".to_string(),
        ));
    }
    let db_acquire_timeout_secs = parse_u64("TEADB_DB_ACQUIRE_TIMEOUT_SECS", "10")?;

    let scraper_request_timeout_secs = parse_u64("TEADB_SCRAPER_REQUEST_TIMEOUT_SECS", "30")?;
    let scraper_user_agent = or_default("TEADB_SCRAPER_USER_AGENT", "teadb/0.1 (tea-catalog)");
    let scraper_max_retries = parse_u32("TEADB_SCRAPER_MAX_RETRIES", "3")?;
    let scraper_retry_delay_ms = parse_u64("TEADB_SCRAPER_RETRY_DELAY_MS", "0")?;
    let scraper_max_listing_pages = parse_usize("TEADB_SCRAPER_MAX_LISTING_PAGES", "25")?;

    let max_age_days = or_default("TEADB_MAX_AGE_DAYS", "14")
        .parse::<i64>()
        .map_err(|e| invalid("TEADB_MAX_AGE_DAYS", e.to_string()))?;
    if max_age_days < 0 {
        return Err(invalid(
            "TEADB_MAX_AGE_DAYS",
            format!("must not be negative, got {max_age_days}"),
        ));
    }

    Ok(AppConfig {
        database_url,
        env,
        log_level,
        reference_path,
        db_max_connections,
        db_acquire_timeout_secs,
        scraper_request_timeout_secs,
        scraper_user_agent,
        scraper_max_retries,
        scraper_retry_delay_ms,
        scraper_max_listing_pages,
        max_age_days,
    })
}

/// Parse a string into an `Environment` variant.
///
/// Unrecognized values default to `Environment::Development`.
fn parse_environment(s: &str) -> Environment {
    match s {
        "production" => Environment::Production,
        "test" => Environment::Test,
        _ => Environment::Development,
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
