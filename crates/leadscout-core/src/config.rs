use std::path::PathBuf;

use crate::app_config::AppConfig;
use crate::ConfigError;

const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36";

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// | Variable | Default |
/// |----------|---------|
/// | `LEADSCOUT_LOG_LEVEL` | `info` |
/// | `LEADSCOUT_MAX_RESULTS` | `100` |
/// | `LEADSCOUT_STAGNATION_ROUNDS` | `3` |
/// | `LEADSCOUT_SCROLL_DELAY_MIN_MS` / `_MAX_MS` | `1000` / `3000` |
/// | `LEADSCOUT_ENRICH_DELAY_MIN_MS` / `_MAX_MS` | `1000` / `2000` |
/// | `LEADSCOUT_DETAIL_SETTLE_MS` | `500` |
/// | `LEADSCOUT_ENRICH_TIMEOUT_SECS` | `30` |
/// | `LEADSCOUT_USER_AGENT` | desktop Chrome UA |
/// | `LEADSCOUT_RULES_PATH` | unset (built-in rules) |
/// | `LEADSCOUT_OUTPUT_DIR` | `./results` |
///
/// # Errors
///
/// Returns `ConfigError` if a value cannot be parsed or a delay range is inverted.
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
/// Returns `ConfigError` if a value cannot be parsed or a delay range is inverted.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the process environment so tests can drive it with a
/// `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u32>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<usize>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let log_level = or_default("LEADSCOUT_LOG_LEVEL", "info");
    let max_results = parse_usize("LEADSCOUT_MAX_RESULTS", "100")?;

    let stagnation_rounds = parse_u32("LEADSCOUT_STAGNATION_ROUNDS", "3")?;
    if stagnation_rounds == 0 {
        return Err(ConfigError::InvalidEnvVar {
            var: "LEADSCOUT_STAGNATION_ROUNDS".to_string(),
            reason: "must be at least 1".to_string(),
        });
    }

    let scroll_delay_min_ms = parse_u64("LEADSCOUT_SCROLL_DELAY_MIN_MS", "1000")?;
    let scroll_delay_max_ms = parse_u64("LEADSCOUT_SCROLL_DELAY_MAX_MS", "3000")?;
    check_range(
        "LEADSCOUT_SCROLL_DELAY_MIN_MS",
        scroll_delay_min_ms,
        "LEADSCOUT_SCROLL_DELAY_MAX_MS",
        scroll_delay_max_ms,
    )?;

    let enrich_delay_min_ms = parse_u64("LEADSCOUT_ENRICH_DELAY_MIN_MS", "1000")?;
    let enrich_delay_max_ms = parse_u64("LEADSCOUT_ENRICH_DELAY_MAX_MS", "2000")?;
    check_range(
        "LEADSCOUT_ENRICH_DELAY_MIN_MS",
        enrich_delay_min_ms,
        "LEADSCOUT_ENRICH_DELAY_MAX_MS",
        enrich_delay_max_ms,
    )?;

    let detail_settle_ms = parse_u64("LEADSCOUT_DETAIL_SETTLE_MS", "500")?;
    let enrich_timeout_secs = parse_u64("LEADSCOUT_ENRICH_TIMEOUT_SECS", "30")?;
    let user_agent = or_default("LEADSCOUT_USER_AGENT", DEFAULT_USER_AGENT);
    let rules_path = lookup("LEADSCOUT_RULES_PATH")
        .ok()
        .filter(|p| !p.trim().is_empty())
        .map(PathBuf::from);
    let output_dir = PathBuf::from(or_default("LEADSCOUT_OUTPUT_DIR", "./results"));

    Ok(AppConfig {
        log_level,
        max_results,
        stagnation_rounds,
        scroll_delay_min_ms,
        scroll_delay_max_ms,
        enrich_delay_min_ms,
        enrich_delay_max_ms,
        detail_settle_ms,
        enrich_timeout_secs,
        user_agent,
        rules_path,
        output_dir,
    })
}

fn check_range(min_var: &str, min: u64, max_var: &str, max: u64) -> Result<(), ConfigError> {
    if min > max {
        return Err(ConfigError::InvalidRange {
            min_var: min_var.to_string(),
            min,
            max_var: max_var.to_string(),
            max,
        });
    }
    Ok(())
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
