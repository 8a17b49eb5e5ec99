//! Gate configuration parsed from environment variables.

use std::time::Duration;

pub const DEFAULT_API_TIMEOUT_SECS: u64 = 10;

/// Allow-list used when `ADMIN_USERS` is not set at all. Setting the variable,
/// even to an empty string, overrides this fully.
pub const DEFAULT_ADMIN_USERS: &str = "admin,superadmin";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The required subscription API endpoint is not configured.
    #[error("missing subscription API URL: env var {var} not set")]
    MissingApiUrl { var: String },
}

/// Static gate configuration: where to check subscriptions and who bypasses
/// the check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GateConfig {
    /// Remote subscription-status endpoint (GET, `consumer_secret` query param).
    pub api_url: String,
    /// Usernames granted unconditional access once the API call succeeds.
    pub admin_users: Vec<String>,
    /// Timeout applied to each subscription API request.
    pub api_timeout: Duration,
}

impl GateConfig {
    /// Build gate config from environment variables.
    ///
    /// Required:
    /// - `SUBSCRIPTION_API_URL`: subscription-status endpoint
    ///
    /// Optional:
    /// - `ADMIN_USERS`: comma-separated allow-list (default `admin,superadmin`)
    /// - `API_TIMEOUT_SECS`: default 10
    ///
    /// # Errors
    ///
    /// Returns an error if `SUBSCRIPTION_API_URL` is not set.
    pub fn from_env() -> Result<Self, ConfigError> {
        let api_url = std::env::var("SUBSCRIPTION_API_URL")
            .map_err(|_| ConfigError::MissingApiUrl { var: "SUBSCRIPTION_API_URL".into() })?;

        let admin_users = parse_admin_users(
            &std::env::var("ADMIN_USERS").unwrap_or_else(|_| DEFAULT_ADMIN_USERS.to_string()),
        );

        let timeout_secs = env_parse_u64("API_TIMEOUT_SECS", DEFAULT_API_TIMEOUT_SECS);

        Ok(Self { api_url, admin_users, api_timeout: Duration::from_secs(timeout_secs) })
    }
}

/// Split a comma-separated allow-list, trimming entries and dropping empties.
#[must_use]
pub fn parse_admin_users(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_owned)
        .collect()
}

fn env_parse_u64(key: &str, default: u64) -> u64 {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse::<u64>().ok())
        .unwrap_or(default)
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
