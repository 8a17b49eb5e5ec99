//! Subscription-status API client.
//!
//! WIRE CONTRACT
//! =============
//! The remote endpoint is a GET that authenticates the lookup itself with a
//! `consumer_secret` query parameter and responds with
//! `{ "status": "success", "data": [ { "user_name", "status", ... }, ... ] }`.
//! The secret travels in cleartext query params. That is the upstream API's
//! contract, kept as-is; changing it here would break the remote side.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Literal status value marking a subscription as active.
pub const STATUS_ACTIVE: &str = "active";

/// Literal top-level status value marking a well-formed API response.
const ENVELOPE_SUCCESS: &str = "success";

// =============================================================================
// ERROR
// =============================================================================

/// Errors produced by subscription lookups. Every variant's `Display` string
/// doubles as the user-visible denial reason.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The request could not be sent or timed out before a response arrived.
    #[error("API request failed: {0}")]
    Transport(String),

    /// The endpoint answered with a non-success HTTP status.
    #[error("API error: {body}")]
    Http { status: u16, body: String },

    /// The response body is not the expected JSON shape.
    #[error("API response parse failed: {0}")]
    Decode(String),

    /// Transport succeeded but the payload's status field is not `"success"`.
    #[error("Invalid API response")]
    InvalidResponse,

    /// The underlying HTTP client could not be constructed.
    #[error("HTTP client build failed: {0}")]
    ClientBuild(String),
}

// =============================================================================
// RECORD
// =============================================================================

/// One subscription row from the remote API. Fields beyond `user_name` and
/// `status` are passed through unchanged; rows missing either field decode as
/// empty strings and simply never match a login.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubscriptionRecord {
    #[serde(default)]
    pub user_name: String,
    #[serde(default)]
    pub status: String,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl SubscriptionRecord {
    /// Exact-equality match: this record grants `username` access only when
    /// the names are identical and the status is the literal `"active"`.
    #[must_use]
    pub fn grants(&self, username: &str) -> bool {
        self.user_name == username && self.status == STATUS_ACTIVE
    }
}

#[derive(Debug, Deserialize)]
struct ApiEnvelope {
    #[serde(default)]
    status: String,
    #[serde(default)]
    data: Vec<SubscriptionRecord>,
}

// =============================================================================
// LOOKUP SEAM
// =============================================================================

/// Seam between the access evaluator and the wire. Tests substitute canned
/// implementations; production uses [`HttpSubscriptionClient`].
#[async_trait::async_trait]
pub trait SubscriptionLookup: Send + Sync {
    /// Fetch the subscription list for the given consumer secret.
    async fn fetch_subscriptions(&self, consumer_secret: &str) -> Result<Vec<SubscriptionRecord>, ApiError>;
}

// =============================================================================
// HTTP CLIENT
// =============================================================================

/// Reqwest-backed subscription lookup. One request per call: no retries, no
/// caching, so every login attempt observes current remote state.
pub struct HttpSubscriptionClient {
    http: reqwest::Client,
    api_url: String,
}

impl HttpSubscriptionClient {
    /// Build a client for the given endpoint with a per-request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to build.
    pub fn new(api_url: String, timeout: Duration) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ApiError::ClientBuild(e.to_string()))?;
        Ok(Self { http, api_url })
    }
}

#[async_trait::async_trait]
impl SubscriptionLookup for HttpSubscriptionClient {
    async fn fetch_subscriptions(&self, consumer_secret: &str) -> Result<Vec<SubscriptionRecord>, ApiError> {
        let response = self
            .http
            .get(&self.api_url)
            .query(&[("consumer_secret", consumer_secret)])
            .send()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        if !status.is_success() {
            return Err(ApiError::Http { status: status.as_u16(), body });
        }

        let envelope: ApiEnvelope = serde_json::from_str(&body).map_err(|e| ApiError::Decode(e.to_string()))?;
        if envelope.status != ENVELOPE_SUCCESS {
            return Err(ApiError::InvalidResponse);
        }

        Ok(envelope.data)
    }
}

#[cfg(test)]
#[path = "subscription_test.rs"]
mod tests;
