//! Auth routes — JSON login/logout plus the session-cookie extractor.

use axum::extract::{FromRef, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::Deserialize;
use time::Duration;

use crate::services::access::AccessResult;
use crate::services::session::Session;
use crate::state::AppState;

pub(crate) const COOKIE_NAME: &str = "session_token";

pub(crate) fn env_bool(key: &str) -> Option<bool> {
    std::env::var(key)
        .ok()
        .and_then(|raw| match raw.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Some(true),
            "0" | "false" | "no" | "off" => Some(false),
            _ => None,
        })
}

pub(crate) fn cookie_secure() -> bool {
    env_bool("COOKIE_SECURE").unwrap_or(false)
}

pub(crate) fn session_cookie(token: String) -> Cookie<'static> {
    Cookie::build((COOKIE_NAME, token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(cookie_secure())
        .build()
}

pub(crate) fn clear_session_cookie() -> Cookie<'static> {
    Cookie::build((COOKIE_NAME, ""))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(cookie_secure())
        .max_age(Duration::ZERO)
        .build()
}

// =============================================================================
// AUTH EXTRACTOR
// =============================================================================

/// Logged-in session extracted from the session cookie.
/// Use as a handler parameter to require authentication.
pub struct AuthSession {
    pub session: Session,
    pub token: String,
}

impl<S> axum::extract::FromRequestParts<S> for AuthSession
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = StatusCode;

    async fn from_request_parts(parts: &mut axum::http::request::Parts, state: &S) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);
        let token = jar.get(COOKIE_NAME).map(Cookie::value).unwrap_or_default();
        if token.is_empty() {
            return Err(StatusCode::UNAUTHORIZED);
        }

        let app_state = AppState::from_ref(state);
        let session = app_state
            .sessions
            .get(token)
            .await
            .ok_or(StatusCode::UNAUTHORIZED)?;

        Ok(Self { session, token: token.to_owned() })
    }
}

// =============================================================================
// HANDLERS
// =============================================================================

#[derive(Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub consumer_secret: String,
}

/// `POST /api/auth/login` — evaluate access, create a session on grant.
pub async fn login(State(state): State<AppState>, Json(req): Json<LoginRequest>) -> Response {
    match state
        .evaluator
        .evaluate(&req.username, &req.consumer_secret)
        .await
    {
        AccessResult::Granted { role, subscription } => {
            let session = Session { user: req.username, role, subscription };
            let token = state.sessions.create(session.clone()).await;
            tracing::info!(user = %session.user, role = role.as_str(), "login granted");

            let jar = CookieJar::new().add(session_cookie(token));
            (jar, Json(session)).into_response()
        }
        AccessResult::Denied { reason } => {
            tracing::info!(user = %req.username, %reason, "login denied");
            (StatusCode::UNAUTHORIZED, Json(serde_json::json!({ "error": reason }))).into_response()
        }
    }
}

/// `GET /api/auth/me` — return the current session.
pub async fn me(auth: AuthSession) -> Json<Session> {
    Json(auth.session)
}

/// `POST /api/auth/logout` — remove the session, clear the cookie.
pub async fn logout(State(state): State<AppState>, auth: AuthSession) -> impl IntoResponse {
    state.sessions.remove(&auth.token).await;

    let jar = CookieJar::new().add(clear_session_cookie());
    (jar, StatusCode::NO_CONTENT)
}

#[cfg(test)]
#[path = "auth_test.rs"]
mod tests;
