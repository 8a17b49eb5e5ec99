use super::*;

use axum::body::to_bytes;
use axum::extract::FromRequestParts;
use axum::http::header::SET_COOKIE;
use serde_json::json;

use crate::services::access::Role;
use crate::state::test_helpers::{record, state_with_outage, state_with_records};

// =============================================================================
// env_bool — uses unique env var names to avoid races with parallel tests.
// =============================================================================

#[test]
fn env_bool_true_variants() {
    for (i, val) in ["1", "true", "yes", "on"].iter().enumerate() {
        let key = format!("__TEST_SG_EB_TRUE_{i}__");
        unsafe { std::env::set_var(&key, val) };
        assert_eq!(env_bool(&key), Some(true), "expected true for {val:?}");
        unsafe { std::env::remove_var(&key) };
    }
}

#[test]
fn env_bool_false_variants() {
    for (i, val) in ["0", "false", "no", "off"].iter().enumerate() {
        let key = format!("__TEST_SG_EB_FALSE_{i}__");
        unsafe { std::env::set_var(&key, val) };
        assert_eq!(env_bool(&key), Some(false), "expected false for {val:?}");
        unsafe { std::env::remove_var(&key) };
    }
}

#[test]
fn env_bool_invalid_returns_none() {
    let key = "__TEST_SG_EB_INVALID__";
    unsafe { std::env::set_var(key, "maybe") };
    assert_eq!(env_bool(key), None);
    unsafe { std::env::remove_var(key) };
}

#[test]
fn env_bool_unset_returns_none() {
    assert_eq!(env_bool("__TEST_SG_EB_SURELY_UNSET__"), None);
}

// =============================================================================
// Cookie helpers
// =============================================================================

#[test]
fn session_cookie_is_http_only_lax_rooted() {
    let cookie = session_cookie("tok123".into());
    assert_eq!(cookie.name(), COOKIE_NAME);
    assert_eq!(cookie.value(), "tok123");
    assert_eq!(cookie.http_only(), Some(true));
    assert_eq!(cookie.path(), Some("/"));
    assert_eq!(cookie.same_site(), Some(SameSite::Lax));
}

#[test]
fn clear_cookie_expires_immediately() {
    let cookie = clear_session_cookie();
    assert_eq!(cookie.name(), COOKIE_NAME);
    assert_eq!(cookie.value(), "");
    assert_eq!(cookie.max_age(), Some(Duration::ZERO));
}

// =============================================================================
// AuthSession extractor
// =============================================================================

fn parts_with_headers(cookie: Option<&str>) -> axum::http::request::Parts {
    let mut builder = axum::http::Request::builder().uri("/api/auth/me");
    if let Some(value) = cookie {
        builder = builder.header("cookie", value);
    }
    builder.body(()).unwrap().into_parts().0
}

#[tokio::test]
async fn extractor_rejects_missing_cookie() {
    let state = state_with_records(vec![]);
    let mut parts = parts_with_headers(None);
    let result = AuthSession::from_request_parts(&mut parts, &state).await;
    assert!(matches!(result, Err(StatusCode::UNAUTHORIZED)));
}

#[tokio::test]
async fn extractor_rejects_unknown_token() {
    let state = state_with_records(vec![]);
    let mut parts = parts_with_headers(Some("session_token=deadbeef"));
    let result = AuthSession::from_request_parts(&mut parts, &state).await;
    assert!(matches!(result, Err(StatusCode::UNAUTHORIZED)));
}

#[tokio::test]
async fn extractor_resolves_valid_token() {
    let state = state_with_records(vec![]);
    let token = state
        .sessions
        .create(Session { user: "alice".into(), role: Role::Subscriber, subscription: None })
        .await;

    let header = format!("session_token={token}");
    let mut parts = parts_with_headers(Some(&header));
    let auth = AuthSession::from_request_parts(&mut parts, &state)
        .await
        .unwrap();
    assert_eq!(auth.session.user, "alice");
    assert_eq!(auth.token, token);
}

// =============================================================================
// login handler
// =============================================================================

fn set_cookie_value(response: &Response) -> String {
    response
        .headers()
        .get(SET_COOKIE)
        .expect("set-cookie header")
        .to_str()
        .unwrap()
        .to_owned()
}

#[tokio::test]
async fn login_granted_sets_cookie_and_session() {
    let state = state_with_records(vec![record(json!({ "user_name": "alice", "status": "active" }))]);
    let response = login(
        State(state.clone()),
        Json(LoginRequest { username: "alice".into(), consumer_secret: "s".into() }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let set_cookie = set_cookie_value(&response);
    assert!(set_cookie.starts_with("session_token="));
    assert!(set_cookie.contains("HttpOnly"));

    // The issued token resolves in the store.
    let token = set_cookie
        .trim_start_matches("session_token=")
        .split(';')
        .next()
        .unwrap()
        .to_owned();
    let session = state.sessions.get(&token).await.unwrap();
    assert_eq!(session.user, "alice");
    assert_eq!(session.role, Role::Subscriber);

    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(value["user"], json!("alice"));
    assert_eq!(value["role"], json!("subscriber"));
    assert_eq!(value["subscription"]["user_name"], json!("alice"));
}

#[tokio::test]
async fn login_admin_has_no_subscription_payload() {
    let state = state_with_records(vec![]);
    let response = login(
        State(state),
        Json(LoginRequest { username: "admin".into(), consumer_secret: "s".into() }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(value["role"], json!("admin"));
    assert!(value.get("subscription").is_none());
}

#[tokio::test]
async fn login_denied_returns_401_with_reason() {
    let state = state_with_records(vec![record(json!({ "user_name": "bob", "status": "expired" }))]);
    let response = login(
        State(state.clone()),
        Json(LoginRequest { username: "bob".into(), consumer_secret: "s".into() }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert!(response.headers().get(SET_COOKIE).is_none());

    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(value["error"], json!("No active subscription found"));
}

#[tokio::test]
async fn login_outage_denies_even_admins() {
    let state = state_with_outage("connection timed out");
    let response = login(
        State(state),
        Json(LoginRequest { username: "admin".into(), consumer_secret: "s".into() }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert!(
        value["error"]
            .as_str()
            .unwrap()
            .contains("connection timed out")
    );
}

// =============================================================================
// me / logout handlers
// =============================================================================

#[tokio::test]
async fn me_returns_current_session() {
    let session = Session { user: "alice".into(), role: Role::Subscriber, subscription: None };
    let Json(returned) = me(AuthSession { session: session.clone(), token: "tok".into() }).await;
    assert_eq!(returned, session);
}

#[tokio::test]
async fn logout_removes_session_and_clears_cookie() {
    let state = state_with_records(vec![]);
    let session = Session { user: "alice".into(), role: Role::Subscriber, subscription: None };
    let token = state.sessions.create(session.clone()).await;

    let response = logout(State(state.clone()), AuthSession { session, token: token.clone() })
        .await
        .into_response();

    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert!(state.sessions.get(&token).await.is_none());

    let set_cookie = set_cookie_value(&response);
    assert!(set_cookie.starts_with("session_token="));
    assert!(set_cookie.contains("Max-Age=0"));
}
