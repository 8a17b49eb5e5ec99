//! Server-rendered login form and portal pages.
//!
//! DESIGN
//! ======
//! Two static templates with `{{PLACEHOLDER}}` substitution; all user-supplied
//! text is HTML-escaped before it reaches a page. The form posts to `/login`,
//! which either sets the session cookie and redirects home or re-renders the
//! form with the denial reason.

use axum::extract::{Form, State};
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum_extra::extract::cookie::{Cookie, CookieJar};
use serde::Deserialize;

use super::auth::{COOKIE_NAME, clear_session_cookie, session_cookie};
use crate::services::access::{AccessResult, Role};
use crate::services::session::Session;
use crate::state::AppState;

const LOGIN_TEMPLATE: &str = include_str!("../../templates/login.html");
const PORTAL_TEMPLATE: &str = include_str!("../../templates/portal.html");

/// Escape text for interpolation into HTML body or attribute context.
pub(crate) fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

pub(crate) fn render_login(error: Option<&str>) -> Html<String> {
    let banner = match error {
        Some(reason) => format!(r#"<p class="error">Access denied: {}</p>"#, escape_html(reason)),
        None => String::new(),
    };
    Html(LOGIN_TEMPLATE.replace("{{ERROR}}", &banner))
}

pub(crate) fn render_portal(session: &Session) -> Html<String> {
    let details = match session.role {
        Role::Admin => r#"<p class="notice">Full admin access granted</p>"#.to_owned(),
        Role::Subscriber => session.subscription.as_ref().map_or_else(String::new, |record| {
            let pretty = serde_json::to_string_pretty(record).unwrap_or_default();
            format!("<h2>Subscription details</h2>\n<pre>{}</pre>", escape_html(&pretty))
        }),
    };

    Html(
        PORTAL_TEMPLATE
            .replace("{{USER}}", &escape_html(&session.user))
            .replace("{{ROLE}}", session.role.as_str())
            .replace("{{DETAILS}}", &details),
    )
}

// =============================================================================
// HANDLERS
// =============================================================================

/// `GET /` — portal when a valid session cookie is present, login form otherwise.
pub async fn index(State(state): State<AppState>, jar: CookieJar) -> Html<String> {
    let token = jar.get(COOKIE_NAME).map(Cookie::value).unwrap_or_default();
    if !token.is_empty() {
        if let Some(session) = state.sessions.get(token).await {
            return render_portal(&session);
        }
    }
    render_login(None)
}

#[derive(Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub consumer_secret: String,
}

/// `POST /login` — form submit; redirect home on grant, re-render on denial.
pub async fn form_login(State(state): State<AppState>, Form(form): Form<LoginForm>) -> Response {
    match state
        .evaluator
        .evaluate(&form.username, &form.consumer_secret)
        .await
    {
        AccessResult::Granted { role, subscription } => {
            let session = Session { user: form.username, role, subscription };
            tracing::info!(user = %session.user, role = role.as_str(), "form login granted");
            let token = state.sessions.create(session).await;

            let jar = CookieJar::new().add(session_cookie(token));
            (jar, Redirect::to("/")).into_response()
        }
        AccessResult::Denied { reason } => {
            tracing::info!(user = %form.username, %reason, "form login denied");
            render_login(Some(&reason)).into_response()
        }
    }
}

/// `POST /logout` — drop the session, clear the cookie, back to the form.
pub async fn form_logout(State(state): State<AppState>, jar: CookieJar) -> Response {
    if let Some(token) = jar.get(COOKIE_NAME).map(Cookie::value) {
        state.sessions.remove(token).await;
    }

    let jar = CookieJar::new().add(clear_session_cookie());
    (jar, Redirect::to("/")).into_response()
}

#[cfg(test)]
#[path = "pages_test.rs"]
mod tests;
