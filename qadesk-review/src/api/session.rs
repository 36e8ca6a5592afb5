//! Session gate and login/logout handlers
//!
//! The operator identity travels in a signed cookie (see
//! `qadesk_common::session`). Protected routes sit behind [`session_gate`],
//! which redirects to `/login` when the cookie is missing or invalid and
//! otherwise attaches an [`Operator`] to the request.

use axum::{
    extract::{Request, State},
    http::{header, HeaderMap},
    middleware::Next,
    response::{Html, IntoResponse, Redirect, Response},
    Form,
};
use qadesk_common::session::{issue_token, normalize_operator, verify_token, SESSION_COOKIE};
use serde::Deserialize;
use tracing::{debug, info};

use super::pages;
use crate::AppState;

/// Authenticated operator, inserted into request extensions by the gate
#[derive(Debug, Clone)]
pub struct Operator {
    pub name: String,
}

/// Login form fields
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub admin: String,
}

/// Middleware for protected routes
pub async fn session_gate(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    match operator_from_headers(request.headers(), &state.session_secret) {
        Some(operator) => {
            request.extensions_mut().insert(operator);
            next.run(request).await
        }
        None => {
            debug!(path = %request.uri().path(), "No valid session, redirecting to login");
            Redirect::to("/login").into_response()
        }
    }
}

/// Find and verify the session cookie
pub fn operator_from_headers(headers: &HeaderMap, secret: &str) -> Option<Operator> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .filter(|(name, _)| *name == SESSION_COOKIE)
        .find_map(|(_, token)| verify_token(token, secret))
        .map(|name| Operator { name })
}

/// GET /login
pub async fn login_page() -> Html<String> {
    Html(pages::login_page(None))
}

/// POST /login
///
/// Sets the session cookie for a non-empty operator name and redirects to the
/// queue; otherwise shows the form again.
pub async fn login(State(state): State<AppState>, Form(form): Form<LoginForm>) -> Response {
    let Some(name) = normalize_operator(&form.admin) else {
        return Html(pages::login_page(Some("Enter an operator name."))).into_response();
    };

    info!(operator = %name, "Operator logged in");
    let token = issue_token(&name, &state.session_secret);
    let cookie = format!("{SESSION_COOKIE}={token}; Path=/; HttpOnly; SameSite=Lax");

    ([(header::SET_COOKIE, cookie)], Redirect::to("/")).into_response()
}

/// GET /logout
pub async fn logout() -> Response {
    let cookie = format!("{SESSION_COOKIE}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0");
    ([(header::SET_COOKIE, cookie)], Redirect::to("/login")).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    const SECRET: &str = "unit-test-secret-value";

    fn headers_with(cookie: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_str(cookie).unwrap());
        headers
    }

    #[test]
    fn test_valid_cookie_among_others() {
        let token = issue_token("alice", SECRET);
        let headers = headers_with(&format!("theme=dark; {SESSION_COOKIE}={token}; x=1"));
        let operator = operator_from_headers(&headers, SECRET).unwrap();
        assert_eq!(operator.name, "alice");
    }

    #[test]
    fn test_missing_or_forged_cookie() {
        assert!(operator_from_headers(&HeaderMap::new(), SECRET).is_none());

        let forged = headers_with(&format!("{SESSION_COOKIE}=616c696365.deadbeef"));
        assert!(operator_from_headers(&forged, SECRET).is_none());

        let other_secret = issue_token("alice", "a-different-secret-value");
        let headers = headers_with(&format!("{SESSION_COOKIE}={other_secret}"));
        assert!(operator_from_headers(&headers, SECRET).is_none());
    }
}
