//! Sign-in gate for dashboard page navigations.

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::{IntoResponse, Redirect, Response};
use serde::Serialize;

use stillwater_auth_types::credential::cookie_token;
use stillwater_auth_types::token::TokenCodec;

use crate::state::AppState;

pub const SIGN_IN_PATH: &str = "/sign-in";

const AUTH_PAGES: &[&str] = &[SIGN_IN_PATH, "/sign-up", "/forgot-password", "/reset-password"];
const EXEMPT_PREFIXES: &[&str] = &["/api/", "/assets/", "/static/", "/_internal/"];
const HEALTH_PATHS: &[&str] = &["/healthz", "/readyz"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    Pass,
    Redirect(String),
}

fn is_exempt(path: &str) -> bool {
    if path == "/api" || HEALTH_PATHS.contains(&path) {
        return true;
    }
    if AUTH_PAGES
        .iter()
        .any(|page| path == *page || path.starts_with(&format!("{page}/")))
    {
        return true;
    }
    if EXEMPT_PREFIXES.iter().any(|prefix| path.starts_with(prefix)) {
        return true;
    }
    // `/logo.svg`, `/favicon.ico` and the like.
    path.rsplit('/')
        .next()
        .is_some_and(|last| last.contains('.'))
}

#[derive(Serialize)]
struct Callback<'a> {
    callback: &'a str,
}

fn sign_in_location(path: &str) -> String {
    match serde_qs::to_string(&Callback { callback: path }) {
        Ok(query) => format!("{SIGN_IN_PATH}?{query}"),
        Err(_) => SIGN_IN_PATH.to_owned(),
    }
}

/// Decide whether a navigation to `path` may proceed. Pure per-request
/// predicate over the admin session token.
pub fn guard_decision(path: &str, token: Option<&str>, codec: &TokenCodec) -> GuardDecision {
    if is_exempt(path) {
        return GuardDecision::Pass;
    }
    match token {
        Some(token) if codec.verify(token).is_ok() => GuardDecision::Pass,
        _ => GuardDecision::Redirect(sign_in_location(path)),
    }
}

pub async fn edge_guard(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let token = cookie_token(request.headers());
    match guard_decision(request.uri().path(), token.as_deref(), &state.codec) {
        GuardDecision::Pass => next.run(request).await,
        GuardDecision::Redirect(location) => {
            tracing::debug!(path = %request.uri().path(), "redirecting to sign-in");
            Redirect::temporary(&location).into_response()
        }
    }
}
