//! Credential extraction from request headers.

use axum_extra::extract::cookie::CookieJar;
use http::HeaderMap;
use http::header::AUTHORIZATION;

use crate::cookie::ADMIN_TOKEN_COOKIE;

/// Where a principal kind may present its token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialSource {
    /// Admin cookie first, then `Authorization: Bearer`.
    CookieThenBearer,
    /// `Authorization: Bearer` only.
    BearerOnly,
}

/// Return the raw token presented by the caller, if any.
///
/// Empty values count as absent.
pub fn extract_credential(headers: &HeaderMap, source: CredentialSource) -> Option<String> {
    match source {
        CredentialSource::CookieThenBearer => cookie_token(headers).or_else(|| bearer_token(headers)),
        CredentialSource::BearerOnly => bearer_token(headers),
    }
}

/// The admin session cookie value.
pub fn cookie_token(headers: &HeaderMap) -> Option<String> {
    CookieJar::from_headers(headers)
        .get(ADMIN_TOKEN_COOKIE)
        .map(|c| c.value().trim().to_owned())
        .filter(|v| !v.is_empty())
}

/// The token of an `Authorization: Bearer <token>` header. The scheme is
/// matched case-insensitively.
pub fn bearer_token(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?.trim();
    let (scheme, token) = value.split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    (!token.is_empty()).then(|| token.to_owned())
}
