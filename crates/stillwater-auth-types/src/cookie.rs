//! Admin session cookie builders.
//!
//! The admin dashboard authenticates with an HTTP-only, SameSite=Strict
//! cookie. End-user clients never receive a cookie.

use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use time::Duration;

/// Cookie name for the admin session token.
pub const ADMIN_TOKEN_COOKIE: &str = "stillwater_admin_token";

/// Attributes that vary per deployment.
#[derive(Debug, Clone, Default)]
pub struct CookieSettings {
    pub domain: Option<String>,
    pub secure: bool,
}

fn base(value: String, settings: &CookieSettings, max_age: Duration) -> Cookie<'static> {
    let mut builder = Cookie::build((ADMIN_TOKEN_COOKIE, value))
        .path("/")
        .max_age(max_age)
        .http_only(true)
        .secure(settings.secure)
        .same_site(SameSite::Strict);
    if let Some(domain) = &settings.domain {
        builder = builder.domain(domain.clone());
    }
    builder.build()
}

/// Set the admin token cookie with a Max-Age matching the token lifetime.
///
/// ```
/// use axum_extra::extract::cookie::{CookieJar, SameSite};
/// use stillwater_auth_types::cookie::{set_admin_token_cookie, CookieSettings, ADMIN_TOKEN_COOKIE};
///
/// let settings = CookieSettings { domain: None, secure: true };
/// let jar = set_admin_token_cookie(CookieJar::new(), "token_value".to_string(), &settings, 86_400);
/// let cookie = jar.get(ADMIN_TOKEN_COOKIE).unwrap();
/// assert_eq!(cookie.path(), Some("/"));
/// assert_eq!(cookie.max_age(), Some(time::Duration::seconds(86_400)));
/// assert_eq!(cookie.same_site(), Some(SameSite::Strict));
/// assert!(cookie.http_only().unwrap_or(false));
/// assert!(cookie.secure().unwrap_or(false));
/// ```
pub fn set_admin_token_cookie(
    jar: CookieJar,
    value: String,
    settings: &CookieSettings,
    ttl_secs: u64,
) -> CookieJar {
    let max_age = Duration::seconds(i64::try_from(ttl_secs).unwrap_or(i64::MAX));
    jar.add(base(value, settings, max_age))
}

/// Clear the admin token cookie by setting Max-Age to 0.
///
/// ```
/// use axum_extra::extract::cookie::CookieJar;
/// use stillwater_auth_types::cookie::{
///     clear_admin_token_cookie, set_admin_token_cookie, CookieSettings, ADMIN_TOKEN_COOKIE,
/// };
///
/// let settings = CookieSettings { domain: Some("example.com".to_string()), secure: true };
/// let jar = set_admin_token_cookie(CookieJar::new(), "t".to_string(), &settings, 60);
/// let jar = clear_admin_token_cookie(jar, &settings);
/// let cookie = jar.get(ADMIN_TOKEN_COOKIE).unwrap();
/// assert_eq!(cookie.value(), "");
/// assert_eq!(cookie.domain(), Some("example.com"));
/// assert_eq!(cookie.max_age(), Some(time::Duration::ZERO));
/// ```
pub fn clear_admin_token_cookie(jar: CookieJar, settings: &CookieSettings) -> CookieJar {
    jar.add(base(String::new(), settings, Duration::ZERO))
}
