//! Credential helpers for integration tests.
//!
//! Tokens are minted with the same codec the service verifies with, so tests
//! exercise the real extraction and verification path.

use axum::http::{HeaderMap, HeaderValue, header};
use uuid::Uuid;

use stillwater_auth_types::cookie::ADMIN_TOKEN_COOKIE;
use stillwater_auth_types::token::{APP_TOKEN_TTL, TokenCodec};

pub const TEST_JWT_SECRET: &str = "test-jwt-secret-for-unit-tests-only";

/// Signs tokens for a fixed subject.
pub struct MockAuth {
    pub subject: Uuid,
    pub codec: TokenCodec,
}

impl MockAuth {
    pub fn new(subject: Uuid) -> Self {
        Self {
            subject,
            codec: TokenCodec::new(TEST_JWT_SECRET),
        }
    }

    pub fn token(&self) -> String {
        self.codec
            .sign(self.subject, APP_TOKEN_TTL)
            .expect("sign test token")
            .token
    }

    /// `Authorization: Bearer <token>`, as the mobile app sends it.
    pub fn bearer_headers(&self) -> HeaderMap {
        bearer_headers(&self.token())
    }

    /// The admin session cookie, as the browser sends it.
    pub fn cookie_headers(&self) -> HeaderMap {
        cookie_headers(&self.token())
    }
}

pub fn bearer_headers(token: &str) -> HeaderMap {
    let mut map = HeaderMap::new();
    map.insert(
        header::AUTHORIZATION,
        HeaderValue::from_str(&format!("Bearer {token}")).expect("valid header"),
    );
    map
}

pub fn cookie_headers(token: &str) -> HeaderMap {
    let mut map = HeaderMap::new();
    map.insert(
        header::COOKIE,
        HeaderValue::from_str(&format!("{ADMIN_TOKEN_COOKIE}={token}")).expect("valid header"),
    );
    map
}
