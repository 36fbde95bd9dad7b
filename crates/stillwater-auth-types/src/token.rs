//! Signed session tokens.
//!
//! A token carries one subject id plus issued-at and expiry. The same codec
//! signs admin and end-user tokens; the principal kind is decided by which
//! store the subject resolves in.

use chrono::{DateTime, TimeZone, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// End-user token lifetime in seconds (7 days).
pub const APP_TOKEN_TTL: u64 = 604_800;

/// Admin token lifetime with "remember me" in seconds (7 days).
pub const ADMIN_REMEMBER_TTL: u64 = 604_800;

/// Admin token lifetime without "remember me" in seconds (1 day).
pub const ADMIN_SESSION_TTL: u64 = 86_400;

/// Admin token lifetime for the login request.
pub fn admin_ttl(remember_me: bool) -> u64 {
    if remember_me {
        ADMIN_REMEMBER_TTL
    } else {
        ADMIN_SESSION_TTL
    }
}

/// Errors returned by [`TokenCodec`]. Verification never panics.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TokenError {
    #[error("invalid signature")]
    InvalidSignature,
    #[error("token expired")]
    Expired,
    #[error("malformed token")]
    Malformed,
    #[error("failed to sign token")]
    Signing,
}

/// JWT claims payload.
///
/// | Field | JWT claim | Meaning |
/// |-------|-----------|---------|
/// | `sub` | `sub` | principal id (UUID string) |
/// | `iat` | `iat` | issued at, seconds since epoch |
/// | `exp` | `exp` | expiry, seconds since epoch |
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub iat: u64,
    pub exp: u64,
}

/// A freshly signed token and the instant it stops verifying.
#[derive(Debug, Clone)]
pub struct SignedToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// HS256 signer/verifier bound to one secret.
#[derive(Clone)]
pub struct TokenCodec {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl TokenCodec {
    pub fn new(secret: &str) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
        }
    }

    pub fn sign(&self, subject: Uuid, ttl_secs: u64) -> Result<SignedToken, TokenError> {
        self.sign_at(subject, ttl_secs, Utc::now())
    }

    pub fn sign_at(
        &self,
        subject: Uuid,
        ttl_secs: u64,
        now: DateTime<Utc>,
    ) -> Result<SignedToken, TokenError> {
        let iat = u64::try_from(now.timestamp()).map_err(|_| TokenError::Signing)?;
        let exp = iat.saturating_add(ttl_secs);
        let claims = Claims {
            sub: subject.to_string(),
            iat,
            exp,
        };
        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|_| TokenError::Signing)?;
        let expires_at = i64::try_from(exp)
            .ok()
            .and_then(|e| Utc.timestamp_opt(e, 0).single())
            .ok_or(TokenError::Signing)?;
        Ok(SignedToken { token, expires_at })
    }

    /// Verify a token and return its subject.
    pub fn verify(&self, token: &str) -> Result<Uuid, TokenError> {
        self.verify_at(token, Utc::now())
    }

    /// Verify against an explicit clock. Valid strictly before `exp`; no leeway.
    pub fn verify_at(&self, token: &str, now: DateTime<Utc>) -> Result<Uuid, TokenError> {
        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry is checked below against `now` so callers control the clock.
        validation.validate_exp = false;
        validation.leeway = 0;
        validation.required_spec_claims.clear();
        validation.set_required_spec_claims(&["exp", "sub"]);

        let data = decode::<Claims>(token, &self.decoding, &validation).map_err(|e| {
            match e.kind() {
                jsonwebtoken::errors::ErrorKind::InvalidSignature
                | jsonwebtoken::errors::ErrorKind::InvalidAlgorithm => TokenError::InvalidSignature,
                _ => TokenError::Malformed,
            }
        })?;

        let now_secs = u64::try_from(now.timestamp()).unwrap_or(0);
        if data.claims.exp <= now_secs {
            return Err(TokenError::Expired);
        }

        data.claims
            .sub
            .parse::<Uuid>()
            .map_err(|_| TokenError::Malformed)
    }
}
