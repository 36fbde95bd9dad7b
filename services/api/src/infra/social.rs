use anyhow::Context as _;
use jsonwebtoken::jwk::JwkSet;
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode, decode_header};
use serde::Deserialize;
use serde_json::Value;

use crate::domain::repository::IdTokenVerifier;
use crate::domain::types::{SocialIdentity, SocialProvider};
use crate::error::ApiError;

const GOOGLE_JWKS_URL: &str = "https://www.googleapis.com/oauth2/v3/certs";
const GOOGLE_ISSUERS: &[&str] = &["https://accounts.google.com", "accounts.google.com"];
const APPLE_JWKS_URL: &str = "https://appleid.apple.com/auth/keys";
const APPLE_ISSUERS: &[&str] = &["https://appleid.apple.com"];

#[derive(Debug, Deserialize)]
struct IdTokenClaims {
    sub: String,
    email: Option<String>,
    /// Google sends a boolean, Apple a `"true"`/`"false"` string.
    email_verified: Option<Value>,
    name: Option<String>,
}

fn email_verified(value: Option<&Value>) -> bool {
    match value {
        None => true,
        Some(Value::Bool(b)) => *b,
        Some(Value::String(s)) => s == "true",
        Some(_) => false,
    }
}

/// Verifies Google and Apple id tokens against the providers' published keys.
#[derive(Clone)]
pub struct JwksIdTokenVerifier {
    client: reqwest::Client,
    google_client_id: Option<String>,
    apple_client_id: Option<String>,
}

impl JwksIdTokenVerifier {
    pub fn new(
        client: reqwest::Client,
        google_client_id: Option<String>,
        apple_client_id: Option<String>,
    ) -> Self {
        Self {
            client,
            google_client_id,
            apple_client_id,
        }
    }

    async fn key_set(&self, url: &str) -> Result<JwkSet, ApiError> {
        // TODO: cache key sets for the max-age the providers send instead of fetching per login.
        let jwks = self
            .client
            .get(url)
            .send()
            .await
            .context("fetch provider key set")?
            .error_for_status()
            .context("provider key set request failed")?
            .json::<JwkSet>()
            .await
            .context("decode provider key set")?;
        Ok(jwks)
    }
}

impl IdTokenVerifier for JwksIdTokenVerifier {
    async fn verify(
        &self,
        provider: SocialProvider,
        id_token: &str,
    ) -> Result<SocialIdentity, ApiError> {
        let (audience, jwks_url, issuers) = match provider {
            SocialProvider::Google => (&self.google_client_id, GOOGLE_JWKS_URL, GOOGLE_ISSUERS),
            SocialProvider::Apple => (&self.apple_client_id, APPLE_JWKS_URL, APPLE_ISSUERS),
        };
        let audience = audience.as_deref().ok_or(ApiError::ProviderDisabled)?;

        let header = decode_header(id_token).map_err(|_| ApiError::InvalidToken)?;
        let kid = header.kid.ok_or(ApiError::InvalidToken)?;

        let jwks = self.key_set(jwks_url).await?;
        let jwk = jwks.find(&kid).ok_or(ApiError::InvalidToken)?;
        let key = DecodingKey::from_jwk(jwk).map_err(|_| ApiError::InvalidToken)?;

        let mut validation = Validation::new(Algorithm::RS256);
        validation.set_audience(&[audience]);
        validation.set_issuer(issuers);

        let claims = decode::<IdTokenClaims>(id_token, &key, &validation)
            .map_err(|e| {
                tracing::debug!(error = %e, provider = provider.as_str(), "id token rejected");
                ApiError::InvalidToken
            })?
            .claims;

        let verified = email_verified(claims.email_verified.as_ref());
        Ok(SocialIdentity {
            provider,
            subject: claims.sub,
            email: claims.email.filter(|_| verified),
            name: claims.name,
        })
    }
}
