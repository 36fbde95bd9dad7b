use anyhow::anyhow;
use argon2::password_hash::SaltString;
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use rand::RngExt;
use uuid::Uuid;

use crate::domain::repository::CredentialStore;
use crate::domain::types::MIN_PASSWORD_LEN;
use crate::error::ApiError;

/// Hash a password with argon2id and a random 16-byte salt (PHC string).
pub fn hash_password(password: &str) -> Result<String, ApiError> {
    let salt_bytes: [u8; 16] = rand::rng().random();
    let salt = SaltString::encode_b64(&salt_bytes).map_err(|e| anyhow!("encode salt: {e}"))?;
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow!("hash password: {e}"))?;
    Ok(hash.to_string())
}

/// `false` for a wrong password and for a malformed stored hash.
pub fn verify_password(password: &str, hash: &str) -> bool {
    PasswordHash::new(hash).is_ok_and(|parsed| {
        Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok()
    })
}

pub fn normalize_email(email: &str) -> Result<String, ApiError> {
    let email = email.trim().to_lowercase();
    let valid = email
        .split_once('@')
        .is_some_and(|(local, domain)| !local.is_empty() && domain.contains('.'));
    if !valid {
        return Err(ApiError::validation("email is invalid"));
    }
    Ok(email)
}

pub fn check_password_strength(password: &str) -> Result<(), ApiError> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(ApiError::validation(format!(
            "password must be at least {MIN_PASSWORD_LEN} characters"
        )));
    }
    Ok(())
}

/// Check an email/password pair and return the principal id.
///
/// Unknown email, wrong password and password-less accounts all fail with
/// the same `InvalidCredentials`.
pub async fn authenticate<S: CredentialStore>(
    store: &S,
    email: &str,
    password: &str,
) -> Result<Uuid, ApiError> {
    let email = email.trim().to_lowercase();
    let credential = store
        .find_credential(&email)
        .await?
        .ok_or(ApiError::InvalidCredentials)?;
    match credential.password_hash.as_deref() {
        Some(hash) if verify_password(password, hash) => Ok(credential.id),
        _ => Err(ApiError::InvalidCredentials),
    }
}
