use chrono::{Duration, Utc};
use rand::RngExt;
use uuid::Uuid;

use crate::domain::repository::{CredentialStore, OneTimeCodeRepository, OtpMailer};
use crate::domain::types::{
    CodePurpose, OTP_LEN, OTP_MAX_ATTEMPTS, OTP_TTL_SECS, OneTimeCode,
};
use crate::error::ApiError;
use crate::usecase::credential::{check_password_strength, hash_password};

fn generate_code() -> String {
    let n: u32 = rand::rng().random_range(0..1_000_000);
    format!("{n:0width$}", width = OTP_LEN)
}

fn not_found(purpose: CodePurpose) -> ApiError {
    match purpose {
        CodePurpose::Admin => ApiError::AdminNotFound,
        CodePurpose::User => ApiError::UserNotFound,
    }
}

// ── Request a reset code ─────────────────────────────────────────────────────

pub struct RequestPasswordResetUseCase<S, C, M>
where
    S: CredentialStore,
    C: OneTimeCodeRepository,
    M: OtpMailer,
{
    pub store: S,
    pub codes: C,
    pub mailer: M,
}

impl<S, C, M> RequestPasswordResetUseCase<S, C, M>
where
    S: CredentialStore,
    C: OneTimeCodeRepository,
    M: OtpMailer,
{
    pub async fn execute(&self, email: &str) -> Result<(), ApiError> {
        let purpose = self.store.purpose();
        let email = email.trim().to_lowercase();
        let credential = self
            .store
            .find_credential(&email)
            .await?
            .ok_or_else(|| not_found(purpose))?;

        let now = Utc::now();
        let code = OneTimeCode {
            id: Uuid::new_v4(),
            email: credential.email,
            code: generate_code(),
            purpose,
            expires_at: now + Duration::seconds(OTP_TTL_SECS),
            consumed: false,
            attempts: 0,
            created_at: now,
        };
        self.codes.replace(&code).await?;

        if !self.mailer.send(&code.email, &code.code, purpose).await? {
            return Err(ApiError::DeliveryFailed);
        }
        tracing::info!(purpose = purpose.as_str(), "password reset code issued");
        Ok(())
    }
}

// ── Redeem a reset code ──────────────────────────────────────────────────────

pub struct ResetPasswordInput {
    pub email: String,
    pub code: String,
    pub new_password: String,
}

pub struct ResetPasswordUseCase<S, C>
where
    S: CredentialStore,
    C: OneTimeCodeRepository,
{
    pub store: S,
    pub codes: C,
}

impl<S, C> ResetPasswordUseCase<S, C>
where
    S: CredentialStore,
    C: OneTimeCodeRepository,
{
    pub async fn execute(&self, input: ResetPasswordInput) -> Result<(), ApiError> {
        check_password_strength(&input.new_password)?;

        let purpose = self.store.purpose();
        let email = input.email.trim().to_lowercase();
        let now = Utc::now();
        let Some(code) = self
            .codes
            .find_valid(&email, purpose, input.code.trim(), now)
            .await?
        else {
            if self
                .codes
                .record_miss(&email, purpose, OTP_MAX_ATTEMPTS, now)
                .await?
            {
                tracing::warn!(
                    purpose = purpose.as_str(),
                    "reset code revoked after repeated misses"
                );
            }
            return Err(ApiError::InvalidCode);
        };

        // Losing the race to a concurrent redemption counts as an invalid code.
        if !self.codes.consume(code.id).await? {
            return Err(ApiError::InvalidCode);
        }

        let credential = self
            .store
            .find_credential(&email)
            .await?
            .ok_or_else(|| not_found(purpose))?;
        let hash = hash_password(&input.new_password)?;
        if !self.store.set_password_hash(credential.id, &hash).await? {
            return Err(not_found(purpose));
        }
        Ok(())
    }
}
