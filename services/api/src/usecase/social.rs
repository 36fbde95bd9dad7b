use uuid::Uuid;

use stillwater_auth_types::token::TokenCodec;

use crate::domain::repository::{AppUserRepository, IdTokenVerifier};
use crate::domain::types::{NewAppUser, SocialProvider};
use crate::error::ApiError;
use crate::usecase::auth::{UserSession, sign_user_session};

pub struct SocialLoginInput {
    pub provider: SocialProvider,
    pub id_token: String,
    /// Apple only sends the user's name to the app on first sign-in.
    pub name: Option<String>,
}

pub struct SocialLoginUseCase<U: AppUserRepository, V: IdTokenVerifier> {
    pub users: U,
    pub verifier: V,
    pub codec: TokenCodec,
}

impl<U: AppUserRepository, V: IdTokenVerifier> SocialLoginUseCase<U, V> {
    /// Sign in by provider id, else link the provider to the account with the
    /// same email, else create a password-less account.
    pub async fn execute(&self, input: SocialLoginInput) -> Result<UserSession, ApiError> {
        let identity = self
            .verifier
            .verify(input.provider, &input.id_token)
            .await?;

        if let Some(user) = self
            .users
            .find_by_provider(identity.provider, &identity.subject)
            .await?
        {
            return sign_user_session(&self.codec, user);
        }

        let email = identity
            .email
            .as_deref()
            .map(|e| e.trim().to_lowercase())
            .filter(|e| !e.is_empty())
            .ok_or_else(|| ApiError::validation("id token carries no email"))?;

        if let Some(existing) = self.users.find_by_email(&email).await? {
            let user = self
                .users
                .link_provider(existing.id, &identity)
                .await?
                .ok_or(ApiError::UserNotFound)?;
            tracing::info!(user_id = %user.id, provider = identity.provider.as_str(), "provider linked");
            return sign_user_session(&self.codec, user);
        }

        let name = input
            .name
            .or(identity.name.clone())
            .map(|n| n.trim().to_owned())
            .filter(|n| !n.is_empty());
        let (google_id, apple_id) = match identity.provider {
            SocialProvider::Google => (Some(identity.subject.clone()), None),
            SocialProvider::Apple => (None, Some(identity.subject.clone())),
        };
        let user = self
            .users
            .create(&NewAppUser {
                id: Uuid::now_v7(),
                name,
                email,
                password_hash: None,
                google_id,
                apple_id,
            })
            .await?;
        sign_user_session(&self.codec, user)
    }
}
