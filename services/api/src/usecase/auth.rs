use anyhow::Context as _;
use uuid::Uuid;

use stillwater_auth_types::token::{APP_TOKEN_TTL, SignedToken, TokenCodec, admin_ttl};

use crate::domain::repository::{AdminRepository, AppUserRepository, CredentialStore};
use crate::domain::types::{Admin, AppUser, NewAdmin, NewAppUser};
use crate::error::ApiError;
use crate::usecase::credential::{
    authenticate, check_password_strength, hash_password, normalize_email, verify_password,
};

/// A freshly signed admin token.
pub struct AdminSession {
    pub admin: Admin,
    pub token: SignedToken,
    pub ttl_secs: u64,
}

/// A freshly signed end-user token.
pub struct UserSession {
    pub user: AppUser,
    pub token: SignedToken,
}

pub(crate) fn sign_user_session(codec: &TokenCodec, user: AppUser) -> Result<UserSession, ApiError> {
    if !user.is_active {
        return Err(ApiError::AccountDisabled);
    }
    let token = codec
        .sign(user.id, APP_TOKEN_TTL)
        .context("sign app token")?;
    Ok(UserSession { user, token })
}

fn clean_name(name: Option<String>) -> Option<String> {
    name.map(|n| n.trim().to_owned()).filter(|n| !n.is_empty())
}

// ── Admin registration ───────────────────────────────────────────────────────

pub struct RegisterAdminInput {
    pub email: String,
    pub password: String,
    pub name: Option<String>,
}

pub struct RegisterAdminUseCase<A: AdminRepository> {
    pub admins: A,
}

impl<A: AdminRepository> RegisterAdminUseCase<A> {
    /// Registration is open only while no admin exists; afterwards an
    /// authenticated admin must create further accounts.
    pub async fn execute(
        &self,
        input: RegisterAdminInput,
        caller: Option<&Admin>,
    ) -> Result<Admin, ApiError> {
        if caller.is_none() && self.admins.count().await? > 0 {
            return Err(ApiError::Unauthenticated);
        }

        let email = normalize_email(&input.email)?;
        check_password_strength(&input.password)?;

        if self.admins.find_by_email(&email).await?.is_some() {
            return Err(ApiError::EmailTaken);
        }

        let admin = NewAdmin {
            id: Uuid::now_v7(),
            email,
            password_hash: hash_password(&input.password)?,
            name: clean_name(input.name),
        };
        self.admins.create(&admin).await
    }
}

// ── Admin login ──────────────────────────────────────────────────────────────

pub struct AdminLoginInput {
    pub email: String,
    pub password: String,
    pub remember_me: bool,
}

pub struct AdminLoginUseCase<A: AdminRepository + CredentialStore> {
    pub admins: A,
    pub codec: TokenCodec,
}

impl<A: AdminRepository + CredentialStore> AdminLoginUseCase<A> {
    pub async fn execute(&self, input: AdminLoginInput) -> Result<AdminSession, ApiError> {
        let id = authenticate(&self.admins, &input.email, &input.password).await?;
        let admin = self
            .admins
            .find_by_id(id)
            .await?
            .ok_or(ApiError::AdminNotFound)?;

        let ttl_secs = admin_ttl(input.remember_me);
        let token = self
            .codec
            .sign(admin.id, ttl_secs)
            .context("sign admin token")?;
        Ok(AdminSession {
            admin,
            token,
            ttl_secs,
        })
    }
}

// ── Admin profile ────────────────────────────────────────────────────────────

#[derive(Default)]
pub struct UpdateAdminInput {
    pub name: Option<Option<String>>,
    pub email: Option<String>,
    pub current_password: Option<String>,
    pub new_password: Option<String>,
}

pub struct UpdateAdminUseCase<A: AdminRepository + CredentialStore> {
    pub admins: A,
}

impl<A: AdminRepository + CredentialStore> UpdateAdminUseCase<A> {
    pub async fn execute(&self, admin: &Admin, input: UpdateAdminInput) -> Result<Admin, ApiError> {
        if let Some(new_password) = input.new_password.as_deref() {
            let current = input
                .current_password
                .as_deref()
                .ok_or_else(|| ApiError::validation("current_password is required"))?;
            check_password_strength(new_password)?;

            let credential = self
                .admins
                .find_credential(&admin.email)
                .await?
                .ok_or(ApiError::AdminNotFound)?;
            let matches = credential
                .password_hash
                .as_deref()
                .is_some_and(|hash| verify_password(current, hash));
            if !matches {
                return Err(ApiError::InvalidCredentials);
            }
            self.admins
                .set_password_hash(admin.id, &hash_password(new_password)?)
                .await?;
        }

        let email = match input.email.as_deref() {
            Some(raw) => {
                let email = normalize_email(raw)?;
                if email != admin.email {
                    if let Some(other) = self.admins.find_by_email(&email).await? {
                        if other.id != admin.id {
                            return Err(ApiError::EmailTaken);
                        }
                    }
                }
                Some(email)
            }
            None => None,
        };
        let name = input.name.map(clean_name);

        self.admins
            .update_profile(admin.id, name, email)
            .await?
            .ok_or(ApiError::AdminNotFound)
    }
}

// ── App registration ─────────────────────────────────────────────────────────

pub struct RegisterUserInput {
    pub email: String,
    pub password: String,
    pub name: Option<String>,
}

pub struct RegisterUserUseCase<U: AppUserRepository> {
    pub users: U,
    pub codec: TokenCodec,
}

impl<U: AppUserRepository> RegisterUserUseCase<U> {
    pub async fn execute(&self, input: RegisterUserInput) -> Result<UserSession, ApiError> {
        let email = normalize_email(&input.email)?;
        check_password_strength(&input.password)?;

        if self.users.find_by_email(&email).await?.is_some() {
            return Err(ApiError::EmailTaken);
        }

        let user = self
            .users
            .create(&NewAppUser {
                id: Uuid::now_v7(),
                name: clean_name(input.name),
                email,
                password_hash: Some(hash_password(&input.password)?),
                google_id: None,
                apple_id: None,
            })
            .await?;
        sign_user_session(&self.codec, user)
    }
}

// ── App login ────────────────────────────────────────────────────────────────

pub struct UserLoginUseCase<U: AppUserRepository + CredentialStore> {
    pub users: U,
    pub codec: TokenCodec,
}

impl<U: AppUserRepository + CredentialStore> UserLoginUseCase<U> {
    pub async fn execute(&self, email: &str, password: &str) -> Result<UserSession, ApiError> {
        let id = authenticate(&self.users, email, password).await?;
        let user = self
            .users
            .find_by_id(id)
            .await?
            .ok_or(ApiError::UserNotFound)?;
        sign_user_session(&self.codec, user)
    }
}
