use axum::extract::State;
use axum::response::IntoResponse;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use stillwater_core::envelope::{Message, Success};
use stillwater_core::serde::to_rfc3339_ms;

use crate::domain::types::SocialProvider;
use crate::error::ApiError;
use crate::handlers::extract::JsonBody;
use crate::handlers::views::AppUserView;
use crate::state::AppState;
use crate::usecase::auth::{RegisterUserInput, RegisterUserUseCase, UserLoginUseCase, UserSession};
use crate::usecase::password_reset::{
    RequestPasswordResetUseCase, ResetPasswordInput, ResetPasswordUseCase,
};
use crate::usecase::social::{SocialLoginInput, SocialLoginUseCase};

#[derive(Serialize)]
pub struct SessionBody {
    pub user: AppUserView,
    pub token: String,
    #[serde(serialize_with = "to_rfc3339_ms")]
    pub expires_at: DateTime<Utc>,
}

impl From<UserSession> for SessionBody {
    fn from(s: UserSession) -> Self {
        Self {
            user: s.user.into(),
            token: s.token.token,
            expires_at: s.token.expires_at,
        }
    }
}

// ── POST /api/app/auth/register ──────────────────────────────────────────────

#[derive(Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub name: Option<String>,
}

pub async fn register(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<RegisterRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let usecase = RegisterUserUseCase {
        users: state.user_repo(),
        codec: state.codec.clone(),
    };
    let session = usecase
        .execute(RegisterUserInput {
            email: body.email,
            password: body.password,
            name: body.name,
        })
        .await?;
    tracing::info!(user_id = %session.user.id, "app user registered");
    Ok(Success::created(SessionBody::from(session)))
}

// ── POST /api/app/auth/login ─────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

pub async fn login(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<LoginRequest>,
) -> Result<Success<SessionBody>, ApiError> {
    let usecase = UserLoginUseCase {
        users: state.user_repo(),
        codec: state.codec.clone(),
    };
    let session = usecase.execute(&body.email, &body.password).await?;
    Ok(Success::new(session.into()))
}

// ── POST /api/app/auth/social ────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct SocialRequest {
    pub provider: String,
    pub id_token: String,
    pub name: Option<String>,
}

pub async fn social_login(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<SocialRequest>,
) -> Result<Success<SessionBody>, ApiError> {
    let provider = SocialProvider::parse(&body.provider)
        .ok_or_else(|| ApiError::validation("provider must be google or apple"))?;
    let usecase = SocialLoginUseCase {
        users: state.user_repo(),
        verifier: state.verifier.clone(),
        codec: state.codec.clone(),
    };
    let session = usecase
        .execute(SocialLoginInput {
            provider,
            id_token: body.id_token,
            name: body.name,
        })
        .await?;
    Ok(Success::new(session.into()))
}

// ── POST /api/app/auth/forgot-password ───────────────────────────────────────

#[derive(Deserialize)]
pub struct ForgotPasswordRequest {
    pub email: String,
}

pub async fn forgot_password(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<ForgotPasswordRequest>,
) -> Result<Success<Message>, ApiError> {
    let usecase = RequestPasswordResetUseCase {
        store: state.user_repo(),
        codes: state.code_repo(),
        mailer: state.otp_mailer(),
    };
    usecase.execute(&body.email).await?;
    Ok(Success::new(Message {
        message: "reset code sent",
    }))
}

// ── POST /api/app/auth/reset-password ────────────────────────────────────────

#[derive(Deserialize)]
pub struct ResetPasswordRequest {
    pub email: String,
    pub code: String,
    pub new_password: String,
}

pub async fn reset_password(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<ResetPasswordRequest>,
) -> Result<Success<Message>, ApiError> {
    let usecase = ResetPasswordUseCase {
        store: state.user_repo(),
        codes: state.code_repo(),
    };
    usecase
        .execute(ResetPasswordInput {
            email: body.email,
            code: body.code,
            new_password: body.new_password,
        })
        .await?;
    Ok(Success::new(Message {
        message: "password updated",
    }))
}
