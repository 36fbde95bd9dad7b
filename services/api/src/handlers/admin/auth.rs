use axum::extract::State;
use axum::response::IntoResponse;
use axum_extra::extract::CookieJar;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use stillwater_auth_types::cookie::{clear_admin_token_cookie, set_admin_token_cookie};
use stillwater_core::envelope::{Message, Success};
use stillwater_core::serde::{double_option, to_rfc3339_ms};

use crate::error::ApiError;
use crate::handlers::extract::JsonBody;
use crate::handlers::views::AdminView;
use crate::middleware::auth::{AdminAuth, MaybeAdmin};
use crate::state::AppState;
use crate::usecase::auth::{
    AdminLoginInput, AdminLoginUseCase, RegisterAdminInput, RegisterAdminUseCase,
    UpdateAdminInput, UpdateAdminUseCase,
};
use crate::usecase::password_reset::{
    RequestPasswordResetUseCase, ResetPasswordInput, ResetPasswordUseCase,
};

#[derive(Serialize)]
pub struct AdminBody {
    pub admin: AdminView,
}

// ── POST /api/admin/auth/register ────────────────────────────────────────────

#[derive(Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub name: Option<String>,
}

pub async fn register(
    MaybeAdmin(caller): MaybeAdmin,
    State(state): State<AppState>,
    JsonBody(body): JsonBody<RegisterRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let usecase = RegisterAdminUseCase {
        admins: state.admin_repo(),
    };
    let admin = usecase
        .execute(
            RegisterAdminInput {
                email: body.email,
                password: body.password,
                name: body.name,
            },
            caller.as_ref(),
        )
        .await?;
    tracing::info!(admin_id = %admin.id, "admin registered");
    Ok(Success::created(AdminBody {
        admin: admin.into(),
    }))
}

// ── POST /api/admin/auth/login ───────────────────────────────────────────────

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub remember_me: bool,
}

#[derive(Serialize)]
pub struct LoginResponse {
    pub admin: AdminView,
    pub token: String,
    #[serde(serialize_with = "to_rfc3339_ms")]
    pub expires_at: DateTime<Utc>,
}

pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    JsonBody(body): JsonBody<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let usecase = AdminLoginUseCase {
        admins: state.admin_repo(),
        codec: state.codec.clone(),
    };
    let session = usecase
        .execute(AdminLoginInput {
            email: body.email,
            password: body.password,
            remember_me: body.remember_me,
        })
        .await?;

    let jar = set_admin_token_cookie(
        jar,
        session.token.token.clone(),
        &state.cookies,
        session.ttl_secs,
    );
    Ok((
        jar,
        Success::new(LoginResponse {
            admin: session.admin.into(),
            token: session.token.token,
            expires_at: session.token.expires_at,
        }),
    ))
}

// ── POST /api/admin/auth/logout ──────────────────────────────────────────────

pub async fn logout(State(state): State<AppState>, jar: CookieJar) -> impl IntoResponse {
    let jar = clear_admin_token_cookie(jar, &state.cookies);
    (jar, Success::new(Message { message: "logged out" }))
}

// ── GET /api/admin/auth/me ───────────────────────────────────────────────────

pub async fn get_me(AdminAuth(admin): AdminAuth) -> Success<AdminBody> {
    Success::new(AdminBody {
        admin: admin.into(),
    })
}

// ── PATCH /api/admin/auth/me ─────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct UpdateMeRequest {
    #[serde(default, deserialize_with = "double_option")]
    pub name: Option<Option<String>>,
    pub email: Option<String>,
    pub current_password: Option<String>,
    pub new_password: Option<String>,
}

pub async fn update_me(
    AdminAuth(admin): AdminAuth,
    State(state): State<AppState>,
    JsonBody(body): JsonBody<UpdateMeRequest>,
) -> Result<Success<AdminBody>, ApiError> {
    let usecase = UpdateAdminUseCase {
        admins: state.admin_repo(),
    };
    let admin = usecase
        .execute(
            &admin,
            UpdateAdminInput {
                name: body.name,
                email: body.email,
                current_password: body.current_password,
                new_password: body.new_password,
            },
        )
        .await?;
    Ok(Success::new(AdminBody {
        admin: admin.into(),
    }))
}

// ── POST /api/admin/auth/forgot-password ─────────────────────────────────────

#[derive(Deserialize)]
pub struct ForgotPasswordRequest {
    pub email: String,
}

pub async fn forgot_password(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<ForgotPasswordRequest>,
) -> Result<Success<Message>, ApiError> {
    let usecase = RequestPasswordResetUseCase {
        store: state.admin_repo(),
        codes: state.code_repo(),
        mailer: state.otp_mailer(),
    };
    usecase.execute(&body.email).await?;
    Ok(Success::new(Message {
        message: "reset code sent",
    }))
}

// ── POST /api/admin/auth/reset-password ──────────────────────────────────────

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
        store: state.admin_repo(),
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
