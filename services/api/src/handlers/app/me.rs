use axum::extract::State;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use stillwater_core::envelope::Success;
use stillwater_core::serde::double_option;

use crate::domain::types::AppUserPatch;
use crate::error::ApiError;
use crate::handlers::extract::JsonBody;
use crate::handlers::views::AppUserView;
use crate::middleware::auth::UserAuth;
use crate::state::AppState;
use crate::usecase::user::UpdateProfileUseCase;

#[derive(Serialize)]
pub struct MeBody {
    pub user: AppUserView,
}

// ── GET /api/app/me ──────────────────────────────────────────────────────────

pub async fn get_me(UserAuth(user): UserAuth) -> Success<MeBody> {
    Success::new(MeBody { user: user.into() })
}

// ── PATCH /api/app/me ────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct UpdateMeRequest {
    #[serde(default, deserialize_with = "double_option")]
    pub name: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub device_sync: Option<Option<Value>>,
}

pub async fn update_me(
    UserAuth(user): UserAuth,
    State(state): State<AppState>,
    JsonBody(body): JsonBody<UpdateMeRequest>,
) -> Result<Success<MeBody>, ApiError> {
    let usecase = UpdateProfileUseCase {
        repo: state.user_repo(),
    };
    let user = usecase
        .execute(
            user.id,
            AppUserPatch {
                name: body.name,
                device_sync: body.device_sync,
            },
        )
        .await?;
    Ok(Success::new(MeBody { user: user.into() }))
}
