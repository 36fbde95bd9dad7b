use axum::extract::{Path, State};
use serde::{Deserialize, Serialize};

use stillwater_core::envelope::Success;
use stillwater_domain::pagination::Paginated;

use crate::domain::filter::UserFilter;
use crate::error::ApiError;
use crate::handlers::extract::{JsonBody, ListQuery, parse_id};
use crate::handlers::views::AppUserView;
use crate::middleware::auth::AdminAuth;
use crate::state::AppState;
use crate::usecase::user::{GetUserUseCase, ListUsersUseCase, SetUserActiveUseCase};

#[derive(Serialize)]
pub struct UserBody {
    pub user: AppUserView,
}

// ── GET /api/admin/users ─────────────────────────────────────────────────────

pub async fn list_users(
    _admin: AdminAuth,
    State(state): State<AppState>,
    ListQuery(params): ListQuery,
) -> Result<Success<Paginated<AppUserView>>, ApiError> {
    let filter = UserFilter::admin(&params)?;
    let page = params.page_request()?;
    let usecase = ListUsersUseCase {
        repo: state.user_repo(),
    };
    let users = usecase.execute(&filter, page).await?;
    Ok(Success::new(users.map(AppUserView::from)))
}

// ── GET /api/admin/users/{id} ────────────────────────────────────────────────

pub async fn get_user(
    _admin: AdminAuth,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Success<UserBody>, ApiError> {
    let usecase = GetUserUseCase {
        repo: state.user_repo(),
    };
    let user = usecase.execute(parse_id(&id)?).await?;
    Ok(Success::new(UserBody { user: user.into() }))
}

// ── PATCH /api/admin/users/{id} ──────────────────────────────────────────────

#[derive(Deserialize)]
pub struct SetActiveRequest {
    pub is_active: bool,
}

pub async fn set_user_active(
    AdminAuth(admin): AdminAuth,
    State(state): State<AppState>,
    Path(id): Path<String>,
    JsonBody(body): JsonBody<SetActiveRequest>,
) -> Result<Success<UserBody>, ApiError> {
    let usecase = SetUserActiveUseCase {
        repo: state.user_repo(),
    };
    let user = usecase.execute(parse_id(&id)?, body.is_active).await?;
    tracing::debug!(admin_id = %admin.id, user_id = %user.id, "user updated by admin");
    Ok(Success::new(UserBody { user: user.into() }))
}
