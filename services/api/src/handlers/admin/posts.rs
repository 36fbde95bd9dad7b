use axum::extract::{Path, State};
use serde::{Deserialize, Serialize};

use stillwater_core::envelope::{Message, Success};
use stillwater_domain::pagination::Paginated;
use stillwater_domain::post::PostStatus;

use crate::domain::filter::PostFilter;
use crate::domain::types::PostStats;
use crate::error::ApiError;
use crate::handlers::extract::{JsonBody, ListQuery, parse_id};
use crate::handlers::views::PostView;
use crate::middleware::auth::AdminAuth;
use crate::state::AppState;
use crate::usecase::post::{
    DeletePostUseCase, GetPostUseCase, ListPostsUseCase, PostStatsUseCase, SetPostStatusUseCase,
};

#[derive(Serialize)]
pub struct PostBody {
    pub post: PostView,
}

// ── GET /api/admin/posts ─────────────────────────────────────────────────────

pub async fn list_posts(
    _admin: AdminAuth,
    State(state): State<AppState>,
    ListQuery(params): ListQuery,
) -> Result<Success<Paginated<PostView>>, ApiError> {
    let filter = PostFilter::admin(&params)?;
    let page = params.page_request()?;
    let usecase = ListPostsUseCase {
        repo: state.post_repo(),
    };
    let posts = usecase.execute(&filter, page).await?;
    Ok(Success::new(posts.map(PostView::from)))
}

// ── GET /api/admin/posts/stats ───────────────────────────────────────────────

#[derive(Serialize)]
pub struct StatsBody {
    pub total: u64,
    pub pending: u64,
    pub approved: u64,
    pub rejected: u64,
    pub flagged: u64,
}

impl From<PostStats> for StatsBody {
    fn from(s: PostStats) -> Self {
        Self {
            total: s.total,
            pending: s.pending,
            approved: s.approved,
            rejected: s.rejected,
            flagged: s.flagged,
        }
    }
}

pub async fn post_stats(
    _admin: AdminAuth,
    State(state): State<AppState>,
) -> Result<Success<StatsBody>, ApiError> {
    let usecase = PostStatsUseCase {
        repo: state.post_repo(),
    };
    Ok(Success::new(usecase.execute().await?.into()))
}

// ── GET /api/admin/posts/{id} ────────────────────────────────────────────────

pub async fn get_post(
    _admin: AdminAuth,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Success<PostBody>, ApiError> {
    let usecase = GetPostUseCase {
        repo: state.post_repo(),
    };
    let post = usecase.execute(parse_id(&id)?).await?;
    Ok(Success::new(PostBody { post: post.into() }))
}

// ── PATCH /api/admin/posts/{id}/status ───────────────────────────────────────

#[derive(Deserialize)]
pub struct SetStatusRequest {
    pub status: PostStatus,
}

pub async fn set_post_status(
    _admin: AdminAuth,
    State(state): State<AppState>,
    Path(id): Path<String>,
    JsonBody(body): JsonBody<SetStatusRequest>,
) -> Result<Success<PostBody>, ApiError> {
    let usecase = SetPostStatusUseCase {
        repo: state.post_repo(),
    };
    let post = usecase.execute(parse_id(&id)?, body.status).await?;
    Ok(Success::new(PostBody { post: post.into() }))
}

// ── DELETE /api/admin/posts/{id} ─────────────────────────────────────────────

pub async fn delete_post(
    _admin: AdminAuth,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Success<Message>, ApiError> {
    let usecase = DeletePostUseCase {
        repo: state.post_repo(),
    };
    usecase.execute(parse_id(&id)?).await?;
    Ok(Success::new(Message {
        message: "post deleted",
    }))
}
