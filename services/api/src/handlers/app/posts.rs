use axum::extract::{Path, State};
use axum::response::IntoResponse;
use serde::{Deserialize, Serialize};

use stillwater_core::envelope::{Message, Success};
use stillwater_domain::pagination::Paginated;
use stillwater_domain::post::Visibility;

use crate::domain::filter::PostFilter;
use crate::error::ApiError;
use crate::handlers::extract::{JsonBody, ListQuery, parse_id};
use crate::handlers::views::PostView;
use crate::middleware::auth::UserAuth;
use crate::state::AppState;
use crate::usecase::post::{
    CreatePostInput, CreatePostUseCase, DeletePostUseCase, FlagPostUseCase,
    GetVisiblePostUseCase, ListPostsUseCase,
};

#[derive(Serialize)]
pub struct PostBody {
    pub post: PostView,
}

// ── GET /api/app/posts ───────────────────────────────────────────────────────

pub async fn list_posts(
    UserAuth(user): UserAuth,
    State(state): State<AppState>,
    ListQuery(params): ListQuery,
) -> Result<Success<Paginated<PostView>>, ApiError> {
    let filter = PostFilter::app(&params, user.id)?;
    let page = params.page_request()?;
    let usecase = ListPostsUseCase {
        repo: state.post_repo(),
    };
    let posts = usecase.execute(&filter, page).await?;
    Ok(Success::new(posts.map(PostView::from)))
}

// ── POST /api/app/posts ──────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct CreatePostRequest {
    pub title: String,
    pub content: String,
    pub image_url: Option<String>,
    pub visibility: Option<Visibility>,
}

pub async fn create_post(
    UserAuth(user): UserAuth,
    State(state): State<AppState>,
    JsonBody(body): JsonBody<CreatePostRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let usecase = CreatePostUseCase {
        repo: state.post_repo(),
    };
    let post = usecase
        .execute(
            user.id,
            CreatePostInput {
                title: body.title,
                content: body.content,
                image_url: body.image_url,
                visibility: body.visibility,
            },
        )
        .await?;
    Ok(Success::created(PostBody { post: post.into() }))
}

// ── GET /api/app/posts/{id} ──────────────────────────────────────────────────

pub async fn get_post(
    UserAuth(user): UserAuth,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Success<PostBody>, ApiError> {
    let usecase = GetVisiblePostUseCase {
        repo: state.post_repo(),
    };
    let post = usecase.execute(parse_id(&id)?, user.id).await?;
    Ok(Success::new(PostBody { post: post.into() }))
}

// ── DELETE /api/app/posts/{id} ───────────────────────────────────────────────

pub async fn delete_post(
    UserAuth(user): UserAuth,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Success<Message>, ApiError> {
    let usecase = DeletePostUseCase {
        repo: state.post_repo(),
    };
    usecase.execute_as_owner(parse_id(&id)?, user.id).await?;
    Ok(Success::new(Message {
        message: "post deleted",
    }))
}

// ── POST /api/app/posts/{id}/flag ────────────────────────────────────────────

#[derive(Serialize)]
pub struct FlagBody {
    pub message: &'static str,
    pub flag_count: i32,
}

pub async fn flag_post(
    UserAuth(user): UserAuth,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Success<FlagBody>, ApiError> {
    let post_id = parse_id(&id)?;
    let usecase = FlagPostUseCase {
        repo: state.post_repo(),
    };
    let flag_count = usecase.execute(post_id, user.id).await?;
    tracing::info!(post_id = %post_id, user_id = %user.id, flag_count, "post flagged");
    Ok(Success::new(FlagBody {
        message: "post flagged",
        flag_count,
    }))
}
