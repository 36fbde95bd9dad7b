use axum::extract::{Path, State};
use axum::response::IntoResponse;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use stillwater_core::envelope::{Message, Success};
use stillwater_core::serde::double_option;
use stillwater_domain::content::ContentKind;
use stillwater_domain::pagination::Paginated;

use crate::domain::filter::ContentFilter;
use crate::domain::types::ContentPatch;
use crate::error::ApiError;
use crate::handlers::extract::{JsonBody, ListQuery, parse_id};
use crate::handlers::views::ContentView;
use crate::middleware::auth::{AdminAuth, AnyAuth};
use crate::state::AppState;
use crate::usecase::content::{
    CreateContentInput, CreateContentUseCase, DeleteContentUseCase, GetContentUseCase,
    ListContentUseCase, UpdateContentUseCase,
};

/// Resolve the `{kind}` path segment, e.g. `weekly-affirmations`.
pub fn parse_kind(slug: &str) -> Result<ContentKind, ApiError> {
    ContentKind::from_slug(slug).ok_or(ApiError::ContentNotFound)
}

#[derive(Serialize)]
pub struct ContentBody {
    pub item: ContentView,
}

// ── GET /api/admin/content/{kind} ────────────────────────────────────────────

pub async fn list_content(
    _principal: AnyAuth,
    State(state): State<AppState>,
    Path(kind): Path<String>,
    ListQuery(params): ListQuery,
) -> Result<Success<Paginated<ContentView>>, ApiError> {
    let filter = ContentFilter::admin(parse_kind(&kind)?, &params)?;
    let page = params.page_request()?;
    let usecase = ListContentUseCase {
        repo: state.content_repo(),
    };
    let items = usecase.execute(&filter, page).await?;
    Ok(Success::new(items.map(ContentView::from)))
}

// ── POST /api/admin/content/{kind} ───────────────────────────────────────────

#[derive(Deserialize)]
pub struct CreateContentRequest {
    pub title: Option<String>,
    pub body: String,
    pub author: Option<String>,
    pub media_url: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub scheduled_at: Option<DateTime<Utc>>,
    pub is_active: Option<bool>,
    pub is_archived: Option<bool>,
    pub is_published: Option<bool>,
    pub order_index: Option<i32>,
}

pub async fn create_content(
    _admin: AdminAuth,
    State(state): State<AppState>,
    Path(kind): Path<String>,
    JsonBody(body): JsonBody<CreateContentRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let kind = parse_kind(&kind)?;
    let usecase = CreateContentUseCase {
        repo: state.content_repo(),
    };
    let item = usecase
        .execute(
            kind,
            CreateContentInput {
                title: body.title,
                body: body.body,
                author: body.author,
                media_url: body.media_url,
                tags: body.tags,
                scheduled_at: body.scheduled_at,
                is_active: body.is_active,
                is_archived: body.is_archived,
                is_published: body.is_published,
                order_index: body.order_index,
            },
        )
        .await?;
    Ok(Success::created(ContentBody { item: item.into() }))
}

// ── GET /api/admin/content/{kind}/{id} ───────────────────────────────────────

pub async fn get_content(
    _admin: AdminAuth,
    State(state): State<AppState>,
    Path((kind, id)): Path<(String, String)>,
) -> Result<Success<ContentBody>, ApiError> {
    let usecase = GetContentUseCase {
        repo: state.content_repo(),
    };
    let item = usecase.execute(parse_kind(&kind)?, parse_id(&id)?).await?;
    Ok(Success::new(ContentBody { item: item.into() }))
}

// ── PATCH /api/admin/content/{kind}/{id} ─────────────────────────────────────

#[derive(Deserialize)]
pub struct UpdateContentRequest {
    #[serde(default, deserialize_with = "double_option")]
    pub title: Option<Option<String>>,
    pub body: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub author: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub media_url: Option<Option<String>>,
    pub tags: Option<Vec<String>>,
    #[serde(default, deserialize_with = "double_option")]
    pub scheduled_at: Option<Option<DateTime<Utc>>>,
    pub is_active: Option<bool>,
    pub is_archived: Option<bool>,
    pub is_published: Option<bool>,
    pub order_index: Option<i32>,
}

pub async fn update_content(
    _admin: AdminAuth,
    State(state): State<AppState>,
    Path((kind, id)): Path<(String, String)>,
    JsonBody(body): JsonBody<UpdateContentRequest>,
) -> Result<Success<ContentBody>, ApiError> {
    let usecase = UpdateContentUseCase {
        repo: state.content_repo(),
    };
    let item = usecase
        .execute(
            parse_kind(&kind)?,
            parse_id(&id)?,
            ContentPatch {
                title: body.title,
                body: body.body,
                author: body.author,
                media_url: body.media_url,
                tags: body.tags,
                scheduled_at: body.scheduled_at,
                is_active: body.is_active,
                is_archived: body.is_archived,
                is_published: body.is_published,
                order_index: body.order_index,
            },
        )
        .await?;
    Ok(Success::new(ContentBody { item: item.into() }))
}

// ── DELETE /api/admin/content/{kind}/{id} ────────────────────────────────────

pub async fn delete_content(
    _admin: AdminAuth,
    State(state): State<AppState>,
    Path((kind, id)): Path<(String, String)>,
) -> Result<Success<Message>, ApiError> {
    let usecase = DeleteContentUseCase {
        repo: state.content_repo(),
    };
    usecase.execute(parse_kind(&kind)?, parse_id(&id)?).await?;
    Ok(Success::new(Message {
        message: "content deleted",
    }))
}
