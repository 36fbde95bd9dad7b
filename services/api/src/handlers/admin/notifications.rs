use axum::extract::{Path, State};
use axum::response::IntoResponse;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use stillwater_core::envelope::{Message, Success};
use stillwater_core::serde::double_option;
use stillwater_domain::notification::NotificationTarget;
use stillwater_domain::pagination::Paginated;

use crate::domain::filter::NotificationFilter;
use crate::domain::types::NotificationPatch;
use crate::error::ApiError;
use crate::handlers::extract::{JsonBody, ListQuery, parse_id};
use crate::handlers::views::NotificationView;
use crate::middleware::auth::AdminAuth;
use crate::state::AppState;
use crate::usecase::notification::{
    CreateNotificationInput, CreateNotificationUseCase, DeleteNotificationUseCase,
    GetNotificationUseCase, ListNotificationsUseCase, SendNotificationUseCase,
    UpdateNotificationUseCase,
};

#[derive(Serialize)]
pub struct NotificationBody {
    pub notification: NotificationView,
}

// ── GET /api/admin/notifications ─────────────────────────────────────────────

pub async fn list_notifications(
    _admin: AdminAuth,
    State(state): State<AppState>,
    ListQuery(params): ListQuery,
) -> Result<Success<Paginated<NotificationView>>, ApiError> {
    let filter = NotificationFilter::admin(&params)?;
    let page = params.page_request()?;
    let usecase = ListNotificationsUseCase {
        repo: state.notification_repo(),
    };
    let notifications = usecase.execute(&filter, page).await?;
    Ok(Success::new(notifications.map(NotificationView::from)))
}

// ── POST /api/admin/notifications ────────────────────────────────────────────

#[derive(Deserialize)]
pub struct CreateNotificationRequest {
    pub title: String,
    pub message: String,
    #[serde(default = "default_target")]
    pub target: NotificationTarget,
    #[serde(default)]
    pub target_user_ids: Vec<Uuid>,
    pub scheduled_at: Option<DateTime<Utc>>,
}

fn default_target() -> NotificationTarget {
    NotificationTarget::All
}

pub async fn create_notification(
    AdminAuth(admin): AdminAuth,
    State(state): State<AppState>,
    JsonBody(body): JsonBody<CreateNotificationRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let usecase = CreateNotificationUseCase {
        repo: state.notification_repo(),
    };
    let notification = usecase
        .execute(CreateNotificationInput {
            title: body.title,
            message: body.message,
            target: body.target,
            target_user_ids: body.target_user_ids,
            scheduled_at: body.scheduled_at,
        })
        .await?;
    tracing::info!(
        admin_id = %admin.id,
        notification_id = %notification.id,
        status = notification.status.as_str(),
        "notification created"
    );
    Ok(Success::created(NotificationBody {
        notification: notification.into(),
    }))
}

// ── GET /api/admin/notifications/{id} ────────────────────────────────────────

pub async fn get_notification(
    _admin: AdminAuth,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Success<NotificationBody>, ApiError> {
    let usecase = GetNotificationUseCase {
        repo: state.notification_repo(),
    };
    let notification = usecase.execute(parse_id(&id)?).await?;
    Ok(Success::new(NotificationBody {
        notification: notification.into(),
    }))
}

// ── PATCH /api/admin/notifications/{id} ──────────────────────────────────────

#[derive(Deserialize)]
pub struct UpdateNotificationRequest {
    pub title: Option<String>,
    pub message: Option<String>,
    pub target: Option<NotificationTarget>,
    pub target_user_ids: Option<Vec<Uuid>>,
    #[serde(default, deserialize_with = "double_option")]
    pub scheduled_at: Option<Option<DateTime<Utc>>>,
}

pub async fn update_notification(
    _admin: AdminAuth,
    State(state): State<AppState>,
    Path(id): Path<String>,
    JsonBody(body): JsonBody<UpdateNotificationRequest>,
) -> Result<Success<NotificationBody>, ApiError> {
    let usecase = UpdateNotificationUseCase {
        repo: state.notification_repo(),
    };
    let notification = usecase
        .execute(
            parse_id(&id)?,
            NotificationPatch {
                title: body.title,
                message: body.message,
                target: body.target,
                target_user_ids: body.target_user_ids,
                scheduled_at: body.scheduled_at,
                status: None,
            },
        )
        .await?;
    Ok(Success::new(NotificationBody {
        notification: notification.into(),
    }))
}

// ── DELETE /api/admin/notifications/{id} ─────────────────────────────────────

pub async fn delete_notification(
    _admin: AdminAuth,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Success<Message>, ApiError> {
    let usecase = DeleteNotificationUseCase {
        repo: state.notification_repo(),
    };
    usecase.execute(parse_id(&id)?).await?;
    Ok(Success::new(Message {
        message: "notification deleted",
    }))
}

// ── POST /api/admin/notifications/{id}/send ──────────────────────────────────

pub async fn send_notification(
    _admin: AdminAuth,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Success<NotificationBody>, ApiError> {
    let usecase = SendNotificationUseCase {
        notifications: state.notification_repo(),
        users: state.user_repo(),
    };
    let notification = usecase.execute(parse_id(&id)?).await?;
    Ok(Success::new(NotificationBody {
        notification: notification.into(),
    }))
}
