use chrono::{DateTime, Utc};
use serde_json::json;
use uuid::Uuid;

use stillwater_domain::notification::{NotificationStatus, NotificationTarget};
use stillwater_domain::pagination::{PageRequest, Paginated};

use crate::domain::filter::NotificationFilter;
use crate::domain::repository::{AppUserRepository, NotificationRepository};
use crate::domain::types::{Notification, NotificationPatch, OutboxEvent};
use crate::error::ApiError;

pub const NOTIFICATION_DISPATCH: &str = "notification_dispatch";

fn require_text(field: &str, value: &str) -> Result<String, ApiError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ApiError::validation(format!("{field} is required")));
    }
    Ok(value.to_owned())
}

fn check_target(target: NotificationTarget, user_ids: &[Uuid]) -> Result<(), ApiError> {
    if target == NotificationTarget::Users && user_ids.is_empty() {
        return Err(ApiError::validation(
            "target_user_ids must not be empty when target is users",
        ));
    }
    Ok(())
}

// ── List / Get ───────────────────────────────────────────────────────────────

pub struct ListNotificationsUseCase<R: NotificationRepository> {
    pub repo: R,
}

impl<R: NotificationRepository> ListNotificationsUseCase<R> {
    pub async fn execute(
        &self,
        filter: &NotificationFilter,
        page: Option<PageRequest>,
    ) -> Result<Paginated<Notification>, ApiError> {
        self.repo.list(filter, page).await
    }
}

pub struct GetNotificationUseCase<R: NotificationRepository> {
    pub repo: R,
}

impl<R: NotificationRepository> GetNotificationUseCase<R> {
    pub async fn execute(&self, id: Uuid) -> Result<Notification, ApiError> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or(ApiError::NotificationNotFound)
    }
}

// ── Create ───────────────────────────────────────────────────────────────────

pub struct CreateNotificationInput {
    pub title: String,
    pub message: String,
    pub target: NotificationTarget,
    pub target_user_ids: Vec<Uuid>,
    pub scheduled_at: Option<DateTime<Utc>>,
}

pub struct CreateNotificationUseCase<R: NotificationRepository> {
    pub repo: R,
}

impl<R: NotificationRepository> CreateNotificationUseCase<R> {
    /// A notification with `scheduled_at` starts `scheduled`, otherwise `draft`.
    pub async fn execute(&self, input: CreateNotificationInput) -> Result<Notification, ApiError> {
        let title = require_text("title", &input.title)?;
        let message = require_text("message", &input.message)?;
        let target_user_ids = match input.target {
            NotificationTarget::All => Vec::new(),
            NotificationTarget::Users => input.target_user_ids,
        };
        check_target(input.target, &target_user_ids)?;

        let now = Utc::now();
        let notification = Notification {
            id: Uuid::now_v7(),
            title,
            message,
            target: input.target,
            target_user_ids,
            scheduled_at: input.scheduled_at,
            status: if input.scheduled_at.is_some() {
                NotificationStatus::Scheduled
            } else {
                NotificationStatus::Draft
            },
            sent_at: None,
            created_at: now,
            updated_at: now,
        };
        self.repo.create(&notification).await?;
        Ok(notification)
    }
}

// ── Update / Delete ──────────────────────────────────────────────────────────

pub struct UpdateNotificationUseCase<R: NotificationRepository> {
    pub repo: R,
}

impl<R: NotificationRepository> UpdateNotificationUseCase<R> {
    /// Sent notifications are immutable. Changing `scheduled_at` moves the
    /// notification between `draft` and `scheduled`.
    pub async fn execute(
        &self,
        id: Uuid,
        mut patch: NotificationPatch,
    ) -> Result<Notification, ApiError> {
        let existing = self
            .repo
            .find_by_id(id)
            .await?
            .ok_or(ApiError::NotificationNotFound)?;
        if existing.status == NotificationStatus::Sent {
            return Err(ApiError::AlreadySent);
        }

        if let Some(title) = patch.title.as_deref() {
            patch.title = Some(require_text("title", title)?);
        }
        if let Some(message) = patch.message.as_deref() {
            patch.message = Some(require_text("message", message)?);
        }

        let target = patch.target.unwrap_or(existing.target);
        if target == NotificationTarget::All {
            patch.target_user_ids = Some(Vec::new());
        }
        let user_ids = patch
            .target_user_ids
            .as_deref()
            .unwrap_or(existing.target_user_ids.as_slice());
        check_target(target, user_ids)?;

        if let Some(scheduled_at) = patch.scheduled_at {
            patch.status = Some(if scheduled_at.is_some() {
                NotificationStatus::Scheduled
            } else {
                NotificationStatus::Draft
            });
        }

        self.repo
            .update(id, &patch)
            .await?
            .ok_or(ApiError::NotificationNotFound)
    }
}

pub struct DeleteNotificationUseCase<R: NotificationRepository> {
    pub repo: R,
}

impl<R: NotificationRepository> DeleteNotificationUseCase<R> {
    pub async fn execute(&self, id: Uuid) -> Result<(), ApiError> {
        if !self.repo.delete(id).await? {
            return Err(ApiError::NotificationNotFound);
        }
        Ok(())
    }
}

// ── Send ─────────────────────────────────────────────────────────────────────

pub struct SendNotificationUseCase<N: NotificationRepository, U: AppUserRepository> {
    pub notifications: N,
    pub users: U,
}

impl<N: NotificationRepository, U: AppUserRepository> SendNotificationUseCase<N, U> {
    pub async fn execute(&self, id: Uuid) -> Result<Notification, ApiError> {
        let notification = self
            .notifications
            .find_by_id(id)
            .await?
            .ok_or(ApiError::NotificationNotFound)?;
        self.send(notification, Utc::now()).await
    }

    /// Resolve recipients, mark the notification sent and enqueue the
    /// dispatch event in one write.
    pub async fn send(
        &self,
        mut notification: Notification,
        now: DateTime<Utc>,
    ) -> Result<Notification, ApiError> {
        if notification.status == NotificationStatus::Sent {
            return Err(ApiError::AlreadySent);
        }

        let recipients = match notification.target {
            NotificationTarget::All => self.users.active_user_ids().await?,
            NotificationTarget::Users => notification.target_user_ids.clone(),
        };
        let event = OutboxEvent {
            id: Uuid::new_v4(),
            kind: NOTIFICATION_DISPATCH.to_owned(),
            payload: json!({
                "notification_id": notification.id,
                "title": notification.title,
                "message": notification.message,
                "recipients": recipients,
            }),
            idempotency_key: format!("{NOTIFICATION_DISPATCH}:{}", notification.id),
        };

        if !self
            .notifications
            .mark_sent(notification.id, now, &event)
            .await?
        {
            return Err(ApiError::AlreadySent);
        }

        tracing::info!(
            notification_id = %notification.id,
            recipients = recipients.len(),
            "notification dispatched"
        );
        notification.status = NotificationStatus::Sent;
        notification.sent_at = Some(now);
        notification.updated_at = now;
        Ok(notification)
    }
}

/// Send every scheduled notification that is due. Failures are logged per
/// notification and do not stop the batch. Returns how many were sent.
pub struct SendDueNotificationsUseCase<N: NotificationRepository, U: AppUserRepository> {
    pub sender: SendNotificationUseCase<N, U>,
}

impl<N: NotificationRepository, U: AppUserRepository> SendDueNotificationsUseCase<N, U> {
    pub async fn execute(&self, now: DateTime<Utc>) -> Result<u64, ApiError> {
        let due = self.sender.notifications.due_scheduled(now).await?;
        let mut sent = 0;
        for notification in due {
            let id = notification.id;
            match self.sender.send(notification, now).await {
                Ok(_) => sent += 1,
                Err(ApiError::AlreadySent) => {}
                Err(e) => {
                    tracing::error!(error = %e, notification_id = %id, "scheduled send failed");
                }
            }
        }
        Ok(sent)
    }
}
