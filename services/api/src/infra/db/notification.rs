use anyhow::Context as _;
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, Condition, DatabaseConnection, DbErr,
    EntityTrait, QueryFilter, QueryOrder, TransactionTrait, sea_query::Expr,
};
use serde_json::json;
use uuid::Uuid;

use stillwater_api_schema::notifications;
use stillwater_core::sea_ext::{fetch_page, json_contains, search_any};
use stillwater_domain::notification::{NotificationStatus, NotificationTarget};
use stillwater_domain::pagination::{PageRequest, Paginated};

use crate::domain::filter::NotificationFilter;
use crate::domain::repository::NotificationRepository;
use crate::domain::types::{Notification, NotificationPatch, OutboxEvent};
use crate::error::ApiError;
use crate::infra::db::{from_json_column, insert_outbox_event, parse_column, to_json_column};

#[derive(Clone)]
pub struct DbNotificationRepository {
    pub db: DatabaseConnection,
}

fn notification_condition(filter: &NotificationFilter) -> Condition {
    let mut cond = Condition::all();
    if let Some(term) = filter.search.as_deref() {
        cond = cond.add(search_any(
            &[notifications::Column::Title, notifications::Column::Message],
            term,
        ));
    }
    if let Some(status) = filter.status {
        cond = cond.add(notifications::Column::Status.eq(status.as_str()));
    }
    if let Some(target) = filter.target {
        cond = cond.add(notifications::Column::Target.eq(target.as_str()));
    }
    if let Some(user_id) = filter.recipient {
        cond = cond.add(
            Condition::any()
                .add(notifications::Column::Target.eq(NotificationTarget::All.as_str()))
                .add(json_contains(
                    notifications::Column::TargetUserIds,
                    json!([user_id]),
                )),
        );
    }
    cond
}

impl NotificationRepository for DbNotificationRepository {
    async fn list(
        &self,
        filter: &NotificationFilter,
        page: Option<PageRequest>,
    ) -> Result<Paginated<Notification>, ApiError> {
        let select = notifications::Entity::find()
            .filter(notification_condition(filter))
            .order_by_desc(notifications::Column::CreatedAt);
        fetch_page(select, page, &self.db)
            .await
            .context("list notifications")?
            .try_map(notification_from_model)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Notification>, ApiError> {
        let model = notifications::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find notification")?;
        model.map(notification_from_model).transpose()
    }

    async fn create(&self, notification: &Notification) -> Result<(), ApiError> {
        notifications::ActiveModel {
            id: Set(notification.id),
            title: Set(notification.title.clone()),
            message: Set(notification.message.clone()),
            target: Set(notification.target.as_str().to_owned()),
            target_user_ids: Set(to_json_column(
                "target_user_ids",
                &notification.target_user_ids,
            )?),
            scheduled_at: Set(notification.scheduled_at),
            status: Set(notification.status.as_str().to_owned()),
            sent_at: Set(notification.sent_at),
            created_at: Set(notification.created_at),
            updated_at: Set(notification.updated_at),
        }
        .insert(&self.db)
        .await
        .context("insert notification")?;
        Ok(())
    }

    async fn update(
        &self,
        id: Uuid,
        patch: &NotificationPatch,
    ) -> Result<Option<Notification>, ApiError> {
        let mut model = notifications::ActiveModel {
            id: Set(id),
            updated_at: Set(Utc::now()),
            ..Default::default()
        };
        if let Some(title) = &patch.title {
            model.title = Set(title.clone());
        }
        if let Some(message) = &patch.message {
            model.message = Set(message.clone());
        }
        if let Some(target) = patch.target {
            model.target = Set(target.as_str().to_owned());
        }
        if let Some(ids) = &patch.target_user_ids {
            model.target_user_ids = Set(to_json_column("target_user_ids", ids)?);
        }
        if let Some(scheduled_at) = patch.scheduled_at {
            model.scheduled_at = Set(scheduled_at);
        }
        if let Some(status) = patch.status {
            model.status = Set(status.as_str().to_owned());
        }

        match model.update(&self.db).await {
            Ok(model) => notification_from_model(model).map(Some),
            Err(DbErr::RecordNotUpdated) => Ok(None),
            Err(e) => Err(ApiError::Internal(
                anyhow::Error::new(e).context("update notification"),
            )),
        }
    }

    async fn delete(&self, id: Uuid) -> Result<bool, ApiError> {
        let result = notifications::Entity::delete_many()
            .filter(notifications::Column::Id.eq(id))
            .exec(&self.db)
            .await
            .context("delete notification")?;
        Ok(result.rows_affected > 0)
    }

    async fn mark_sent(
        &self,
        id: Uuid,
        sent_at: DateTime<Utc>,
        event: &OutboxEvent,
    ) -> Result<bool, ApiError> {
        let sent = self
            .db
            .transaction::<_, bool, DbErr>(|txn| {
                let event = event.clone();
                Box::pin(async move {
                    let result = notifications::Entity::update_many()
                        .col_expr(
                            notifications::Column::Status,
                            Expr::value(NotificationStatus::Sent.as_str()),
                        )
                        .col_expr(notifications::Column::SentAt, Expr::value(sent_at))
                        .col_expr(notifications::Column::UpdatedAt, Expr::value(sent_at))
                        .filter(notifications::Column::Id.eq(id))
                        .filter(notifications::Column::Status.ne(NotificationStatus::Sent.as_str()))
                        .exec(txn)
                        .await?;
                    if result.rows_affected == 0 {
                        return Ok(false);
                    }
                    insert_outbox_event(txn, &event).await?;
                    Ok(true)
                })
            })
            .await
            .context("mark notification sent")?;
        Ok(sent)
    }

    async fn due_scheduled(&self, now: DateTime<Utc>) -> Result<Vec<Notification>, ApiError> {
        notifications::Entity::find()
            .filter(notifications::Column::Status.eq(NotificationStatus::Scheduled.as_str()))
            .filter(notifications::Column::ScheduledAt.lte(now))
            .order_by_asc(notifications::Column::ScheduledAt)
            .all(&self.db)
            .await
            .context("find due notifications")?
            .into_iter()
            .map(notification_from_model)
            .collect()
    }
}

fn notification_from_model(model: notifications::Model) -> Result<Notification, ApiError> {
    Ok(Notification {
        id: model.id,
        title: model.title,
        message: model.message,
        target: parse_column("target", &model.target, NotificationTarget::parse)?,
        target_user_ids: from_json_column("target_user_ids", model.target_user_ids)?,
        scheduled_at: model.scheduled_at,
        status: parse_column("status", &model.status, NotificationStatus::parse)?,
        sent_at: model.sent_at,
        created_at: model.created_at,
        updated_at: model.updated_at,
    })
}
