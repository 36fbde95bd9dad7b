//! sea-orm implementations of the repository traits.

mod admin;
mod app_user;
mod content;
mod notification;
mod one_time_code;
mod post;
mod question;

pub use admin::DbAdminRepository;
pub use app_user::DbAppUserRepository;
pub use content::DbContentRepository;
pub use notification::DbNotificationRepository;
pub use one_time_code::DbOneTimeCodeRepository;
pub use post::DbPostRepository;
pub use question::DbQuestionRepository;

use anyhow::anyhow;
use chrono::Utc;
use sea_orm::{ActiveModelTrait, ActiveValue::Set, ConnectionTrait, DbErr, SqlErr};
use serde::de::DeserializeOwned;
use serde_json::Value;

use stillwater_api_schema::outbox_events;

use crate::domain::types::OutboxEvent;
use crate::error::ApiError;

pub(crate) fn is_unique_violation(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}

/// Parse a string column into a domain enum, failing loudly on drift.
pub(crate) fn parse_column<T>(
    column: &'static str,
    value: &str,
    parse: impl Fn(&str) -> Option<T>,
) -> Result<T, ApiError> {
    parse(value).ok_or_else(|| ApiError::Internal(anyhow!("unexpected {column} value {value:?}")))
}

/// Decode a JSONB column. `NULL` decodes as the type's default.
pub(crate) fn from_json_column<T: DeserializeOwned + Default>(
    column: &'static str,
    value: Value,
) -> Result<T, ApiError> {
    if value.is_null() {
        return Ok(T::default());
    }
    serde_json::from_value(value).map_err(|e| ApiError::Internal(anyhow!("decode {column}: {e}")))
}

pub(crate) fn to_json_column<T: serde::Serialize>(
    column: &'static str,
    value: &T,
) -> Result<Value, ApiError> {
    serde_json::to_value(value).map_err(|e| ApiError::Internal(anyhow!("encode {column}: {e}")))
}

pub(crate) async fn insert_outbox_event<C: ConnectionTrait>(
    db: &C,
    event: &OutboxEvent,
) -> Result<(), DbErr> {
    let now = Utc::now();
    outbox_events::ActiveModel {
        id: Set(event.id),
        kind: Set(event.kind.clone()),
        payload: Set(event.payload.clone()),
        idempotency_key: Set(event.idempotency_key.clone()),
        attempts: Set(0),
        last_error: Set(None),
        created_at: Set(now),
        next_attempt_at: Set(now),
        processed_at: Set(None),
        failed_at: Set(None),
    }
    .insert(db)
    .await?;
    Ok(())
}
