use anyhow::Context as _;
use sea_orm::DatabaseConnection;
use serde_json::json;
use uuid::Uuid;

use crate::domain::repository::OtpMailer;
use crate::domain::types::{CodePurpose, OutboxEvent};
use crate::error::ApiError;
use crate::infra::db::insert_outbox_event;

pub const OTP_ISSUED: &str = "otp_issued";

/// Hands one-time codes to the email worker through the outbox table.
#[derive(Clone)]
pub struct OutboxOtpMailer {
    pub db: DatabaseConnection,
}

impl OtpMailer for OutboxOtpMailer {
    async fn send(&self, email: &str, code: &str, purpose: CodePurpose) -> Result<bool, ApiError> {
        let id = Uuid::new_v4();
        let event = OutboxEvent {
            id,
            kind: OTP_ISSUED.to_owned(),
            payload: json!({
                "email": email,
                "code": code,
                "purpose": purpose.as_str(),
            }),
            idempotency_key: format!("{OTP_ISSUED}:{id}"),
        };
        insert_outbox_event(&self.db, &event)
            .await
            .context("enqueue one-time code email")?;
        Ok(true)
    }
}
