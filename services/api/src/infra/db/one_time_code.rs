use anyhow::Context as _;
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, Condition, DatabaseConnection, EntityTrait,
    QueryFilter, QueryOrder, TransactionTrait, sea_query::Expr,
};
use uuid::Uuid;

use stillwater_api_schema::one_time_codes;

use crate::domain::repository::OneTimeCodeRepository;
use crate::domain::types::{CodePurpose, OneTimeCode};
use crate::error::ApiError;
use crate::infra::db::parse_column;

#[derive(Clone)]
pub struct DbOneTimeCodeRepository {
    pub db: DatabaseConnection,
}

impl OneTimeCodeRepository for DbOneTimeCodeRepository {
    async fn replace(&self, code: &OneTimeCode) -> Result<(), ApiError> {
        self.db
            .transaction::<_, (), sea_orm::DbErr>(|txn| {
                let code = code.clone();
                Box::pin(async move {
                    one_time_codes::Entity::delete_many()
                        .filter(one_time_codes::Column::Email.eq(code.email.as_str()))
                        .filter(one_time_codes::Column::Purpose.eq(code.purpose.as_str()))
                        .exec(txn)
                        .await?;
                    one_time_codes::ActiveModel {
                        id: Set(code.id),
                        email: Set(code.email),
                        code: Set(code.code),
                        purpose: Set(code.purpose.as_str().to_owned()),
                        expires_at: Set(code.expires_at),
                        consumed: Set(false),
                        attempts: Set(0),
                        created_at: Set(code.created_at),
                    }
                    .insert(txn)
                    .await?;
                    Ok(())
                })
            })
            .await
            .context("replace one-time code")?;
        Ok(())
    }

    async fn find_valid(
        &self,
        email: &str,
        purpose: CodePurpose,
        code: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<OneTimeCode>, ApiError> {
        let model = one_time_codes::Entity::find()
            .filter(one_time_codes::Column::Email.eq(email))
            .filter(one_time_codes::Column::Purpose.eq(purpose.as_str()))
            .filter(one_time_codes::Column::Code.eq(code))
            .filter(one_time_codes::Column::Consumed.eq(false))
            .filter(one_time_codes::Column::ExpiresAt.gt(now))
            .order_by_desc(one_time_codes::Column::CreatedAt)
            .one(&self.db)
            .await
            .context("find valid one-time code")?;
        model.map(code_from_model).transpose()
    }

    async fn consume(&self, id: Uuid) -> Result<bool, ApiError> {
        let result = one_time_codes::Entity::update_many()
            .col_expr(one_time_codes::Column::Consumed, Expr::value(true))
            .filter(one_time_codes::Column::Id.eq(id))
            .filter(one_time_codes::Column::Consumed.eq(false))
            .exec(&self.db)
            .await
            .context("consume one-time code")?;
        Ok(result.rows_affected > 0)
    }

    async fn record_miss(
        &self,
        email: &str,
        purpose: CodePurpose,
        max_attempts: i32,
        now: DateTime<Utc>,
    ) -> Result<bool, ApiError> {
        let email = email.to_owned();
        let revoked = self
            .db
            .transaction::<_, u64, sea_orm::DbErr>(|txn| {
                Box::pin(async move {
                    let live = Condition::all()
                        .add(one_time_codes::Column::Email.eq(email.as_str()))
                        .add(one_time_codes::Column::Purpose.eq(purpose.as_str()))
                        .add(one_time_codes::Column::Consumed.eq(false))
                        .add(one_time_codes::Column::ExpiresAt.gt(now));
                    one_time_codes::Entity::update_many()
                        .col_expr(
                            one_time_codes::Column::Attempts,
                            Expr::col(one_time_codes::Column::Attempts).add(1),
                        )
                        .filter(live.clone())
                        .exec(txn)
                        .await?;
                    let deleted = one_time_codes::Entity::delete_many()
                        .filter(live)
                        .filter(one_time_codes::Column::Attempts.gte(max_attempts))
                        .exec(txn)
                        .await?;
                    Ok(deleted.rows_affected)
                })
            })
            .await
            .context("record one-time code miss")?;
        Ok(revoked > 0)
    }

    async fn purge_expired(&self, now: DateTime<Utc>) -> Result<u64, ApiError> {
        let result = one_time_codes::Entity::delete_many()
            .filter(one_time_codes::Column::ExpiresAt.lte(now))
            .exec(&self.db)
            .await
            .context("purge expired one-time codes")?;
        Ok(result.rows_affected)
    }
}

fn code_from_model(model: one_time_codes::Model) -> Result<OneTimeCode, ApiError> {
    Ok(OneTimeCode {
        purpose: parse_column("purpose", &model.purpose, CodePurpose::parse)?,
        id: model.id,
        email: model.email,
        code: model.code,
        expires_at: model.expires_at,
        consumed: model.consumed,
        attempts: model.attempts,
        created_at: model.created_at,
    })
}
