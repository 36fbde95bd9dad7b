use anyhow::Context as _;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, DbErr, EntityTrait,
    PaginatorTrait, QueryFilter, sea_query::Expr,
};
use uuid::Uuid;

use stillwater_api_schema::admins;

use crate::domain::repository::{AdminRepository, CredentialStore};
use crate::domain::types::{Admin, CodePurpose, Credential, NewAdmin};
use crate::error::ApiError;
use crate::infra::db::is_unique_violation;

#[derive(Clone)]
pub struct DbAdminRepository {
    pub db: DatabaseConnection,
}

impl AdminRepository for DbAdminRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Admin>, ApiError> {
        let model = admins::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find admin by id")?;
        Ok(model.map(admin_from_model))
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Admin>, ApiError> {
        let model = admins::Entity::find()
            .filter(admins::Column::Email.eq(email))
            .one(&self.db)
            .await
            .context("find admin by email")?;
        Ok(model.map(admin_from_model))
    }

    async fn count(&self) -> Result<u64, ApiError> {
        let count = admins::Entity::find()
            .count(&self.db)
            .await
            .context("count admins")?;
        Ok(count)
    }

    async fn create(&self, admin: &NewAdmin) -> Result<Admin, ApiError> {
        let now = Utc::now();
        let result = admins::ActiveModel {
            id: Set(admin.id),
            email: Set(admin.email.clone()),
            password_hash: Set(admin.password_hash.clone()),
            name: Set(admin.name.clone()),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&self.db)
        .await;

        match result {
            Ok(model) => Ok(admin_from_model(model)),
            Err(e) if is_unique_violation(&e) => Err(ApiError::EmailTaken),
            Err(e) => Err(ApiError::Internal(anyhow::Error::new(e).context("insert admin"))),
        }
    }

    async fn update_profile(
        &self,
        id: Uuid,
        name: Option<Option<String>>,
        email: Option<String>,
    ) -> Result<Option<Admin>, ApiError> {
        let mut model = admins::ActiveModel {
            id: Set(id),
            updated_at: Set(Utc::now()),
            ..Default::default()
        };
        if let Some(name) = name {
            model.name = Set(name);
        }
        if let Some(email) = email {
            model.email = Set(email);
        }

        match model.update(&self.db).await {
            Ok(model) => Ok(Some(admin_from_model(model))),
            Err(DbErr::RecordNotUpdated) => Ok(None),
            Err(e) if is_unique_violation(&e) => Err(ApiError::EmailTaken),
            Err(e) => Err(ApiError::Internal(anyhow::Error::new(e).context("update admin"))),
        }
    }
}

impl CredentialStore for DbAdminRepository {
    fn purpose(&self) -> CodePurpose {
        CodePurpose::Admin
    }

    async fn find_credential(&self, email: &str) -> Result<Option<Credential>, ApiError> {
        let model = admins::Entity::find()
            .filter(admins::Column::Email.eq(email))
            .one(&self.db)
            .await
            .context("find admin credential")?;
        Ok(model.map(|m| Credential {
            id: m.id,
            email: m.email,
            password_hash: Some(m.password_hash),
        }))
    }

    async fn set_password_hash(&self, id: Uuid, hash: &str) -> Result<bool, ApiError> {
        let result = admins::Entity::update_many()
            .col_expr(admins::Column::PasswordHash, Expr::value(hash))
            .col_expr(admins::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(admins::Column::Id.eq(id))
            .exec(&self.db)
            .await
            .context("update admin password")?;
        Ok(result.rows_affected > 0)
    }
}

fn admin_from_model(model: admins::Model) -> Admin {
    Admin {
        id: model.id,
        email: model.email,
        name: model.name,
        created_at: model.created_at,
        updated_at: model.updated_at,
    }
}
