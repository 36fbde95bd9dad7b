use sea_orm::entity::prelude::*;

/// Push notification composed in the dashboard.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "notifications")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub title: String,
    pub message: String,
    /// `all` or `users`.
    pub target: String,
    /// JSONB array of user id strings when `target = 'users'`.
    pub target_user_ids: Json,
    pub scheduled_at: Option<chrono::DateTime<chrono::Utc>>,
    /// `draft`, `scheduled` or `sent`.
    pub status: String,
    pub sent_at: Option<chrono::DateTime<chrono::Utc>>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
