use sea_orm::entity::prelude::*;

/// Affirmations, quotes and library items share this table, told apart by `kind`.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "content_items")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub kind: String,
    pub title: Option<String>,
    pub body: String,
    pub author: Option<String>,
    pub media_url: Option<String>,
    pub tags: Json,
    /// `NULL` means "always eligible" for the current-period queries.
    pub scheduled_at: Option<chrono::DateTime<chrono::Utc>>,
    pub is_active: bool,
    pub is_archived: bool,
    pub is_published: bool,
    pub order_index: i32,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
