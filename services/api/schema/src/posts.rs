use sea_orm::entity::prelude::*;

/// Community post. Soft-deleted by setting `deleted_at`.
///
/// `flag_count` always equals the number of `post_flags` rows for the post.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "posts")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub content: String,
    pub image_url: Option<String>,
    pub status: String,
    pub visibility: String,
    pub flag_count: i32,
    pub deleted_at: Option<chrono::DateTime<chrono::Utc>>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::app_users::Entity",
        from = "Column::UserId",
        to = "super::app_users::Column::Id",
        on_delete = "Cascade"
    )]
    AppUser,
    #[sea_orm(has_many = "super::post_flags::Entity")]
    PostFlags,
}

impl Related<super::app_users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::AppUser.def()
    }
}

impl Related<super::post_flags::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PostFlags.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
