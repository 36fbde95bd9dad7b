use sea_orm::entity::prelude::*;

/// Mobile-app user.
///
/// `onboarding_answers` and `checkin_answers` are JSONB arrays of embedded
/// answers owned by the row. A user without `password_hash` was created by
/// social login and has at least one of `google_id` / `apple_id`.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "app_users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: Option<String>,
    #[sea_orm(unique)]
    pub email: String,
    pub password_hash: Option<String>,
    #[sea_orm(unique)]
    pub google_id: Option<String>,
    #[sea_orm(unique)]
    pub apple_id: Option<String>,
    pub is_active: bool,
    pub streak: i32,
    pub last_checkin_date: Option<Date>,
    pub onboarding_answers: Json,
    pub checkin_answers: Json,
    pub device_sync: Option<Json>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::posts::Entity")]
    Posts,
}

impl Related<super::posts::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Posts.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
