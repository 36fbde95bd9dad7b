use sea_orm::entity::prelude::*;

/// Six-digit password-reset code emailed to an admin or end-user.
/// Expires after 10 minutes; single use; revoked after repeated misses.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "one_time_codes")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub email: String,
    pub code: String,
    /// `admin` or `user`.
    pub purpose: String,
    pub expires_at: chrono::DateTime<chrono::Utc>,
    pub consumed: bool,
    /// Wrong guesses so far; the code is deleted at the limit.
    pub attempts: i32,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
