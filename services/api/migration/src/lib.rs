pub use sea_orm_migration::prelude::*;

mod m20260901_000001_create_admins;
mod m20260901_000002_create_app_users;
mod m20260901_000003_create_one_time_codes;
mod m20260901_000004_create_questions;
mod m20260901_000005_create_content_items;
mod m20260901_000006_create_posts;
mod m20260901_000007_create_post_flags;
mod m20260901_000008_create_notifications;
mod m20260901_000009_create_outbox_events;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260901_000001_create_admins::Migration),
            Box::new(m20260901_000002_create_app_users::Migration),
            Box::new(m20260901_000003_create_one_time_codes::Migration),
            Box::new(m20260901_000004_create_questions::Migration),
            Box::new(m20260901_000005_create_content_items::Migration),
            Box::new(m20260901_000006_create_posts::Migration),
            Box::new(m20260901_000007_create_post_flags::Migration),
            Box::new(m20260901_000008_create_notifications::Migration),
            Box::new(m20260901_000009_create_outbox_events::Migration),
        ]
    }
}
