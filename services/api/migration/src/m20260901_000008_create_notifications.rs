use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Notifications::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Notifications::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Notifications::Title).string().not_null())
                    .col(ColumnDef::new(Notifications::Message).text().not_null())
                    .col(
                        ColumnDef::new(Notifications::Target)
                            .string()
                            .not_null()
                            .default("all"),
                    )
                    .col(
                        ColumnDef::new(Notifications::TargetUserIds)
                            .json_binary()
                            .not_null()
                            .default(Expr::cust("'[]'::jsonb")),
                    )
                    .col(ColumnDef::new(Notifications::ScheduledAt).timestamp_with_time_zone())
                    .col(
                        ColumnDef::new(Notifications::Status)
                            .string()
                            .not_null()
                            .default("draft"),
                    )
                    .col(ColumnDef::new(Notifications::SentAt).timestamp_with_time_zone())
                    .col(
                        ColumnDef::new(Notifications::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Notifications::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // Job runner polls scheduled notifications by due time.
        manager
            .create_index(
                Index::create()
                    .table(Notifications::Table)
                    .col(Notifications::Status)
                    .col(Notifications::ScheduledAt)
                    .name("idx_notifications_status_scheduled_at")
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Notifications::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Notifications {
    Table,
    Id,
    Title,
    Message,
    Target,
    TargetUserIds,
    ScheduledAt,
    Status,
    SentAt,
    CreatedAt,
    UpdatedAt,
}
