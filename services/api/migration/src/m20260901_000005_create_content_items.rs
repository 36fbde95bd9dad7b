use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ContentItems::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ContentItems::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(ContentItems::Kind).string().not_null())
                    .col(ColumnDef::new(ContentItems::Title).string())
                    .col(ColumnDef::new(ContentItems::Body).text().not_null())
                    .col(ColumnDef::new(ContentItems::Author).string())
                    .col(ColumnDef::new(ContentItems::MediaUrl).string())
                    .col(
                        ColumnDef::new(ContentItems::Tags)
                            .json_binary()
                            .not_null()
                            .default(Expr::cust("'[]'::jsonb")),
                    )
                    .col(ColumnDef::new(ContentItems::ScheduledAt).timestamp_with_time_zone())
                    .col(
                        ColumnDef::new(ContentItems::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(ContentItems::IsArchived)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(ContentItems::IsPublished)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(ContentItems::OrderIndex)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(ContentItems::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ContentItems::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .table(ContentItems::Table)
                    .col(ContentItems::Kind)
                    .col(ContentItems::ScheduledAt)
                    .name("idx_content_items_kind_scheduled_at")
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ContentItems::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum ContentItems {
    Table,
    Id,
    Kind,
    Title,
    Body,
    Author,
    MediaUrl,
    Tags,
    ScheduledAt,
    IsActive,
    IsArchived,
    IsPublished,
    OrderIndex,
    CreatedAt,
    UpdatedAt,
}
