use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(OneTimeCodes::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(OneTimeCodes::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(OneTimeCodes::Email).string().not_null())
                    .col(ColumnDef::new(OneTimeCodes::Code).string().not_null())
                    .col(ColumnDef::new(OneTimeCodes::Purpose).string().not_null())
                    .col(
                        ColumnDef::new(OneTimeCodes::ExpiresAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(OneTimeCodes::Consumed)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(OneTimeCodes::Attempts)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(OneTimeCodes::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .table(OneTimeCodes::Table)
                    .col(OneTimeCodes::Email)
                    .col(OneTimeCodes::Purpose)
                    .name("idx_one_time_codes_email_purpose")
                    .to_owned(),
            )
            .await?;

        // Purge job scans by expiry.
        manager
            .create_index(
                Index::create()
                    .table(OneTimeCodes::Table)
                    .col(OneTimeCodes::ExpiresAt)
                    .name("idx_one_time_codes_expires_at")
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(OneTimeCodes::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum OneTimeCodes {
    Table,
    Id,
    Email,
    Code,
    Purpose,
    ExpiresAt,
    Consumed,
    Attempts,
    CreatedAt,
}
