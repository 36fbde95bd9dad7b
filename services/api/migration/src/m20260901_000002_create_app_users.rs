use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(AppUsers::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(AppUsers::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(AppUsers::Name).string())
                    .col(
                        ColumnDef::new(AppUsers::Email)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(AppUsers::PasswordHash).string())
                    .col(ColumnDef::new(AppUsers::GoogleId).string().unique_key())
                    .col(ColumnDef::new(AppUsers::AppleId).string().unique_key())
                    .col(
                        ColumnDef::new(AppUsers::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(AppUsers::Streak)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(AppUsers::LastCheckinDate).date())
                    .col(
                        ColumnDef::new(AppUsers::OnboardingAnswers)
                            .json_binary()
                            .not_null()
                            .default(Expr::cust("'[]'::jsonb")),
                    )
                    .col(
                        ColumnDef::new(AppUsers::CheckinAnswers)
                            .json_binary()
                            .not_null()
                            .default(Expr::cust("'[]'::jsonb")),
                    )
                    .col(ColumnDef::new(AppUsers::DeviceSync).json_binary())
                    .col(
                        ColumnDef::new(AppUsers::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(AppUsers::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    // Password-less accounts must come from a social provider.
                    .check(Expr::cust(
                        "password_hash IS NOT NULL OR google_id IS NOT NULL OR apple_id IS NOT NULL",
                    ))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .table(AppUsers::Table)
                    .col(AppUsers::CreatedAt)
                    .name("idx_app_users_created_at")
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(AppUsers::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum AppUsers {
    Table,
    Id,
    Name,
    Email,
    PasswordHash,
    GoogleId,
    AppleId,
    IsActive,
    Streak,
    LastCheckinDate,
    OnboardingAnswers,
    CheckinAnswers,
    DeviceSync,
    CreatedAt,
    UpdatedAt,
}
