use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Questions::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Questions::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Questions::Kind).string().not_null())
                    .col(ColumnDef::new(Questions::Title).string().not_null())
                    .col(ColumnDef::new(Questions::QuestionType).string().not_null())
                    .col(
                        ColumnDef::new(Questions::Options)
                            .json_binary()
                            .not_null()
                            .default(Expr::cust("'[]'::jsonb")),
                    )
                    .col(
                        ColumnDef::new(Questions::SortOrder)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Questions::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(Questions::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Questions::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .table(Questions::Table)
                    .col(Questions::Kind)
                    .col(Questions::SortOrder)
                    .name("idx_questions_kind_sort_order")
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Questions::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Questions {
    Table,
    Id,
    Kind,
    Title,
    QuestionType,
    Options,
    SortOrder,
    IsActive,
    CreatedAt,
    UpdatedAt,
}
