use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(PostFlags::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(PostFlags::PostId).uuid().not_null())
                    .col(ColumnDef::new(PostFlags::UserId).uuid().not_null())
                    .col(
                        ColumnDef::new(PostFlags::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .primary_key(
                        Index::create()
                            .col(PostFlags::PostId)
                            .col(PostFlags::UserId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(PostFlags::Table, PostFlags::PostId)
                            .to(Posts::Table, Posts::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(PostFlags::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum PostFlags {
    Table,
    PostId,
    UserId,
    CreatedAt,
}

#[derive(Iden)]
enum Posts {
    Table,
    Id,
}
