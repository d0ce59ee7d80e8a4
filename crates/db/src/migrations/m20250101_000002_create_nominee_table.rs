//! Create `nominee` table.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Nominee::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Nominee::CategoryId).string_len(64).not_null())
                    .col(ColumnDef::new(Nominee::Id).string_len(64).not_null())
                    .col(
                        ColumnDef::new(Nominee::DisplayName)
                            .string_len(256)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Nominee::WeightedVotes)
                            .big_integer()
                            .not_null()
                            .default(0)
                            .check(Expr::col(Nominee::WeightedVotes).gte(0)),
                    )
                    .col(
                        ColumnDef::new(Nominee::RawVotes)
                            .big_integer()
                            .not_null()
                            .default(0)
                            .check(Expr::col(Nominee::RawVotes).gte(0)),
                    )
                    .col(
                        ColumnDef::new(Nominee::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .primary_key(
                        Index::create()
                            .name("pk_nominee")
                            .col(Nominee::CategoryId)
                            .col(Nominee::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_nominee_category")
                            .from(Nominee::Table, Nominee::CategoryId)
                            .to(Category::Table, Category::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Nominee::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Nominee {
    Table,
    CategoryId,
    Id,
    DisplayName,
    WeightedVotes,
    RawVotes,
    CreatedAt,
}

#[derive(Iden)]
enum Category {
    Table,
    Id,
}
