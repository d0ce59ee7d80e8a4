//! Create `category` table.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Category::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Category::Id)
                            .string_len(64)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Category::Kind).string_len(16).not_null())
                    .col(ColumnDef::new(Category::Title).string_len(256).not_null())
                    .col(
                        ColumnDef::new(Category::StartsAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Category::EndsAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Category::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .check(Expr::col(Category::StartsAt).lt(Expr::col(Category::EndsAt)))
                    .to_owned(),
            )
            .await?;

        // Index on the window for listing open categories
        manager
            .create_index(
                Index::create()
                    .name("idx_category_window")
                    .table(Category::Table)
                    .col(Category::StartsAt)
                    .col(Category::EndsAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Category::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum Category {
    Table,
    Id,
    Kind,
    Title,
    StartsAt,
    EndsAt,
    CreatedAt,
}
