//! Create `vote_event` table.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(VoteEvent::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(VoteEvent::Id)
                            .string_len(32)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(VoteEvent::CategoryId).string_len(64).not_null())
                    .col(ColumnDef::new(VoteEvent::NomineeId).string_len(64).not_null())
                    .col(ColumnDef::new(VoteEvent::VoterKey).string_len(256).not_null())
                    .col(ColumnDef::new(VoteEvent::Channel).string_len(16).not_null())
                    .col(
                        ColumnDef::new(VoteEvent::Weight)
                            .integer()
                            .not_null()
                            .check(Expr::col(VoteEvent::Weight).gt(0)),
                    )
                    .col(
                        ColumnDef::new(VoteEvent::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_vote_event_category")
                            .from(VoteEvent::Table, VoteEvent::CategoryId)
                            .to(Category::Table, Category::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_vote_event_nominee")
                            .from(VoteEvent::Table, (VoteEvent::CategoryId, VoteEvent::NomineeId))
                            .to(Nominee::Table, (Nominee::CategoryId, Nominee::Id))
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Unique index: (category_id, voter_key) - one counted vote per voter per category
        manager
            .create_index(
                Index::create()
                    .name("idx_vote_event_category_voter")
                    .table(VoteEvent::Table)
                    .col(VoteEvent::CategoryId)
                    .col(VoteEvent::VoterKey)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // Index: (category_id, nominee_id) for re-deriving tallies from the log
        manager
            .create_index(
                Index::create()
                    .name("idx_vote_event_category_nominee")
                    .table(VoteEvent::Table)
                    .col(VoteEvent::CategoryId)
                    .col(VoteEvent::NomineeId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(VoteEvent::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
enum VoteEvent {
    Table,
    Id,
    CategoryId,
    NomineeId,
    VoterKey,
    Channel,
    Weight,
    CreatedAt,
}

#[derive(Iden)]
enum Category {
    Table,
    Id,
}

#[derive(Iden)]
enum Nominee {
    Table,
    CategoryId,
    Id,
}
