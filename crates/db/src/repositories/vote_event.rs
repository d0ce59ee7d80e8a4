//! Vote event repository.
//!
//! The event log is append-only: there is no update or delete here.

use std::sync::Arc;

use chrono::Utc;
use mosaique_common::{AppError, AppResult};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set, SqlErr, TransactionTrait, sea_query::Expr,
};

use crate::entities::{Nominee, VoteEvent, nominee, vote_event};
use crate::storage_error;

/// A vote about to be recorded.
#[derive(Debug, Clone)]
pub struct NewVoteEvent {
    pub id: String,
    pub category_id: String,
    pub nominee_id: String,
    pub voter_key: String,
    pub channel: String,
    pub weight: i32,
}

/// Repository for vote events.
#[derive(Clone)]
pub struct VoteEventRepository {
    db: Arc<DatabaseConnection>,
}

impl VoteEventRepository {
    /// Create a new vote event repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Check if a voter already has a counted vote in a category.
    pub async fn has_voted(&self, category_id: &str, voter_key: &str) -> AppResult<bool> {
        let count = VoteEvent::find()
            .filter(vote_event::Column::CategoryId.eq(category_id))
            .filter(vote_event::Column::VoterKey.eq(voter_key))
            .count(self.db.as_ref())
            .await
            .map_err(storage_error)?;
        Ok(count > 0)
    }

    /// Count the votes recorded in a category.
    pub async fn count_by_category(&self, category_id: &str) -> AppResult<u64> {
        VoteEvent::find()
            .filter(vote_event::Column::CategoryId.eq(category_id))
            .count(self.db.as_ref())
            .await
            .map_err(storage_error)
    }

    /// List the votes recorded in a category, oldest first.
    pub async fn find_by_category(&self, category_id: &str) -> AppResult<Vec<vote_event::Model>> {
        VoteEvent::find()
            .filter(vote_event::Column::CategoryId.eq(category_id))
            .order_by_asc(vote_event::Column::Id)
            .all(self.db.as_ref())
            .await
            .map_err(storage_error)
    }

    /// Record a vote and credit its nominee in one transaction.
    ///
    /// The unique index on `(category_id, voter_key)` decides which of two
    /// concurrent votes from the same voter wins; the loser gets
    /// [`AppError::AlreadyVoted`]. The uniqueness check fires before the
    /// nominee foreign key, so a repeat voter is told they already voted even
    /// when naming an unknown nominee. Any failure rolls the whole unit back.
    /// Returns the nominee with its updated counters.
    pub async fn record(&self, event: NewVoteEvent) -> AppResult<nominee::Model> {
        let txn = self.db.begin().await.map_err(storage_error)?;

        let unknown_nominee = || AppError::UnknownNominee {
            category: event.category_id.clone(),
            nominee: event.nominee_id.clone(),
        };

        let model = vote_event::ActiveModel {
            id: Set(event.id.clone()),
            category_id: Set(event.category_id.clone()),
            nominee_id: Set(event.nominee_id.clone()),
            voter_key: Set(event.voter_key.clone()),
            channel: Set(event.channel.clone()),
            weight: Set(event.weight),
            created_at: Set(Utc::now().into()),
        };
        model.insert(&txn).await.map_err(|e| match e.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(_)) => {
                AppError::AlreadyVoted(event.category_id.clone())
            }
            Some(SqlErr::ForeignKeyConstraintViolation(_)) => unknown_nominee(),
            _ => storage_error(e),
        })?;

        let result = Nominee::update_many()
            .col_expr(
                nominee::Column::WeightedVotes,
                Expr::col(nominee::Column::WeightedVotes).add(i64::from(event.weight)),
            )
            .col_expr(
                nominee::Column::RawVotes,
                Expr::col(nominee::Column::RawVotes).add(1),
            )
            .filter(nominee::Column::CategoryId.eq(event.category_id.as_str()))
            .filter(nominee::Column::Id.eq(event.nominee_id.as_str()))
            .exec(&txn)
            .await
            .map_err(storage_error)?;
        if result.rows_affected == 0 {
            return Err(unknown_nominee());
        }

        let updated = Nominee::find_by_id((event.category_id.clone(), event.nominee_id.clone()))
            .one(&txn)
            .await
            .map_err(storage_error)?
            .ok_or_else(unknown_nominee)?;

        txn.commit().await.map_err(storage_error)?;

        Ok(updated)
    }
}
