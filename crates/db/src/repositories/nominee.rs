//! Nominee repository.

use std::sync::Arc;

use mosaique_common::AppResult;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder,
};

use crate::entities::{Nominee, nominee};
use crate::storage_error;

/// Repository for nominees and their tallies.
#[derive(Clone)]
pub struct NomineeRepository {
    db: Arc<DatabaseConnection>,
}

impl NomineeRepository {
    /// Create a new nominee repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a nominee within a category.
    pub async fn find(&self, category_id: &str, id: &str) -> AppResult<Option<nominee::Model>> {
        Nominee::find_by_id((category_id.to_string(), id.to_string()))
            .one(self.db.as_ref())
            .await
            .map_err(storage_error)
    }

    /// List the nominees of a category ordered by ID.
    ///
    /// Both counters of a row are read by the same statement, so a row is
    /// never observed half-updated.
    pub async fn find_by_category(&self, category_id: &str) -> AppResult<Vec<nominee::Model>> {
        Nominee::find()
            .filter(nominee::Column::CategoryId.eq(category_id))
            .order_by_asc(nominee::Column::Id)
            .all(self.db.as_ref())
            .await
            .map_err(storage_error)
    }

    /// Create a new nominee.
    pub async fn create(&self, model: nominee::ActiveModel) -> AppResult<nominee::Model> {
        model.insert(self.db.as_ref()).await.map_err(storage_error)
    }
}
