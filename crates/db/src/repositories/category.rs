//! Category repository.

use std::sync::Arc;

use mosaique_common::{AppError, AppResult};
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, QueryOrder};

use crate::entities::{Category, category};
use crate::storage_error;

/// Repository for category operations.
#[derive(Clone)]
pub struct CategoryRepository {
    db: Arc<DatabaseConnection>,
}

impl CategoryRepository {
    /// Create a new category repository.
    #[must_use]
    pub const fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Find a category by ID.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<category::Model>> {
        Category::find_by_id(id)
            .one(self.db.as_ref())
            .await
            .map_err(storage_error)
    }

    /// Get a category by ID, returning error if not found.
    pub async fn get_by_id(&self, id: &str) -> AppResult<category::Model> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| AppError::CategoryNotFound(id.to_string()))
    }

    /// List all categories ordered by ID.
    pub async fn find_all(&self) -> AppResult<Vec<category::Model>> {
        Category::find()
            .order_by_asc(category::Column::Id)
            .all(self.db.as_ref())
            .await
            .map_err(storage_error)
    }

    /// Create a new category.
    pub async fn create(&self, model: category::ActiveModel) -> AppResult<category::Model> {
        model.insert(self.db.as_ref()).await.map_err(storage_error)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::entities::CategoryKind;
    use chrono::{Duration, Utc};
    use sea_orm::{DatabaseBackend, MockDatabase};

    fn create_test_category(id: &str, kind: CategoryKind) -> category::Model {
        let now = Utc::now();
        category::Model {
            id: id.to_string(),
            kind,
            title: "Song of the month".to_string(),
            starts_at: (now - Duration::days(1)).into(),
            ends_at: (now + Duration::days(1)).into(),
            created_at: now.into(),
        }
    }

    #[tokio::test]
    async fn test_find_by_id_found() {
        let category = create_test_category("song-of-month", CategoryKind::Song);

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[category.clone()]])
                .into_connection(),
        );

        let repo = CategoryRepository::new(db);
        let found = repo.find_by_id("song-of-month").await.unwrap().unwrap();

        assert_eq!(found.id, "song-of-month");
        assert_eq!(found.kind, CategoryKind::Song);
    }

    #[tokio::test]
    async fn test_get_by_id_not_found() {
        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([Vec::<category::Model>::new()])
                .into_connection(),
        );

        let repo = CategoryRepository::new(db);
        let result = repo.get_by_id("missing").await;

        assert!(matches!(result, Err(AppError::CategoryNotFound(id)) if id == "missing"));
    }

    #[tokio::test]
    async fn test_find_all() {
        let battle = create_test_category("battle-1", CategoryKind::Battle);
        let song = create_test_category("song-of-month", CategoryKind::Song);

        let db = Arc::new(
            MockDatabase::new(DatabaseBackend::Postgres)
                .append_query_results([[battle, song]])
                .into_connection(),
        );

        let repo = CategoryRepository::new(db);
        let all = repo.find_all().await.unwrap();

        assert_eq!(all.len(), 2);
        assert_eq!(all[0].kind, CategoryKind::Battle);
    }
}
