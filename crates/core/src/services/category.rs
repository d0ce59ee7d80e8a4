//! Category registry.
//!
//! Categories and their nominees are created by the admin workflow before
//! voting opens; the voting core only reads them.

use std::collections::{BTreeSet, HashMap};
use std::sync::{Arc, RwLock};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mosaique_common::{AppError, AppResult};
use mosaique_db::{
    entities::CategoryKind,
    repositories::{CategoryRepository, NomineeRepository},
};

use super::tally::within;

/// A voting contest with its fixed nominee set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    pub id: String,
    pub kind: CategoryKind,
    pub title: String,
    /// Voting opens at this instant (inclusive).
    pub starts_at: DateTime<Utc>,
    /// Voting closes at this instant (exclusive).
    pub ends_at: DateTime<Utc>,
    nominees: BTreeSet<String>,
}

impl Category {
    /// Build a category, checking its invariants.
    ///
    /// A battle must have exactly two sides; every other kind needs at least
    /// one nominee. Nominee IDs must be unique and the window non-empty.
    pub fn new<I, S>(
        id: impl Into<String>,
        kind: CategoryKind,
        title: impl Into<String>,
        starts_at: DateTime<Utc>,
        ends_at: DateTime<Utc>,
        nominees: I,
    ) -> AppResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let id = id.into();
        if id.is_empty() {
            return Err(AppError::InvalidCategory("category id is empty".to_string()));
        }
        if starts_at >= ends_at {
            return Err(AppError::InvalidCategory(format!(
                "{id}: voting window ends before it starts"
            )));
        }

        let mut set = BTreeSet::new();
        for nominee in nominees {
            let nominee = nominee.into();
            if nominee.is_empty() {
                return Err(AppError::InvalidCategory(format!("{id}: empty nominee id")));
            }
            if !set.insert(nominee.clone()) {
                return Err(AppError::InvalidCategory(format!(
                    "{id}: duplicate nominee {nominee}"
                )));
            }
        }

        match kind {
            CategoryKind::Battle if set.len() != 2 => {
                return Err(AppError::InvalidCategory(format!(
                    "{id}: a battle needs exactly 2 sides, got {}",
                    set.len()
                )));
            }
            _ if set.is_empty() => {
                return Err(AppError::InvalidCategory(format!("{id}: no nominees")));
            }
            _ => {}
        }

        Ok(Self {
            id,
            kind,
            title: title.into(),
            starts_at,
            ends_at,
            nominees: set,
        })
    }

    /// Nominee IDs in ascending order.
    #[must_use]
    pub const fn nominees(&self) -> &BTreeSet<String> {
        &self.nominees
    }

    /// Whether a nominee belongs to this category.
    #[must_use]
    pub fn contains(&self, nominee_id: &str) -> bool {
        self.nominees.contains(nominee_id)
    }

    /// Whether `now` falls in `[starts_at, ends_at)`.
    #[must_use]
    pub fn is_active(&self, now: DateTime<Utc>) -> bool {
        self.starts_at <= now && now < self.ends_at
    }

    /// The two sides of a battle, ordered by ID. `None` for other kinds.
    #[must_use]
    pub fn sides(&self) -> Option<(&str, &str)> {
        if self.kind != CategoryKind::Battle {
            return None;
        }
        let mut iter = self.nominees.iter();
        match (iter.next(), iter.next()) {
            (Some(a), Some(b)) => Some((a.as_str(), b.as_str())),
            _ => None,
        }
    }
}

/// Read-only lookup of category configuration.
#[async_trait]
pub trait CategoryRegistry: Send + Sync {
    /// Get a category, failing with [`AppError::CategoryNotFound`].
    async fn get_category(&self, id: &str) -> AppResult<Category>;

    /// IDs of all known categories, ascending.
    async fn list_categories(&self) -> AppResult<Vec<String>>;

    /// Nominee IDs of a category.
    async fn nominees_of(&self, id: &str) -> AppResult<BTreeSet<String>> {
        Ok(self.get_category(id).await?.nominees)
    }

    /// Whether the category accepts votes at `now`.
    async fn is_active(&self, id: &str, now: DateTime<Utc>) -> AppResult<bool> {
        Ok(self.get_category(id).await?.is_active(now))
    }
}

/// Type alias for a shared category registry.
pub type SharedCategoryRegistry = Arc<dyn CategoryRegistry>;

/// Category registry held in memory.
#[derive(Default)]
pub struct InMemoryCategoryRegistry {
    categories: RwLock<HashMap<String, Category>>,
}

impl InMemoryCategoryRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a category.
    ///
    /// Replacing a category whose voting has already opened is refused: its
    /// nominee set is fixed from then on.
    pub fn register(&self, category: Category, now: DateTime<Utc>) -> AppResult<()> {
        let mut categories = self
            .categories
            .write()
            .map_err(|_| AppError::Internal("category registry lock poisoned".to_string()))?;

        if let Some(existing) = categories.get(&category.id) {
            if existing.starts_at <= now {
                return Err(AppError::Conflict(format!(
                    "Category {} already opened for voting",
                    category.id
                )));
            }
        }

        tracing::debug!(category = %category.id, kind = category.kind.as_str(), "Registered category");
        categories.insert(category.id.clone(), category);
        Ok(())
    }
}

#[async_trait]
impl CategoryRegistry for InMemoryCategoryRegistry {
    async fn get_category(&self, id: &str) -> AppResult<Category> {
        self.categories
            .read()
            .map_err(|_| AppError::Internal("category registry lock poisoned".to_string()))?
            .get(id)
            .cloned()
            .ok_or_else(|| AppError::CategoryNotFound(id.to_string()))
    }

    async fn list_categories(&self) -> AppResult<Vec<String>> {
        let categories = self
            .categories
            .read()
            .map_err(|_| AppError::Internal("category registry lock poisoned".to_string()))?;
        let mut ids: Vec<String> = categories.keys().cloned().collect();
        ids.sort();
        Ok(ids)
    }
}

/// Category registry backed by the `category` and `nominee` tables.
#[derive(Clone)]
pub struct DatabaseCategoryRegistry {
    category_repo: CategoryRepository,
    nominee_repo: NomineeRepository,
    timeout: Duration,
}

impl DatabaseCategoryRegistry {
    /// Create a new database-backed registry.
    #[must_use]
    pub const fn new(
        category_repo: CategoryRepository,
        nominee_repo: NomineeRepository,
        timeout: Duration,
    ) -> Self {
        Self {
            category_repo,
            nominee_repo,
            timeout,
        }
    }
}

#[async_trait]
impl CategoryRegistry for DatabaseCategoryRegistry {
    async fn get_category(&self, id: &str) -> AppResult<Category> {
        let (model, nominees) = within(self.timeout, async {
            let model = self.category_repo.get_by_id(id).await?;
            let nominees = self.nominee_repo.find_by_category(id).await?;
            Ok::<_, AppError>((model, nominees))
        })
        .await?;

        Category::new(
            model.id,
            model.kind,
            model.title,
            model.starts_at.with_timezone(&Utc),
            model.ends_at.with_timezone(&Utc),
            nominees.into_iter().map(|n| n.id),
        )
    }

    async fn list_categories(&self) -> AppResult<Vec<String>> {
        let models = within(self.timeout, self.category_repo.find_all()).await?;
        Ok(models.into_iter().map(|m| m.id).collect())
    }
}
