//! Shared request state.

use mosaique_core::{
    RankingService, SharedCategoryRegistry, SharedTallyStore, VoteSubmissionService,
};

/// Application state shared by every handler.
#[derive(Clone)]
pub struct AppState {
    pub category_registry: SharedCategoryRegistry,
    pub voting_service: VoteSubmissionService,
    pub ranking_service: RankingService,
}

impl AppState {
    /// Wire the services over one registry and one tally store.
    #[must_use]
    pub fn new(category_registry: SharedCategoryRegistry, tally_store: SharedTallyStore) -> Self {
        Self {
            voting_service: VoteSubmissionService::new(
                category_registry.clone(),
                tally_store.clone(),
            ),
            ranking_service: RankingService::new(category_registry.clone(), tally_store),
            category_registry,
        }
    }
}
