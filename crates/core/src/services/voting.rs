//! Vote submission service.

use chrono::{DateTime, Utc};
use mosaique_common::{AppError, AppResult};
use serde::Serialize;

use super::category::SharedCategoryRegistry;
use super::tally::{NomineeTally, SharedTallyStore};
use super::weight::VoteChannel;

/// Result of an accepted vote.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteOutcome {
    pub category_id: String,
    pub nominee_id: String,
    pub channel: VoteChannel,
    pub weight: u32,
    /// The nominee's counters after this vote.
    pub tally: NomineeTally,
}

/// Orchestrates a vote: window check, weight lookup, then the store.
#[derive(Clone)]
pub struct VoteSubmissionService {
    categories: SharedCategoryRegistry,
    tallies: SharedTallyStore,
}

impl VoteSubmissionService {
    /// Create a new vote submission service.
    #[must_use]
    pub fn new(categories: SharedCategoryRegistry, tallies: SharedTallyStore) -> Self {
        Self {
            categories,
            tallies,
        }
    }

    /// Cast a vote now.
    pub async fn vote(
        &self,
        category_id: &str,
        nominee_id: &str,
        channel: &str,
        voter_key: &str,
    ) -> AppResult<VoteOutcome> {
        self.vote_at(category_id, nominee_id, channel, voter_key, Utc::now())
            .await
    }

    /// Cast a vote as of `now`.
    ///
    /// Nothing is recorded unless every check passes.
    pub async fn vote_at(
        &self,
        category_id: &str,
        nominee_id: &str,
        channel: &str,
        voter_key: &str,
        now: DateTime<Utc>,
    ) -> AppResult<VoteOutcome> {
        let result = self
            .submit(category_id, nominee_id, channel, voter_key, now)
            .await;

        match &result {
            Ok(outcome) => tracing::info!(
                category = %outcome.category_id,
                nominee = %outcome.nominee_id,
                channel = %outcome.channel,
                weight = outcome.weight,
                "Vote recorded"
            ),
            Err(e) if e.is_rejection() => {
                tracing::debug!(category = %category_id, error = %e, "Vote rejected");
            }
            Err(e) if e.is_server_error() => {
                tracing::warn!(category = %category_id, error = %e, "Vote failed");
            }
            Err(e) => tracing::debug!(category = %category_id, error = %e, "Invalid vote"),
        }

        result
    }

    async fn submit(
        &self,
        category_id: &str,
        nominee_id: &str,
        channel: &str,
        voter_key: &str,
        now: DateTime<Utc>,
    ) -> AppResult<VoteOutcome> {
        if voter_key.is_empty() {
            return Err(AppError::BadRequest("Voter key is required".to_string()));
        }

        let category = self.categories.get_category(category_id).await?;
        if !category.is_active(now) {
            return Err(AppError::VotingClosed(category.id));
        }

        let channel: VoteChannel = channel.parse()?;
        let weight = channel.weight();

        let tally = self
            .tallies
            .record_vote(&category, nominee_id, voter_key, channel, weight)
            .await?;

        Ok(VoteOutcome {
            category_id: category.id,
            nominee_id: nominee_id.to_string(),
            channel,
            weight,
            tally,
        })
    }

    /// Whether the voter already voted in the category.
    pub async fn has_voted(&self, category_id: &str, voter_key: &str) -> AppResult<bool> {
        let category = self.categories.get_category(category_id).await?;
        self.tallies.has_voted(&category, voter_key).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::services::category::{Category, InMemoryCategoryRegistry};
    use crate::services::ranking::RankingService;
    use crate::services::tally::{InMemoryTallyStore, TallyStore};
    use chrono::Duration;
    use mosaique_db::entities::CategoryKind;

    struct Fixture {
        voting: VoteSubmissionService,
        ranking: RankingService,
        store: Arc<InMemoryTallyStore>,
        songs: Category,
    }

    fn fixture() -> Fixture {
        let now = Utc::now();
        let songs = Category::new(
            "song-of-month",
            CategoryKind::Song,
            "Song of the month",
            now - Duration::days(1),
            now + Duration::days(1),
            ["s1", "s2"],
        )
        .unwrap();
        let past = Category::new(
            "last-year",
            CategoryKind::Artist,
            "Artist of last year",
            now - Duration::days(400),
            now - Duration::days(35),
            ["a1"],
        )
        .unwrap();

        let registry = InMemoryCategoryRegistry::new();
        registry.register(songs.clone(), now - Duration::days(2)).unwrap();
        registry.register(past, now - Duration::days(500)).unwrap();
        let registry = Arc::new(registry);
        let store = Arc::new(InMemoryTallyStore::new());

        Fixture {
            voting: VoteSubmissionService::new(registry.clone(), store.clone()),
            ranking: RankingService::new(registry, store.clone()),
            store,
            songs,
        }
    }

    #[tokio::test]
    async fn test_scenario_weighted_ranking() {
        let f = fixture();

        f.voting.vote("song-of-month", "s1", "free", "v1").await.unwrap();
        let outcome = f.voting.vote("song-of-month", "s2", "premium", "v2").await.unwrap();
        assert_eq!(outcome.weight, 5);
        assert_eq!(outcome.tally.weighted_count, 5);

        let ranking = f.ranking.rank("song-of-month").await.unwrap();
        let view: Vec<_> = ranking
            .iter()
            .map(|r| (r.nominee_id.as_str(), r.weighted_count, r.rank))
            .collect();
        assert_eq!(view, [("s2", 5, 1), ("s1", 1, 2)]);
    }

    #[tokio::test]
    async fn test_scenario_repeat_voter_rejected() {
        let f = fixture();
        f.voting.vote("song-of-month", "s1", "free", "v1").await.unwrap();
        f.voting.vote("song-of-month", "s2", "premium", "v2").await.unwrap();

        let result = f.voting.vote("song-of-month", "s2", "sms", "v1").await;

        assert!(matches!(result, Err(AppError::AlreadyVoted(_))));
        let tally = f.store.get_tally(&f.songs).await.unwrap();
        assert_eq!(tally["s1"].weighted_count, 1);
        assert_eq!(tally["s2"].weighted_count, 5);
    }

    #[tokio::test]
    async fn test_scenario_closed_window() {
        let f = fixture();

        let result = f.voting.vote("last-year", "a1", "free", "v1").await;

        assert!(matches!(result, Err(AppError::VotingClosed(_))));
        assert!(f.store.events("last-year").unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_window_boundaries() {
        let f = fixture();

        let at_end = f
            .voting
            .vote_at("song-of-month", "s1", "free", "v1", f.songs.ends_at)
            .await;
        assert!(matches!(at_end, Err(AppError::VotingClosed(_))));

        f.voting
            .vote_at("song-of-month", "s1", "free", "v1", f.songs.starts_at)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_unknown_category() {
        let f = fixture();

        let result = f.voting.vote("nope", "s1", "free", "v1").await;
        assert!(matches!(result, Err(AppError::CategoryNotFound(_))));

        let result = f.voting.has_voted("nope", "v1").await;
        assert!(matches!(result, Err(AppError::CategoryNotFound(_))));
    }

    #[tokio::test]
    async fn test_invalid_channel_changes_nothing() {
        let f = fixture();

        let result = f.voting.vote("song-of-month", "s1", "fax", "v1").await;

        assert!(matches!(result, Err(AppError::InvalidChannel(_))));
        assert!(!f.voting.has_voted("song-of-month", "v1").await.unwrap());
    }

    #[tokio::test]
    async fn test_unknown_nominee_changes_nothing() {
        let f = fixture();

        let result = f.voting.vote("song-of-month", "s3", "sms", "v1").await;

        assert!(matches!(result, Err(AppError::UnknownNominee { .. })));
        assert!(f.store.events("song-of-month").unwrap().is_empty());
        assert!(!f.voting.has_voted("song-of-month", "v1").await.unwrap());
    }

    #[tokio::test]
    async fn test_sms_vote_weights_three() {
        let f = fixture();

        let outcome = f.voting.vote("song-of-month", "s1", "sms", "v1").await.unwrap();

        assert_eq!(outcome.channel, VoteChannel::Sms);
        assert_eq!(outcome.tally.weighted_count, 3);
        assert_eq!(outcome.tally.raw_count, 1);
        assert!(f.voting.has_voted("song-of-month", "v1").await.unwrap());
    }

    #[tokio::test]
    async fn test_empty_voter_key() {
        let f = fixture();

        let result = f.voting.vote("song-of-month", "s1", "free", "").await;
        assert!(matches!(result, Err(AppError::BadRequest(_))));
    }
}
