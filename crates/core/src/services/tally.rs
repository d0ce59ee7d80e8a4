//! Tally storage.
//!
//! A tally store keeps, per category, the weighted and raw vote counts of
//! every nominee together with the set of voters who already voted. Checking
//! a voter and crediting a nominee happen as one indivisible step.

use std::collections::{BTreeMap, HashSet};
use std::future::Future;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mosaique_common::{AppError, AppResult, IdGenerator};
use mosaique_db::{
    entities::nominee,
    repositories::{NewVoteEvent, NomineeRepository, VoteEventRepository},
};
use serde::Serialize;

use super::category::Category;
use super::weight::VoteChannel;

/// Counters of one nominee.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NomineeTally {
    pub weighted_count: u64,
    pub raw_count: u64,
}

/// Snapshot of a category: nominee ID to counters, ordered by ID.
pub type Tally = BTreeMap<String, NomineeTally>;

/// A counted vote, as kept in the audit log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordedVote {
    pub id: String,
    pub category_id: String,
    pub nominee_id: String,
    pub voter_key: String,
    pub channel: VoteChannel,
    pub weight: u32,
    pub cast_at: DateTime<Utc>,
}

/// Storage for tallies and the one-vote-per-voter guard.
#[async_trait]
pub trait TallyStore: Send + Sync {
    /// Whether the voter already has a counted vote in the category.
    async fn has_voted(&self, category: &Category, voter_key: &str) -> AppResult<bool>;

    /// Count a vote.
    ///
    /// Fails with [`AppError::AlreadyVoted`] if the voter already voted in
    /// this category, or [`AppError::UnknownNominee`] if the nominee is not
    /// part of it. On failure nothing changes. On success the nominee's
    /// weighted count grows by `weight` and its raw count by one, and the
    /// nominee's new counters are returned.
    async fn record_vote(
        &self,
        category: &Category,
        nominee_id: &str,
        voter_key: &str,
        channel: VoteChannel,
        weight: u32,
    ) -> AppResult<NomineeTally>;

    /// Counters of every nominee of the category.
    async fn get_tally(&self, category: &Category) -> AppResult<Tally>;
}

/// Type alias for a shared tally store.
pub type SharedTallyStore = Arc<dyn TallyStore>;

/// Run a storage call under a deadline.
///
/// Expiry is reported as [`AppError::StorageUnavailable`]. The call is not
/// retried: after a timeout the caller cannot know whether the write landed.
pub(crate) async fn within<T, F>(timeout: Duration, fut: F) -> AppResult<T>
where
    F: Future<Output = AppResult<T>>,
{
    tokio::time::timeout(timeout, fut).await.map_err(|_| {
        tracing::warn!(timeout_ms = timeout.as_millis() as u64, "Storage call timed out");
        AppError::StorageUnavailable(format!("no response within {}ms", timeout.as_millis()))
    })?
}

#[derive(Default)]
struct Ledger {
    voters: HashSet<(String, String)>,
    tallies: BTreeMap<String, Tally>,
    events: Vec<RecordedVote>,
}

/// Tally store held in memory.
///
/// One lock covers the voter set, the counters and the event log, so every
/// reader sees a state either before or after a vote, never in between.
#[derive(Default)]
pub struct InMemoryTallyStore {
    ledger: Mutex<Ledger>,
    id_gen: IdGenerator,
}

impl InMemoryTallyStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Votes counted in a category, in the order they were accepted.
    pub fn events(&self, category_id: &str) -> AppResult<Vec<RecordedVote>> {
        let ledger = self.lock()?;
        Ok(ledger
            .events
            .iter()
            .filter(|e| e.category_id == category_id)
            .cloned()
            .collect())
    }

    fn lock(&self) -> AppResult<std::sync::MutexGuard<'_, Ledger>> {
        self.ledger
            .lock()
            .map_err(|_| AppError::Internal("tally store lock poisoned".to_string()))
    }
}

#[async_trait]
impl TallyStore for InMemoryTallyStore {
    async fn has_voted(&self, category: &Category, voter_key: &str) -> AppResult<bool> {
        let ledger = self.lock()?;
        Ok(ledger
            .voters
            .contains(&(category.id.clone(), voter_key.to_string())))
    }

    async fn record_vote(
        &self,
        category: &Category,
        nominee_id: &str,
        voter_key: &str,
        channel: VoteChannel,
        weight: u32,
    ) -> AppResult<NomineeTally> {
        let mut ledger = self.lock()?;

        let voter = (category.id.clone(), voter_key.to_string());
        if ledger.voters.contains(&voter) {
            return Err(AppError::AlreadyVoted(category.id.clone()));
        }
        if !category.contains(nominee_id) {
            return Err(AppError::UnknownNominee {
                category: category.id.clone(),
                nominee: nominee_id.to_string(),
            });
        }

        let entry = ledger
            .tallies
            .entry(category.id.clone())
            .or_default()
            .entry(nominee_id.to_string())
            .or_default();
        entry.weighted_count += u64::from(weight);
        entry.raw_count += 1;
        let updated = *entry;

        ledger.voters.insert(voter);
        let event = RecordedVote {
            id: self.id_gen.generate(),
            category_id: category.id.clone(),
            nominee_id: nominee_id.to_string(),
            voter_key: voter_key.to_string(),
            channel,
            weight,
            cast_at: Utc::now(),
        };
        ledger.events.push(event);

        Ok(updated)
    }

    async fn get_tally(&self, category: &Category) -> AppResult<Tally> {
        let ledger = self.lock()?;
        let counted = ledger.tallies.get(&category.id);

        Ok(category
            .nominees()
            .iter()
            .map(|id| {
                let tally = counted.and_then(|t| t.get(id)).copied().unwrap_or_default();
                (id.clone(), tally)
            })
            .collect())
    }
}

/// Tally store backed by the `nominee` and `vote_event` tables.
///
/// Idempotency rests on the unique index over `(category_id, voter_key)`;
/// the event insert and the counter update share one transaction.
#[derive(Clone)]
pub struct DatabaseTallyStore {
    vote_repo: VoteEventRepository,
    nominee_repo: NomineeRepository,
    id_gen: IdGenerator,
    timeout: Duration,
}

impl DatabaseTallyStore {
    /// Create a new database-backed tally store.
    #[must_use]
    pub const fn new(
        vote_repo: VoteEventRepository,
        nominee_repo: NomineeRepository,
        timeout: Duration,
    ) -> Self {
        Self {
            vote_repo,
            nominee_repo,
            id_gen: IdGenerator::new(),
            timeout,
        }
    }
}

fn tally_of(model: &nominee::Model) -> AppResult<NomineeTally> {
    let count = |value: i64| {
        u64::try_from(value).map_err(|_| {
            AppError::Internal(format!("Negative vote count for nominee {}", model.id))
        })
    };
    Ok(NomineeTally {
        weighted_count: count(model.weighted_votes)?,
        raw_count: count(model.raw_votes)?,
    })
}

#[async_trait]
impl TallyStore for DatabaseTallyStore {
    async fn has_voted(&self, category: &Category, voter_key: &str) -> AppResult<bool> {
        within(self.timeout, self.vote_repo.has_voted(&category.id, voter_key)).await
    }

    async fn record_vote(
        &self,
        category: &Category,
        nominee_id: &str,
        voter_key: &str,
        channel: VoteChannel,
        weight: u32,
    ) -> AppResult<NomineeTally> {
        let weight = i32::try_from(weight)
            .map_err(|_| AppError::Internal(format!("Vote weight {weight} out of range")))?;
        let event = NewVoteEvent {
            id: self.id_gen.generate(),
            category_id: category.id.clone(),
            nominee_id: nominee_id.to_string(),
            voter_key: voter_key.to_string(),
            channel: channel.as_str().to_string(),
            weight,
        };

        let updated = within(self.timeout, self.vote_repo.record(event)).await?;
        tally_of(&updated)
    }

    async fn get_tally(&self, category: &Category) -> AppResult<Tally> {
        let rows = within(self.timeout, self.nominee_repo.find_by_category(&category.id)).await?;
        rows.iter()
            .map(|row| Ok((row.id.clone(), tally_of(row)?)))
            .collect()
    }
}
