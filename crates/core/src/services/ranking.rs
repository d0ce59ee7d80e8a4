//! Ranking engine.
//!
//! Rankings are recomputed from the tally on every read.

use chrono::{DateTime, Utc};
use mosaique_common::{AppError, AppResult};
use mosaique_db::entities::CategoryKind;
use serde::Serialize;

use super::category::SharedCategoryRegistry;
use super::tally::{SharedTallyStore, Tally};

/// One line of a ranking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedNominee {
    pub nominee_id: String,
    pub weighted_count: u64,
    pub raw_count: u64,
    /// 1-based; tied counts share a rank (1, 1, 3).
    pub rank: u32,
}

/// One side of a battle.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BattleSide {
    pub nominee_id: String,
    pub weighted_count: u64,
    /// Share of the total, one decimal place.
    pub percent: f64,
}

/// Percentage split of a two-sided category.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BattleSplit {
    pub side1: BattleSide,
    pub side2: BattleSide,
    pub total: u64,
}

/// Totals and ranking of a category, for results pages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RankingSummary {
    pub category_id: String,
    pub kind: CategoryKind,
    pub total_weighted: u64,
    pub total_raw: u64,
    pub ranking: Vec<RankedNominee>,
    pub computed_at: DateTime<Utc>,
}

/// Order a tally by weighted count (descending), then nominee ID (ascending).
#[must_use]
pub fn rank_tally(tally: &Tally) -> Vec<RankedNominee> {
    let mut entries: Vec<_> = tally.iter().collect();
    entries.sort_by(|(a_id, a), (b_id, b)| {
        b.weighted_count
            .cmp(&a.weighted_count)
            .then_with(|| a_id.cmp(b_id))
    });

    let mut ranked: Vec<RankedNominee> = Vec::with_capacity(entries.len());
    for (position, (id, counts)) in entries.into_iter().enumerate() {
        let rank = match ranked.last() {
            Some(prev) if prev.weighted_count == counts.weighted_count => prev.rank,
            _ => u32::try_from(position + 1).unwrap_or(u32::MAX),
        };
        ranked.push(RankedNominee {
            nominee_id: id.clone(),
            weighted_count: counts.weighted_count,
            raw_count: counts.raw_count,
            rank,
        });
    }
    ranked
}

/// `weighted / total` as a percentage rounded half-up to one decimal.
///
/// A zero total gives 0 for every side.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn percent_of(weighted: u64, total: u64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let total = u128::from(total);
    let tenths = (u128::from(weighted) * 2000 + total) / (2 * total);
    tenths as f64 / 10.0
}

/// Split of a battle tally between its two sides.
#[must_use]
pub fn battle_split_of(sides: (&str, &str), tally: &Tally) -> BattleSplit {
    let weighted = |id: &str| tally.get(id).map_or(0, |t| t.weighted_count);
    let (w1, w2) = (weighted(sides.0), weighted(sides.1));
    let total = w1 + w2;

    BattleSplit {
        side1: BattleSide {
            nominee_id: sides.0.to_string(),
            weighted_count: w1,
            percent: percent_of(w1, total),
        },
        side2: BattleSide {
            nominee_id: sides.1.to_string(),
            weighted_count: w2,
            percent: percent_of(w2, total),
        },
        total,
    }
}

/// Read-side service over the registry and the tally store.
#[derive(Clone)]
pub struct RankingService {
    categories: SharedCategoryRegistry,
    tallies: SharedTallyStore,
}

impl RankingService {
    /// Create a new ranking service.
    #[must_use]
    pub fn new(categories: SharedCategoryRegistry, tallies: SharedTallyStore) -> Self {
        Self {
            categories,
            tallies,
        }
    }

    /// Rank the nominees of a category.
    pub async fn rank(&self, category_id: &str) -> AppResult<Vec<RankedNominee>> {
        let category = self.categories.get_category(category_id).await?;
        let tally = self.tallies.get_tally(&category).await?;
        Ok(rank_tally(&tally))
    }

    /// Percentage split of a battle category.
    pub async fn battle_split(&self, category_id: &str) -> AppResult<BattleSplit> {
        let category = self.categories.get_category(category_id).await?;
        let sides = category
            .sides()
            .ok_or_else(|| AppError::NotABattle(category_id.to_string()))?;
        let tally = self.tallies.get_tally(&category).await?;
        Ok(battle_split_of(sides, &tally))
    }

    /// Totals plus ranking of a category.
    pub async fn summary(&self, category_id: &str) -> AppResult<RankingSummary> {
        let category = self.categories.get_category(category_id).await?;
        let tally = self.tallies.get_tally(&category).await?;

        Ok(RankingSummary {
            category_id: category.id,
            kind: category.kind,
            total_weighted: tally.values().map(|t| t.weighted_count).sum(),
            total_raw: tally.values().map(|t| t.raw_count).sum(),
            ranking: rank_tally(&tally),
            computed_at: Utc::now(),
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::services::category::{Category, InMemoryCategoryRegistry};
    use crate::services::tally::{InMemoryTallyStore, NomineeTally, TallyStore};
    use crate::services::weight::VoteChannel;
    use chrono::Duration;

    fn counts(weighted: u64, raw: u64) -> NomineeTally {
        NomineeTally {
            weighted_count: weighted,
            raw_count: raw,
        }
    }

    fn category(id: &str, kind: CategoryKind, nominees: &[&str]) -> Category {
        let now = Utc::now();
        Category::new(
            id,
            kind,
            id,
            now - Duration::days(1),
            now + Duration::days(1),
            nominees.iter().copied(),
        )
        .unwrap()
    }

    async fn service_with(categories: Vec<Category>) -> (RankingService, Arc<InMemoryTallyStore>) {
        let registry = InMemoryCategoryRegistry::new();
        for c in categories {
            registry.register(c, Utc::now() - Duration::days(2)).unwrap();
        }
        let store = Arc::new(InMemoryTallyStore::new());
        let service = RankingService::new(Arc::new(registry), store.clone());
        (service, store)
    }

    #[test]
    fn test_rank_orders_by_weight() {
        let tally = Tally::from([("s1".to_string(), counts(1, 1)), ("s2".to_string(), counts(5, 1))]);

        let ranked = rank_tally(&tally);

        assert_eq!(ranked[0].nominee_id, "s2");
        assert_eq!(ranked[0].rank, 1);
        assert_eq!(ranked[1].nominee_id, "s1");
        assert_eq!(ranked[1].rank, 2);
    }

    #[test]
    fn test_ties_share_rank_and_order_by_id() {
        let tally = Tally::from([
            ("c".to_string(), counts(4, 2)),
            ("a".to_string(), counts(4, 4)),
            ("b".to_string(), counts(9, 3)),
            ("d".to_string(), counts(1, 1)),
        ]);

        let ranked = rank_tally(&tally);
        let view: Vec<_> = ranked.iter().map(|r| (r.nominee_id.as_str(), r.rank)).collect();

        assert_eq!(view, [("b", 1), ("a", 2), ("c", 2), ("d", 4)]);
    }

    #[test]
    fn test_rank_is_deterministic() {
        let tally: Tally = (0..50)
            .map(|i| (format!("n{i:02}"), counts(i % 7, 1)))
            .collect();

        let first = rank_tally(&tally);
        for _ in 0..10 {
            assert_eq!(rank_tally(&tally), first);
        }
    }

    #[test]
    fn test_zero_votes_all_rank_first() {
        let tally = Tally::from([("x".to_string(), counts(0, 0)), ("y".to_string(), counts(0, 0))]);
        assert!(rank_tally(&tally).iter().all(|r| r.rank == 1));
    }

    #[test]
    fn test_percent_rounding() {
        assert_eq!(percent_of(30, 100), 30.0);
        assert_eq!(percent_of(1, 3), 33.3);
        assert_eq!(percent_of(2, 3), 66.7);
        assert_eq!(percent_of(1, 8), 12.5);
        assert_eq!(percent_of(1, 16), 6.3);
        assert_eq!(percent_of(0, 0), 0.0);
    }

    #[test]
    fn test_battle_split_thirty_seventy() {
        let tally = Tally::from([("a".to_string(), counts(30, 10)), ("b".to_string(), counts(70, 14))]);

        let split = battle_split_of(("a", "b"), &tally);

        assert_eq!(split.side1.percent, 30.0);
        assert_eq!(split.side2.percent, 70.0);
        assert_eq!(split.total, 100);
    }

    #[test]
    fn test_battle_split_empty() {
        let split = battle_split_of(("a", "b"), &Tally::new());

        assert_eq!(split.side1.percent, 0.0);
        assert_eq!(split.side2.percent, 0.0);
        assert_eq!(split.total, 0);
    }

    #[tokio::test]
    async fn test_service_battle_split_without_votes() {
        let (service, _) = service_with(vec![category("clash", CategoryKind::Battle, &["a", "b"])]).await;

        let split = service.battle_split("clash").await.unwrap();

        assert_eq!(split.side1.nominee_id, "a");
        assert_eq!(split.side2.nominee_id, "b");
        assert_eq!(split.total, 0);
        assert_eq!(split.side1.percent, 0.0);
    }

    #[tokio::test]
    async fn test_service_rejects_split_of_song_category() {
        let (service, _) =
            service_with(vec![category("song-of-month", CategoryKind::Song, &["s1", "s2"])]).await;

        let result = service.battle_split("song-of-month").await;
        assert!(matches!(result, Err(AppError::NotABattle(_))));
    }

    #[tokio::test]
    async fn test_service_unknown_category() {
        let (service, _) = service_with(vec![]).await;

        let result = service.rank("nope").await;
        assert!(matches!(result, Err(AppError::CategoryNotFound(_))));
    }

    #[tokio::test]
    async fn test_summary_totals() {
        let songs = category("song-of-month", CategoryKind::Song, &["s1", "s2"]);
        let (service, store) = service_with(vec![songs.clone()]).await;
        store.record_vote(&songs, "s1", "v1", VoteChannel::Free, 1).await.unwrap();
        store.record_vote(&songs, "s2", "v2", VoteChannel::Premium, 5).await.unwrap();
        store.record_vote(&songs, "s2", "v3", VoteChannel::Sms, 3).await.unwrap();

        let summary = service.summary("song-of-month").await.unwrap();

        assert_eq!(summary.total_weighted, 9);
        assert_eq!(summary.total_raw, 3);
        assert_eq!(summary.ranking[0].nominee_id, "s2");
        assert_eq!(summary.ranking[0].raw_count, 2);
    }

    #[test]
    fn test_serializes_camel_case() {
        let split = battle_split_of(("a", "b"), &Tally::from([("a".to_string(), counts(1, 1))]));
        let json = serde_json::to_value(&split).unwrap();

        assert_eq!(json["side1"]["nomineeId"], "a");
        assert_eq!(json["side1"]["weightedCount"], 1);
        assert_eq!(json["side1"]["percent"], 100.0);
        assert_eq!(json["total"], 1);
    }
}
