//! Business logic services.

#![allow(missing_docs)]

pub mod category;
pub mod ranking;
pub mod tally;
pub mod voting;
pub mod weight;

pub use category::{
    Category, CategoryRegistry, DatabaseCategoryRegistry, InMemoryCategoryRegistry,
    SharedCategoryRegistry,
};
pub use mosaique_db::entities::CategoryKind;
pub use ranking::{
    BattleSide, BattleSplit, RankedNominee, RankingService, RankingSummary, battle_split_of,
    percent_of, rank_tally,
};
pub use tally::{
    DatabaseTallyStore, InMemoryTallyStore, NomineeTally, RecordedVote, SharedTallyStore, Tally,
    TallyStore,
};
pub use voting::{VoteOutcome, VoteSubmissionService};
pub use weight::{VoteChannel, weight_for};
