//! Category entity: one voting contest.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// What a category lets people vote on.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "lowercase")]
pub enum CategoryKind {
    /// Vote for a song.
    #[sea_orm(string_value = "song")]
    Song,
    /// Vote for an artist.
    #[sea_orm(string_value = "artist")]
    Artist,
    /// Head-to-head contest between exactly two sides.
    #[sea_orm(string_value = "battle")]
    Battle,
}

impl CategoryKind {
    /// Stable string form, as stored in the database.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Song => "song",
            Self::Artist => "artist",
            Self::Battle => "battle",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "category")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    pub kind: CategoryKind,

    /// Display title, opaque to the voting core
    pub title: String,

    /// Voting opens at this instant (inclusive)
    pub starts_at: DateTimeWithTimeZone,

    /// Voting closes at this instant (exclusive)
    pub ends_at: DateTimeWithTimeZone,

    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::nominee::Entity")]
    Nominee,

    #[sea_orm(has_many = "super::vote_event::Entity")]
    VoteEvent,
}

impl Related<super::nominee::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Nominee.def()
    }
}

impl Related<super::vote_event::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::VoteEvent.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
