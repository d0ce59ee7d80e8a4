//! Database entities.

pub mod category;
pub mod nominee;
pub mod vote_event;

pub use category::{CategoryKind, Entity as Category};
pub use nominee::Entity as Nominee;
pub use vote_event::Entity as VoteEvent;
