//! Repositories wrapping database access for each entity.

pub mod category;
pub mod nominee;
pub mod vote_event;

pub use category::CategoryRepository;
pub use nominee::NomineeRepository;
pub use vote_event::{NewVoteEvent, VoteEventRepository};
