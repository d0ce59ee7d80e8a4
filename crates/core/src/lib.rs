//! Voting core for La Grande Mosaïque.
//!
//! Channel weighting, category lookup, tally storage, ranking and the vote
//! submission flow that ties them together.

pub mod services;

pub use services::*;
