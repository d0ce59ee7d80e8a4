//! HTTP API layer for La Grande Mosaïque.
//!
//! A thin JSON adapter over the voting core:
//!
//! - **Endpoints**: cast a vote, read rankings and battle splits
//! - **Extractors**: the caller-supplied voter key
//!
//! Built on Axum 0.8.

pub mod endpoints;
pub mod extractors;
pub mod middleware;
pub mod response;

pub use endpoints::router;
pub use middleware::AppState;
