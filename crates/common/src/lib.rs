//! Common utilities and shared types for La Grande Mosaïque.
//!
//! This crate provides foundational components used across all mosaique crates:
//!
//! - **Configuration**: Application settings via [`Config`]
//! - **Error handling**: The voting error taxonomy via [`AppError`] and [`AppResult`]
//! - **ID Generation**: ULID-based vote event identifiers via [`IdGenerator`]
//!
//! # Example
//!
//! ```no_run
//! use mosaique_common::{Config, IdGenerator, AppResult};
//!
//! fn example() -> AppResult<()> {
//!     let config = Config::load()?;
//!     let id_gen = IdGenerator::new();
//!     let id = id_gen.generate();
//!     println!("Listening on port {} with event {}", config.server.port, id);
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod id;

pub use config::Config;
pub use error::{AppError, AppResult};
pub use id::IdGenerator;
