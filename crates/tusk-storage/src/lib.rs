//! Storage abstraction for tusk.
//!
//! The server works exclusively against the [`Store`] trait; backend crates
//! (e.g. `tusk-store-sqlite`) supply the implementation. Nothing here knows
//! about HTTP, tokens or validation rules.

mod store;
mod types;

pub use store::*;
pub use types::*;

use thiserror::Error;

/// Uniform error type for all storage backends.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The requested record does not exist.
    #[error("not found")]
    NotFound,

    /// A uniqueness constraint (username, email) was violated.
    #[error("already exists")]
    AlreadyExists,

    /// Backend-specific failure, carried as text for the log.
    #[error("backend error: {0}")]
    Backend(String),
}
