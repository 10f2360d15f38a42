//! Crate for interacting with the indexer backend.
//!
//! The backend stores indexing configuration, lists the user's database connections, receives
//! fetched assets and registers webhook subscriptions on behalf of the user.

mod client;
pub use client::*;
mod error;
pub use error::IndexerApiError;
pub mod types;
