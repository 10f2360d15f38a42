//! One-shot jobs against the Helius RPC and the indexer backend.
//!
//! Every job is an explicit entry point that never fails outright: the result is an outcome
//! value that keeps the failure kind and its cause, so callers decide how to degrade.

mod assets;
mod error;
mod webhooks;

pub use assets::{AssetFetchOutcome, fetch_assets_by_owner};
pub use error::BackendError;
pub use webhooks::{
    WebhookOutcome, WebhookRegistration, all_succeeded, register_webhook, register_webhooks,
};
