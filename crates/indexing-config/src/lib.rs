//! Reconciliation of a user's indexing configuration.
//!
//! [`SelectionState`] is derived from the catalog of indexing types and the configs the user
//! already persisted, mutated through toggles and validated into the list of configs to save.
//! [`IndexingSession`] drives that flow against a [`ConfigStore`] and a [`ConnectionDirectory`].

mod reconciler;
mod remote;
mod session;

pub use indexer_api;
pub use reconciler::{SelectionState, UnknownTypeError, ValidationError, choose_default_database};
pub use remote::RemoteError;
pub use session::{ConfigStore, ConnectionDirectory, IndexingSession, Phase, SessionError};
