//! Types for the indexer backend API.
//! Field names follow the backend's camelCase JSON.

use core::fmt::{Display, Formatter};
use std::collections::BTreeMap;

pub use helius_rpc::types::Asset;
pub use id::*;
use serde::{Deserialize, Serialize};

/// Newtypes for the different integer ids so we don't mix them up
mod id {
    use super::*;

    /// Id of a user of the indexer
    #[derive(
        Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
    )]
    #[serde(transparent)]
    pub struct UserId(pub i64);

    /// Id of an [`IndexingType`] catalog entry
    #[derive(
        Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
    )]
    #[serde(transparent)]
    pub struct IndexingTypeId(pub i64);

    /// Id of a [`DatabaseConnection`]
    #[derive(
        Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
    )]
    #[serde(transparent)]
    pub struct DatabaseConnectionId(pub i64);

    impl Display for UserId {
        fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
            write!(f, "{}", self.0)
        }
    }

    impl Display for IndexingTypeId {
        fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
            write!(f, "{}", self.0)
        }
    }

    impl Display for DatabaseConnectionId {
        fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
            write!(f, "{}", self.0)
        }
    }
}

/// A category of on-chain data that can be materialized into the user's database.
///
/// Catalog entries are owned by the backend and read-only for us.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexingType {
    /// unique id
    pub id: IndexingTypeId,
    /// display name, e.g. `NFT Bids`
    pub name: String,
    /// short description shown next to the name
    pub description: String,
    /// icon identifier
    pub icon: String,
    /// table name -> schema descriptor of the tables this type creates
    #[serde(default)]
    pub tables_to_create: BTreeMap<String, serde_json::Value>,
}

impl IndexingType {
    /// Names of the tables this type creates, in name order
    pub fn table_names(&self) -> impl Iterator<Item = &str> {
        self.tables_to_create.keys().map(String::as_str)
    }
}

/// Persisted wish of a user to have an indexing type materialized into a database
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserIndexingConfig {
    /// owning user
    pub user_id: UserId,
    /// the indexing type this config enables
    pub indexing_type_id: IndexingTypeId,
    /// target database
    pub database_connection_id: DatabaseConnectionId,
    /// inactive configs are kept by the backend but not materialized
    pub active: bool,
}

/// A config as sent to the backend when saving; the backend marks it active
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewUserIndexingConfig {
    /// owning user
    pub user_id: UserId,
    /// the indexing type to enable
    pub indexing_type_id: IndexingTypeId,
    /// target database
    pub database_connection_id: DatabaseConnectionId,
}

/// A database owned by the user that indexed data can be written to
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatabaseConnection {
    /// unique id
    pub id: DatabaseConnectionId,
    /// display name
    pub name: String,
    /// host the database lives on
    pub hostname: String,
}

impl Display for DatabaseConnection {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        write!(f, "{} ({})", self.name, self.hostname)
    }
}

/// Webhook subscriptions the backend knows how to register
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WebhookType {
    /// bids placed on NFTs
    NftBids,
    /// lending protocol activity
    Lending,
}

impl Display for WebhookType {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::NftBids => write!(f, "nft_bids"),
            Self::Lending => write!(f, "lending"),
        }
    }
}

/// Body of `POST /create-webhook`
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CreateWebhookRequest<'a> {
    /// subscription kind
    #[serde(rename = "type")]
    pub webhook_type: WebhookType,
    /// addresses the webhook should watch
    pub addresses: &'a [String],
}

/// Body of `POST /store-assets`
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct StoreAssetsRequest<'a> {
    /// assets to persist
    pub assets: &'a [Asset],
}

/// Error body the backend answers with on failure
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// human readable reason
    pub error: String,
}

impl Display for ErrorResponse {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.error)
    }
}
