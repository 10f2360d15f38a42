//! Bindings for the indexer backend REST paths

use crate::error::IndexerApiError;
use crate::types::{
    Asset, CreateWebhookRequest, DatabaseConnection, ErrorResponse, IndexingType,
    NewUserIndexingConfig, StoreAssetsRequest, UserId, UserIndexingConfig, WebhookType,
};

/// Represents a singular REST request that can be done on the indexer backend
pub trait IndexerApiRequest {
    /// The successful result type to be returned
    type Res: serde::de::DeserializeOwned + core::fmt::Debug;
    /// The error type to be returned on invalid data
    type Error: serde::de::DeserializeOwned;
    /// The payload that we will send as json in the request body
    type Payload<'p>: serde::Serialize
    where
        Self: 'p;

    /// The HTTP method to use
    const METHOD: reqwest::Method;

    /// The full qualified path to send the request to.
    /// The `base_url` points to the backend root and ends with `/`
    ///
    /// # Errors
    ///
    /// This function will return an error if the path cannot be joined onto the base url
    fn path(&self, base_url: &url::Url) -> Result<url::Url, IndexerApiError>;
    /// The payload to send in the request body; ignored for `GET`
    fn payload(&self) -> Self::Payload<'_>;
}

/// GET `/indexing-types`: the catalog of indexing types
#[derive(Debug, Clone, Copy)]
pub struct ListIndexingTypes;

impl IndexerApiRequest for ListIndexingTypes {
    type Res = Vec<IndexingType>;
    type Error = ErrorResponse;
    type Payload<'p> = ();

    const METHOD: reqwest::Method = reqwest::Method::GET;

    fn path(&self, base_url: &url::Url) -> Result<url::Url, IndexerApiError> {
        base_url.join("indexing-types").map_err(IndexerApiError::from)
    }

    fn payload(&self) -> Self::Payload<'_> {}
}

/// GET `/users/{user}/indexing-configs`: the configs a user has persisted
#[derive(Debug, Clone, Copy)]
pub struct ListUserConfigs {
    /// whose configs to list
    pub user_id: UserId,
}

impl IndexerApiRequest for ListUserConfigs {
    type Res = Vec<UserIndexingConfig>;
    type Error = ErrorResponse;
    type Payload<'p> = ();

    const METHOD: reqwest::Method = reqwest::Method::GET;

    fn path(&self, base_url: &url::Url) -> Result<url::Url, IndexerApiError> {
        base_url
            .join(&format!("users/{}/indexing-configs", self.user_id))
            .map_err(IndexerApiError::from)
    }

    fn payload(&self) -> Self::Payload<'_> {}
}

/// POST `/indexing-configs`: persist a batch of configs
#[derive(Debug, Clone, Copy)]
pub struct SaveConfigs<'a> {
    /// configs to save, all marked active by the backend
    pub configs: &'a [NewUserIndexingConfig],
}

impl IndexerApiRequest for SaveConfigs<'_> {
    type Res = ();
    type Error = ErrorResponse;
    type Payload<'p>
        = &'p [NewUserIndexingConfig]
    where
        Self: 'p;

    const METHOD: reqwest::Method = reqwest::Method::POST;

    fn path(&self, base_url: &url::Url) -> Result<url::Url, IndexerApiError> {
        base_url.join("indexing-configs").map_err(IndexerApiError::from)
    }

    fn payload(&self) -> Self::Payload<'_> {
        self.configs
    }
}

/// GET `/users/{user}/database-connections`
#[derive(Debug, Clone, Copy)]
pub struct ListDatabaseConnections {
    /// whose connections to list
    pub user_id: UserId,
}

impl IndexerApiRequest for ListDatabaseConnections {
    type Res = Vec<DatabaseConnection>;
    type Error = ErrorResponse;
    type Payload<'p> = ();

    const METHOD: reqwest::Method = reqwest::Method::GET;

    fn path(&self, base_url: &url::Url) -> Result<url::Url, IndexerApiError> {
        base_url
            .join(&format!("users/{}/database-connections", self.user_id))
            .map_err(IndexerApiError::from)
    }

    fn payload(&self) -> Self::Payload<'_> {}
}

/// POST `/store-assets`: hand fetched assets to the storage backend
#[derive(Debug, Clone, Copy)]
pub struct StoreAssets<'a> {
    /// assets to store
    pub assets: &'a [Asset],
}

impl IndexerApiRequest for StoreAssets<'_> {
    type Res = ();
    type Error = ErrorResponse;
    type Payload<'p>
        = StoreAssetsRequest<'p>
    where
        Self: 'p;

    const METHOD: reqwest::Method = reqwest::Method::POST;

    fn path(&self, base_url: &url::Url) -> Result<url::Url, IndexerApiError> {
        base_url.join("store-assets").map_err(IndexerApiError::from)
    }

    fn payload(&self) -> Self::Payload<'_> {
        StoreAssetsRequest {
            assets: self.assets,
        }
    }
}

/// POST `/create-webhook`: register a webhook subscription
#[derive(Debug, Clone, Copy)]
pub struct CreateWebhook<'a> {
    /// subscription kind
    pub webhook_type: WebhookType,
    /// addresses to watch
    pub addresses: &'a [String],
}

impl IndexerApiRequest for CreateWebhook<'_> {
    type Res = ();
    type Error = ErrorResponse;
    type Payload<'p>
        = CreateWebhookRequest<'p>
    where
        Self: 'p;

    const METHOD: reqwest::Method = reqwest::Method::POST;

    fn path(&self, base_url: &url::Url) -> Result<url::Url, IndexerApiError> {
        base_url.join("create-webhook").map_err(IndexerApiError::from)
    }

    fn payload(&self) -> Self::Payload<'_> {
        CreateWebhookRequest {
            webhook_type: self.webhook_type,
            addresses: self.addresses,
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    fn base() -> url::Url {
        "https://backend.example/api/".parse().unwrap()
    }

    #[rstest]
    #[case::catalog(ListIndexingTypes.path(&base()), "https://backend.example/api/indexing-types")]
    #[case::configs(
        ListUserConfigs { user_id: UserId(7) }.path(&base()),
        "https://backend.example/api/users/7/indexing-configs"
    )]
    #[case::connections(
        ListDatabaseConnections { user_id: UserId(7) }.path(&base()),
        "https://backend.example/api/users/7/database-connections"
    )]
    #[case::save(SaveConfigs { configs: &[] }.path(&base()), "https://backend.example/api/indexing-configs")]
    #[case::store(StoreAssets { assets: &[] }.path(&base()), "https://backend.example/api/store-assets")]
    #[case::webhook(
        CreateWebhook { webhook_type: WebhookType::Lending, addresses: &[] }.path(&base()),
        "https://backend.example/api/create-webhook"
    )]
    fn test_paths(#[case] path: Result<url::Url, IndexerApiError>, #[case] expected: &str) {
        assert_eq!(path.unwrap().as_str(), expected);
    }
}
