//! [`ConfigStore`] and [`ConnectionDirectory`] backed by the indexer backend

use indexer_api::IndexerApiClient;
use indexer_api::requests::{
    IndexerApiRequest, ListDatabaseConnections, ListIndexingTypes, ListUserConfigs, SaveConfigs,
};
use indexer_api::types::{
    DatabaseConnection, ErrorResponse, IndexingType, NewUserIndexingConfig, UserId,
    UserIndexingConfig,
};

use crate::session::{ConfigStore, ConnectionDirectory};

/// Failure talking to the indexer backend
#[derive(thiserror::Error, Debug)]
pub enum RemoteError {
    /// transport or decoding failure
    #[error(transparent)]
    Api(#[from] indexer_api::IndexerApiError),
    /// the backend answered with an error body
    #[error("backend rejected the request: {0}")]
    Rejected(ErrorResponse),
}

async fn fetch<T>(client: &IndexerApiClient, request: &T) -> Result<T::Res, RemoteError>
where
    T: IndexerApiRequest<Error = ErrorResponse> + core::fmt::Debug,
{
    client
        .build_request(request)?
        .execute()
        .await?
        .json()
        .await?
        .map_err(RemoteError::Rejected)
}

impl ConfigStore for IndexerApiClient {
    type Error = RemoteError;

    async fn list_indexing_types(&self) -> Result<Vec<IndexingType>, RemoteError> {
        fetch(self, &ListIndexingTypes).await
    }

    async fn list_user_configs(&self, user_id: UserId) -> Result<Vec<UserIndexingConfig>, RemoteError> {
        fetch(self, &ListUserConfigs { user_id }).await
    }

    async fn save_configs(&self, configs: &[NewUserIndexingConfig]) -> Result<(), RemoteError> {
        self.build_request(&SaveConfigs { configs })?
            .execute()
            .await?
            .json_err()
            .await?
            .map_err(RemoteError::Rejected)
    }
}

impl ConnectionDirectory for IndexerApiClient {
    type Error = RemoteError;

    async fn list_connections(&self, user_id: UserId) -> Result<Vec<DatabaseConnection>, RemoteError> {
        fetch(self, &ListDatabaseConnections { user_id }).await
    }
}
