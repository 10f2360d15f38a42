use indexer_api::IndexerApiClient;
use indexer_api::requests::IndexerApiRequest;
use indexer_api::types::ErrorResponse;

/// Failure of a fire-and-check call to the indexer backend
#[derive(thiserror::Error, Debug)]
pub enum BackendError {
    /// transport or decoding failure
    #[error(transparent)]
    Api(#[from] indexer_api::IndexerApiError),
    /// the backend answered with an error body
    #[error("{0}")]
    Rejected(ErrorResponse),
}

/// Send `request` and only care whether the backend accepted it
pub(crate) async fn post<T>(backend: &IndexerApiClient, request: &T) -> Result<(), BackendError>
where
    T: IndexerApiRequest<Error = ErrorResponse> + core::fmt::Debug,
{
    backend
        .build_request(request)?
        .execute()
        .await?
        .json_err()
        .await?
        .map_err(BackendError::Rejected)
}
