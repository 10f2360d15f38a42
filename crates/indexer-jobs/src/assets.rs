use helius_rpc::requests::GetAssetsByOwner;
use helius_rpc::types::Asset;
use helius_rpc::{HeliusRpcClient, HeliusRpcError};
use indexer_api::IndexerApiClient;
use indexer_api::requests::StoreAssets;

use crate::error::{BackendError, post};

/// What became of an asset fetch
#[derive(Debug)]
pub enum AssetFetchOutcome {
    /// The RPC returned a result. `stored` tells whether forwarding it to storage worked.
    Fetched {
        /// the page of assets, possibly empty
        assets: Vec<Asset>,
        /// result of `POST /store-assets`
        stored: Result<(), BackendError>,
    },
    /// The RPC answered without a `result`; storage was not contacted
    MissingResult,
    /// The RPC call itself failed; storage was not contacted
    Failed(HeliusRpcError),
}

impl AssetFetchOutcome {
    /// true only when assets were fetched and stored
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Fetched { stored: Ok(()), .. })
    }

    /// The fetched assets, or nothing when the fetch failed in any way
    #[must_use]
    pub fn into_assets(self) -> Vec<Asset> {
        match self {
            Self::Fetched { assets, .. } => assets,
            Self::MissingResult | Self::Failed(_) => Vec::new(),
        }
    }
}

/// Fetch a page of assets owned by an address and forward it to the storage backend.
///
/// Storage is only contacted when the RPC returned a `result`.
#[tracing::instrument(skip(rpc, backend), fields(owner = %request.owner_address))]
pub async fn fetch_assets_by_owner(
    rpc: &HeliusRpcClient,
    backend: &IndexerApiClient,
    request: &GetAssetsByOwner<'_>,
) -> AssetFetchOutcome {
    let result = match get_assets(rpc, request).await {
        Ok(result) => result,
        Err(err) => {
            tracing::error!(%err, "asset fetch failed");
            return AssetFetchOutcome::Failed(err);
        }
    };
    let Some(list) = result else {
        tracing::warn!("rpc response carried no result");
        return AssetFetchOutcome::MissingResult;
    };

    let assets = list.items;
    tracing::info!(count = assets.len(), "fetched assets");

    let stored = post(backend, &StoreAssets { assets: &assets }).await;
    if let Err(ref err) = stored {
        tracing::error!(%err, "storing assets failed");
    }

    AssetFetchOutcome::Fetched { assets, stored }
}

async fn get_assets(
    rpc: &HeliusRpcClient,
    request: &GetAssetsByOwner<'_>,
) -> Result<Option<helius_rpc::types::AssetList>, HeliusRpcError> {
    rpc.build_request(request)?.execute().await?.result().await
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use test_log::test;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    const OWNER: &str = "Ai5spT4zukruzSm8m67ro1E2iuu92foU1fi1EvhMTPxj";

    struct Servers {
        rpc: MockServer,
        backend: MockServer,
    }

    impl Servers {
        async fn start() -> Self {
            Self {
                rpc: MockServer::start().await,
                backend: MockServer::start().await,
            }
        }

        fn clients(&self) -> (HeliusRpcClient, IndexerApiClient) {
            let rpc_url: url::Url = self.rpc.uri().parse().unwrap();
            (
                HeliusRpcClient::new(redact::Secret::new(rpc_url)).unwrap(),
                IndexerApiClient::new(self.backend.uri().parse().unwrap()).unwrap(),
            )
        }
    }

    fn request() -> GetAssetsByOwner<'static> {
        GetAssetsByOwner::builder().owner_address(OWNER).build()
    }

    async fn rpc_answers(servers: &Servers, body: serde_json::Value) {
        Mock::given(method("POST"))
            .and(body_partial_json(json!({
                "method": "getAssetsByOwner",
                "params": { "ownerAddress": OWNER, "page": 1, "limit": 1000 }
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .expect(1)
            .mount(&servers.rpc)
            .await;
    }

    #[test(tokio::test)]
    async fn test_assets_are_forwarded_to_storage() {
        let servers = Servers::start().await;
        rpc_answers(
            &servers,
            json!({ "jsonrpc": "2.0", "id": "helius-indexer", "result": {
                "total": 2, "limit": 1000, "page": 1,
                "items": [{ "id": "a1", "interface": "V1_NFT" }, { "id": "a2" }]
            }}),
        )
        .await;
        Mock::given(method("POST"))
            .and(path("/store-assets"))
            .and(body_partial_json(json!({
                "assets": [{ "id": "a1", "interface": "V1_NFT" }, { "id": "a2" }]
            })))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&servers.backend)
            .await;
        let (rpc, backend) = servers.clients();

        let outcome = fetch_assets_by_owner(&rpc, &backend, &request()).await;

        assert!(outcome.is_success());
        assert_eq!(
            outcome
                .into_assets()
                .into_iter()
                .map(|asset| asset.id)
                .collect::<Vec<_>>(),
            vec!["a1", "a2"]
        );
    }

    #[test(tokio::test)]
    async fn test_null_result_skips_storage() {
        let servers = Servers::start().await;
        rpc_answers(
            &servers,
            json!({ "jsonrpc": "2.0", "id": "helius-indexer", "result": null }),
        )
        .await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&servers.backend)
            .await;
        let (rpc, backend) = servers.clients();

        let outcome = fetch_assets_by_owner(&rpc, &backend, &request()).await;

        assert!(matches!(outcome, AssetFetchOutcome::MissingResult));
        assert_eq!(outcome.into_assets(), vec![]);
    }

    #[test(tokio::test)]
    async fn test_rpc_failure_skips_storage() {
        let servers = Servers::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&servers.rpc)
            .await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&servers.backend)
            .await;
        let (rpc, backend) = servers.clients();

        let outcome = fetch_assets_by_owner(&rpc, &backend, &request()).await;

        assert!(matches!(
            outcome,
            AssetFetchOutcome::Failed(HeliusRpcError::Status { .. })
        ));
        assert_eq!(outcome.into_assets(), vec![]);
    }

    #[test(tokio::test)]
    async fn test_storage_failure_keeps_fetched_assets() {
        let servers = Servers::start().await;
        rpc_answers(
            &servers,
            json!({ "jsonrpc": "2.0", "id": "helius-indexer", "result": { "items": [{ "id": "a1" }] } }),
        )
        .await;
        Mock::given(method("POST"))
            .and(path("/store-assets"))
            .respond_with(ResponseTemplate::new(500).set_body_json(json!({ "error": "disk full" })))
            .mount(&servers.backend)
            .await;
        let (rpc, backend) = servers.clients();

        let outcome = fetch_assets_by_owner(&rpc, &backend, &request()).await;

        assert!(!outcome.is_success());
        let AssetFetchOutcome::Fetched { assets, stored } = outcome else {
            panic!("expected fetched assets");
        };
        assert_eq!(assets.len(), 1);
        assert_eq!(stored.unwrap_err().to_string(), "disk full");
    }
}
