pub mod requests;
use core::marker::PhantomData;
use std::borrow::Cow;

use requests::HeliusRpcRequest;
use reqwest::header;
use reqwest_middleware::{ClientBuilder, Extension};
use reqwest_tracing::{OtelName, TracingMiddleware};
use tracing::instrument;

use crate::error::HeliusRpcError;
use crate::types::{JSON_RPC_VERSION, JsonRpcRequest, JsonRpcResponse};

const DEFAULT_REQUEST_ID: &str = "helius-indexer";

/// Client for the Helius RPC.
///
/// The RPC url carries the api key as a query parameter, so it is kept redacted.
#[derive(Clone, Debug)]
pub struct HeliusRpcClient {
    inner: reqwest_middleware::ClientWithMiddleware,
    url: redact::Secret<url::Url>,
    request_id: Cow<'static, str>,
}

impl HeliusRpcClient {
    /// Create a new `HeliusRpcClient`.
    ///
    /// # Errors
    ///
    /// This function will return an error if the underlying reqwest client cannot be constructed
    #[tracing::instrument(skip_all, name = "creating helius rpc client")]
    pub fn new(url: redact::Secret<url::Url>) -> Result<Self, HeliusRpcError> {
        Ok(Self {
            inner: rpc_client()?,
            url,
            request_id: Cow::Borrowed(DEFAULT_REQUEST_ID),
        })
    }

    /// Override the JSON-RPC `id` sent with every call
    #[must_use]
    pub fn with_request_id(mut self, request_id: impl Into<Cow<'static, str>>) -> Self {
        self.request_id = request_id.into();
        self
    }

    /// Wrap a method call into a JSON-RPC envelope
    #[instrument(name = "build_rpc_request", skip(self, request))]
    pub fn build_request<'a, T>(&self, request: &T) -> Result<RpcRequest<T::Res>, HeliusRpcError>
    where
        T: HeliusRpcRequest<'a> + core::fmt::Debug,
    {
        let envelope = JsonRpcRequest {
            jsonrpc: JSON_RPC_VERSION,
            id: Cow::Borrowed(self.request_id.as_ref()),
            method: T::METHOD,
            params: request.params(),
        };
        let payload = simd_json::to_vec(&envelope)?;

        let json = String::from_utf8_lossy(payload.as_slice());
        tracing::trace!(request_body = %json, "Request JSON");

        let reqwest_req = self
            .inner
            .post(self.url.expose_secret().as_str())
            .body(payload);

        Ok(RpcRequest {
            request: reqwest_req,
            method: T::METHOD,
            result: PhantomData,
        })
    }
}

/// Encapsulated JSON-RPC call
#[derive(Debug)]
pub struct RpcRequest<T> {
    request: reqwest_middleware::RequestBuilder,
    method: &'static str,
    result: PhantomData<T>,
}

impl<T> RpcRequest<T> {
    /// execute the JSON-RPC call
    #[instrument(name = "execute_rpc_request", skip(self), fields(rpc_method = self.method))]
    pub async fn execute(self) -> Result<RpcResponse<T>, HeliusRpcError> {
        let (client, request) = self.request.build_split();
        let request = request?;

        let response = client.execute(request).await?;

        Ok(RpcResponse {
            response,
            result: PhantomData,
            span: tracing::Span::current(),
        })
    }
}

/// The raw response of a JSON-RPC call
pub struct RpcResponse<T> {
    response: reqwest::Response,
    result: PhantomData<T>,
    // carries the context of the `RpcRequest`
    span: tracing::Span,
}

impl<T> RpcResponse<T> {
    /// Parse the JSON-RPC envelope and hand out its `result`.
    ///
    /// `Ok(None)` means the call went through but the server sent no `result`.
    #[instrument(name = "parse_rpc_result", skip(self), err, parent = &self.span)]
    pub async fn result(self) -> Result<Option<T>, HeliusRpcError>
    where
        T: serde::de::DeserializeOwned,
    {
        let status = self.response.status();
        let mut bytes = self.response.bytes().await?.to_vec();
        let json = String::from_utf8_lossy(bytes.as_ref()).into_owned();

        if !status.is_success() {
            tracing::error!(status = %status, body = %json, "Failed to execute rpc call");
            return Err(HeliusRpcError::Status { status, body: json });
        }
        tracing::trace!(response_body = %json, "Response JSON");

        let envelope = simd_json::from_slice::<JsonRpcResponse<T>>(bytes.as_mut())?;
        if let Some(error) = envelope.error {
            return Err(HeliusRpcError::Rpc {
                code: error.code,
                message: error.message,
            });
        }
        Ok(envelope.result)
    }
}

fn rpc_client() -> Result<reqwest_middleware::ClientWithMiddleware, HeliusRpcError> {
    let mut headers = header::HeaderMap::new();
    headers.insert(
        "Accept",
        header::HeaderValue::from_static("application/json"),
    );
    headers.insert(
        "Accept-Encoding",
        header::HeaderValue::from_static("gzip, deflate"),
    );
    headers.insert(
        "Content-Type",
        header::HeaderValue::from_static("application/json"),
    );

    let client = reqwest::Client::builder()
        .use_rustls_tls()
        .default_headers(headers)
        .build()?;
    let client = ClientBuilder::new(client)
        .with_init(Extension(OtelName("helius-rpc-client".into())))
        .with(TracingMiddleware::default())
        .build();
    Ok(client)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use test_log::test;
    use wiremock::matchers::{body_partial_json, method};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::requests::GetAssetsByOwner;
    use super::*;

    const OWNER: &str = "Ai5spT4zukruzSm8m67ro1E2iuu92foU1fi1EvhMTPxj";

    async fn client_for(server: &MockServer) -> HeliusRpcClient {
        let url: url::Url = server.uri().parse().unwrap();
        HeliusRpcClient::new(redact::Secret::new(url)).unwrap()
    }

    async fn get_assets(client: &HeliusRpcClient) -> Result<Option<crate::types::AssetList>, HeliusRpcError> {
        let request = GetAssetsByOwner::builder().owner_address(OWNER).build();
        client
            .build_request(&request)
            .unwrap()
            .execute()
            .await?
            .result()
            .await
    }

    #[test(tokio::test)]
    async fn test_get_assets_by_owner_sends_envelope() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(body_partial_json(json!({
                "jsonrpc": "2.0",
                "method": "getAssetsByOwner",
                "params": { "ownerAddress": OWNER, "page": 1, "limit": 1000 }
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "jsonrpc": "2.0",
                "id": "helius-indexer",
                "result": {
                    "total": 1,
                    "limit": 1000,
                    "page": 1,
                    "items": [{ "id": "asset-1", "interface": "V1_NFT" }]
                }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let list = get_assets(&client_for(&server).await).await.unwrap().unwrap();

        assert_eq!(list.total, Some(1));
        assert_eq!(list.items.len(), 1);
        assert_eq!(list.items[0].id, "asset-1");
    }

    #[test(tokio::test)]
    async fn test_request_id_override_is_sent() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(body_partial_json(json!({ "id": "indexer-prod" })))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "jsonrpc": "2.0", "id": "indexer-prod", "result": null })),
            )
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server).await.with_request_id("indexer-prod");

        assert_eq!(get_assets(&client).await.unwrap(), None);
    }

    #[test(tokio::test)]
    async fn test_default_request_id() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(body_partial_json(json!({ "id": "helius-indexer" })))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "jsonrpc": "2.0", "id": "helius-indexer", "result": null })),
            )
            .expect(1)
            .mount(&server)
            .await;

        assert_eq!(get_assets(&client_for(&server).await).await.unwrap(), None);
    }

    #[test(tokio::test)]
    async fn test_missing_result_is_none() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "jsonrpc": "2.0", "id": "helius-indexer", "result": null })),
            )
            .mount(&server)
            .await;

        let result = get_assets(&client_for(&server).await).await.unwrap();

        assert_eq!(result, None);
    }

    #[test(tokio::test)]
    async fn test_rpc_error_object_is_surfaced() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "jsonrpc": "2.0",
                "id": "helius-indexer",
                "error": { "code": -32602, "message": "invalid owner" }
            })))
            .mount(&server)
            .await;

        let err = get_assets(&client_for(&server).await).await.unwrap_err();

        assert!(
            matches!(err, HeliusRpcError::Rpc { code: -32602, ref message } if message == "invalid owner"),
            "unexpected error {err:?}"
        );
    }

    #[test(tokio::test)]
    async fn test_http_error_status_is_surfaced() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(401).set_body_string("unauthorized"))
            .mount(&server)
            .await;

        let err = get_assets(&client_for(&server).await).await.unwrap_err();

        assert!(
            matches!(err, HeliusRpcError::Status { status, ref body } if status == 401 && body == "unauthorized"),
            "unexpected error {err:?}"
        );
    }

    #[test]
    fn test_debug_output_redacts_url() {
        let url: url::Url = "https://mainnet.helius-rpc.com/?api-key=super-secret"
            .parse()
            .unwrap();
        let client = HeliusRpcClient::new(redact::Secret::new(url)).unwrap();
        assert!(!format!("{client:?}").contains("super-secret"));
    }
}
