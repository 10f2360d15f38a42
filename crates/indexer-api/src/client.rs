pub mod requests;
use core::marker::PhantomData;

use requests::IndexerApiRequest;
use reqwest::header;
use reqwest_middleware::{ClientBuilder, Extension};
use reqwest_tracing::{OtelName, TracingMiddleware};
use tracing::instrument;

use crate::error::IndexerApiError;

/// Client for the indexer backend
#[derive(Clone, Debug)]
pub struct IndexerApiClient {
    inner: reqwest_middleware::ClientWithMiddleware,
    url: url::Url,
}

impl IndexerApiClient {
    /// Create a new `IndexerApiClient`.
    ///
    /// Paths are joined relative to `url`, so a missing trailing `/` is added.
    ///
    /// # Errors
    ///
    /// This function will return an error if the underlying reqwest client cannot be constructed
    #[tracing::instrument(name = "creating indexer api client")]
    pub fn new(mut url: url::Url) -> Result<Self, IndexerApiError> {
        if !url.path().ends_with('/') {
            let path = format!("{}/", url.path());
            url.set_path(&path);
        }
        Ok(Self {
            url,
            inner: backend_client()?,
        })
    }

    /// The base url every request path is joined onto
    #[must_use]
    pub const fn base_url(&self) -> &url::Url {
        &self.url
    }

    /// Build a request to the indexer backend
    #[instrument(name = "build_request", skip(self, request))]
    pub fn build_request<T>(
        &self,
        request: &T,
    ) -> Result<IndexerRequest<T::Res, T::Error>, IndexerApiError>
    where
        T: IndexerApiRequest + core::fmt::Debug,
    {
        let endpoint = request.path(&self.url)?;
        let method = T::METHOD;
        let mut reqwest_req = self.inner.request(method.clone(), endpoint.as_str());

        if method != reqwest::Method::GET {
            let payload = simd_json::to_vec(&request.payload())?;

            let json = String::from_utf8_lossy(payload.as_slice());
            tracing::trace!(request_body = %json, "Request JSON");

            reqwest_req = reqwest_req.body(payload);
        }

        Ok(IndexerRequest {
            request: reqwest_req,
            result: PhantomData,
            err: PhantomData,
        })
    }
}

/// Encapsulated HTTP request for the indexer backend
#[derive(Debug)]
pub struct IndexerRequest<T, E> {
    request: reqwest_middleware::RequestBuilder,
    result: PhantomData<T>,
    err: PhantomData<E>,
}

impl<T, E> IndexerRequest<T, E> {
    /// execute an indexer backend request
    #[instrument(name = "execute_request", skip(self), fields(method, url))]
    pub async fn execute(self) -> Result<IndexerResponse<T, E>, IndexerApiError> {
        let (client, request) = self.request.build_split();
        let request = request?;

        let span = tracing::Span::current();
        span.record("method", request.method().as_str());
        span.record("url", request.url().as_str());

        let response = client.execute(request).await?;

        Ok(IndexerResponse {
            response,
            result: PhantomData,
            err: PhantomData,
            span,
        })
    }
}

/// The raw response of an indexer backend request
pub struct IndexerResponse<T, E> {
    response: reqwest::Response,
    result: PhantomData<T>,
    err: PhantomData<E>,
    // this span carries the context of the `IndexerRequest`
    span: tracing::Span,
}

impl<T, E> IndexerResponse<T, E> {
    /// Check if the returned HTTP result is an error;
    /// Only parse the error type if we received an error.
    ///
    /// Useful for endpoints whose success body carries nothing we need.
    #[instrument(name = "parse_response_json_err", skip(self), err, parent = &self.span)]
    pub async fn json_err(self) -> Result<Result<(), E>, IndexerApiError>
    where
        E: serde::de::DeserializeOwned,
    {
        let status = self.response.status();
        if status.is_success() {
            Ok(Ok(()))
        } else {
            let bytes = self.response.bytes().await?.to_vec();
            let res = parse_backend_error::<E>(bytes, status)?;
            Ok(Err(res))
        }
    }

    /// Parse the response json
    #[instrument(name = "parse_response_json", skip(self), err, parent = &self.span)]
    pub async fn json(self) -> Result<Result<T, E>, IndexerApiError>
    where
        T: serde::de::DeserializeOwned,
        E: serde::de::DeserializeOwned,
    {
        let status = self.response.status();
        let mut bytes = self.response.bytes().await?.to_vec();
        if status.is_success() {
            let json = String::from_utf8_lossy(bytes.as_ref());
            tracing::trace!(response_body = %json, "Response JSON");

            let result = simd_json::from_slice::<T>(bytes.as_mut())?;
            Ok(Ok(result))
        } else {
            let res = parse_backend_error::<E>(bytes, status)?;
            Ok(Err(res))
        }
    }
}

fn parse_backend_error<E>(
    mut bytes: Vec<u8>,
    status: reqwest::StatusCode,
) -> Result<E, IndexerApiError>
where
    E: serde::de::DeserializeOwned,
{
    let body = String::from_utf8_lossy(bytes.as_ref()).into_owned();
    tracing::error!(
        status = %status,
        body = %body,
        "Failed to execute request"
    );

    // Flask answers with an html page on unhandled errors
    simd_json::from_slice::<E>(bytes.as_mut())
        .map_err(|_err| IndexerApiError::UnexpectedResponse { status, body })
}

fn backend_client() -> Result<reqwest_middleware::ClientWithMiddleware, IndexerApiError> {
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
        .with_init(Extension(OtelName("indexer-api-client".into())))
        .with(TracingMiddleware::default())
        .build();
    Ok(client)
}
