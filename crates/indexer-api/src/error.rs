#![expect(missing_docs, reason = "the error macro already is descriptive enough")]

/// Error variants for the indexer backend API
#[derive(thiserror::Error, Debug)]
pub enum IndexerApiError {
    #[error("Reqwest error {0}")]
    ReqwestWithMiddleware(#[from] reqwest_middleware::Error),
    #[error("Reqwest error {0}")]
    Reqwest(#[from] reqwest::Error),
    #[error("Url parse error {0}")]
    UrlParse(#[from] url::ParseError),
    #[error("JSON error {0}")]
    Json(#[from] simd_json::Error),
    #[error("Unexpected response with status {status}: {body}")]
    UnexpectedResponse {
        status: reqwest::StatusCode,
        body: String,
    },
}
