#![expect(missing_docs, reason = "the error macro already is descriptive enough")]

/// Error variants for the Helius RPC client
#[derive(thiserror::Error, Debug)]
pub enum HeliusRpcError {
    #[error("Reqwest error {0}")]
    ReqwestWithMiddleware(#[from] reqwest_middleware::Error),
    #[error("Reqwest error {0}")]
    Reqwest(#[from] reqwest::Error),
    #[error("JSON error {0}")]
    Json(#[from] simd_json::Error),
    #[error("RPC endpoint answered with status {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },
    #[error("RPC error {code}: {message}")]
    Rpc { code: i64, message: String },
}
