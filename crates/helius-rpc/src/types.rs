//! Types for the Helius JSON-RPC surface.
//! Asset objects are only partially typed: everything beyond `id` is carried verbatim so it
//! can be forwarded to storage without loss.

use std::borrow::Cow;

use serde::{Deserialize, Serialize};

/// JSON-RPC protocol version sent with every request
pub const JSON_RPC_VERSION: &str = "2.0";

/// Envelope of an outgoing JSON-RPC call
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JsonRpcRequest<'a, P> {
    /// always [`JSON_RPC_VERSION`]
    pub jsonrpc: &'static str,
    /// Caller chosen id, echoed back by the server
    pub id: Cow<'a, str>,
    /// The RPC method name
    pub method: &'static str,
    /// Method parameters
    pub params: P,
}

/// Envelope of a JSON-RPC response.
///
/// `result` may be absent (or `null`) even on a successful HTTP exchange.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct JsonRpcResponse<T> {
    /// Method result
    pub result: Option<T>,
    /// Error object, set when the call failed on the RPC level
    #[serde(default)]
    pub error: Option<JsonRpcError>,
}

/// JSON-RPC error object
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct JsonRpcError {
    /// numeric error code
    pub code: i64,
    /// human readable message
    pub message: String,
}

/// Parameters of `getAssetsByOwner`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GetAssetsByOwnerParams<'a> {
    /// base58 address owning the assets
    pub owner_address: Cow<'a, str>,
    /// 1-based page index
    pub page: u32,
    /// max items per page
    pub limit: u32,
}

/// A page of assets as returned by `getAssetsByOwner`
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AssetList {
    /// total amount of items on this page
    #[serde(default)]
    pub total: Option<u32>,
    /// the limit the server applied
    #[serde(default)]
    pub limit: Option<u32>,
    /// the page the server returned
    #[serde(default)]
    pub page: Option<u32>,
    /// the assets themselves
    #[serde(default)]
    pub items: Vec<Asset>,
}

/// A token or NFT owned by an address
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Asset {
    /// asset id (mint address)
    pub id: String,
    /// all remaining fields, untouched
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Asset {
    /// asset interface, e.g. `V1_NFT` or `FungibleToken`
    #[must_use]
    pub fn interface(&self) -> Option<&str> {
        self.extra.get("interface").and_then(serde_json::Value::as_str)
    }
}
