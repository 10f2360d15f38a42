//! Crate for interacting with the Helius RPC provider.
//! Only the DAS ownership query is bound; every call goes through the JSON-RPC 2.0 envelope.

mod client;
pub use client::*;
mod error;
pub use error::HeliusRpcError;
pub mod types;
