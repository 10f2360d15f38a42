//! Bindings for the Helius RPC [methods](https://docs.helius.dev/compression-and-das-api/digital-asset-standard-das-api)

use std::borrow::Cow;

use crate::types::{AssetList, GetAssetsByOwnerParams};

/// Page requested by default, the RPC uses 1-based pages
pub const DEFAULT_PAGE: u32 = 1;
/// Largest page the DAS API serves
pub const DEFAULT_LIMIT: u32 = 1000;

/// Represents a singular JSON-RPC method that can be called on the Helius RPC
pub trait HeliusRpcRequest<'a> {
    /// The successful result type to be returned
    type Res: serde::de::DeserializeOwned + core::fmt::Debug;
    /// The params that we will send inside the JSON-RPC envelope
    type Params: serde::Serialize;

    /// The JSON-RPC method name
    const METHOD: &'static str;

    /// The params to send in the request body
    fn params(&self) -> Self::Params;
}

/// Translation of the DAS `getAssetsByOwner` method
#[derive(Debug, Clone, typed_builder::TypedBuilder)]
pub struct GetAssetsByOwner<'a> {
    /// The address whose assets we want to list
    #[builder(setter(into))]
    pub owner_address: Cow<'a, str>,
    /// 1-based page index
    #[builder(default = DEFAULT_PAGE)]
    pub page: u32,
    /// the amount of results to return
    #[builder(default = DEFAULT_LIMIT)]
    pub limit: u32,
}

impl<'a> HeliusRpcRequest<'a> for GetAssetsByOwner<'a> {
    type Res = AssetList;
    type Params = GetAssetsByOwnerParams<'a>;

    const METHOD: &'static str = "getAssetsByOwner";

    fn params(&self) -> Self::Params {
        GetAssetsByOwnerParams {
            owner_address: self.owner_address.clone(),
            page: self.page,
            limit: self.limit,
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_builder_defaults_to_first_full_page() {
        let request = GetAssetsByOwner::builder().owner_address("owner").build();
        assert_eq!(
            request.params(),
            GetAssetsByOwnerParams {
                owner_address: "owner".into(),
                page: 1,
                limit: 1000,
            }
        );
    }
}
