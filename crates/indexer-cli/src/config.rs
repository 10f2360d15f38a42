use bin_util::ValidateConfig;
use bin_util::config_defaults::{default_assets_limit, default_assets_page};
use eyre::{OptionExt as _, ensure};
use redact::Secret;
use serde::Deserialize;

/// Top-level configuration. Sections are optional so every command only needs the ones it uses.
#[derive(Debug, Deserialize)]
pub(crate) struct Config {
    pub helius: Option<HeliusConfig>,
    pub backend: Option<BackendConfig>,
    pub webhooks: Option<WebhooksConfig>,
    pub receiver: Option<webhook_receiver::Config>,
}

/// Helius DAS RPC access
#[derive(Debug, Deserialize)]
pub(crate) struct HeliusConfig {
    /// RPC endpoint, the api key is part of the query string
    pub rpc_url: Secret<url::Url>,
    #[serde(default = "default_assets_page")]
    pub page: u32,
    #[serde(default = "default_assets_limit")]
    pub limit: u32,
    /// JSON-RPC `id` sent with every call, the client default when unset
    #[serde(default)]
    pub request_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct BackendConfig {
    /// Base url of the indexer backend
    pub url: url::Url,
}

/// Addresses watched by the default webhooks
#[derive(Debug, Deserialize)]
pub(crate) struct WebhooksConfig {
    pub nft_address: String,
    pub lending_address: String,
}

impl Config {
    pub(crate) fn helius(&self) -> eyre::Result<&HeliusConfig> {
        self.helius
            .as_ref()
            .ok_or_eyre("missing [helius] section in config")
    }

    pub(crate) fn backend(&self) -> eyre::Result<&BackendConfig> {
        self.backend
            .as_ref()
            .ok_or_eyre("missing [backend] section in config")
    }

    pub(crate) fn webhooks(&self) -> eyre::Result<&WebhooksConfig> {
        self.webhooks
            .as_ref()
            .ok_or_eyre("missing [webhooks] section in config")
    }

    pub(crate) fn receiver(&self) -> eyre::Result<&webhook_receiver::Config> {
        self.receiver
            .as_ref()
            .ok_or_eyre("missing [receiver] section in config")
    }
}

impl ValidateConfig for Config {
    fn validate(&self) -> eyre::Result<()> {
        if let Some(helius) = &self.helius {
            ensure!(helius.page > 0, "helius page is 1-based");
            ensure!(helius.limit > 0, "helius limit should be greater than 0");
        }
        if let Some(webhooks) = &self.webhooks {
            ensure!(
                !webhooks.nft_address.trim().is_empty(),
                "nft address could not be empty"
            );
            ensure!(
                !webhooks.lending_address.trim().is_empty(),
                "lending address could not be empty"
            );
        }
        if let Some(receiver) = &self.receiver {
            receiver.validate()?;
        }
        Ok(())
    }
}
