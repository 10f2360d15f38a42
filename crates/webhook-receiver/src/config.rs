use core::net::SocketAddr;

use bin_util::ValidateConfig;
use bin_util::config_defaults::{default_bind_address, default_max_connections};
use eyre::ensure;
use redact::Secret;
use serde::Deserialize;

/// Webhook receiver config, the `[receiver]` section
#[derive(Debug, Deserialize)]
pub struct Config {
    /// Address the HTTP server listens on
    #[serde(default = "default_bind_address")]
    pub bind_address: SocketAddr,
    /// Postgres connection string, may carry credentials
    pub database_url: Secret<String>,
    /// Upper bound of pooled database connections
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

impl ValidateConfig for Config {
    fn validate(&self) -> eyre::Result<()> {
        ensure!(
            !self.database_url.expose_secret().is_empty(),
            "database url could not be empty"
        );
        ensure!(
            self.max_connections > 0,
            "max connections should be greater than 0"
        );
        Ok(())
    }
}
