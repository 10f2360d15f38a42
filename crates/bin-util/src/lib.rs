//! Binary utils

pub mod config_defaults;
pub mod telemetry;

use std::path::Path;

use eyre::{WrapErr as _, ensure, eyre};
use serde::de::DeserializeOwned;
use tokio_util::sync::CancellationToken;

/// Prefix of environment variables that override config file values,
/// e.g. `INDEXER__HELIUS__RPC_URL`
pub const ENV_PREFIX: &str = "INDEXER";

/// Sanity checks of a config section after it was deserialized
pub trait ValidateConfig {
    /// Returns an error describing the first invalid value
    ///
    /// # Errors
    ///
    /// When the section holds values the binary cannot run with
    fn validate(&self) -> eyre::Result<()>;
}

/// Read a TOML config file, overlay `INDEXER__*` environment variables and validate the result.
///
/// Every section can be read independently from the same file.
///
/// # Errors
///
/// When the file is missing, cannot be parsed into `T` or fails validation
pub fn try_deserialize<T: DeserializeOwned + ValidateConfig>(config_path: &Path) -> eyre::Result<T> {
    ensure!(
        config_path.exists() && config_path.is_file(),
        eyre!("Path should be a file and exist {:?}", config_path)
    );

    let config = config::Config::builder()
        .add_source(config::File::from(config_path).format(config::FileFormat::Toml))
        .add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        )
        .build()
        .wrap_err("cannot read config file")?
        .try_deserialize::<T>()
        .wrap_err("invalid config file content")?;
    config.validate()?;
    Ok(config)
}

/// Register cancel token and ctrl+c handler
///
/// # Panics
///   on failure to register ctr+c handler
#[allow(
    clippy::print_stdout,
    reason = "not a tracing msg, should always display"
)]
#[must_use]
pub fn register_cancel() -> CancellationToken {
    let cancel_token = CancellationToken::new();
    let ctrlc_token = cancel_token.clone();
    ctrlc::set_handler(move || {
        if ctrlc_token.is_cancelled() {
            #[expect(clippy::restriction, reason = "immediate exit")]
            std::process::exit(1);
        } else {
            println!("\nGraceful shutdown initiated. Press Ctrl+C again for immediate exit...");
            ctrlc_token.cancel();
        }
    })
    .expect("Failed to register ctrl+c handler");
    cancel_token
}
