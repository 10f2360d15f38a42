//! # Indexer CLI
//!
//! Entry points of the Helius indexer:
//! - fetch the assets of an owner through the Helius DAS RPC and forward them to storage
//! - register the default webhooks with the backend
//! - inspect and save a user's indexing configuration
//! - serve the webhook receiver
//!
//! ## Usage
//!
//! ```bash
//! indexer-cli --config path/to/indexer-config.toml fetch-assets --owner <address>
//! indexer-cli indexing save --user 5 --database 10 --toggle 2
//! ```
//!
//! Any config value can be overridden with `INDEXER__<SECTION>__<KEY>` environment variables.
//! The process exits with a failure code when a command's outcome is a failure.

mod commands;
mod config;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use config::Config;

#[derive(Parser, Debug)]
#[command(name = "indexer-cli", version, about = "Helius indexer tooling")]
pub(crate) struct Cli {
    #[arg(
        long = "config",
        short,
        default_value = "indexer-config.toml",
        help = "Config path"
    )]
    pub config_path: PathBuf,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub(crate) enum Command {
    /// Fetch the assets owned by an address and forward them to storage
    FetchAssets {
        /// Owner address
        #[arg(long)]
        owner: String,
    },
    /// Register the NFT bids and lending webhooks
    RegisterWebhooks,
    /// Inspect or change a user's indexing configuration
    #[command(subcommand)]
    Indexing(IndexingCommand),
    /// Receive webhook deliveries and store them in Postgres
    ServeWebhooks,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub(crate) enum IndexingCommand {
    /// Show the catalog, the current selection and the database connections
    Show {
        #[arg(long)]
        user: i64,
    },
    /// Apply changes to the selection and save it
    Save {
        #[arg(long)]
        user: i64,
        /// Database connection to index into, defaults to the current one
        #[arg(long)]
        database: Option<i64>,
        /// Indexing type to flip, can be repeated
        #[arg(long = "toggle")]
        toggles: Vec<i64>,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    bin_util::telemetry::init().expect("could not init telemetry");

    let config: Config =
        bin_util::try_deserialize(&cli.config_path).expect("could not load config");

    match commands::run(cli.command, &config).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(err) => {
            tracing::error!(?err, "command failed");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory as _;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[rstest]
    #[case(
        &["indexer-cli", "fetch-assets", "--owner", "Ai5spT4zukruzSm8m67ro1E2iuu92foU1fi1EvhMTPxj"],
        Command::FetchAssets { owner: "Ai5spT4zukruzSm8m67ro1E2iuu92foU1fi1EvhMTPxj".to_owned() }
    )]
    #[case(&["indexer-cli", "register-webhooks"], Command::RegisterWebhooks)]
    #[case(
        &["indexer-cli", "indexing", "show", "--user", "5"],
        Command::Indexing(IndexingCommand::Show { user: 5 })
    )]
    #[case(
        &["indexer-cli", "indexing", "save", "--user", "5", "--toggle", "1", "--toggle", "2"],
        Command::Indexing(IndexingCommand::Save { user: 5, database: None, toggles: vec![1, 2] })
    )]
    #[case(
        &["indexer-cli", "indexing", "save", "--user", "5", "--database", "10"],
        Command::Indexing(IndexingCommand::Save { user: 5, database: Some(10), toggles: vec![] })
    )]
    #[case(&["indexer-cli", "serve-webhooks"], Command::ServeWebhooks)]
    fn parse_commands(#[case] args: &[&str], #[case] expected: Command) {
        let cli = Cli::try_parse_from(args).unwrap();

        assert_eq!(cli.command, expected);
        assert_eq!(cli.config_path, PathBuf::from("indexer-config.toml"));
    }

    #[test]
    fn config_path_is_configurable() {
        let cli =
            Cli::try_parse_from(["indexer-cli", "--config", "/etc/indexer.toml", "serve-webhooks"])
                .unwrap();

        assert_eq!(cli.config_path, PathBuf::from("/etc/indexer.toml"));
    }

    #[test]
    fn missing_user_is_rejected() {
        assert!(Cli::try_parse_from(["indexer-cli", "indexing", "show"]).is_err());
    }
}
