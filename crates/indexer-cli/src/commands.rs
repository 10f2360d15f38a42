//! Command implementations. Each returns whether the command's outcome was a success.
#![allow(clippy::print_stdout, reason = "command output, should always display")]

use std::sync::Arc;

use eyre::WrapErr as _;
use helius_rpc::HeliusRpcClient;
use helius_rpc::requests::GetAssetsByOwner;
use indexer_api::IndexerApiClient;
use indexer_api::types::{DatabaseConnectionId, IndexingTypeId, UserId};
use indexer_jobs::{AssetFetchOutcome, WebhookRegistration};
use indexing_config::IndexingSession;
use webhook_receiver::{PostgresSink, Server};

use crate::config::Config;
use crate::{Command, IndexingCommand};

pub(crate) async fn run(command: Command, config: &Config) -> eyre::Result<bool> {
    match command {
        Command::FetchAssets { owner } => fetch_assets(config, owner).await,
        Command::RegisterWebhooks => register_webhooks(config).await,
        Command::Indexing(IndexingCommand::Show { user }) => show_indexing(config, UserId(user)).await,
        Command::Indexing(IndexingCommand::Save {
            user,
            database,
            toggles,
        }) => {
            save_indexing(
                config,
                UserId(user),
                database.map(DatabaseConnectionId),
                toggles.into_iter().map(IndexingTypeId),
            )
            .await
        }
        Command::ServeWebhooks => serve_webhooks(config).await,
    }
}

fn backend_client(config: &Config) -> eyre::Result<IndexerApiClient> {
    IndexerApiClient::new(config.backend()?.url.clone()).wrap_err("could not build backend client")
}

async fn fetch_assets(config: &Config, owner: String) -> eyre::Result<bool> {
    let helius = config.helius()?;
    let mut rpc =
        HeliusRpcClient::new(helius.rpc_url.clone()).wrap_err("could not build rpc client")?;
    if let Some(request_id) = &helius.request_id {
        rpc = rpc.with_request_id(request_id.clone());
    }
    let backend = backend_client(config)?;
    let request = GetAssetsByOwner::builder()
        .owner_address(owner)
        .page(helius.page)
        .limit(helius.limit)
        .build();

    let outcome = indexer_jobs::fetch_assets_by_owner(&rpc, &backend, &request).await;
    let succeeded = outcome.is_success();
    match &outcome {
        AssetFetchOutcome::Fetched { stored: Err(err), .. } => {
            println!("fetched assets could not be stored: {err}");
        }
        AssetFetchOutcome::MissingResult => println!("rpc returned no result"),
        AssetFetchOutcome::Failed(err) => println!("fetching assets failed: {err}"),
        AssetFetchOutcome::Fetched { stored: Ok(()), .. } => {}
    }
    println!(
        "{}",
        serde_json::to_string_pretty(&outcome.into_assets())?
    );
    Ok(succeeded)
}

async fn register_webhooks(config: &Config) -> eyre::Result<bool> {
    let webhooks = config.webhooks()?;
    let backend = backend_client(config)?;
    let registrations = WebhookRegistration::defaults(
        webhooks.nft_address.clone(),
        webhooks.lending_address.clone(),
    );

    let outcomes = indexer_jobs::register_webhooks(&backend, &registrations).await;
    for outcome in &outcomes {
        match &outcome.result {
            Ok(()) => println!("{}: registered", outcome.webhook_type),
            Err(err) => println!("{}: failed: {err}", outcome.webhook_type),
        }
    }
    Ok(indexer_jobs::all_succeeded(&outcomes))
}

async fn show_indexing(config: &Config, user_id: UserId) -> eyre::Result<bool> {
    let backend = backend_client(config)?;
    let session = IndexingSession::load(&backend, &backend, user_id).await?;

    println!("Indexing types for user {user_id}:");
    for indexing_type in session.catalog() {
        let mark = match session.selection().is_selected(indexing_type.id) {
            Some(true) => "x",
            _ => " ",
        };
        println!(
            "  [{mark}] {} {}: {} (tables: {})",
            indexing_type.id,
            indexing_type.name,
            indexing_type.description,
            indexing_type.table_names().collect::<Vec<_>>().join(", ")
        );
    }

    println!("Database connections:");
    if session.connections().is_empty() {
        println!("  none, add one before saving");
    }
    for connection in session.connections() {
        let mark = if session.selected_database() == Some(connection.id) {
            "*"
        } else {
            " "
        };
        println!("  {mark} {} {connection}", connection.id);
    }
    Ok(true)
}

async fn save_indexing(
    config: &Config,
    user_id: UserId,
    database: Option<DatabaseConnectionId>,
    toggles: impl Iterator<Item = IndexingTypeId>,
) -> eyre::Result<bool> {
    let backend = backend_client(config)?;
    let mut session = IndexingSession::load(&backend, &backend, user_id).await?;

    if let Some(database) = database {
        session.select_database(database)?;
    }
    for type_id in toggles {
        let selected = session.toggle(type_id)?;
        tracing::debug!(%type_id, selected, "toggled");
    }

    let saved = session.save(&backend).await?;
    println!("Saved {} indexing configs for user {user_id}:", saved.len());
    for saved_config in saved {
        println!(
            "  type {} -> database {}",
            saved_config.indexing_type_id, saved_config.database_connection_id
        );
    }
    Ok(true)
}

async fn serve_webhooks(config: &Config) -> eyre::Result<bool> {
    let receiver = config.receiver()?;
    let sink = PostgresSink::connect(receiver)
        .await
        .wrap_err("could not connect to the database")?;

    Server::new(receiver.bind_address, Arc::new(sink))
        .run(bin_util::register_cancel())
        .await?;
    Ok(true)
}
