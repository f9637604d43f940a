//! CLI for inspecting webhook records through the request loaders
//!
//! Reads go through the same batched loaders the request context uses, so
//! every subcommand issues one bulk query per record kind. Output is JSON on
//! stdout; logs go to stderr.

use anyhow::{Context, Result};
use batch_loader::Loader;
use clap::{Parser, Subcommand};
use serde::Serialize;
use sqlx::postgres::PgPoolOptions;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use webhook_core::common::{get_subscription_query_hash, AppId, EventPayloadId, WebhookId};
use webhook_core::config::Config;
use webhook_core::domains::app::AppByIdLoader;
use webhook_core::domains::webhooks::{
    PayloadByIdLoader, WebhookEventSyncType, WebhookEventsByWebhookIdLoader,
    WebhooksByAppIdLoader,
};
use webhook_core::kernel::{BaseWebhookStore, PgWebhookStore};

#[derive(Parser)]
#[command(name = "webhook_inspect")]
#[command(about = "Inspect apps, webhooks and stored payloads")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Webhooks owned by the given apps
    Webhooks {
        #[arg(long = "app-id", required = true, num_args = 1..)]
        app_ids: Vec<AppId>,
    },

    /// Event subscriptions of the given webhooks
    Events {
        #[arg(long = "webhook-id", required = true, num_args = 1..)]
        webhook_ids: Vec<WebhookId>,
    },

    /// Stored payload bodies
    Payload {
        #[arg(long = "id", required = true, num_args = 1..)]
        ids: Vec<EventPayloadId>,
    },

    /// Webhooks that would receive a sync event, with their query hashes
    Candidates {
        #[arg(long)]
        event: WebhookEventSyncType,
    },
}

#[derive(Serialize)]
struct Candidate {
    webhook_id: WebhookId,
    app_id: AppId,
    app_identifier: Option<String>,
    query_hash: Option<String>,
}

fn output<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

// ============================================================================
// Main
// ============================================================================

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,webhook_core=debug,sqlx=warn".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true),
        )
        .init();

    let cli = Cli::parse();
    let config = Config::from_env()?;

    let pool = PgPoolOptions::new()
        .max_connections(config.database_max_connections)
        .connect(&config.database_url)
        .await
        .context("Failed to connect to database")?;
    let store: Arc<dyn BaseWebhookStore> = Arc::new(PgWebhookStore::new(pool));
    let loader_config = config.loader_config();

    match cli.command {
        Commands::Webhooks { app_ids } => {
            let loader = Loader::with_config(WebhooksByAppIdLoader::new(store), loader_config);
            let webhooks = loader.load_many(app_ids.iter().copied()).await?;
            let by_app: BTreeMap<AppId, _> = app_ids.into_iter().zip(webhooks).collect();
            output(&by_app)
        }
        Commands::Events { webhook_ids } => {
            let loader =
                Loader::with_config(WebhookEventsByWebhookIdLoader::new(store), loader_config);
            let events = loader.load_many(webhook_ids.iter().copied()).await?;
            let by_webhook: BTreeMap<WebhookId, _> =
                webhook_ids.into_iter().zip(events).collect();
            output(&by_webhook)
        }
        Commands::Payload { ids } => {
            let loader = Loader::with_config(PayloadByIdLoader::new(store), loader_config);
            let payloads = loader.load_many(ids.iter().copied()).await?;
            let by_id: BTreeMap<EventPayloadId, _> = ids.into_iter().zip(payloads).collect();
            output(&by_id)
        }
        Commands::Candidates { event } => {
            let webhooks = store
                .find_active_webhooks_for_event(event)
                .await
                .context("Failed to load webhooks")?;
            let apps = Loader::with_config(AppByIdLoader::new(store), loader_config);
            let owners = apps
                .load_many(webhooks.iter().map(|webhook| webhook.app_id))
                .await?;

            let candidates: Vec<Candidate> = webhooks
                .iter()
                .zip(owners)
                .map(|(webhook, app)| Candidate {
                    webhook_id: webhook.id,
                    app_id: webhook.app_id,
                    app_identifier: app.and_then(|app| app.identifier),
                    query_hash: webhook.subscription_query().map(get_subscription_query_hash),
                })
                .collect();
            tracing::info!(event = %event, count = candidates.len(), "Loaded webhook candidates");
            output(&candidates)
        }
    }
}
