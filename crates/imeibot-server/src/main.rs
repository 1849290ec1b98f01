//! imeibot server binary.
//!
//! Reads `config.toml` (or the path given with `--config`) overlaid by
//! environment variables, opens the SQLite store, registers the Telegram
//! webhook and serves HTTP until Ctrl-C. The webhook is removed on the way
//! out.

use std::{net::SocketAddr, path::PathBuf, sync::Arc};

use anyhow::Context as _;
use clap::Parser;
use imeibot_checker::ImeiCheckClient;
use imeibot_server::{AppState, ServerConfig};
use imeibot_store_sqlite::SqliteStore;
use imeibot_telegram::Bot;
use teloxide::prelude::Requester as _;
use tokio::net::TcpListener;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "IMEI check Telegram bot")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();

  // Environment names match the config keys, e.g. BOT_TOKEN, ADMIN_IDS.
  let settings = config::Config::builder()
    .add_source(config::File::from(cli.config).required(false))
    .add_source(
      config::Environment::default()
        .try_parsing(true)
        .list_separator(",")
        .with_list_parse_key("admin_ids")
        .with_list_parse_key("trusted_proxies"),
    )
    .build()
    .context("failed to read configuration")?;

  let server_cfg: ServerConfig = settings
    .try_deserialize()
    .context("failed to deserialise ServerConfig")?;
  let server_cfg = Arc::new(server_cfg);

  let store = SqliteStore::open(&server_cfg.database_path)
    .await
    .with_context(|| format!("failed to open store at {:?}", server_cfg.database_path))?;

  let checker = ImeiCheckClient::new(&server_cfg.check_config())
    .context("failed to build verification client")?;
  tracing::info!(environment = %server_cfg.imei_environment, "verification client ready");

  let bot = Arc::new(Bot::new(&server_cfg.bot_token));

  let state = AppState::new(
    Arc::new(store),
    Arc::new(checker),
    Arc::clone(&bot),
    Arc::clone(&server_cfg),
  );
  let app = imeibot_server::router(state);

  let webhook = server_cfg.webhook_endpoint();
  let webhook_url =
    url::Url::parse(&webhook).with_context(|| format!("invalid webhook URL {webhook}"))?;
  bot
    .set_webhook(webhook_url)
    .await
    .with_context(|| format!("failed to register webhook {webhook}"))?;
  tracing::info!(%webhook, "webhook registered");

  let address = format!("{}:{}", server_cfg.host, server_cfg.port);
  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  let served = axum::serve(
    listener,
    app.into_make_service_with_connect_info::<SocketAddr>(),
  )
  .with_graceful_shutdown(shutdown_signal())
  .await
  .context("server error");

  if let Err(e) = bot.delete_webhook().await {
    tracing::warn!(error = %e, "failed to remove webhook");
  } else {
    tracing::info!("webhook removed");
  }

  served
}

async fn shutdown_signal() {
  if let Err(e) = tokio::signal::ctrl_c().await {
    tracing::error!(error = %e, "failed to listen for shutdown signal");
    std::future::pending::<()>().await;
  }
  tracing::info!("shutting down");
}
