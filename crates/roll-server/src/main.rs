//! Roll attendance server binary.
//!
//! Reads `config.toml` (or the path given with `--config`) plus `ROLL_*`
//! environment variables, opens the SQLite store, and serves the HTTP API.
//! A `.env` file in the working directory is loaded first if present.

use std::{path::PathBuf, sync::Arc};

use anyhow::Context as _;
use clap::Parser;
use roll_core::notify::Mailer;
use roll_server::{AppState, QrProvisioner, Registry, ServerConfig, SmtpMailer};
use roll_store_sqlite::SqliteStore;
use tokio::net::TcpListener;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Roll event attendance server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  // Initialise tracing.
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  if let Err(e) = dotenvy::dotenv()
    && !e.not_found()
  {
    return Err(e).context("failed to read .env");
  }

  let cli = Cli::parse();

  // Load configuration.
  let server_cfg = ServerConfig::load(&cli.config)
    .with_context(|| format!("failed to load config from {:?}", cli.config))?;

  for dir in [&server_cfg.upload_dir, &server_cfg.code_dir] {
    std::fs::create_dir_all(dir)
      .with_context(|| format!("failed to create directory {dir:?}"))?;
  }
  if let Some(parent) = server_cfg.store_path.parent()
    && !parent.as_os_str().is_empty()
  {
    std::fs::create_dir_all(parent)
      .with_context(|| format!("failed to create directory {parent:?}"))?;
  }

  // Open SQLite store.
  let store = SqliteStore::open(&server_cfg.store_path)
    .await
    .with_context(|| format!("failed to open store at {:?}", server_cfg.store_path))?;

  let mailer: Option<Arc<dyn Mailer>> = match server_cfg.mail_settings() {
    Some(settings) => {
      let mailer = SmtpMailer::new(&settings).context("failed to configure SMTP")?;
      tracing::info!(host = %settings.host, port = settings.port, "mail delivery enabled");
      Some(Arc::new(mailer))
    }
    None => {
      tracing::warn!("SMTP credentials not set; /send-emails will be unavailable");
      None
    }
  };

  let registry = Registry::new(
    Arc::new(store),
    Arc::new(QrProvisioner::new(&server_cfg.code_dir)),
    mailer,
  );

  let address = server_cfg.address();
  let app = roll_server::router(AppState::new(registry, server_cfg));

  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app).await.context("server error")?;

  Ok(())
}
