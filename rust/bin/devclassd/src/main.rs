//! `devclassd` — the device price classification server.
//!
//! Usage:
//!   devclassd [-c <config.toml>] [--listen <addr>] [--predictor-url <url>]
//!
//! Without `-c`, built-in defaults are used.

mod routes;

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use devclass_core::ServiceConfig;
use devclass_device::DeviceModule;
use tracing::info;

/// Device price classification server.
#[derive(Parser, Debug)]
#[command(name = "devclassd", about = "Device price classification server")]
struct Cli {
    /// Path to the TOML config file.
    #[arg(short = 'c', long = "config")]
    config: Option<PathBuf>,

    /// Listen address (overrides server.listen).
    #[arg(long = "listen")]
    listen: Option<String>,

    /// Prediction endpoint (overrides predictor.url).
    #[arg(long = "predictor-url", env = "DEVCLASS_PREDICTOR_URL")]
    predictor_url: Option<String>,
}

/// Load the config file (if any) and apply command-line overrides.
fn resolve_config(cli: &Cli) -> anyhow::Result<ServiceConfig> {
    let mut config = match &cli.config {
        Some(path) => {
            info!("Loading configuration from {}", path.display());
            ServiceConfig::load(path)?
        }
        None => ServiceConfig::default(),
    };

    if let Some(listen) = &cli.listen {
        config.server.listen = listen.clone();
    }
    if let Some(url) = &cli.predictor_url {
        config.predictor.url = url.clone();
    }
    config.validate()?;
    Ok(config)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let cli = Cli::parse();
    let config = resolve_config(&cli)?;

    // Initialize storage.
    let sqlite_path = config.resolve_sqlite_path();
    if let Some(parent) = sqlite_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let sql: Arc<dyn devclass_sql::SQLStore> = Arc::new(
        devclass_sql::SqliteStore::open(&sqlite_path)
            .map_err(|e| anyhow::anyhow!("failed to open SQL store: {}", e))?,
    );
    info!("SQLite store at {}", sqlite_path.display());

    let device_module = DeviceModule::from_config(&config, sql)
        .map_err(|e| anyhow::anyhow!("failed to initialize device module: {}", e))?;
    info!("Device module initialized");

    let app = routes::build_router(vec![(device_module.name(), device_module.routes())]);

    // Start server.
    let listener = tokio::net::TcpListener::bind(&config.server.listen).await?;
    info!("devclassd listening on {}", config.server.listen);
    axum::serve(listener, app).await?;

    Ok(())
}
