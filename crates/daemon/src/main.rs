use anyhow::{Context, Result};
use clap::Parser;
use foodshare_core::tracing::{InstrumentationConfig, init_tracing};
use foodshare_daemon::{ServerBuilder, Settings};
use tracing::info;

/// Foodshare gateway: pages, route guard and API proxy
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Configuration file path
    #[arg(short = 'c', long = "config")]
    config: Option<String>,

    /// Address to listen on
    #[arg(long)]
    host: Option<String>,

    /// Port to listen on
    #[arg(short = 'p', long)]
    port: Option<u16>,

    /// Directory holding the built pages
    #[arg(long = "static-dir")]
    static_dir: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let mut settings = Settings::load(cli.config.as_deref()).context("Failed to load settings")?;
    if let Some(host) = cli.host {
        settings.server.host = host;
    }
    if let Some(port) = cli.port {
        settings.server.port = port;
    }
    if let Some(static_dir) = cli.static_dir {
        settings.server.static_dir = Some(static_dir);
    }

    let instrumentation_config = InstrumentationConfig {
        service_name: "foodshare-daemon".to_string(),
        ..InstrumentationConfig::from_env()
    }
    .with_log_level(settings.log_level.clone());
    init_tracing(&instrumentation_config)?;

    if let Some(path) = &cli.config {
        info!("Loaded configuration from: {}", path);
    }

    let builder = ServerBuilder::new(settings);
    let app = builder.build()?;

    let server = &builder.settings().server;
    let listener = tokio::net::TcpListener::bind((server.host.as_str(), server.port))
        .await
        .with_context(|| format!("Failed to bind {}:{}", server.host, server.port))?;
    info!("Server running at: http://{}/", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!("Failed to listen for shutdown signal: {}", e);
            }
            info!("Received shutdown signal");
        })
        .await?;

    info!("Server stopped");
    Ok(())
}
