//! https-always server.
//!
//! ```text
//!   plaintext :8080 ──▶ guard ──▶ 301 https://host[:port]/url   (redirect = true)
//!                          └─────▶ 403 HTTPS_REQUIRED            (redirect = false)
//!   TLS       :8443 ──▶ guard ──▶ routes
//! ```

use std::path::PathBuf;

use axum::{routing::get, Router};
use clap::Parser;
use tokio::net::TcpListener;

use https_always::config::{load_config, ServerConfig};
use https_always::enforcement::RuntimeEnvironment;
use https_always::lifecycle::{signals, Shutdown};
use https_always::observability::logging;
use https_always::HttpServer;

#[derive(Parser)]
#[command(name = "https-always")]
#[command(about = "HTTP server that only serves traffic over HTTPS", long_about = None)]
struct Cli {
    /// TOML configuration file; defaults apply when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Runtime environment; overrides the config file and APP_ENV.
    #[arg(short, long)]
    environment: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), https_always::Error> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => ServerConfig::default(),
    };

    logging::init(&config.observability.log_level);

    let environment = cli
        .environment
        .clone()
        .or_else(|| config.environment.clone())
        .map(RuntimeEnvironment::new)
        .unwrap_or_else(RuntimeEnvironment::from_env);

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        environment = %environment,
        bind_address = %config.listener.bind_address,
        tls = config.tls.is_some(),
        "https-always starting"
    );

    let listener = TcpListener::bind(&config.listener.bind_address).await?;

    let routes = Router::new().route("/health", get(|| async { "OK" }));
    let server = HttpServer::new(config, &environment, routes);

    let shutdown = Shutdown::new();
    let rx = shutdown.subscribe();
    tokio::spawn(async move {
        signals::wait_for_signal().await;
        shutdown.trigger();
    });

    server.run(listener, rx).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
