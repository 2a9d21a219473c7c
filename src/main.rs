//! Redirect service.
//!
//! Serves the redirect engine over HTTP. Requests matching a rule (or needing
//! a scheme upgrade) get a 3xx; everything else gets 404.
//!
//! ```text
//!  Client ──▶ TcpListener ──▶ axum ──▶ redirect middleware ──▶ 404 fallback
//!                                          │
//!                                          ▼
//!                                   RedirectEngine
//!                                          ▲
//!  config file ──▶ ConfigWatcher ──▶ RuleSet (ArcSwap)
//! ```

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use tokio::net::TcpListener;
use tokio::sync::mpsc;

use redirect_engine::config::watcher::ConfigWatcher;
use redirect_engine::config::{load_config, RedirectConfig};
use redirect_engine::lifecycle::{wait_for_signal, Shutdown};
use redirect_engine::observability::{logging, metrics};
use redirect_engine::HttpServer;

#[derive(Debug, Parser)]
#[command(name = "redirect-engine", version, about = "Rule-driven URL redirect service")]
struct Cli {
    /// Rule/config file (TOML or JSON). Watched for changes.
    #[arg(short, long, env = "REDIRECT_CONFIG")]
    config: Option<PathBuf>,

    /// Override `listener.bind_address`.
    #[arg(short, long)]
    bind: Option<String>,

    /// Load and validate the config, then exit.
    #[arg(long)]
    check: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => RedirectConfig::default(),
    };
    if let Some(bind) = cli.bind {
        config.listener.bind_address = bind;
    }

    if cli.check {
        println!(
            "config OK: {} redirect(s), enabled={}, forcehttps={}",
            config.redirects.len(),
            config.options.enabled,
            config.options.force_https
        );
        return Ok(());
    }

    logging::init_logging(&config.observability)?;
    tracing::info!("redirect-engine v{} starting", env!("CARGO_PKG_VERSION"));

    tracing::info!(
        bind_address = %config.listener.bind_address,
        redirects = config.redirects.len(),
        enabled = config.options.enabled,
        forcehttps = config.options.force_https,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse::<SocketAddr>() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(e) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                error = %e,
                "Failed to parse metrics address"
            ),
        }
    }

    // Hot reload; without a config file the update channel is closed at once.
    let (_watcher, config_updates) = match &cli.config {
        Some(path) => {
            let (watcher, rx) = ConfigWatcher::new(path);
            match watcher.run() {
                Ok(w) => (Some(w), rx),
                Err(e) => {
                    tracing::warn!(error = %e, "Config watcher unavailable, hot reload disabled");
                    (None, rx)
                }
            }
        }
        None => (None, mpsc::unbounded_channel().1),
    };

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let shutdown = Shutdown::new();
    let grace = Duration::from_secs(config.shutdown_timeout_secs);
    let server = HttpServer::new(config);
    let mut handle = tokio::spawn(server.run(listener, config_updates, shutdown.subscribe()));

    tokio::select! {
        result = &mut handle => {
            result??;
            return Ok(());
        }
        _ = wait_for_signal() => shutdown.trigger(),
    }

    match tokio::time::timeout(grace, handle).await {
        Ok(result) => result??,
        Err(_) => tracing::warn!(
            grace_secs = grace.as_secs(),
            "In-flight requests did not drain in time"
        ),
    }

    tracing::info!("Shutdown complete");
    Ok(())
}
