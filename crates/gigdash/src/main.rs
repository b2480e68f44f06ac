mod app;
mod cache;
mod config;
mod dashboard;
mod handlers;
mod state;
mod storage;

use anyhow::{Context, Result};
use clap::Parser;
use listenfd::ListenFd;
use tokio::{net::TcpListener, signal};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::{app::create_app, config::Config, state::AppState};

/// gigdash - Marketplace and career pipeline dashboards served from a snapshot cache
#[derive(Parser, Debug)]
#[command(name = "gigdash")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Host address to bind the server to
    #[arg(long, short = 'H', default_value = "0.0.0.0", env = "HOST")]
    host: String,

    /// Port to listen on
    #[arg(long, short, default_value = "3000", env = "PORT")]
    port: u16,

    /// Emit logs as JSON lines
    #[arg(long, env = "LOG_JSON")]
    log_json: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_json);

    let config = Config::from_env();
    tracing::info!(
        cache_ttl_seconds = config.cache_ttl_seconds,
        cache_max_entries = config.cache_max_entries,
        fetch_timeout_ms = config.fetch_timeout_ms,
        seed_demo_data = config.seed_demo_data,
        "Loaded configuration"
    );

    let state = AppState::new(&config)
        .await
        .context("failed to initialize the data source")?;
    tracing::info!(backend = state.backend, "Data source ready");

    let listener = bind_listener(&cli).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening");

    axum::serve(listener, create_app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "gigdash=debug,tower_http=debug".into());
    let registry = tracing_subscriber::registry().with(filter);

    if json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

/// Reuses the socket handed over on listen fd 0 (auto-reload), or binds
/// `host:port`.
async fn bind_listener(cli: &Cli) -> Result<TcpListener> {
    let mut listenfd = ListenFd::from_env();

    if let Some(listener) = listenfd.take_tcp_listener(0)? {
        listener.set_nonblocking(true)?;
        return Ok(TcpListener::from_std(listener)?);
    }

    let addr = format!("{}:{}", cli.host, cli.port);
    TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))
}

/// Resolves on Ctrl+C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    let signal = tokio::select! {
        _ = ctrl_c => "SIGINT",
        _ = terminate => "SIGTERM",
    };
    tracing::info!(signal, "Shutting down, draining in-flight requests");
}
