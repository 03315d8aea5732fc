use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use tokio::signal;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use jobhound_core::{
    load_config, render_text, validate_config, Config, RunController, RunOrchestrator,
};
use jobhound_server::api::create_router;
use jobhound_server::state::AppState;

/// Application version
const VERSION: &str = env!("CARGO_PKG_VERSION");

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("Fatal error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let command = std::env::args().nth(1).unwrap_or_else(|| "serve".to_string());

    // Determine config path
    let config_path = std::env::var("JOBHOUND_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("config.toml"));

    info!("jobhound {} loading configuration from {:?}", VERSION, config_path);
    let config = load_config(&config_path)
        .with_context(|| format!("Failed to load config from {:?}", config_path))?;

    validate_config(&config).context("Configuration validation failed")?;

    info!(
        "Configuration loaded: {} drivers, {} keywords, {} locations",
        config.drivers.len(),
        config.search.keywords.len(),
        config.search.locations.len()
    );

    match command.as_str() {
        "run" => run_once(&config).await,
        "serve" => serve(config).await,
        other => bail!("Unknown command '{}', expected 'run' or 'serve'", other),
    }
}

/// Perform a single run and print the text report.
async fn run_once(config: &Config) -> Result<()> {
    let orchestrator =
        RunOrchestrator::from_config(config).context("Failed to create platform drivers")?;

    let cancel = CancellationToken::new();
    let signal_cancel = cancel.clone();
    tokio::spawn(async move {
        shutdown_signal().await;
        warn!("Interrupted, cancelling run");
        signal_cancel.cancel();
    });

    let report = orchestrator.run(cancel).await.context("Run failed")?;
    println!("{}", render_text(&report));
    Ok(())
}

/// Serve the run API until a shutdown signal arrives.
async fn serve(config: Config) -> Result<()> {
    let orchestrator =
        RunOrchestrator::from_config(&config).context("Failed to create platform drivers")?;
    let addr = SocketAddr::new(config.server.host, config.server.port);

    let state = Arc::new(AppState::new(config, RunController::new(orchestrator)));
    let app = create_router(Arc::clone(&state));

    info!("Starting server on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    // Let an active run persist its report before exiting
    if state.controller().cancel().await.is_ok() {
        info!("Cancelling active run...");
        if let Err(e) = state.controller().wait().await {
            warn!("Active run ended with error: {}", e);
        }
    }

    info!("Server shut down");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
