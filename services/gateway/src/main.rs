use anyhow::Context;
use kraken_gateway::config::GatewayConfig;
use kraken_gateway::router::create_router;
use kraken_gateway::state::AppState;
use kraken_gateway::telemetry;
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    // Optional .env, loaded before the filter reads RUST_LOG
    dotenvy::dotenv().ok();
    telemetry::init();

    tracing::info!("Starting Kraken gateway");

    let config = GatewayConfig::from_env().context("invalid gateway configuration")?;
    let state = AppState::new(&config).context("failed to build Kraken HTTP client")?;

    let app = create_router(state);

    let addr = config.listen_addr();
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    tracing::info!(%addr, kraken = %config.kraken_base_url, "Kraken proxy listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Kraken gateway stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to listen for SIGTERM");
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

    tracing::info!("Shutdown signal received");
}
