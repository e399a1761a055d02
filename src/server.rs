use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use log::info;
use tokio::signal;
use tower_http::cors::CorsLayer;

use crate::adapter::ComposerClient;
use crate::config::Config;
use crate::handlers::{self, AppState};

pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(handlers::index).post(handlers::submit_form))
        .route("/api/process", post(handlers::process))
        .route("/api/health", get(handlers::health))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Builds the composer client from `config` and serves the form until
/// Ctrl-C or SIGTERM.
pub async fn start_server(config: Config) -> anyhow::Result<()> {
    let composer = ComposerClient::new(&config.upstream_url, config.timeout)?;
    info!(
        "Forwarding submissions to {} (timeout {:?})",
        composer.endpoint(),
        config.timeout
    );

    let app = build_router(Arc::new(AppState::new(composer)?));

    let addr = config.listen_addr();
    info!("Starting server on {}", addr);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            log::error!("Failed to listen for Ctrl+C: {}", err);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(err) => {
                log::error!("Failed to install SIGTERM handler: {}", err);
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
