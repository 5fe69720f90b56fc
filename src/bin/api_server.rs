// src/bin/api_server.rs

use memecoin_creator::infra::chain::EvmRpcClient;
use memecoin_creator::infra::logging::init_logging;
use memecoin_creator::storage::{self, seed::seed_networks};
use memecoin_creator::{create_router, ApiDoc, AppState, Config};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for Ctrl+C");
        return;
    }
    tracing::info!("Shutdown signal received, draining connections");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;
    init_logging()?;

    tracing::info!(
        bind = %config.bind_addr,
        storage = ?config.storage,
        deploy_delay_ms = config.deploy_delay.as_millis() as u64,
        "Starting memecoin creator API"
    );

    // --- Storage ---
    let store = storage::open(&config).await?;
    store.ping().await?;
    if config.seed_networks {
        seed_networks(store.as_ref()).await?;
    }

    // --- Services ---
    let rpc = Arc::new(EvmRpcClient::new(config.rpc_timeout)?);
    let app_state = AppState::new(store, rpc, &config);

    // Deployments cannot resume across restarts; fail what the last process left behind.
    let report = app_state.tokens.recover_interrupted().await?;
    tracing::debug!(?report, "Startup recovery finished");

    // --- API Server ---
    let cors = CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any);
    let app = create_router(app_state)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    tracing::info!(addr = %listener.local_addr()?, "API server listening");
    tracing::info!("Swagger UI available at /swagger-ui");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Graceful shutdown complete");
    Ok(())
}
