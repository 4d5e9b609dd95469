//! Storyframe API server entry point.

use std::error::Error;
use std::net::SocketAddr;

use axum::Router;
use storyframe_api::config::ServerConfig;
use storyframe_api::routes;
use storyframe_api::state::AppState;
use storyframe_api::telemetry;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // Read configuration from environment.
    let config = ServerConfig::from_env()?;

    // Initialize tracing subscriber.
    let tracer_provider = telemetry::init(config.otlp_endpoint.as_deref())?;

    tracing::info!(
        enrichment = config.enrichment.is_some(),
        compose_concurrency = config.pipeline.compose_concurrency,
        "Starting Storyframe API server"
    );

    // Build application state.
    let app_state = AppState::new(config.enricher(), config.pipeline.clone());

    // Build router.
    let app = Router::new()
        .merge(routes::health::router())
        .merge(routes::storyboard::router())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(app_state);

    // Start server.
    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .map_err(|e| format!("invalid HOST:PORT combination: {e}"))?;
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app).await?;

    if let Some(provider) = tracer_provider {
        provider.shutdown()?;
    }

    Ok(())
}
