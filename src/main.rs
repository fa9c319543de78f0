//! Orchestrate Gateway entry point.
//!
//! Loads configuration, wires the Orchestrate client behind the platform
//! port, and serves the relay routes.

use std::error::Error;
use std::sync::Arc;

use axum::http::HeaderValue;
use axum::Router;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use orchestrate_gateway::adapters::http::{agent_routes, AgentsAppState};
use orchestrate_gateway::adapters::{OrchestrateClient, OrchestrateClientConfig};
use orchestrate_gateway::config::{AppConfig, ValidationError};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let config = AppConfig::load()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.server.log_level)),
        )
        .init();

    config.validate()?;

    let base_url = config
        .orchestrate
        .resolved_base_url()
        .ok_or(ValidationError::MissingRequired("orchestrate.instance_id"))?;
    let api_key = config
        .orchestrate
        .api_key
        .clone()
        .ok_or(ValidationError::MissingRequired("orchestrate.api_key"))?;

    let client_config = OrchestrateClientConfig::new(api_key, base_url)
        .with_timeout(config.orchestrate.timeout());
    let platform = Arc::new(OrchestrateClient::new(client_config));
    let state = AgentsAppState::new(platform);

    let app = Router::new()
        .merge(agent_routes())
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(&config)?);

    let addr = config.server.socket_addr()?;
    tracing::info!("Starting orchestrate gateway on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// CORS layer from configuration: configured origins when present, otherwise
/// wide open (the gateway carries no caller credentials).
fn cors_layer(config: &AppConfig) -> Result<CorsLayer, Box<dyn Error>> {
    let origins = config.server.cors_origins_list();
    if origins.is_empty() {
        return Ok(CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any));
    }

    let origins = origins
        .iter()
        .map(|origin| origin.parse::<HeaderValue>())
        .collect::<Result<Vec<_>, _>>()?;
    Ok(CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(Any)
        .allow_headers(Any))
}
