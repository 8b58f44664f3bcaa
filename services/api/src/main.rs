mod error;
mod normalize;
mod scan;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use axum::{
    http::{header, HeaderName, HeaderValue, Method},
    routing::get,
    Json, Router,
};
use sniff_common::types::ServiceInfo;
use sniff_config::{init_tracing, AppConfig};
use sniff_ingest::{ClientConfig, DetectorClient, Scanner};
use sniff_normalize::Detector;
use tower_http::cors::CorsLayer;

#[derive(Clone)]
pub struct AppState {
    pub scanner: Scanner,
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

async fn info() -> Json<ServiceInfo> {
    Json(ServiceInfo::new("sniff-api").with_detectors(Detector::ALL.map(Detector::as_str)))
}

fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(%origin, "ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE, HeaderName::from_static("x-file-name")])
}

fn build_router(state: AppState, config: &AppConfig) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/info", get(info))
        .merge(scan::router(config.max_upload_bytes))
        .merge(normalize::router())
        .layer(cors_layer(&config.allowed_origins))
        .with_state(state)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::from_env().context("failed to load config")?;
    init_tracing(&config.log_level);
    tracing::info!(service = "sniff-api", "starting");

    let client_config = ClientConfig::from_env().context("failed to load detector config")?;
    tracing::info!(
        gateway = %client_config.base_url,
        timeout_secs = client_config.timeout_secs,
        "detector client configured"
    );
    let client = DetectorClient::new(client_config).context("failed to create detector client")?;

    let state = AppState {
        scanner: Scanner::new(Arc::new(client)),
    };

    let app = build_router(state, &config);
    let addr: SocketAddr = config
        .bind_addr()
        .parse()
        .context("invalid bind address")?;

    tracing::info!(%addr, "listening");
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("failed to bind")?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "failed to listen for shutdown signal");
        return;
    }
    tracing::info!("shutting down");
}
