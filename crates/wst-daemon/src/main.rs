//! wst-daemon entry point.
//!
//! Sets up tracing, loads layered config, builds the shared state, wires
//! middleware and starts the HTTP server. Handlers live in `routes.rs`.

use std::{net::SocketAddr, sync::Arc, time::Duration};

use anyhow::Context;
use axum::http::{HeaderValue, Method};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::{info, warn, Level};
use wst_config::{load_layered_yaml, report_unused_keys, StoreSettings, UnusedKeyPolicy};
use wst_daemon::{routes, state};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Dev convenience; production injects env vars directly.
    let _ = dotenvy::from_filename(".env.local");

    init_tracing();

    let settings = load_settings()?;
    let shared = Arc::new(state::AppState::from_settings(&settings));

    state::spawn_heartbeat(shared.bus.clone(), Duration::from_secs(5));

    let app = routes::build_router(Arc::clone(&shared))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors_from_settings(&settings.daemon.allowed_origins));

    let addr = resolve_bind_addr(&settings)?;
    info!("wst-daemon listening on http://{}", addr);

    axum::serve(tokio::net::TcpListener::bind(addr).await?, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server crashed")?;

    info!("wst-daemon stopped");
    Ok(())
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .init();
}

/// `WST_CONFIG` is a comma-separated list of YAML paths, base first.
/// Unset means built-in defaults.
fn load_settings() -> anyhow::Result<StoreSettings> {
    let raw = match std::env::var("WST_CONFIG") {
        Ok(v) if !v.trim().is_empty() => v,
        _ => {
            info!("WST_CONFIG not set; using built-in defaults");
            return Ok(StoreSettings::default());
        }
    };
    let paths: Vec<&str> = raw
        .split(',')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .collect();

    let loaded = load_layered_yaml(&paths).context("load WST_CONFIG")?;
    info!(config_hash = %loaded.config_hash, layers = paths.len(), "config loaded");

    let report = report_unused_keys(&loaded.config_json, UnusedKeyPolicy::Warn)?;
    for leaf in &report.unused_leaf_pointers {
        warn!(pointer = %leaf, "config key is not read by any service");
    }

    loaded.settings()
}

fn resolve_bind_addr(settings: &StoreSettings) -> anyhow::Result<SocketAddr> {
    let raw = std::env::var("WST_DAEMON_ADDR").unwrap_or_else(|_| settings.daemon.bind_addr.clone());
    raw.parse()
        .with_context(|| format!("invalid bind address: {raw}"))
}

fn cors_from_settings(allowed_origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|o| HeaderValue::from_str(o).ok())
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::OPTIONS])
        .allow_headers(tower_http::cors::Any)
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "ctrl_c handler failed; running until killed");
        std::future::pending::<()>().await;
    }
    info!("shutdown requested");
}
