mod application;
mod composer;
mod config;
mod credentials;
mod errors;
mod gateway;
mod json;
mod routes;
mod state;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::http::HeaderValue;
use chrono::Utc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{debug, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::credentials::CredentialStore;
use crate::gateway::gemini::GeminiBackend;
use crate::gateway::Gateway;
use crate::routes::build_router;
use crate::state::AppState;

const CREDENTIAL_SWEEP_INTERVAL_SECS: u64 = 15 * 60;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on malformed env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={}",
                env!("CARGO_PKG_NAME").replace('-', "_"),
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting HR Magnet API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize generation backend
    let backend = GeminiBackend::new(&config.gemini_base_url, &config.gemini_model)?;
    info!("Gemini backend initialized (model: {})", backend.model());
    if config.gemini_api_key.is_none() {
        info!("No server-side GEMINI_API_KEY; requests must bring their own credential");
    }
    let gateway = Gateway::new(Arc::new(backend));
    info!("Generation gateway ready (backend: {})", gateway.backend_name());

    // Initialize credential store and its expiry sweep
    let credentials = CredentialStore::new(config.credential_ttl);
    spawn_credential_sweep(credentials.clone());

    let state = AppState {
        gateway,
        credentials,
        config: config.clone(),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(build_cors(&config)?);

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn build_cors(config: &Config) -> Result<CorsLayer> {
    match &config.cors_allow_origin {
        Some(origin) => {
            let origin: HeaderValue = origin
                .parse()
                .with_context(|| format!("CORS_ALLOW_ORIGIN '{origin}' is not a valid origin"))?;
            Ok(CorsLayer::permissive().allow_origin(origin))
        }
        None => Ok(CorsLayer::permissive()),
    }
}

/// Periodically drops expired credentials that nobody has read since they lapsed.
fn spawn_credential_sweep(store: CredentialStore) {
    tokio::spawn(async move {
        let mut interval =
            tokio::time::interval(std::time::Duration::from_secs(CREDENTIAL_SWEEP_INTERVAL_SECS));
        loop {
            interval.tick().await;
            let removed = store.purge_expired(Utc::now()).await;
            if removed > 0 {
                debug!("Purged {removed} expired credential(s)");
            }
        }
    });
}
