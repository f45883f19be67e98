mod auth;
mod classify;
mod config;
mod errors;
mod llm_client;
mod profile;
mod routes;
mod shopify;
mod state;
mod taxonomy;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::llm_client::{CompletionProvider, OpenAiClient};
use crate::routes::build_router;
use crate::shopify::{ProfileStore, ShopifyClient};
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(format!("stylist_api={}", &config.rust_log))),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Stylist API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize the completion provider
    let llm: Arc<dyn CompletionProvider> =
        Arc::new(OpenAiClient::new(config.openai_api_key.clone()));
    info!("Completion client initialized (model: {})", llm_client::MODEL);

    // Initialize the profile store client
    let store: Arc<dyn ProfileStore> = Arc::new(ShopifyClient::new(
        config.shopify_store_domain.clone(),
        config.shopify_admin_token.clone(),
    ));
    info!("Profile store client initialized ({})", config.shopify_store_domain);

    // Build app state
    let state = AppState {
        llm,
        store,
        config: config.clone(),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: tighten CORS in production

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
