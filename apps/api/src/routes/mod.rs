pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::classify;
use crate::profile;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/v1/classify", post(classify::handlers::handle_classify))
        .route(
            "/api/v1/profile/sync",
            post(profile::handlers::handle_sync_profile),
        )
        .with_state(state)
}
