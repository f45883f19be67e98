use std::sync::Arc;

use crate::config::Config;
use crate::llm_client::CompletionProvider;
use crate::shopify::ProfileStore;

/// Shared application state injected into all route handlers via Axum
/// extractors. The two external collaborators are trait objects, constructed
/// once at startup and swapped for stubs in tests.
#[derive(Clone)]
pub struct AppState {
    pub llm: Arc<dyn CompletionProvider>,
    pub store: Arc<dyn ProfileStore>,
    pub config: Config,
}
