use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
/// Fails startup if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub openai_api_key: String,
    pub shopify_store_domain: String,
    pub shopify_admin_token: String,
    /// Shared secret callers must present in the `x-api-key` header.
    pub api_secret: String,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            openai_api_key: require_env("OPENAI_API_KEY")?,
            shopify_store_domain: require_env("SHOPIFY_STORE_DOMAIN")?,
            shopify_admin_token: require_env("SHOPIFY_ADMIN_TOKEN")?,
            api_secret: require_env("API_SECRET")?,
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}
