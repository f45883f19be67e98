//! Shopify Admin API client — the profile-store boundary.
//!
//! Metafield upserts are expressed as a single `customerUpdate` GraphQL
//! mutation. The mutation payload is passed through to the caller verbatim;
//! user-level errors reported by the store are surfaced, not retried.

use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};
use thiserror::Error;
use tracing::debug;

use crate::profile::metafields::MetafieldRecord;

const SHOPIFY_API_VERSION: &str = "2024-07";
const ACCESS_TOKEN_HEADER: &str = "X-Shopify-Access-Token";
const REQUEST_TIMEOUT_SECS: u64 = 30;

const CUSTOMER_UPDATE_MUTATION: &str = r#"
mutation customerUpdate($input: CustomerInput!) {
  customerUpdate(input: $input) {
    customer {
      id
      metafields(first: 20) {
        edges {
          node {
            namespace
            key
            type
            value
          }
        }
      }
    }
    userErrors {
      field
      message
    }
  }
}
"#;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("GraphQL error: {0}")]
    Graphql(String),

    #[error("Store rejected the mutation: {0}")]
    UserErrors(String),

    #[error("Store response is missing mutation data")]
    MissingData,
}

/// The profile-store boundary. One blocking call, no internal retry; the
/// mutation result is returned verbatim for pass-through to the caller.
#[async_trait]
pub trait ProfileStore: Send + Sync {
    async fn update_metafields(
        &self,
        customer_id: &str,
        metafields: &[MetafieldRecord],
    ) -> Result<Value, StoreError>;
}

/// Production `ProfileStore` backed by the Shopify Admin GraphQL API.
#[derive(Clone)]
pub struct ShopifyClient {
    client: Client,
    store_domain: String,
    admin_token: String,
}

impl ShopifyClient {
    pub fn new(store_domain: String, admin_token: String) -> Self {
        Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
                .build()
                .expect("Failed to build HTTP client"),
            store_domain,
            admin_token,
        }
    }

    fn endpoint(&self) -> String {
        format!(
            "https://{}/admin/api/{}/graphql.json",
            self.store_domain, SHOPIFY_API_VERSION
        )
    }
}

/// The composite identifier the store uses to address a customer.
fn customer_gid(customer_id: &str) -> String {
    format!("gid://shopify/Customer/{customer_id}")
}

/// Extracts the `customerUpdate` payload, surfacing GraphQL-level errors and
/// user-level errors as `StoreError`.
fn parse_mutation_response(body: Value) -> Result<Value, StoreError> {
    if let Some(errors) = body.get("errors") {
        if !errors.is_null() {
            return Err(StoreError::Graphql(errors.to_string()));
        }
    }

    let payload = body
        .get("data")
        .and_then(|data| data.get("customerUpdate"))
        .cloned()
        .ok_or(StoreError::MissingData)?;

    if let Some(user_errors) = payload.get("userErrors").and_then(|u| u.as_array()) {
        if !user_errors.is_empty() {
            return Err(StoreError::UserErrors(
                Value::Array(user_errors.clone()).to_string(),
            ));
        }
    }

    Ok(payload)
}

#[async_trait]
impl ProfileStore for ShopifyClient {
    async fn update_metafields(
        &self,
        customer_id: &str,
        metafields: &[MetafieldRecord],
    ) -> Result<Value, StoreError> {
        let body = json!({
            "query": CUSTOMER_UPDATE_MUTATION,
            "variables": {
                "input": {
                    "id": customer_gid(customer_id),
                    "metafields": metafields,
                }
            }
        });

        debug!(
            "Upserting {} metafields for customer {}",
            metafields.len(),
            customer_id
        );

        let response = self
            .client
            .post(self.endpoint())
            .header(ACCESS_TOKEN_HEADER, &self.admin_token)
            .json(&body)
            .send()
            .await?;

        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(StoreError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let body: Value = response.json().await?;
        parse_mutation_response(body)
    }
}
