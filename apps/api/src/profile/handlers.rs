use axum::{extract::State, http::HeaderMap, Json};
use serde::Deserialize;
use serde_json::Value;

use crate::auth::require_auth;
use crate::errors::AppError;
use crate::profile::metafields::{build_metafields, TagMapping};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncProfileRequest {
    #[serde(default)]
    pub customer_id: Option<String>,
    #[serde(default)]
    pub metafields: TagMapping,
}

/// POST /api/v1/profile/sync
///
/// Gate → metafield payload builder → profile store. The store's mutation
/// result is passed through to the caller verbatim.
pub async fn handle_sync_profile(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<SyncProfileRequest>,
) -> Result<Json<Value>, AppError> {
    require_auth(&headers, &state.config.api_secret)?;

    let customer_id = req
        .customer_id
        .as_deref()
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .ok_or_else(|| {
            AppError::InvalidRequest("`customerId` must be a non-empty string".to_string())
        })?;

    let records = build_metafields(&req.metafields);

    let result = state
        .store
        .update_metafields(customer_id, &records)
        .await
        .map_err(|e| AppError::Store(e.to_string()))?;

    Ok(Json(result))
}
