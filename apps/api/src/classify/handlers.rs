use axum::{extract::State, http::HeaderMap, Json};
use serde::{Deserialize, Serialize};

use crate::auth::require_auth;
use crate::classify::prompt::compile_prompt;
use crate::classify::validate::{validate_completion, ClassificationResult};
use crate::errors::AppError;
use crate::llm_client::Usage;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ClassifyRequest {
    #[serde(default)]
    pub question: Option<String>,
    #[serde(default)]
    pub answer: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ClassifyResponse {
    pub tags: ClassificationResult,
    pub usage: Usage,
}

/// POST /api/v1/classify
///
/// Gate → prompt compiler → completion provider → validator. A failure at any
/// stage aborts the pipeline and maps to exactly one error response.
pub async fn handle_classify(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<ClassifyRequest>,
) -> Result<Json<ClassifyResponse>, AppError> {
    require_auth(&headers, &state.config.api_secret)?;

    let answer = req
        .answer
        .as_deref()
        .map(str::trim)
        .filter(|a| !a.is_empty())
        .ok_or_else(|| AppError::InvalidRequest("`answer` must be a non-empty string".to_string()))?;

    let prompt = compile_prompt(req.question.as_deref(), answer);

    let completion = state
        .llm
        .complete(&prompt.text)
        .await
        .map_err(|e| AppError::Provider(e.to_string()))?;

    let tags = validate_completion(&completion.text, prompt.gender_flow)?;

    Ok(Json(ClassifyResponse {
        tags,
        usage: completion.usage,
    }))
}
