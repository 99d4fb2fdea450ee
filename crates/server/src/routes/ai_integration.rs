//! Raw text generation passthrough used by pages that parse the answer themselves

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct GenerateRequest {
    pub message: Option<String>,
    pub prompt: Option<String>,
    #[serde(rename = "type", default)]
    pub kind: String,
}

#[derive(Debug, Serialize)]
pub struct GenerateResponse {
    pub response: String,
}

impl GenerateRequest {
    /// `message` wins over `prompt`; blank values count as missing.
    fn text(&self) -> Option<&str> {
        [&self.message, &self.prompt]
            .into_iter()
            .flatten()
            .map(|s| s.trim())
            .find(|s| !s.is_empty())
    }
}

/// POST /api/ai-integration
pub async fn generate(
    State(state): State<AppState>,
    Json(req): Json<GenerateRequest>,
) -> Result<Json<GenerateResponse>, AppError> {
    let kind = req.kind.trim();
    if kind.is_empty() {
        return Err(AppError::BadRequest("Missing type".to_string()));
    }
    let prompt = req
        .text()
        .ok_or_else(|| AppError::BadRequest("Missing message or prompt".to_string()))?;

    let generator = state
        .generator
        .as_ref()
        .ok_or_else(|| AppError::Unavailable("Text generation is not configured".to_string()))?;

    let response = generator.generate(kind, prompt).await?;
    tracing::info!(kind, chars = response.len(), "Generated response");

    Ok(Json(GenerateResponse { response }))
}
