//! Health check endpoint

use axum::{Json, extract::State};
use serde::Serialize;

use crate::state::AppState;

/// Health check response
#[derive(Serialize)]
pub struct HealthResponse {
    status: &'static str,
    /// Whether assessments are backed by a generator or fall back entirely
    generator: bool,
    sessions: usize,
}

/// GET /health - Report liveness and whether a text generator is configured
pub async fn check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        generator: state.generator.is_some(),
        sessions: state.sessions.len(),
    })
}
