//! Session lookups

use axum::{
    Json,
    extract::{Path, State},
};
use uuid::Uuid;

use super::assessments::SessionSnapshot;
use crate::error::AppError;
use crate::state::AppState;

/// GET /api/sessions/{id}/latest - Last accepted assessment of a session
pub async fn latest(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionSnapshot>, AppError> {
    state
        .sessions
        .latest(&id)
        .map(|(_, snapshot)| Json(snapshot))
        .ok_or_else(|| AppError::NotFound(format!("No assessment recorded for session {}", id)))
}
