pub mod ai_integration;
pub mod assessments;
pub mod health;
pub mod metrics;
pub mod sessions;

use axum::{Router, routing::{get, post}};

use crate::state::AppState;

/// Build `/api` routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/ai-integration", post(ai_integration::generate))
        .route("/medicine", post(assessments::medicine))
        .route("/symptom-analysis", post(assessments::symptom_analysis))
        .route("/diabetes-plan", post(assessments::diabetes_plan))
        .route("/sessions/{id}/latest", get(sessions::latest))
}
