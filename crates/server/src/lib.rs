//! mymedi-server library crate
//!
//! Exposes `build_app` and `config` for integration tests.
//! The actual binary entrypoint is in `main.rs`.

pub mod ai;
pub mod config;
mod error;
mod middleware;
mod routes;
mod state;

use std::sync::Arc;

use axum::{Extension, Router, middleware as axum_mw, routing::get};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use ai::{ClaudeClient, TextGenerator};
use config::Config;
use middleware::ApiKeyAuth;
use state::AppState;

/// Build the application with the Claude client when `ANTHROPIC_API_KEY` is set.
pub fn build_app(config: &Config) -> Router {
    let generator = config.anthropic_api_key.as_ref().map(|key| {
        let client = ClaudeClient::new(key.clone(), config.anthropic_model.clone());
        tracing::info!(model = client.model(), "Using Claude text generator");
        Arc::new(client) as Arc<dyn TextGenerator>
    });
    build_app_with_generator(config, generator)
}

/// Build the full application router with all routes and middleware.
///
/// Tests pass their own generator here instead of a network client.
pub fn build_app_with_generator(
    config: &Config,
    generator: Option<Arc<dyn TextGenerator>>,
) -> Router {
    let auth = ApiKeyAuth::new(config.api_key.clone());
    let rate_limiter = middleware::create_rate_limiter(config.rate_limit_rps);

    let api = Router::new()
        .nest("/api", routes::api_routes())
        .layer(axum_mw::from_fn(middleware::auth_middleware))
        .layer(Extension(auth))
        .layer(axum_mw::from_fn(middleware::rate_limit_middleware))
        .layer(Extension(rate_limiter));

    // build_recorder() + set_global_recorder() so a second build (tests)
    // keeps the first recorder instead of panicking.
    let recorder = metrics_exporter_prometheus::PrometheusBuilder::new().build_recorder();
    let prometheus_handle = recorder.handle();
    let _ = metrics::set_global_recorder(recorder);

    let public = Router::new()
        .route("/health", get(routes::health::check))
        .route("/metrics", get(routes::metrics::get))
        .layer(Extension(prometheus_handle));

    Router::new()
        .merge(public)
        .merge(api)
        .with_state(AppState::new(config, generator))
        .layer(axum_mw::from_fn(middleware::audit_middleware))
        .layer(axum_mw::from_fn(middleware::request_id_middleware))
        .layer(cors_layer(&config.cors_origins))
        .layer(TraceLayer::new_for_http())
        .layer(axum_mw::from_fn(middleware::metrics_middleware))
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    if origins.iter().any(|o| o == "*") {
        layer.allow_origin(Any)
    } else {
        let origins: Vec<_> = origins.iter().filter_map(|o| o.parse().ok()).collect();
        layer.allow_origin(origins)
    }
}
