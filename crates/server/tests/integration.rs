//! Integration tests for the MyMedi assessment server.
//!
//! The router is driven in-process with `oneshot`; a canned `TextGenerator`
//! stands in for the Claude client so no network access is needed.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use http_body_util::BodyExt;
use serde_json::{Value as JsonValue, json};
use tokio::sync::Notify;
use tower::ServiceExt;

use mymedi_server::ai::{GeneratorError, TextGenerator};
use mymedi_server::config::Config;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

const TEST_API_KEY: &str = "test-secret-key";
const SESSION: &str = "6f1c2a8e-3b4d-4c5e-9f60-718293a4b5c6";

const MEDICINE_SHEET: &str = "\
**BASIC INFORMATION:**
• Brand Name: [Crocin]
• Generic Name: Paracetamol
• Strength: 500mg

**CONTRAINDICATIONS:**
• Medical Conditions: severe liver disease; chronic alcohol use

**STORAGE:**
• Conditions: dry place, away from sunlight
";

const SYMPTOM_ANALYSIS: &str = "\
1. **Possible Causes:**
   - Muscle strain from lifting

2. **Urgency Level:**
   - High: sudden onset with numbness
";

const DIABETES_PLAN: &str = "\
**SECTION 1: DIABETES MEDICATIONS**
MED-1: Metformin | 500mg | Twice daily | After meals | Long-term | Biguanide | ₹30
**SECTION 7: DIABETES EMERGENCY PLAN**
WARNING-SIGNS: Shakiness | Blurred vision
";

/// Returns the same text for every prompt.
struct CannedGenerator(&'static str);

#[async_trait]
impl TextGenerator for CannedGenerator {
    async fn generate(&self, _kind: &str, _prompt: &str) -> Result<String, GeneratorError> {
        Ok(self.0.to_string())
    }
}

/// Always fails like an upstream outage.
struct FailingGenerator;

#[async_trait]
impl TextGenerator for FailingGenerator {
    async fn generate(&self, _kind: &str, _prompt: &str) -> Result<String, GeneratorError> {
        Err(GeneratorError::Api {
            status: 529,
            message: "Overloaded".to_string(),
        })
    }
}

/// Holds the first call until released; later calls answer immediately.
struct GatedGenerator {
    calls: AtomicUsize,
    entered: Notify,
    release: Notify,
}

#[async_trait]
impl TextGenerator for GatedGenerator {
    async fn generate(&self, _kind: &str, _prompt: &str) -> Result<String, GeneratorError> {
        if self.calls.fetch_add(1, Ordering::SeqCst) == 0 {
            self.entered.notify_one();
            self.release.notified().await;
            return Ok("**BASIC INFORMATION:**\n• Generic Name: Slow answer\n".to_string());
        }
        Ok("**BASIC INFORMATION:**\n• Generic Name: Fast answer\n".to_string())
    }
}

fn test_config() -> Config {
    Config {
        bind_address: "0.0.0.0:0".to_string(),
        api_key: Some(TEST_API_KEY.to_string()),
        cors_origins: vec!["*".to_string()],
        rate_limit_rps: 1000,
        anthropic_api_key: None,
        anthropic_model: None,
        session_ttl_secs: 3600,
        session_capacity: 100,
    }
}

/// Build the app router with test configuration.
fn test_app(generator: Option<Arc<dyn TextGenerator>>) -> Router {
    mymedi_server::build_app_with_generator(&test_config(), generator)
}

fn canned_app(text: &'static str) -> Router {
    test_app(Some(Arc::new(CannedGenerator(text))))
}

/// Send a request to the app and return (status, body as JSON).
async fn request(app: &Router, req: Request<Body>) -> (StatusCode, JsonValue) {
    let response = app.clone().oneshot(req).await.expect("Request failed");
    let status = response.status();
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("Failed to read body")
        .to_bytes();

    let body = if bytes.is_empty() {
        JsonValue::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(JsonValue::Null)
    };

    (status, body)
}

/// Build a GET request with auth header.
fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .header("X-API-Key", TEST_API_KEY)
        .body(Body::empty())
        .unwrap()
}

/// Build a POST request with JSON body and auth header.
fn post(uri: &str, body: JsonValue) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("Content-Type", "application/json")
        .header("X-API-Key", TEST_API_KEY)
        .body(Body::from(serde_json::to_vec(&body).unwrap()))
        .unwrap()
}

// ---------------------------------------------------------------------------
// Public endpoints
// ---------------------------------------------------------------------------

#[tokio::test]
async fn health_reports_generator() {
    let (status, body) = request(&test_app(None), get("/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["generator"], false);

    let (_, body) = request(&canned_app(""), get("/health")).await;
    assert_eq!(body["generator"], true);
}

#[tokio::test]
async fn metrics_endpoint_renders() {
    let app = canned_app(MEDICINE_SHEET);
    request(&app, post("/api/medicine", json!({"medicine": "Crocin"}))).await;

    let response = app.clone().oneshot(get("/metrics")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn responses_carry_request_id() {
    let app = test_app(None);

    let response = app.clone().oneshot(get("/health")).await.unwrap();
    assert!(response.headers().contains_key("X-Request-ID"));

    let req = Request::builder()
        .uri("/health")
        .header("X-Request-ID", "trace-42")
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(req).await.unwrap();
    assert_eq!(response.headers()["X-Request-ID"], "trace-42");
}

// ---------------------------------------------------------------------------
// Auth
// ---------------------------------------------------------------------------

#[tokio::test]
async fn api_requires_key() {
    let app = canned_app(MEDICINE_SHEET);
    let req = Request::builder()
        .method("POST")
        .uri("/api/medicine")
        .header("Content-Type", "application/json")
        .body(Body::from(r#"{"medicine": "Crocin"}"#))
        .unwrap();

    let (status, body) = request(&app, req).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["code"], "unauthorized");
}

#[tokio::test]
async fn api_open_without_configured_key() {
    let config = Config {
        api_key: None,
        ..test_config()
    };
    let app = mymedi_server::build_app_with_generator(&config, None);
    let req = Request::builder()
        .method("POST")
        .uri("/api/medicine")
        .header("Content-Type", "application/json")
        .body(Body::from(r#"{"medicine": "Crocin"}"#))
        .unwrap();

    let (status, _) = request(&app, req).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn api_is_rate_limited() {
    let config = Config {
        rate_limit_rps: 1,
        ..test_config()
    };
    let app = mymedi_server::build_app_with_generator(&config, None);
    let body = json!({"medicine": "Crocin"});

    let (status, _) = request(&app, post("/api/medicine", body.clone())).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = request(&app, post("/api/medicine", body)).await;
    assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(body["error"]["code"], "rate_limited");

    // Public endpoints are outside the quota
    let (status, _) = request(&app, get("/health")).await;
    assert_eq!(status, StatusCode::OK);
}

// ---------------------------------------------------------------------------
// Assessments
// ---------------------------------------------------------------------------

#[tokio::test]
async fn medicine_record_from_response() {
    let app = canned_app(MEDICINE_SHEET);
    let (status, body) = request(&app, post("/api/medicine", json!({"medicine": "Crocin"}))).await;

    assert_eq!(status, StatusCode::OK);
    let record = &body["record"];
    assert_eq!(record["name"], "Crocin");
    assert_eq!(record["generic_name"], "Paracetamol");
    assert_eq!(record["strength"], "500mg");
    assert_eq!(
        record["contraindicated_conditions"],
        json!(["severe liver disease", "chronic alcohol use"])
    );
    assert_eq!(
        record["storage_conditions"],
        json!(["dry place", "away from sunlight"])
    );
    assert_eq!(record["dosage_adults"], "Follow doctor's prescription");

    let fallbacks: Vec<&str> = body["fallbacks"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|v| v.as_str())
        .collect();
    assert!(fallbacks.contains(&"dosage_adults"));
    assert!(!fallbacks.contains(&"generic_name"));
    assert!(body.get("session").is_none());
    assert!(body.get("generation").is_none());
}

#[tokio::test]
async fn medicine_without_generator_is_all_fallbacks() {
    let (status, body) =
        request(&test_app(None), post("/api/medicine", json!({"medicine": "Dolo 650"}))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["record"]["name"], "Dolo 650");
    assert_eq!(body["record"]["generic_name"], "Not specified");
    assert_eq!(
        body["fallbacks"].as_array().unwrap().len(),
        body["record"].as_object().unwrap().len()
    );
}

#[tokio::test]
async fn generator_failure_falls_back() {
    let app = test_app(Some(Arc::new(FailingGenerator)));
    let (status, body) = request(&app, post("/api/medicine", json!({"medicine": "Crocin"}))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["record"]["strength"], "Not specified");
}

#[tokio::test]
async fn failed_symptom_analysis_is_not_low_urgency() {
    let symptoms = json!({"body_part": "chest", "symptoms": "tightness"});

    for app in [test_app(None), test_app(Some(Arc::new(FailingGenerator)))] {
        let (status, body) = request(&app, post("/api/symptom-analysis", symptoms.clone())).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["urgency"], "Medium");
        assert_eq!(body["fallbacks"].as_array().unwrap().len(), 6);
    }
}

#[tokio::test]
async fn blank_medicine_rejected() {
    let (status, body) =
        request(&canned_app(""), post("/api/medicine", json!({"medicine": "  "}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "bad_request");
}

#[tokio::test]
async fn symptom_analysis_with_urgency() {
    let app = canned_app(SYMPTOM_ANALYSIS);
    let (status, body) = request(
        &app,
        post(
            "/api/symptom-analysis",
            json!({"body_part": "lower back", "symptoms": "sharp pain"}),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["urgency"], "High");
    assert_eq!(body["record"]["possible_causes"], json!(["Muscle strain from lifting"]));
    assert_eq!(body["record"]["home_remedies"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn diabetes_plan_with_tables() {
    let app = canned_app(DIABETES_PLAN);
    let (status, body) = request(
        &app,
        post(
            "/api/diabetes-plan",
            json!({"profile": {"full_name": "Asha Rao", "diabetes_type": "Type 2", "age": 52}}),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["record"]["warning_signs"], json!(["Shakiness", "Blurred vision"]));

    let medications = &body["tables"]["medications"];
    let rows = medications["rows"].as_array().unwrap();
    assert_eq!(rows.len(), 5);
    assert_eq!(rows[0][0], "Metformin");
    assert_eq!(rows[1][0], "Diabetes Medicine 2");
    assert_eq!(body["tables"].as_object().unwrap().len(), 6);
}

#[tokio::test]
async fn diabetes_plan_requires_name() {
    let (status, _) = request(
        &canned_app(DIABETES_PLAN),
        post("/api/diabetes-plan", json!({"profile": {"diabetes_type": "Type 1"}})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

// ---------------------------------------------------------------------------
// Sessions
// ---------------------------------------------------------------------------

#[tokio::test]
async fn session_keeps_latest_assessment() {
    let app = canned_app(MEDICINE_SHEET);
    let uri = format!("/api/sessions/{}/latest", SESSION);

    let (status, _) = request(&app, get(&uri)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    for expected in [1, 2] {
        let (status, body) = request(
            &app,
            post("/api/medicine", json!({"medicine": "Crocin", "session": SESSION})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["generation"], expected);
        assert_eq!(body["session"], SESSION);
    }

    let (status, body) = request(&app, get(&uri)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["kind"], "medicine");
    assert_eq!(body["generation"], 2);
    assert_eq!(body["assessment"]["record"]["generic_name"], "Paracetamol");
}

#[tokio::test]
async fn least_recent_session_is_evicted() {
    let config = Config {
        session_capacity: 1,
        ..test_config()
    };
    let app = mymedi_server::build_app_with_generator(
        &config,
        Some(Arc::new(CannedGenerator(MEDICINE_SHEET))),
    );
    let other = "0d9e8f7a-6b5c-4d3e-8f21-a0b1c2d3e4f5";

    for session in [SESSION, other] {
        let (status, _) = request(
            &app,
            post("/api/medicine", json!({"medicine": "Crocin", "session": session})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }

    let (status, _) = request(&app, get(&format!("/api/sessions/{}/latest", SESSION))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = request(&app, get(&format!("/api/sessions/{}/latest", other))).await;
    assert_eq!(status, StatusCode::OK);

    let (_, health) = request(&app, get("/health")).await;
    assert_eq!(health["sessions"], 1);
}

#[tokio::test]
async fn superseded_request_is_rejected() {
    let generator = Arc::new(GatedGenerator {
        calls: AtomicUsize::new(0),
        entered: Notify::new(),
        release: Notify::new(),
    });
    let app = test_app(Some(generator.clone()));
    let body = json!({"medicine": "Crocin", "session": SESSION});

    let slow = tokio::spawn({
        let app = app.clone();
        let body = body.clone();
        async move { request(&app, post("/api/medicine", body)).await }
    });
    generator.entered.notified().await;

    let (status, fast) = request(&app, post("/api/medicine", body)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fast["generation"], 2);

    generator.release.notify_one();
    let (status, stale) = slow.await.unwrap();
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(stale["error"]["code"], "conflict");

    let (_, latest) = request(&app, get(&format!("/api/sessions/{}/latest", SESSION))).await;
    assert_eq!(latest["generation"], 2);
    assert_eq!(latest["assessment"]["record"]["generic_name"], "Fast answer");
}

// ---------------------------------------------------------------------------
// Passthrough
// ---------------------------------------------------------------------------

#[tokio::test]
async fn ai_integration_returns_text() {
    let app = canned_app("Drink water and rest.");
    let (status, body) = request(
        &app,
        post("/api/ai-integration", json!({"message": "Tips for a cold?", "type": "general"})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["response"], "Drink water and rest.");
}

#[tokio::test]
async fn ai_integration_validates_input() {
    let app = canned_app("unused");

    let (status, _) = request(&app, post("/api/ai-integration", json!({"type": "general"}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = request(&app, post("/api/ai-integration", json!({"prompt": "hi"}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn ai_integration_without_generator_unavailable() {
    let (status, body) = request(
        &test_app(None),
        post("/api/ai-integration", json!({"prompt": "hi", "type": "general"})),
    )
    .await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["error"]["code"], "unavailable");
}

#[tokio::test]
async fn ai_integration_upstream_failure() {
    let (status, body) = request(
        &test_app(Some(Arc::new(FailingGenerator))),
        post("/api/ai-integration", json!({"prompt": "hi", "type": "general"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["error"]["code"], "upstream_error");
}
