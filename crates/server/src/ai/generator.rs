//! Text generation seam between the HTTP handlers and the upstream model

use async_trait::async_trait;
use thiserror::Error;

/// Errors from the upstream text generator
#[derive(Debug, Error)]
pub enum GeneratorError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Claude API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("No text content in response")]
    EmptyResponse,
}

/// Produces one free-text answer for a prompt.
///
/// `kind` is the request type sent by the page (`medicine`,
/// `symptom-analysis`, `assessment`, ...) and selects the system prompt.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, kind: &str, prompt: &str) -> Result<String, GeneratorError>;
}

const GENERAL_PROMPT: &str = "You are MyMedi.ai, a careful healthcare information assistant. \
Answer clearly for a general audience, follow any output format the user requests exactly, \
and remind the reader to consult a qualified healthcare professional for diagnosis and treatment.";

const MEDICINE_PROMPT: &str = "You are an experienced clinical pharmacist. \
Give accurate, practical medicine information in exactly the labeled format requested. \
Use bold section headings and `Label: value` lines, and never leave a label without a value.";

const SYMPTOM_PROMPT: &str = "You are an experienced physician triaging reported symptoms. \
Use the numbered, bold headings requested with bulleted points under each, \
and state an urgency level of Low, Medium or High.";

const ASSESSMENT_PROMPT: &str = "You are a diabetes specialist. \
Follow the requested section and pipe-separated row format exactly, \
with specific dosages, timings and prices in Indian rupees.";

/// System prompt for a request type
pub fn system_prompt(kind: &str) -> &'static str {
    match kind {
        "medicine" => MEDICINE_PROMPT,
        "symptom-analysis" => SYMPTOM_PROMPT,
        "assessment" | "diabetes-plan" => ASSESSMENT_PROMPT,
        _ => GENERAL_PROMPT,
    }
}
