//! Claude API client for the Anthropic Messages API

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::generator::{GeneratorError, TextGenerator, system_prompt};

const API_URL: &str = "https://api.anthropic.com/v1/messages";
const API_VERSION: &str = "2023-06-01";
const DEFAULT_MODEL: &str = "claude-sonnet-4-5-20250929";
const MAX_TOKENS: u32 = 2000;

/// Client for the Anthropic Claude Messages API
#[derive(Clone)]
pub struct ClaudeClient {
    http: reqwest::Client,
    api_key: String,
    model: String,
}

/// A message in the conversation
#[derive(Debug, Clone, Serialize)]
struct Message {
    role: String,
    content: String,
}

/// Individual content block within a response
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type")]
enum ContentBlock {
    #[serde(rename = "text")]
    Text { text: String },
    #[serde(other)]
    Other,
}

/// Request body for the Messages API
#[derive(Serialize)]
struct ApiRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    temperature: f32,
    system: &'a str,
    messages: Vec<Message>,
}

/// Response from the Messages API
#[derive(Debug, Deserialize)]
struct ApiResponse {
    content: Vec<ContentBlock>,
}

/// Error detail from the Messages API
#[derive(Debug, Deserialize)]
struct ApiError {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    message: String,
}

impl ClaudeClient {
    /// Create a new client with the given API key and optional model override
    pub fn new(api_key: String, model: Option<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key,
            model: model.unwrap_or_else(|| DEFAULT_MODEL.to_string()),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Send one user message under a system prompt and return the text reply
    pub async fn message(&self, system: &str, user_message: &str) -> Result<String, GeneratorError> {
        let request = ApiRequest {
            model: &self.model,
            max_tokens: MAX_TOKENS,
            temperature: 0.7,
            system,
            messages: vec![Message {
                role: "user".to_string(),
                content: user_message.to_string(),
            }],
        };

        let response = self
            .http
            .post(API_URL)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", API_VERSION)
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ApiError>(&body)
                .map(|api_err| api_err.error.message)
                .unwrap_or(body);
            return Err(GeneratorError::Api { status, message });
        }

        let response = response.json::<ApiResponse>().await?;
        extract_text(&response)
    }
}

/// First text block of an API response
fn extract_text(response: &ApiResponse) -> Result<String, GeneratorError> {
    response
        .content
        .iter()
        .find_map(|block| match block {
            ContentBlock::Text { text } => Some(text.clone()),
            ContentBlock::Other => None,
        })
        .ok_or(GeneratorError::EmptyResponse)
}

#[async_trait]
impl TextGenerator for ClaudeClient {
    async fn generate(&self, kind: &str, prompt: &str) -> Result<String, GeneratorError> {
        self.message(system_prompt(kind), prompt).await
    }
}
