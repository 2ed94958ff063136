// ABOUTME: AI service for making schema-constrained generation calls to Anthropic Claude
// ABOUTME: Handles API requests, forced tool output, response extraction, and usage logging

use std::env;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::{error, info, warn};

const ANTHROPIC_API_URL: &str = "https://api.anthropic.com/v1/messages";
const ANTHROPIC_VERSION: &str = "2023-06-01";
const DEFAULT_MODEL: &str = "claude-sonnet-4-20250514"; // Claude Sonnet 4 (May 2025)
const STRUCTURED_TOOL_NAME: &str = "submit_document";

/// Calculate appropriate max_tokens for a given model
fn get_max_tokens_for_model(model: &str) -> u32 {
    if model.contains("claude-3-haiku") || model.contains("claude-haiku") {
        4096
    } else if model.contains("claude-3-opus") || model.contains("claude-3-sonnet") {
        4096
    } else {
        // Documents carry two long IDE prompts; give Sonnet 4 class models room
        16000
    }
}

#[derive(Debug, Error)]
pub enum AIServiceError {
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    #[error("API error: {0}")]
    ApiError(String),

    #[error("Rate limited by provider: {0}")]
    RateLimited(String),

    #[error("Failed to parse response: {0}")]
    ParseError(String),

    #[error("No API key configured")]
    NoApiKey,

    #[error("Invalid response format")]
    InvalidResponse,
}

pub type AIServiceResult<T> = Result<T, AIServiceError>;

/// A single call to the generative capability.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    pub prompt: String,
    pub system_prompt: Option<String>,
    /// JSON Schema the output must satisfy. When present the raw output is a
    /// JSON document.
    pub response_schema: Option<Value>,
    pub temperature: f32,
}

/// The opaque generative capability: prompt plus schema in, raw text out.
#[async_trait]
pub trait StructuredGeneration: Send + Sync {
    async fn generate(&self, request: GenerationRequest) -> AIServiceResult<String>;
}

#[derive(Debug, Serialize)]
struct AnthropicRequest {
    model: String,
    max_tokens: u32,
    temperature: f32,
    messages: Vec<Message>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tools: Option<Vec<Tool>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_choice: Option<ToolChoice>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Message {
    role: String,
    content: String,
}

#[derive(Debug, Serialize)]
struct Tool {
    name: String,
    description: String,
    input_schema: Value,
}

#[derive(Debug, Serialize)]
struct ToolChoice {
    #[serde(rename = "type")]
    choice_type: String,
    name: String,
}

#[derive(Debug, Deserialize)]
struct AnthropicResponse {
    #[allow(dead_code)]
    id: String,
    content: Vec<ContentBlock>,
    usage: Usage,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ContentBlock {
    Text { text: String },
    ToolUse { name: String, input: Value },
    #[serde(other)]
    Other,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Usage {
    pub input_tokens: u32,
    pub output_tokens: u32,
}

impl Usage {
    pub fn total_tokens(&self) -> u32 {
        self.input_tokens + self.output_tokens
    }
}

/// AI service for making structured generation calls
pub struct AIService {
    client: Client,
    api_key: Option<String>,
    model: String,
    api_url: String,
}

impl AIService {
    /// Create HTTP client with timeout configuration
    fn create_client() -> Client {
        Client::builder()
            .timeout(Duration::from_secs(600))
            .connect_timeout(Duration::from_secs(10))
            .build()
            .unwrap_or_else(|e| {
                warn!("Failed to build tuned HTTP client ({}), using defaults", e);
                Client::new()
            })
    }

    /// Creates a new AI service instance
    /// API key is fetched from ANTHROPIC_API_KEY environment variable
    /// Model can be overridden with ANTHROPIC_MODEL environment variable
    pub fn new() -> Self {
        let api_key = env::var("ANTHROPIC_API_KEY").ok().filter(|k| !k.is_empty());
        if api_key.is_none() {
            info!("ANTHROPIC_API_KEY not set - generation requests will fail until configured");
        }

        let model = env::var("ANTHROPIC_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());

        if model != DEFAULT_MODEL {
            info!("Using custom Anthropic model: {}", model);
        }

        Self {
            client: Self::create_client(),
            api_key,
            model,
            api_url: ANTHROPIC_API_URL.to_string(),
        }
    }

    /// Creates a new AI service instance with an optional API key and model.
    /// A `None` model selects the default.
    pub fn with_settings(api_key: Option<String>, model: Option<String>) -> Self {
        Self {
            client: Self::create_client(),
            api_key,
            model: model.unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            api_url: ANTHROPIC_API_URL.to_string(),
        }
    }

    /// Creates a new AI service instance with a specific API key and model
    pub fn with_api_key_and_model(api_key: String, model: String) -> Self {
        Self::with_settings(Some(api_key), Some(model))
    }

    /// Point the service at a different messages endpoint (proxies, tests).
    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into();
        self
    }

    /// Get the model being used by this service
    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    fn build_request(&self, request: GenerationRequest) -> AnthropicRequest {
        let (tools, tool_choice) = match request.response_schema {
            Some(schema) => (
                Some(vec![Tool {
                    name: STRUCTURED_TOOL_NAME.to_string(),
                    description: "Submit the completed document. The input must match the \
                                  schema exactly; every field is required."
                        .to_string(),
                    input_schema: schema,
                }]),
                Some(ToolChoice {
                    choice_type: "tool".to_string(),
                    name: STRUCTURED_TOOL_NAME.to_string(),
                }),
            ),
            None => (None, None),
        };

        AnthropicRequest {
            model: self.model.clone(),
            max_tokens: get_max_tokens_for_model(&self.model),
            temperature: request.temperature,
            messages: vec![Message {
                role: "user".to_string(),
                content: request.prompt,
            }],
            system: request.system_prompt,
            tools,
            tool_choice,
        }
    }
}

impl Default for AIService {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl StructuredGeneration for AIService {
    /// Makes a generation call to Claude and returns the raw output.
    /// With a response schema the output is the forced tool input as JSON text;
    /// otherwise it is the first text block with any markdown fence removed.
    async fn generate(&self, request: GenerationRequest) -> AIServiceResult<String> {
        let api_key = self.api_key.as_ref().ok_or(AIServiceError::NoApiKey)?;
        let request = self.build_request(request);

        info!(
            "Making Anthropic API request: model={}, max_tokens={}, temperature={}, structured={}",
            request.model,
            request.max_tokens,
            request.temperature,
            request.tools.is_some()
        );

        let response = self
            .client
            .post(&self.api_url)
            .header("x-api-key", api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .header("content-type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    error!("Anthropic API request timed out");
                    AIServiceError::ApiError("Request timed out. The AI service may be overloaded or unavailable.".to_string())
                } else if e.is_connect() {
                    error!("Failed to connect to Anthropic API: {}", e);
                    AIServiceError::ApiError(format!(
                        "Connection failed: {}. Please check your internet connection.",
                        e
                    ))
                } else {
                    error!("Anthropic API request failed: {}", e);
                    AIServiceError::RequestFailed(e)
                }
            })?;

        info!(
            "Received response from Anthropic API: status={}",
            response.status()
        );

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            error!("Anthropic API error: {} - {}", status, error_text);
            if status == StatusCode::TOO_MANY_REQUESTS {
                return Err(AIServiceError::RateLimited(error_text));
            }
            return Err(AIServiceError::ApiError(format!(
                "API returned {}: {}",
                status, error_text
            )));
        }

        let anthropic_response: AnthropicResponse = response
            .json()
            .await
            .map_err(|e| AIServiceError::ParseError(e.to_string()))?;

        info!(
            "Anthropic usage: input_tokens={}, output_tokens={}, total={}",
            anthropic_response.usage.input_tokens,
            anthropic_response.usage.output_tokens,
            anthropic_response.usage.total_tokens()
        );

        extract_output(anthropic_response.content)
    }
}

/// Pull the raw output out of the response content blocks.
fn extract_output(blocks: Vec<ContentBlock>) -> AIServiceResult<String> {
    let mut first_text = None;

    for block in blocks {
        match block {
            ContentBlock::ToolUse { name, input } if name == STRUCTURED_TOOL_NAME => {
                return serde_json::to_string(&input)
                    .map_err(|e| AIServiceError::ParseError(e.to_string()));
            }
            ContentBlock::Text { text } if first_text.is_none() => first_text = Some(text),
            _ => {}
        }
    }

    let text = first_text.ok_or(AIServiceError::InvalidResponse)?;
    let cleaned = strip_code_fence(&text);
    if cleaned.is_empty() {
        return Err(AIServiceError::InvalidResponse);
    }
    Ok(cleaned.to_string())
}

/// Strip markdown code fences if present (```json ... ```)
pub fn strip_code_fence(text: &str) -> &str {
    let cleaned_text = text.trim();
    if !cleaned_text.starts_with("```") {
        return cleaned_text;
    }
    // First newline after the opening fence
    let start = cleaned_text.find('\n').map(|i| i + 1).unwrap_or(cleaned_text.len());
    // Closing fence, searched after start so the opening one is not matched
    let end = cleaned_text[start..]
        .rfind("```")
        .map(|i| i + start)
        .unwrap_or(cleaned_text.len());
    cleaned_text[start..end].trim()
}
