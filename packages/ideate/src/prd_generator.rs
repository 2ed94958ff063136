// ABOUTME: PRD generator that turns a raw idea into a validated document
// ABOUTME: Calls the structured generation capability under a timeout and enforces the document contract

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, error, info, warn};
use vibespecs_ai::{strip_code_fence, GenerationRequest, StructuredGeneration};
use vibespecs_core::{validate_document, Document, DocumentValidationError};

use crate::error::{GenerationError, Result};
use crate::prompts;
use crate::schema::document_schema;

/// Tunables for a single generation call
#[derive(Debug, Clone)]
pub struct GeneratorSettings {
    pub temperature: f32,
    pub timeout: Duration,
}

impl Default for GeneratorSettings {
    fn default() -> Self {
        Self {
            temperature: 0.4,
            timeout: Duration::from_secs(120),
        }
    }
}

/// How many times to re-run a generation that failed upstream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts including the first. Zero is treated as one.
    pub max_attempts: u32,
    /// Delay before the second attempt; grows linearly with the attempt number.
    pub backoff: Duration,
}

impl RetryPolicy {
    pub fn none() -> Self {
        Self {
            max_attempts: 1,
            backoff: Duration::ZERO,
        }
    }

    /// Policy allowing `retries` extra attempts after the first.
    pub fn retries(retries: u32, backoff: Duration) -> Self {
        Self {
            max_attempts: retries.saturating_add(1),
            backoff,
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::none()
    }
}

/// PRD generator responsible for AI-powered document creation
#[derive(Clone)]
pub struct PrdGenerator {
    backend: Arc<dyn StructuredGeneration>,
    settings: GeneratorSettings,
}

impl PrdGenerator {
    pub fn new(backend: Arc<dyn StructuredGeneration>) -> Self {
        Self::with_settings(backend, GeneratorSettings::default())
    }

    pub fn with_settings(backend: Arc<dyn StructuredGeneration>, settings: GeneratorSettings) -> Self {
        Self { backend, settings }
    }

    pub fn settings(&self) -> &GeneratorSettings {
        &self.settings
    }

    /// Generate a complete document from a free-text idea.
    ///
    /// Either returns a document that passes every validation rule or an
    /// error; partial documents are never returned.
    pub async fn generate(&self, idea: &str) -> Result<Document> {
        if idea.trim().is_empty() {
            return Err(GenerationError::InvalidInput(
                "Idea must not be empty".to_string(),
            ));
        }

        let request = GenerationRequest {
            prompt: prompts::idea_prompt(idea),
            system_prompt: Some(prompts::system_prompt().to_string()),
            response_schema: Some(document_schema()),
            temperature: self.settings.temperature,
        };

        info!(
            "Generating PRD: idea_len={}, temperature={}, timeout={:?}",
            idea.len(),
            self.settings.temperature,
            self.settings.timeout
        );

        let raw = match tokio::time::timeout(self.settings.timeout, self.backend.generate(request))
            .await
        {
            Ok(result) => result?,
            Err(_) => {
                error!("PRD generation timed out after {:?}", self.settings.timeout);
                return Err(GenerationError::Upstream(format!(
                    "Generation timed out after {} seconds",
                    self.settings.timeout.as_secs()
                )));
            }
        };

        let document = parse_document(&raw)?;
        info!(
            "Generated PRD '{}' with {} features",
            document.app_name,
            document.features.len()
        );
        Ok(document)
    }

    /// Generate, re-running the whole call with identical input while the
    /// failure is upstream and attempts remain.
    pub async fn generate_with_retry(&self, idea: &str, policy: &RetryPolicy) -> Result<Document> {
        let max_attempts = policy.max_attempts.max(1);
        let mut attempt = 1;

        loop {
            match self.generate(idea).await {
                Ok(document) => return Ok(document),
                Err(err) if err.is_retryable() && attempt < max_attempts => {
                    warn!(
                        "Generation attempt {}/{} failed: {}",
                        attempt, max_attempts, err
                    );
                    tokio::time::sleep(policy.backoff * attempt).await;
                    attempt += 1;
                }
                Err(err) => return Err(err),
            }
        }
    }
}

/// Turn raw model output into a validated document.
///
/// Output that is not JSON is an upstream failure; JSON that does not fit the
/// closed document shape or breaks a rule is a validation failure.
pub fn parse_document(raw: &str) -> Result<Document> {
    let value: serde_json::Value = serde_json::from_str(strip_code_fence(raw)).map_err(|e| {
        error!("Generated output is not JSON: {}", e);
        GenerationError::Upstream(format!("Generated output is not valid JSON: {}", e))
    })?;

    let document: Document = serde_json::from_value(value).map_err(|e| {
        debug!("Generated output does not match the document shape: {}", e);
        GenerationError::Validation(DocumentValidationError::single("document", e.to_string()))
    })?;

    validate_document(&document)?;
    Ok(document)
}
