// ABOUTME: Error types for the ideate package
// ABOUTME: Classifies generation failures as configuration, upstream, validation, or input errors

use thiserror::Error;
use vibespecs_ai::AIServiceError;
use vibespecs_core::DocumentValidationError;

#[derive(Error, Debug)]
pub enum GenerationError {
    /// The generative capability is unavailable (no API key). Never retried.
    #[error("Generation is not configured: {0}")]
    Configuration(String),

    /// Transport failure, provider error, timeout, or output that is not JSON.
    #[error("Generation service failed: {0}")]
    Upstream(String),

    /// Output parsed but did not satisfy the document contract.
    #[error(transparent)]
    Validation(#[from] DocumentValidationError),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl GenerationError {
    /// Only upstream failures are worth re-running with the same input.
    pub fn is_retryable(&self) -> bool {
        matches!(self, GenerationError::Upstream(_))
    }
}

impl From<AIServiceError> for GenerationError {
    fn from(err: AIServiceError) -> Self {
        match err {
            AIServiceError::NoApiKey => GenerationError::Configuration(
                "No Anthropic API key configured. Set ANTHROPIC_API_KEY to enable generation."
                    .to_string(),
            ),
            other => GenerationError::Upstream(other.to_string()),
        }
    }
}

pub type Result<T> = std::result::Result<T, GenerationError>;
