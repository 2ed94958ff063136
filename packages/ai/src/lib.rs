// ABOUTME: Generative model integration
// ABOUTME: Capability trait for schema-constrained generation and its Anthropic-backed adapter

pub mod service;

// Re-export service types
pub use service::{
    strip_code_fence, AIService, AIServiceError, AIServiceResult, GenerationRequest,
    StructuredGeneration, Usage,
};
