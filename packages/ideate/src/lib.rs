// ABOUTME: VibeSpecs ideate library - one-shot PRD generation and export
// ABOUTME: Provides the schema-constrained generator, prompts, and markdown renderer

pub mod error;
pub mod export_service;
pub mod prd_generator;
pub mod prompts;
pub mod schema;

pub use error::{GenerationError, Result};
pub use export_service::{export_document, export_filename, render_markdown, ExportResult};
pub use prd_generator::{parse_document, GeneratorSettings, PrdGenerator, RetryPolicy};
pub use schema::document_schema;
