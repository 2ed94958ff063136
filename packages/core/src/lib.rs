// ABOUTME: Core types, validation, and utilities for VibeSpecs
// ABOUTME: Foundational package providing the document model shared by every other package

pub mod constants;
pub mod types;
pub mod utils;
pub mod validation;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_fixtures;

// Re-export main types
pub use types::{
    Document, Entity, Feature, Identity, MvpScope, Plan, Priority, Project, TechStack,
};

// Re-export constants
pub use constants::{default_database_path, vibespecs_dir};

// Re-export utilities
pub use utils::{generate_project_id, generate_user_id, now_millis};

// Re-export validation
pub use validation::{validate_document, DocumentValidationError, ValidationIssue};
