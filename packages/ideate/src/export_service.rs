// ABOUTME: Markdown rendering and export for generated documents
// ABOUTME: Deterministic layout of every section plus the download filename rule

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;
use vibespecs_core::Document;

const MARKDOWN_MIME_TYPE: &str = "text/markdown";

lazy_static! {
    static ref WHITESPACE_RUN: Regex = Regex::new(r"\s+").expect("static regex is valid");
}

/// Export result with content and metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportResult {
    pub content: String,
    pub file_name: String,
    pub mime_type: String,
    pub size_bytes: usize,
}

/// Render the document as markdown.
///
/// Sections appear in a fixed order separated by one blank line. The
/// could-have and won't-have scope lists are never rendered.
pub fn render_markdown(document: &Document) -> String {
    let mut blocks: Vec<String> = Vec::new();

    blocks.push(format!("# {}\n> {}", document.app_name, document.tagline));
    blocks.push(format!("## Executive Summary\n{}", document.summary));
    blocks.push(format!(
        "## Target Users\n{}",
        bullet_list(&document.target_users)
    ));

    let features: Vec<String> = document
        .features
        .iter()
        .map(|feature| {
            format!(
                "### {} ({})\n{}\n**Acceptance Criteria:**\n{}",
                feature.name,
                feature.priority,
                feature.user_story,
                bullet_list(&feature.acceptance_criteria)
            )
        })
        .collect();
    blocks.push(titled_blocks("## Features", &features));

    let stack = &document.tech_stack;
    blocks.push(format!(
        "## Tech Stack\n- Frontend: {}\n- Backend: {}\n- Database: {}\n- Auth: {}\n- Deployment: {}",
        stack.frontend, stack.backend, stack.database, stack.auth, stack.deployment
    ));

    let entities: Vec<String> = document
        .data_models
        .iter()
        .map(|entity| {
            format!(
                "### {}\n{}\nAttributes:\n{}",
                entity.name,
                entity.description,
                bullet_list(&entity.attributes)
            )
        })
        .collect();
    blocks.push(titled_blocks("## Data Models", &entities));

    blocks.push(format!("## User Flow\n{}", document.user_flow));

    blocks.push(format!(
        "## MVP Scope\n### Must Have\n{}\n### Should Have\n{}",
        bullet_list(&document.mvp_scope.must_have),
        bullet_list(&document.mvp_scope.should_have)
    ));

    let mut markdown = blocks.join("\n\n");
    markdown.push('\n');
    markdown
}

/// Heading sits directly on its first item; later items are one blank line apart.
fn titled_blocks(heading: &str, items: &[String]) -> String {
    if items.is_empty() {
        return heading.to_string();
    }
    format!("{}\n{}", heading, items.join("\n\n"))
}

fn bullet_list(items: &[String]) -> String {
    items
        .iter()
        .map(|item| format!("- {}", item))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Download filename for a document: lower-cased app name with whitespace
/// runs and path separators replaced by `-`, suffixed `-prd.md`.
/// Leading and trailing whitespace is dropped before dashing.
pub fn export_filename(app_name: &str) -> String {
    let lowered = app_name.trim().to_lowercase();
    let dashed = WHITESPACE_RUN.replace_all(&lowered, "-");
    let stem: String = dashed
        .chars()
        .map(|c| if c == '/' || c == '\\' { '-' } else { c })
        .collect();

    if stem.is_empty() {
        "untitled-prd.md".to_string()
    } else {
        format!("{}-prd.md", stem)
    }
}

/// Build the markdown export artifact for a document.
pub fn export_document(document: &Document) -> ExportResult {
    let content = render_markdown(document);
    let file_name = export_filename(&document.app_name);
    debug!("Exported '{}' ({} bytes)", file_name, content.len());

    ExportResult {
        size_bytes: content.len(),
        content,
        file_name,
        mime_type: MARKDOWN_MIME_TYPE.to_string(),
    }
}
