// ABOUTME: One-shot generate command for the terminal
// ABOUTME: Generates a document from an idea and writes it as markdown or JSON

use std::path::{Path, PathBuf};

use anyhow::Context;
use colored::Colorize;
use tracing::info;
use vibespecs_config::Config;
use vibespecs_core::Document;
use vibespecs_ideate::export_document;

use crate::app::{build_generator, retry_policy};

pub enum GenerateOutput {
    /// Pretty JSON on stdout.
    Json,
    /// Markdown file inside this directory.
    Markdown(PathBuf),
}

/// Write the document's markdown export into `dir`, returning the file path.
pub fn write_export(dir: &Path, document: &Document) -> anyhow::Result<PathBuf> {
    let export = export_document(document);
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create output directory {}", dir.display()))?;

    let path = dir.join(&export.file_name);
    std::fs::write(&path, &export.content)
        .with_context(|| format!("Failed to write {}", path.display()))?;

    info!("Wrote {} ({} bytes)", path.display(), export.size_bytes);
    Ok(path)
}

pub async fn generate(config: &Config, idea: &str, output: GenerateOutput) -> anyhow::Result<()> {
    let generator = build_generator(config);
    let document = generator
        .generate_with_retry(idea, &retry_policy(config))
        .await
        .context("Generation failed")?;

    match output {
        GenerateOutput::Json => {
            println!("{}", serde_json::to_string_pretty(&document)?);
        }
        GenerateOutput::Markdown(dir) => {
            let path = write_export(&dir, &document)?;
            println!("{} {}", "Saved".green(), path.display());
        }
    }

    Ok(())
}
