//! Plain-text ingestion for the CLI.
//!
//! The pipeline consumes extracted text only. Anything still inside a
//! container format (EPUB, PDF, ...) must go through an external extraction
//! step first, so those extensions are rejected with a pointer rather than
//! half-parsed.

use anyhow::{bail, Context, Result};
use std::fs;
use std::path::Path;
use tracing::{info, warn};

fn is_plain_text(path: &Path) -> bool {
    matches!(
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase()),
        Some(ext) if ext == "txt" || ext == "md" || ext == "markdown"
    )
}

/// Read a plain-text file for processing.
pub fn load_plain_text(path: &Path) -> Result<String> {
    if !is_plain_text(path) {
        bail!(
            "{} is not plain text; extract it to .txt first (container \
             formats are handled by an external extraction step)",
            path.display()
        );
    }

    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    if text.trim().is_empty() {
        warn!(path = %path.display(), "File contains no readable text");
    } else {
        info!(
            path = %path.display(),
            total_chars = text.len(),
            "Loaded plain text content"
        );
    }
    Ok(text)
}
