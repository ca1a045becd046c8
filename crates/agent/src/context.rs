//! Persona context loading.
//!
//! Runs once at startup. Both sources are optional: a missing file yields an
//! empty section and a broken one is logged and skipped, so the assistant
//! always starts.

use std::io::ErrorKind;
use std::path::Path;

use personachat_config::PersonaConfig;
use personachat_core::persona::PersonaContext;
use tracing::{debug, info, warn};

/// Load the persona's résumé and summary into an immutable context.
pub async fn load_persona(config: &PersonaConfig) -> PersonaContext {
    let resume = load_resume(&config.resume_path).await;
    let summary = load_summary(&config.summary_path).await;

    info!(
        persona = %config.name,
        resume_chars = resume.len(),
        summary_chars = summary.len(),
        "Persona context loaded"
    );

    PersonaContext::new(config.name.clone())
        .with_resume(resume)
        .with_summary(summary)
}

/// Extract the text of a résumé PDF.
pub async fn load_resume(path: &Path) -> String {
    let bytes = match tokio::fs::read(path).await {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            debug!(path = %path.display(), "No résumé file, skipping");
            return String::new();
        }
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Failed to read résumé");
            return String::new();
        }
    };

    // The parser runs on the blocking pool; a panic there surfaces as a JoinError.
    let parsed =
        tokio::task::spawn_blocking(move || pdf_extract::extract_text_from_mem(&bytes)).await;

    match parsed {
        Ok(Ok(text)) => text.trim().to_string(),
        Ok(Err(e)) => {
            warn!(path = %path.display(), error = %e, "Failed to parse résumé PDF");
            String::new()
        }
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Résumé parser aborted");
            String::new()
        }
    }
}

/// Read the plain-text summary.
pub async fn load_summary(path: &Path) -> String {
    match tokio::fs::read_to_string(path).await {
        Ok(text) => text,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            debug!(path = %path.display(), "No summary file, skipping");
            String::new()
        }
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Failed to read summary");
            String::new()
        }
    }
}
