//! Structured error types for the Qalam renderer.
//!
//! The shaping and layout functions themselves never fail. Errors only come
//! from the surfaces around them: parsing an export request, loading the
//! font, and writing output.

use thiserror::Error;

/// The unified error type returned by the fallible public Qalam API.
#[derive(Debug, Error)]
pub enum QalamError {
    /// JSON input failed to parse as a valid export request.
    #[error("Failed to parse export request: {source}{}", format_hint(.hint))]
    ParseError {
        #[source]
        source: serde_json::Error,
        hint: String,
    },
    /// The font could not be decoded or parsed. Raised before layout runs.
    #[error("Font error: {0}")]
    FontError(String),
    /// Layout or PDF generation failed.
    #[error("Render error: {0}")]
    RenderError(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

fn format_hint(hint: &str) -> String {
    if hint.is_empty() {
        String::new()
    } else {
        format!("\n  Hint: {}", hint)
    }
}

impl From<serde_json::Error> for QalamError {
    fn from(e: serde_json::Error) -> Self {
        let hint = match e.classify() {
            serde_json::error::Category::Syntax => {
                "Check for trailing commas, missing quotes, or unescaped characters.".to_string()
            }
            serde_json::error::Category::Data => {
                "The JSON is valid but doesn't match the export request schema. Check field names and types.".to_string()
            }
            serde_json::error::Category::Eof => {
                "Unexpected end of input. Is the JSON truncated?".to_string()
            }
            serde_json::error::Category::Io => String::new(),
        };
        QalamError::ParseError { source: e, hint }
    }
}
