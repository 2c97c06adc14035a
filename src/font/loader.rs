//! Resolve a font source string from an export request to raw bytes.

use crate::error::QalamError;

/// Load font bytes from a source string.
///
/// Supported `src` formats:
/// - `data:font/...;base64,...` (or `data:application/...`): data URI
/// - File path (absolute or explicitly relative), read from disk
/// - Raw base64-encoded font data
pub fn read_font_source(src: &str) -> Result<Vec<u8>, QalamError> {
    if src.starts_with("data:") {
        let comma_pos = src
            .find(',')
            .ok_or_else(|| QalamError::FontError("Invalid data URI: missing comma".to_string()))?;
        return base64_decode(&src[comma_pos + 1..]);
    }

    // Only explicit path prefixes count as paths: base64 text contains '/'.
    if src.starts_with('/') || src.starts_with("./") || src.starts_with("../") {
        return std::fs::read(src).map_err(|e| {
            QalamError::FontError(format!("Failed to read font file '{}': {}", src, e))
        });
    }

    base64_decode(src)
}

fn base64_decode(input: &str) -> Result<Vec<u8>, QalamError> {
    use base64::Engine;
    base64::engine::general_purpose::STANDARD
        .decode(input.trim())
        .map_err(|e| QalamError::FontError(format!("Base64 decode error: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn data_uri() {
        let bytes = read_font_source("data:font/ttf;base64,AAEAAA==").unwrap();
        assert_eq!(bytes, vec![0, 1, 0, 0]);
    }

    #[test]
    fn raw_base64() {
        assert_eq!(read_font_source("AAEAAA==").unwrap(), vec![0, 1, 0, 0]);
    }

    #[test]
    fn data_uri_without_comma() {
        assert!(matches!(
            read_font_source("data:font/ttf;base64"),
            Err(QalamError::FontError(_))
        ));
    }

    #[test]
    fn missing_file() {
        let err = read_font_source("/nonexistent/qalam-test-font.ttf").unwrap_err();
        assert!(err.to_string().contains("Failed to read font file"));
    }
}
