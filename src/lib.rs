//! # Qalam
//!
//! Arabic shaping and justified right-to-left layout for re-exporting OCR
//! text as PDF, without a full text-shaping library.
//!
//! ## Architecture
//!
//! ```text
//! OCR text
//!       ↓
//!   [text]     : sanitize, contextual forms + lām-alef, greedy RTL justify
//!       ↓
//!   [layout]   : paginate, page coordinates
//!       ↓
//!   [pdf]      : embed the font, paint glyph runs
//! ```
//!
//! The four core stages (`sanitize`, `shape`, `layout`, `paginate`) are pure
//! and total. Glyph widths come from an injected [`font::GlyphMetrics`];
//! everything that can fail (parsing requests, loading fonts) happens before
//! they run.

pub mod error;
pub mod font;
pub mod layout;
pub mod model;
pub mod pdf;
pub mod text;

pub use error::QalamError;
pub use layout::page_break::{paginate, Page, PageGeometry, PlacedLine};
pub use text::{layout, sanitize, shape};

use tracing::info;

use font::{FontMetrics, GlyphMetrics};
use layout::{LayoutEngine, LayoutPage};
use model::{ExportConfig, ExportDocument};
use pdf::PdfWriter;

/// Lay out `text` into pages using the given metrics.
pub fn layout_document(
    text: &str,
    metrics: &dyn GlyphMetrics,
    config: &ExportConfig,
) -> Vec<LayoutPage> {
    LayoutEngine::from_config(config).layout(text, metrics)
}

/// Render `text` to PDF bytes with the font in `font_data`.
///
/// The font is parsed before any layout work, so a bad font fails fast
/// with [`QalamError::FontError`].
pub fn render_pdf(
    text: &str,
    font_data: Vec<u8>,
    config: &ExportConfig,
) -> Result<Vec<u8>, QalamError> {
    let font = FontMetrics::from_font_data(font_data)?;
    let pages = layout_document(text, &font, config);
    let bytes = PdfWriter::new(config.typography.font_size).write(&pages, &config.metadata, &font)?;
    info!(pages = pages.len(), bytes = bytes.len(), "rendered pdf");
    Ok(bytes)
}

/// Render an export request described as JSON to PDF bytes.
///
/// `font_data` takes precedence over a font embedded in the request.
pub fn render_json(request_json: &str, font_data: Option<Vec<u8>>) -> Result<Vec<u8>, QalamError> {
    let request: ExportDocument = serde_json::from_str(request_json)?;
    let font_data = match (font_data, &request.font) {
        (Some(data), _) => data,
        (None, Some(entry)) => font::loader::read_font_source(&entry.src)?,
        (None, None) => {
            return Err(QalamError::FontError(
                "No font supplied: pass font bytes or set \"font.src\" in the request".to_string(),
            ))
        }
    };
    render_pdf(&request.text, font_data, &request.config)
}
