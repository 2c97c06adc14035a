//! # Arabic Text Pipeline
//!
//! Sanitizing, shaping and line breaking for the fallback renderer:
//!
//! ```text
//! raw OCR text → sanitize → shape → layout (break + justify) → paginate
//! ```
//!
//! Each stage is a pure function of its input. Measurement is injected as a
//! closure so nothing here depends on a particular font implementation.

pub mod bidi;
pub mod forms;
pub mod justify;
pub mod sanitize;
pub mod shaping;

pub use justify::{layout, layout_paragraphs, Line, LineAlignment, Placement};
pub use sanitize::sanitize;
pub use shaping::{shape, shape_paragraph};

use serde::Serialize;

/// One whitespace-delimited word after sanitizing, shaping and ligature
/// substitution. The atomic unit of line breaking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShapedToken {
    /// Presentation-form codepoints in logical order.
    pub glyphs: Vec<char>,
}

impl ShapedToken {
    pub fn new(glyphs: Vec<char>) -> Self {
        Self { glyphs }
    }

    /// The token as a string (logical order).
    pub fn text(&self) -> String {
        self.glyphs.iter().collect()
    }
}

/// A shaped token plus its advance width in points.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MeasuredToken {
    pub token: ShapedToken,
    pub width: f64,
}

impl MeasuredToken {
    pub fn new(token: ShapedToken, width: f64) -> Self {
        Self { token, width }
    }
}

/// Split raw text into paragraphs on blank lines.
///
/// A blank line is a line containing only whitespace (after the sanitizer's
/// invisible characters are taken into account). Paragraphs are returned
/// raw; empty ones are dropped.
pub fn split_paragraphs(raw: &str) -> Vec<&str> {
    let mut paragraphs = Vec::new();
    let mut start: Option<usize> = None;
    let mut end = 0;

    let mut offset = 0;
    for line in raw.split_inclusive('\n') {
        let line_start = offset;
        offset += line.len();

        if sanitize(line).is_empty() {
            if let Some(s) = start.take() {
                paragraphs.push(&raw[s..end]);
            }
            continue;
        }
        if start.is_none() {
            start = Some(line_start);
        }
        end = offset;
    }
    if let Some(s) = start {
        paragraphs.push(&raw[s..end]);
    }

    paragraphs
}
