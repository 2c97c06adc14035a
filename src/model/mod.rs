//! # Export Request Model
//!
//! The input to the fallback renderer: the recognized text, page geometry,
//! typographic settings and document metadata. Everything has a default so
//! a request can be as small as `{ "text": "..." }`.

use serde::{Deserialize, Serialize};

/// A complete export request: the text plus everything needed to render it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportDocument {
    /// Recognized text. Paragraphs are separated by blank lines.
    pub text: String,

    #[serde(flatten)]
    pub config: ExportConfig,

    /// Font to shape and draw with. Callers that pass font bytes directly
    /// leave this empty.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font: Option<FontEntry>,
}

/// Rendering settings, independent of the text. The CLI reads this from
/// its `--config` file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportConfig {
    #[serde(default)]
    pub page: PageConfig,

    #[serde(default)]
    pub typography: TextConfig,

    #[serde(default)]
    pub metadata: Metadata,
}

/// A font carried inside the request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FontEntry {
    /// Base64-encoded font data, a data URI (e.g. "data:font/ttf;base64,..."),
    /// or an explicit file path ("/...", "./...", "../...").
    pub src: String,
}

/// Document metadata embedded in the PDF.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Metadata {
    pub title: Option<String>,
    pub author: Option<String>,
    pub subject: Option<String>,
}

/// Configuration for a page: size and margins.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageConfig {
    /// Page size. Defaults to A4.
    #[serde(default = "PageSize::default")]
    pub size: PageSize,

    /// Page margins in points (1/72 inch).
    #[serde(default = "default_margin")]
    pub margin: Edges,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            size: PageSize::A4,
            margin: default_margin(),
        }
    }
}

fn default_margin() -> Edges {
    Edges::uniform(54.0) // ~0.75 inch
}

/// Standard page sizes in points.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub enum PageSize {
    #[default]
    A4,
    A5,
    Letter,
    Legal,
    Custom {
        width: f64,
        height: f64,
    },
}

impl PageSize {
    /// Returns (width, height) in points.
    pub fn dimensions(&self) -> (f64, f64) {
        match self {
            PageSize::A4 => (595.28, 841.89),
            PageSize::A5 => (419.53, 595.28),
            PageSize::Letter => (612.0, 792.0),
            PageSize::Legal => (612.0, 1008.0),
            PageSize::Custom { width, height } => (*width, *height),
        }
    }
}

/// Edge values (top, right, bottom, left) used for margins.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Edges {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Edges {
    pub fn uniform(v: f64) -> Self {
        Self {
            top: v,
            right: v,
            bottom: v,
            left: v,
        }
    }

    pub fn horizontal(&self) -> f64 {
        self.left + self.right
    }
}

/// Typographic settings for the text block.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextConfig {
    #[serde(default = "default_font_size")]
    pub font_size: f64,

    /// Line height as a multiple of the font size.
    #[serde(default = "default_line_height")]
    pub line_height: f64,

    /// Extra vertical space after each paragraph, in points.
    #[serde(default = "default_paragraph_gap")]
    pub paragraph_gap: f64,

    /// Overrides the font's own space advance, in points.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub space_width: Option<f64>,
}

fn default_font_size() -> f64 {
    14.0
}

fn default_line_height() -> f64 {
    1.8
}

fn default_paragraph_gap() -> f64 {
    10.0
}

impl Default for TextConfig {
    fn default() -> Self {
        Self {
            font_size: default_font_size(),
            line_height: default_line_height(),
            paragraph_gap: default_paragraph_gap(),
            space_width: None,
        }
    }
}

impl TextConfig {
    /// Line height in points.
    pub fn line_height_pt(&self) -> f64 {
        self.font_size * self.line_height
    }
}
