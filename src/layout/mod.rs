//! # Document Layout
//!
//! Runs the whole pipeline over a document:
//!
//! 1. Split the raw text into paragraphs on blank lines
//! 2. Sanitize and shape each paragraph into tokens
//! 3. Measure tokens through the injected `GlyphMetrics`
//! 4. Break and justify lines inside the content box
//! 5. Paginate and move everything into page coordinates
//!
//! The engine holds configuration only. It can be shared freely and called
//! from several threads at once with the same metrics provider.

pub mod page_break;

use serde::Serialize;
use tracing::debug;

use crate::font::GlyphMetrics;
use crate::model::{ExportConfig, PageConfig, TextConfig};
use crate::text::{self, Line, LineAlignment, ShapedToken};

pub use page_break::{paginate, Page, PageGeometry, PlacedLine};

/// A fully laid-out page ready for serialization.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutPage {
    pub width: f64,
    pub height: f64,
    pub lines: Vec<LayoutLine>,
}

/// A line in page coordinates.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutLine {
    /// Baseline, measured from the bottom edge of the page.
    pub y: f64,
    pub is_final_of_paragraph: bool,
    pub alignment: LineAlignment,
    pub words: Vec<PositionedWord>,
}

/// A shaped word with its absolute origin.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionedWord {
    /// Left edge, measured from the left edge of the page.
    pub x: f64,
    pub width: f64,
    /// Presentation-form codepoints in logical order.
    pub glyphs: Vec<char>,
}

impl PositionedWord {
    pub fn text(&self) -> String {
        self.glyphs.iter().collect()
    }
}

/// The main layout engine.
#[derive(Debug, Clone, Default)]
pub struct LayoutEngine {
    page: PageConfig,
    text: TextConfig,
}

impl LayoutEngine {
    pub fn new(page: PageConfig, text: TextConfig) -> Self {
        Self { page, text }
    }

    pub fn from_config(config: &ExportConfig) -> Self {
        Self::new(config.page.clone(), config.typography.clone())
    }

    /// Width available to a line, between the side margins.
    pub fn content_width(&self) -> f64 {
        let (page_w, _) = self.page.size.dimensions();
        (page_w - self.page.margin.horizontal()).max(0.0)
    }

    fn geometry(&self) -> PageGeometry {
        let (_, page_h) = self.page.size.dimensions();
        PageGeometry::new(
            self.text.line_height_pt(),
            page_h,
            self.page.margin.top,
            self.page.margin.bottom,
        )
        .with_paragraph_gap(self.text.paragraph_gap)
    }

    /// Shape every paragraph of `raw` into tokens. Paragraphs that sanitize
    /// to nothing are dropped.
    pub fn shape_text(&self, raw: &str) -> Vec<Vec<ShapedToken>> {
        text::split_paragraphs(raw)
            .into_iter()
            .map(|p| text::shape_paragraph(&text::sanitize(p)))
            .filter(|tokens| !tokens.is_empty())
            .collect()
    }

    /// Break and justify `raw` into lines relative to the content box.
    pub fn break_lines(&self, raw: &str, metrics: &dyn GlyphMetrics) -> Vec<Line> {
        let font_size = self.text.font_size;
        let paragraphs = self.shape_text(raw);
        let space_width = self
            .text
            .space_width
            .unwrap_or_else(|| metrics.space_width(font_size));

        debug!(
            paragraphs = paragraphs.len(),
            tokens = paragraphs.iter().map(Vec::len).sum::<usize>(),
            space_width,
            "shaped text"
        );

        let lines = text::layout_paragraphs(
            &paragraphs,
            |token: &ShapedToken| metrics.width_of_glyph_run(&token.glyphs, font_size),
            self.content_width(),
            space_width,
        );

        let overflowing = lines
            .iter()
            .filter(|l| l.alignment == LineAlignment::Overflow)
            .count();
        if overflowing > 0 {
            debug!(overflowing, "words wider than the content box");
        }

        lines
    }

    /// Lay out a document into pages.
    pub fn layout(&self, raw: &str, metrics: &dyn GlyphMetrics) -> Vec<LayoutPage> {
        let lines = self.break_lines(raw, metrics);
        let line_count = lines.len();
        let pages = paginate(lines, &self.geometry());

        debug!(lines = line_count, pages = pages.len(), "paginated");

        let (width, height) = self.page.size.dimensions();
        let left = self.page.margin.left;
        pages
            .into_iter()
            .map(|page| LayoutPage {
                width,
                height,
                lines: page
                    .lines
                    .into_iter()
                    .map(|placed| to_page_space(placed, left))
                    .collect(),
            })
            .collect()
    }
}

fn to_page_space(placed: PlacedLine, left: f64) -> LayoutLine {
    let PlacedLine { line, y } = placed;
    LayoutLine {
        y,
        is_final_of_paragraph: line.is_final_of_paragraph,
        alignment: line.alignment,
        words: line
            .placements
            .into_iter()
            .map(|p| PositionedWord {
                x: left + p.x,
                width: p.token.width,
                glyphs: p.token.token.glyphs,
            })
            .collect(),
    }
}
