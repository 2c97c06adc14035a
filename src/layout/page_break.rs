//! # Page Break Decisions
//!
//! Distributes justified lines over pages. A vertical cursor starts just
//! under the top margin and moves down one line height per line; when the
//! next line would cross the bottom margin, the page is closed and the line
//! starts a fresh one.
//!
//! y values are baselines measured from the bottom edge of the page, the
//! way PDF user space counts them.

use serde::Serialize;

use crate::text::Line;

/// Vertical page budget for pagination, in points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageGeometry {
    pub line_height: f64,
    pub page_height: f64,
    pub margin_top: f64,
    pub margin_bottom: f64,
    /// Extra space after the last line of each paragraph.
    pub paragraph_gap: f64,
}

impl PageGeometry {
    pub fn new(line_height: f64, page_height: f64, margin_top: f64, margin_bottom: f64) -> Self {
        Self {
            line_height,
            page_height,
            margin_top,
            margin_bottom,
            paragraph_gap: 0.0,
        }
    }

    pub fn with_paragraph_gap(mut self, gap: f64) -> Self {
        self.paragraph_gap = gap;
        self
    }

    fn top(&self) -> f64 {
        self.page_height - self.margin_top
    }
}

/// A line with its vertical position.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlacedLine {
    pub line: Line,
    pub y: f64,
}

/// One page worth of lines, top to bottom.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Page {
    pub lines: Vec<PlacedLine>,
}

/// Tracks where we are on the current page.
struct PageCursor {
    y: f64,
    page: Page,
}

impl PageCursor {
    fn new(geometry: &PageGeometry) -> Self {
        Self {
            y: geometry.top(),
            page: Page::default(),
        }
    }

    fn fits(&self, geometry: &PageGeometry) -> bool {
        self.y - geometry.line_height >= geometry.margin_bottom
    }

    fn place(&mut self, line: Line, geometry: &PageGeometry) {
        let y = self.y - geometry.line_height;
        let final_of_paragraph = line.is_final_of_paragraph;
        self.page.lines.push(PlacedLine { line, y });
        self.y = y;
        if final_of_paragraph {
            self.y -= geometry.paragraph_gap;
        }
    }
}

/// Assign lines to pages. Always returns at least one page, even when
/// `lines` is empty.
///
/// A line taller than the whole usable area is still placed (on a page of
/// its own) rather than looping forever.
pub fn paginate(lines: Vec<Line>, geometry: &PageGeometry) -> Vec<Page> {
    let mut pages = Vec::new();
    let mut cursor = PageCursor::new(geometry);

    for line in lines {
        if !cursor.fits(geometry) && !cursor.page.lines.is_empty() {
            pages.push(std::mem::take(&mut cursor.page));
            cursor = PageCursor::new(geometry);
        }
        cursor.place(line, geometry);
    }

    pages.push(cursor.page);
    pages
}
