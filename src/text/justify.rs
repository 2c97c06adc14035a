//! # Greedy Line Breaking With Right-to-Left Justification
//!
//! Packs shaped tokens into lines first-fit, then assigns every token its
//! final x-origin. Coordinates are relative to the left edge of the text
//! block; `0.0` is the left margin and `max_width` the right margin.
//!
//! Lines grow right to left. The first token of a line sits flush against
//! the right margin and each following token is placed to the left of the
//! previous one. Token order in the output matches the input; only the
//! origin math reflects the RTL direction.
//!
//! Every line except the last of a paragraph is fully justified: the slack
//! is divided evenly between the inter-word gaps so the line spans exactly
//! `max_width`. The last line keeps natural spacing, right-aligned. That
//! includes a paragraph that fits on a single line.

use serde::Serialize;

use super::{MeasuredToken, ShapedToken};

/// How a line's spacing was resolved.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum LineAlignment {
    /// Non-final line stretched to the full width.
    Justified { extra_gap: f64 },
    /// Natural spacing, right-aligned. Used for a paragraph's last line.
    Natural,
    /// A single token wider than the line. Right-aligned, spills past the
    /// left margin.
    Overflow,
}

/// A token with its resolved x-origin.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Placement {
    pub token: MeasuredToken,
    /// Left edge of the token, relative to the text block's left edge.
    pub x: f64,
}

/// One visual row of a paragraph.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Line {
    pub placements: Vec<Placement>,
    pub is_final_of_paragraph: bool,
    /// Distance between adjacent tokens: the space width plus any
    /// justification slack.
    pub inter_word_gap: f64,
    pub alignment: LineAlignment,
}

impl Line {
    /// Sum of the token advances, excluding gaps.
    pub fn content_width(&self) -> f64 {
        self.placements.iter().map(|p| p.token.width).sum()
    }

    /// Width from the leftmost token's origin to the right margin edge of
    /// the rightmost token.
    pub fn width(&self) -> f64 {
        let gaps = self.placements.len().saturating_sub(1) as f64;
        self.content_width() + gaps * self.inter_word_gap
    }
}

/// Break one paragraph into justified lines.
///
/// `measure` is called once per token. An empty paragraph yields no lines.
/// A token wider than `max_width` on an empty line is still emitted, on a
/// line of its own.
pub fn layout<F>(tokens: &[ShapedToken], measure: F, max_width: f64, space_width: f64) -> Vec<Line>
where
    F: Fn(&ShapedToken) -> f64,
{
    let mut groups: Vec<Vec<MeasuredToken>> = Vec::new();
    let mut current: Vec<MeasuredToken> = Vec::new();
    let mut running = 0.0;

    for token in tokens {
        let width = measure(token);
        let gap = if current.is_empty() { 0.0 } else { space_width };

        if !current.is_empty() && running + gap + width > max_width {
            groups.push(std::mem::take(&mut current));
            running = 0.0;
            current.push(MeasuredToken::new(token.clone(), width));
            running += width;
            continue;
        }

        current.push(MeasuredToken::new(token.clone(), width));
        running += gap + width;
    }
    if !current.is_empty() {
        groups.push(current);
    }

    let last = groups.len().saturating_sub(1);
    groups
        .into_iter()
        .enumerate()
        .map(|(i, group)| place_line(group, i == last, max_width, space_width))
        .collect()
}

/// Lay out several paragraphs. Line state resets at every boundary, and
/// each paragraph's last line is flagged final.
pub fn layout_paragraphs<F>(
    paragraphs: &[Vec<ShapedToken>],
    measure: F,
    max_width: f64,
    space_width: f64,
) -> Vec<Line>
where
    F: Fn(&ShapedToken) -> f64,
{
    paragraphs
        .iter()
        .flat_map(|tokens| layout(tokens, &measure, max_width, space_width))
        .collect()
}

fn place_line(tokens: Vec<MeasuredToken>, is_final: bool, max_width: f64, space_width: f64) -> Line {
    let k = tokens.len();
    let total: f64 = tokens.iter().map(|t| t.width).sum();

    let alignment = if k == 1 && total > max_width {
        LineAlignment::Overflow
    } else if is_final || k == 1 {
        LineAlignment::Natural
    } else {
        let natural = total + space_width * (k - 1) as f64;
        let extra = (max_width - natural).max(0.0) / (k - 1).max(1) as f64;
        LineAlignment::Justified { extra_gap: extra }
    };

    let inter_word_gap = match alignment {
        LineAlignment::Justified { extra_gap } => space_width + extra_gap,
        LineAlignment::Natural | LineAlignment::Overflow => space_width,
    };

    // Right edge of the next token to place.
    let mut right_edge = max_width;
    let placements = tokens
        .into_iter()
        .map(|token| {
            let x = right_edge - token.width;
            right_edge = x - inter_word_gap;
            Placement { token, x }
        })
        .collect();

    Line {
        placements,
        is_final_of_paragraph: is_final,
        inter_word_gap,
        alignment,
    }
}
