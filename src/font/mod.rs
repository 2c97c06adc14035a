//! # Font Metrics
//!
//! The layout engine only ever asks one question of a font: how wide is this
//! run of glyphs at this size? `GlyphMetrics` is that question. `FontMetrics`
//! answers it from a real TrueType/OpenType font parsed with ttf-parser, and
//! also carries what the PDF writer needs to embed the same font.

pub mod loader;

use std::collections::HashMap;

use tracing::{debug, warn};

use crate::error::QalamError;
use crate::text::forms;

/// Glyph-width provider injected into layout.
///
/// Implementations are queried read-only and may be shared across threads
/// laying out independent documents.
pub trait GlyphMetrics: Send + Sync {
    /// Advance width of `run` in points at `font_size`.
    fn width_of_glyph_run(&self, run: &[char], font_size: f64) -> f64;

    /// Width of a single inter-word space.
    fn space_width(&self, font_size: f64) -> f64 {
        self.width_of_glyph_run(&[' '], font_size)
    }
}

/// Parsed metrics from a TrueType/OpenType font via ttf-parser.
#[derive(Debug, Clone)]
pub struct FontMetrics {
    /// Raw font file, kept for embedding.
    data: Vec<u8>,
    pub family: String,
    pub units_per_em: u16,
    pub ascender: i16,
    pub descender: i16,
    pub cap_height: i16,
    /// `[x_min, y_min, x_max, y_max]` in font units.
    pub bbox: [i16; 4],
    advance_widths: HashMap<char, u16>,
    glyph_ids: HashMap<char, u16>,
    default_advance: u16,
}

impl FontMetrics {
    /// Parse metrics from font data.
    pub fn from_font_data(data: Vec<u8>) -> Result<Self, QalamError> {
        let face = ttf_parser::Face::parse(&data, 0)
            .map_err(|e| QalamError::FontError(format!("Failed to parse font data: {}", e)))?;

        let units_per_em = face.units_per_em();
        let ascender = face.ascender();
        let descender = face.descender();
        let cap_height = face.capital_height().unwrap_or(ascender);
        let bbox = face.global_bounding_box();

        let family = face
            .names()
            .into_iter()
            .find(|n| n.name_id == ttf_parser::name_id::FAMILY && n.is_unicode())
            .and_then(|n| n.to_string())
            .unwrap_or_else(|| "Embedded".to_string());

        let mut advance_widths = HashMap::new();
        let mut glyph_ids = HashMap::new();
        let mut default_advance = 0u16;

        // Sample the whole BMP; surrogates are not chars.
        for code in 32u32..=0xFFFF {
            let Some(ch) = char::from_u32(code) else {
                continue;
            };
            if let Some(glyph_id) = face.glyph_index(ch) {
                let advance = face.glyph_hor_advance(glyph_id).unwrap_or(0);
                advance_widths.insert(ch, advance);
                glyph_ids.insert(ch, glyph_id.0);
                if ch == ' ' {
                    default_advance = advance;
                }
            }
        }

        if default_advance == 0 {
            default_advance = units_per_em / 2;
        }

        let arabic_forms = ('\u{FE70}'..='\u{FEFF}')
            .filter(|c| glyph_ids.contains_key(c))
            .count();
        if arabic_forms == 0 {
            warn!(family = %family, "font has no Arabic presentation-form glyphs; widths fall back to base letters");
        }
        debug!(
            family = %family,
            units_per_em,
            glyphs = glyph_ids.len(),
            "loaded font metrics"
        );

        Ok(FontMetrics {
            data,
            family,
            units_per_em,
            ascender,
            descender,
            cap_height,
            bbox: [bbox.x_min, bbox.y_min, bbox.x_max, bbox.y_max],
            advance_widths,
            glyph_ids,
            default_advance,
        })
    }

    /// The raw font file.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Glyph id for a codepoint, if the font maps it.
    pub fn glyph_id(&self, ch: char) -> Option<u16> {
        self.glyph_ids.get(&ch).copied()
    }

    /// Advance of `ch` in font units.
    ///
    /// A presentation form missing from the font is measured as its base
    /// letter(s), so layout stays sensible with fonts that only map the
    /// Arabic block.
    pub fn advance(&self, ch: char) -> u16 {
        if let Some(&w) = self.advance_widths.get(&ch) {
            return w;
        }
        match forms::decompose(ch) {
            Some((base, alef)) => {
                let base_w = self.advance_widths.get(&base).copied();
                let alef_w = alef.and_then(|a| self.advance_widths.get(&a).copied());
                match (base_w, alef_w) {
                    (Some(b), Some(a)) => b.saturating_add(a),
                    (Some(b), None) => b,
                    _ => self.default_advance,
                }
            }
            None => self.default_advance,
        }
    }

    /// Get the advance width of a character in points.
    pub fn char_width(&self, ch: char, font_size: f64) -> f64 {
        (self.advance(ch) as f64 / self.units_per_em as f64) * font_size
    }
}

impl GlyphMetrics for FontMetrics {
    fn width_of_glyph_run(&self, run: &[char], font_size: f64) -> f64 {
        run.iter().map(|&ch| self.char_width(ch, font_size)).sum()
    }
}
