//! # Visual Glyph Order
//!
//! Tokens leave the shaper in logical order. A PDF `Tj` operator paints
//! glyphs left to right, so before painting each token is converted to
//! visual order with `unicode-bidi` at an RTL paragraph level: Arabic runs
//! are reversed, while embedded Latin words and digit runs keep their
//! left-to-right order.
//!
//! This only ever sees one whitespace-delimited token. Word order on the
//! line is handled by the justifier's right-to-left origins, not here.

use unicode_bidi::{BidiInfo, Level};

/// Reorder a logical glyph run into painting (left-to-right) order.
pub fn visual_run(logical: &[char]) -> Vec<char> {
    if logical.is_empty() {
        return Vec::new();
    }
    if !logical.iter().copied().any(is_rtl_char) {
        return logical.to_vec();
    }

    let text: String = logical.iter().collect();
    let bidi_info = BidiInfo::new(&text, Some(Level::rtl()));

    // Sanitized tokens hold no newlines, so there is exactly one paragraph.
    match bidi_info.paragraphs.first() {
        Some(para) => bidi_info
            .reorder_line(para, para.range.clone())
            .chars()
            .collect(),
        None => logical.to_vec(),
    }
}

/// Check if a character has an RTL BiDi class (R, AL, or AN).
fn is_rtl_char(ch: char) -> bool {
    matches!(ch,
        '\u{0590}'..='\u{05FF}' |  // Hebrew
        '\u{0600}'..='\u{06FF}' |  // Arabic
        '\u{0750}'..='\u{077F}' |  // Arabic Supplement
        '\u{08A0}'..='\u{08FF}' |  // Arabic Extended-A
        '\u{FB1D}'..='\u{FB4F}' |  // Hebrew Presentation Forms
        '\u{FB50}'..='\u{FDFF}' |  // Arabic Presentation Forms-A
        '\u{FE70}'..='\u{FEFF}'    // Arabic Presentation Forms-B
    )
}
