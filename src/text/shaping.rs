//! # Contextual Arabic Shaping
//!
//! Maps base Arabic letters to their presentation forms without an OpenType
//! shaper. The font only needs glyphs for the Presentation Forms-A/B blocks,
//! which is what the fallback renderer draws with.
//!
//! The scan is a small state machine over three join classes. Each step
//! looks at most one codepoint back (carried as state) and one ahead, and the
//! string boundaries behave like a non-joining neighbor on both sides:
//!
//! ```text
//!   prev class   current          next class   →  form
//!   Joining      dual letter      Joining         medial
//!   Joining      dual letter      NonJoining/     final
//!                                 Other/end
//!   NonJoining/  dual letter      Joining         initial
//!   Other/start
//!   Joining      right-joiner     any             final
//!   otherwise                                     isolated
//! ```
//!
//! A lām directly followed by an alef variant always becomes a single
//! lām-alef ligature, consuming both letters.

use super::forms::{self, Form, FormSet};
use super::ShapedToken;

/// How a codepoint participates in joining with its neighbors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum JoinClass {
    /// A table letter that connects forward (`joins_next`).
    Joining,
    /// A table letter that does not connect forward.
    NonJoining,
    /// Anything outside the table: Latin, digits, punctuation, spaces,
    /// already-shaped presentation forms. Also stands in for the string
    /// boundaries.
    Other,
}

impl JoinClass {
    fn of(ch: Option<char>) -> Self {
        match ch.and_then(forms::lookup) {
            Some(set) if set.joins_next => JoinClass::Joining,
            Some(_) => JoinClass::NonJoining,
            None => JoinClass::Other,
        }
    }
}

/// Does the codepoint after the current letter accept a connection from it?
fn next_accepts_join(next: Option<char>) -> bool {
    next.and_then(forms::lookup).is_some_and(|set| set.joins_prev)
}

fn select_form(set: &FormSet, prev: JoinClass, next: Option<char>) -> char {
    let joins_with_prev = prev == JoinClass::Joining && set.joins_prev;
    let joins_with_next = set.joins_next && next_accepts_join(next);

    let form = match (joins_with_prev, joins_with_next) {
        (true, true) => Form::Medial,
        (true, false) => Form::Final,
        (false, true) => Form::Initial,
        (false, false) => Form::Isolated,
    };
    set.form(form).unwrap_or(set.isolated)
}

/// Shape sanitized text into presentation-form codepoints.
///
/// Output stays in logical order. Codepoints outside the form table are
/// copied unchanged, so text without Arabic letters shapes to itself.
pub fn shape(sanitized: &str) -> Vec<char> {
    let chars: Vec<char> = sanitized.chars().collect();
    let mut out = Vec::with_capacity(chars.len());
    let mut prev = JoinClass::Other;
    let mut i = 0;

    while i < chars.len() {
        let ch = chars[i];
        let next = chars.get(i + 1).copied();

        if ch == forms::LAM {
            if let Some(lig) = next.and_then(|a| forms::lam_alef(a, prev == JoinClass::Joining)) {
                out.push(lig);
                // The ligature ends in an alef, which never joins forward.
                prev = JoinClass::NonJoining;
                i += 2;
                continue;
            }
        }

        match forms::lookup(ch) {
            Some(set) => out.push(select_form(set, prev, next)),
            None => out.push(ch),
        }
        prev = JoinClass::of(Some(ch));
        i += 1;
    }

    out
}

/// Split a sanitized paragraph on whitespace and shape each word.
pub fn shape_paragraph(sanitized: &str) -> Vec<ShapedToken> {
    sanitized
        .split_whitespace()
        .map(|word| ShapedToken::new(shape(word)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::sanitize::sanitize;

    fn shaped(s: &str) -> String {
        shape(s).into_iter().collect()
    }

    #[test]
    fn lam_alef_isolated() {
        assert_eq!(shape("لا"), vec!['\u{FEFB}']);
    }

    #[test]
    fn lam_alef_after_forward_joiner_is_final() {
        // beh initial + lam-alef final
        assert_eq!(shape("بلا"), vec!['\u{FE91}', '\u{FEFC}']);
    }

    #[test]
    fn lam_alef_after_non_joiner_is_isolated() {
        // dal does not join forward: dal isolated + lam-alef isolated
        assert_eq!(shape("دلا"), vec!['\u{FEA9}', '\u{FEFB}']);
    }

    #[test]
    fn lam_alef_hamza_variants() {
        assert_eq!(shape("لأ"), vec!['\u{FEF7}']);
        assert_eq!(shape("لإ"), vec!['\u{FEF9}']);
        assert_eq!(shape("لآ"), vec!['\u{FEF5}']);
        assert_eq!(shape("سلآ"), vec!['\u{FEB3}', '\u{FEF6}']);
    }

    #[test]
    fn letter_after_ligature_starts_fresh() {
        // "لام": lam-alef isolated, then meem isolated (alef never joins forward)
        assert_eq!(shape("لام"), vec!['\u{FEFB}', '\u{FEE1}']);
    }

    #[test]
    fn three_letter_word_forms() {
        // "بسم": beh initial, seen medial, meem final
        assert_eq!(shape("بسم"), vec!['\u{FE91}', '\u{FEB4}', '\u{FEE2}']);
    }

    #[test]
    fn non_joiner_breaks_the_chain() {
        // "دار": dal isolated, alef isolated (dal doesn't join forward), reh isolated
        assert_eq!(shape("دار"), vec!['\u{FEA9}', '\u{FE8D}', '\u{FEAD}']);
        // "باب": beh initial, alef final, beh isolated
        assert_eq!(shape("باب"), vec!['\u{FE91}', '\u{FE8E}', '\u{FE8F}']);
    }

    #[test]
    fn single_letter_is_isolated() {
        assert_eq!(shape("ب"), vec!['\u{FE8F}']);
        assert_eq!(shape("ء"), vec!['\u{FE80}']);
    }

    #[test]
    fn hamza_does_not_join_either_side() {
        // "بءب": beh isolated, hamza isolated, beh isolated
        assert_eq!(shape("بءب"), vec!['\u{FE8F}', '\u{FE80}', '\u{FE8F}']);
    }

    #[test]
    fn latin_neighbors_do_not_join() {
        assert_eq!(shape("aبb"), vec!['a', '\u{FE8F}', 'b']);
    }

    #[test]
    fn non_arabic_passes_through() {
        for s in ["", "Hello, world! 123", "ﻻ already shaped", "؟؛"] {
            let clean = sanitize(s);
            assert_eq!(shaped(&clean), clean);
        }
    }

    #[test]
    fn lam_at_end_is_final_or_isolated() {
        assert_eq!(shape("ل"), vec!['\u{FEDD}']);
        assert_eq!(shape("بل"), vec!['\u{FE91}', '\u{FEDE}']);
    }

    #[test]
    fn non_forward_joiners_never_initial_or_medial() {
        let non_joiners: Vec<&FormSet> = forms::letters().filter(|s| !s.joins_next).collect();
        let beh = '\u{0628}';
        for set in &non_joiners {
            // Between two dual joiners, and at both string edges.
            let text: String = [beh, set.letter, beh, set.letter].iter().collect();
            for (letter, out) in text.chars().zip(shape(&text)) {
                if letter == set.letter {
                    assert!(
                        out == set.isolated || Some(out) == set.final_,
                        "{:?} shaped to {:?}",
                        letter,
                        out
                    );
                }
            }
        }
    }

    #[test]
    fn shape_paragraph_splits_words() {
        let tokens = shape_paragraph("بسم الله");
        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens[0].glyphs, vec!['\u{FE91}', '\u{FEB4}', '\u{FEE2}']);
        // alef isolated, lam initial, lam medial, heh final
        assert_eq!(
            tokens[1].glyphs,
            vec!['\u{FE8D}', '\u{FEDF}', '\u{FEE0}', '\u{FEEA}']
        );
    }

    #[test]
    fn shape_paragraph_empty() {
        assert!(shape_paragraph("").is_empty());
    }
}
