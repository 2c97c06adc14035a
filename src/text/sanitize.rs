//! # OCR Text Sanitizer
//!
//! OCR engines and the markdown pipelines behind them leak characters that
//! the shaper cannot draw: short vowels and Qur'anic annotation marks
//! (which would render as disconnected boxes without mark positioning),
//! tatweel, zero-width characters and explicit direction controls.
//! `sanitize` removes them, swaps ASCII `?`/`;` for their Arabic
//! counterparts and normalizes whitespace.

/// Arabic combining marks and the tatweel elongation character.
fn is_arabic_mark(ch: char) -> bool {
    matches!(ch,
        '\u{0610}'..='\u{061A}' |  // Qur'anic honorifics and small high marks
        '\u{064B}'..='\u{065F}' |  // harakat, shadda, sukun, madda, hamza marks
        '\u{0670}' |               // superscript alef
        '\u{06D6}'..='\u{06DC}' |  // Qur'anic small high ligatures
        '\u{06DF}'..='\u{06E4}' |
        '\u{06E7}'..='\u{06E8}' |
        '\u{06EA}'..='\u{06ED}' |
        '\u{08D3}'..='\u{08E1}' |  // Arabic Extended-A annotation marks
        '\u{08E3}'..='\u{08FF}' |
        '\u{0640}'                 // tatweel
    )
}

/// Zero-width characters and bidirectional formatting controls.
fn is_invisible_control(ch: char) -> bool {
    matches!(ch,
        '\u{200B}'..='\u{200F}' |  // ZWSP, ZWNJ, ZWJ, LRM, RLM
        '\u{202A}'..='\u{202E}' |  // embeddings and overrides
        '\u{2060}' |               // word joiner
        '\u{2066}'..='\u{2069}' |  // isolates
        '\u{061C}' |               // Arabic letter mark
        '\u{FEFF}'                 // BOM / ZWNBSP
    )
}

/// Strip OCR noise and normalize punctuation and whitespace.
///
/// Runs of two or more whitespace characters collapse to a single space; a
/// lone whitespace character (such as a single newline) is kept as is. The
/// result is trimmed. Applying `sanitize` to its own output is a no-op.
pub fn sanitize(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    // Whitespace is buffered so a run can be flushed as-is (length 1) or
    // collapsed (length >= 2) once it ends.
    let mut pending_ws: Option<char> = None;
    let mut ws_run = 0usize;

    for ch in raw.chars() {
        if is_arabic_mark(ch) || is_invisible_control(ch) {
            continue;
        }

        if ch.is_whitespace() {
            if ws_run == 0 {
                pending_ws = Some(ch);
            }
            ws_run += 1;
            continue;
        }

        if ws_run > 0 {
            if !out.is_empty() {
                match (ws_run, pending_ws) {
                    (1, Some(w)) => out.push(w),
                    _ => out.push(' '),
                }
            }
            ws_run = 0;
            pending_ws = None;
        }

        out.push(match ch {
            '?' => '\u{061F}',
            ';' => '\u{061B}',
            other => other,
        });
    }

    out
}
