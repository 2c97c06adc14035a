//! # Glyph Form Table
//!
//! Static mapping from base Arabic letters to their contextual presentation
//! forms (Arabic Presentation Forms-A/B) and join-ability flags, plus the
//! lām-alef ligature table.
//!
//! Letters that never connect to a following letter (alef, dāl, rā, wāw, ...)
//! carry only isolated and final forms. When a joining letter precedes them
//! they take their final form; they never take an initial or medial form.

/// The four contextual presentation forms of an Arabic letter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Form {
    Isolated,
    Initial,
    Medial,
    Final,
}

/// Presentation forms and joining behavior of one base letter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormSet {
    pub letter: char,
    pub isolated: char,
    pub initial: Option<char>,
    pub medial: Option<char>,
    pub final_: Option<char>,
    /// Can connect to the letter before it (to its right, visually).
    pub joins_prev: bool,
    /// Can connect to the letter after it (to its left, visually).
    pub joins_next: bool,
}

impl FormSet {
    /// The codepoint for `form`, or `None` if the table has no such form.
    pub fn form(&self, form: Form) -> Option<char> {
        match form {
            Form::Isolated => Some(self.isolated),
            Form::Initial => self.initial,
            Form::Medial => self.medial,
            Form::Final => self.final_,
        }
    }
}

/// Dual-joining letter: all four forms, in Unicode's iso/fin/ini/med order.
const fn dual(letter: char, iso: char, fin: char, ini: char, med: char) -> FormSet {
    FormSet {
        letter,
        isolated: iso,
        initial: Some(ini),
        medial: Some(med),
        final_: Some(fin),
        joins_prev: true,
        joins_next: true,
    }
}

/// Right-joining letter: connects to the previous letter only.
const fn right(letter: char, iso: char, fin: char) -> FormSet {
    FormSet {
        letter,
        isolated: iso,
        initial: None,
        medial: None,
        final_: Some(fin),
        joins_prev: true,
        joins_next: false,
    }
}

/// Non-joining letter: always isolated.
const fn isolated(letter: char, iso: char) -> FormSet {
    FormSet {
        letter,
        isolated: iso,
        initial: None,
        medial: None,
        final_: None,
        joins_prev: false,
        joins_next: false,
    }
}

/// Supported letters, sorted by codepoint so lookups can binary-search.
static FORM_TABLE: [FormSet; 50] = [
    isolated('\u{0621}', '\u{FE80}'),                         // hamza
    right('\u{0622}', '\u{FE81}', '\u{FE82}'),                // alef madda
    right('\u{0623}', '\u{FE83}', '\u{FE84}'),                // alef hamza above
    right('\u{0624}', '\u{FE85}', '\u{FE86}'),                // waw hamza
    right('\u{0625}', '\u{FE87}', '\u{FE88}'),                // alef hamza below
    dual('\u{0626}', '\u{FE89}', '\u{FE8A}', '\u{FE8B}', '\u{FE8C}'), // yeh hamza
    right('\u{0627}', '\u{FE8D}', '\u{FE8E}'),                // alef
    dual('\u{0628}', '\u{FE8F}', '\u{FE90}', '\u{FE91}', '\u{FE92}'), // beh
    right('\u{0629}', '\u{FE93}', '\u{FE94}'),                // teh marbuta
    dual('\u{062A}', '\u{FE95}', '\u{FE96}', '\u{FE97}', '\u{FE98}'), // teh
    dual('\u{062B}', '\u{FE99}', '\u{FE9A}', '\u{FE9B}', '\u{FE9C}'), // theh
    dual('\u{062C}', '\u{FE9D}', '\u{FE9E}', '\u{FE9F}', '\u{FEA0}'), // jeem
    dual('\u{062D}', '\u{FEA1}', '\u{FEA2}', '\u{FEA3}', '\u{FEA4}'), // hah
    dual('\u{062E}', '\u{FEA5}', '\u{FEA6}', '\u{FEA7}', '\u{FEA8}'), // khah
    right('\u{062F}', '\u{FEA9}', '\u{FEAA}'),                // dal
    right('\u{0630}', '\u{FEAB}', '\u{FEAC}'),                // thal
    right('\u{0631}', '\u{FEAD}', '\u{FEAE}'),                // reh
    right('\u{0632}', '\u{FEAF}', '\u{FEB0}'),                // zain
    dual('\u{0633}', '\u{FEB1}', '\u{FEB2}', '\u{FEB3}', '\u{FEB4}'), // seen
    dual('\u{0634}', '\u{FEB5}', '\u{FEB6}', '\u{FEB7}', '\u{FEB8}'), // sheen
    dual('\u{0635}', '\u{FEB9}', '\u{FEBA}', '\u{FEBB}', '\u{FEBC}'), // sad
    dual('\u{0636}', '\u{FEBD}', '\u{FEBE}', '\u{FEBF}', '\u{FEC0}'), // dad
    dual('\u{0637}', '\u{FEC1}', '\u{FEC2}', '\u{FEC3}', '\u{FEC4}'), // tah
    dual('\u{0638}', '\u{FEC5}', '\u{FEC6}', '\u{FEC7}', '\u{FEC8}'), // zah
    dual('\u{0639}', '\u{FEC9}', '\u{FECA}', '\u{FECB}', '\u{FECC}'), // ain
    dual('\u{063A}', '\u{FECD}', '\u{FECE}', '\u{FECF}', '\u{FED0}'), // ghain
    dual('\u{0641}', '\u{FED1}', '\u{FED2}', '\u{FED3}', '\u{FED4}'), // feh
    dual('\u{0642}', '\u{FED5}', '\u{FED6}', '\u{FED7}', '\u{FED8}'), // qaf
    dual('\u{0643}', '\u{FED9}', '\u{FEDA}', '\u{FEDB}', '\u{FEDC}'), // kaf
    dual('\u{0644}', '\u{FEDD}', '\u{FEDE}', '\u{FEDF}', '\u{FEE0}'), // lam
    dual('\u{0645}', '\u{FEE1}', '\u{FEE2}', '\u{FEE3}', '\u{FEE4}'), // meem
    dual('\u{0646}', '\u{FEE5}', '\u{FEE6}', '\u{FEE7}', '\u{FEE8}'), // noon
    dual('\u{0647}', '\u{FEE9}', '\u{FEEA}', '\u{FEEB}', '\u{FEEC}'), // heh
    right('\u{0648}', '\u{FEED}', '\u{FEEE}'),                // waw
    dual('\u{0649}', '\u{FEEF}', '\u{FEF0}', '\u{FBE8}', '\u{FBE9}'), // alef maksura
    dual('\u{064A}', '\u{FEF1}', '\u{FEF2}', '\u{FEF3}', '\u{FEF4}'), // yeh
    right('\u{0671}', '\u{FB50}', '\u{FB51}'),                // alef wasla
    dual('\u{067E}', '\u{FB56}', '\u{FB57}', '\u{FB58}', '\u{FB59}'), // peh
    dual('\u{0686}', '\u{FB7A}', '\u{FB7B}', '\u{FB7C}', '\u{FB7D}'), // tcheh
    right('\u{0698}', '\u{FB8A}', '\u{FB8B}'),                // jeh
    dual('\u{06A4}', '\u{FB6A}', '\u{FB6B}', '\u{FB6C}', '\u{FB6D}'), // veh
    dual('\u{06A9}', '\u{FB8E}', '\u{FB8F}', '\u{FB90}', '\u{FB91}'), // keheh
    dual('\u{06AF}', '\u{FB92}', '\u{FB93}', '\u{FB94}', '\u{FB95}'), // gaf
    dual('\u{06BE}', '\u{FBAA}', '\u{FBAB}', '\u{FBAC}', '\u{FBAD}'), // heh doachashmee
    right('\u{06C0}', '\u{FBA4}', '\u{FBA5}'),                // heh with yeh above
    right('\u{06C6}', '\u{FBD9}', '\u{FBDA}'),                // oe
    right('\u{06C7}', '\u{FBD7}', '\u{FBD8}'),                // u
    right('\u{06C8}', '\u{FBDB}', '\u{FBDC}'),                // yu
    right('\u{06CB}', '\u{FBDE}', '\u{FBDF}'),                // ve
    dual('\u{06CC}', '\u{FBFC}', '\u{FBFD}', '\u{FBFE}', '\u{FBFF}'), // farsi yeh
];

/// Look up the form set for a base letter.
pub fn lookup(ch: char) -> Option<&'static FormSet> {
    FORM_TABLE
        .binary_search_by_key(&ch, |f| f.letter)
        .ok()
        .map(|i| &FORM_TABLE[i])
}

/// Iterate over every supported letter.
pub fn letters() -> impl Iterator<Item = &'static FormSet> {
    FORM_TABLE.iter()
}

pub const LAM: char = '\u{0644}';

/// Lām-alef ligatures: (alef variant, isolated, final).
const LAM_ALEF: [(char, char, char); 4] = [
    ('\u{0622}', '\u{FEF5}', '\u{FEF6}'), // alef madda
    ('\u{0623}', '\u{FEF7}', '\u{FEF8}'), // alef hamza above
    ('\u{0625}', '\u{FEF9}', '\u{FEFA}'), // alef hamza below
    ('\u{0627}', '\u{FEFB}', '\u{FEFC}'), // alef
];

/// The lām-alef ligature for `alef`, in final form when `joined` is true.
///
/// Returns `None` when `alef` is not one of the four alef variants that
/// ligate with lām.
pub fn lam_alef(alef: char, joined: bool) -> Option<char> {
    LAM_ALEF
        .iter()
        .find(|(a, _, _)| *a == alef)
        .map(|&(_, iso, fin)| if joined { fin } else { iso })
}

/// Map a presentation form back to the base letters it stands for.
///
/// Returns the base letter and, for lām-alef ligatures, the alef variant
/// that follows the lām. Used when a font lacks a presentation-form glyph
/// and the base letters have to be measured instead.
pub fn decompose(presentation: char) -> Option<(char, Option<char>)> {
    if let Some(&(alef, _, _)) = LAM_ALEF
        .iter()
        .find(|(_, iso, fin)| *iso == presentation || *fin == presentation)
    {
        return Some((LAM, Some(alef)));
    }
    FORM_TABLE
        .iter()
        .find(|f| {
            f.isolated == presentation
                || f.initial == Some(presentation)
                || f.medial == Some(presentation)
                || f.final_ == Some(presentation)
        })
        .map(|f| (f.letter, None))
}
