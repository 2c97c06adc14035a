//! Integration tests for the Qalam pipeline.
//!
//! These exercise the public API end to end:
//! - sanitize → shape → layout → paginate on real Arabic text
//! - justification and pagination invariants over whole documents
//! - PDF output structure with a fixture font
//! - request parsing and font errors surfacing before layout

use base64::Engine;
use qalam::font::{FontMetrics, GlyphMetrics};
use qalam::layout::{LayoutEngine, LayoutPage};
use qalam::model::{Edges, ExportConfig, Metadata, PageConfig, PageSize, TextConfig};
use qalam::pdf::{PdfFont, PdfWriter};
use qalam::text::{self, LineAlignment, ShapedToken};
use qalam::{layout, paginate, sanitize, shape, PageGeometry, QalamError};

// ─── Helpers ────────────────────────────────────────────────────

/// Every glyph advances half the font size. Maps codepoints straight to
/// glyph ids so it can also stand in as an embedded font.
struct FixedAdvance;

impl GlyphMetrics for FixedAdvance {
    fn width_of_glyph_run(&self, run: &[char], font_size: f64) -> f64 {
        run.len() as f64 * font_size * 0.5
    }
}

impl PdfFont for FixedAdvance {
    fn family(&self) -> &str {
        "Fixed Advance"
    }
    fn data(&self) -> &[u8] {
        b"fixture"
    }
    fn units_per_em(&self) -> u16 {
        1000
    }
    fn ascender(&self) -> i16 {
        900
    }
    fn descender(&self) -> i16 {
        -300
    }
    fn cap_height(&self) -> i16 {
        700
    }
    fn bbox(&self) -> [i16; 4] {
        [0, -300, 1000, 900]
    }
    fn glyph_id(&self, ch: char) -> Option<u16> {
        u16::try_from(ch as u32).ok()
    }
    fn advance(&self, _ch: char) -> u16 {
        500
    }
}

fn config(width: f64, height: f64) -> ExportConfig {
    ExportConfig {
        page: PageConfig {
            size: PageSize::Custom { width, height },
            margin: Edges::uniform(20.0),
        },
        typography: TextConfig {
            font_size: 10.0,
            line_height: 1.5,
            paragraph_gap: 5.0,
            space_width: None,
        },
        metadata: Metadata::default(),
    }
}

fn lay_out(text: &str, cfg: &ExportConfig) -> Vec<LayoutPage> {
    qalam::layout_document(text, &FixedAdvance, cfg)
}

fn dejavu_bytes() -> Vec<u8> {
    std::fs::read(concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/DejaVuSans.ttf")).unwrap()
}

const FATIHA: &str = "بسم الله الرحمن الرحيم\n\
الحمد لله رب العالمين الرحمن الرحيم مالك يوم الدين\n\n\
إياك نعبد وإياك نستعين اهدنا الصراط المستقيم صراط الذين أنعمت عليهم\n\
غير المغضوب عليهم ولا الضالين";

// ─── Shaping ────────────────────────────────────────────────────

#[test]
fn test_non_arabic_passes_through() {
    let input = "Invoice 2024 (draft)";
    assert_eq!(shape(input), input.chars().collect::<Vec<_>>());
}

#[test]
fn test_lam_alef_ligatures() {
    assert_eq!(shape("لا"), vec!['\u{FEFB}']);
    assert_eq!(shape("بلا"), vec!['\u{FE91}', '\u{FEFC}']);
}

#[test]
fn test_non_joiners_never_take_initial_or_medial_forms() {
    // Every right-joining letter sandwiched between two dual-joiners.
    for letter in ['ا', 'أ', 'إ', 'آ', 'د', 'ذ', 'ر', 'ز', 'و', 'ؤ', 'ة', 'ء'] {
        let word: String = ['ب', letter, 'ب'].iter().collect();
        let shaped = shape(&word);
        let forms = qalam::text::forms::lookup(letter).unwrap();
        assert!(
            shaped[1] == forms.isolated || Some(shaped[1]) == forms.final_,
            "{letter} shaped to U+{:04X}",
            shaped[1] as u32
        );
        // And the bāʾ after it must not connect backwards.
        assert!(shaped[2] == '\u{FE8F}' || shaped[2] == '\u{FE91}');
    }
}

#[test]
fn test_sanitize_then_shape_drops_diacritics() {
    let clean = sanitize("بِسْمِ  اللَّهِ");
    assert_eq!(clean, "بسم الله");
    let tokens = text::shape_paragraph(&clean);
    assert_eq!(tokens.len(), 2);
    assert_eq!(tokens[0].glyphs, vec!['\u{FE91}', '\u{FEB4}', '\u{FEE2}']);
}

#[test]
fn test_sanitize_is_idempotent_on_ocr_noise() {
    let raw = "\u{200F}هل  جاء؟\u{200E}  نعم;\t\tقال?\u{FEFF}";
    let once = sanitize(raw);
    assert_eq!(sanitize(&once), once);
    assert!(!once.contains('?') && !once.contains(';'));
}

// ─── Layout ─────────────────────────────────────────────────────

#[test]
fn test_justification_example() {
    let tokens: Vec<ShapedToken> = (0..4).map(|_| ShapedToken::new(vec!['x'; 10])).collect();
    let measure = |t: &ShapedToken| t.glyphs.len() as f64;
    let lines = layout(&tokens, measure, 40.0, 2.0);

    let first = &lines[0];
    assert_eq!(first.placements.len(), 3);
    assert_eq!(first.inter_word_gap, 5.0);
    assert_eq!(first.placements[0].x, 30.0);
    let sum: f64 = first.content_width() + 2.0 * first.inter_word_gap;
    assert_eq!(sum, 40.0);
    assert_eq!(lines[1].alignment, LineAlignment::Natural);
}

#[test]
fn test_empty_inputs_are_total() {
    let measure = |_: &ShapedToken| 1.0;
    assert!(layout(&[], measure, 100.0, 2.0).is_empty());

    let pages = paginate(Vec::new(), &PageGeometry::new(10.0, 100.0, 10.0, 10.0));
    assert_eq!(pages.len(), 1);
    assert!(pages[0].lines.is_empty());
}

#[test]
fn test_pagination_break_index() {
    let tokens: Vec<ShapedToken> = (0..9).map(|_| ShapedToken::new(vec!['x'; 8])).collect();
    // One token per line: 8 + 2 + 8 > 10
    let lines = layout(&tokens, |t: &ShapedToken| t.glyphs.len() as f64, 10.0, 2.0);
    assert_eq!(lines.len(), 9);

    let pages = paginate(lines, &PageGeometry::new(10.0, 100.0, 10.0, 10.0));
    assert_eq!(pages.len(), 2);
    assert_eq!(pages[0].lines.len(), 8);
    assert_eq!(pages[1].lines[0].y, 80.0);
}

#[test]
fn test_document_lines_stay_inside_margins() {
    let cfg = config(300.0, 400.0);
    let pages = lay_out(FATIHA, &cfg);
    let right_edge = 300.0 - 20.0;

    for page in &pages {
        for line in &page.lines {
            assert!(line.y >= 20.0 && line.y <= 400.0 - 20.0);
            let first = &line.words[0];
            assert!((first.x + first.width - right_edge).abs() < 1e-9);

            if let LineAlignment::Justified { .. } = line.alignment {
                let leftmost = line.words.last().unwrap();
                assert!((leftmost.x - 20.0).abs() < 1e-9, "justified line ends at {}", leftmost.x);
            }
        }
    }
}

#[test]
fn test_each_paragraph_ends_with_one_final_line() {
    let pages = lay_out(FATIHA, &config(300.0, 400.0));
    let finals = pages
        .iter()
        .flat_map(|p| &p.lines)
        .filter(|l| l.is_final_of_paragraph)
        .count();
    assert_eq!(finals, 2);

    for line in pages.iter().flat_map(|p| &p.lines) {
        if line.is_final_of_paragraph {
            assert_ne!(
                std::mem::discriminant(&line.alignment),
                std::mem::discriminant(&LineAlignment::Justified { extra_gap: 0.0 })
            );
        }
    }
}

#[test]
fn test_word_order_is_logical() {
    let pages = lay_out("بسم الله", &config(300.0, 400.0));
    let words = &pages[0].lines[0].words;
    assert_eq!(words[0].glyphs, shape("بسم"));
    assert_eq!(words[1].glyphs, shape("الله"));
    assert!(words[0].x > words[1].x);
}

#[test]
fn test_long_document_paginates() {
    let text = format!("{}\n\n", FATIHA).repeat(20);
    let cfg = config(300.0, 400.0);
    let pages = lay_out(&text, &cfg);
    assert!(pages.len() > 1);
    assert!(pages.iter().all(|p| !p.lines.is_empty()));

    let total: usize = pages.iter().map(|p| p.lines.len()).sum();
    let unpaginated = LayoutEngine::from_config(&cfg).break_lines(&text, &FixedAdvance);
    assert_eq!(total, unpaginated.len());
}

#[test]
fn test_layout_serializes_to_json() {
    let pages = lay_out("لا", &config(300.0, 400.0));
    let json = serde_json::to_value(&pages).unwrap();
    let line = &json[0]["lines"][0];
    assert_eq!(line["isFinalOfParagraph"], true);
    assert_eq!(line["alignment"]["kind"], "natural");
    assert_eq!(line["words"][0]["glyphs"][0], "\u{FEFB}");
}

// ─── PDF ────────────────────────────────────────────────────────

#[test]
fn test_pdf_from_layout() {
    let mut cfg = config(300.0, 400.0);
    cfg.metadata.title = Some("Al-Fatiha".to_string());
    let pages = lay_out(FATIHA, &cfg);

    let bytes = PdfWriter::new(cfg.typography.font_size)
        .write(&pages, &cfg.metadata, &FixedAdvance)
        .unwrap();
    let text = String::from_utf8_lossy(&bytes);

    assert!(bytes.starts_with(b"%PDF-1.7"));
    assert!(text.contains(&format!("/Count {}", pages.len())));
    assert!(text.contains("/MediaBox [0 0 300.00 400.00]"));
    assert!(text.contains("/Encoding /Identity-H"));
    assert!(text.contains("/Title (Al-Fatiha)"));
    assert!(text.trim_end().ends_with("%%EOF"));
}

#[test]
fn test_render_pdf_with_real_font() {
    let mut cfg = config(300.0, 400.0);
    cfg.metadata.title = Some("الفاتحة".to_string());
    let bytes = qalam::render_pdf(FATIHA, dejavu_bytes(), &cfg).unwrap();
    let text = String::from_utf8_lossy(&bytes);

    assert!(bytes.starts_with(b"%PDF-1.7"));
    assert!(text.contains("/BaseFont /DejaVuSans"));
    assert!(text.contains("/Subtype /CIDFontType2"));
    assert!(text.contains("/FontFile2"));
    assert!(text.trim_end().ends_with("%%EOF"));
}

#[test]
fn test_layout_with_real_font_uses_font_advances() {
    let font = FontMetrics::from_font_data(dejavu_bytes()).unwrap();
    let cfg = config(300.0, 400.0);
    let pages = qalam::layout_document("بسم الله", &font, &cfg);
    let words = &pages[0].lines[0].words;

    assert_eq!(words[0].glyphs, vec!['\u{FE91}', '\u{FEB4}', '\u{FEE2}']);
    let expected = (570.0 + 1827.0 + 1363.0) / 2048.0 * 10.0;
    assert!((words[0].width - expected).abs() < 1e-9);

    // Final line: natural gap is the font's space.
    let gap = words[0].x - (words[1].x + words[1].width);
    assert!((gap - font.space_width(10.0)).abs() < 1e-9);
}

#[test]
fn test_render_json_with_embedded_font() {
    let src = format!(
        "data:font/ttf;base64,{}",
        base64::engine::general_purpose::STANDARD.encode(dejavu_bytes())
    );
    let request = serde_json::json!({
        "text": FATIHA,
        "page": { "size": "A5" },
        "metadata": { "title": "Al-Fatiha" },
        "font": { "src": src },
    });
    let bytes = qalam::render_json(&request.to_string(), None).unwrap();
    let text = String::from_utf8_lossy(&bytes);

    assert!(bytes.starts_with(b"%PDF-1.7"));
    assert!(text.contains("/BaseFont /DejaVuSans"));
    assert!(text.contains("/Title (Al-Fatiha)"));
}

#[test]
fn test_render_json_explicit_font_wins() {
    // The embedded source is not a font; the bytes passed in are used instead.
    let request = r#"{ "text": "بسم", "font": { "src": "data:font/ttf;base64,AAEAAA==" } }"#;
    let bytes = qalam::render_json(request, Some(dejavu_bytes())).unwrap();
    assert!(bytes.starts_with(b"%PDF"));
}

// ─── Errors ─────────────────────────────────────────────────────

#[test]
fn test_render_pdf_rejects_bad_font_before_layout() {
    let err = qalam::render_pdf("بسم", vec![1, 2, 3], &ExportConfig::default()).unwrap_err();
    assert!(matches!(err, QalamError::FontError(_)));
}

#[test]
fn test_render_json_parse_error() {
    let err = qalam::render_json("{ \"text\": ", None).unwrap_err();
    assert!(matches!(err, QalamError::ParseError { .. }));
}

#[test]
fn test_render_json_requires_a_font() {
    let err = qalam::render_json(r#"{ "text": "بسم" }"#, None).unwrap_err();
    assert!(err.to_string().contains("No font supplied"));
}

#[test]
fn test_render_json_decodes_embedded_font() {
    // Valid base64, not a font: decoding succeeds, parsing fails.
    let err = qalam::render_json(
        r#"{ "text": "بسم", "font": { "src": "data:font/ttf;base64,AAEAAA==" } }"#,
        None,
    )
    .unwrap_err();
    assert!(matches!(err, QalamError::FontError(ref m) if m.contains("parse")));
}
