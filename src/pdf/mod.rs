//! # PDF Serializer
//!
//! Takes the laid-out pages from the layout engine and writes a valid PDF file.
//!
//! This is a from-scratch PDF 1.7 writer. Arabic text needs an embedded
//! TrueType font addressed by glyph id, so there is exactly one font per
//! document: a Type0 composite font with Identity-H encoding over a
//! CIDFontType2, plus a ToUnicode CMap so copied text comes back as the
//! presentation-form codepoints.
//!
//! ## PDF Structure (simplified)
//!
//! ```text
//! %PDF-1.7            <- header
//! 1 0 obj ... endobj  <- catalog, page tree
//! 3 0 obj ... endobj  <- font objects, then page + content stream pairs
//! ...
//! xref                <- cross-reference table (byte offsets of each object)
//! trailer             <- points to the root object
//! %%EOF
//! ```

use std::collections::BTreeMap;
use std::fmt::Write as FmtWrite; // for write! on String
use std::io::Write as IoWrite; // for write! on Vec<u8>

use miniz_oxide::deflate::compress_to_vec_zlib;
use tracing::{debug, warn};

use crate::error::QalamError;
use crate::font::FontMetrics;
use crate::layout::LayoutPage;
use crate::model::Metadata;
use crate::text::bidi::visual_run;
use crate::text::forms;

/// What the writer needs from a font to embed and address it.
pub trait PdfFont {
    fn family(&self) -> &str;
    /// Raw TrueType/OpenType bytes for FontFile2.
    fn data(&self) -> &[u8];
    fn units_per_em(&self) -> u16;
    fn ascender(&self) -> i16;
    fn descender(&self) -> i16;
    fn cap_height(&self) -> i16;
    /// `[x_min, y_min, x_max, y_max]` in font units.
    fn bbox(&self) -> [i16; 4];
    fn glyph_id(&self, ch: char) -> Option<u16>;
    /// Advance of `ch` in font units.
    fn advance(&self, ch: char) -> u16;
}

impl PdfFont for FontMetrics {
    fn family(&self) -> &str {
        &self.family
    }

    fn data(&self) -> &[u8] {
        FontMetrics::data(self)
    }

    fn units_per_em(&self) -> u16 {
        self.units_per_em
    }

    fn ascender(&self) -> i16 {
        self.ascender
    }

    fn descender(&self) -> i16 {
        self.descender
    }

    fn cap_height(&self) -> i16 {
        self.cap_height
    }

    fn bbox(&self) -> [i16; 4] {
        self.bbox
    }

    fn glyph_id(&self, ch: char) -> Option<u16> {
        FontMetrics::glyph_id(self, ch)
    }

    fn advance(&self, ch: char) -> u16 {
        FontMetrics::advance(self, ch)
    }
}

pub struct PdfWriter {
    font_size: f64,
}

/// Tracks allocated PDF objects during writing. Index = object number.
struct PdfBuilder {
    objects: Vec<PdfObject>,
}

struct PdfObject {
    data: Vec<u8>,
}

impl PdfBuilder {
    fn new() -> Self {
        // 0 = placeholder (PDF objects are 1-indexed)
        // 1 = Catalog
        // 2 = Pages (page tree root)
        Self {
            objects: (0..3).map(|_| PdfObject { data: Vec::new() }).collect(),
        }
    }

    fn push(&mut self, data: Vec<u8>) -> usize {
        let id = self.objects.len();
        self.objects.push(PdfObject { data });
        id
    }

    /// Push a Flate-compressed stream object. `extra` goes into the stream
    /// dictionary after /Length.
    fn push_stream(&mut self, raw: &[u8], extra: &str) -> usize {
        let compressed = compress_to_vec_zlib(raw, 6);
        let mut data: Vec<u8> = Vec::new();
        let _ = write!(
            data,
            "<< /Length {}{} /Filter /FlateDecode >>\nstream\n",
            compressed.len(),
            extra
        );
        data.extend_from_slice(&compressed);
        data.extend_from_slice(b"\nendstream");
        self.push(data)
    }
}

impl PdfWriter {
    pub fn new(font_size: f64) -> Self {
        Self { font_size }
    }

    /// Write laid-out pages to a PDF byte vector.
    pub fn write(
        &self,
        pages: &[LayoutPage],
        metadata: &Metadata,
        font: &dyn PdfFont,
    ) -> Result<Vec<u8>, QalamError> {
        if font.units_per_em() == 0 {
            return Err(QalamError::RenderError(format!(
                "Font '{}' reports zero units per em",
                font.family()
            )));
        }

        let mut builder = PdfBuilder::new();

        let used = Self::collect_glyphs(pages, font);
        let font_obj_id = Self::write_font_objects(&mut builder, font, &used);

        let mut page_obj_ids: Vec<usize> = Vec::new();
        for page in pages {
            let content = self.build_content_stream_for_page(page, font);
            let content_obj_id = builder.push_stream(content.as_bytes(), "");

            let page_dict = format!(
                "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 {:.2} {:.2}] \
                 /Contents {} 0 R /Resources << /Font << /F0 {} 0 R >> >> >>",
                page.width, page.height, content_obj_id, font_obj_id
            );
            page_obj_ids.push(builder.push(page_dict.into_bytes()));
        }

        builder.objects[1].data = b"<< /Type /Catalog /Pages 2 0 R >>".to_vec();

        let kids: String = page_obj_ids
            .iter()
            .map(|id| format!("{} 0 R", id))
            .collect::<Vec<_>>()
            .join(" ");
        builder.objects[2].data = format!(
            "<< /Type /Pages /Kids [{}] /Count {} >>",
            kids,
            page_obj_ids.len()
        )
        .into_bytes();

        let info_obj_id = Self::write_info(&mut builder, metadata);

        debug!(
            pages = page_obj_ids.len(),
            glyphs = used.len(),
            objects = builder.objects.len() - 1,
            "serialized pdf"
        );

        Ok(self.serialize(&builder, info_obj_id))
    }

    /// Glyph ids for one codepoint. A presentation form the font lacks is
    /// drawn with its base letter(s); anything else unmapped becomes .notdef.
    fn glyphs_for(font: &dyn PdfFont, ch: char) -> Vec<(u16, char)> {
        if let Some(gid) = font.glyph_id(ch) {
            return vec![(gid, ch)];
        }
        if let Some((base, alef)) = forms::decompose(ch) {
            let mut out = Vec::with_capacity(2);
            for c in std::iter::once(base).chain(alef) {
                if let Some(gid) = font.glyph_id(c) {
                    out.push((gid, c));
                }
            }
            if !out.is_empty() {
                return out;
            }
        }
        vec![(0, ch)]
    }

    /// Hex glyph ids for one word in painting order. Fallback expansion
    /// happens before reordering so a decomposed ligature reads lām-then-alef
    /// logically and is painted alef-first.
    fn encode_word(font: &dyn PdfFont, glyphs: &[char]) -> String {
        let logical: Vec<char> = glyphs
            .iter()
            .flat_map(|&ch| Self::glyphs_for(font, ch))
            .map(|(_, c)| c)
            .collect();
        visual_run(&logical)
            .into_iter()
            .flat_map(|ch| Self::glyphs_for(font, ch))
            .map(|(gid, _)| format!("{:04X}", gid))
            .collect()
    }

    /// Every glyph drawn anywhere in the document, keyed by glyph id.
    fn collect_glyphs(pages: &[LayoutPage], font: &dyn PdfFont) -> BTreeMap<u16, char> {
        let mut used = BTreeMap::new();
        let mut missing = 0usize;
        for word in pages.iter().flat_map(|p| &p.lines).flat_map(|l| &l.words) {
            for &ch in &word.glyphs {
                for (gid, c) in Self::glyphs_for(font, ch) {
                    if gid == 0 {
                        missing += 1;
                        continue;
                    }
                    used.entry(gid).or_insert(c);
                }
            }
        }
        if missing > 0 {
            warn!(missing, family = font.family(), "glyphs missing from font");
        }
        used
    }

    /// Build the PDF content stream for a single page.
    fn build_content_stream_for_page(&self, page: &LayoutPage, font: &dyn PdfFont) -> String {
        let mut stream = String::new();
        if page.lines.is_empty() {
            return stream;
        }

        let _ = writeln!(stream, "0 0 0 rg");
        for line in &page.lines {
            for word in &line.words {
                let hex = Self::encode_word(font, &word.glyphs);
                let _ = writeln!(
                    stream,
                    "BT /F0 {:.2} Tf {:.2} {:.2} Td <{}> Tj ET",
                    self.font_size, word.x, line.y, hex
                );
            }
        }
        stream
    }

    /// Embed the font: FontFile2, FontDescriptor, CIDFont, ToUnicode and the
    /// Type0 root. Returns the Type0 object id.
    fn write_font_objects(
        builder: &mut PdfBuilder,
        font: &dyn PdfFont,
        used: &BTreeMap<u16, char>,
    ) -> usize {
        let data = font.data();
        let pdf_font_name = Self::sanitize_font_name(font.family());
        let scale = 1000.0 / font.units_per_em() as f64;

        // 1. FontFile2 stream, the whole font
        let fontfile2_id = builder.push_stream(data, &format!(" /Length1 {}", data.len()));

        // 2. FontDescriptor
        let [x_min, y_min, x_max, y_max] = font.bbox();
        let bbox_str = format!(
            "[{} {} {} {}]",
            (x_min as f64 * scale) as i32,
            (y_min as f64 * scale) as i32,
            (x_max as f64 * scale) as i32,
            (y_max as f64 * scale) as i32,
        );
        // Symbolic: the font uses its own glyph set
        let flags = 4u32;
        let font_descriptor_dict = format!(
            "<< /Type /FontDescriptor /FontName /{} /Flags {} \
             /FontBBox {} /ItalicAngle 0 \
             /Ascent {} /Descent {} /CapHeight {} /StemV 80 \
             /FontFile2 {} 0 R >>",
            pdf_font_name,
            flags,
            bbox_str,
            (font.ascender() as f64 * scale) as i32,
            (font.descender() as f64 * scale) as i32,
            (font.cap_height() as f64 * scale) as i32,
            fontfile2_id,
        );
        let font_descriptor_id = builder.push(font_descriptor_dict.into_bytes());

        // 3. CIDFont dictionary (DescendantFont)
        let w_array = Self::build_w_array(used, font, scale);
        let cidfont_dict = format!(
            "<< /Type /Font /Subtype /CIDFontType2 /BaseFont /{} \
             /CIDSystemInfo << /Registry (Adobe) /Ordering (Identity) /Supplement 0 >> \
             /FontDescriptor {} 0 R /DW 1000 /W {} \
             /CIDToGIDMap /Identity >>",
            pdf_font_name, font_descriptor_id, w_array,
        );
        let cidfont_id = builder.push(cidfont_dict.into_bytes());

        // 4. ToUnicode CMap
        let cmap = Self::build_tounicode_cmap(used, &pdf_font_name);
        let tounicode_id = builder.push_stream(cmap.as_bytes(), "");

        // 5. Type0 font dictionary (the root, referenced by /Resources)
        let type0_dict = format!(
            "<< /Type /Font /Subtype /Type0 /BaseFont /{} \
             /Encoding /Identity-H \
             /DescendantFonts [{} 0 R] \
             /ToUnicode {} 0 R >>",
            pdf_font_name, cidfont_id, tounicode_id,
        );
        builder.push(type0_dict.into_bytes())
    }

    /// Build the /W array for per-glyph widths in CIDFont.
    /// Format: [gid [width] gid [width] ...]
    fn build_w_array(used: &BTreeMap<u16, char>, font: &dyn PdfFont, scale: f64) -> String {
        let mut result = String::from("[");
        for (&gid, &ch) in used {
            let width = (font.advance(ch) as f64 * scale) as u32;
            let _ = write!(result, " {} [{}]", gid, width);
        }
        result.push_str(" ]");
        result
    }

    /// Build a ToUnicode CMap for text extraction/copy-paste support.
    fn build_tounicode_cmap(used: &BTreeMap<u16, char>, font_name: &str) -> String {
        let mut cmap = String::new();
        let _ = writeln!(cmap, "/CIDInit /ProcSet findresource begin");
        let _ = writeln!(cmap, "12 dict begin");
        let _ = writeln!(cmap, "begincmap");
        let _ = writeln!(cmap, "/CIDSystemInfo");
        let _ = writeln!(cmap, "<< /Registry (Adobe) /Ordering (UCS) /Supplement 0 >> def");
        let _ = writeln!(cmap, "/CMapName /{}-UTF16 def", font_name);
        let _ = writeln!(cmap, "/CMapType 2 def");
        let _ = writeln!(cmap, "1 begincodespacerange");
        let _ = writeln!(cmap, "<0000> <FFFF>");
        let _ = writeln!(cmap, "endcodespacerange");

        // beginbfchar blocks hold at most 100 entries
        let entries: Vec<(&u16, &char)> = used.iter().collect();
        for chunk in entries.chunks(100) {
            let _ = writeln!(cmap, "{} beginbfchar", chunk.len());
            for &(gid, &ch) in chunk {
                let mut utf16 = [0u16; 2];
                let units: String = ch
                    .encode_utf16(&mut utf16)
                    .iter()
                    .map(|u| format!("{:04X}", u))
                    .collect();
                let _ = writeln!(cmap, "<{:04X}> <{}>", gid, units);
            }
            let _ = writeln!(cmap, "endbfchar");
        }

        let _ = writeln!(cmap, "endcmap");
        let _ = writeln!(cmap, "CMapName currentdict /CMap defineresource pop");
        let _ = writeln!(cmap, "end");
        let _ = writeln!(cmap, "end");

        cmap
    }

    /// Sanitize a font name for use as a PDF name object.
    fn sanitize_font_name(family: &str) -> String {
        let name: String = family
            .chars()
            .filter(|c| c.is_ascii_alphanumeric() || *c == '-' || *c == '_')
            .collect();

        if name.is_empty() {
            "EmbeddedFont".to_string()
        } else {
            name
        }
    }

    fn write_info(builder: &mut PdfBuilder, metadata: &Metadata) -> Option<usize> {
        if metadata.title.is_none() && metadata.author.is_none() && metadata.subject.is_none() {
            return None;
        }
        let mut info = String::from("<< ");
        if let Some(ref title) = metadata.title {
            let _ = write!(info, "/Title {} ", Self::pdf_text_string(title));
        }
        if let Some(ref author) = metadata.author {
            let _ = write!(info, "/Author {} ", Self::pdf_text_string(author));
        }
        if let Some(ref subject) = metadata.subject {
            let _ = write!(info, "/Subject {} ", Self::pdf_text_string(subject));
        }
        let _ = write!(info, "/Producer (Qalam) >>");
        Some(builder.push(info.into_bytes()))
    }

    /// Encode an Info string. ASCII goes in a literal string; anything else
    /// (Arabic titles) as UTF-16BE hex with a byte order mark.
    fn pdf_text_string(s: &str) -> String {
        if s.is_ascii() {
            return format!("({})", Self::escape_pdf_string(s));
        }
        let mut hex = String::from("<FEFF");
        for unit in s.encode_utf16() {
            let _ = write!(hex, "{:04X}", unit);
        }
        hex.push('>');
        hex
    }

    /// Escape special characters in a PDF string.
    fn escape_pdf_string(s: &str) -> String {
        s.replace('\\', "\\\\")
            .replace('(', "\\(")
            .replace(')', "\\)")
    }

    /// Serialize all objects into the final PDF byte stream.
    fn serialize(&self, builder: &PdfBuilder, info_obj_id: Option<usize>) -> Vec<u8> {
        let mut output: Vec<u8> = Vec::new();
        let mut offsets: Vec<usize> = vec![0; builder.objects.len()];

        // Header
        output.extend_from_slice(b"%PDF-1.7\n");
        output.extend_from_slice(b"%\xe2\xe3\xcf\xd3\n");

        for (i, obj) in builder.objects.iter().enumerate().skip(1) {
            offsets[i] = output.len();
            let _ = write!(output, "{} 0 obj\n", i);
            output.extend_from_slice(&obj.data);
            output.extend_from_slice(b"\nendobj\n\n");
        }

        let xref_offset = output.len();
        let _ = write!(output, "xref\n0 {}\n", builder.objects.len());
        let _ = write!(output, "0000000000 65535 f \n");
        for offset in offsets.iter().skip(1) {
            let _ = write!(output, "{:010} 00000 n \n", offset);
        }

        let _ = write!(output, "trailer\n<< /Size {} /Root 1 0 R", builder.objects.len());
        if let Some(info_id) = info_obj_id {
            let _ = write!(output, " /Info {} 0 R", info_id);
        }
        let _ = write!(output, " >>\nstartxref\n{}\n%%EOF\n", xref_offset);

        output
    }
}
