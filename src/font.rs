use crate::{
    error::{MeasureError, PDFError},
    layout::TextMeasure,
    metrics::StandardFont,
    refs::{ObjectReferences, RefType},
    Pt,
};
use owned_ttf_parser::{name_id, AsFaceRef, Face, GlyphId, OwnedFace};
use pdf_writer::{
    types::{CidFontType, FontFlags, SystemInfo},
    Filter, Finish, Name, Pdf, Ref, Str,
};
use std::{collections::BTreeMap, fmt, path::Path};

/// A parsed TrueType / OpenType font. It measures text with its own advance
/// widths and is embedded whole into the generated PDF, so large fonts make
/// large documents.
pub struct Font {
    pub face: OwnedFace,
}

impl fmt::Debug for Font {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Font")
            .field("name", &self.postscript_name())
            .field("glyphs", &self.face().number_of_glyphs())
            .finish()
    }
}

impl Font {
    /// Load a font from raw bytes, returning an error if it can't be parsed
    pub fn load(bytes: Vec<u8>) -> Result<Font, PDFError> {
        let face = OwnedFace::from_vec(bytes, 0)?;
        Ok(Font { face })
    }

    /// Read and parse a font file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Font, PDFError> {
        Font::load(std::fs::read(path)?)
    }

    fn face(&self) -> &Face<'_> {
        self.face.as_face_ref()
    }

    fn scaling(&self, size: Pt) -> Pt {
        size / self.face().units_per_em() as f32
    }

    /// PostScript name of the face, reduced to characters that are safe in a
    /// PDF name. Falls back to a generic name for faces without one.
    pub fn postscript_name(&self) -> String {
        let name: String = self
            .face()
            .names()
            .into_iter()
            .find(|name| name.name_id == name_id::POST_SCRIPT_NAME && name.is_unicode())
            .and_then(|name| name.to_string())
            .unwrap_or_default()
            .chars()
            .filter(|c| c.is_ascii_alphanumeric() || *c == '-')
            .collect();

        if name.is_empty() {
            "EmbeddedFont".to_string()
        } else {
            name
        }
    }

    /// Glyph used to draw `ch`. Characters the font lacks are drawn with the
    /// replacement character, then `?`, then the `.notdef` glyph.
    pub fn glyph_for(&self, ch: char) -> GlyphId {
        let face = self.face();
        face.glyph_index(ch)
            .or_else(|| face.glyph_index('\u{FFFD}'))
            .or_else(|| face.glyph_index('?'))
            .unwrap_or(GlyphId(0))
    }

    /// Calculate the width of a given string of text given the font size
    pub fn width_of_text(&self, text: &str, size: Pt) -> Pt {
        let scaling = self.scaling(size);
        text.chars()
            .map(|ch| {
                let advance = self.face().glyph_hor_advance(self.glyph_for(ch));
                scaling * advance.unwrap_or_default() as f32
            })
            .sum()
    }

    /// Encode `text` for an `Identity-H` content stream: two big-endian bytes
    /// per glyph id
    pub fn encode(&self, text: &str) -> Vec<u8> {
        text.chars()
            .flat_map(|ch| self.glyph_for(ch).0.to_be_bytes())
            .collect()
    }

    /// Glyph id to character, from the unicode cmap subtables
    fn glyph_chars(&self) -> Result<BTreeMap<u16, char>, PDFError> {
        let cmap = self.face().tables().cmap.ok_or(PDFError::MissingCmap)?;

        let mut chars: BTreeMap<u16, char> = BTreeMap::new();
        for subtable in cmap.subtables.into_iter().filter(|table| table.is_unicode()) {
            subtable.codepoints(|codepoint| {
                let glyph = subtable.glyph_index(codepoint).filter(|gid| gid.0 > 0);
                if let (Some(glyph), Some(ch)) = (glyph, char::from_u32(codepoint)) {
                    chars.entry(glyph.0).or_insert(ch);
                }
            });
        }
        Ok(chars)
    }

    fn write_descriptor(&self, refs: &mut ObjectReferences, name: &str, writer: &mut Pdf) -> Ref {
        let face = self.face();
        let scaling = 1000.0 / face.units_per_em() as f32;

        let data_id = refs.gen(RefType::FontData);
        writer
            .stream(data_id, self.face.as_slice())
            .pair(Name(b"Length1"), self.face.as_slice().len() as i32);

        let mut flags = FontFlags::NON_SYMBOLIC;
        if face.is_monospaced() {
            flags.insert(FontFlags::FIXED_PITCH);
        }
        if face.is_italic() {
            flags.insert(FontFlags::ITALIC);
        }

        let bbox = face.global_bounding_box();
        let id = refs.gen(RefType::FontDescriptor);
        let mut descriptor = writer.font_descriptor(id);
        descriptor
            .name(Name(name.as_bytes()))
            .flags(flags)
            .bbox(pdf_writer::Rect::new(
                bbox.x_min as f32 * scaling,
                bbox.y_min as f32 * scaling,
                bbox.x_max as f32 * scaling,
                bbox.y_max as f32 * scaling,
            ))
            .italic_angle(face.italic_angle())
            .ascent(face.ascender() as f32 * scaling)
            .descent(face.descender() as f32 * scaling)
            .cap_height(
                face.capital_height()
                    .map(|h| h as f32 * scaling)
                    .unwrap_or(face.ascender() as f32 * scaling),
            )
            // ttf has no stem width; this is the value most producers write for regular weights
            .stem_v(80.0)
            .font_file2(data_id);
        descriptor.finish();

        id
    }

    fn write_cid(&self, refs: &mut ObjectReferences, name: &str, writer: &mut Pdf) -> Ref {
        let descriptor_id = self.write_descriptor(refs, name, writer);

        let face = self.face();
        let scaling = 1000.0 / face.units_per_em() as f32;
        let widths: Vec<f32> = (0..face.number_of_glyphs())
            .map(|gid| {
                face.glyph_hor_advance(GlyphId(gid)).unwrap_or_default() as f32 * scaling
            })
            .collect();

        let id = refs.gen(RefType::CidFont);
        let mut cid_font = writer.cid_font(id);
        cid_font
            .subtype(CidFontType::Type2)
            .base_font(Name(name.as_bytes()))
            .system_info(SystemInfo {
                registry: Str(b"Adobe"),
                ordering: Str(b"Identity"),
                supplement: 0,
            })
            .font_descriptor(descriptor_id)
            .default_width(1000.0)
            .cid_to_gid_map_predefined(Name(b"Identity"));
        cid_font.widths().consecutive(0, widths);
        cid_font.finish();

        id
    }

    fn write_to_unicode(&self, refs: &mut ObjectReferences, writer: &mut Pdf) -> Result<Ref, PDFError> {
        let mut cmap = String::from(
            "/CIDInit /ProcSet findresource begin\n\
             12 dict begin\n\
             begincmap\n\
             /CIDSystemInfo << /Registry (Adobe) /Ordering (UCS) /Supplement 0 >> def\n\
             /CMapName /Adobe-Identity-UCS def\n\
             /CMapType 2 def\n\
             1 begincodespacerange\n<0000> <FFFF>\nendcodespacerange\n",
        );

        // bfchar sections hold at most 100 entries each
        let glyphs: Vec<(u16, char)> = self.glyph_chars()?.into_iter().collect();
        for block in glyphs.chunks(100) {
            cmap.push_str(&format!("{} beginbfchar\n", block.len()));
            for (gid, ch) in block {
                let mut units = [0u16; 2];
                let hex: String = ch
                    .encode_utf16(&mut units)
                    .iter()
                    .map(|unit| format!("{unit:04x}"))
                    .collect();
                cmap.push_str(&format!("<{gid:04x}> <{hex}>\n"));
            }
            cmap.push_str("endbfchar\n");
        }
        cmap.push_str("endcmap\nCMapName currentdict /CMap defineresource pop\nend\nend\n");

        let compressed = miniz_oxide::deflate::compress_to_vec_zlib(cmap.as_bytes(), 6);
        let id = refs.gen(RefType::ToUnicode);
        writer
            .stream(id, compressed.as_slice())
            .filter(Filter::FlateDecode);

        Ok(id)
    }

    /// Embed the font as a Type0 font with a single CID descendant
    pub(crate) fn write(&self, refs: &mut ObjectReferences, writer: &mut Pdf) -> Result<Ref, PDFError> {
        let name = self.postscript_name();
        let cid_font_id = self.write_cid(refs, &name, writer);
        let to_unicode_id = self.write_to_unicode(refs, writer)?;

        let id = refs.gen(RefType::Font);
        writer
            .type0_font(id)
            .base_font(Name(name.as_bytes()))
            .encoding_predefined(Name(b"Identity-H"))
            .descendant_font(cid_font_id)
            .to_unicode(to_unicode_id);

        Ok(id)
    }
}

impl TextMeasure for Font {
    fn measure(&self, text: &str, size: Pt) -> Result<Pt, MeasureError> {
        Ok(self.width_of_text(text, size))
    }
}

/// The one font a converted document is set in. It both measures text for
/// layout and is written into the PDF, so what is measured is what is drawn.
#[derive(Debug)]
pub enum DocumentFont {
    Standard(StandardFont),
    Embedded(Box<Font>),
}

impl Default for DocumentFont {
    fn default() -> Self {
        DocumentFont::Standard(StandardFont::Helvetica)
    }
}

impl From<StandardFont> for DocumentFont {
    fn from(font: StandardFont) -> Self {
        DocumentFont::Standard(font)
    }
}

impl From<Font> for DocumentFont {
    fn from(font: Font) -> Self {
        DocumentFont::Embedded(Box::new(font))
    }
}

impl DocumentFont {
    pub fn name(&self) -> String {
        match self {
            DocumentFont::Standard(font) => font.base_font().to_string(),
            DocumentFont::Embedded(font) => font.postscript_name(),
        }
    }

    /// Bytes to pass to the `Tj` operator to draw `text` in this font
    pub fn encode(&self, text: &str) -> Vec<u8> {
        match self {
            DocumentFont::Standard(font) => font.encode(text),
            DocumentFont::Embedded(font) => font.encode(text),
        }
    }

    pub(crate) fn write(&self, refs: &mut ObjectReferences, writer: &mut Pdf) -> Result<Ref, PDFError> {
        match self {
            DocumentFont::Standard(font) => {
                let id = refs.gen(RefType::Font);
                writer
                    .type1_font(id)
                    .base_font(Name(font.base_font().as_bytes()))
                    .encoding_predefined(Name(b"WinAnsiEncoding"));
                Ok(id)
            }
            DocumentFont::Embedded(font) => font.write(refs, writer),
        }
    }
}

impl TextMeasure for DocumentFont {
    fn measure(&self, text: &str, size: Pt) -> Result<Pt, MeasureError> {
        match self {
            DocumentFont::Standard(font) => font.measure(text, size),
            DocumentFont::Embedded(font) => font.measure(text, size),
        }
    }
}
