//! Getting plain text out of an upload.
//!
//! Two kinds of upload carry text the converter understands: plain text and
//! Word `.docx` documents. The kind is taken from the declared content type,
//! falling back to the file name when the client didn't say. Anything else
//! still converts, into a document that says the type is unsupported.

use quick_xml::events::Event;
use quick_xml::Reader;
use std::io::{Cursor, Read};
use thiserror::Error;
use zip::result::ZipError;
use zip::ZipArchive;

pub const DOCX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";
pub const PLAIN_TEXT_CONTENT_TYPE: &str = "text/plain";

/// Text of the document produced for an upload of an unknown type
pub const UNSUPPORTED_TEXT: &str = "Unsupported file type.";
/// Text of the document produced for a `.docx` with no text in it
pub const EMPTY_DOCX_TEXT: &str = "No content found in .docx file.";

/// Where the main body of a WordprocessingML package lives
const DOCX_BODY: &str = "word/document.xml";

#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("failed to read .docx archive: {0}")]
    Zip(#[from] ZipError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("failed to parse document XML: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("invalid .docx: {0}")]
    InvalidDocx(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    Docx,
    PlainText,
    Unsupported,
}

impl SourceKind {
    /// Kind named by a content type such as `text/plain; charset=utf-8`.
    /// Returns [None] for a missing or generic (`application/octet-stream`) type.
    pub fn from_content_type(content_type: &str) -> Option<SourceKind> {
        let essence = content_type
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();

        match essence.as_str() {
            "" | "application/octet-stream" => None,
            DOCX_CONTENT_TYPE => Some(SourceKind::Docx),
            PLAIN_TEXT_CONTENT_TYPE => Some(SourceKind::PlainText),
            _ => Some(SourceKind::Unsupported),
        }
    }

    /// Decide what an upload is from its declared content type, or failing
    /// that, from its file name's extension
    pub fn detect(content_type: Option<&str>, file_name: Option<&str>) -> SourceKind {
        content_type
            .and_then(SourceKind::from_content_type)
            .or_else(|| {
                let guessed = mime_guess::from_path(file_name?).first_raw()?;
                SourceKind::from_content_type(guessed)
            })
            .unwrap_or(SourceKind::Unsupported)
    }
}

/// The text to lay out for an upload of the given kind
pub fn extract_text(bytes: &[u8], kind: SourceKind) -> Result<String, ExtractError> {
    match kind {
        SourceKind::PlainText => Ok(decode_plain_text(bytes)),
        SourceKind::Docx => {
            let text = extract_docx_text(bytes)?;
            if text.trim().is_empty() {
                Ok(EMPTY_DOCX_TEXT.to_string())
            } else {
                Ok(text)
            }
        }
        SourceKind::Unsupported => Ok(UNSUPPORTED_TEXT.to_string()),
    }
}

/// Decode UTF-8 text, replacing invalid sequences and dropping a leading BOM
pub fn decode_plain_text(bytes: &[u8]) -> String {
    let text = String::from_utf8_lossy(bytes);
    text.strip_prefix('\u{FEFF}').unwrap_or(&text).to_string()
}

/// Raw text of a `.docx`: one line per paragraph, tabs and manual line breaks
/// kept, all formatting dropped
pub fn extract_docx_text(bytes: &[u8]) -> Result<String, ExtractError> {
    let mut archive = ZipArchive::new(Cursor::new(bytes))?;
    let mut xml = String::new();
    match archive.by_name(DOCX_BODY) {
        Ok(mut body) => body.read_to_string(&mut xml)?,
        Err(ZipError::FileNotFound) => {
            return Err(ExtractError::InvalidDocx(format!("no {DOCX_BODY} in archive")))
        }
        Err(e) => return Err(e.into()),
    };

    paragraphs_of(&xml).map(|paragraphs| paragraphs.join("\n"))
}

/// Text of each `w:p` in a WordprocessingML body
fn paragraphs_of(xml: &str) -> Result<Vec<String>, ExtractError> {
    let mut reader = Reader::from_str(xml);

    let mut paragraphs: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut in_text_run = false;

    loop {
        match reader.read_event()? {
            Event::Start(e) if e.local_name().as_ref() == b"t" => in_text_run = true,
            Event::End(e) => match e.local_name().as_ref() {
                b"t" => in_text_run = false,
                b"p" => paragraphs.push(std::mem::take(&mut current)),
                _ => {}
            },
            Event::Empty(e) => match e.local_name().as_ref() {
                b"tab" => current.push('\t'),
                b"br" | b"cr" => current.push('\n'),
                b"p" => paragraphs.push(String::new()),
                _ => {}
            },
            Event::Text(text) if in_text_run => current.push_str(&text.unescape()?),
            Event::CData(data) if in_text_run => {
                current.push_str(&String::from_utf8_lossy(&data.into_inner()))
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if !current.is_empty() {
        paragraphs.push(current);
    }
    Ok(paragraphs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use zip::write::SimpleFileOptions;
    use zip::ZipWriter;

    fn docx(body: &str) -> Vec<u8> {
        let xml = format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body>{body}</w:body></w:document>"#
        );
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        writer
            .start_file("[Content_Types].xml", SimpleFileOptions::default())
            .unwrap();
        writer.write_all(b"<Types/>").unwrap();
        writer
            .start_file(DOCX_BODY, SimpleFileOptions::default())
            .unwrap();
        writer.write_all(xml.as_bytes()).unwrap();
        writer.finish().unwrap().into_inner()
    }

    #[test]
    fn detects_kind_from_content_type() {
        assert_eq!(
            SourceKind::detect(Some(DOCX_CONTENT_TYPE), None),
            SourceKind::Docx
        );
        assert_eq!(
            SourceKind::detect(Some("Text/Plain; charset=utf-8"), Some("notes.docx")),
            SourceKind::PlainText
        );
        assert_eq!(
            SourceKind::detect(Some("application/pdf"), Some("notes.txt")),
            SourceKind::Unsupported
        );
    }

    #[test]
    fn falls_back_to_the_file_name() {
        assert_eq!(
            SourceKind::detect(Some("application/octet-stream"), Some("notes.txt")),
            SourceKind::PlainText
        );
        assert_eq!(SourceKind::detect(None, Some("report.docx")), SourceKind::Docx);
        assert_eq!(SourceKind::detect(Some(""), Some("scan.png")), SourceKind::Unsupported);
        assert_eq!(SourceKind::detect(None, None), SourceKind::Unsupported);
        assert_eq!(SourceKind::detect(None, Some("README")), SourceKind::Unsupported);
    }

    #[test]
    fn plain_text_is_decoded_leniently() {
        assert_eq!(decode_plain_text("\u{FEFF}héllo".as_bytes()), "héllo");
        assert_eq!(decode_plain_text(b"bad \xff byte"), "bad \u{FFFD} byte");
    }

    #[test]
    fn unsupported_uploads_say_so() {
        assert_eq!(
            extract_text(b"%PDF-1.7", SourceKind::Unsupported).unwrap(),
            UNSUPPORTED_TEXT
        );
    }

    #[test]
    fn extracts_docx_paragraphs() {
        let bytes = docx(concat!(
            r#"<w:p><w:r><w:t>Hello</w:t></w:r><w:r><w:t xml:space="preserve"> world &amp; all</w:t></w:r></w:p>"#,
            r#"<w:p/>"#,
            r#"<w:p><w:r><w:t>a</w:t><w:tab/><w:t>b</w:t><w:br/><w:t>c</w:t></w:r></w:p>"#,
            r#"<w:p><w:r><w:instrText>PAGE</w:instrText></w:r></w:p>"#,
        ));
        assert_eq!(
            extract_docx_text(&bytes).unwrap(),
            "Hello world & all\n\na\tb\nc\n"
        );
    }

    #[test]
    fn empty_docx_gets_a_placeholder() {
        let bytes = docx("<w:p/><w:p><w:r><w:t>  </w:t></w:r></w:p>");
        assert_eq!(extract_text(&bytes, SourceKind::Docx).unwrap(), EMPTY_DOCX_TEXT);
    }

    #[test]
    fn rejects_archives_that_are_not_docx() {
        assert!(matches!(
            extract_docx_text(b"plain text, not a zip"),
            Err(ExtractError::Zip(_))
        ));

        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        writer
            .start_file("mimetype", SimpleFileOptions::default())
            .unwrap();
        writer.write_all(b"application/epub+zip").unwrap();
        let epub = writer.finish().unwrap().into_inner();
        assert!(matches!(
            extract_docx_text(&epub),
            Err(ExtractError::InvalidDocx(_))
        ));
    }

    #[test]
    fn malformed_xml_is_an_error() {
        let bytes = docx("<w:p><w:r><w:t>unclosed</w:r></w:p>");
        assert!(matches!(
            extract_docx_text(&bytes),
            Err(ExtractError::Xml(_))
        ));
    }
}
