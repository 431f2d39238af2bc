//! Document model - a heading followed by plain-text paragraphs

mod body;
mod paragraph;
mod run;

pub use body::Body;
pub use paragraph::{Paragraph, ParagraphProperties, HEADING_STYLE};
pub use run::{Run, RunProperties};

use crate::error::{Error, Result};
use crate::opc::{rel_types, well_known, Package, Part, MAIN_DOCUMENT};
use crate::xml;
use log::debug;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, Event};
use quick_xml::{Reader, Writer};
use std::path::Path;

/// Heading run size used when none is configured
pub const DEFAULT_HEADING_SIZE_PT: f32 = 16.0;

/// A minimal DOCX document: a first-level heading and one paragraph per line
/// of body text
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Document {
    /// All paragraphs, the heading (if any) first
    body: Body,
}

impl Document {
    /// Build a document from a title and body text.
    ///
    /// Every line of `body_text` becomes one paragraph; see [`split_lines`].
    /// Fails with [`Error::EncodingFailure`] if any text contains characters
    /// XML cannot represent.
    pub fn new(title: &str, body_text: &str) -> Result<Self> {
        Self::with_heading_size(title, body_text, DEFAULT_HEADING_SIZE_PT)
    }

    /// Like [`Document::new`] with an explicit heading size in points
    pub fn with_heading_size(title: &str, body_text: &str, heading_size_pt: f32) -> Result<Self> {
        let mut body = Body::default();
        body.add_paragraph(Paragraph::heading(title, heading_size_pt)?);

        for line in split_lines(body_text) {
            body.add_paragraph(Paragraph::new(line)?);
        }

        debug!(
            "built document with {} body paragraphs",
            body.paragraphs.len() - 1
        );
        Ok(Self { body })
    }

    /// Open a document from a file path
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let package = Package::open(path)?;
        Self::from_package(&package)
    }

    /// Open a document from bytes
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let package = Package::from_bytes(bytes)?;
        Self::from_package(&package)
    }

    /// Read the document body out of an OPC package
    pub fn from_package(package: &Package) -> Result<Self> {
        let doc_part = package
            .main_document_part()
            .ok_or_else(|| Error::MissingPart("Main document part not found".into()))?;

        let xml = doc_part.data_as_str()?;
        let body = parse_document_xml(xml)?;

        Ok(Self { body })
    }

    /// The heading paragraph, if the document starts with one
    pub fn heading(&self) -> Option<&Paragraph> {
        self.body.paragraphs.first().filter(|p| p.is_heading())
    }

    /// Heading text
    pub fn title(&self) -> Option<String> {
        self.heading().map(|p| p.text())
    }

    /// Body paragraphs following the heading
    pub fn paragraphs(&self) -> impl Iterator<Item = &Paragraph> {
        let skip = usize::from(self.heading().is_some());
        self.body.paragraphs().skip(skip)
    }

    /// Number of body paragraphs following the heading
    pub fn paragraph_count(&self) -> usize {
        self.paragraphs().count()
    }

    /// Get body paragraph by index
    pub fn paragraph(&self, index: usize) -> Option<&Paragraph> {
        self.paragraphs().nth(index)
    }

    /// Body text, one line per paragraph
    pub fn text(&self) -> String {
        self.paragraphs()
            .map(|p| p.text())
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Serialize `word/document.xml`
    pub fn to_xml(&self) -> Result<String> {
        serialize_document_xml(&self.body)
    }

    /// Assemble the three-part package: manifest, relationships and body
    pub fn to_package(&self) -> Result<Package> {
        let uri = well_known::document();
        let xml = self.to_xml()?;

        let mut package = Package::new();
        package.add_part(Part::new(uri.clone(), MAIN_DOCUMENT, xml.into_bytes()));
        package.add_relationship(rel_types::OFFICE_DOCUMENT, uri.zip_name());

        Ok(package)
    }

    /// Save the document to bytes
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        self.to_package()?.to_bytes()
    }

    /// Save the document to a file, creating parent directories.
    ///
    /// Returns [`Error::PathUnwritable`] if the destination cannot be written.
    /// Nothing is left at `path` on failure.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let package = self
            .to_package()
            .map_err(|e| Error::EncodingFailure(e.to_string()))?;
        package.save(path)
    }
}

/// Split text into paragraph lines.
///
/// `\n`, `\r\n` and a lone `\r` each end a line. `N` breaks always give
/// `N + 1` lines, so empty text is one empty line and a trailing break adds
/// a trailing empty line.
pub fn split_lines(text: &str) -> Vec<&str> {
    let bytes = text.as_bytes();
    let mut lines = Vec::new();
    let mut start = 0;
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'\n' => {
                lines.push(&text[start..i]);
                i += 1;
                start = i;
            }
            b'\r' => {
                lines.push(&text[start..i]);
                i += if bytes.get(i + 1) == Some(&b'\n') { 2 } else { 1 };
                start = i;
            }
            _ => i += 1,
        }
    }

    lines.push(&text[start..]);
    lines
}

/// Parse document.xml content
fn parse_document_xml(xml: &str) -> Result<Body> {
    let mut reader = Reader::from_str(xml);

    let mut buf = Vec::new();
    let mut body = None;

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(e) => {
                let name = e.name();
                let local = name.local_name();

                match local.as_ref() {
                    b"body" => {
                        body = Some(Body::from_reader(&mut reader)?);
                    }
                    b"document" => {
                        // Continue to find body
                    }
                    _ => {
                        xml::skip_element(&mut reader, &e)?;
                    }
                }
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    body.ok_or_else(|| Error::InvalidPackage("Missing w:body element".into()))
}

/// Serialize body to document.xml content
fn serialize_document_xml(body: &Body) -> Result<String> {
    let mut writer = Writer::new(Vec::new());

    writer.write_event(Event::Decl(BytesDecl::new(
        "1.0",
        Some("UTF-8"),
        Some("yes"),
    )))?;

    let mut doc_start = BytesStart::new("w:document");
    for (attr, value) in xml::document_namespaces() {
        doc_start.push_attribute((attr, value));
    }
    writer.write_event(Event::Start(doc_start))?;

    body.write_to(&mut writer)?;

    writer.write_event(Event::End(BytesEnd::new("w:document")))?;

    String::from_utf8(writer.into_inner()).map_err(|e| Error::EncodingFailure(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_split_lines() {
        assert_eq!(split_lines(""), vec![""]);
        assert_eq!(split_lines("one"), vec!["one"]);
        assert_eq!(split_lines("a\nb"), vec!["a", "b"]);
        assert_eq!(split_lines("a\n\nb"), vec!["a", "", "b"]);
        assert_eq!(split_lines("a\n"), vec!["a", ""]);
        assert_eq!(split_lines("a\r\nb\rc"), vec!["a", "b", "c"]);
        assert_eq!(split_lines("\r\n\r\n"), vec!["", "", ""]);
        assert_eq!(split_lines("中文\n行"), vec!["中文", "行"]);
    }

    #[test]
    fn test_document_xml() {
        let doc = Document::new("Report", "Line one\nLine two").unwrap();
        assert_eq!(
            doc.to_xml().unwrap(),
            concat!(
                r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#,
                r#"<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">"#,
                r#"<w:body>"#,
                r#"<w:p><w:pPr><w:pStyle w:val="Heading1"/><w:jc w:val="center"/></w:pPr>"#,
                r#"<w:r><w:rPr><w:sz w:val="32"/><w:szCs w:val="32"/></w:rPr><w:t>Report</w:t></w:r></w:p>"#,
                r#"<w:p><w:r><w:t>Line one</w:t></w:r></w:p>"#,
                r#"<w:p><w:r><w:t>Line two</w:t></w:r></w:p>"#,
                r#"</w:body></w:document>"#,
            )
        );
    }

    #[test]
    fn test_parse_generated_document() {
        let doc = Document::new("A & B", "x < y\n\n'quoted' \"text\"").unwrap();
        let body = parse_document_xml(&doc.to_xml().unwrap()).unwrap();
        let parsed = Document { body };

        assert_eq!(parsed.title().as_deref(), Some("A & B"));
        assert_eq!(parsed.paragraph_count(), 3);
        assert_eq!(parsed.text(), "x < y\n\n'quoted' \"text\"");
        assert_eq!(parsed, doc);
    }

    #[test]
    fn test_parse_foreign_document() {
        let xml = r#"<?xml version="1.0" encoding="UTF-8"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
  <w:background w:color="FFFFFF"><w:x/></w:background>
  <w:body>
    <w:p>
      <w:r>
        <w:t>Hello, World!</w:t>
      </w:r>
    </w:p>
    <w:tbl><w:tr><w:tc><w:p><w:r><w:t>cell</w:t></w:r></w:p></w:tc></w:tr></w:tbl>
    <w:p/>
    <w:sectPr/>
  </w:body>
</w:document>"#;

        let doc = Document {
            body: parse_document_xml(xml).unwrap(),
        };

        assert!(doc.heading().is_none());
        assert_eq!(doc.paragraph_count(), 2);
        assert_eq!(doc.paragraph(0).unwrap().text(), "Hello, World!");
        assert_eq!(doc.paragraph(1).unwrap().text(), "");
    }

    #[test]
    fn test_missing_body() {
        let xml = r#"<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"/>"#;
        assert!(matches!(
            parse_document_xml(xml),
            Err(Error::InvalidPackage(_))
        ));
    }

    #[test]
    fn test_invalid_character_fails_to_build() {
        let err = Document::new("ok", "fine\nbad \u{1b}[0m escape").unwrap_err();
        assert!(matches!(err, Error::EncodingFailure(_)));

        let err = Document::new("bad\u{0}", "").unwrap_err();
        assert!(matches!(err, Error::EncodingFailure(_)));
    }
}
