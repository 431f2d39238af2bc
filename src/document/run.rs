//! Run element (w:r) - a contiguous run of text with uniform formatting

use crate::error::Result;
use crate::xml::{get_w_val, skip_element, EscapedText};
use quick_xml::events::{BytesEnd, BytesStart, Event};
use quick_xml::{Reader, Writer};
use std::io::BufRead;

const MIN_HALF_POINTS: u32 = 2;
const MAX_HALF_POINTS: u32 = 3276;

/// Run element (w:r)
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Run {
    /// Run properties
    pub properties: Option<RunProperties>,
    /// Run text, escaped on construction
    text: EscapedText,
}

/// Run properties (w:rPr)
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RunProperties {
    /// Font size (in half-points, e.g., 24 = 12pt), written as `w:sz` and `w:szCs`
    pub size: Option<u32>,
}

impl Run {
    /// Create a new run with text
    pub fn new(text: &str) -> Result<Self> {
        Ok(Run {
            properties: None,
            text: EscapedText::new(text)?,
        })
    }

    /// Parse from reader (after w:r start tag)
    ///
    /// Text, tabs and breaks are flattened into the run's text; anything else
    /// is skipped.
    pub fn from_reader<R: BufRead>(reader: &mut Reader<R>) -> Result<Self> {
        let mut properties = None;
        let mut text = String::new();
        let mut buf = Vec::new();

        loop {
            match reader.read_event_into(&mut buf)? {
                Event::Start(e) => {
                    let name = e.name();
                    let local = name.local_name();

                    match local.as_ref() {
                        b"rPr" => {
                            properties = Some(RunProperties::from_reader(reader)?);
                        }
                        b"t" => {
                            text.push_str(&read_text_content(reader)?);
                        }
                        _ => skip_element(reader, &e)?,
                    }
                }
                Event::Empty(e) => {
                    let name = e.name();
                    let local = name.local_name();

                    match local.as_ref() {
                        b"tab" => text.push('\t'),
                        b"br" | b"cr" => text.push('\n'),
                        _ => {}
                    }
                }
                Event::End(e) => {
                    if e.name().local_name().as_ref() == b"r" {
                        break;
                    }
                }
                Event::Eof => break,
                _ => {}
            }
            buf.clear();
        }

        Ok(Run {
            properties,
            text: EscapedText::new(&text)?,
        })
    }

    /// Get the text in this run
    pub fn text(&self) -> &str {
        self.text.raw()
    }

    /// Get font size in points (None if not specified)
    pub fn font_size_pt(&self) -> Option<f32> {
        self.properties.as_ref()?.size.map(|s| s as f32 / 2.0)
    }

    /// Set font size in points, clamped to the 1pt..=1638pt range Word accepts
    pub fn set_font_size_pt(&mut self, size: f32) {
        let half_points = if size.is_nan() {
            MIN_HALF_POINTS
        } else {
            (size * 2.0)
                .round()
                .clamp(MIN_HALF_POINTS as f32, MAX_HALF_POINTS as f32) as u32
        };
        self.properties.get_or_insert_with(Default::default).size = Some(half_points);
    }

    /// Write to XML writer
    pub fn write_to<W: std::io::Write>(&self, writer: &mut Writer<W>) -> Result<()> {
        writer.write_event(Event::Start(BytesStart::new("w:r")))?;

        if let Some(props) = &self.properties {
            props.write_to(writer)?;
        }

        let mut t = BytesStart::new("w:t");
        if self.text.needs_space_preserve() {
            t.push_attribute(("xml:space", "preserve"));
        }
        writer.write_event(Event::Start(t))?;
        writer.write_event(self.text.to_event())?;
        writer.write_event(Event::End(BytesEnd::new("w:t")))?;

        writer.write_event(Event::End(BytesEnd::new("w:r")))?;
        Ok(())
    }
}

impl RunProperties {
    /// Parse from reader (after w:rPr start tag)
    pub fn from_reader<R: BufRead>(reader: &mut Reader<R>) -> Result<Self> {
        let mut props = RunProperties::default();
        let mut buf = Vec::new();

        loop {
            match reader.read_event_into(&mut buf)? {
                Event::Start(e) => skip_element(reader, &e)?,
                Event::Empty(e) => {
                    if e.name().local_name().as_ref() == b"sz" {
                        props.size = get_w_val(&e).and_then(|v| v.parse().ok());
                    }
                }
                Event::End(e) => {
                    if e.name().local_name().as_ref() == b"rPr" {
                        break;
                    }
                }
                Event::Eof => break,
                _ => {}
            }
            buf.clear();
        }

        Ok(props)
    }

    /// Write to XML writer
    pub fn write_to<W: std::io::Write>(&self, writer: &mut Writer<W>) -> Result<()> {
        let Some(size) = self.size else {
            return Ok(());
        };

        writer.write_event(Event::Start(BytesStart::new("w:rPr")))?;

        let size = size.to_string();
        for tag in ["w:sz", "w:szCs"] {
            let mut elem = BytesStart::new(tag);
            elem.push_attribute(("w:val", size.as_str()));
            writer.write_event(Event::Empty(elem))?;
        }

        writer.write_event(Event::End(BytesEnd::new("w:rPr")))?;
        Ok(())
    }
}

/// Read text content from w:t element
fn read_text_content<R: BufRead>(reader: &mut Reader<R>) -> Result<String> {
    let mut text = String::new();
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Text(t) => {
                text.push_str(&t.unescape()?);
            }
            Event::CData(c) => {
                text.push_str(&String::from_utf8_lossy(&c));
            }
            Event::End(e) => {
                if e.name().local_name().as_ref() == b"t" {
                    break;
                }
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn to_xml(run: &Run) -> String {
        let mut writer = Writer::new(Vec::new());
        run.write_to(&mut writer).unwrap();
        String::from_utf8(writer.into_inner()).unwrap()
    }

    fn parse(xml: &str) -> Run {
        let mut reader = Reader::from_str(xml);
        let mut buf = Vec::new();
        // Consume the opening w:r
        reader.read_event_into(&mut buf).unwrap();
        Run::from_reader(&mut reader).unwrap()
    }

    #[test]
    fn test_write_plain_run() {
        let run = Run::new("Line one").unwrap();
        assert_eq!(to_xml(&run), "<w:r><w:t>Line one</w:t></w:r>");
    }

    #[test]
    fn test_write_escapes_text() {
        let run = Run::new("a<b & 'c'").unwrap();
        assert_eq!(
            to_xml(&run),
            "<w:r><w:t>a&lt;b &amp; &apos;c&apos;</w:t></w:r>"
        );
    }

    #[test]
    fn test_write_sized_run() {
        let mut run = Run::new("Report").unwrap();
        run.set_font_size_pt(16.0);
        assert_eq!(run.font_size_pt(), Some(16.0));
        assert_eq!(
            to_xml(&run),
            r#"<w:r><w:rPr><w:sz w:val="32"/><w:szCs w:val="32"/></w:rPr><w:t>Report</w:t></w:r>"#
        );
    }

    #[test]
    fn test_font_size_clamped() {
        let mut run = Run::new("x").unwrap();

        run.set_font_size_pt(f32::NAN);
        assert_eq!(run.font_size_pt(), Some(1.0));

        run.set_font_size_pt(-4.0);
        assert_eq!(run.font_size_pt(), Some(1.0));

        run.set_font_size_pt(1e9);
        assert_eq!(run.font_size_pt(), Some(1638.0));

        run.set_font_size_pt(10.5);
        assert_eq!(run.properties.as_ref().unwrap().size, Some(21));
    }

    #[test]
    fn test_write_preserves_space() {
        let run = Run::new("  indented").unwrap();
        assert_eq!(
            to_xml(&run),
            r#"<w:r><w:t xml:space="preserve">  indented</w:t></w:r>"#
        );
    }

    #[test]
    fn test_write_empty_run() {
        let run = Run::new("").unwrap();
        assert_eq!(to_xml(&run), "<w:r><w:t></w:t></w:r>");
    }

    #[test]
    fn test_parse_run() {
        let run = parse(
            r#"<w:r><w:rPr><w:b/><w:sz w:val="28"/></w:rPr><w:t>Tom &amp; Jerry</w:t><w:tab/><w:t>x</w:t></w:r>"#,
        );
        assert_eq!(run.text(), "Tom & Jerry\tx");
        assert_eq!(run.font_size_pt(), Some(14.0));
    }

    #[test]
    fn test_roundtrip_text() {
        let original = Run::new(r#"<tag attr="v"> & 'q'"#).unwrap();
        let parsed = parse(&to_xml(&original));
        assert_eq!(parsed.text(), original.text());
    }
}
