//! Document body (w:body)

use crate::document::Paragraph;
use crate::error::Result;
use crate::xml::skip_element;
use quick_xml::events::{BytesEnd, BytesStart, Event};
use quick_xml::{Reader, Writer};
use std::io::BufRead;

/// Document body: an ordered list of paragraphs
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Body {
    pub paragraphs: Vec<Paragraph>,
}

impl Body {
    /// Parse body from XML reader (after w:body start tag).
    ///
    /// Block content other than paragraphs (tables, section properties) is
    /// skipped.
    pub fn from_reader<R: BufRead>(reader: &mut Reader<R>) -> Result<Self> {
        let mut body = Body::default();
        let mut buf = Vec::new();

        loop {
            match reader.read_event_into(&mut buf)? {
                Event::Start(e) => {
                    if e.name().local_name().as_ref() == b"p" {
                        body.paragraphs.push(Paragraph::from_reader(reader)?);
                    } else {
                        skip_element(reader, &e)?;
                    }
                }
                Event::Empty(e) => {
                    if e.name().local_name().as_ref() == b"p" {
                        body.paragraphs.push(Paragraph::default());
                    }
                }
                Event::End(e) => {
                    if e.name().local_name().as_ref() == b"body" {
                        break;
                    }
                }
                Event::Eof => break,
                _ => {}
            }
            buf.clear();
        }

        Ok(body)
    }

    /// Get all paragraphs
    pub fn paragraphs(&self) -> impl Iterator<Item = &Paragraph> {
        self.paragraphs.iter()
    }

    /// Add a paragraph
    pub fn add_paragraph(&mut self, para: Paragraph) {
        self.paragraphs.push(para);
    }

    /// Write body to XML writer
    pub fn write_to<W: std::io::Write>(&self, writer: &mut Writer<W>) -> Result<()> {
        writer.write_event(Event::Start(BytesStart::new("w:body")))?;

        for para in &self.paragraphs {
            para.write_to(writer)?;
        }

        writer.write_event(Event::End(BytesEnd::new("w:body")))?;
        Ok(())
    }
}
