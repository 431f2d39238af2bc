//! Text-node escaping
//!
//! Every piece of caller text passes through [`EscapedText`] before it is
//! placed in a document part. The type can only be built from raw text, so
//! the serializers never see unescaped input and never escape twice.

use crate::error::{Error, Result};
use quick_xml::escape::escape;
use quick_xml::events::{BytesText, Event};

/// Text that has been checked and entity-escaped for use as an XML text node.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EscapedText {
    raw: String,
    escaped: String,
}

impl EscapedText {
    /// Check `raw` for characters XML 1.0 cannot carry and escape
    /// `&`, `<`, `>`, `"` and `'`.
    pub fn new(raw: &str) -> Result<Self> {
        if let Some((pos, c)) = raw.char_indices().find(|&(_, c)| !is_xml_char(c)) {
            return Err(Error::EncodingFailure(format!(
                "character U+{:04X} at byte {} is not allowed in XML",
                c as u32, pos
            )));
        }

        Ok(Self {
            raw: raw.to_string(),
            escaped: escape(raw).into_owned(),
        })
    }

    /// The original, unescaped text
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// The escaped form, as written into the part
    pub fn as_escaped(&self) -> &str {
        &self.escaped
    }

    /// Whether a `w:t` holding this text needs `xml:space="preserve"`
    pub fn needs_space_preserve(&self) -> bool {
        let raw = self.raw.as_str();
        raw.starts_with(char::is_whitespace)
            || raw.ends_with(char::is_whitespace)
            || raw.contains("  ")
    }

    /// Text event carrying the already-escaped content
    pub(crate) fn to_event(&self) -> Event<'_> {
        Event::Text(BytesText::from_escaped(self.escaped.as_str()))
    }
}

/// XML 1.0 `Char` production, restricted to what a Rust `char` can hold
fn is_xml_char(c: char) -> bool {
    matches!(c,
        '\u{9}' | '\u{A}' | '\u{D}'
        | '\u{20}'..='\u{D7FF}'
        | '\u{E000}'..='\u{FFFD}'
        | '\u{10000}'..='\u{10FFFF}')
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_escapes_all_reserved_characters() {
        let text = EscapedText::new(r#"a & b < c > d "e" 'f'"#).unwrap();
        assert_eq!(
            text.as_escaped(),
            "a &amp; b &lt; c &gt; d &quot;e&quot; &apos;f&apos;"
        );
        assert_eq!(text.raw(), r#"a & b < c > d "e" 'f'"#);
    }

    #[test]
    fn test_existing_entities_are_escaped_once() {
        let text = EscapedText::new("&amp;").unwrap();
        assert_eq!(text.as_escaped(), "&amp;amp;");
    }

    #[test]
    fn test_plain_unicode_untouched() {
        let text = EscapedText::new("PDF转换文档 – ünïcødé 😀").unwrap();
        assert_eq!(text.as_escaped(), "PDF转换文档 – ünïcødé 😀");
    }

    #[test]
    fn test_rejects_control_characters() {
        let err = EscapedText::new("bell\u{7}").unwrap_err();
        assert!(matches!(err, Error::EncodingFailure(_)));

        assert!(EscapedText::new("nul\u{0}").is_err());
        assert!(EscapedText::new("\u{FFFF}").is_err());
    }

    #[test]
    fn test_allows_tab() {
        assert!(EscapedText::new("a\tb").is_ok());
    }

    #[test]
    fn test_space_preserve() {
        assert!(EscapedText::new(" lead").unwrap().needs_space_preserve());
        assert!(EscapedText::new("trail ").unwrap().needs_space_preserve());
        assert!(EscapedText::new("a  b").unwrap().needs_space_preserve());
        assert!(!EscapedText::new("a b").unwrap().needs_space_preserve());
        assert!(!EscapedText::new("").unwrap().needs_space_preserve());
    }
}
