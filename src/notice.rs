//! Placeholder documents for sources that could not be converted
//!
//! When a real converter is unavailable the document still gets produced:
//! it records which file it stands in for, how large that file was and when
//! the placeholder was made, and lists ways to get a full conversion.

use crate::error::{Error, Result};
use crate::writer::DocxWriter;
use chrono::{DateTime, Local};
use log::info;
use std::path::{Path, PathBuf};

/// Heading used for notice documents
pub const NOTICE_TITLE: &str = "Converted Document";

/// Description of the source a notice stands in for
#[derive(Clone, Debug, PartialEq)]
pub struct NoticeDocument {
    pub source_name: String,
    pub source_size: u64,
    pub created_at: DateTime<Local>,
}

impl NoticeDocument {
    /// Describe `source`, stamped with the current local time
    pub fn for_source<P: AsRef<Path>>(source: P) -> Result<Self> {
        let source = source.as_ref();
        let metadata = match source.metadata() {
            Ok(m) if m.is_file() => m,
            _ => return Err(Error::MissingSource(source.to_path_buf())),
        };

        Ok(Self {
            source_name: source
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| source.display().to_string()),
            source_size: metadata.len(),
            created_at: Local::now(),
        })
    }

    /// Body text of the notice, one paragraph per line
    pub fn body_text(&self) -> String {
        format!(
            "Conversion notice\n\
             \n\
             Source file: {name}\n\
             File size: {size}\n\
             Converted at: {time}\n\
             \n\
             This Word document was generated as a placeholder for the file above.\n\
             \n\
             For a full conversion:\n\
             \n\
             1. Install LibreOffice and convert with: soffice --headless --convert-to docx {name}\n\
             2. Use a dedicated PDF to Word conversion library\n\
             3. Use an online conversion service\n\
             \n\
             The document structure is in place and can be edited by hand.",
            name = self.source_name,
            size = format_size_kb(self.source_size),
            time = self.created_at.format("%Y-%m-%d %H:%M:%S"),
        )
    }

    /// Write the notice as a DOCX file
    pub fn write<P: AsRef<Path>>(&self, writer: &DocxWriter, output_path: P) -> Result<()> {
        let output_path = output_path.as_ref();
        writer.write(NOTICE_TITLE, &self.body_text(), output_path)?;
        info!(
            "wrote notice for {} to {}",
            self.source_name,
            output_path.display()
        );
        Ok(())
    }
}

/// Default output for a source: same directory and stem, `.docx` extension
pub fn default_output_path<P: AsRef<Path>>(source: P) -> PathBuf {
    source.as_ref().with_extension("docx")
}

/// Size in kilobytes with two decimals, e.g. `12.50 KB`
pub fn format_size_kb(bytes: u64) -> String {
    format!("{:.2} KB", bytes as f64 / 1024.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    #[test]
    fn test_default_output_path() {
        assert_eq!(
            default_output_path("/tmp/in/report.pdf"),
            PathBuf::from("/tmp/in/report.docx")
        );
        assert_eq!(default_output_path("scan"), PathBuf::from("scan.docx"));
    }

    #[test]
    fn test_format_size_kb() {
        assert_eq!(format_size_kb(0), "0.00 KB");
        assert_eq!(format_size_kb(12_800), "12.50 KB");
    }

    #[test]
    fn test_for_source() {
        let mut file = tempfile::Builder::new().suffix(".pdf").tempfile().unwrap();
        file.write_all(&[0u8; 2048]).unwrap();
        file.flush().unwrap();

        let notice = NoticeDocument::for_source(file.path()).unwrap();
        assert_eq!(notice.source_size, 2048);
        assert!(notice.source_name.ends_with(".pdf"));
    }

    #[test]
    fn test_missing_source() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.pdf");
        assert!(matches!(
            NoticeDocument::for_source(&missing),
            Err(Error::MissingSource(p)) if p == missing
        ));

        // A directory is not a source file either
        assert!(NoticeDocument::for_source(dir.path()).is_err());
    }

    #[test]
    fn test_body_text() {
        let notice = NoticeDocument {
            source_name: "a&b.pdf".into(),
            source_size: 1536,
            created_at: Local.with_ymd_and_hms(2024, 3, 5, 14, 7, 9).unwrap(),
        };

        let body = notice.body_text();
        let lines: Vec<_> = body.lines().collect();
        assert_eq!(lines[0], "Conversion notice");
        assert_eq!(lines[1], "");
        assert_eq!(lines[2], "Source file: a&b.pdf");
        assert_eq!(lines[3], "File size: 1.50 KB");
        assert_eq!(lines[4], "Converted at: 2024-03-05 14:07:09");
    }
}
