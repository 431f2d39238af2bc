//! Plain text to DOCX writer
//!
//! [`DocxWriter`] holds the little configuration the writer has and turns a
//! title plus body text into a three-part package on disk. It keeps no state
//! between calls, so one writer can be shared freely as long as each call
//! targets its own output path.

use crate::document::{Document, DEFAULT_HEADING_SIZE_PT};
use crate::error::Result;
use log::{debug, warn};
use std::path::{Path, PathBuf};

/// Everything needed for one write, for callers that pass a single value around
#[derive(Clone, Debug, Default, PartialEq)]
pub struct WriteRequest {
    pub title: String,
    pub body: String,
    pub destination: PathBuf,
}

impl WriteRequest {
    pub fn new(
        title: impl Into<String>,
        body: impl Into<String>,
        destination: impl Into<PathBuf>,
    ) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
            destination: destination.into(),
        }
    }
}

/// Writer configuration
#[derive(Clone, Debug, PartialEq)]
pub struct DocxWriter {
    default_title: Option<String>,
    heading_size_pt: f32,
}

impl Default for DocxWriter {
    fn default() -> Self {
        Self {
            default_title: None,
            heading_size_pt: DEFAULT_HEADING_SIZE_PT,
        }
    }
}

impl DocxWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Heading text used when the caller passes an empty title
    pub fn default_title(mut self, title: impl Into<String>) -> Self {
        self.default_title = Some(title.into());
        self
    }

    /// Heading run size in points.
    ///
    /// Sizes that are not finite and positive are ignored and the current
    /// size is kept.
    pub fn heading_size_pt(mut self, size: f32) -> Self {
        if size.is_finite() && size > 0.0 {
            self.heading_size_pt = size;
        } else {
            warn!(
                "ignoring heading size {}, keeping {}pt",
                size, self.heading_size_pt
            );
        }
        self
    }

    /// Build the in-memory document without writing it
    pub fn build(&self, title: &str, body_text: &str) -> Result<Document> {
        let title = match (title.is_empty(), &self.default_title) {
            (true, Some(default)) => {
                warn!("empty title, using default heading '{}'", default);
                default.as_str()
            }
            _ => title,
        };

        Document::with_heading_size(title, body_text, self.heading_size_pt)
    }

    /// Write `title` and `body_text` as a DOCX file at `output_path`.
    ///
    /// Parent directories are created. The file appears only once the
    /// archive is complete; on error nothing is left at `output_path`.
    pub fn write<P: AsRef<Path>>(&self, title: &str, body_text: &str, output_path: P) -> Result<()> {
        let output_path = output_path.as_ref();
        debug!(
            "writing '{}' ({} bytes of body text) to {}",
            title,
            body_text.len(),
            output_path.display()
        );

        self.build(title, body_text)?.save(output_path)
    }

    /// Write a [`WriteRequest`]
    pub fn write_request(&self, request: &WriteRequest) -> Result<()> {
        self.write(&request.title, &request.body, &request.destination)
    }
}

/// Write `title` and `body_text` to `output_path` with the default writer
pub fn write<P: AsRef<Path>>(title: &str, body_text: &str, output_path: P) -> Result<()> {
    DocxWriter::default().write(title, body_text, output_path)
}
