//! # minidocx
//!
//! Write minimal, valid DOCX files from plain text.
//!
//! A minimal DOCX is an OPC (ZIP) package with exactly three parts:
//! `[Content_Types].xml`, `_rels/.rels` and `word/document.xml`. The body is
//! a centered first-level heading followed by one paragraph per line of text.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! // One call: escape, split into paragraphs, package, publish atomically
//! minidocx::write("Report", "Line one\nLine two", "out/report.docx")?;
//!
//! // Read it back
//! let doc = minidocx::Document::open("out/report.docx")?;
//! assert_eq!(doc.title().as_deref(), Some("Report"));
//! assert_eq!(doc.paragraph_count(), 2);
//! # Ok::<(), minidocx::Error>(())
//! ```

pub mod document;
pub mod error;
pub mod notice;
pub mod opc;
pub mod writer;
pub mod xml;

pub use document::{Document, Paragraph, Run};
pub use error::{Error, Result, WriteError};
pub use opc::{Package, Part, PartUri};
pub use writer::{write, DocxWriter, WriteRequest};
