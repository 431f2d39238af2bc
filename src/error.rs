//! Error types for minidocx

use std::path::PathBuf;
use thiserror::Error;

/// Main error type
#[derive(Debug, Error)]
pub enum Error {
    /// The output location (or its parent directory) cannot be created or written
    #[error("cannot write to '{}': {source}", .path.display())]
    PathUnwritable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Text that XML cannot represent reached a text node
    #[error("text cannot be encoded as XML: {0}")]
    EncodingFailure(String),

    #[error("Source file not found: {}", .0.display())]
    MissingSource(PathBuf),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("ZIP error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("XML attribute error: {0}")]
    XmlAttr(#[from] quick_xml::events::attributes::AttrError),

    #[error("UTF-8 error: {0}")]
    Utf8(#[from] std::str::Utf8Error),

    #[error("Missing required part: {0}")]
    MissingPart(String),

    #[error("Invalid part URI: {0}")]
    InvalidPartUri(String),

    #[error("Missing attribute '{attr}' on element '{element}'")]
    MissingAttribute { element: String, attr: String },

    #[error("Invalid package: {0}")]
    InvalidPackage(String),
}

/// Errors returned by the writer surface. Only `PathUnwritable` and
/// `EncodingFailure` are produced when writing.
pub type WriteError = Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;
