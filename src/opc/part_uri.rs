//! Part URI handling for OPC packages

use crate::error::{Error, Result};
use std::fmt;

/// Represents a URI to a part within an OPC package.
///
/// Part URIs are always absolute paths starting with '/'.
/// Example: `/word/document.xml`. The ZIP entry name is the same path
/// without the leading '/'.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PartUri {
    path: String,
}

impl PartUri {
    /// Create a new PartUri from a string.
    ///
    /// The path will be normalized (leading '/' ensured, no trailing '/').
    pub fn new(path: &str) -> Result<Self> {
        let path = path.trim();

        if path.is_empty() {
            return Err(Error::InvalidPartUri("empty path".into()));
        }

        let normalized = if path.starts_with('/') {
            path.to_string()
        } else {
            format!("/{}", path)
        };

        let normalized = normalized.trim_end_matches('/').to_string();

        if normalized.is_empty() {
            return Err(Error::InvalidPartUri(format!(
                "invalid path '{}': names the package root",
                path
            )));
        }

        if normalized.contains("//") {
            return Err(Error::InvalidPartUri(format!(
                "invalid path '{}': contains double slashes",
                path
            )));
        }

        if normalized.split('/').any(|segment| segment == "." || segment == "..") {
            return Err(Error::InvalidPartUri(format!(
                "invalid path '{}': relative segments are not allowed",
                path
            )));
        }

        Ok(Self { path: normalized })
    }

    /// Create PartUri without validation (for internal use)
    pub(crate) fn from_static(path: &'static str) -> Self {
        Self { path: path.into() }
    }

    /// Get the path as a string slice
    pub fn as_str(&self) -> &str {
        &self.path
    }

    /// Name of the ZIP entry holding this part
    pub fn zip_name(&self) -> &str {
        &self.path[1..]
    }

    /// Get the file name portion
    pub fn file_name(&self) -> Option<&str> {
        self.path.rsplit('/').next()
    }

    /// Get the file extension
    pub fn extension(&self) -> Option<&str> {
        let name = self.file_name()?;
        let (_, ext) = name.rsplit_once('.')?;
        Some(ext).filter(|ext| !ext.is_empty())
    }
}

impl fmt::Display for PartUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path)
    }
}

/// Well-known part URIs of the minimal package
pub mod well_known {
    use super::PartUri;

    pub fn content_types() -> PartUri {
        PartUri::from_static("/[Content_Types].xml")
    }

    pub fn package_rels() -> PartUri {
        PartUri::from_static("/_rels/.rels")
    }

    pub fn document() -> PartUri {
        PartUri::from_static("/word/document.xml")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_with_leading_slash() {
        let uri = PartUri::new("/word/document.xml").unwrap();
        assert_eq!(uri.as_str(), "/word/document.xml");
    }

    #[test]
    fn test_new_without_leading_slash() {
        let uri = PartUri::new("word/document.xml").unwrap();
        assert_eq!(uri.as_str(), "/word/document.xml");
        assert_eq!(uri, well_known::document());
    }

    #[test]
    fn test_rejects_bad_paths() {
        assert!(PartUri::new("").is_err());
        assert!(PartUri::new("/").is_err());
        assert!(PartUri::new("word//document.xml").is_err());
        assert!(PartUri::new("../document.xml").is_err());
    }

    #[test]
    fn test_zip_name() {
        assert_eq!(well_known::content_types().zip_name(), "[Content_Types].xml");
        assert_eq!(well_known::package_rels().zip_name(), "_rels/.rels");
        assert_eq!(well_known::document().zip_name(), "word/document.xml");
    }

    #[test]
    fn test_file_name() {
        let uri = PartUri::new("/word/document.xml").unwrap();
        assert_eq!(uri.file_name(), Some("document.xml"));
    }

    #[test]
    fn test_extension() {
        let uri = PartUri::new("/word/document.xml").unwrap();
        assert_eq!(uri.extension(), Some("xml"));

        assert_eq!(well_known::package_rels().extension(), Some("rels"));
        assert_eq!(PartUri::new("/word/README").unwrap().extension(), None);
    }
}
