//! XML namespaces used in the minimal package

/// WordprocessingML main namespace
pub const W: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";
/// Relationships namespace (for `r:` attributes inside document.xml)
pub const R: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
/// Content Types namespace
pub const CT: &str = "http://schemas.openxmlformats.org/package/2006/content-types";
/// Package Relationships namespace
pub const PR: &str = "http://schemas.openxmlformats.org/package/2006/relationships";

/// Namespace declarations for the `w:document` root element
pub fn document_namespaces() -> [(&'static str, &'static str); 2] {
    [("xmlns:w", W), ("xmlns:r", R)]
}
