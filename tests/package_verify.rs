//! Integration test: reading packages back and checking the minimal layout

use minidocx::opc::{rel_types, MAIN_DOCUMENT};
use minidocx::{Document, Error, Package};
use pretty_assertions::assert_eq;
use std::io::{Cursor, Write};
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

const CONTENT_TYPES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">
  <Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>
  <Default Extension="xml" ContentType="application/xml"/>
  <Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/>
</Types>"#;

const RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
  <Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="word/document.xml"/>
</Relationships>"#;

const DOCUMENT: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
  <w:body>
    <w:p><w:pPr><w:pStyle w:val="Heading1"/></w:pPr><w:r><w:t>Title</w:t></w:r></w:p>
    <w:p><w:r><w:t>Body</w:t></w:r></w:p>
  </w:body>
</w:document>"#;

fn zip_of(entries: &[(&str, &str)]) -> Vec<u8> {
    let mut buf = Vec::new();
    {
        let mut zip = ZipWriter::new(Cursor::new(&mut buf));
        for (name, content) in entries {
            zip.start_file(*name, SimpleFileOptions::default()).unwrap();
            zip.write_all(content.as_bytes()).unwrap();
        }
        zip.finish().unwrap();
    }
    buf
}

fn invalid_package(bytes: &[u8]) -> String {
    match Package::from_bytes(bytes).unwrap().verify_minimal() {
        Err(Error::InvalidPackage(msg)) => msg,
        other => panic!("expected InvalidPackage, got {:?}", other),
    }
}

#[test]
fn test_hand_built_minimal_package() {
    let bytes = zip_of(&[
        ("[Content_Types].xml", CONTENT_TYPES),
        ("_rels/.rels", RELS),
        ("word/document.xml", DOCUMENT),
    ]);

    let package = Package::from_bytes(&bytes).unwrap();
    package.verify_minimal().unwrap();
    assert_eq!(
        package.main_document_part().unwrap().content_type(),
        MAIN_DOCUMENT
    );

    let doc = Document::from_package(&package).unwrap();
    assert_eq!(doc.title().as_deref(), Some("Title"));
    assert_eq!(doc.text(), "Body");
}

#[test]
fn test_generated_bytes_verify() {
    let bytes = Document::new("Generated", "one\ntwo").unwrap().to_bytes().unwrap();

    let package = Package::from_bytes(&bytes).unwrap();
    package.verify_minimal().unwrap();
    assert_eq!(
        package.entry_names(),
        vec!["[Content_Types].xml", "_rels/.rels", "word/document.xml"]
    );
    assert_eq!(package.relationships().len(), 1);
    assert_eq!(
        package
            .relationships()
            .by_type(rel_types::OFFICE_DOCUMENT)
            .unwrap()
            .id,
        "rId1"
    );
}

#[test]
fn test_mismatched_relationship_target() {
    let rels = RELS.replace("word/document.xml", "word/main.xml");
    let bytes = zip_of(&[
        ("[Content_Types].xml", CONTENT_TYPES),
        ("_rels/.rels", rels.as_str()),
        ("word/document.xml", DOCUMENT),
    ]);

    let msg = invalid_package(&bytes);
    assert!(msg.contains("word/main.xml"), "{}", msg);

    // The body can no longer be found through the relationship
    let package = Package::from_bytes(&bytes).unwrap();
    assert!(package.main_document_part().is_none());
    assert!(matches!(
        Document::from_package(&package),
        Err(Error::MissingPart(_))
    ));
}

#[test]
fn test_missing_override() {
    let content_types = CONTENT_TYPES.replace(
        r#"<Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/>"#,
        "",
    );
    let bytes = zip_of(&[
        ("[Content_Types].xml", content_types.as_str()),
        ("_rels/.rels", RELS),
        ("word/document.xml", DOCUMENT),
    ]);

    let msg = invalid_package(&bytes);
    assert!(msg.contains("no content-type override"), "{}", msg);
}

#[test]
fn test_extra_entry() {
    let bytes = zip_of(&[
        ("[Content_Types].xml", CONTENT_TYPES),
        ("_rels/.rels", RELS),
        ("word/document.xml", DOCUMENT),
        ("word/styles.xml", "<w:styles/>"),
    ]);

    let msg = invalid_package(&bytes);
    assert!(msg.contains("word/styles.xml"), "{}", msg);
}

#[test]
fn test_missing_relationships_entry() {
    let bytes = zip_of(&[
        ("[Content_Types].xml", CONTENT_TYPES),
        ("word/document.xml", DOCUMENT),
    ]);

    let package = Package::from_bytes(&bytes).unwrap();
    assert!(package.relationships().is_empty());
    assert!(matches!(
        package.verify_minimal(),
        Err(Error::InvalidPackage(_))
    ));
}

#[test]
fn test_not_a_zip() {
    assert!(matches!(
        Package::from_bytes(b"plain text, not an archive"),
        Err(Error::Zip(_))
    ));
}
