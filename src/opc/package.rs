//! OPC Package implementation
//!
//! Handles reading and writing DOCX files as ZIP packages

use crate::error::{Error, Result};
use crate::opc::relationships::rel_types;
use crate::opc::{well_known, ContentTypes, Part, PartUri, Relationships, MAIN_DOCUMENT};
use log::{debug, info};
use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{BufReader, Cursor, Read, Seek, Write};
use std::path::Path;
use tempfile::NamedTempFile;
use zip::read::ZipArchive;
use zip::write::{SimpleFileOptions, ZipWriter};
use zip::{CompressionMethod, DateTime};

/// An OPC package (ZIP-based container for DOCX)
#[derive(Debug)]
pub struct Package {
    /// All parts in the package, ordered by URI
    parts: BTreeMap<PartUri, Part>,
    /// Package-level relationships (/_rels/.rels)
    relationships: Relationships,
    /// Content types ([Content_Types].xml)
    content_types: ContentTypes,
}

impl Package {
    /// Create a new empty package with the standard content-type defaults
    pub fn new() -> Self {
        Self {
            parts: BTreeMap::new(),
            relationships: Relationships::new(),
            content_types: ContentTypes::new(),
        }
    }

    /// Open a package from a file path
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        let reader = BufReader::new(file);
        Self::from_reader(reader)
    }

    /// Open a package from bytes
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let cursor = Cursor::new(bytes);
        Self::from_reader(cursor)
    }

    /// Open a package from a reader
    pub fn from_reader<R: Read + Seek>(reader: R) -> Result<Self> {
        let mut archive = ZipArchive::new(reader)?;
        let mut package = Self {
            parts: BTreeMap::new(),
            content_types: Self::read_content_types(&mut archive)?,
            relationships: Self::read_package_rels(&mut archive)?,
        };

        package.read_parts(&mut archive)?;

        Ok(package)
    }

    /// Save the package to a file.
    ///
    /// The archive is written to a temporary file next to `path` and renamed
    /// into place once it is complete, so a failed save never leaves a
    /// truncated file behind. Missing parent directories are created.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let bytes = self
            .to_bytes()
            .map_err(|e| Error::EncodingFailure(e.to_string()))?;

        publish(path, &bytes)?;
        info!("wrote {} ({} bytes)", path.display(), bytes.len());
        Ok(())
    }

    /// Save the package to bytes
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        self.write_to(Cursor::new(&mut buf))?;
        Ok(buf)
    }

    /// Write the package to a writer.
    ///
    /// Entries are written in a fixed order with a fixed timestamp, so the
    /// same package always produces the same bytes.
    pub fn write_to<W: Write + Seek>(&self, writer: W) -> Result<()> {
        let mut zip = ZipWriter::new(writer);
        let options = SimpleFileOptions::default()
            .compression_method(CompressionMethod::Deflated)
            .last_modified_time(DateTime::default());

        let content_types = well_known::content_types();
        debug!("writing {}", content_types);
        zip.start_file(content_types.zip_name(), options)?;
        self.content_types.write_to(&mut zip)?;

        if !self.relationships.is_empty() {
            let rels = well_known::package_rels();
            debug!("writing {} ({} relationships)", rels, self.relationships.len());
            zip.start_file(rels.zip_name(), options)?;
            self.relationships.write_to(&mut zip)?;
        }

        for (uri, part) in &self.parts {
            debug!("writing {} ({} bytes)", uri, part.data().len());
            zip.start_file(uri.zip_name(), options)?;
            zip.write_all(part.data())?;
        }

        zip.finish()?;
        Ok(())
    }

    /// Get a part by URI
    pub fn part(&self, uri: &PartUri) -> Option<&Part> {
        self.parts.get(uri)
    }

    /// Add a part to the package, declaring its content type as an override
    pub fn add_part(&mut self, part: Part) {
        let uri = part.uri().clone();
        self.content_types.add_override(&uri, part.content_type());
        self.parts.insert(uri, part);
    }

    /// Get all parts
    pub fn parts(&self) -> impl Iterator<Item = (&PartUri, &Part)> {
        self.parts.iter()
    }

    /// ZIP entry names in the order they are written
    pub fn entry_names(&self) -> Vec<String> {
        let mut names = vec![well_known::content_types().zip_name().to_string()];
        if !self.relationships.is_empty() {
            names.push(well_known::package_rels().zip_name().to_string());
        }
        names.extend(self.parts.keys().map(|uri| uri.zip_name().to_string()));
        names
    }

    /// Get package-level relationships
    pub fn relationships(&self) -> &Relationships {
        &self.relationships
    }

    /// Get content types
    pub fn content_types(&self) -> &ContentTypes {
        &self.content_types
    }

    /// Get the main document part through the officeDocument relationship
    pub fn main_document_part(&self) -> Option<&Part> {
        let rel = self.relationships.by_type(rel_types::OFFICE_DOCUMENT)?;
        let uri = PartUri::new(&rel.target).ok()?;
        self.parts.get(&uri)
    }

    /// Add a package-level relationship
    pub fn add_relationship(&mut self, rel_type: &str, target: &str) -> String {
        self.relationships.add(rel_type, target)
    }

    /// Check that this is a minimal word-processing package: exactly the
    /// manifest, the package relationships and `word/document.xml`, with the
    /// manifest override and the relationship target both naming the body
    /// part.
    pub fn verify_minimal(&self) -> Result<()> {
        let document = well_known::document();
        let mut names = self.entry_names();
        names.sort();
        let mut expected = vec![
            well_known::content_types().zip_name().to_string(),
            well_known::package_rels().zip_name().to_string(),
            document.zip_name().to_string(),
        ];
        expected.sort();
        if names != expected {
            return Err(Error::InvalidPackage(format!(
                "expected entries {:?}, found {:?}",
                expected, names
            )));
        }

        if self.relationships.len() != 1 {
            return Err(Error::InvalidPackage(format!(
                "expected exactly one package relationship, found {}",
                self.relationships.len()
            )));
        }

        let rel = self
            .relationships
            .by_type(rel_types::OFFICE_DOCUMENT)
            .ok_or_else(|| Error::MissingPart("officeDocument relationship".into()))?;
        let target = PartUri::new(&rel.target)?;
        if target != document {
            return Err(Error::InvalidPackage(format!(
                "relationship targets '{}' but the body is stored at '{}'",
                rel.target,
                document.zip_name()
            )));
        }

        match self.content_types.override_for(&document) {
            Some(MAIN_DOCUMENT) => Ok(()),
            Some(other) => Err(Error::InvalidPackage(format!(
                "'{}' declared as '{}'",
                document, other
            ))),
            None => Err(Error::InvalidPackage(format!(
                "no content-type override for '{}'",
                document
            ))),
        }
    }

    // === Private methods ===

    fn read_content_types<R: Read + Seek>(archive: &mut ZipArchive<R>) -> Result<ContentTypes> {
        let name = well_known::content_types();
        let mut file = archive
            .by_name(name.zip_name())
            .map_err(|_| Error::MissingPart(name.zip_name().into()))?;

        let mut content = String::new();
        file.read_to_string(&mut content)?;

        ContentTypes::from_xml(&content)
    }

    fn read_package_rels<R: Read + Seek>(archive: &mut ZipArchive<R>) -> Result<Relationships> {
        match archive.by_name(well_known::package_rels().zip_name()) {
            Ok(mut file) => {
                let mut content = String::new();
                file.read_to_string(&mut content)?;
                Relationships::from_xml(&content)
            }
            Err(_) => Ok(Relationships::new()),
        }
    }

    fn read_parts<R: Read + Seek>(&mut self, archive: &mut ZipArchive<R>) -> Result<()> {
        let content_types = well_known::content_types();
        let package_rels = well_known::package_rels();

        for i in 0..archive.len() {
            let mut file = archive.by_index(i)?;
            let name = file.name().to_string();

            if name.ends_with('/')
                || name == content_types.zip_name()
                || name == package_rels.zip_name()
            {
                continue;
            }

            let uri = PartUri::new(&name)?;

            let content_type = self
                .content_types
                .get(&uri)
                .unwrap_or("application/octet-stream")
                .to_string();

            // Reading to the end also checks the entry's CRC
            let mut data = Vec::new();
            file.read_to_end(&mut data)?;

            self.parts.insert(uri.clone(), Part::new(uri, content_type, data));
        }

        Ok(())
    }
}

impl Default for Package {
    fn default() -> Self {
        Self::new()
    }
}

/// Write `bytes` to `path` through a temporary file in the same directory
fn publish(path: &Path, bytes: &[u8]) -> Result<()> {
    let unwritable = |source: std::io::Error| Error::PathUnwritable {
        path: path.to_path_buf(),
        source,
    };

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir).map_err(unwritable)?;

    let mut tmp = temp_file_in(dir).map_err(unwritable)?;
    tmp.write_all(bytes).map_err(unwritable)?;
    tmp.flush().map_err(unwritable)?;

    // An overwritten file keeps its mode
    if let Ok(existing) = fs::metadata(path) {
        if existing.is_file() {
            tmp.as_file()
                .set_permissions(existing.permissions())
                .map_err(unwritable)?;
        }
    }

    tmp.as_file().sync_all().map_err(unwritable)?;
    tmp.persist(path).map_err(|e| unwritable(e.error))?;

    Ok(())
}

/// Temporary file created with the mode a plain `File::create` would get
fn temp_file_in(dir: &Path) -> std::io::Result<NamedTempFile> {
    let mut builder = tempfile::Builder::new();
    builder.prefix(".minidocx");

    // 0o666 is narrowed by the process umask when the file is opened
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        builder.permissions(fs::Permissions::from_mode(0o666));
    }

    builder.tempfile_in(dir)
}
