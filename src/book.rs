/*!
 * EPUB book container handling.
 *
 * A book is opened fully into memory: every archive entry is read in its
 * original order, and the OPF manifest is parsed to identify which entries
 * are prose document sections. The pipeline mutates section contents in
 * place and the whole container is re-serialized on write, leaving
 * untouched entries byte-for-byte identical.
 */

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use quick_xml::Reader;
use quick_xml::events::Event;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

use crate::errors::BookError;

/// Manifest media type that marks an entry as a prose document section
pub const DOCUMENT_MEDIA_TYPE: &str = "application/xhtml+xml";

/// One file stored in the book container
#[derive(Debug, Clone)]
pub struct ArchiveEntry {
    /// Path of the entry inside the archive
    pub path: String,
    /// Raw byte content of the entry
    pub content: Vec<u8>,
}

/// An EPUB book held fully in memory
#[derive(Debug)]
pub struct Book {
    /// Every archive entry, in original archive order
    entries: Vec<ArchiveEntry>,
    /// Indices into `entries` for document sections, in manifest order
    documents: Vec<usize>,
}

impl Book {
    /// Open an EPUB file and parse its manifest
    pub fn open(path: &Path) -> Result<Self, BookError> {
        let file = File::open(path)?;
        let mut archive = ZipArchive::new(BufReader::new(file))?;

        let mut entries = Vec::with_capacity(archive.len());
        for i in 0..archive.len() {
            let mut entry = archive.by_index(i)?;
            if entry.is_dir() {
                continue;
            }
            let mut content = Vec::with_capacity(entry.size() as usize);
            entry.read_to_end(&mut content)?;
            entries.push(ArchiveEntry {
                path: entry.name().to_string(),
                content,
            });
        }

        let opf_path = find_opf_path(&entries)?;
        let opf_dir = Path::new(&opf_path)
            .parent()
            .map(|p| p.to_string_lossy().to_string())
            .unwrap_or_default();
        let opf_content = read_entry_text(&entries, &opf_path)?;

        let mut documents = Vec::new();
        for item in parse_manifest(&opf_content)? {
            if item.media_type != DOCUMENT_MEDIA_TYPE {
                continue;
            }
            let full_path = resolve_path(&opf_dir, &item.href);
            let index = find_entry(&entries, &full_path).ok_or_else(|| {
                BookError::Container(format!("Manifest item not found in archive: {}", full_path))
            })?;
            documents.push(index);
        }

        Ok(Self { entries, documents })
    }

    /// Number of document sections in the book
    pub fn document_count(&self) -> usize {
        self.documents.len()
    }

    /// Get a document section by zero-based manifest-order index
    pub fn document(&self, index: usize) -> Option<&ArchiveEntry> {
        self.documents.get(index).map(|&i| &self.entries[i])
    }

    /// Get a mutable document section by zero-based manifest-order index
    pub fn document_mut(&mut self, index: usize) -> Option<&mut ArchiveEntry> {
        self.documents.get(index).map(|&i| &mut self.entries[i])
    }

    /// All archive entries in original order
    pub fn entries(&self) -> &[ArchiveEntry] {
        &self.entries
    }

    /// Write the book out as an EPUB archive.
    ///
    /// The `mimetype` entry is written first and uncompressed, as the
    /// format requires; everything else is deflated in original order.
    pub fn write_to_file(&self, path: &Path) -> Result<(), BookError> {
        let file = File::create(path)?;
        let mut zip = ZipWriter::new(BufWriter::new(file));

        let stored = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);
        let deflated =
            SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

        if let Some(mimetype) = self.entries.iter().find(|e| e.path == "mimetype") {
            zip.start_file("mimetype", stored)?;
            zip.write_all(&mimetype.content)?;
        }

        for entry in &self.entries {
            if entry.path == "mimetype" {
                continue;
            }
            zip.start_file(&entry.path, deflated)?;
            zip.write_all(&entry.content)?;
        }

        zip.finish()?;
        Ok(())
    }
}

/// Locate the OPF file path from META-INF/container.xml
fn find_opf_path(entries: &[ArchiveEntry]) -> Result<String, BookError> {
    let container = read_entry_text(entries, "META-INF/container.xml")?;

    let mut reader = Reader::from_str(&container);
    reader.config_mut().trim_text(true);

    loop {
        match reader.read_event() {
            Ok(Event::Empty(e)) | Ok(Event::Start(e))
                if local_name(e.name().as_ref()) == b"rootfile" =>
            {
                for attr in e.attributes().flatten() {
                    if attr.key.as_ref() == b"full-path" {
                        return String::from_utf8(attr.value.to_vec()).map_err(|_| {
                            BookError::Container("Invalid UTF-8 in rootfile path".into())
                        });
                    }
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(e.into()),
            _ => {}
        }
    }

    Err(BookError::Container(
        "No rootfile found in container.xml".into(),
    ))
}

/// One `<item>` from the OPF manifest
struct ManifestItem {
    href: String,
    media_type: String,
}

/// Parse the OPF manifest items in document order
fn parse_manifest(content: &str) -> Result<Vec<ManifestItem>, BookError> {
    let mut reader = Reader::from_str(content);
    reader.config_mut().trim_text(true);

    let mut items = Vec::new();

    loop {
        match reader.read_event() {
            Ok(Event::Empty(e)) | Ok(Event::Start(e))
                if local_name(e.name().as_ref()) == b"item" =>
            {
                let mut href = String::new();
                let mut media_type = String::new();

                for attr in e.attributes().flatten() {
                    match attr.key.as_ref() {
                        b"href" => {
                            href = String::from_utf8_lossy(attr.value.as_ref()).to_string();
                        }
                        b"media-type" => {
                            media_type = String::from_utf8_lossy(attr.value.as_ref()).to_string();
                        }
                        _ => {}
                    }
                }

                if !href.is_empty() {
                    items.push(ManifestItem { href, media_type });
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(e.into()),
            _ => {}
        }
    }

    Ok(items)
}

/// Find an entry index by path, falling back to a percent-decoded lookup
/// for manifests that escape their hrefs
fn find_entry(entries: &[ArchiveEntry], path: &str) -> Option<usize> {
    if let Some(index) = entries.iter().position(|e| e.path == path) {
        return Some(index);
    }

    let decoded = percent_encoding::percent_decode_str(path)
        .decode_utf8()
        .ok()?;
    entries.iter().position(|e| e.path == decoded)
}

/// Read an entry as text, stripping a UTF-8 BOM if present
fn read_entry_text(entries: &[ArchiveEntry], path: &str) -> Result<String, BookError> {
    let entry = entries
        .iter()
        .find(|e| e.path == path)
        .ok_or_else(|| BookError::Container(format!("Missing archive entry: {}", path)))?;

    let bytes = strip_bom(&entry.content);
    String::from_utf8(bytes.to_vec())
        .map_err(|_| BookError::Container(format!("Invalid UTF-8 in entry: {}", path)))
}

/// Strip UTF-8 BOM (byte order mark) if present
fn strip_bom(data: &[u8]) -> &[u8] {
    if data.starts_with(&[0xEF, 0xBB, 0xBF]) {
        &data[3..]
    } else {
        data
    }
}

fn resolve_path(base: &str, href: &str) -> String {
    if base.is_empty() {
        href.to_string()
    } else {
        format!("{}/{}", base, href)
    }
}

/// Extract local name from potentially namespaced XML name
fn local_name(name: &[u8]) -> &[u8] {
    name.iter()
        .rposition(|&b| b == b':')
        .map(|i| &name[i + 1..])
        .unwrap_or(name)
}
