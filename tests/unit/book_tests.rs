/*!
 * Tests for EPUB container reading and writing
 */

use std::fs::File;
use std::io::Read;

use zip::ZipArchive;

use lexibook::book::Book;

use crate::common;

/// Test that opening a book finds exactly the document sections, in manifest order
#[test]
fn test_open_withThreeChapters_shouldListDocumentsInManifestOrder() {
    let temp_dir = common::create_temp_dir().unwrap();
    let path =
        common::create_test_epub(temp_dir.path(), "book.epub", &["First", "Second", "Third"])
            .unwrap();

    let book = Book::open(&path).unwrap();

    assert_eq!(book.document_count(), 3);
    for (i, expected) in ["First", "Second", "Third"].iter().enumerate() {
        let entry = book.document(i).unwrap();
        assert_eq!(entry.path, format!("OEBPS/ch{}.xhtml", i + 1));
        let content = String::from_utf8(entry.content.clone()).unwrap();
        assert!(content.contains(expected), "chapter {} should contain {:?}", i + 1, expected);
    }
    assert!(book.document(3).is_none());
}

/// Test that the stylesheet entry is not counted as a document section
#[test]
fn test_open_withStylesheet_shouldExcludeNonDocumentEntries() {
    let temp_dir = common::create_temp_dir().unwrap();
    let path = common::create_test_epub(temp_dir.path(), "book.epub", &["Only chapter"]).unwrap();

    let book = Book::open(&path).unwrap();

    assert_eq!(book.document_count(), 1);
    assert!(book.entries().iter().any(|e| e.path == "OEBPS/style.css"));
}

/// Test that a write round-trip preserves every entry byte-for-byte
#[test]
fn test_write_to_file_withUntouchedBook_shouldPreserveAllEntries() {
    let temp_dir = common::create_temp_dir().unwrap();
    let input = common::create_test_epub(temp_dir.path(), "in.epub", &["Alpha", "Beta"]).unwrap();
    let output = temp_dir.path().join("out.epub");

    let book = Book::open(&input).unwrap();
    book.write_to_file(&output).unwrap();

    let reopened = Book::open(&output).unwrap();
    assert_eq!(reopened.entries().len(), book.entries().len());
    for (original, written) in book.entries().iter().zip(reopened.entries()) {
        assert_eq!(original.path, written.path);
        assert_eq!(original.content, written.content, "entry {} changed", original.path);
    }
}

/// Test that the written archive starts with an uncompressed mimetype entry
#[test]
fn test_write_to_file_withValidBook_shouldStoreMimetypeFirst() {
    let temp_dir = common::create_temp_dir().unwrap();
    let input = common::create_test_epub(temp_dir.path(), "in.epub", &["Alpha"]).unwrap();
    let output = temp_dir.path().join("out.epub");

    Book::open(&input).unwrap().write_to_file(&output).unwrap();

    let mut archive = ZipArchive::new(File::open(&output).unwrap()).unwrap();
    let mut first = archive.by_index(0).unwrap();
    assert_eq!(first.name(), "mimetype");
    assert_eq!(first.compression(), zip::CompressionMethod::Stored);

    let mut content = String::new();
    first.read_to_string(&mut content).unwrap();
    assert_eq!(content, "application/epub+zip");
}

/// Test that mutating one document leaves every other entry untouched
#[test]
fn test_document_mut_withOneMutation_shouldNotAffectOtherEntries() {
    let temp_dir = common::create_temp_dir().unwrap();
    let input = common::create_test_epub(temp_dir.path(), "in.epub", &["Alpha", "Beta"]).unwrap();
    let output = temp_dir.path().join("out.epub");

    let original = Book::open(&input).unwrap();
    let mut book = Book::open(&input).unwrap();
    book.document_mut(0).unwrap().content = b"replaced".to_vec();
    book.write_to_file(&output).unwrap();

    let written = Book::open(&output).unwrap();
    assert_eq!(written.document(0).unwrap().content, b"replaced".to_vec());
    assert_eq!(
        written.document(1).unwrap().content,
        original.document(1).unwrap().content
    );
    for (before, after) in original.entries().iter().zip(written.entries()) {
        if before.path != "OEBPS/ch1.xhtml" {
            assert_eq!(before.content, after.content, "entry {} changed", before.path);
        }
    }
}

/// Test that a namespace-prefixed container.xml still resolves the OPF path
#[test]
fn test_open_withPrefixedContainerXml_shouldFindRootfile() {
    let temp_dir = common::create_temp_dir().unwrap();
    let path = temp_dir.path().join("prefixed.epub");

    let file = File::create(&path).unwrap();
    let mut zip = zip::ZipWriter::new(file);
    let options = zip::write::SimpleFileOptions::default();

    zip.start_file("mimetype", options).unwrap();
    std::io::Write::write_all(&mut zip, b"application/epub+zip").unwrap();

    zip.start_file("META-INF/container.xml", options).unwrap();
    std::io::Write::write_all(
        &mut zip,
        br#"<?xml version="1.0"?>
<c:container version="1.0" xmlns:c="urn:oasis:names:tc:opendocument:xmlns:container">
  <c:rootfiles>
    <c:rootfile full-path="content.opf" media-type="application/oebps-package+xml"/>
  </c:rootfiles>
</c:container>"#,
    )
    .unwrap();

    zip.start_file("content.opf", options).unwrap();
    std::io::Write::write_all(
        &mut zip,
        br#"<?xml version="1.0"?>
<package xmlns="http://www.idpf.org/2007/opf">
  <manifest>
    <item id="ch1" href="ch1.xhtml" media-type="application/xhtml+xml"/>
  </manifest>
</package>"#,
    )
    .unwrap();

    zip.start_file("ch1.xhtml", options).unwrap();
    std::io::Write::write_all(&mut zip, common::chapter_markup("Prefixed").as_bytes()).unwrap();
    zip.finish().unwrap();

    let book = Book::open(&path).unwrap();
    assert_eq!(book.document_count(), 1);
    assert_eq!(book.document(0).unwrap().path, "ch1.xhtml");
}

/// Test that a missing container.xml is reported as a container error
#[test]
fn test_open_withPlainZip_shouldFailWithContainerError() {
    let temp_dir = common::create_temp_dir().unwrap();
    let path = temp_dir.path().join("notabook.epub");

    let file = File::create(&path).unwrap();
    let mut zip = zip::ZipWriter::new(file);
    zip.start_file("hello.txt", zip::write::SimpleFileOptions::default())
        .unwrap();
    std::io::Write::write_all(&mut zip, b"hi").unwrap();
    zip.finish().unwrap();

    let result = Book::open(&path);
    assert!(result.is_err());
}
