//! Fixtures for the integration tests.
//!
//! PDFs are generated on the fly; each page gets a distinctive MediaBox
//! width so merged output can be checked for page order.

#![allow(dead_code)]

use lopdf::{
    Document, EncryptionState, EncryptionVersion, Object, Permissions, Stream, dictionary,
};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Height of every generated page, in points.
pub const PAGE_HEIGHT: i64 = 792;

/// Build a PDF with `pages` pages that are `width` points wide.
pub fn pdf_bytes(pages: usize, width: i64) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let kids: Vec<Object> = (0..pages)
        .map(|_| {
            doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "MediaBox" => vec![0.into(), 0.into(), width.into(), PAGE_HEIGHT.into()],
            })
            .into()
        })
        .collect();

    doc.objects.insert(
        pages_id,
        dictionary! { "Type" => "Pages", "Kids" => kids, "Count" => pages as i64 }.into(),
    );
    let catalog_id = doc.add_object(dictionary! { "Type" => "Catalog", "Pages" => pages_id });
    doc.trailer.set("Root", catalog_id);

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes).expect("Failed to serialize fixture");
    bytes
}

/// Build a one-page PDF that shows `text` and carries an owner password.
///
/// The user password is empty, so any reader can open it.
pub fn restricted_pdf_bytes(text: &str, width: i64) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    doc.trailer.set(
        "ID",
        vec![
            Object::string_literal(b"pdfstitch-fixture".to_vec()),
            Object::string_literal(b"pdfstitch-fixture".to_vec()),
        ],
    );

    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });
    let content = format!("BT\n/F1 12 Tf\n72 700 Td\n({text}) Tj\nET\n");
    let content_id = doc.add_object(Stream::new(dictionary! {}, content.into_bytes()));
    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "MediaBox" => vec![0.into(), 0.into(), width.into(), PAGE_HEIGHT.into()],
        "Resources" => dictionary! { "Font" => dictionary! { "F1" => font_id } },
        "Contents" => content_id,
    });
    doc.objects.insert(
        pages_id,
        dictionary! { "Type" => "Pages", "Kids" => vec![page_id.into()], "Count" => 1 }.into(),
    );
    let catalog_id = doc.add_object(dictionary! { "Type" => "Catalog", "Pages" => pages_id });
    doc.trailer.set("Root", catalog_id);

    let state = EncryptionState::try_from(EncryptionVersion::V2 {
        document: &doc,
        owner_password: "owner",
        user_password: "",
        key_length: 128,
        permissions: Permissions::PRINTABLE,
    })
    .expect("Failed to prepare encryption");
    doc.encrypt(&state).expect("Failed to encrypt fixture");

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes).expect("Failed to serialize fixture");
    bytes
}

/// Text of page `page` (1-based) of the PDF at `path`.
pub fn page_text(path: &Path, page: u32) -> String {
    let doc = Document::load(path).expect("Failed to load merged output");
    doc.extract_text(&[page]).expect("Failed to extract text")
}

/// Write a generated PDF to `dir/name` and return its path.
pub fn write_pdf(dir: &Path, name: &str, pages: usize, width: i64) -> PathBuf {
    write_raw(dir, name, &pdf_bytes(pages, width))
}

/// Write arbitrary bytes to `dir/name` and return its path.
pub fn write_raw(dir: &Path, name: &str, bytes: &[u8]) -> PathBuf {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).expect("Failed to create fixture directory");
    }
    std::fs::write(&path, bytes).expect("Failed to write fixture");
    path
}

/// Path as the string form the loader accepts.
pub fn arg(path: &Path) -> String {
    path.display().to_string()
}

/// MediaBox widths of every page of the PDF at `path`, in page order.
pub fn page_widths(path: &Path) -> Vec<i64> {
    let doc = Document::load(path).expect("Failed to load merged output");
    doc.get_pages()
        .values()
        .map(|&id| {
            let page = doc.get_dictionary(id).expect("Page is not a dictionary");
            let media_box = page
                .get(b"MediaBox")
                .and_then(Object::as_array)
                .expect("Page has no MediaBox");
            media_box[2].as_float().expect("MediaBox width is not a number") as i64
        })
        .collect()
}

/// Fresh scratch directory.
pub fn scratch() -> TempDir {
    TempDir::new().expect("Failed to create temp dir")
}
