#![no_main]

use libfuzzer_sys::fuzz_target;
use pdfstitch::merge::{DocumentBackend, LopdfBackend};
use pdfstitch::render::{LopdfPreviewer, PreviewRenderer};

fuzz_target!(|data: &[u8]| {
    // Arbitrary bytes must produce errors, not panics.
    let backend = LopdfBackend::new();
    if let Ok(doc) = backend.load(data) {
        let _ = backend.page_count(&doc);
    }

    let _ = LopdfPreviewer::new().render("fuzz.pdf", data, 160.0);
});
