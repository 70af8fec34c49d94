//! Listing with previews, including files whose preview fails.

use pdfstitch::controller::Controller;
use pdfstitch::output::RecordingNotifier;
use pdfstitch::registry::FileRegistry;
use pdfstitch::render::{EMPTY_LIST_MESSAGE, ListRenderer, NO_PREVIEW_LABEL, PreviewState};

use crate::common::{arg, scratch, write_pdf, write_raw};

#[tokio::test]
async fn test_list_shows_page_counts_and_thumbnails() {
    let dir = scratch();
    let one = write_pdf(dir.path(), "one.pdf", 1, 612);
    let three = write_pdf(dir.path(), "three.pdf", 3, 396);

    let notifier = RecordingNotifier::new();
    let mut controller = Controller::new(&notifier);
    controller.add(&[arg(&one), arg(&three)]).await.unwrap();

    let view = controller.list().await;
    assert!(view.merge_enabled);
    assert_eq!(view.rows.len(), 2);

    assert_eq!(view.rows[0].page_count_label(), "1 Page");
    assert_eq!(view.rows[1].page_count_label(), "3 Pages");

    let PreviewState::Ready(preview) = &view.rows[1].preview else {
        panic!("expected a preview");
    };
    assert_eq!(preview.thumbnail.height, 160);
    assert_eq!(preview.thumbnail.width, 80);
}

#[tokio::test]
async fn test_broken_preview_does_not_hide_the_row() {
    let dir = scratch();
    let good = write_pdf(dir.path(), "good.pdf", 2, 612);
    let broken = write_raw(dir.path(), "broken.pdf", b"garbage");

    let notifier = RecordingNotifier::new();
    let mut controller = Controller::new(&notifier);
    controller.add(&[arg(&broken), arg(&good)]).await.unwrap();

    let view = controller.list().await;
    assert_eq!(view.rows.len(), 2);
    assert_eq!(view.rows[0].name, "broken.pdf");
    assert!(matches!(view.rows[0].preview, PreviewState::Unavailable { .. }));
    assert_eq!(view.rows[0].page_count_label(), "Error");
    assert_eq!(view.rows[1].page_count_label(), "2 Pages");

    let html = view.to_html();
    assert!(html.contains(NO_PREVIEW_LABEL));
    assert!(html.contains(r#"<span class="page-count">Error</span>"#));
    assert!(html.contains(r#"<span class="page-count">2 Pages</span>"#));
}

#[tokio::test]
async fn test_file_names_are_escaped() {
    let dir = scratch();
    let tricky = write_pdf(dir.path(), "a<b>&'c\".pdf", 1, 612);

    let notifier = RecordingNotifier::new();
    let mut controller = Controller::new(&notifier);
    controller.add(&[arg(&tricky)]).await.unwrap();

    let html = controller.list().await.to_html();
    assert!(html.contains("a&lt;b&gt;&amp;&#039;c&quot;.pdf"));
    assert!(html.contains(r#"aria-label="Remove a&lt;b&gt;&amp;&#039;c&quot;.pdf""#));
    assert!(!html.contains("a<b>"));
}

#[tokio::test]
async fn test_empty_list_and_disabled_merge() {
    let view = ListRenderer::new().render(&FileRegistry::new()).await;

    assert!(view.rows.is_empty());
    assert!(!view.merge_enabled);
    assert_eq!(view.empty_message.as_deref(), Some(EMPTY_LIST_MESSAGE));

    let html = view.to_html();
    assert!(html.contains(EMPTY_LIST_MESSAGE));
    assert!(html.contains(r#"<button class="merge-btn" disabled>"#));
}

#[tokio::test]
async fn test_drop_row_reorders_registry() {
    let dir = scratch();
    let a = write_pdf(dir.path(), "A.pdf", 1, 100);
    let b = write_pdf(dir.path(), "B.pdf", 1, 200);
    let c = write_pdf(dir.path(), "C.pdf", 1, 300);

    let mut registry = FileRegistry::new();
    registry.add(
        pdfstitch::io::load_candidates(&[arg(&a), arg(&b), arg(&c)])
            .await
            .unwrap(),
    );

    ListRenderer::<pdfstitch::render::LopdfPreviewer>::drop_row(&mut registry, 0, 2).unwrap();

    let view = ListRenderer::new().render_without_previews(&registry);
    let names: Vec<_> = view.rows.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, ["B.pdf", "C.pdf", "A.pdf"]);
    assert!(
        ListRenderer::<pdfstitch::render::LopdfPreviewer>::drop_row(&mut registry, 3, 0).is_err()
    );
}
