//! End-to-end merges: selection, order, all-or-nothing failure and output
//! handling.

use pdfstitch::config::{Config, OverwriteMode};
use pdfstitch::controller::{Controller, NOT_ENOUGH_FILES_MESSAGE, Outcome};
use pdfstitch::error::{MergeError, StitchError};
use pdfstitch::merge::Merger;
use pdfstitch::output::{Notification, NotificationLevel, RecordingNotifier};
use pdfstitch::registry::SelectedFile;

use crate::common::{
    arg, page_text, page_widths, pdf_bytes, restricted_pdf_bytes, scratch, write_pdf, write_raw,
};

#[tokio::test]
async fn test_merge_follows_registry_order() {
    let dir = scratch();
    let a = write_pdf(dir.path(), "A.pdf", 1, 100);
    let b = write_pdf(dir.path(), "B.pdf", 2, 200);
    let output = dir.path().join("merged.pdf");

    let notifier = RecordingNotifier::new();
    let mut controller = Controller::new(&notifier).with_output(&output);
    controller.add(&[arg(&a), arg(&b)]).await.unwrap();
    controller.execute_line("mv 2 1").await.unwrap();

    let outcome = controller.execute_line("merge").await.unwrap();
    let Outcome::Merged(report) = outcome else {
        panic!("expected a merge report");
    };

    assert_eq!(report.merge.files_merged, 2);
    assert_eq!(report.merge.total_pages, 3);
    assert_eq!(page_widths(&output), [200, 200, 100]);
    assert!(controller.session().registry().is_empty());
    assert_eq!(
        notifier.last(),
        Some(Notification::success(format!(
            "PDFs merged successfully and saved to {}",
            output.display()
        )))
    );
}

#[tokio::test]
async fn test_merge_to_explicit_path() {
    let dir = scratch();
    let a = write_pdf(dir.path(), "A.pdf", 1, 100);
    let b = write_pdf(dir.path(), "B.pdf", 1, 200);
    let output = dir.path().join("out/book.pdf");
    std::fs::create_dir_all(output.parent().unwrap()).unwrap();

    let notifier = RecordingNotifier::new();
    let mut controller = Controller::new(&notifier);
    controller.add(&[arg(&a), arg(&b)]).await.unwrap();
    controller
        .execute_line(&format!("merge {}", output.display()))
        .await
        .unwrap();

    assert_eq!(page_widths(&output), [100, 200]);
}

#[tokio::test]
async fn test_merge_with_restricted_input_keeps_its_text() {
    let dir = scratch();
    let a = write_pdf(dir.path(), "A.pdf", 1, 100);
    let locked = write_raw(
        dir.path(),
        "locked.pdf",
        &restricted_pdf_bytes("Hello Restricted", 300),
    );
    let output = dir.path().join("merged.pdf");

    let notifier = RecordingNotifier::new();
    let mut controller = Controller::new(&notifier).with_output(&output);
    controller.add(&[arg(&a), arg(&locked)]).await.unwrap();

    let outcome = controller.execute_line("merge").await.unwrap();
    assert!(matches!(outcome, Outcome::Merged(_)));

    assert_eq!(page_widths(&output), [100, 300]);
    assert!(!lopdf::Document::load(&output).unwrap().is_encrypted());
    assert!(page_text(&output, 2).contains("Hello Restricted"));
}

#[tokio::test]
async fn test_broken_file_keeps_selection() {
    let dir = scratch();
    let a = write_pdf(dir.path(), "A.pdf", 1, 100);
    let broken = write_raw(dir.path(), "broken.pdf", b"%PDF-1.4 this is not really a pdf");
    let output = dir.path().join("merged.pdf");

    let notifier = RecordingNotifier::new();
    let mut controller = Controller::new(&notifier).with_output(&output);
    controller.add(&[arg(&a), arg(&broken)]).await.unwrap();

    let err = controller.execute_line("merge").await.unwrap_err();
    assert!(matches!(err, StitchError::Merge(_)));
    assert!(!output.exists());
    assert_eq!(controller.session().registry().len(), 2);
    assert!(!controller.session().is_merging());

    let last = notifier.last().unwrap();
    assert_eq!(last.level, NotificationLevel::Error);
    assert!(last.message.starts_with("Error merging PDFs:"));
}

#[tokio::test]
async fn test_single_file_cannot_merge() {
    let dir = scratch();
    let a = write_pdf(dir.path(), "A.pdf", 1, 100);

    let notifier = RecordingNotifier::new();
    let mut controller = Controller::new(&notifier).with_output(dir.path().join("merged.pdf"));
    controller.add(&[arg(&a)]).await.unwrap();

    let err = controller.execute_line("merge").await.unwrap_err();
    assert!(matches!(
        err,
        StitchError::Merge(MergeError::NotEnoughFiles { count: 1 })
    ));
    assert_eq!(notifier.last(), Some(Notification::error(NOT_ENOUGH_FILES_MESSAGE)));
    assert_eq!(controller.session().registry().len(), 1);
}

#[tokio::test]
async fn test_existing_output_with_no_clobber() {
    let dir = scratch();
    let a = write_pdf(dir.path(), "A.pdf", 1, 100);
    let b = write_pdf(dir.path(), "B.pdf", 1, 200);
    let output = write_raw(dir.path(), "merged.pdf", b"keep me");

    let notifier = RecordingNotifier::new();
    let mut controller = Controller::new(&notifier)
        .with_output(&output)
        .with_overwrite_mode(OverwriteMode::NoClobber);
    controller.add(&[arg(&a), arg(&b)]).await.unwrap();

    let err = controller.execute_line("merge").await.unwrap_err();
    assert!(matches!(err, StitchError::OutputExists { .. }));
    assert_eq!(std::fs::read(&output).unwrap(), b"keep me");
    assert_eq!(controller.session().registry().len(), 2);
}

#[tokio::test]
async fn test_existing_output_prompt_then_force() {
    let dir = scratch();
    let a = write_pdf(dir.path(), "A.pdf", 1, 100);
    let b = write_pdf(dir.path(), "B.pdf", 1, 200);
    let output = write_raw(dir.path(), "merged.pdf", b"old");

    let notifier = RecordingNotifier::new();
    let mut controller = Controller::new(&notifier).with_output(&output);
    controller.add(&[arg(&a), arg(&b)]).await.unwrap();

    let outcome = controller.merge(None, OverwriteMode::Prompt).await.unwrap();
    assert!(matches!(outcome, Outcome::ConfirmOverwrite(ref p) if p == &output));
    assert_eq!(controller.session().registry().len(), 2);

    let outcome = controller
        .merge(Some(output.clone()), OverwriteMode::Force)
        .await
        .unwrap();
    assert!(matches!(outcome, Outcome::Merged(_)));
    assert_eq!(page_widths(&output), [100, 200]);
}

#[tokio::test]
async fn test_dry_run_writes_nothing_and_keeps_selection() {
    let dir = scratch();
    let a = write_pdf(dir.path(), "A.pdf", 2, 100);
    let b = write_pdf(dir.path(), "B.pdf", 1, 200);
    let output = dir.path().join("merged.pdf");

    let config = Config {
        output: output.clone(),
        dry_run: true,
        ..Config::default()
    };
    let notifier = RecordingNotifier::new();
    let mut controller = Controller::from_config(&config, &notifier);
    controller.add(&[arg(&a), arg(&b)]).await.unwrap();

    let Outcome::Merged(report) = controller.execute_line("merge").await.unwrap() else {
        panic!("expected a merge report");
    };

    assert_eq!(report.merge.total_pages, 3);
    assert!(report.write.is_none());
    assert!(!output.exists());
    assert_eq!(controller.session().registry().len(), 2);
    assert_eq!(notifier.last().unwrap().level, NotificationLevel::Info);
}

#[tokio::test]
async fn test_merger_on_in_memory_files() {
    let files = [
        SelectedFile::from_bytes("A.pdf", pdf_bytes(1, 300)),
        SelectedFile::from_bytes("B.pdf", pdf_bytes(2, 400)),
        SelectedFile::from_bytes("C.pdf", pdf_bytes(1, 500)),
    ];

    let merged = Merger::new().merge(&files).await.unwrap();
    assert_eq!(merged.statistics.files_merged, 3);
    assert_eq!(merged.statistics.total_pages, 4);

    let dir = scratch();
    let path = write_raw(dir.path(), "merged.pdf", &merged.bytes);
    assert_eq!(page_widths(&path), [300, 400, 400, 500]);
}
