//! Selecting, removing and reordering files through the controller.

use pdfstitch::controller::{Controller, NOTHING_ADDED_MESSAGE};
use pdfstitch::error::StitchError;
use pdfstitch::io::FileLoader;
use pdfstitch::output::{Notification, NotificationLevel, RecordingNotifier};
use pdfstitch::registry::FileRegistry;

use crate::common::{arg, scratch, write_pdf, write_raw};

fn names<N: pdfstitch::output::Notifier>(controller: &Controller<N>) -> Vec<String> {
    controller
        .session()
        .registry()
        .iter()
        .map(|f| f.name().to_owned())
        .collect()
}

#[tokio::test]
async fn test_non_pdf_and_duplicates_are_skipped() {
    let dir = scratch();
    let a = write_pdf(dir.path(), "A.pdf", 1, 100);
    let b = write_pdf(dir.path(), "B.pdf", 2, 200);
    let notes = write_raw(dir.path(), "notes.txt", b"not a pdf");

    let notifier = RecordingNotifier::new();
    let mut controller = Controller::new(&notifier);

    let outcome = controller
        .add(&[arg(&a), arg(&notes), arg(&b), arg(&a)])
        .await
        .unwrap();

    assert_eq!(outcome.added, 2);
    assert_eq!(outcome.rejected_wrong_type, 1);
    assert_eq!(outcome.rejected_duplicate, 1);
    assert_eq!(names(&controller), ["A.pdf", "B.pdf"]);
    assert!(notifier
        .notifications()
        .contains(&Notification::success("2 PDF file(s) added.")));
}

#[tokio::test]
async fn test_readding_everything_adds_nothing() {
    let dir = scratch();
    let a = write_pdf(dir.path(), "A.pdf", 1, 100);

    let notifier = RecordingNotifier::new();
    let mut controller = Controller::new(&notifier);
    controller.add(&[arg(&a)]).await.unwrap();

    let outcome = controller.add(&[arg(&a)]).await.unwrap();
    assert!(outcome.is_empty());
    assert_eq!(notifier.last(), Some(Notification::error(NOTHING_ADDED_MESSAGE)));
    assert_eq!(controller.session().registry().len(), 1);
}

#[tokio::test]
async fn test_same_name_is_duplicate_only_with_same_size() {
    let dir = scratch();
    let first = write_pdf(dir.path(), "x/report.pdf", 1, 100);
    let same = write_pdf(dir.path(), "y/report.pdf", 1, 100);
    let bigger = write_pdf(dir.path(), "z/report.pdf", 3, 100);

    let loader = FileLoader::new();
    let mut registry = FileRegistry::new();
    let outcome = registry.add(
        loader
            .load_all(&[arg(&first), arg(&same), arg(&bigger)])
            .await
            .unwrap(),
    );

    assert_eq!(outcome.added, 2);
    assert_eq!(outcome.rejected_duplicate, 1);
    assert_eq!(registry.len(), 2);
    assert_ne!(registry.entry_at(0).unwrap().size(), registry.entry_at(1).unwrap().size());
}

#[tokio::test]
async fn test_glob_selection_is_sorted() {
    let dir = scratch();
    write_pdf(dir.path(), "c.pdf", 1, 100);
    write_pdf(dir.path(), "a.pdf", 1, 100);
    write_pdf(dir.path(), "b.pdf", 1, 100);

    let notifier = RecordingNotifier::new();
    let mut controller = Controller::new(&notifier);
    let pattern = format!("{}/*.pdf", dir.path().display());
    controller.add(&[pattern]).await.unwrap();

    assert_eq!(names(&controller), ["a.pdf", "b.pdf", "c.pdf"]);
}

#[tokio::test]
async fn test_commands_use_one_based_positions() {
    let dir = scratch();
    let a = write_pdf(dir.path(), "A.pdf", 1, 100);
    let b = write_pdf(dir.path(), "B.pdf", 1, 200);
    let c = write_pdf(dir.path(), "C.pdf", 1, 300);

    let notifier = RecordingNotifier::new();
    let mut controller = Controller::new(&notifier);
    controller.add(&[arg(&a), arg(&b), arg(&c)]).await.unwrap();

    controller.execute_line("mv 3 1").await.unwrap();
    assert_eq!(names(&controller), ["C.pdf", "A.pdf", "B.pdf"]);
    assert_eq!(notifier.last(), Some(Notification::success("PDF order updated!")));

    controller.execute_line("rm 2").await.unwrap();
    assert_eq!(names(&controller), ["C.pdf", "B.pdf"]);
    assert_eq!(notifier.last(), Some(Notification::success("File removed")));

    // Out of range removal is ignored silently.
    notifier.clear();
    controller.execute_line("rm 9").await.unwrap();
    assert!(notifier.last().is_none());
    assert_eq!(controller.session().registry().len(), 2);
}

#[tokio::test]
async fn test_invalid_move_leaves_order_unchanged() {
    let dir = scratch();
    let a = write_pdf(dir.path(), "A.pdf", 1, 100);
    let b = write_pdf(dir.path(), "B.pdf", 1, 200);

    let notifier = RecordingNotifier::new();
    let mut controller = Controller::new(&notifier);
    controller.add(&[arg(&a), arg(&b)]).await.unwrap();

    let err = controller.execute_line("mv 1 5").await.unwrap_err();
    assert!(matches!(err, StitchError::Registry(_)));
    assert_eq!(notifier.last().unwrap().level, NotificationLevel::Error);
    assert_eq!(names(&controller), ["A.pdf", "B.pdf"]);
}
