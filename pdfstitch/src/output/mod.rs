//! Output formatting and display for pdfstitch.
//!
//! This module handles all user-facing output including:
//! - Formatted status messages
//! - Notifications from command handlers
//! - The terminal rendering of the file list
//! - Merge summaries
//! - Quiet and verbose modes
//!
//! # Examples
//!
//! ```no_run
//! use pdfstitch::output::OutputFormatter;
//! use pdfstitch::config::Config;
//!
//! # fn example(config: Config) {
//! let formatter = OutputFormatter::from_config(&config);
//! formatter.info("Starting merge operation");
//! formatter.success("Merge completed successfully");
//! # }
//! ```

pub mod formatter;
pub mod notify;

pub use formatter::{MessageLevel, OutputFormatter};
pub use notify::{Notification, NotificationLevel, Notifier, RecordingNotifier};

use crate::controller::MergeReport;
use crate::render::ListView;

/// Display the file list, one line per row.
pub fn display_list(formatter: &OutputFormatter, view: &ListView) {
    if view.is_empty() {
        formatter.info(view.to_lines().first().map(String::as_str).unwrap_or_default());
        return;
    }

    formatter.section(&format!("Selected files ({}):", view.rows.len()));
    for row in &view.rows {
        formatter.list_item(row.index, &row.to_line());
    }

    if !view.merge_enabled {
        formatter.info("Add at least one more PDF to enable merging.");
    }
}

/// Display statistics of a completed merge.
///
/// Only shown in verbose mode, apart from the dry-run line.
pub fn display_merge_summary(formatter: &OutputFormatter, report: &MergeReport) {
    formatter.detail("Files merged", &report.merge.files_merged.to_string());
    formatter.detail("Total pages", &report.merge.total_pages.to_string());
    formatter.detail("Input size", &report.merge.format_input_size());
    formatter.detail(
        "Merge time",
        &format!("{:.2}s", report.merge.merge_time.as_secs_f64()),
    );

    if let Some(write) = &report.write {
        formatter.detail("Output size", &write.format_file_size());
        formatter.detail(
            "Write time",
            &format!("{:.2}s", write.write_time.as_secs_f64()),
        );
    }
}
