//! HTML markup for a [`ListView`].
//!
//! Names are escaped when the row is built; this module only assembles
//! markup. Rows carry `data-index` (0-based position) so a drag-and-drop
//! adapter can call [`ListRenderer::drop_row`](super::ListRenderer::drop_row).

use std::fmt::Write;

use super::{ListView, NO_PREVIEW_LABEL, PreviewState, RowView};

/// Render `view` as an HTML fragment.
pub fn to_html(view: &ListView) -> String {
    let mut out = String::new();

    match &view.empty_message {
        Some(message) => {
            let _ = writeln!(out, r#"<p class="empty-message">{message}</p>"#);
        }
        None => {
            out.push_str("<ul class=\"file-list\">\n");
            for row in &view.rows {
                write_row(&mut out, row);
            }
            out.push_str("</ul>\n");
        }
    }

    let disabled = if view.merge_enabled { "" } else { " disabled" };
    let _ = writeln!(out, r#"<button class="merge-btn"{disabled}>Merge PDFs</button>"#);
    out
}

fn write_row(out: &mut String, row: &RowView) {
    let _ = writeln!(
        out,
        r#"  <li class="file-item" data-index="{}" draggable="true">"#,
        row.position
    );
    let _ = writeln!(out, r#"    <span class="file-index">{}.</span>"#, row.index);

    match &row.preview {
        PreviewState::Ready(preview) => {
            let thumbnail = &preview.thumbnail;
            match preview.data_url() {
                Some(src) => {
                    let _ = writeln!(
                        out,
                        r#"    <img class="pdf-preview" src="{src}" width="{}" height="{}" alt="Preview of {}">"#,
                        thumbnail.width, thumbnail.height, row.escaped_name
                    );
                }
                None => {
                    let _ = writeln!(
                        out,
                        r#"    <canvas class="pdf-preview" width="{}" height="{}" data-scale="{:.4}"></canvas>"#,
                        thumbnail.width, thumbnail.height, thumbnail.scale
                    );
                }
            }
        }
        PreviewState::Unavailable { .. } => {
            let _ = writeln!(
                out,
                r#"    <span class="pdf-preview preview-error">{NO_PREVIEW_LABEL}</span>"#
            );
        }
        PreviewState::Skipped => {}
    }

    let _ = writeln!(out, r#"    <span class="file-name">{}</span>"#, row.escaped_name);
    let _ = writeln!(out, r#"    <span class="file-size">{}</span>"#, row.size_label());
    if !matches!(row.preview, PreviewState::Skipped) {
        let _ = writeln!(
            out,
            r#"    <span class="page-count">{}</span>"#,
            row.page_count_label()
        );
    }
    let _ = writeln!(
        out,
        r#"    <button class="remove-btn" data-index="{}" aria-label="{}">&times;</button>"#,
        row.position, row.remove_label
    );
    out.push_str("  </li>\n");
}
