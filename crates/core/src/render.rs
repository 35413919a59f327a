//! List binding: map an ordered record list to rendered rows. Pure functions;
//! view reuse and drawing belong to whatever surface displays the rows.

use serde::Serialize;

use crate::record::BookRecord;

/// Rendered form of one record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RowView {
    pub title: String,
    /// Comma-joined author names, e.g. `"A, B, C"`. Empty for no authors.
    pub authors_line: String,
    pub thumbnail: ThumbnailView,
}

/// What the row shows in the cover slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ThumbnailView {
    /// A decoded image of the given pixel size.
    Image { width: u32, height: u32 },
    /// Blank slot when no image decoded.
    Placeholder,
}

pub fn render_rows(records: &[BookRecord]) -> Vec<RowView> {
    records.iter().map(render_row).collect()
}

pub fn render_row(record: &BookRecord) -> RowView {
    RowView {
        title: record.title.clone(),
        authors_line: join_authors(&record.authors),
        thumbnail: match &record.thumbnail {
            Some(img) => ThumbnailView::Image {
                width: img.width(),
                height: img.height(),
            },
            None => ThumbnailView::Placeholder,
        },
    }
}

/// Join author names with `", "`, no trailing separator.
pub fn join_authors(authors: &[String]) -> String {
    authors.join(", ")
}
