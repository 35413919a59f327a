use image::DynamicImage;

/// One catalog search hit. Records are built only by extraction, owned by the
/// presenter's displayed list, and replaced wholesale on each new search --
/// they are never mutated in place.
#[derive(Debug, Clone)]
pub struct BookRecord {
    pub title: String,
    /// Author names in catalog order. May be empty.
    pub authors: Vec<String>,
    /// Decoded cover thumbnail. Absent when the cover bytes did not decode.
    pub thumbnail: Option<DynamicImage>,
}

impl BookRecord {
    pub fn new(
        title: impl Into<String>,
        authors: Vec<String>,
        thumbnail: Option<DynamicImage>,
    ) -> Self {
        Self {
            title: title.into(),
            authors,
            thumbnail,
        }
    }
}
