/// Errors from talking to the catalog or a thumbnail host.
///
/// Callers above the pipeline treat every variant as "no data": the failure
/// is logged where it is absorbed and the view only ever sees an empty list.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("Malformed URL: {0}")]
    BadUrl(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Server returned HTTP {0}")]
    Status(u16),
}

/// Errors while walking the catalog response. Extraction stops at the first
/// one and whatever was collected before it is kept.
#[derive(Debug, thiserror::Error)]
pub enum ExtractError {
    #[error("Item {index}: missing or malformed `{field}`")]
    MissingField { index: usize, field: &'static str },

    #[error("Item {index}: thumbnail fetch failed")]
    Thumbnail {
        index: usize,
        #[source]
        source: FetchError,
    },
}
