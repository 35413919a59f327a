//! Catalog response traversal: body text -> ordered book records.
//!
//! The response shape is fixed:
//! `{"items":[{"volumeInfo":{"title":..,"authors":[..],"imageLinks":{"thumbnail":..}}}]}`.
//! Extraction is abort-on-first-error: a malformed item (or a thumbnail
//! transport failure) stops the walk and whatever was collected before it is
//! returned. It is not per-item skip.

use std::sync::atomic::{AtomicBool, Ordering};

use serde_json::Value;

use crate::error::ExtractError;
use crate::record::BookRecord;
use crate::thumbnail::ThumbnailSource;

/// Walk `items[].volumeInfo` and build records in source order.
pub fn extract_records(body: &str, thumbs: &dyn ThumbnailSource) -> Vec<BookRecord> {
    let cancel = AtomicBool::new(false);
    extract_cancellable(body, thumbs, &cancel)
}

/// As [`extract_records`], stopping early once `cancel` is set. Each item
/// costs a thumbnail round-trip, so a superseded search checks between items.
pub fn extract_cancellable(
    body: &str,
    thumbs: &dyn ThumbnailSource,
    cancel: &AtomicBool,
) -> Vec<BookRecord> {
    if body.trim().is_empty() {
        return Vec::new();
    }
    let root: Value = match serde_json::from_str(body) {
        Ok(v) => v,
        Err(e) => {
            tracing::warn!(error = %e, "catalog response is not valid JSON");
            return Vec::new();
        }
    };
    let items = match root.get("items").and_then(Value::as_array) {
        Some(items) => items,
        None => return Vec::new(),
    };

    let mut records = Vec::new();
    for (index, item) in items.iter().enumerate() {
        if cancel.load(Ordering::Relaxed) {
            tracing::debug!(collected = records.len(), "extraction cancelled");
            break;
        }
        match extract_item(index, item, thumbs) {
            Ok(record) => records.push(record),
            Err(e) => {
                tracing::warn!(error = %e, collected = records.len(), "stopping extraction");
                break;
            }
        }
    }
    records
}

fn extract_item(
    index: usize,
    item: &Value,
    thumbs: &dyn ThumbnailSource,
) -> Result<BookRecord, ExtractError> {
    let missing = |field| ExtractError::MissingField { index, field };

    let volume = item
        .get("volumeInfo")
        .filter(|v| v.is_object())
        .ok_or_else(|| missing("volumeInfo"))?;
    let title = volume
        .get("title")
        .and_then(Value::as_str)
        .ok_or_else(|| missing("title"))?;
    let authors = volume
        .get("authors")
        .and_then(Value::as_array)
        .ok_or_else(|| missing("authors"))?
        .iter()
        .map(|a| a.as_str().map(String::from).ok_or_else(|| missing("authors")))
        .collect::<Result<Vec<_>, _>>()?;
    let thumb_url = volume
        .get("imageLinks")
        .and_then(|links| links.get("thumbnail"))
        .and_then(Value::as_str)
        .ok_or_else(|| missing("imageLinks.thumbnail"))?;

    let thumbnail = thumbs
        .fetch(thumb_url)
        .map_err(|source| ExtractError::Thumbnail { index, source })?;

    Ok(BookRecord::new(title, authors, thumbnail))
}
