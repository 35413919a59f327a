//! Cover thumbnail retrieval and decoding.

use image::DynamicImage;

use crate::error::FetchError;

/// Source of decoded thumbnails, keyed by URL. The seam exists so extraction
/// can be exercised without a network.
pub trait ThumbnailSource: Send + Sync {
    /// Fetch and decode one thumbnail.
    ///
    /// Transport problems (bad URL, connection failure, non-success status)
    /// are hard errors; bytes that arrive but do not decode as an image are
    /// soft and yield `Ok(None)` so the record is kept without a cover.
    fn fetch(&self, url: &str) -> Result<Option<DynamicImage>, FetchError>;
}

/// HTTP-backed thumbnail source sharing the catalog's client handle.
pub struct HttpThumbnails {
    client: reqwest::blocking::Client,
}

impl HttpThumbnails {
    pub fn new(client: reqwest::blocking::Client) -> Self {
        Self { client }
    }
}

impl ThumbnailSource for HttpThumbnails {
    fn fetch(&self, url: &str) -> Result<Option<DynamicImage>, FetchError> {
        let url = reqwest::Url::parse(url).map_err(|e| FetchError::BadUrl(e.to_string()))?;
        let resp = self
            .client
            .get(url.clone())
            .send()
            .map_err(|e| FetchError::Network(e.to_string()))?;
        let status = resp.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }
        let bytes = resp
            .bytes()
            .map_err(|e| FetchError::Network(e.to_string()))?;
        match image::load_from_memory(&bytes) {
            Ok(img) => Ok(Some(img)),
            Err(e) => {
                tracing::warn!(url = %url, error = %e, "thumbnail bytes did not decode");
                Ok(None)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn malformed_url_is_a_hard_error() {
        let thumbs = HttpThumbnails::new(reqwest::blocking::Client::new());
        let err = thumbs.fetch("not a url").unwrap_err();
        assert!(matches!(err, FetchError::BadUrl(_)));
    }
}
