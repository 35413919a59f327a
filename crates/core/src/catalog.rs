//! Catalog search over HTTP: build the query URL, issue one GET, return the
//! raw response body. No retries, no pagination.

use std::time::Duration;

use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};

use crate::error::FetchError;

pub const DEFAULT_CATALOG_BASE: &str = "https://www.googleapis.com/books/v1/volumes";

pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(15);
pub const DEFAULT_READ_TIMEOUT: Duration = Duration::from_secs(10);
const DEFAULT_USER_AGENT: &str = concat!("book-scout/", env!("CARGO_PKG_VERSION"));

/// Characters escaped in the `q=` query value.
const QUERY_ESCAPE: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'<')
    .add(b'>')
    .add(b'&')
    .add(b'+')
    .add(b'?')
    .add(b'%');

/// Connection settings for the shared HTTP client.
#[derive(Debug, Clone)]
pub struct FetchOptions {
    pub connect_timeout: Duration,
    pub read_timeout: Duration,
    pub user_agent: String,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            read_timeout: DEFAULT_READ_TIMEOUT,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

/// Build a blocking client with bounded connect/read timeouts.
pub fn build_client(opts: &FetchOptions) -> Result<reqwest::blocking::Client, FetchError> {
    reqwest::blocking::Client::builder()
        .connect_timeout(opts.connect_timeout)
        .timeout(opts.read_timeout)
        .user_agent(opts.user_agent.clone())
        .build()
        .map_err(|e| FetchError::Network(e.to_string()))
}

/// Catalog search client. Holds an explicit HTTP client handle rather than
/// reaching for a process-wide one.
pub struct Fetcher {
    client: reqwest::blocking::Client,
    base_url: String,
}

impl Fetcher {
    pub fn new(base_url: impl Into<String>) -> Result<Self, FetchError> {
        Self::with_options(base_url, &FetchOptions::default())
    }

    pub fn with_options(
        base_url: impl Into<String>,
        opts: &FetchOptions,
    ) -> Result<Self, FetchError> {
        Ok(Self {
            client: build_client(opts)?,
            base_url: base_url.into(),
        })
    }

    /// The underlying client, for sharing with the thumbnail fetcher.
    pub fn client(&self) -> &reqwest::blocking::Client {
        &self.client
    }

    /// Full request URL for a search term.
    pub fn search_url(&self, query: &str) -> String {
        format!(
            "{}?q={}",
            self.base_url,
            utf8_percent_encode(query.trim(), QUERY_ESCAPE)
        )
    }

    /// Issue the search GET and return the body text on HTTP 200.
    ///
    /// A blank query returns an empty body without touching the network.
    pub fn search_raw(&self, query: &str) -> Result<String, FetchError> {
        if query.trim().is_empty() {
            return Ok(String::new());
        }
        let url = self.search_url(query);
        tracing::debug!(%url, "catalog search");
        let resp = self
            .client
            .get(&url)
            .send()
            .map_err(|e| FetchError::Network(e.to_string()))?;
        let status = resp.status();
        if status.as_u16() != 200 {
            return Err(FetchError::Status(status.as_u16()));
        }
        resp.text().map_err(|e| FetchError::Network(e.to_string()))
    }
}
