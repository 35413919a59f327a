//! Config file parsing for `~/.config/book-scout/config.toml`.
//!
//! Use the `*_from_config` builders to turn a loaded config into fetcher,
//! probe, and message values so timeout and endpoint overrides apply.

use std::net::SocketAddr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::catalog::{FetchOptions, Fetcher, DEFAULT_CATALOG_BASE};
use crate::connectivity::{default_probe_addr, TcpProbe};
use crate::error::FetchError;
use crate::presenter::{Messages, Presenter};
use crate::thumbnail::HttpThumbnails;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub catalog: CatalogConfig,
    #[serde(default)]
    pub http: HttpConfig,
    #[serde(default)]
    pub probe: ProbeConfig,
    #[serde(default)]
    pub ui: UiConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

fn default_base_url() -> String {
    DEFAULT_CATALOG_BASE.to_string()
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HttpConfig {
    pub connect_timeout_secs: Option<u64>,
    pub read_timeout_secs: Option<u64>,
    pub user_agent: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProbeConfig {
    /// `host:port` probed before each search (default: public DNS).
    pub addr: Option<String>,
    pub timeout_ms: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UiConfig {
    pub hint_message: Option<String>,
    pub no_results_message: Option<String>,
    pub no_network_message: Option<String>,
}

/// Load config from the default path. Missing or unparseable files fall back
/// to defaults.
pub fn load_config() -> AppConfig {
    match config_path() {
        Some(p) => load_config_from(&p),
        None => AppConfig::default(),
    }
}

/// Load config from an explicit path, with the same silent fallback.
pub fn load_config_from(path: &std::path::Path) -> AppConfig {
    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(_) => return AppConfig::default(),
    };

    match toml::from_str::<AppConfig>(&content) {
        Ok(cfg) => cfg,
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "ignoring unparseable config");
            AppConfig::default()
        }
    }
}

/// Default config file path (for init and show).
pub fn config_path() -> Option<std::path::PathBuf> {
    dirs::config_dir().map(|mut p| {
        p.push("book-scout");
        p.push("config.toml");
        p
    })
}

/// Build fetch options from config. Uses defaults for any unset values.
pub fn fetch_options_from_config(c: &HttpConfig) -> FetchOptions {
    let mut opts = FetchOptions::default();
    if let Some(secs) = c.connect_timeout_secs {
        opts.connect_timeout = Duration::from_secs(secs);
    }
    if let Some(secs) = c.read_timeout_secs {
        opts.read_timeout = Duration::from_secs(secs);
    }
    if let Some(ua) = &c.user_agent {
        opts.user_agent = ua.clone();
    }
    opts
}

/// Build the catalog fetcher from full app config.
pub fn fetcher_from_config(cfg: &AppConfig) -> Result<Fetcher, FetchError> {
    Fetcher::with_options(
        cfg.catalog.base_url.clone(),
        &fetch_options_from_config(&cfg.http),
    )
}

/// Build the connectivity probe from config. A bad `addr` falls back to the
/// default probe target.
pub fn probe_from_config(cfg: &AppConfig) -> TcpProbe {
    let addr = cfg.probe.addr.as_deref().and_then(|s| match s.parse::<SocketAddr>() {
        Ok(a) => Some(a),
        Err(e) => {
            tracing::warn!(addr = s, error = %e, "ignoring unparseable probe address");
            None
        }
    });
    let timeout = cfg.probe.timeout_ms.map(Duration::from_millis);
    match (addr, timeout) {
        (Some(a), Some(t)) => TcpProbe::with_timeout(a, t),
        (Some(a), None) => TcpProbe::new(a),
        (None, Some(t)) => TcpProbe::with_timeout(default_probe_addr(), t),
        (None, None) => TcpProbe::default(),
    }
}

/// Build status-line messages from config overrides.
pub fn messages_from_config(cfg: &AppConfig) -> Messages {
    let mut messages = Messages::default();
    if let Some(m) = &cfg.ui.hint_message {
        messages.hint = m.clone();
    }
    if let Some(m) = &cfg.ui.no_results_message {
        messages.no_results = m.clone();
    }
    if let Some(m) = &cfg.ui.no_network_message {
        messages.no_network = m.clone();
    }
    messages
}

/// Assemble a ready-to-use presenter from full app config. The thumbnail
/// fetcher shares the catalog client handle.
pub fn presenter_from_config(cfg: &AppConfig) -> Result<Presenter, FetchError> {
    let fetcher = fetcher_from_config(cfg)?;
    let thumbs = HttpThumbnails::new(fetcher.client().clone());
    Ok(Presenter::with_messages(
        fetcher,
        std::sync::Arc::new(thumbs),
        Box::new(probe_from_config(cfg)),
        messages_from_config(cfg),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_points_at_public_catalog() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.catalog.base_url, DEFAULT_CATALOG_BASE);
        assert!(cfg.http.connect_timeout_secs.is_none());
    }

    #[test]
    fn partial_toml_fills_in_defaults() {
        let cfg: AppConfig = toml::from_str(
            r#"
            [http]
            read_timeout_secs = 3

            [ui]
            no_results_message = "nothing here"
            "#,
        )
        .unwrap();
        assert_eq!(cfg.catalog.base_url, DEFAULT_CATALOG_BASE);
        let opts = fetch_options_from_config(&cfg.http);
        assert_eq!(opts.read_timeout, Duration::from_secs(3));
        assert_eq!(opts.connect_timeout, crate::catalog::DEFAULT_CONNECT_TIMEOUT);
        let messages = messages_from_config(&cfg);
        assert_eq!(messages.no_results, "nothing here");
        assert_eq!(messages.hint, crate::presenter::HINT_MESSAGE);
    }

    #[test]
    fn config_round_trips_through_toml() {
        let cfg = AppConfig::default();
        let text = toml::to_string_pretty(&cfg).unwrap();
        let back: AppConfig = toml::from_str(&text).unwrap();
        assert_eq!(back.catalog.base_url, cfg.catalog.base_url);
    }

    #[test]
    fn bad_probe_addr_falls_back_to_default() {
        let cfg: AppConfig = toml::from_str(
            r#"
            [probe]
            addr = "not-an-addr"
            "#,
        )
        .unwrap();
        let probe = probe_from_config(&cfg);
        assert_eq!(probe.addr(), default_probe_addr());
    }

    #[test]
    fn load_from_file_and_fallbacks() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        // Missing file falls back silently.
        assert_eq!(load_config_from(&path).catalog.base_url, DEFAULT_CATALOG_BASE);

        std::fs::write(&path, "[catalog]\nbase_url = \"http://localhost:9/v\"\n").unwrap();
        assert_eq!(load_config_from(&path).catalog.base_url, "http://localhost:9/v");

        std::fs::write(&path, "not = [valid").unwrap();
        assert_eq!(load_config_from(&path).catalog.base_url, DEFAULT_CATALOG_BASE);
    }
}
