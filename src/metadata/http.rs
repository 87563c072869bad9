//! Blocking HTTP metadata client
//!
//! Issues a single GET per product code against a configurable endpoint that
//! answers with a JSON [`WorkMetadata`] document. No scraping, caching or
//! retries happen here.

use super::{FetchError, MetadataClient};
use crate::error::{Result, ShelfError};
use crate::types::WorkMetadata;
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use std::cell::Cell;
use std::time::{Duration, Instant};
use tracing::debug;

/// Catalog language requested from the endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Locale {
    #[default]
    JaJp,
    EnUs,
    ZhCn,
    ZhTw,
    KoKr,
}

impl Locale {
    pub fn as_str(self) -> &'static str {
        match self {
            Locale::JaJp => "ja_jp",
            Locale::EnUs => "en_us",
            Locale::ZhCn => "zh_cn",
            Locale::ZhTw => "zh_tw",
            Locale::KoKr => "ko_kr",
        }
    }
}

/// Network tuning shared by the metadata client and the cover source
#[derive(Debug, Clone)]
pub struct ClientSettings {
    /// URL template; `{code}` and `{locale}` are substituted
    pub endpoint: String,
    pub locale: Locale,
    pub connect_timeout: Duration,
    pub read_timeout: Duration,
    /// Minimum gap between consecutive metadata requests
    pub sleep_interval: Duration,
    pub proxy: Option<String>,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            endpoint: String::new(),
            locale: Locale::default(),
            connect_timeout: Duration::from_secs(10),
            read_timeout: Duration::from_secs(10),
            sleep_interval: Duration::from_secs(3),
            proxy: None,
        }
    }
}

/// Build a blocking client with the configured timeouts and proxy
pub(crate) fn build_client(settings: &ClientSettings) -> Result<Client> {
    let mut builder = Client::builder()
        .connect_timeout(settings.connect_timeout)
        .timeout(settings.connect_timeout + settings.read_timeout);

    // Proxying comes from the config file only, never from the environment
    builder = match &settings.proxy {
        Some(proxy) => {
            let proxy = reqwest::Proxy::all(proxy)
                .map_err(|e| ShelfError::Config(format!("invalid proxy '{}': {}", proxy, e)))?;
            builder.proxy(proxy)
        }
        None => builder.no_proxy(),
    };

    builder
        .build()
        .map_err(|e| ShelfError::Config(format!("failed to build HTTP client: {}", e)))
}

/// Map a reqwest failure onto the fetch error taxonomy
fn classify(err: reqwest::Error) -> FetchError {
    if err.is_timeout() {
        FetchError::Timeout
    } else if err.is_connect() {
        FetchError::Connection(err.to_string())
    } else if let Some(status) = err.status() {
        FetchError::HttpStatus {
            status: status.as_u16(),
            reason: status.canonical_reason().unwrap_or("").to_string(),
        }
    } else {
        FetchError::Transport(err.to_string())
    }
}

/// [`MetadataClient`] backed by a JSON endpoint
#[derive(Debug)]
pub struct HttpMetadataClient {
    client: Client,
    settings: ClientSettings,
    last_request: Cell<Option<Instant>>,
}

impl HttpMetadataClient {
    pub fn new(settings: ClientSettings) -> Result<Self> {
        let client = build_client(&settings)?;
        Ok(Self {
            client,
            settings,
            last_request: Cell::new(None),
        })
    }

    fn url_for(&self, product_code: &str) -> String {
        self.settings
            .endpoint
            .replace("{code}", product_code)
            .replace("{locale}", self.settings.locale.as_str())
    }

    /// Sleep until `sleep_interval` has passed since the previous request
    fn throttle(&self) {
        if let Some(last) = self.last_request.get() {
            let elapsed = last.elapsed();
            if elapsed < self.settings.sleep_interval {
                std::thread::sleep(self.settings.sleep_interval - elapsed);
            }
        }
        self.last_request.set(Some(Instant::now()));
    }
}

impl MetadataClient for HttpMetadataClient {
    fn fetch(&self, product_code: &str) -> std::result::Result<WorkMetadata, FetchError> {
        self.throttle();

        let url = self.url_for(product_code);
        debug!("GET {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .and_then(|r| r.error_for_status())
            .map_err(classify)?;

        let mut metadata: WorkMetadata = response.json().map_err(|e| {
            if e.is_timeout() {
                FetchError::Timeout
            } else {
                FetchError::Transport(format!("invalid metadata response: {}", e))
            }
        })?;

        if metadata.product_code.is_empty() {
            metadata.product_code = product_code.to_string();
        }
        Ok(metadata)
    }
}
