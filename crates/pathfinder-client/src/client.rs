//! Pathfinder HTTP client implementation

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, Method};
use tracing::{debug, instrument};
use url::Url;

use crate::error::{ClientError, Result};
use crate::transport::{RawResponse, Transport};

/// Default request timeout
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
/// Default connection timeout
const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Settings used to build a [`PathfinderClient`]
#[derive(Clone)]
pub struct ClientConfig {
    /// Base address of the device API (e.g. "http://192.168.1.50:8080")
    pub base_url: String,
    /// Optional API key, sent as a bearer token
    pub api_key: Option<String>,
    pub timeout: Duration,
    pub connect_timeout: Duration,
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: None,
            timeout: DEFAULT_TIMEOUT,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
        }
    }

    pub fn api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn timeouts(mut self, timeout: Duration, connect_timeout: Duration) -> Self {
        self.timeout = timeout;
        self.connect_timeout = connect_timeout;
        self
    }
}

impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("timeout", &self.timeout)
            .field("connect_timeout", &self.connect_timeout)
            .finish()
    }
}

/// Pathfinder control API client
///
/// Immutable after construction; clones share the connection pool.
#[derive(Debug, Clone)]
pub struct PathfinderClient {
    client: Client,
    base_url: Url,
}

impl PathfinderClient {
    /// Create a new client with default timeouts and no credential
    ///
    /// # Arguments
    /// * `base_url` - Base address of the device API (e.g., "http://localhost:8080")
    pub fn new(base_url: &str) -> Result<Self> {
        Self::with_config(ClientConfig::new(base_url))
    }

    /// Create a new client from explicit settings
    pub fn with_config(config: ClientConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        if let Some(api_key) = &config.api_key {
            let mut value = HeaderValue::from_str(&format!("Bearer {}", api_key))
                .map_err(|e| ClientError::InvalidApiKey(e.to_string()))?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }

        let client = Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .default_headers(headers)
            .build()?;

        let base_url = Url::parse(&config.base_url)?;
        if base_url.cannot_be_a_base() {
            return Err(ClientError::InvalidUrl(url::ParseError::RelativeUrlWithCannotBeABaseBase));
        }

        Ok(Self { client, base_url })
    }

    /// Get the base URL
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Resolve an API path against the base address.
    ///
    /// Any path prefix on the base address is kept, so a device mounted at
    /// `http://host/rover` serves movement at `http://host/rover/v1/movement`.
    pub fn endpoint(&self, path: &str) -> Result<Url> {
        let mut url = self.base_url.clone();
        let joined = format!(
            "{}/{}",
            self.base_url.path().trim_end_matches('/'),
            path.trim_start_matches('/')
        );
        url.set_path(&joined);
        Ok(url)
    }
}

#[async_trait]
impl Transport for PathfinderClient {
    #[instrument(skip(self, body), fields(bytes = body.as_ref().map_or(0, Vec::len)))]
    async fn send(
        &self,
        method: Method,
        path: &str,
        body: Option<Vec<u8>>,
    ) -> Result<RawResponse> {
        let url = self.endpoint(path)?;
        debug!("Sending {} request to {}", method, url);

        let request = match body {
            Some(bytes) => self
                .client
                .request(method, url)
                .header(CONTENT_TYPE, "application/json")
                .body(bytes),
            None => self.client.request(method, url).body(Vec::new()),
        };

        let response = request.send().await.map_err(ClientError::from_send)?;
        let status = response.status();
        let body = response.bytes().await.map_err(ClientError::from_send)?;

        debug!(%status, bytes = body.len(), "Received response");
        Ok(RawResponse { status, body })
    }
}
