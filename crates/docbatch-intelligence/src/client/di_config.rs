//! Configuration for the Document Intelligence HTTP client.

use std::fmt;
use std::time::Duration;

use url::Url;

use crate::{Error, Result};

/// REST API version the client speaks.
pub const DEFAULT_API_VERSION: &str = "2024-11-30";

/// Configuration for the Document Intelligence HTTP client.
///
/// # Examples
///
/// ```ignore
/// use docbatch_intelligence::DiConfig;
/// use std::time::Duration;
///
/// let config = DiConfig::new("https://my-resource.cognitiveservices.azure.com/", "key")?
///     .with_timeout(Duration::from_secs(30))
///     .with_poll_interval(Duration::from_millis(500));
/// ```
#[derive(Clone)]
pub struct DiConfig {
    /// Resource endpoint, e.g. `https://{name}.cognitiveservices.azure.com/`
    endpoint: Url,

    /// Resource key sent as `Ocp-Apim-Subscription-Key`
    api_key: String,

    /// Value of the `api-version` query parameter
    api_version: String,

    /// Timeout of every individual HTTP request
    timeout: Duration,

    /// Delay between polls when the service sends no `Retry-After`
    poll_interval: Duration,

    /// User agent string for HTTP requests
    user_agent: String,
}

impl DiConfig {
    /// Create a configuration with default settings.
    ///
    /// Fails if the endpoint is not an absolute http(s) URL or the key is empty.
    pub fn new(endpoint: impl AsRef<str>, api_key: impl Into<String>) -> Result<Self> {
        let endpoint = endpoint.as_ref().trim();
        if endpoint.is_empty() {
            return Err(Error::config("Endpoint must not be empty"));
        }
        let endpoint = Url::parse(endpoint)
            .map_err(|e| Error::config(format!("Invalid endpoint '{endpoint}': {e}")))?;
        if !matches!(endpoint.scheme(), "http" | "https") || endpoint.cannot_be_a_base() {
            return Err(Error::config(format!(
                "Endpoint '{endpoint}' must be an http(s) URL"
            )));
        }

        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(Error::config("API key must not be empty"));
        }

        Ok(Self {
            endpoint,
            api_key,
            api_version: DEFAULT_API_VERSION.to_owned(),
            timeout: Duration::from_secs(60),
            poll_interval: Duration::from_secs(1),
            user_agent: format!("docbatch-intelligence/{}", env!("CARGO_PKG_VERSION")),
        })
    }

    /// Get the resource endpoint.
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Get the API key.
    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    /// Get the API version.
    pub fn api_version(&self) -> &str {
        &self.api_version
    }

    /// Get the per-request timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Get the fallback poll interval.
    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    /// Get the user agent string.
    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    /// Set the API version.
    pub fn with_api_version(mut self, api_version: impl Into<String>) -> Self {
        self.api_version = api_version.into();
        self
    }

    /// Set the per-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the fallback poll interval.
    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    /// Set a custom user agent.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}

impl fmt::Debug for DiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DiConfig")
            .field("endpoint", &self.endpoint.as_str())
            .field("api_key", &"<redacted>")
            .field("api_version", &self.api_version)
            .field("timeout", &self.timeout)
            .field("poll_interval", &self.poll_interval)
            .field("user_agent", &self.user_agent)
            .finish()
    }
}
