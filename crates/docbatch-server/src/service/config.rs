use std::fmt;
use std::time::Duration;

#[cfg(feature = "config")]
use clap::Args;
use docbatch_intelligence::{DiClient, DiConfig};
use docbatch_object::{BlobContainer, ConnectionString};
use jiff::SignedDuration;
use serde::{Deserialize, Serialize};

use crate::service::{Error, Result};

/// Default values for configuration options.
mod defaults {
    /// Read model: text, words, lines, paragraphs and languages.
    pub const ANALYSIS_MODEL_ID: &str = "prebuilt-read";

    /// Lifetime of generated SAS URLs in seconds.
    pub const SAS_EXPIRY_SECS: u64 = 3600;

    /// Delay between status polls when the service sends no `Retry-After`.
    pub const ANALYSIS_POLL_INTERVAL_MS: u64 = 1000;

    /// Timeout of each individual request to the analysis service.
    pub const ANALYSIS_HTTP_TIMEOUT_SECS: u64 = 60;

    pub fn analysis_model_id() -> String {
        ANALYSIS_MODEL_ID.to_owned()
    }

    pub fn sas_expiry_secs() -> u64 {
        SAS_EXPIRY_SECS
    }

    pub fn analysis_poll_interval_ms() -> u64 {
        ANALYSIS_POLL_INTERVAL_MS
    }

    pub fn analysis_http_timeout_secs() -> u64 {
        ANALYSIS_HTTP_TIMEOUT_SECS
    }
}

/// App [`state`] configuration.
///
/// Secrets are skipped when serializing and redacted in `Debug` output.
///
/// [`state`]: crate::service::ServiceState
#[derive(Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "config", derive(Args))]
#[must_use = "config does nothing unless you use it"]
pub struct ServiceConfig {
    /// Document Intelligence resource endpoint.
    #[cfg_attr(
        feature = "config",
        arg(long, env = "DOCUMENTINTELLIGENCE_ENDPOINT")
    )]
    pub documentintelligence_endpoint: String,

    /// Document Intelligence resource key.
    #[cfg_attr(
        feature = "config",
        arg(long, env = "DOCUMENTINTELLIGENCE_API_KEY", hide_env_values = true)
    )]
    #[serde(skip_serializing, default)]
    pub documentintelligence_api_key: String,

    /// Storage account connection string.
    #[cfg_attr(
        feature = "config",
        arg(long, env = "AZURE_STORAGE_CONNECTION_STRING", hide_env_values = true)
    )]
    #[serde(skip_serializing, default)]
    pub azure_storage_connection_string: String,

    /// Name of the container whose blobs are processed.
    #[cfg_attr(feature = "config", arg(long, env = "AZURE_STORAGE_CONTAINER"))]
    pub azure_storage_container: String,

    /// Analysis model applied to every document.
    #[cfg_attr(
        feature = "config",
        arg(long, env = "ANALYSIS_MODEL_ID", default_value = defaults::ANALYSIS_MODEL_ID)
    )]
    #[serde(default = "defaults::analysis_model_id")]
    pub analysis_model_id: String,

    /// Lifetime of the read-only SAS URLs handed to the analysis service, in seconds.
    #[cfg_attr(
        feature = "config",
        arg(long, env = "SAS_EXPIRY_SECS", default_value_t = defaults::SAS_EXPIRY_SECS)
    )]
    #[serde(default = "defaults::sas_expiry_secs")]
    pub sas_expiry_secs: u64,

    /// Fallback delay between analysis status polls, in milliseconds.
    #[cfg_attr(
        feature = "config",
        arg(
            long,
            env = "ANALYSIS_POLL_INTERVAL_MS",
            default_value_t = defaults::ANALYSIS_POLL_INTERVAL_MS
        )
    )]
    #[serde(default = "defaults::analysis_poll_interval_ms")]
    pub analysis_poll_interval_ms: u64,

    /// Timeout of each request to the analysis service, in seconds.
    #[cfg_attr(
        feature = "config",
        arg(
            long,
            env = "ANALYSIS_HTTP_TIMEOUT_SECS",
            default_value_t = defaults::ANALYSIS_HTTP_TIMEOUT_SECS
        )
    )]
    #[serde(default = "defaults::analysis_http_timeout_secs")]
    pub analysis_http_timeout_secs: u64,
}

impl ServiceConfig {
    /// Creates a configuration from the four required values, with defaults
    /// for everything else.
    pub fn new(
        endpoint: impl Into<String>,
        api_key: impl Into<String>,
        connection_string: impl Into<String>,
        container: impl Into<String>,
    ) -> Self {
        Self {
            documentintelligence_endpoint: endpoint.into(),
            documentintelligence_api_key: api_key.into(),
            azure_storage_connection_string: connection_string.into(),
            azure_storage_container: container.into(),
            analysis_model_id: defaults::analysis_model_id(),
            sas_expiry_secs: defaults::SAS_EXPIRY_SECS,
            analysis_poll_interval_ms: defaults::ANALYSIS_POLL_INTERVAL_MS,
            analysis_http_timeout_secs: defaults::ANALYSIS_HTTP_TIMEOUT_SECS,
        }
    }

    /// Validates all configuration values.
    ///
    /// Runs before any client is built, so a bad configuration never reaches
    /// the network.
    ///
    /// # Errors
    ///
    /// Returns a [`Config`](crate::ErrorKind::Config) error naming the first
    /// offending setting:
    /// - required values must not be empty or blank
    /// - the connection string must parse
    /// - durations must be non-zero
    pub fn validate(&self) -> Result<()> {
        let required = [
            ("DOCUMENTINTELLIGENCE_ENDPOINT", &self.documentintelligence_endpoint),
            ("DOCUMENTINTELLIGENCE_API_KEY", &self.documentintelligence_api_key),
            ("AZURE_STORAGE_CONNECTION_STRING", &self.azure_storage_connection_string),
            ("AZURE_STORAGE_CONTAINER", &self.azure_storage_container),
            ("ANALYSIS_MODEL_ID", &self.analysis_model_id),
        ];
        for (name, value) in required {
            if value.trim().is_empty() {
                return Err(Error::config(format!("{name} must not be empty")));
            }
        }

        self.connection_string()?;

        if self.sas_expiry_secs == 0 {
            return Err(Error::config("SAS_EXPIRY_SECS must be greater than zero"));
        }
        if self.analysis_poll_interval_ms == 0 {
            return Err(Error::config(
                "ANALYSIS_POLL_INTERVAL_MS must be greater than zero",
            ));
        }
        if self.analysis_http_timeout_secs == 0 {
            return Err(Error::config(
                "ANALYSIS_HTTP_TIMEOUT_SECS must be greater than zero",
            ));
        }

        Ok(())
    }

    /// Returns the SAS lifetime.
    pub fn sas_expiry(&self) -> Result<SignedDuration> {
        i64::try_from(self.sas_expiry_secs)
            .map(SignedDuration::from_secs)
            .map_err(|e| Error::config("SAS_EXPIRY_SECS is out of range").with_source(e))
    }

    /// Returns the fallback poll interval.
    pub fn analysis_poll_interval(&self) -> Duration {
        Duration::from_millis(self.analysis_poll_interval_ms)
    }

    /// Returns the per-request analysis timeout.
    pub fn analysis_http_timeout(&self) -> Duration {
        Duration::from_secs(self.analysis_http_timeout_secs)
    }

    /// Parses the storage connection string.
    pub fn connection_string(&self) -> Result<ConnectionString> {
        ConnectionString::parse(&self.azure_storage_connection_string).map_err(|e| {
            Error::config("AZURE_STORAGE_CONNECTION_STRING is malformed").with_source(e)
        })
    }

    /// Configures the blob container client. No request is made.
    pub fn connect_container(&self) -> Result<BlobContainer> {
        let conn = self.connection_string()?;
        let container = BlobContainer::connect(&conn, &self.azure_storage_container)
            .map_err(|e| Error::config("Failed to configure blob container").with_source(e))?;
        Ok(container.with_sas_expiry(self.sas_expiry()?))
    }

    /// Builds the Document Intelligence client. No request is made.
    pub fn connect_analyzer(&self) -> Result<DiClient> {
        let config = DiConfig::new(
            &self.documentintelligence_endpoint,
            &self.documentintelligence_api_key,
        )
        .map_err(|e| Error::config("Invalid Document Intelligence settings").with_source(e))?
        .with_timeout(self.analysis_http_timeout())
        .with_poll_interval(self.analysis_poll_interval());

        DiClient::new(config).map_err(|e| {
            Error::config("Failed to create Document Intelligence client").with_source(e)
        })
    }
}

impl fmt::Debug for ServiceConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceConfig")
            .field("documentintelligence_endpoint", &self.documentintelligence_endpoint)
            .field("documentintelligence_api_key", &"<redacted>")
            .field("azure_storage_connection_string", &"<redacted>")
            .field("azure_storage_container", &self.azure_storage_container)
            .field("analysis_model_id", &self.analysis_model_id)
            .field("sas_expiry_secs", &self.sas_expiry_secs)
            .field("analysis_poll_interval_ms", &self.analysis_poll_interval_ms)
            .field("analysis_http_timeout_secs", &self.analysis_http_timeout_secs)
            .finish()
    }
}
