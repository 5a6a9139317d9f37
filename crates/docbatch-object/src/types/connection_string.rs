//! Azure storage connection string parsing.

use std::collections::HashMap;
use std::fmt;

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use url::Url;

use super::{Error, Result};

/// Account name of the local storage emulator.
const DEVELOPMENT_ACCOUNT_NAME: &str = "devstoreaccount1";

/// Well-known, publicly documented key of the local storage emulator.
const DEVELOPMENT_ACCOUNT_KEY: &str =
    "Eby8vdM02xNOcqFlqUwJPLlmEtlCDXJ1OUzFT50uSRZ6IFsuFq2UVErCz4I6tq/K1SZFPTOtr/KBHBeksoGMGw==";

/// Blob endpoint of the local storage emulator.
const DEVELOPMENT_BLOB_ENDPOINT: &str = "http://127.0.0.1:10000/devstoreaccount1";

const DEFAULT_PROTOCOL: &str = "https";
const DEFAULT_ENDPOINT_SUFFIX: &str = "core.windows.net";

/// Parsed Azure storage connection string.
///
/// Accepts the `key=value;key=value` form issued by the Azure portal. Keys are
/// matched case-insensitively and unknown keys are ignored.
///
/// ```text
/// DefaultEndpointsProtocol=https;AccountName=acct;AccountKey=...;EndpointSuffix=core.windows.net
/// ```
#[derive(Clone)]
pub struct ConnectionString {
    account_name: String,
    account_key: String,
    blob_endpoint: Url,
    custom_endpoint: bool,
}

impl ConnectionString {
    /// Parses a connection string.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if a segment is not a `key=value` pair,
    /// if `AccountName` or `AccountKey` is missing, if the key is not valid
    /// base64, or if the resulting blob endpoint is not a valid URL.
    pub fn parse(input: &str) -> Result<Self> {
        let mut pairs = HashMap::new();
        for (index, segment) in input
            .split(';')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .enumerate()
        {
            // Values may contain '=' (base64 padding), so split on the first one only.
            let Some((key, value)) = segment.split_once('=') else {
                return Err(Error::config(format!(
                    "connection string segment {index} is not a key=value pair"
                )));
            };
            pairs.insert(key.trim().to_ascii_lowercase(), value.trim().to_owned());
        }

        let development = pairs
            .get("usedevelopmentstorage")
            .is_some_and(|v| v.eq_ignore_ascii_case("true"));

        if development {
            return Self::development();
        }

        let account_name = pairs
            .remove("accountname")
            .filter(|v| !v.is_empty())
            .ok_or_else(|| Error::config("connection string is missing AccountName"))?;

        let account_key = pairs
            .remove("accountkey")
            .filter(|v| !v.is_empty())
            .ok_or_else(|| Error::config("connection string is missing AccountKey"))?;

        let (blob_endpoint, custom_endpoint) = match pairs.remove("blobendpoint") {
            Some(endpoint) if !endpoint.is_empty() => (endpoint, true),
            _ => {
                let protocol = pairs
                    .remove("defaultendpointsprotocol")
                    .unwrap_or_else(|| DEFAULT_PROTOCOL.to_owned());
                let suffix = pairs
                    .remove("endpointsuffix")
                    .unwrap_or_else(|| DEFAULT_ENDPOINT_SUFFIX.to_owned());
                let custom = !protocol.eq_ignore_ascii_case(DEFAULT_PROTOCOL)
                    || !suffix.eq_ignore_ascii_case(DEFAULT_ENDPOINT_SUFFIX);
                (format!("{protocol}://{account_name}.blob.{suffix}"), custom)
            }
        };

        Self::new(account_name, account_key, &blob_endpoint, custom_endpoint)
    }

    /// Connection settings for the local storage emulator.
    pub fn development() -> Result<Self> {
        Self::new(
            DEVELOPMENT_ACCOUNT_NAME.to_owned(),
            DEVELOPMENT_ACCOUNT_KEY.to_owned(),
            DEVELOPMENT_BLOB_ENDPOINT,
            true,
        )
    }

    fn new(
        account_name: String,
        account_key: String,
        blob_endpoint: &str,
        custom_endpoint: bool,
    ) -> Result<Self> {
        BASE64_STANDARD
            .decode(account_key.as_bytes())
            .map_err(|e| Error::config("AccountKey is not valid base64").with_source(e))?;

        let mut blob_endpoint = Url::parse(blob_endpoint)
            .map_err(|e| Error::config("blob endpoint is not a valid URL").with_source(e))?;
        if blob_endpoint.cannot_be_a_base() {
            return Err(Error::config("blob endpoint must be a hierarchical URL"));
        }
        if let Ok(mut segments) = blob_endpoint.path_segments_mut() {
            segments.pop_if_empty();
        }

        Ok(Self {
            account_name,
            account_key,
            blob_endpoint,
            custom_endpoint,
        })
    }

    /// Storage account name.
    pub fn account_name(&self) -> &str {
        &self.account_name
    }

    /// Account key as issued (base64).
    pub fn account_key(&self) -> &str {
        &self.account_key
    }

    /// Blob service endpoint with any trailing empty path segment removed.
    pub fn blob_endpoint(&self) -> &Url {
        &self.blob_endpoint
    }

    /// Whether the endpoint differs from `https://{account}.blob.core.windows.net`.
    pub fn has_custom_endpoint(&self) -> bool {
        self.custom_endpoint
    }
}

impl fmt::Debug for ConnectionString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionString")
            .field("account_name", &self.account_name)
            .field("account_key", &"<redacted>")
            .field("blob_endpoint", &self.blob_endpoint.as_str())
            .finish()
    }
}
