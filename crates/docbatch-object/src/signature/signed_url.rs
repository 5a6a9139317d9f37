//! Signed blob URL.

use jiff::Timestamp;
use url::Url;

use super::SasPermissions;

/// A blob URL carrying a service SAS in its query string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedUrl {
    url: Url,
    expires_at: Timestamp,
    permissions: SasPermissions,
}

impl SignedUrl {
    pub(crate) fn new(url: Url, expires_at: Timestamp, permissions: SasPermissions) -> Self {
        Self {
            url,
            expires_at,
            permissions,
        }
    }

    /// The full URL, including the signature.
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Moment after which the storage service rejects the URL.
    pub fn expires_at(&self) -> Timestamp {
        self.expires_at
    }

    /// Permissions granted by the signature.
    pub fn permissions(&self) -> SasPermissions {
        self.permissions
    }

    /// Consumes the value, returning the URL.
    pub fn into_url(self) -> Url {
        self.url
    }
}
