//! Blob service SAS issued with the account key.

use azure_storage_blobs::prelude::BlobClient;
use jiff::{SignedDuration, Timestamp};
use time::OffsetDateTime;

use super::{SasPermissions, SignedUrl};
use crate::TRACING_TARGET_SIGNATURE;
use crate::types::{Error, Result};

/// Default lifetime of a signed URL.
const DEFAULT_EXPIRY: SignedDuration = SignedDuration::from_hours(1);

/// Issues service SAS URLs for blobs of a single storage account.
///
/// The account key travels with the [`BlobClient`] being signed; the signer
/// itself only carries the URL lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SasSigner {
    expiry: SignedDuration,
}

impl Default for SasSigner {
    fn default() -> Self {
        Self {
            expiry: DEFAULT_EXPIRY,
        }
    }
}

impl SasSigner {
    /// Creates a signer issuing URLs valid for one hour.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the lifetime of URLs produced by [`signed_read_url`](Self::signed_read_url).
    pub fn with_expiry(mut self, expiry: SignedDuration) -> Self {
        self.expiry = expiry;
        self
    }

    /// Lifetime of URLs produced by [`signed_read_url`](Self::signed_read_url).
    pub fn expiry(&self) -> SignedDuration {
        self.expiry
    }

    /// Read-only URL for `blob`, valid for [`expiry`](Self::expiry) from now.
    pub async fn signed_read_url(&self, blob: &BlobClient) -> Result<SignedUrl> {
        let expires_at = Timestamp::now()
            .checked_add(self.expiry)
            .map_err(|e| Error::signature("expiry is out of range").with_source(e))?;
        self.sign_blob(blob, SasPermissions::read(), expires_at).await
    }

    /// Signs `blob` with the given permissions and absolute expiry.
    ///
    /// The expiry is truncated to whole seconds.
    pub async fn sign_blob(
        &self,
        blob: &BlobClient,
        permissions: SasPermissions,
        expires_at: Timestamp,
    ) -> Result<SignedUrl> {
        if permissions.is_empty() {
            return Err(Error::signature("a SAS must grant at least one permission"));
        }
        if blob.blob_name().is_empty() {
            return Err(Error::signature("blob name must not be empty"));
        }

        let expires_at = Timestamp::from_second(expires_at.as_second())
            .map_err(|e| Error::signature("expiry is out of range").with_source(e))?;
        let expiry = OffsetDateTime::from_unix_timestamp(expires_at.as_second())
            .map_err(|e| Error::signature("expiry is out of range").with_source(e))?;

        let sas = blob
            .shared_access_signature(permissions.into(), expiry)
            .await
            .map_err(|e| Error::signature("failed to issue blob SAS").with_source(e))?;
        let url = blob
            .generate_signed_blob_url(&sas)
            .map_err(|e| Error::signature("failed to build signed blob url").with_source(e))?;

        tracing::trace!(
            target: TRACING_TARGET_SIGNATURE,
            blob = blob.blob_name(),
            permissions = %permissions,
            expires_at = %expires_at,
            "signed blob url"
        );

        Ok(SignedUrl::new(url, expires_at, permissions))
    }
}
