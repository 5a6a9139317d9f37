//! Blob service client backed by [`azure_storage_blobs`].
//!
//! [`StorageClient`] owns the account credentials and endpoint of one storage
//! account. Blob names are never converted into a normalized path type, so
//! names such as `notes/`, `scans//b.pdf` or `./c.pdf` are listed and signed
//! exactly as the service stores them.

use std::fmt;

use azure_storage::{CloudLocation, StorageCredentials};
use azure_storage_blobs::prelude::{BlobServiceClient, ClientBuilder, ContainerClient};

use crate::TRACING_TARGET;
use crate::types::{ConnectionString, Error};

/// Cloneable handle to the blob service of one storage account.
#[derive(Clone)]
pub struct StorageClient {
    account_name: String,
    service: BlobServiceClient,
}

impl StorageClient {
    /// Builds a client from a parsed connection string.
    ///
    /// No request is issued; the account key is only checked by the service
    /// on first use.
    pub fn from_connection_string(conn: &ConnectionString) -> Self {
        let account = conn.account_name().to_owned();
        let credentials = StorageCredentials::access_key(account.clone(), conn.account_key().to_owned());

        let location = if conn.has_custom_endpoint() {
            CloudLocation::Custom {
                account: account.clone(),
                uri: conn.blob_endpoint().as_str().trim_end_matches('/').to_owned(),
            }
        } else {
            CloudLocation::Public {
                account: account.clone(),
            }
        };

        tracing::debug!(
            target: TRACING_TARGET,
            account = %account,
            endpoint = %conn.blob_endpoint(),
            "blob service client configured"
        );

        Self {
            service: ClientBuilder::with_location(location, credentials).blob_service_client(),
            account_name: account,
        }
    }

    /// Storage account name.
    pub fn account_name(&self) -> &str {
        &self.account_name
    }

    /// Client scoped to a single container.
    pub fn container_client(&self, container: &str) -> ContainerClient {
        self.service.container_client(container)
    }
}

impl fmt::Debug for StorageClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StorageClient")
            .field("account_name", &self.account_name)
            .finish_non_exhaustive()
    }
}

/// Convert an [`azure_core::Error`] into a crate [`Error`].
pub(crate) fn from_azure(err: azure_core::Error, label: &str) -> Error {
    let retryable = matches!(err.kind(), azure_core::error::ErrorKind::Io);
    Error::runtime(err.to_string(), label, retryable).with_source(err)
}
