//! Azure Blob Storage container using [`azure_storage_blobs`].

use std::fmt;

use azure_storage_blobs::prelude::ContainerClient;
use futures::stream::{self, BoxStream};
use futures::{StreamExt, TryStreamExt};
use jiff::SignedDuration;

use crate::TRACING_TARGET;
use crate::client::{StorageClient, from_azure};
use crate::signature::{SasSigner, SignedUrl};
use crate::types::{ConnectionString, Error, Result};

/// A single blob container together with the signer for its blobs.
#[derive(Clone)]
pub struct BlobContainer {
    client: ContainerClient,
    signer: SasSigner,
    container: String,
}

impl BlobContainer {
    const ID: &str = "azure";

    /// Connects to `container` in the account named by the connection string.
    ///
    /// No request is issued; credentials are only checked by the first list.
    pub fn connect(conn: &ConnectionString, container: impl Into<String>) -> Result<Self> {
        let container = container.into();
        if container.is_empty() {
            return Err(Error::config("container name must not be empty"));
        }

        let storage = StorageClient::from_connection_string(conn);

        tracing::info!(
            target: TRACING_TARGET,
            account = %conn.account_name(),
            container = %container,
            endpoint = %conn.blob_endpoint(),
            "blob container configured"
        );

        Ok(Self::new(&storage, container))
    }

    /// Scopes an existing client to `container`, signing with the default signer.
    pub fn new(storage: &StorageClient, container: impl Into<String>) -> Self {
        let container = container.into();
        Self {
            client: storage.container_client(&container),
            signer: SasSigner::new(),
            container,
        }
    }

    /// Sets the lifetime of URLs returned by [`signed_read_url`](Self::signed_read_url).
    pub fn with_sas_expiry(mut self, expiry: SignedDuration) -> Self {
        self.signer = self.signer.with_expiry(expiry);
        self
    }

    /// Container name.
    pub fn container(&self) -> &str {
        &self.container
    }

    /// Signer used for this container's blobs.
    pub fn signer(&self) -> &SasSigner {
        &self.signer
    }

    /// Streams the full name of every blob in the container, in service order.
    ///
    /// Pages are fetched as the stream is polled. Names are yielded verbatim.
    pub fn list_blob_names(&self) -> BoxStream<'static, Result<String>> {
        self.client
            .list_blobs()
            .into_stream()
            .map_err(|e| from_azure(e, Self::ID))
            .map_ok(|page| {
                let names: Vec<Result<String>> =
                    page.blobs.blobs().map(|blob| Ok(blob.name.clone())).collect();
                stream::iter(names)
            })
            .try_flatten()
            .boxed()
    }

    /// Read-only SAS URL for `blob`.
    pub async fn signed_read_url(&self, blob: &str) -> Result<SignedUrl> {
        self.signer
            .signed_read_url(&self.client.blob_client(blob))
            .await
    }
}

impl fmt::Debug for BlobContainer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BlobContainer")
            .field("container", &self.container)
            .field("signer", &self.signer)
            .finish_non_exhaustive()
    }
}
