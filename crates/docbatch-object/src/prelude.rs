//! Convenience re-exports.

pub use crate::client::StorageClient;
pub use crate::providers::BlobContainer;
pub use crate::signature::{SasPermissions, SasSigner, SignedUrl};
pub use crate::types::{ConnectionString, Error, Result};
