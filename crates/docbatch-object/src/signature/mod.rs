//! Service shared access signatures (SAS) for individual blobs.
//!
//! A service SAS grants time-limited, permission-scoped access to exactly one
//! blob without any further authentication. Tokens are issued by
//! [`azure_storage_blobs`] from the storage account key.

mod permissions;
mod sas_signer;
mod signed_url;

pub use permissions::SasPermissions;
pub use sas_signer::SasSigner;
pub use signed_url::SignedUrl;
