//! Blob container providers.

mod azure;

pub use azure::BlobContainer;
