#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

pub mod client;
/// Blob container providers.
pub mod providers;
/// Shared access signature generation.
pub mod signature;
/// Connection strings and the crate error type.
pub mod types;

#[doc(hidden)]
pub mod prelude;

pub use client::StorageClient;
pub use providers::BlobContainer;
pub use signature::{SasPermissions, SasSigner, SignedUrl};
pub use types::{ConnectionString, Error, Result};

/// Tracing target for container operations.
pub const TRACING_TARGET: &str = "docbatch_object";

/// Tracing target for signature generation.
pub const TRACING_TARGET_SIGNATURE: &str = "docbatch_object::signature";
