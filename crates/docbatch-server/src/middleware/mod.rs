//! Middleware for `axum::Router` and HTTP request processing.
//!
//! - Observability: request ids, trace spans, request timing
//! - Recovery: panics and the whole-request timeout
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use axum::Router;
//! use docbatch_server::middleware::{RouterObservabilityExt, RouterRecoveryExt};
//!
//! let app: Router = Router::new()
//!     .with_default_recovery()
//!     .with_observability()
//!     .with_timing();
//! ```

mod observability;
mod recovery;

pub use observability::RouterObservabilityExt;
pub use recovery::{RecoveryConfig, RouterRecoveryExt};
