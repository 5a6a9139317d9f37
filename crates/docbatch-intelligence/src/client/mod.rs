//! Document Intelligence HTTP client module.
//!
//! [`DiClient`] submits analyze requests and hands back an [`AnalyzePoller`]
//! that follows the long-running operation. [`DocumentAnalyzer`] wraps both
//! steps behind a trait so callers can substitute a scripted analyzer.

mod analyzer;
mod di_client;
mod di_config;
mod poller;

pub use analyzer::{BoxedAnalyzer, DocumentAnalyzer};
pub use di_client::DiClient;
pub use di_config::DiConfig;
pub use poller::AnalyzePoller;
