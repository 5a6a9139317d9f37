//! Monitor response types.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

/// Liveness of the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceStatus {
    Ok,
}

/// System monitoring status response.
#[must_use]
#[derive(Debug, Serialize, Deserialize)]
pub struct MonitorStatus {
    /// Overall process status.
    pub status: ServiceStatus,
    /// Application version.
    pub version: String,
    /// Timestamp when this status was generated.
    pub checked_at: Timestamp,
}

impl Default for MonitorStatus {
    fn default() -> Self {
        Self {
            status: ServiceStatus::Ok,
            version: env!("CARGO_PKG_VERSION").to_string(),
            checked_at: Timestamp::now(),
        }
    }
}
