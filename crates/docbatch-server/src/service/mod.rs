//! Application state and dependency injection.

mod config;
#[cfg(test)]
pub(crate) mod mock;
mod processor;

pub use crate::service::config::ServiceConfig;
pub use crate::service::processor::{DocumentProcessor, ProcessedDocument};
// Re-export error types from crate root for convenience
pub use crate::{Error, Result};

/// Tracing target for state construction.
const TRACING_TARGET: &str = "docbatch_server::service";

/// Application state.
///
/// Used for the [`State`] extraction (dependency injection).
///
/// [`State`]: axum::extract::State
#[must_use = "state does nothing unless you use it"]
#[derive(Clone)]
pub struct ServiceState {
    pub processor: DocumentProcessor,
}

impl ServiceState {
    /// Wraps an already assembled processor.
    pub fn new(processor: DocumentProcessor) -> Self {
        Self { processor }
    }

    /// Validates the configuration and builds both clients.
    ///
    /// Neither client talks to the network here; the first request does.
    pub fn from_config(config: &ServiceConfig) -> Result<Self> {
        config.validate()?;

        let container = config.connect_container()?;
        let analyzer = config.connect_analyzer()?;
        let processor =
            DocumentProcessor::new(container, analyzer).with_model_id(&config.analysis_model_id);

        tracing::info!(
            target: TRACING_TARGET,
            container = processor.container().container(),
            model_id = processor.model_id(),
            "Service state initialized"
        );

        Ok(Self::new(processor))
    }
}

macro_rules! impl_di {
    ($($f:ident: $t:ty),+) => {$(
        impl axum::extract::FromRef<ServiceState> for $t {
            fn from_ref(state: &ServiceState) -> Self {
                state.$f.clone()
            }
        }
    )+};
}

impl_di!(processor: DocumentProcessor);
