//! All `axum::`[`Router`]s with related `axum::`[`Handler`]s.
//!
//! # Usage Example
//!
//! ```rust,no_run
//! use docbatch_server::handler::routes;
//! use docbatch_server::service::{ServiceConfig, ServiceState};
//!
//! # fn example() -> anyhow::Result<()> {
//! let config = ServiceConfig::new(
//!     "https://example.cognitiveservices.azure.com",
//!     "api-key",
//!     "UseDevelopmentStorage=true",
//!     "documents",
//! );
//! let state = ServiceState::from_config(&config)?;
//! let router: axum::Router = routes().with_state(state);
//! # let _ = router;
//! # Ok(())
//! # }
//! ```
//!
//! [`Router`]: axum::routing::Router
//! [`Handler`]: axum::handler::Handler

mod documents;
mod error;
mod monitors;
mod response;

use axum::Router;
use axum::response::{IntoResponse, Response};

pub use crate::handler::error::{Error, ErrorKind, Result};
pub use crate::handler::response::{
    Document, ErrorResponse, Language, MonitorStatus, PROCESSING_FAILED_MESSAGE, Page, Paragraph,
    ServiceStatus, Word,
};
use crate::service::ServiceState;

#[inline]
async fn handler() -> Response {
    ErrorKind::NotFound.into_response()
}

/// Returns a [`Router`] with all routes and the not-found fallback.
pub fn routes() -> Router<ServiceState> {
    Router::new()
        .merge(documents::routes())
        .merge(monitors::routes())
        .fallback(handler)
}

#[cfg(test)]
mod test {
    use std::ops::Deref;

    use axum::Router;
    use axum_test::TestServer;
    use wiremock::MockServer;

    use crate::handler::routes;
    use crate::service::mock::{ScriptedAnalyzer, seeded_container};
    use crate::service::{DocumentProcessor, ServiceState};

    /// Service state together with the blob endpoint it lists from.
    pub struct TestState {
        pub state: ServiceState,
        storage: MockServer,
    }

    /// A [`TestServer`] that keeps its blob endpoint alive.
    pub struct TestApp {
        server: TestServer,
        _storage: MockServer,
    }

    impl Deref for TestApp {
        type Target = TestServer;

        fn deref(&self) -> &Self::Target {
            &self.server
        }
    }

    /// Returns the state over a local container holding `blobs`.
    pub async fn create_test_state(blobs: &[&str], analyzer: ScriptedAnalyzer) -> TestState {
        let seeded = seeded_container(blobs).await;
        let state = ServiceState::new(DocumentProcessor::new(seeded.container(), analyzer));
        TestState {
            state,
            storage: seeded.into_storage(),
        }
    }

    /// Returns a new [`TestApp`] with the given router and state.
    pub fn create_test_server_with_state(
        router: Router<ServiceState>,
        state: TestState,
    ) -> anyhow::Result<TestApp> {
        let app = router.with_state(state.state);
        let server = TestServer::new(app)?;
        Ok(TestApp {
            server,
            _storage: state.storage,
        })
    }

    /// Returns a new [`TestApp`] with the default router.
    pub async fn create_test_server(
        blobs: &[&str],
        analyzer: ScriptedAnalyzer,
    ) -> anyhow::Result<TestApp> {
        let state = create_test_state(blobs, analyzer).await;
        create_test_server_with_state(routes(), state)
    }

    #[tokio::test]
    async fn handlers() -> anyhow::Result<()> {
        let server = create_test_server(&[], ScriptedAnalyzer::new()).await?;
        assert!(server.is_running());
        Ok(())
    }

    #[tokio::test]
    async fn unknown_route_is_not_found() -> anyhow::Result<()> {
        let server = create_test_server(&[], ScriptedAnalyzer::new()).await?;

        let response = server.get("/api/unknown").await;
        response.assert_status_not_found();
        response.assert_text("Resource not found.");
        Ok(())
    }
}
