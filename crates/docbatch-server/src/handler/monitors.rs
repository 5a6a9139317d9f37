//! Liveness endpoint.

use axum::routing::get;
use axum::{Json, Router};

use super::response::MonitorStatus;
use crate::service::ServiceState;

/// Tracing target for monitor operations.
const TRACING_TARGET: &str = "docbatch_server::handler::monitors";

/// Reports that the process is up. Remote services are not contacted.
#[tracing::instrument(skip_all)]
async fn health_status() -> Json<MonitorStatus> {
    tracing::debug!(target: TRACING_TARGET, "Health status check requested");
    Json(MonitorStatus::default())
}

/// Returns a [`Router`] with all health monitoring routes.
pub fn routes() -> Router<ServiceState> {
    Router::new().route("/health", get(health_status))
}

#[cfg(test)]
mod tests {
    use jiff::{SignedDuration, Timestamp};

    use super::*;
    use crate::handler::ServiceStatus;
    use crate::handler::test::{create_test_server_with_state, create_test_state};
    use crate::service::mock::ScriptedAnalyzer;

    #[tokio::test]
    async fn test_health_status_endpoint() -> anyhow::Result<()> {
        let analyzer = ScriptedAnalyzer::new();
        let state = create_test_state(&[], analyzer.clone()).await;
        let server = create_test_server_with_state(routes(), state)?;

        let response = server.get("/health").await;
        response.assert_status_ok();

        let status = response.json::<MonitorStatus>();
        assert_eq!(status.status, ServiceStatus::Ok);
        assert_eq!(status.version, env!("CARGO_PKG_VERSION"));

        let age = Timestamp::now().duration_since(status.checked_at);
        assert!(age < SignedDuration::from_secs(60));

        // liveness never triggers analysis
        assert!(analyzer.calls().is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_health_rejects_post() -> anyhow::Result<()> {
        let state = create_test_state(&[], ScriptedAnalyzer::new()).await;
        let server = create_test_server_with_state(routes(), state)?;

        let response = server.post("/health").await;
        response.assert_status(axum::http::StatusCode::METHOD_NOT_ALLOWED);
        Ok(())
    }
}
