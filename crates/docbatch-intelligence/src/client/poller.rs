//! Polling of long-running analyze operations.

use std::time::Duration;

use reqwest::Client;
use tracing::{debug, warn};
use url::Url;

use super::di_client::error_from_response;
use crate::models::{AnalyzeOperation, AnalyzeResult, OperationStatus};
use crate::{Error, Result, TRACING_TARGET_POLLER, parse_retry_after};

/// Handle to an analyze operation started by
/// [`DiClient::begin_analyze_document`](super::DiClient::begin_analyze_document).
///
/// Polling is driven by [`result`](Self::result). Between polls the poller
/// sleeps for the service's `Retry-After` when given, else for the configured
/// poll interval. The poll interval is also the lower bound for `Retry-After`.
#[derive(Debug, Clone)]
pub struct AnalyzePoller {
    http_client: Client,
    operation_url: Url,
    poll_interval: Duration,
}

impl AnalyzePoller {
    pub(crate) fn new(http_client: Client, operation_url: Url, poll_interval: Duration) -> Self {
        Self {
            http_client,
            operation_url,
            poll_interval,
        }
    }

    /// URL polled for the operation status.
    pub fn operation_url(&self) -> &Url {
        &self.operation_url
    }

    /// Fetch the current state of the operation once.
    ///
    /// Also returns the service's suggested delay before the next poll.
    pub async fn poll(&self) -> Result<(AnalyzeOperation, Option<Duration>)> {
        let response = self
            .http_client
            .get(self.operation_url.clone())
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(error_from_response(response).await);
        }

        let retry_after = parse_retry_after(response.headers());
        let body = response.text().await?;
        let operation = serde_json::from_str::<AnalyzeOperation>(&body).map_err(|e| {
            Error::invalid_response(format!("Failed to parse operation status: {e}"), Some(body))
        })?;

        Ok((operation, retry_after))
    }

    /// Wait until the operation finishes and return its result.
    ///
    /// Fails with [`Error::AnalysisFailed`] if the operation ends `failed` or
    /// `canceled`. There is no overall deadline; each request is bounded by
    /// the client timeout.
    pub async fn result(self) -> Result<AnalyzeResult> {
        let mut polls: u32 = 0;

        loop {
            let (operation, retry_after) = self.poll().await?;
            polls += 1;

            match operation.status {
                OperationStatus::Succeeded => {
                    debug!(
                        target: TRACING_TARGET_POLLER,
                        polls,
                        "Analysis succeeded"
                    );
                    return operation.analyze_result.ok_or_else(|| {
                        Error::invalid_response("Succeeded operation has no analyzeResult", None)
                    });
                }
                status @ (OperationStatus::Failed | OperationStatus::Canceled) => {
                    let (code, message) = match &operation.error {
                        Some(error) => {
                            let (code, message) = error.most_specific();
                            (Some(code.to_owned()), message.to_owned())
                        }
                        None => (None, format!("operation {status}")),
                    };
                    warn!(
                        target: TRACING_TARGET_POLLER,
                        %status,
                        code = code.as_deref().unwrap_or_default(),
                        message = %message,
                        polls,
                        "Analysis did not succeed"
                    );
                    return Err(Error::analysis_failed(status, code, message));
                }
                OperationStatus::NotStarted | OperationStatus::Running => {
                    let delay = retry_after
                        .map_or(self.poll_interval, |d| d.max(self.poll_interval));
                    debug!(
                        target: TRACING_TARGET_POLLER,
                        status = %operation.status,
                        delay_ms = delay.as_millis() as u64,
                        polls,
                        "Analysis in progress"
                    );
                    tokio::time::sleep(delay).await;
                }
            }
        }
    }
}
