//! Service error to HTTP error conversion.

use super::http_error::{Error as HttpError, ErrorKind};

/// Tracing target for service error conversions.
const TRACING_TARGET: &str = "docbatch_server::handler::service";

impl From<crate::Error> for HttpError {
    fn from(error: crate::Error) -> Self {
        use crate::ErrorKind as ServiceErrorKind;

        let chain = error.chain();
        match error.kind() {
            ServiceErrorKind::Config | ServiceErrorKind::Internal => {
                tracing::error!(
                    target: TRACING_TARGET,
                    error = %chain,
                    error_kind = %error.kind(),
                    "Service misconfigured"
                );
            }
            ServiceErrorKind::Storage | ServiceErrorKind::Analysis => {
                tracing::error!(
                    target: TRACING_TARGET,
                    error = %chain,
                    error_kind = %error.kind(),
                    "Document processing failed"
                );
            }
        }

        ErrorKind::ProcessingFailed.with_context(chain)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_chain_as_context() {
        let source = std::io::Error::other("connection reset");
        let error = crate::Error::storage("listing failed").with_source(source);

        let http = HttpError::from(error);
        assert_eq!(http.kind(), ErrorKind::ProcessingFailed);
        assert_eq!(
            http.context(),
            Some("storage error: listing failed: connection reset")
        );
    }
}
