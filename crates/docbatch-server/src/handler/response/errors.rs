use std::borrow::Cow;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// Tracing target for rendered error responses.
const TRACING_TARGET: &str = "docbatch_server::handler::response";

/// Message returned for every failed batch.
pub const PROCESSING_FAILED_MESSAGE: &str = "An error occurred while processing the documents.";

/// Plain-text HTTP error response.
///
/// Only `message` reaches the client. `context` is for the logs.
#[must_use = "error responses do nothing unless serialized"]
#[derive(Debug, Clone)]
pub struct ErrorResponse {
    /// The error name/type identifier
    pub name: &'static str,
    /// Message safe for client display
    pub message: &'static str,
    /// Internal context for debugging, never exposed to the client
    pub context: Option<Cow<'static, str>>,
    /// HTTP status code
    pub status: StatusCode,
}

impl ErrorResponse {
    pub const INTERNAL_SERVER_ERROR: Self = Self::new(
        "internal_server_error",
        PROCESSING_FAILED_MESSAGE,
        StatusCode::INTERNAL_SERVER_ERROR,
    );
    pub const NOT_FOUND: Self =
        Self::new("not_found", "Resource not found.", StatusCode::NOT_FOUND);
    pub const PROCESSING_FAILED: Self = Self::new(
        "processing_failed",
        PROCESSING_FAILED_MESSAGE,
        StatusCode::INTERNAL_SERVER_ERROR,
    );
    pub const TIMEOUT: Self = Self::new(
        "timeout",
        PROCESSING_FAILED_MESSAGE,
        StatusCode::INTERNAL_SERVER_ERROR,
    );

    /// Creates a response template.
    pub const fn new(name: &'static str, message: &'static str, status: StatusCode) -> Self {
        Self {
            name,
            message,
            context: None,
            status,
        }
    }

    /// Appends internal context, separated by `; ` from any existing context.
    pub fn with_context(mut self, context: impl Into<Cow<'static, str>>) -> Self {
        let context = context.into();
        self.context = Some(match self.context.take() {
            Some(existing) => Cow::Owned(format!("{existing}; {context}")),
            None => context,
        });
        self
    }
}

impl Default for ErrorResponse {
    #[inline]
    fn default() -> Self {
        Self::INTERNAL_SERVER_ERROR
    }
}

impl IntoResponse for ErrorResponse {
    fn into_response(self) -> Response {
        // The cause chain is logged where the error is converted.
        tracing::debug!(
            target: TRACING_TARGET,
            status = %self.status,
            name = %self.name,
            "HTTP error response"
        );
        (self.status, self.message).into_response()
    }
}

#[cfg(test)]
mod tests {
    use std::fmt::{self, Write as _};
    use std::sync::{Arc, Mutex};

    use axum::http::header::CONTENT_TYPE;
    use tracing::field::Field;
    use tracing::{Event, Level, Subscriber};
    use tracing_subscriber::layer::{Context, Layer, SubscriberExt};

    use super::*;

    /// Records target, level and fields of every event.
    #[derive(Clone, Default)]
    struct CapturedEvents(Arc<Mutex<Vec<(String, Level, String)>>>);

    impl<S: Subscriber> Layer<S> for CapturedEvents {
        fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
            let mut fields = String::new();
            event.record(&mut |field: &Field, value: &dyn fmt::Debug| {
                let _ = write!(fields, "{}={value:?} ", field.name());
            });
            let metadata = event.metadata();
            self.0.lock().unwrap().push((
                metadata.target().to_owned(),
                *metadata.level(),
                fields,
            ));
        }
    }

    #[test]
    fn context_is_merged() {
        let response = ErrorResponse::PROCESSING_FAILED
            .with_context("listing failed")
            .with_context("container docs");

        assert_eq!(
            response.context.as_deref(),
            Some("listing failed; container docs")
        );
    }

    #[test]
    fn renders_as_plain_text() {
        let response = ErrorResponse::PROCESSING_FAILED
            .with_context("secret detail")
            .into_response();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let content_type = response.headers().get(CONTENT_TYPE).unwrap();
        assert!(content_type.to_str().unwrap().starts_with("text/plain"));
    }

    #[test]
    fn rendering_logs_once_without_context() {
        let captured = CapturedEvents::default();
        let subscriber = tracing_subscriber::registry().with(captured.clone());

        tracing::subscriber::with_default(subscriber, || {
            let _ = ErrorResponse::PROCESSING_FAILED
                .with_context("storage error: listing failed")
                .into_response();
        });

        let events = captured.0.lock().unwrap();
        assert_eq!(events.len(), 1);
        let (target, level, fields) = &events[0];
        assert_eq!(target, TRACING_TARGET);
        assert_eq!(*level, Level::DEBUG);
        assert!(!fields.contains("listing failed"));
    }
}
