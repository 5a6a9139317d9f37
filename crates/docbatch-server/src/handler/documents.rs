//! Batch analysis of every blob in the configured container.

use axum::extract::State;
use axum::routing::any;
use axum::{Json, Router};

use super::response::Document;
use crate::handler::Result;
use crate::service::{DocumentProcessor, ServiceState};

/// Tracing target for document operations.
const TRACING_TARGET: &str = "docbatch_server::handler::documents";

/// Analyzes the whole container and returns one entry per blob.
///
/// Any method is accepted and the request itself is ignored. A single failed
/// blob fails the request.
#[tracing::instrument(skip_all)]
async fn process_documents(
    State(processor): State<DocumentProcessor>,
) -> Result<Json<Vec<Document>>> {
    tracing::info!(target: TRACING_TARGET, "Batch analysis requested");

    let documents = processor.process_all().await?;
    let documents: Vec<Document> = documents.into_iter().map(Document::from).collect();

    tracing::info!(
        target: TRACING_TARGET,
        documents = documents.len(),
        "Batch analysis completed"
    );

    Ok(Json(documents))
}

/// Returns a [`Router`] with the batch analysis route.
pub fn routes() -> Router<ServiceState> {
    Router::new().route("/api/doc_int", any(process_documents))
}
