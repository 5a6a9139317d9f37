use std::sync::Arc;

use docbatch_intelligence::{
    AnalyzeDocumentRequest, AnalyzeResult, BoxedAnalyzer, DocumentAnalysisFeature,
    DocumentAnalyzer,
};
use docbatch_object::BlobContainer;
use futures::TryStreamExt;

use crate::service::{Error, Result};

/// Tracing target for batch processing.
const TRACING_TARGET: &str = "docbatch_server::service::processor";

/// Features requested for every document.
const DEFAULT_FEATURES: &[DocumentAnalysisFeature] = &[DocumentAnalysisFeature::Languages];

/// Analysis outcome of a single blob.
#[derive(Debug, Clone)]
pub struct ProcessedDocument {
    pub blob_name: String,
    pub result: AnalyzeResult,
}

/// Runs every blob of one container through the analyzer.
///
/// Blobs are handled one at a time, in listing order. The first failure
/// aborts the batch and nothing processed so far is returned.
#[derive(Clone)]
pub struct DocumentProcessor {
    container: BlobContainer,
    analyzer: BoxedAnalyzer,
    model_id: String,
    features: Vec<DocumentAnalysisFeature>,
}

impl DocumentProcessor {
    /// Creates a processor using the `prebuilt-read` model with language detection.
    pub fn new(container: BlobContainer, analyzer: impl DocumentAnalyzer + 'static) -> Self {
        Self::from_boxed(container, Arc::new(analyzer))
    }

    /// Creates a processor from an already shared analyzer.
    pub fn from_boxed(container: BlobContainer, analyzer: BoxedAnalyzer) -> Self {
        Self {
            container,
            analyzer,
            model_id: "prebuilt-read".to_owned(),
            features: DEFAULT_FEATURES.to_vec(),
        }
    }

    /// Sets the analysis model.
    pub fn with_model_id(mut self, model_id: impl Into<String>) -> Self {
        self.model_id = model_id.into();
        self
    }

    /// Returns the analysis model.
    pub fn model_id(&self) -> &str {
        &self.model_id
    }

    /// Returns the container being processed.
    pub fn container(&self) -> &BlobContainer {
        &self.container
    }

    /// Lists, signs and analyzes every blob, returning results in listing order.
    pub async fn process_all(&self) -> Result<Vec<ProcessedDocument>> {
        tracing::info!(
            target: TRACING_TARGET,
            container = self.container.container(),
            model_id = %self.model_id,
            "Processing container"
        );

        let mut names = self.container.list_blob_names();
        let mut documents = Vec::new();

        while let Some(blob_name) = names.try_next().await.map_err(|e| {
            Error::storage(format!(
                "Failed to list blobs in container '{}'",
                self.container.container()
            ))
            .with_source(e)
        })? {
            let result = self.process_one(&blob_name).await?;
            documents.push(ProcessedDocument { blob_name, result });
        }

        tracing::info!(
            target: TRACING_TARGET,
            container = self.container.container(),
            documents = documents.len(),
            "Container processed"
        );

        Ok(documents)
    }

    async fn process_one(&self, blob_name: &str) -> Result<AnalyzeResult> {
        let signed = self
            .container
            .signed_read_url(blob_name)
            .await
            .map_err(|e| {
                Error::storage(format!("Failed to sign URL for blob '{blob_name}'")).with_source(e)
            })?;

        tracing::debug!(
            target: TRACING_TARGET,
            blob = blob_name,
            expires_at = %signed.expires_at(),
            "Submitting blob for analysis"
        );

        let request = AnalyzeDocumentRequest::from_url(signed.url());
        let result = self
            .analyzer
            .analyze_document(&self.model_id, request, &self.features)
            .await
            .map_err(|e| {
                Error::analysis(format!("Failed to analyze blob '{blob_name}'")).with_source(e)
            })?;

        tracing::debug!(
            target: TRACING_TARGET,
            blob = blob_name,
            pages = result.pages.len(),
            paragraphs = result.paragraphs.len(),
            languages = result.languages.len(),
            "Blob analyzed"
        );

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;
    use crate::service::mock::{ScriptedAnalyzer, seeded_container};

    #[tokio::test]
    async fn test_processes_in_listing_order() {
        let storage = seeded_container(&["b.pdf", "a.pdf", "c/d.png"]).await;
        let analyzer = ScriptedAnalyzer::new();
        let processor = DocumentProcessor::new(storage.container(), analyzer.clone());

        let documents = processor.process_all().await.unwrap();
        let names: Vec<_> = documents.iter().map(|d| d.blob_name.as_str()).collect();
        assert_eq!(names, ["a.pdf", "b.pdf", "c/d.png"]);

        let calls = analyzer.calls();
        assert_eq!(calls.len(), 3);
        for call in &calls {
            assert_eq!(call.model_id, "prebuilt-read");
            assert_eq!(call.features, [DocumentAnalysisFeature::Languages]);
        }
    }

    #[tokio::test]
    async fn test_empty_container() {
        let storage = seeded_container(&[]).await;
        let analyzer = ScriptedAnalyzer::new();
        let processor = DocumentProcessor::new(storage.container(), analyzer.clone());

        assert!(processor.process_all().await.unwrap().is_empty());
        assert!(analyzer.calls().is_empty());
    }

    #[tokio::test]
    async fn test_signed_urls_are_read_only_and_distinct() {
        let storage = seeded_container(&["a.pdf", "b.pdf"]).await;
        let analyzer = ScriptedAnalyzer::new();
        DocumentProcessor::new(storage.container(), analyzer.clone())
            .process_all()
            .await
            .unwrap();

        let calls = analyzer.calls();
        assert_ne!(calls[0].url, calls[1].url);
        for call in &calls {
            let url = url::Url::parse(&call.url).unwrap();
            let sp = url.query_pairs().find(|(k, _)| k == "sp").map(|(_, v)| v.into_owned());
            assert_eq!(sp.as_deref(), Some("r"));
            assert!(url.query_pairs().any(|(k, _)| k == "sig"));
        }
    }

    #[tokio::test]
    async fn test_failure_aborts_batch() {
        let storage = seeded_container(&["a.pdf", "b.pdf", "c.pdf"]).await;
        let analyzer = ScriptedAnalyzer::new().fail_on("b.pdf");
        let processor = DocumentProcessor::new(storage.container(), analyzer.clone());

        let err = processor.process_all().await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Analysis);
        assert!(err.message().contains("b.pdf"));
        // c.pdf is never submitted
        assert_eq!(analyzer.calls().len(), 2);
    }

    #[tokio::test]
    async fn test_blob_names_are_reported_verbatim() {
        let storage = seeded_container(&["scans//b.pdf", "notes/", "./c.pdf"]).await;
        let analyzer = ScriptedAnalyzer::new();
        let processor = DocumentProcessor::new(storage.container(), analyzer.clone());

        let documents = processor.process_all().await.unwrap();
        let names: Vec<_> = documents.iter().map(|d| d.blob_name.as_str()).collect();
        assert_eq!(names, ["./c.pdf", "notes/", "scans//b.pdf"]);
        assert_eq!(analyzer.calls().len(), 3);
    }

    #[tokio::test]
    async fn test_listing_failure_is_a_storage_error() {
        let endpoint = wiremock::MockServer::start().await;
        let conn = docbatch_object::ConnectionString::parse(&format!(
            "AccountName=acct;AccountKey=ZG9jYmF0Y2gtdGVzdC1rZXk=;BlobEndpoint={}",
            endpoint.uri()
        ))
        .unwrap();
        let container = BlobContainer::connect(&conn, "docs").unwrap();
        let analyzer = ScriptedAnalyzer::new();

        let err = DocumentProcessor::new(container, analyzer.clone())
            .process_all()
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Storage);
        assert!(err.message().contains("docs"));
        assert!(analyzer.calls().is_empty());
    }

    #[tokio::test]
    async fn test_custom_model() {
        let storage = seeded_container(&["a.pdf"]).await;
        let analyzer = ScriptedAnalyzer::new();
        let processor =
            DocumentProcessor::new(storage.container(), analyzer.clone()).with_model_id("prebuilt-layout");

        processor.process_all().await.unwrap();
        assert_eq!(analyzer.calls()[0].model_id, "prebuilt-layout");
    }
}
