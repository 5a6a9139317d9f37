use std::sync::Arc;

use super::DiClient;
use crate::Result;
use crate::models::{AnalyzeDocumentRequest, AnalyzeResult, DocumentAnalysisFeature};

/// Type alias for a shared, type-erased analyzer.
pub type BoxedAnalyzer = Arc<dyn DocumentAnalyzer>;

/// Runs a document through an analysis model and waits for the outcome.
#[async_trait::async_trait]
pub trait DocumentAnalyzer: Send + Sync {
    /// Submit the document and resolve once the analysis reached a terminal
    /// state.
    async fn analyze_document(
        &self,
        model_id: &str,
        request: AnalyzeDocumentRequest,
        features: &[DocumentAnalysisFeature],
    ) -> Result<AnalyzeResult>;
}

#[async_trait::async_trait]
impl DocumentAnalyzer for DiClient {
    async fn analyze_document(
        &self,
        model_id: &str,
        request: AnalyzeDocumentRequest,
        features: &[DocumentAnalysisFeature],
    ) -> Result<AnalyzeResult> {
        self.begin_analyze_document(model_id, &request, features)
            .await?
            .result()
            .await
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;
    use crate::DiConfig;

    #[tokio::test]
    async fn client_analyzes_end_to_end() {
        let server = MockServer::start().await;
        let operation = format!("{}/operations/op-9", server.uri());

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(202).insert_header("Operation-Location", operation.as_str()))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "status": "succeeded",
                "analyzeResult": {"content": "", "pages": []}
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = DiClient::new(DiConfig::new(server.uri(), "test-key").unwrap()).unwrap();
        let analyzer: BoxedAnalyzer = Arc::new(client);
        let request = AnalyzeDocumentRequest {
            url_source: "https://example.com/doc.pdf".into(),
        };

        let result = analyzer
            .analyze_document("prebuilt-read", request, &[DocumentAnalysisFeature::Languages])
            .await
            .unwrap();
        assert!(result.pages.is_empty());
        assert!(result.languages.is_empty());
    }
}
