//! Test doubles for the storage and analysis seams.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use docbatch_intelligence::{
    AnalyzeDocumentRequest, AnalyzeResult, BoundingRegion, DocumentAnalysisFeature,
    DocumentAnalyzer, DocumentLanguage, DocumentPage, DocumentParagraph, DocumentSpan,
    DocumentWord, Error, LengthUnit, OperationStatus, Result,
};
use docbatch_object::{BlobContainer, ConnectionString};
use url::Url;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Container name used by [`seeded_container`].
pub const CONTAINER: &str = "docs";

const CONNECTION_STRING: &str = "AccountName=acct;AccountKey=ZG9jYmF0Y2gtdGVzdC1rZXk=";

/// A container served by a local blob endpoint.
///
/// The endpoint stops answering once this value is dropped.
pub struct SeededContainer {
    storage: MockServer,
    container: BlobContainer,
}

impl SeededContainer {
    /// Handle to the seeded container.
    pub fn container(&self) -> BlobContainer {
        self.container.clone()
    }

    /// The local blob endpoint.
    pub fn into_storage(self) -> MockServer {
        self.storage
    }
}

/// A container listing `names` in lexicographic order, as the service does.
pub async fn seeded_container(names: &[&str]) -> SeededContainer {
    let mut names = names.to_vec();
    names.sort_unstable();

    let storage = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(format!("/{CONTAINER}")))
        .and(query_param("restype", "container"))
        .and(query_param("comp", "list"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "application/xml")
                .set_body_string(listing_xml(&names)),
        )
        .mount(&storage)
        .await;

    let conn = ConnectionString::parse(&format!(
        "{CONNECTION_STRING};BlobEndpoint={}",
        storage.uri()
    ))
    .unwrap();
    let container = BlobContainer::connect(&conn, CONTAINER).unwrap();

    SeededContainer { storage, container }
}

fn listing_xml(names: &[&str]) -> String {
    let blobs: String = names
        .iter()
        .map(|name| {
            format!(
                "<Blob><Name>{name}</Name><Properties>\
                 <Creation-Time>Wed, 01 Jan 2025 00:00:00 GMT</Creation-Time>\
                 <Last-Modified>Wed, 01 Jan 2025 00:00:00 GMT</Last-Modified>\
                 <Etag>0x8DD2A1B2C3D4E5F</Etag>\
                 <Content-Length>4</Content-Length>\
                 <Content-Type>application/pdf</Content-Type>\
                 <BlobType>BlockBlob</BlobType>\
                 <AccessTier>Hot</AccessTier>\
                 <AccessTierInferred>true</AccessTierInferred>\
                 <LeaseStatus>unlocked</LeaseStatus>\
                 <LeaseState>available</LeaseState>\
                 <ServerEncrypted>true</ServerEncrypted>\
                 </Properties></Blob>"
            )
        })
        .collect();
    format!(
        "<?xml version=\"1.0\" encoding=\"utf-8\"?>\
         <EnumerationResults ContainerName=\"{CONTAINER}\">\
         <Blobs>{blobs}</Blobs></EnumerationResults>"
    )
}

/// One call received by [`ScriptedAnalyzer`].
#[derive(Debug, Clone)]
pub struct AnalyzeCall {
    pub model_id: String,
    pub url: String,
    pub features: Vec<DocumentAnalysisFeature>,
}

/// Analyzer that answers from a script instead of the network.
///
/// Blobs are recognized by the last path segment of the submitted URL.
/// Unscripted blobs get [`sample_result`].
#[derive(Clone, Default)]
pub struct ScriptedAnalyzer {
    calls: Arc<Mutex<Vec<AnalyzeCall>>>,
    failures: HashSet<String>,
    results: HashMap<String, AnalyzeResult>,
}

impl ScriptedAnalyzer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reports a failed operation for `blob`.
    pub fn fail_on(mut self, blob: &str) -> Self {
        self.failures.insert(blob.to_owned());
        self
    }

    /// Answers `result` for `blob`.
    pub fn with_result(mut self, blob: &str, result: AnalyzeResult) -> Self {
        self.results.insert(blob.to_owned(), result);
        self
    }

    /// Calls received so far, in order.
    pub fn calls(&self) -> Vec<AnalyzeCall> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl DocumentAnalyzer for ScriptedAnalyzer {
    async fn analyze_document(
        &self,
        model_id: &str,
        request: AnalyzeDocumentRequest,
        features: &[DocumentAnalysisFeature],
    ) -> Result<AnalyzeResult> {
        self.calls.lock().unwrap().push(AnalyzeCall {
            model_id: model_id.to_owned(),
            url: request.url_source.clone(),
            features: features.to_vec(),
        });

        let url = Url::parse(&request.url_source).unwrap();
        let blob = url.path_segments().and_then(|mut s| s.next_back()).unwrap_or_default();

        if self.failures.contains(blob) {
            return Err(Error::analysis_failed(
                OperationStatus::Failed,
                Some("InvalidContent".into()),
                "The file is corrupted or format is unsupported.",
            ));
        }

        Ok(self
            .results
            .get(blob)
            .cloned()
            .unwrap_or_else(|| sample_result(blob)))
    }
}

/// A one-page, one-paragraph English result whose single word is `text`.
pub fn sample_result(text: &str) -> AnalyzeResult {
    let span = DocumentSpan {
        offset: 0,
        length: text.len(),
    };

    AnalyzeResult {
        api_version: Some("2024-11-30".into()),
        model_id: Some("prebuilt-read".into()),
        content: text.to_owned(),
        pages: vec![DocumentPage {
            page_number: 1,
            angle: Some(0.0),
            width: Some(8.5),
            height: Some(11.0),
            unit: Some(LengthUnit::Inch),
            spans: vec![span],
            words: vec![DocumentWord {
                content: text.to_owned(),
                polygon: vec![1.0, 1.0, 2.0, 1.0, 2.0, 1.5, 1.0, 1.5],
                span,
                confidence: 0.99,
            }],
            lines: Vec::new(),
        }],
        paragraphs: vec![DocumentParagraph {
            role: None,
            content: text.to_owned(),
            bounding_regions: vec![BoundingRegion {
                page_number: 1,
                polygon: vec![1.0, 1.0, 2.0, 1.0, 2.0, 1.5, 1.0, 1.5],
            }],
            spans: vec![span],
        }],
        languages: vec![DocumentLanguage {
            locale: "en".into(),
            spans: vec![span],
            confidence: 0.95,
        }],
    }
}
