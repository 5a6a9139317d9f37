use serde::{Deserialize, Serialize};
use url::Url;

/// Body of an analyze request that points the service at a document URL.
///
/// The URL must be reachable by the service, typically through a SAS token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeDocumentRequest {
    /// Publicly reachable document URL.
    pub url_source: String,
}

impl AnalyzeDocumentRequest {
    /// Request analysis of the document behind `url`.
    pub fn from_url(url: &Url) -> Self {
        Self {
            url_source: url.to_string(),
        }
    }
}
