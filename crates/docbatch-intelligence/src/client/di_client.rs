//! Document Intelligence HTTP client implementation.

use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::{Client, Response, StatusCode};
use tracing::{debug, info, warn};
use url::Url;

use super::{AnalyzePoller, DiConfig};
use crate::models::{AnalyzeDocumentRequest, DocumentAnalysisFeature, ErrorResponse};
use crate::{Error, Result, TRACING_TARGET_CLIENT};

/// Header carrying the resource key.
const SUBSCRIPTION_KEY_HEADER: &str = "ocp-apim-subscription-key";

/// Header carrying the URL of a started long-running operation.
const OPERATION_LOCATION_HEADER: &str = "operation-location";

/// HTTP client for the Document Intelligence REST API.
///
/// The underlying [`reqwest::Client`] pools connections, so clone this
/// instead of building a new one per request.
///
/// # Examples
///
/// ```ignore
/// use docbatch_intelligence::{AnalyzeDocumentRequest, DiClient, DiConfig};
///
/// let client = DiClient::new(DiConfig::new(endpoint, api_key)?)?;
/// let poller = client
///     .begin_analyze_document("prebuilt-read", &AnalyzeDocumentRequest::from_url(&url), &[])
///     .await?;
/// let result = poller.result().await?;
/// ```
#[derive(Debug, Clone)]
pub struct DiClient {
    /// HTTP client
    http_client: Client,

    /// Configuration
    config: DiConfig,
}

impl DiClient {
    /// Create a new client with the given configuration.
    pub fn new(config: DiConfig) -> Result<Self> {
        let mut api_key = HeaderValue::from_str(config.api_key())
            .map_err(|e| Error::config(format!("Invalid API key: {e}")))?;
        api_key.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(SUBSCRIPTION_KEY_HEADER, api_key);

        let http_client = Client::builder()
            .timeout(config.timeout())
            .user_agent(config.user_agent())
            .default_headers(headers)
            .build()
            .map_err(|e| Error::config(format!("Failed to build HTTP client: {e}")))?;

        debug!(
            target: TRACING_TARGET_CLIENT,
            endpoint = %config.endpoint(),
            api_version = config.api_version(),
            timeout = ?config.timeout(),
            "Document Intelligence client initialized"
        );

        Ok(Self {
            http_client,
            config,
        })
    }

    /// Get a reference to the client configuration.
    pub fn config(&self) -> &DiConfig {
        &self.config
    }

    /// URL of the analyze action for `model_id`.
    ///
    /// The `{model}:analyze` segment is pushed as-is, since joining a relative
    /// reference containing a colon would parse it as a URL scheme.
    pub fn analyze_url(
        &self,
        model_id: &str,
        features: &[DocumentAnalysisFeature],
    ) -> Result<Url> {
        if model_id.is_empty() {
            return Err(Error::config("Model id must not be empty"));
        }

        let mut url = self.config.endpoint().clone();
        url.set_query(None);
        url.path_segments_mut()
            .map_err(|()| Error::config("Endpoint cannot be a base URL"))?
            .pop_if_empty()
            .extend(["documentintelligence", "documentModels"])
            .push(&format!("{model_id}:analyze"));

        {
            let mut query = url.query_pairs_mut();
            query.append_pair("api-version", self.config.api_version());
            if !features.is_empty() {
                query.append_pair("features", &DocumentAnalysisFeature::join(features));
            }
        }

        Ok(url)
    }

    /// Start analyzing a document and return a poller for the operation.
    ///
    /// The service must answer `202 Accepted` with an `Operation-Location`
    /// header; anything else is an error.
    pub async fn begin_analyze_document(
        &self,
        model_id: &str,
        request: &AnalyzeDocumentRequest,
        features: &[DocumentAnalysisFeature],
    ) -> Result<AnalyzePoller> {
        let url = self.analyze_url(model_id, features)?;

        info!(
            target: TRACING_TARGET_CLIENT,
            model_id,
            features = %DocumentAnalysisFeature::join(features),
            "Submitting document for analysis"
        );

        let response = self.http_client.post(url).json(request).send().await?;
        let status = response.status();

        if status != StatusCode::ACCEPTED {
            if status.is_success() {
                return Err(Error::invalid_response(
                    format!("Expected 202 Accepted, got {status}"),
                    response.text().await.ok(),
                ));
            }
            return Err(error_from_response(response).await);
        }

        let operation_url = response
            .headers()
            .get(OPERATION_LOCATION_HEADER)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| {
                Error::invalid_response("Missing Operation-Location header", None)
            })?;
        let operation_url = Url::parse(operation_url).map_err(|e| {
            Error::invalid_response(format!("Invalid Operation-Location header: {e}"), None)
        })?;

        debug!(
            target: TRACING_TARGET_CLIENT,
            operation = %operation_url.path(),
            "Analysis accepted"
        );

        Ok(AnalyzePoller::new(
            self.http_client.clone(),
            operation_url,
            self.config.poll_interval(),
        ))
    }
}

/// Turn a non-success response into an [`Error::Api`].
///
/// Uses the service's `{"error": {...}}` envelope when the body has one,
/// otherwise the raw body.
pub(crate) async fn error_from_response(response: Response) -> Error {
    let status = response.status();
    let body = response.text().await.ok().filter(|b| !b.trim().is_empty());

    let error = match body.as_deref().map(serde_json::from_str::<ErrorResponse>) {
        Some(Ok(envelope)) => {
            let (code, message) = envelope.error.most_specific();
            Error::api(status.as_u16(), message, Some(code.to_owned()))
        }
        Some(Err(_)) => Error::api(status.as_u16(), body.unwrap_or_default(), None),
        None => Error::api(status.as_u16(), status.to_string(), None),
    };

    warn!(
        target: TRACING_TARGET_CLIENT,
        status = status.as_u16(),
        code = error.service_code().unwrap_or_default(),
        error = %error,
        "Request rejected by Document Intelligence"
    );

    error
}
