//! Wire models of the Document Intelligence REST API.
//!
//! Field names follow the service's camelCase JSON. Collections the service
//! omits when empty default to empty vectors.

mod analyze_result;
mod feature;
mod operation;
mod request;

pub use analyze_result::{
    AnalyzeResult, BoundingRegion, DocumentLanguage, DocumentLine, DocumentPage,
    DocumentParagraph, DocumentSpan, DocumentWord, LengthUnit,
};
pub use feature::DocumentAnalysisFeature;
pub use operation::{AnalyzeOperation, ErrorResponse, OperationStatus, ServiceError};
pub use request::AnalyzeDocumentRequest;
