use serde::{Deserialize, Serialize};

/// Outcome of a successful analysis.
///
/// Only the parts produced by the read model are typed. Collections missing
/// from the response deserialize as empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeResult {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_id: Option<String>,
    /// Concatenated text of the whole document.
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub pages: Vec<DocumentPage>,
    #[serde(default)]
    pub paragraphs: Vec<DocumentParagraph>,
    /// Only populated when the `languages` feature was requested.
    #[serde(default)]
    pub languages: Vec<DocumentLanguage>,
}

/// A language detected in part of the content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentLanguage {
    /// BCP-47 tag, e.g. `en` or `zh-Hans`.
    pub locale: String,
    #[serde(default)]
    pub spans: Vec<DocumentSpan>,
    pub confidence: f64,
}

/// Unit of page dimensions and polygon coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LengthUnit {
    /// Images: coordinates in pixels.
    Pixel,
    /// PDF and TIFF: coordinates in inches.
    Inch,
}

/// A single page, or image, of the analyzed document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentPage {
    /// 1-based page number.
    pub page_number: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub angle: Option<f64>,
    #[serde(default)]
    pub width: Option<f64>,
    #[serde(default)]
    pub height: Option<f64>,
    #[serde(default)]
    pub unit: Option<LengthUnit>,
    #[serde(default)]
    pub spans: Vec<DocumentSpan>,
    #[serde(default)]
    pub words: Vec<DocumentWord>,
    #[serde(default)]
    pub lines: Vec<DocumentLine>,
}

/// A word recognized on a page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentWord {
    pub content: String,
    /// Flattened `[x1, y1, x2, y2, ...]` outline, clockwise from top-left.
    #[serde(default)]
    pub polygon: Vec<f64>,
    pub span: DocumentSpan,
    pub confidence: f64,
}

/// A line of adjacent words.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentLine {
    pub content: String,
    #[serde(default)]
    pub polygon: Vec<f64>,
    #[serde(default)]
    pub spans: Vec<DocumentSpan>,
}

/// A block of text forming a logical unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentParagraph {
    /// Semantic role such as `title` or `pageHeader`, when recognized.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    pub content: String,
    #[serde(default)]
    pub bounding_regions: Vec<BoundingRegion>,
    #[serde(default)]
    pub spans: Vec<DocumentSpan>,
}

/// Where on which page an element appears.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoundingRegion {
    pub page_number: u32,
    pub polygon: Vec<f64>,
}

/// Character range in [`AnalyzeResult::content`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DocumentSpan {
    pub offset: usize,
    pub length: usize,
}
