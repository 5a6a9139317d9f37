//! Flattened per-document analysis output.
//!
//! Only the fields callers consume are kept. Page dimensions and units stay
//! nullable; every collection is always present, empty when the service
//! reported nothing.

use docbatch_intelligence::{
    BoundingRegion, DocumentLanguage, DocumentPage, DocumentParagraph, DocumentWord, LengthUnit,
};
use serde::{Deserialize, Serialize};

use crate::service::ProcessedDocument;

/// Analysis output for one blob.
#[must_use]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Full blob name, including any virtual directories.
    pub blob_name: String,
    pub languages: Vec<Language>,
    pub pages: Vec<Page>,
    pub paragraphs: Vec<Paragraph>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Language {
    pub locale: String,
    pub confidence: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page {
    pub page_number: u32,
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub unit: Option<LengthUnit>,
    pub words: Vec<Word>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Word {
    pub content: String,
    pub polygon: Vec<f64>,
    pub confidence: f64,
}

/// A paragraph with its regions in the analysis service's own shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Paragraph {
    pub content: String,
    pub bounding_regions: Vec<BoundingRegion>,
}

impl From<ProcessedDocument> for Document {
    fn from(document: ProcessedDocument) -> Self {
        let result = document.result;
        Self {
            blob_name: document.blob_name,
            languages: result.languages.into_iter().map(Into::into).collect(),
            pages: result.pages.into_iter().map(Into::into).collect(),
            paragraphs: result.paragraphs.into_iter().map(Into::into).collect(),
        }
    }
}

impl From<DocumentLanguage> for Language {
    fn from(language: DocumentLanguage) -> Self {
        Self {
            locale: language.locale,
            confidence: language.confidence,
        }
    }
}

impl From<DocumentPage> for Page {
    fn from(page: DocumentPage) -> Self {
        Self {
            page_number: page.page_number,
            width: page.width,
            height: page.height,
            unit: page.unit,
            words: page.words.into_iter().map(Into::into).collect(),
        }
    }
}

impl From<DocumentWord> for Word {
    fn from(word: DocumentWord) -> Self {
        Self {
            content: word.content,
            polygon: word.polygon,
            confidence: word.confidence,
        }
    }
}

impl From<DocumentParagraph> for Paragraph {
    fn from(paragraph: DocumentParagraph) -> Self {
        Self {
            content: paragraph.content,
            bounding_regions: paragraph.bounding_regions,
        }
    }
}

#[cfg(test)]
mod tests {
    use docbatch_intelligence::AnalyzeResult;
    use serde_json::json;

    use super::*;
    use crate::service::mock::sample_result;

    fn document(result: AnalyzeResult) -> serde_json::Value {
        let document = Document::from(ProcessedDocument {
            blob_name: "scans/a.pdf".into(),
            result,
        });
        serde_json::to_value(document).unwrap()
    }

    #[test]
    fn flattens_result() {
        let value = document(sample_result("Hello"));
        assert_eq!(
            value,
            json!({
                "blob_name": "scans/a.pdf",
                "languages": [{"locale": "en", "confidence": 0.95}],
                "pages": [{
                    "page_number": 1,
                    "width": 8.5,
                    "height": 11.0,
                    "unit": "inch",
                    "words": [{
                        "content": "Hello",
                        "polygon": [1.0, 1.0, 2.0, 1.0, 2.0, 1.5, 1.0, 1.5],
                        "confidence": 0.99
                    }]
                }],
                "paragraphs": [{
                    "content": "Hello",
                    "bounding_regions": [{
                        "pageNumber": 1,
                        "polygon": [1.0, 1.0, 2.0, 1.0, 2.0, 1.5, 1.0, 1.5]
                    }]
                }]
            })
        );
    }

    #[test]
    fn empty_result_has_empty_collections() {
        let value = document(AnalyzeResult::default());
        assert_eq!(
            value,
            json!({
                "blob_name": "scans/a.pdf",
                "languages": [],
                "pages": [],
                "paragraphs": []
            })
        );
    }

    #[test]
    fn sparse_page_keeps_nulls_and_empty_words() {
        let result: AnalyzeResult = serde_json::from_value(json!({
            "pages": [
                {"pageNumber": 1, "words": [
                    {"content": "x", "span": {"offset": 0, "length": 1}, "confidence": 0.5}
                ]},
                {"pageNumber": 2}
            ]
        }))
        .unwrap();

        let value = document(result);
        assert_eq!(
            value["pages"],
            json!([
                {
                    "page_number": 1,
                    "width": null,
                    "height": null,
                    "unit": null,
                    "words": [{"content": "x", "polygon": [], "confidence": 0.5}]
                },
                {
                    "page_number": 2,
                    "width": null,
                    "height": null,
                    "unit": null,
                    "words": []
                }
            ])
        );
    }
}
