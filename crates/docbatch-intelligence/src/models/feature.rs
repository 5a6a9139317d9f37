use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

/// Optional analysis capabilities, passed in the `features` query parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[derive(AsRefStr, Display, EnumString)]
#[derive(Serialize, Deserialize)]
#[strum(serialize_all = "camelCase")]
#[serde(rename_all = "camelCase")]
pub enum DocumentAnalysisFeature {
    /// Higher resolution text recognition for small print.
    OcrHighResolution,
    /// Detect the languages of text spans.
    Languages,
    /// Extract barcodes.
    Barcodes,
    /// Extract mathematical formulas.
    Formulas,
    /// Extract key-value pairs.
    KeyValuePairs,
    /// Detect font styles.
    StyleFont,
    /// Extract caller-specified query fields.
    QueryFields,
}

impl DocumentAnalysisFeature {
    /// Renders a feature list as the comma-separated query value.
    pub fn join(features: &[Self]) -> String {
        features
            .iter()
            .map(AsRef::<str>::as_ref)
            .collect::<Vec<_>>()
            .join(",")
    }
}
