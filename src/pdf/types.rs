//! Result types shared by the extractor and the MCP tools

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Document information dictionary as reported by the parsing backend.
///
/// Well-known keys are promoted to named fields; every other key the
/// backend reports is preserved in `other`. Serializes back to a flat map
/// keyed by the PDF names (`Title`, `CreationDate`, ...).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PdfInfo {
    #[serde(rename = "PDFFormatVersion", skip_serializing_if = "Option::is_none")]
    pub format_version: Option<String>,
    #[serde(rename = "Title", skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(rename = "Author", skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(rename = "Subject", skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    #[serde(rename = "Keywords", skip_serializing_if = "Option::is_none")]
    pub keywords: Option<String>,
    #[serde(rename = "Creator", skip_serializing_if = "Option::is_none")]
    pub creator: Option<String>,
    #[serde(rename = "Producer", skip_serializing_if = "Option::is_none")]
    pub producer: Option<String>,
    #[serde(rename = "CreationDate", skip_serializing_if = "Option::is_none")]
    pub creation_date: Option<String>,
    #[serde(rename = "ModDate", skip_serializing_if = "Option::is_none")]
    pub mod_date: Option<String>,
    /// Keys without a named field, kept as reported
    #[serde(flatten)]
    pub other: Map<String, Value>,
}

/// Full extraction result for one document
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractResult {
    pub text: String,
    pub page_count: u32,
    pub metadata: PdfInfo,
}

/// Metadata view with a short text preview
#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct MetadataSummary {
    /// First characters of the document text
    pub text: String,
    pub page_count: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keywords: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub creator: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub producer: Option<String>,
    /// ISO 8601 when the source date was parseable
    #[serde(skip_serializing_if = "Option::is_none")]
    pub creation_date: Option<String>,
    /// ISO 8601 when the source date was parseable
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modification_date: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ValidationOutcome {
    pub is_valid: bool,
    pub file_path: String,
    pub message: String,
}

impl ValidationOutcome {
    pub fn new(file_path: impl Into<String>, is_valid: bool) -> Self {
        let message = if is_valid {
            "PDF file is valid"
        } else {
            "PDF file is invalid or not found"
        };
        Self {
            is_valid,
            file_path: file_path.into(),
            message: message.to_string(),
        }
    }
}

/// Page selection for estimated page extraction.
///
/// `page_numbers` wins when non-empty; otherwise `start_page`/`end_page`
/// form an inclusive range clamped to the document.
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct PageSelection {
    /// Path to the PDF file
    pub file_path: String,
    /// Specific 1-indexed pages to extract; out-of-range numbers (including
    /// zero and negatives) are ignored
    #[serde(default)]
    pub page_numbers: Option<Vec<i64>>,
    /// First page of the range (1-indexed, default: 1)
    #[serde(default)]
    pub start_page: Option<i64>,
    /// Last page of the range (inclusive, default: last page)
    #[serde(default)]
    pub end_page: Option<i64>,
}

/// Result of estimated page extraction
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageExtractResult {
    pub text: String,
    pub page_count: u32,
    pub metadata: PdfInfo,
    /// Pages the text was estimated to come from
    pub extracted_pages: Vec<u32>,
    /// True when page boundaries were estimated from character offsets
    pub approximate: bool,
}
