//! PDF processing layer
//!
//! Parsing is delegated to a [`PdfParser`] backend (PDFium in production).
//! [`PdfExtractor`] wraps a backend with file checks and result shaping.

pub mod dates;
mod extractor;
pub mod pages;
mod reader;
pub mod types;

pub use dates::normalize_date;
pub use extractor::{ExtractorLimits, PdfExtractor};
pub use pages::{estimate_pages, PageEstimate, PageRequest};
pub use reader::PdfiumParser;
pub use types::{
    ExtractResult, MetadataSummary, PageExtractResult, PageSelection, PdfInfo, ValidationOutcome,
};

use crate::error::Result;

/// A PDF parsing backend.
///
/// Given the raw bytes of a document, returns its full text, page count and
/// document information dictionary. Implementations run on a blocking
/// thread and must not keep state between calls.
pub trait PdfParser: Send + Sync {
    fn parse(&self, data: &[u8]) -> Result<ExtractResult>;
}
