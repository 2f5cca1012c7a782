//! PDF reader backed by PDFium

use crate::error::{Error, Result};
use crate::pdf::types::{ExtractResult, PdfInfo};
use crate::pdf::PdfParser;
use pdfium_render::prelude::*;
use serde_json::{Map, Value};
use std::path::PathBuf;

/// Directories searched for the PDFium shared library before falling back
/// to the system library path
const DEFAULT_LIBRARY_DIRS: &[&str] = &["./", "/opt/pdfium/lib"];

/// Separator placed between the text of consecutive pages
const PAGE_SEPARATOR: &str = "\n\n";

/// PDF parser using PDFium.
///
/// PDFium is not thread-safe, so each parse binds a fresh instance.
#[derive(Debug, Clone)]
pub struct PdfiumParser {
    library_dirs: Vec<PathBuf>,
}

impl Default for PdfiumParser {
    fn default() -> Self {
        Self::new()
    }
}

impl PdfiumParser {
    pub fn new() -> Self {
        Self {
            library_dirs: DEFAULT_LIBRARY_DIRS.iter().map(PathBuf::from).collect(),
        }
    }

    /// Add a directory to search for the PDFium library (tried after the defaults)
    pub fn with_library_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.library_dirs.push(dir.into());
        self
    }

    pub fn library_dirs(&self) -> &[PathBuf] {
        &self.library_dirs
    }

    fn create_pdfium(&self) -> Result<Pdfium> {
        for dir in &self.library_dirs {
            match Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path(dir)) {
                Ok(bindings) => return Ok(Pdfium::new(bindings)),
                Err(e) => {
                    tracing::trace!(dir = %dir.display(), error = %e, "PDFium not found");
                }
            }
        }

        let bindings = Pdfium::bind_to_system_library()
            .map_err(|e| Error::parse_failure(format!("Failed to initialize PDFium: {}", e)))?;
        Ok(Pdfium::new(bindings))
    }

    fn extract_info(document: &PdfDocument) -> PdfInfo {
        let meta = document.metadata();
        let tag = |tag_type: PdfDocumentMetadataTagType| {
            meta.get(tag_type)
                .map(|t| t.value().to_string())
                .filter(|v| !v.is_empty())
        };

        PdfInfo {
            format_version: Self::format_version(document.version()),
            title: tag(PdfDocumentMetadataTagType::Title),
            author: tag(PdfDocumentMetadataTagType::Author),
            subject: tag(PdfDocumentMetadataTagType::Subject),
            keywords: tag(PdfDocumentMetadataTagType::Keywords),
            creator: tag(PdfDocumentMetadataTagType::Creator),
            producer: tag(PdfDocumentMetadataTagType::Producer),
            creation_date: tag(PdfDocumentMetadataTagType::CreationDate),
            mod_date: tag(PdfDocumentMetadataTagType::ModificationDate),
            other: Self::form_flags(document.form().map(|form| form.form_type())),
        }
    }

    /// `IsAcroFormPresent` / `IsXFAPresent` entries for the info dictionary
    fn form_flags(form_type: Option<PdfFormType>) -> Map<String, Value> {
        let (acro, xfa) = match form_type {
            Some(PdfFormType::Acrobat) => (true, false),
            Some(PdfFormType::XfaFull) | Some(PdfFormType::XfaForeground) => (false, true),
            Some(PdfFormType::None) | None => (false, false),
        };

        let mut flags = Map::new();
        flags.insert("IsAcroFormPresent".to_string(), Value::Bool(acro));
        flags.insert("IsXFAPresent".to_string(), Value::Bool(xfa));
        flags
    }

    fn format_version(version: PdfDocumentVersion) -> Option<String> {
        let v = match version {
            PdfDocumentVersion::Unset => return None,
            PdfDocumentVersion::Pdf1_0 => "1.0",
            PdfDocumentVersion::Pdf1_1 => "1.1",
            PdfDocumentVersion::Pdf1_2 => "1.2",
            PdfDocumentVersion::Pdf1_3 => "1.3",
            PdfDocumentVersion::Pdf1_4 => "1.4",
            PdfDocumentVersion::Pdf1_5 => "1.5",
            PdfDocumentVersion::Pdf1_6 => "1.6",
            PdfDocumentVersion::Pdf1_7 => "1.7",
            PdfDocumentVersion::Pdf2_0 => "2.0",
            PdfDocumentVersion::Other(raw) => return Some(format!("{}.{}", raw / 10, raw % 10)),
        };
        Some(v.to_string())
    }

    fn extract_text(document: &PdfDocument) -> Result<String> {
        let pages = document.pages();
        let mut texts = Vec::with_capacity(pages.len() as usize);

        for (index, page) in pages.iter().enumerate() {
            let text = page.text().map_err(|e| {
                Error::parse_failure(format!("Failed to read text of page {}: {}", index + 1, e))
            })?;
            texts.push(text.all());
        }

        Ok(texts.join(PAGE_SEPARATOR))
    }

    /// Map PDFium errors to our error type
    fn map_pdfium_error(err: PdfiumError) -> Error {
        match err {
            PdfiumError::PdfiumLibraryInternalError(PdfiumInternalError::PasswordError) => {
                Error::parse_failure("PDF is password protected")
            }
            _ => Error::parse_failure(err),
        }
    }
}

impl PdfParser for PdfiumParser {
    fn parse(&self, data: &[u8]) -> Result<ExtractResult> {
        if data.len() < 4 || &data[0..4] != b"%PDF" {
            return Err(Error::parse_failure("Not a valid PDF file"));
        }

        let pdfium = self.create_pdfium()?;
        let document = pdfium
            .load_pdf_from_byte_slice(data, None)
            .map_err(Self::map_pdfium_error)?;

        let page_count = document.pages().len() as u32;
        let metadata = Self::extract_info(&document);
        let text = Self::extract_text(&document)?;

        Ok(ExtractResult {
            text,
            page_count,
            metadata,
        })
    }
}
