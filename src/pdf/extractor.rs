//! File-to-result adapter around a parsing backend

use crate::error::{Error, Result};
use crate::pdf::dates::normalize_date;
use crate::pdf::pages::{estimate_pages, preview, PageRequest};
use crate::pdf::types::{
    ExtractResult, MetadataSummary, PageExtractResult, PageSelection,
};
use crate::pdf::{PdfParser, PdfiumParser};
use crate::source::{check_exists, check_extension, check_size, resolve_path};
use std::sync::Arc;

/// Limits applied by the extractor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExtractorLimits {
    /// Largest file accepted, in bytes (default: 100MB)
    pub max_file_bytes: u64,
    /// Characters of text kept in metadata previews (default: 200)
    pub preview_chars: usize,
}

impl Default for ExtractorLimits {
    fn default() -> Self {
        Self {
            max_file_bytes: 100 * 1024 * 1024, // 100MB
            preview_chars: 200,
        }
    }
}

/// Maps file paths to extraction results using a [`PdfParser`] backend.
#[derive(Clone)]
pub struct PdfExtractor {
    parser: Arc<dyn PdfParser>,
    limits: ExtractorLimits,
}

impl Default for PdfExtractor {
    fn default() -> Self {
        Self::new(PdfiumParser::new())
    }
}

impl PdfExtractor {
    pub fn new(parser: impl PdfParser + 'static) -> Self {
        Self::with_limits(Arc::new(parser), ExtractorLimits::default())
    }

    pub fn with_limits(parser: Arc<dyn PdfParser>, limits: ExtractorLimits) -> Self {
        Self { parser, limits }
    }

    pub fn limits(&self) -> &ExtractorLimits {
        &self.limits
    }

    /// Extract text, page count and document information from a PDF file.
    ///
    /// Fails with `NotFound`, `InvalidType` or `FileTooLarge` before the
    /// file is read; any backend failure surfaces as `ParseFailure`.
    pub async fn extract_text(&self, path: &str) -> Result<ExtractResult> {
        let resolved = resolve_path(path, self.limits.max_file_bytes).await?;
        let source_name = resolved.source_name;
        let data = resolved.data;

        // PDFium is synchronous; keep it off the async workers
        let parser = Arc::clone(&self.parser);
        let result = tokio::task::spawn_blocking(move || parser.parse(&data))
            .await
            .map_err(|e| Error::parse_failure(format!("Task join error: {}", e)))?
            .map_err(|e| match e {
                Error::ParseFailure { .. } => e,
                other => Error::parse_failure(other),
            })?;

        tracing::debug!(
            source = %source_name,
            pages = result.page_count,
            chars = result.text.chars().count(),
            "parsed PDF"
        );

        Ok(result)
    }

    /// Document information with a short text preview.
    pub async fn get_metadata(&self, path: &str) -> Result<MetadataSummary> {
        let result = self.extract_text(path).await?;
        let info = result.metadata;

        Ok(MetadataSummary {
            text: preview(&result.text, self.limits.preview_chars),
            page_count: result.page_count,
            title: info.title,
            author: info.author,
            subject: info.subject,
            keywords: info.keywords,
            creator: info.creator,
            producer: info.producer,
            creation_date: normalize_date(info.creation_date.as_deref()),
            modification_date: normalize_date(info.mod_date.as_deref()),
        })
    }

    /// Check whether `path` names a usable PDF file.
    ///
    /// A missing file or a non-`.pdf` extension is `Ok(false)`; a file over
    /// the size ceiling is an error.
    pub async fn validate(&self, path: &str) -> Result<bool> {
        // check_exists only fails with NotFound
        let Ok(size) = check_exists(path).await else {
            return Ok(false);
        };

        if check_extension(path).is_err() {
            return Ok(false);
        }

        check_size(size, self.limits.max_file_bytes)?;
        Ok(true)
    }

    /// Extract the text of selected pages.
    ///
    /// Page boundaries are estimated from character offsets; see
    /// [`crate::pdf::pages`].
    pub async fn extract_text_from_pages(
        &self,
        selection: &PageSelection,
    ) -> Result<PageExtractResult> {
        let full = self.extract_text(&selection.file_path).await?;

        // Numbers outside u32 become 0 so they are dropped as out of range
        let numbers: Option<Vec<u32>> = selection
            .page_numbers
            .as_ref()
            .map(|pages| pages.iter().map(|&p| page_index(p)).collect());
        let request = PageRequest::new(
            numbers.as_deref(),
            selection.start_page.map(page_index),
            selection.end_page.map(page_index),
        );
        let estimate = estimate_pages(&full.text, full.page_count, &request);

        Ok(PageExtractResult {
            text: estimate.text,
            page_count: full.page_count,
            metadata: full.metadata,
            extracted_pages: estimate.pages,
            approximate: estimate.approximate,
        })
    }
}

/// Clamp a caller-supplied page number into `u32`; negatives become 0.
fn page_index(page: i64) -> u32 {
    u32::try_from(page.max(0)).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pdf::types::PdfInfo;
    use pretty_assertions::assert_eq;
    use std::path::PathBuf;
    use tempfile::TempDir;

    struct StubParser {
        outcome: std::result::Result<ExtractResult, String>,
    }

    impl PdfParser for StubParser {
        fn parse(&self, _data: &[u8]) -> Result<ExtractResult> {
            match &self.outcome {
                Ok(result) => Ok(result.clone()),
                Err(reason) if reason == "io" => Err(Error::Io(std::io::Error::other("boom"))),
                Err(reason) => Err(Error::parse_failure(reason)),
            }
        }
    }

    fn sample_info() -> PdfInfo {
        PdfInfo {
            title: Some("Test PDF".to_string()),
            author: Some("Test Author".to_string()),
            subject: Some("Test Subject".to_string()),
            keywords: Some("test, pdf".to_string()),
            creator: Some("Test Creator".to_string()),
            producer: Some("Test Producer".to_string()),
            creation_date: Some("D:20230101000000Z".to_string()),
            mod_date: Some("2023-01-02".to_string()),
            ..PdfInfo::default()
        }
    }

    fn sample_result() -> ExtractResult {
        ExtractResult {
            text: "Sample PDF text content".to_string(),
            page_count: 1,
            metadata: sample_info(),
        }
    }

    fn extractor_with(result: ExtractResult) -> PdfExtractor {
        PdfExtractor::new(StubParser {
            outcome: Ok(result),
        })
    }

    fn write_file(dir: &TempDir, name: &str) -> PathBuf {
        let path = dir.path().join(name);
        std::fs::write(&path, b"%PDF-1.4 mock pdf content").unwrap();
        path
    }

    fn path_str(path: &std::path::Path) -> String {
        path.to_string_lossy().to_string()
    }

    #[tokio::test]
    async fn test_extract_text_returns_backend_result() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "sample.pdf");

        let result = extractor_with(sample_result())
            .extract_text(&path_str(&path))
            .await
            .unwrap();
        assert_eq!(result, sample_result());
    }

    #[tokio::test]
    async fn test_extract_text_uppercase_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "SAMPLE.PDF");

        let result = extractor_with(sample_result())
            .extract_text(&path_str(&path))
            .await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_extract_text_not_found() {
        let err = extractor_with(sample_result())
            .extract_text("/nonexistent/sample.pdf")
            .await
            .unwrap_err();
        assert!(matches!(err, Error::NotFound { .. }));
        assert!(err.to_string().contains("File not found"));
    }

    #[tokio::test]
    async fn test_extract_text_invalid_type() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "sample.txt");

        let err = extractor_with(sample_result())
            .extract_text(&path_str(&path))
            .await
            .unwrap_err();
        assert!(err
            .to_string()
            .contains("Invalid file type: .txt. Only PDF files are supported."));
    }

    #[tokio::test]
    async fn test_extract_text_parse_failure() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "broken.pdf");
        let extractor = PdfExtractor::new(StubParser {
            outcome: Err("Invalid XRef stream".to_string()),
        });

        let err = extractor.extract_text(&path_str(&path)).await.unwrap_err();
        assert!(matches!(err, Error::ParseFailure { .. }));
        assert_eq!(err.to_string(), "Failed to parse PDF: Invalid XRef stream");
    }

    #[tokio::test]
    async fn test_backend_errors_become_parse_failures() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "broken.pdf");
        let extractor = PdfExtractor::new(StubParser {
            outcome: Err("io".to_string()),
        });

        let err = extractor.extract_text(&path_str(&path)).await.unwrap_err();
        assert!(matches!(err, Error::ParseFailure { .. }));
        assert!(err.to_string().contains("boom"));
    }

    #[tokio::test]
    async fn test_extract_text_enforces_size_ceiling() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "big.pdf");
        let extractor = PdfExtractor::with_limits(
            Arc::new(StubParser {
                outcome: Ok(sample_result()),
            }),
            ExtractorLimits {
                max_file_bytes: 8,
                ..ExtractorLimits::default()
            },
        );

        let err = extractor.extract_text(&path_str(&path)).await.unwrap_err();
        assert!(matches!(err, Error::FileTooLarge { max_size: 8, .. }));
    }

    #[tokio::test]
    async fn test_get_metadata_formats_fields() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "sample.pdf");

        let summary = extractor_with(sample_result())
            .get_metadata(&path_str(&path))
            .await
            .unwrap();
        assert_eq!(
            summary,
            MetadataSummary {
                text: "Sample PDF text content".to_string(),
                page_count: 1,
                title: Some("Test PDF".to_string()),
                author: Some("Test Author".to_string()),
                subject: Some("Test Subject".to_string()),
                keywords: Some("test, pdf".to_string()),
                creator: Some("Test Creator".to_string()),
                producer: Some("Test Producer".to_string()),
                creation_date: Some("2023-01-01T00:00:00.000Z".to_string()),
                modification_date: Some("2023-01-02T00:00:00.000Z".to_string()),
            }
        );
    }

    #[tokio::test]
    async fn test_get_metadata_preview_and_missing_dates() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "long.pdf");
        let extractor = extractor_with(ExtractResult {
            text: "y".repeat(1000),
            page_count: 3,
            metadata: PdfInfo {
                mod_date: Some("not a date".to_string()),
                ..PdfInfo::default()
            },
        });

        let summary = extractor.get_metadata(&path_str(&path)).await.unwrap();
        assert_eq!(summary.text, format!("{}...", "y".repeat(200)));
        assert_eq!(summary.creation_date, None);
        assert_eq!(summary.modification_date.as_deref(), Some("not a date"));

        let json = serde_json::to_value(&summary).unwrap();
        assert!(json.get("creationDate").is_none());
        assert!(json.get("title").is_none());
    }

    #[tokio::test]
    async fn test_validate() {
        let dir = tempfile::tempdir().unwrap();
        let pdf = write_file(&dir, "sample.pdf");
        let txt = write_file(&dir, "sample.txt");
        let extractor = extractor_with(sample_result());

        assert!(extractor.validate(&path_str(&pdf)).await.unwrap());
        assert!(!extractor.validate(&path_str(&txt)).await.unwrap());
        assert!(!extractor
            .validate("/nonexistent/sample.pdf")
            .await
            .unwrap());
    }

    #[tokio::test]
    async fn test_validate_too_large() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("huge.pdf");
        let file = std::fs::File::create(&path).unwrap();
        file.set_len(200 * 1024 * 1024).unwrap();

        let err = extractor_with(sample_result())
            .validate(&path_str(&path))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("File too large"));
    }

    #[tokio::test]
    async fn test_extract_text_from_pages() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "pages.pdf");
        let extractor = extractor_with(ExtractResult {
            text: "aaaabbbbcccc".to_string(),
            page_count: 3,
            metadata: PdfInfo::default(),
        });

        let result = extractor
            .extract_text_from_pages(&PageSelection {
                file_path: path_str(&path),
                page_numbers: Some(vec![2, 5]),
                ..PageSelection::default()
            })
            .await
            .unwrap();
        assert_eq!(result.extracted_pages, vec![2]);
        assert_eq!(result.text, "--- Page 2 (estimated) ---\nbbbb\n");
        assert_eq!(result.page_count, 3);
        assert!(result.approximate);

        let result = extractor
            .extract_text_from_pages(&PageSelection {
                file_path: path_str(&path),
                start_page: Some(2),
                ..PageSelection::default()
            })
            .await
            .unwrap();
        assert_eq!(result.extracted_pages, vec![2, 3]);
        assert_eq!(result.text, "--- Pages 2-3 (estimated) ---\nbbbbcccc");
    }

    #[tokio::test]
    async fn test_negative_page_numbers_are_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "pages.pdf");
        let extractor = extractor_with(ExtractResult {
            text: "aaaabbbbcccc".to_string(),
            page_count: 3,
            metadata: PdfInfo::default(),
        });

        let selection: PageSelection = serde_json::from_value(serde_json::json!({
            "filePath": path_str(&path),
            "pageNumbers": [-1, 2, 5_000_000_000i64],
        }))
        .unwrap();
        let result = extractor.extract_text_from_pages(&selection).await.unwrap();
        assert_eq!(result.extracted_pages, vec![2]);
        assert_eq!(result.text, "--- Page 2 (estimated) ---\nbbbb\n");

        // Only out-of-range numbers still select nothing
        let result = extractor
            .extract_text_from_pages(&PageSelection {
                file_path: path_str(&path),
                page_numbers: Some(vec![-3]),
                ..PageSelection::default()
            })
            .await
            .unwrap();
        assert!(result.extracted_pages.is_empty());
        assert_eq!(result.text, "");

        let result = extractor
            .extract_text_from_pages(&PageSelection {
                file_path: path_str(&path),
                start_page: Some(-4),
                end_page: Some(1),
                ..PageSelection::default()
            })
            .await
            .unwrap();
        assert_eq!(result.extracted_pages, vec![1]);
    }

    #[tokio::test]
    async fn test_get_metadata_non_ascii_date_passes_through() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "dates.pdf");
        let extractor = extractor_with(ExtractResult {
            text: String::new(),
            page_count: 1,
            metadata: PdfInfo {
                creation_date: Some("D:2023+1é".to_string()),
                ..PdfInfo::default()
            },
        });

        let summary = extractor.get_metadata(&path_str(&path)).await.unwrap();
        assert_eq!(summary.creation_date.as_deref(), Some("D:2023+1é"));
    }
}
