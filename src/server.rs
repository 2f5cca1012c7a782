//! MCP Server implementation using rmcp

use crate::error::Error;
use crate::pdf::{
    ExtractorLimits, MetadataSummary, PageExtractResult, PageSelection, PdfExtractor, PdfInfo,
    PdfiumParser, ValidationOutcome,
};
use anyhow::Result;
use rmcp::{
    handler::server::tool::{ToolCallContext, ToolRouter},
    handler::server::wrapper::Parameters,
    model::*,
    schemars::JsonSchema,
    service::RequestContext,
    tool, tool_router, RoleServer, ServerHandler, ServiceExt,
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;

/// Appended to text cut at the response ceiling
pub const TRUNCATION_NOTICE: &str =
    "\n\n[Text truncated: document is too long. Request smaller page ranges to read the rest.]";

/// Resource configuration for the PDF Text MCP Server
#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    /// Largest file accepted, in bytes (default: 100MB)
    pub max_file_bytes: u64,
    /// Maximum characters of text returned by extract_pdf_text (default: 100_000)
    pub max_text_chars: usize,
    /// Characters of text in get_pdf_metadata previews (default: 200)
    pub preview_chars: usize,
    /// Extra directory to search for the PDFium library
    pub pdfium_library_dir: Option<PathBuf>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        let limits = ExtractorLimits::default();
        Self {
            max_file_bytes: limits.max_file_bytes,
            max_text_chars: 100_000,
            preview_chars: limits.preview_chars,
            pdfium_library_dir: None,
        }
    }
}

impl ServerConfig {
    /// Defaults overridden by `PDF_MCP_*` and `PDFIUM_LIB_PATH` environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary variable lookup.
    /// Unparsable numbers are ignored with a warning.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        fn parsed<T: std::str::FromStr>(
            lookup: &dyn Fn(&str) -> Option<String>,
            key: &str,
        ) -> Option<T> {
            let raw = lookup(key)?;
            match raw.trim().parse() {
                Ok(v) => Some(v),
                Err(_) => {
                    tracing::warn!(key, value = %raw, "ignoring invalid configuration value");
                    None
                }
            }
        }

        let mut config = Self::default();
        if let Some(v) = parsed(&lookup, "PDF_MCP_MAX_FILE_BYTES") {
            config.max_file_bytes = v;
        }
        if let Some(v) = parsed(&lookup, "PDF_MCP_MAX_TEXT_CHARS") {
            config.max_text_chars = v;
        }
        if let Some(v) = parsed(&lookup, "PDF_MCP_PREVIEW_CHARS") {
            config.preview_chars = v;
        }
        config.pdfium_library_dir = lookup("PDFIUM_LIB_PATH")
            .filter(|p| !p.trim().is_empty())
            .map(PathBuf::from);
        config
    }

    pub fn extractor_limits(&self) -> ExtractorLimits {
        ExtractorLimits {
            max_file_bytes: self.max_file_bytes,
            preview_chars: self.preview_chars,
        }
    }
}

/// PDF Text MCP Server
#[derive(Clone)]
pub struct PdfServer {
    extractor: Arc<PdfExtractor>,
    tool_router: ToolRouter<Self>,
    /// Server configuration
    config: Arc<ServerConfig>,
}

// ============================================================================
// Request/Response types
// ============================================================================

#[derive(Debug, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct FilePathParams {
    /// Path to the PDF file
    pub file_path: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractTextResponse {
    pub text: String,
    pub page_count: u32,
    pub metadata: PdfInfo,
    /// Whether the text was cut at the response ceiling
    pub truncated: bool,
    /// Character count of the untruncated text
    pub original_length: usize,
}

/// Text after applying the response ceiling
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TruncatedText {
    pub text: String,
    pub truncated: bool,
    pub original_length: usize,
}

/// Cut `text` to `max_chars` characters, appending [`TRUNCATION_NOTICE`] when cut.
pub fn truncate_text(text: String, max_chars: usize) -> TruncatedText {
    let original_length = text.chars().count();
    if original_length <= max_chars {
        return TruncatedText {
            text,
            truncated: false,
            original_length,
        };
    }

    let cut = text
        .char_indices()
        .nth(max_chars)
        .map(|(i, _)| i)
        .unwrap_or(text.len());
    TruncatedText {
        text: format!("{}{}", &text[..cut], TRUNCATION_NOTICE),
        truncated: true,
        original_length,
    }
}

// ============================================================================
// Tool implementations
// ============================================================================

#[tool_router]
impl PdfServer {
    pub fn new() -> Self {
        Self::with_config(ServerConfig::default())
    }

    /// Create a new PdfServer backed by PDFium
    pub fn with_config(config: ServerConfig) -> Self {
        let mut parser = PdfiumParser::new();
        if let Some(dir) = &config.pdfium_library_dir {
            parser = parser.with_library_dir(dir);
        }
        let extractor = PdfExtractor::with_limits(Arc::new(parser), config.extractor_limits());
        Self::with_extractor(extractor, config)
    }

    /// Create a new PdfServer around an existing extractor
    pub fn with_extractor(extractor: PdfExtractor, config: ServerConfig) -> Self {
        Self {
            extractor: Arc::new(extractor),
            tool_router: Self::tool_router(),
            config: Arc::new(config),
        }
    }

    /// Extract text content from a PDF file
    #[tool(
        description = "Extract text content from a PDF file. Returns the text, page count and document metadata. Text beyond the configured limit (default 100,000 characters) is truncated."
    )]
    async fn extract_pdf_text(
        &self,
        Parameters(params): Parameters<FilePathParams>,
    ) -> std::result::Result<CallToolResult, ErrorData> {
        let result = self.process_extract_text(&params.file_path).await;
        Ok(Self::envelope("extract_pdf_text", result))
    }

    /// Get PDF metadata with a short text preview
    #[tool(
        description = "Get metadata information from a PDF file (title, author, subject, keywords, creator, producer, creation and modification dates, page count) with a short text preview."
    )]
    async fn get_pdf_metadata(
        &self,
        Parameters(params): Parameters<FilePathParams>,
    ) -> std::result::Result<CallToolResult, ErrorData> {
        let result = self.process_get_metadata(&params.file_path).await;
        Ok(Self::envelope("get_pdf_metadata", result))
    }

    /// Validate if a file is a usable PDF
    #[tool(
        description = "Validate if a file is a valid PDF. Missing files and non-PDF extensions report isValid: false; files over the size limit return an error."
    )]
    async fn validate_pdf(
        &self,
        Parameters(params): Parameters<FilePathParams>,
    ) -> std::result::Result<CallToolResult, ErrorData> {
        let result = self.process_validate(&params.file_path).await;
        Ok(Self::envelope("validate_pdf", result))
    }

    /// Extract estimated page text
    #[tool(
        description = "Extract text from selected pages of a PDF file. Give either pageNumbers or a startPage/endPage range.

Page boundaries are ESTIMATED by splitting the document text into equal character runs per page; they will not match real page breaks exactly."
    )]
    async fn extract_pdf_pages(
        &self,
        Parameters(params): Parameters<PageSelection>,
    ) -> std::result::Result<CallToolResult, ErrorData> {
        let result = self.process_extract_pages(&params).await;
        Ok(Self::envelope("extract_pdf_pages", result))
    }
}

impl PdfServer {
    /// Wrap a tool outcome as pretty-printed JSON, or as the error envelope.
    fn envelope<T: Serialize>(tool: &str, result: crate::error::Result<T>) -> CallToolResult {
        match result.and_then(|value| serde_json::to_string_pretty(&value).map_err(Error::from)) {
            Ok(json) => CallToolResult::success(vec![Content::text(json)]),
            Err(e) => {
                tracing::warn!(tool, error = %e, "tool call failed");
                Self::error_result(&e)
            }
        }
    }

    /// `{ content: [{ type: "text", text: "Error: <message>" }], isError: true }`
    pub fn error_result(error: &Error) -> CallToolResult {
        CallToolResult::error(vec![Content::text(format!("Error: {}", error))])
    }

    /// Fail with `UnknownOperation` when no tool is registered under `name`
    pub fn check_route(&self, name: &str) -> crate::error::Result<()> {
        if self.tool_router.has_route(name) {
            Ok(())
        } else {
            Err(Error::UnknownOperation {
                name: name.to_string(),
            })
        }
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    pub async fn process_extract_text(
        &self,
        file_path: &str,
    ) -> crate::error::Result<ExtractTextResponse> {
        let result = self.extractor.extract_text(file_path).await?;
        let truncated = truncate_text(result.text, self.config.max_text_chars);

        if truncated.truncated {
            tracing::info!(
                source = %file_path,
                original_length = truncated.original_length,
                max_chars = self.config.max_text_chars,
                "truncated extracted text"
            );
        }

        Ok(ExtractTextResponse {
            text: truncated.text,
            page_count: result.page_count,
            metadata: result.metadata,
            truncated: truncated.truncated,
            original_length: truncated.original_length,
        })
    }

    pub async fn process_get_metadata(
        &self,
        file_path: &str,
    ) -> crate::error::Result<MetadataSummary> {
        self.extractor.get_metadata(file_path).await
    }

    pub async fn process_validate(
        &self,
        file_path: &str,
    ) -> crate::error::Result<ValidationOutcome> {
        let is_valid = self.extractor.validate(file_path).await?;
        Ok(ValidationOutcome::new(file_path, is_valid))
    }

    pub async fn process_extract_pages(
        &self,
        selection: &PageSelection,
    ) -> crate::error::Result<PageExtractResult> {
        self.extractor.extract_text_from_pages(selection).await
    }
}

impl Default for PdfServer {
    fn default() -> Self {
        Self::new()
    }
}

impl ServerHandler for PdfServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2024_11_05,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation::from_build_env(),
            instructions: Some(
                "PDF Text MCP Server extracts text and metadata from local PDF files and \
                 validates PDF paths. Pass absolute file paths as filePath."
                    .into(),
            ),
        }
    }

    async fn list_tools(
        &self,
        _request: Option<PaginatedRequestParams>,
        _context: RequestContext<RoleServer>,
    ) -> std::result::Result<ListToolsResult, ErrorData> {
        Ok(ListToolsResult {
            tools: self.tool_router.list_all(),
            next_cursor: None,
            meta: Default::default(),
        })
    }

    /// Route a tool call; unknown names get the error envelope rather than a protocol error
    async fn call_tool(
        &self,
        request: CallToolRequestParams,
        context: RequestContext<RoleServer>,
    ) -> std::result::Result<CallToolResult, ErrorData> {
        if let Err(e) = self.check_route(&request.name) {
            tracing::warn!(error = %e, "call_tool failed");
            return Ok(Self::error_result(&e));
        }

        let tcc = ToolCallContext::new(self, request, context);
        self.tool_router.call(tcc).await
    }
}

/// Run the MCP server with configuration taken from the environment
pub async fn run_server() -> Result<()> {
    run_server_with_config(ServerConfig::from_env()).await
}

/// Run the MCP server with full configuration
pub async fn run_server_with_config(config: ServerConfig) -> Result<()> {
    tracing::debug!(?config, "server configuration");
    let server = PdfServer::with_config(config);

    tracing::info!("PDF Text MCP Server ready, waiting for connections...");

    let service = server.serve(rmcp::transport::io::stdio()).await?;
    service.waiting().await?;

    Ok(())
}
