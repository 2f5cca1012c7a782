//! PDF Text MCP Server Library
//!
//! This crate provides MCP tools over local PDF files:
//! - `extract_pdf_text`: Extract the full text, page count and metadata
//! - `get_pdf_metadata`: Document metadata with a short text preview
//! - `validate_pdf`: Check that a path names a usable PDF
//! - `extract_pdf_pages`: Text of selected pages (estimated boundaries)

pub mod error;
pub mod pdf;
pub mod server;
pub mod source;

pub use error::{Error, Result};
pub use server::{
    run_server, run_server_with_config, truncate_text, ExtractTextResponse, FilePathParams,
    PdfServer, ServerConfig, TruncatedText, TRUNCATION_NOTICE,
};
