//! Error types for PDF Text MCP Server

use thiserror::Error;

/// Result type alias for PDF Text MCP Server
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for PDF Text MCP Server
#[derive(Error, Debug)]
pub enum Error {
    /// Path does not reference an existing file
    #[error("File not found: {path}")]
    NotFound { path: String },

    /// Extension is not `.pdf`
    #[error("Invalid file type: {extension}. Only PDF files are supported.")]
    InvalidType { extension: String },

    /// File exceeds the configured size ceiling
    #[error("File too large: {size} bytes. Maximum allowed: {max_size} bytes.")]
    FileTooLarge { size: u64, max_size: u64 },

    /// The parsing backend rejected the byte stream
    #[error("Failed to parse PDF: {reason}")]
    ParseFailure { reason: String },

    /// Tool name not registered with the server
    #[error("Unknown tool: {name}")]
    UnknownOperation { name: String },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    pub(crate) fn parse_failure(reason: impl std::fmt::Display) -> Self {
        Error::ParseFailure {
            reason: reason.to_string(),
        }
    }
}
