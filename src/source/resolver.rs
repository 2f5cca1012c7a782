//! Source resolution for PDF files on the local filesystem

use crate::error::{Error, Result};
use std::path::Path;

/// Resolved PDF data
#[derive(Debug)]
pub struct ResolvedPdf {
    pub data: Vec<u8>,
    pub source_name: String,
}

/// Lower-cased extension of `path` including the leading dot, or an empty
/// string when the path has none.
pub fn file_extension<P: AsRef<Path>>(path: P) -> String {
    path.as_ref()
        .extension()
        .map(|ext| format!(".{}", ext.to_string_lossy().to_lowercase()))
        .unwrap_or_default()
}

/// Check that `path` names a regular file and return its size in bytes.
pub async fn check_exists<P: AsRef<Path>>(path: P) -> Result<u64> {
    let path = path.as_ref();
    // Unreadable metadata counts as missing, as does a directory
    match tokio::fs::metadata(path).await {
        Ok(meta) if meta.is_file() => Ok(meta.len()),
        _ => Err(Error::NotFound {
            path: path.display().to_string(),
        }),
    }
}

/// Check that `path` carries a `.pdf` extension (case-insensitive).
pub fn check_extension<P: AsRef<Path>>(path: P) -> Result<()> {
    let extension = file_extension(path);
    if extension == ".pdf" {
        Ok(())
    } else {
        Err(Error::InvalidType { extension })
    }
}

/// Check a file size against the ceiling.
pub fn check_size(size: u64, max_bytes: u64) -> Result<()> {
    if size > max_bytes {
        return Err(Error::FileTooLarge {
            size,
            max_size: max_bytes,
        });
    }
    Ok(())
}

/// Resolve a file path to PDF data.
///
/// Checks run in order: existence, extension, size. The file is read whole.
pub async fn resolve_path<P: AsRef<Path>>(path: P, max_bytes: u64) -> Result<ResolvedPdf> {
    let path = path.as_ref();

    let size = check_exists(path).await?;
    check_extension(path)?;
    check_size(size, max_bytes)?;

    let data = tokio::fs::read(path).await.map_err(Error::Io)?;

    Ok(ResolvedPdf {
        data,
        source_name: path.display().to_string(),
    })
}
