//! Source resolution for local PDF files

pub mod resolver;

pub use resolver::{
    check_exists, check_extension, check_size, file_extension, resolve_path, ResolvedPdf,
};
