// Thu Oct 15 2026 - Alex

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReflectionError {
    #[error("Class not found: {0}")]
    ClassNotFound(String),
    #[error("Unsupported image format: {0}")]
    UnsupportedFormat(String),
    #[error("Failed to parse {path}: {message}")]
    ParseError { path: PathBuf, message: String },
    #[error("Permission denied opening {0}")]
    PermissionDenied(PathBuf),
    #[error("IO error for '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
