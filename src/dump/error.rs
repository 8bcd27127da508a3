// Thu Oct 15 2026 - Alex

use crate::memory::MemoryError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DumpError {
    #[error("Invalid dump range: base 0x{base:x}, size 0x{size:x}")]
    InvalidRange { base: u64, size: u64 },
    #[error("Permission denied reading 0x{0:x}")]
    PermissionDenied(u64),
    #[error("Partial read: got 0x{read:x} of 0x{requested:x} bytes")]
    PartialRead { requested: u64, read: u64 },
    #[error("Memory error: {0}")]
    Memory(#[from] MemoryError),
}

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Invalid attachment file name '{0}'")]
    InvalidFileName(String),
    #[error("Refusing to overwrite existing file {0}")]
    AlreadyExists(PathBuf),
    #[error("Permission denied writing {0}")]
    PermissionDenied(PathBuf),
    #[error("Attachment '{0}' is empty")]
    EmptyAttachment(String),
    #[error("IO error for '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
