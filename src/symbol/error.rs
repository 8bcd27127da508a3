// Thu Oct 15 2026 - Alex

use crate::reflection::ReflectionError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ResolveError {
    #[error("Class not found: {0}")]
    ClassNotFound(String),
    #[error("Method '{method}' not found in class {class}")]
    MethodNotFound { class: String, method: String },
    #[error("Method '{method}' of class {class} is ambiguous ({count} implementations)")]
    Ambiguous { class: String, method: String, count: usize },
    #[error("No loaded image contains address 0x{0:x}")]
    ImageNotFound(u64),
    #[error("Offset 0x{offset:x} lies outside image of size 0x{size:x}")]
    OffsetOutOfRange { offset: u64, size: u64 },
    #[error("Invalid target '{0}', expected Class.method")]
    InvalidTarget(String),
    #[error("Reflection error: {0}")]
    Reflection(ReflectionError),
}

impl From<ReflectionError> for ResolveError {
    fn from(err: ReflectionError) -> Self {
        match err {
            ReflectionError::ClassNotFound(class) => ResolveError::ClassNotFound(class),
            other => ResolveError::Reflection(other),
        }
    }
}
