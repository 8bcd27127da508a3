// Thu Oct 15 2026 - Alex

use thiserror::Error;

#[derive(Error, Debug)]
pub enum MemoryError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Address 0x{0:x} is not mapped")]
    Unmapped(u64),
    #[error("Permission denied reading address 0x{0:x}")]
    PermissionDenied(u64),
    #[error("Invalid memory range: start 0x{start:x}, size 0x{size:x}")]
    InvalidRange { start: u64, size: u64 },
    #[error("Process {0} not found")]
    ProcessNotFound(i32),
    #[error("Permission denied opening memory of process {0}")]
    ProcessAccessDenied(i32),
}

impl MemoryError {
    /// Classifies an OS error raised while reading at `addr`.
    pub fn from_read_error(addr: u64, err: std::io::Error) -> Self {
        match err.raw_os_error() {
            Some(libc::EIO) | Some(libc::EFAULT) => MemoryError::Unmapped(addr),
            Some(libc::EPERM) | Some(libc::EACCES) => MemoryError::PermissionDenied(addr),
            Some(libc::ESRCH) => MemoryError::Io(err),
            _ => match err.kind() {
                std::io::ErrorKind::PermissionDenied => MemoryError::PermissionDenied(addr),
                _ => MemoryError::Io(err),
            },
        }
    }

    pub fn is_unmapped(&self) -> bool {
        matches!(self, MemoryError::Unmapped(_))
    }
}
