// Thu Oct 15 2026 - Alex

use crate::memory::{Address, MemoryRange, Protection};
use std::fmt;
use std::path::{Path, PathBuf};

/// One mapping from the platform's memory map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemoryRegion {
    range: MemoryRange,
    protection: Protection,
    offset: u64,
    file_path: Option<PathBuf>,
}

impl MemoryRegion {
    pub fn new(range: MemoryRange, protection: Protection) -> Self {
        Self {
            range,
            protection,
            offset: 0,
            file_path: None,
        }
    }

    pub fn with_offset(mut self, offset: u64) -> Self {
        self.offset = offset;
        self
    }

    pub fn with_file_path<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.file_path = Some(path.into());
        self
    }

    pub fn range(&self) -> &MemoryRange {
        &self.range
    }

    pub fn file_path(&self) -> Option<&Path> {
        self.file_path.as_deref()
    }

    pub fn start(&self) -> Address {
        self.range.start()
    }

    pub fn end(&self) -> Address {
        self.range.end()
    }

    pub fn size(&self) -> u64 {
        self.range.size()
    }

    pub fn contains(&self, addr: Address) -> bool {
        self.range.contains(addr)
    }

    pub fn is_executable(&self) -> bool {
        self.protection.can_execute()
    }
}

impl fmt::Display for MemoryRegion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let path = self
            .file_path
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_default();
        write!(f, "{} {} {:08x} {}", self.range, self.protection, self.offset, path)
    }
}
