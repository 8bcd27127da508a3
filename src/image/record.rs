// Thu Oct 15 2026 - Alex

use crate::memory::{Address, MemoryError, MemoryRange};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// A loaded image as seen in the process's image table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageRecord {
    path: PathBuf,
    base: Address,
    size: u64,
}

impl ImageRecord {
    pub fn new<P: Into<PathBuf>>(path: P, base: Address, size: u64) -> Self {
        Self {
            path: path.into(),
            base,
            size,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn base(&self) -> Address {
        self.base
    }

    pub fn size(&self) -> u64 {
        self.size
    }

    pub fn file_name(&self) -> Option<&str> {
        self.path.file_name().and_then(|n| n.to_str())
    }

    pub fn range(&self) -> Result<MemoryRange, MemoryError> {
        MemoryRange::from_start_size(self.base, self.size)
    }

    pub fn contains(&self, addr: Address) -> bool {
        match addr.offset_from(self.base) {
            Some(delta) => delta < self.size,
            None => false,
        }
    }
}

impl fmt::Display for ImageRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (0x{:x} bytes) {}", self.base, self.size, self.path.display())
    }
}
