// Thu Oct 15 2026 - Alex

use crate::memory::{Address, MemoryError};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Half-open `[start, end)` span of virtual memory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MemoryRange {
    start: Address,
    end: Address,
}

impl MemoryRange {
    pub fn new(start: Address, end: Address) -> Result<Self, MemoryError> {
        if end < start {
            return Err(MemoryError::InvalidRange {
                start: start.as_u64(),
                size: 0,
            });
        }
        Ok(Self { start, end })
    }

    pub fn from_start_size(start: Address, size: u64) -> Result<Self, MemoryError> {
        let end = start.checked_add(size).ok_or(MemoryError::InvalidRange {
            start: start.as_u64(),
            size,
        })?;
        Ok(Self { start, end })
    }

    pub fn start(&self) -> Address {
        self.start
    }

    pub fn end(&self) -> Address {
        self.end
    }

    pub fn size(&self) -> u64 {
        self.end.as_u64() - self.start.as_u64()
    }

    pub fn is_empty(&self) -> bool {
        self.start >= self.end
    }

    pub fn contains(&self, addr: Address) -> bool {
        addr >= self.start && addr < self.end
    }
}

impl fmt::Display for MemoryRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.start, self.end)
    }
}
