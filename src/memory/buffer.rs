// Thu Oct 15 2026 - Alex

use crate::memory::{Address, MemoryError, MemoryRange, MemorySource};

/// An address space backed by an owned byte buffer mapped at `base`.
///
/// Holes can be punched to simulate unmapped pages inside the span; reads
/// that start in a hole fault, reads that run into one come back short.
#[derive(Debug, Clone)]
pub struct BufferMemory {
    base: Address,
    bytes: Vec<u8>,
    holes: Vec<MemoryRange>,
}

impl BufferMemory {
    pub fn new(base: Address, bytes: Vec<u8>) -> Self {
        Self {
            base,
            bytes,
            holes: Vec::new(),
        }
    }

    /// Fills `size` bytes with a position-dependent pattern.
    pub fn patterned(base: Address, size: usize) -> Self {
        let bytes = (0..size).map(|i| (i as u8) ^ ((i >> 8) as u8)).collect();
        Self::new(base, bytes)
    }

    pub fn with_hole(mut self, hole: MemoryRange) -> Self {
        self.holes.push(hole);
        self
    }

    pub fn base(&self) -> Address {
        self.base
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.bytes
    }

    fn end(&self) -> u64 {
        self.base.as_u64() + self.bytes.len() as u64
    }
}

impl MemorySource for BufferMemory {
    fn read_at(&self, addr: Address, buf: &mut [u8]) -> Result<usize, MemoryError> {
        if addr < self.base || addr.as_u64() >= self.end() {
            return Err(MemoryError::Unmapped(addr.as_u64()));
        }
        if self.holes.iter().any(|h| h.contains(addr)) {
            return Err(MemoryError::Unmapped(addr.as_u64()));
        }

        let mut limit = self.end();
        for hole in &self.holes {
            let hole_start = hole.start().as_u64();
            if hole_start > addr.as_u64() && hole_start < limit {
                limit = hole_start;
            }
        }

        let start = (addr.as_u64() - self.base.as_u64()) as usize;
        let available = (limit - addr.as_u64()) as usize;
        let count = available.min(buf.len());
        buf[..count].copy_from_slice(&self.bytes[start..start + count]);
        Ok(count)
    }
}
