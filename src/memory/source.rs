// Thu Oct 15 2026 - Alex

use crate::memory::{Address, MemoryError};

/// Read-only access to some address space.
pub trait MemorySource {
    /// Copies bytes starting at `addr` into `buf` and returns how many were
    /// copied. A short count means the mapped span ended inside the request.
    fn read_at(&self, addr: Address, buf: &mut [u8]) -> Result<usize, MemoryError>;

    /// Reads up to `len` bytes, stopping early at the first short read or fault
    /// after at least one byte has been copied.
    fn read_bytes(&self, addr: Address, len: usize) -> Result<Vec<u8>, MemoryError> {
        let mut buffer = vec![0u8; len];
        let mut filled = 0usize;

        while filled < len {
            let cursor = addr
                .checked_add(filled as u64)
                .ok_or(MemoryError::InvalidRange { start: addr.as_u64(), size: len as u64 })?;
            match self.read_at(cursor, &mut buffer[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(e) if filled > 0 && e.is_unmapped() => break,
                Err(e) => return Err(e),
            }
        }

        buffer.truncate(filled);
        Ok(buffer)
    }
}

impl<T: MemorySource + ?Sized> MemorySource for &T {
    fn read_at(&self, addr: Address, buf: &mut [u8]) -> Result<usize, MemoryError> {
        (**self).read_at(addr, buf)
    }
}

impl<T: MemorySource + ?Sized> MemorySource for Box<T> {
    fn read_at(&self, addr: Address, buf: &mut [u8]) -> Result<usize, MemoryError> {
        (**self).read_at(addr, buf)
    }
}
