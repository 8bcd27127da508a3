// Thu Oct 15 2026 - Alex

use crate::memory::{Address, MemoryError, MemorySource};
use log::debug;
use std::fs::File;
use std::io::ErrorKind;
use std::os::unix::fs::FileExt;

/// Live memory of a process, read through `/proc/<pid>/mem`.
pub struct ProcessMemory {
    mem: File,
}

impl ProcessMemory {
    pub fn attach(pid: i32) -> Result<Self, MemoryError> {
        let path = format!("/proc/{}/mem", pid);
        let mem = File::open(&path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => MemoryError::ProcessNotFound(pid),
            ErrorKind::PermissionDenied => MemoryError::ProcessAccessDenied(pid),
            _ => MemoryError::Io(e),
        })?;
        debug!("opened {}", path);
        Ok(Self { mem })
    }

    pub fn current() -> Result<Self, MemoryError> {
        Self::attach(std::process::id() as i32)
    }
}

impl MemorySource for ProcessMemory {
    fn read_at(&self, addr: Address, buf: &mut [u8]) -> Result<usize, MemoryError> {
        if addr.as_u64() > i64::MAX as u64 {
            return Err(MemoryError::Unmapped(addr.as_u64()));
        }
        self.mem
            .read_at(buf, addr.as_u64())
            .map_err(|e| MemoryError::from_read_error(addr.as_u64(), e))
    }
}
