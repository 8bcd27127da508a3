// Thu Oct 15 2026 - Alex

use crate::image::{ImageTable, LocateError};
use crate::memory::{Address, MemoryRange, MemoryRegion, Protection};
use log::{debug, warn};
use procfs::process::{MMPermissions, MMapPath, Process};
use procfs::ProcError;

/// Snapshot of the calling process's image table.
pub fn current() -> Result<ImageTable, LocateError> {
    from_process(std::process::id() as i32)
}

/// Snapshot of the image table of `pid`, taken from `/proc/<pid>/maps`.
/// Single attempt; the table is not re-read if it changes afterwards.
pub fn from_process(pid: i32) -> Result<ImageTable, LocateError> {
    let regions = read_regions(pid)?;

    let main_executable = match Process::new(pid).and_then(|p| p.exe()) {
        Ok(path) => Some(path),
        Err(e) => {
            warn!("could not resolve main executable of {}: {}", pid, e);
            None
        }
    };

    Ok(ImageTable::from_regions(&regions, main_executable))
}

pub fn read_regions(pid: i32) -> Result<Vec<MemoryRegion>, LocateError> {
    let process = Process::new(pid).map_err(|e| map_proc_error(pid, e))?;
    let maps = process.maps().map_err(|e| map_proc_error(pid, e))?;

    let mut regions = Vec::new();
    for map in maps {
        let (start, end) = map.address;
        let range = match MemoryRange::new(Address::new(start), Address::new(end)) {
            Ok(r) => r,
            Err(e) => {
                debug!("skipping malformed mapping {:x}-{:x}: {}", start, end, e);
                continue;
            }
        };

        let protection = Protection {
            read: map.perms.contains(MMPermissions::READ),
            write: map.perms.contains(MMPermissions::WRITE),
            execute: map.perms.contains(MMPermissions::EXECUTE),
        };

        let mut region = MemoryRegion::new(range, protection).with_offset(map.offset);
        if let MMapPath::Path(path) = map.pathname {
            region = region.with_file_path(path);
        }
        regions.push(region);
    }

    debug!("read {} mappings for process {}", regions.len(), pid);
    Ok(regions)
}

fn map_proc_error(pid: i32, err: ProcError) -> LocateError {
    match err {
        ProcError::PermissionDenied(_) => LocateError::PermissionDenied(pid),
        ProcError::NotFound(_) => LocateError::ProcessNotFound(pid),
        other => LocateError::TableUnavailable(other.to_string()),
    }
}
