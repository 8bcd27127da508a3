// Thu Oct 15 2026 - Alex

use crate::dump::DumpError;
use crate::image::ImageRecord;
use crate::memory::{Address, MemoryError, MemoryRange, MemorySource};
use indicatif::ProgressBar;
use log::{debug, info, warn};

pub const DEFAULT_CHUNK_SIZE: usize = 64 * 1024;

/// Verbatim copy of one image's bytes.
#[derive(Debug, Clone)]
pub struct ImageDump {
    image: ImageRecord,
    requested: u64,
    bytes: Vec<u8>,
    stopped_at: Option<Address>,
}

impl ImageDump {
    pub fn image(&self) -> &ImageRecord {
        &self.image
    }

    pub fn requested(&self) -> u64 {
        self.requested
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> u64 {
        self.bytes.len() as u64
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn is_complete(&self) -> bool {
        self.len() == self.requested
    }

    /// First address that could not be read, for partial dumps.
    pub fn stopped_at(&self) -> Option<Address> {
        self.stopped_at
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }
}

pub struct MemoryDumper<'a> {
    source: &'a dyn MemorySource,
    chunk_size: usize,
    progress: Option<ProgressBar>,
}

impl<'a> MemoryDumper<'a> {
    pub fn new(source: &'a dyn MemorySource) -> Self {
        Self {
            source,
            chunk_size: DEFAULT_CHUNK_SIZE,
            progress: None,
        }
    }

    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size.max(1);
        self
    }

    pub fn with_progress(mut self, progress: ProgressBar) -> Self {
        self.progress = Some(progress);
        self
    }

    /// Copies the image's range out of memory. The result holds exactly
    /// `image.size()` bytes when the range is fully mapped and fewer otherwise.
    pub fn dump(&self, image: &ImageRecord) -> Result<ImageDump, DumpError> {
        let range = checked_range(image.base(), image.size())?;
        let (bytes, stopped_at) = self.read_range(&range)?;

        if bytes.len() as u64 == image.size() {
            info!("dumped 0x{:x} bytes of {}", bytes.len(), image.path().display());
        } else {
            warn!(
                "partial dump of {}: 0x{:x} of 0x{:x} bytes",
                image.path().display(),
                bytes.len(),
                image.size()
            );
        }

        Ok(ImageDump {
            image: image.clone(),
            requested: image.size(),
            bytes,
            stopped_at,
        })
    }

    /// Like [`dump`](Self::dump) but a short copy is an error.
    pub fn dump_exact(&self, image: &ImageRecord) -> Result<ImageDump, DumpError> {
        let dump = self.dump(image)?;
        if !dump.is_complete() {
            return Err(DumpError::PartialRead {
                requested: dump.requested(),
                read: dump.len(),
            });
        }
        Ok(dump)
    }

    /// Raw range copy without an image record.
    pub fn dump_range(&self, base: Address, size: u64) -> Result<Vec<u8>, DumpError> {
        let range = checked_range(base, size)?;
        self.read_range(&range).map(|(bytes, _)| bytes)
    }

    fn read_range(&self, range: &MemoryRange) -> Result<(Vec<u8>, Option<Address>), DumpError> {
        let total = range.size() as usize;
        let mut buffer = vec![0u8; total];
        let mut filled = 0usize;
        let mut stopped_at = None;

        if let Some(pb) = &self.progress {
            pb.set_length(total as u64);
            pb.set_position(0);
        }

        while filled < total {
            let cursor = range.start() + filled as u64;
            let want = self.chunk_size.min(total - filled);

            match self.source.read_at(cursor, &mut buffer[filled..filled + want]) {
                Ok(0) => {
                    stopped_at = Some(cursor);
                    break;
                }
                Ok(n) => {
                    filled += n;
                    if n < want {
                        debug!("short read at {}: 0x{:x} of 0x{:x}", cursor, n, want);
                    }
                }
                Err(MemoryError::Unmapped(addr)) => {
                    debug!("unmapped memory at 0x{:x}", addr);
                    stopped_at = Some(cursor);
                    break;
                }
                Err(MemoryError::PermissionDenied(addr)) => {
                    if filled == 0 {
                        return Err(DumpError::PermissionDenied(addr));
                    }
                    debug!("permission denied at 0x{:x}", addr);
                    stopped_at = Some(cursor);
                    break;
                }
                Err(e) => return Err(DumpError::Memory(e)),
            }

            if let Some(pb) = &self.progress {
                pb.set_position(filled as u64);
            }
        }

        if let Some(pb) = &self.progress {
            pb.finish_and_clear();
        }

        buffer.truncate(filled);
        Ok((buffer, stopped_at))
    }
}

fn checked_range(base: Address, size: u64) -> Result<MemoryRange, DumpError> {
    let invalid = DumpError::InvalidRange {
        base: base.as_u64(),
        size,
    };
    if size == 0 || usize::try_from(size).is_err() {
        return Err(invalid);
    }
    MemoryRange::from_start_size(base, size).map_err(|_| invalid)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::BufferMemory;

    struct DeniedMemory {
        allowed_until: u64,
    }

    impl MemorySource for DeniedMemory {
        fn read_at(&self, addr: Address, buf: &mut [u8]) -> Result<usize, MemoryError> {
            if addr.as_u64() >= self.allowed_until {
                return Err(MemoryError::PermissionDenied(addr.as_u64()));
            }
            let n = buf.len().min((self.allowed_until - addr.as_u64()) as usize);
            buf[..n].fill(0xaa);
            Ok(n)
        }
    }

    #[test]
    fn test_dump_fully_mapped_image() {
        let mem = BufferMemory::patterned(Address::new(0x1000), 0x2000);
        let image = ImageRecord::new("/ext", Address::new(0x1000), 0x2000);

        let dump = MemoryDumper::new(&mem).with_chunk_size(0x300).dump(&image).unwrap();
        assert_eq!(dump.len(), 0x2000);
        assert!(dump.is_complete());
        assert_eq!(dump.bytes(), mem.as_slice());
        assert!(dump.stopped_at().is_none());
    }

    #[test]
    fn test_dump_stops_at_hole() {
        let hole = MemoryRange::from_start_size(Address::new(0x1800), 0x100).unwrap();
        let mem = BufferMemory::patterned(Address::new(0x1000), 0x2000).with_hole(hole);
        let image = ImageRecord::new("/ext", Address::new(0x1000), 0x2000);

        let dump = MemoryDumper::new(&mem).with_chunk_size(0x400).dump(&image).unwrap();
        assert_eq!(dump.len(), 0x800);
        assert!(!dump.is_complete());
        assert_eq!(dump.stopped_at(), Some(Address::new(0x1800)));
        assert_eq!(dump.bytes(), &mem.as_slice()[..0x800]);
    }

    #[test]
    fn test_dump_never_exceeds_request() {
        let mem = BufferMemory::patterned(Address::new(0x1000), 0x1000);
        let image = ImageRecord::new("/ext", Address::new(0x1000), 0x2000);

        let dump = MemoryDumper::new(&mem).dump(&image).unwrap();
        assert_eq!(dump.len(), 0x1000);
        assert!(dump.len() < dump.requested());
    }

    #[test]
    fn test_dump_unmapped_start_is_empty_partial() {
        let mem = BufferMemory::patterned(Address::new(0x1000), 0x100);
        let image = ImageRecord::new("/ext", Address::new(0x9000), 0x100);

        let dump = MemoryDumper::new(&mem).dump(&image).unwrap();
        assert!(dump.is_empty());
        assert!(!dump.is_complete());
    }

    #[test]
    fn test_dump_exact_reports_partial_read() {
        let mem = BufferMemory::patterned(Address::new(0x1000), 0x100);
        let image = ImageRecord::new("/ext", Address::new(0x1000), 0x200);

        let err = MemoryDumper::new(&mem).dump_exact(&image).unwrap_err();
        assert!(matches!(err, DumpError::PartialRead { requested: 0x200, read: 0x100 }));
    }

    #[test]
    fn test_permission_denied_at_start_is_error() {
        let mem = DeniedMemory { allowed_until: 0 };
        let image = ImageRecord::new("/secret", Address::new(0x1000), 0x100);
        let err = MemoryDumper::new(&mem).dump(&image).unwrap_err();
        assert!(matches!(err, DumpError::PermissionDenied(0x1000)));
    }

    #[test]
    fn test_permission_denied_midway_is_partial() {
        let mem = DeniedMemory { allowed_until: 0x1080 };
        let image = ImageRecord::new("/secret", Address::new(0x1000), 0x100);
        let dump = MemoryDumper::new(&mem).with_chunk_size(0x40).dump(&image).unwrap();
        assert_eq!(dump.len(), 0x80);
    }

    #[test]
    fn test_invalid_ranges() {
        let mem = BufferMemory::patterned(Address::new(0x1000), 0x10);
        let dumper = MemoryDumper::new(&mem);
        assert!(matches!(
            dumper.dump_range(Address::new(0x1000), 0),
            Err(DumpError::InvalidRange { .. })
        ));
        assert!(matches!(
            dumper.dump_range(Address::new(u64::MAX - 4), 0x10),
            Err(DumpError::InvalidRange { .. })
        ));
    }
}
