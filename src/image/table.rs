// Thu Oct 15 2026 - Alex

use crate::image::ImageRecord;
use crate::memory::{Address, MemoryRegion};
use indexmap::IndexMap;
use log::debug;
use std::path::{Path, PathBuf};

/// Read-only snapshot of a process's loaded images, in load order.
#[derive(Debug, Clone, Default)]
pub struct ImageTable {
    images: Vec<ImageRecord>,
    main_executable: Option<PathBuf>,
}

impl ImageTable {
    pub fn new(images: Vec<ImageRecord>) -> Self {
        Self {
            images,
            main_executable: None,
        }
    }

    pub fn with_main_executable<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.main_executable = Some(path.into());
        self
    }

    /// Folds file-backed mappings into one record per path. The base is the
    /// lowest mapping start and the size spans up to the highest mapping end.
    /// Paths with no executable mapping (locale archives, fonts, shared
    /// memory files) are data, not images, and are left out.
    pub fn from_regions(regions: &[MemoryRegion], main_executable: Option<PathBuf>) -> Self {
        let mut spans: IndexMap<&Path, (Address, Address, bool)> = IndexMap::new();

        for region in regions {
            let Some(path) = region.file_path() else {
                continue;
            };
            spans
                .entry(path)
                .and_modify(|(lo, hi, exec)| {
                    *lo = (*lo).min(region.start());
                    *hi = (*hi).max(region.end());
                    *exec |= region.is_executable();
                })
                .or_insert((region.start(), region.end(), region.is_executable()));
        }

        let images: Vec<ImageRecord> = spans
            .into_iter()
            .filter(|(path, (_, _, exec))| {
                if !exec {
                    debug!("skipping data mapping {}", path.display());
                }
                *exec
            })
            .map(|(path, (lo, hi, _))| ImageRecord::new(path, lo, hi.as_u64() - lo.as_u64()))
            .collect();

        debug!("built image table with {} images from {} regions", images.len(), regions.len());

        Self {
            images,
            main_executable,
        }
    }

    pub fn images(&self) -> &[ImageRecord] {
        &self.images
    }

    pub fn len(&self) -> usize {
        self.images.len()
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    pub fn first(&self) -> Option<&ImageRecord> {
        self.images.first()
    }

    pub fn main_executable(&self) -> Option<&Path> {
        self.main_executable.as_deref()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ImageRecord> {
        self.images.iter()
    }

    /// Address-to-image lookup. When several records cover `addr` the one
    /// with the highest base wins.
    pub fn find_containing(&self, addr: Address) -> Option<&ImageRecord> {
        self.images
            .iter()
            .filter(|image| image.contains(addr))
            .max_by_key(|image| image.base())
    }

    pub fn find_by_path(&self, path: &Path) -> Option<&ImageRecord> {
        self.images.iter().find(|image| image.path() == path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::{MemoryRange, Protection};

    fn region(start: u64, size: u64, prot: Protection, path: Option<&str>) -> MemoryRegion {
        let range = MemoryRange::from_start_size(Address::new(start), size).unwrap();
        let region = MemoryRegion::new(range, prot);
        match path {
            Some(p) => region.with_file_path(p),
            None => region,
        }
    }

    #[test]
    fn test_from_regions_groups_by_path() {
        let regions = vec![
            region(0x1000, 0x1000, Protection::READ, Some("/bin/app")),
            region(0x2000, 0x2000, Protection::READ_EXECUTE, Some("/bin/app")),
            region(0x4000, 0x1000, Protection::READ_WRITE, None),
            region(0x7000, 0x1000, Protection::READ_EXECUTE, Some("/lib/libc.so.6")),
            region(0x8000, 0x1000, Protection::READ_WRITE, Some("/lib/libc.so.6")),
        ];
        let table = ImageTable::from_regions(&regions, None);

        assert_eq!(table.len(), 2);
        let app = &table.images()[0];
        assert_eq!(app.path(), Path::new("/bin/app"));
        assert_eq!(app.base(), Address::new(0x1000));
        assert_eq!(app.size(), 0x3000);

        let libc = &table.images()[1];
        assert_eq!(libc.base(), Address::new(0x7000));
        assert_eq!(libc.size(), 0x2000);
    }

    #[test]
    fn test_find_containing_prefers_innermost() {
        let table = ImageTable::new(vec![
            ImageRecord::new("/outer", Address::new(0x1000), 0x10000),
            ImageRecord::new("/inner", Address::new(0x4000), 0x1000),
        ]);
        let hit = table.find_containing(Address::new(0x4800)).unwrap();
        assert_eq!(hit.path(), Path::new("/inner"));

        let hit = table.find_containing(Address::new(0x9000)).unwrap();
        assert_eq!(hit.path(), Path::new("/outer"));

        assert!(table.find_containing(Address::new(0x20000)).is_none());
    }

    #[test]
    fn test_data_files_are_not_images() {
        let regions = vec![
            region(0x1000, 0x1000, Protection::READ, Some("/usr/lib/locale/locale-archive")),
            region(0x3000, 0x1000, Protection::READ, Some("/bin/app")),
            region(0x4000, 0x1000, Protection::READ_EXECUTE, Some("/bin/app")),
            region(0x6000, 0x1000, Protection::READ_WRITE, Some("/dev/shm/cache")),
        ];
        let table = ImageTable::from_regions(&regions, Some(PathBuf::from("/bin/app")));

        assert_eq!(table.len(), 1);
        let first = table.first().unwrap();
        assert_eq!(first.path(), Path::new("/bin/app"));
        assert_eq!(first.base(), Address::new(0x3000));
        assert_eq!(first.size(), 0x2000);
    }

    #[test]
    fn test_anonymous_regions_are_not_images() {
        let regions = vec![region(0x1000, 0x1000, Protection::READ_WRITE, None)];
        let table = ImageTable::from_regions(&regions, Some(PathBuf::from("/bin/app")));
        assert!(table.is_empty());
        assert_eq!(table.main_executable(), Some(Path::new("/bin/app")));
    }
}
