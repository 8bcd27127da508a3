// Thu Oct 15 2026 - Alex

use crate::image::{ImageRecord, ImageSelector, ImageTable, LocateError};
use log::{debug, info, warn};

/// Picks exactly one image out of an image table.
pub struct ImageLocator {
    selector: ImageSelector,
}

impl ImageLocator {
    pub fn new(selector: ImageSelector) -> Self {
        Self { selector }
    }

    pub fn locate(&self, table: &ImageTable) -> Result<ImageRecord, LocateError> {
        if table.is_empty() {
            return Err(LocateError::EmptyTable);
        }

        let image = match &self.selector {
            ImageSelector::First => {
                warn!("selecting the first loaded image by position; this assumes load order identifies the target");
                table.first().ok_or(LocateError::EmptyTable)?
            }
            ImageSelector::MainExecutable => {
                let main = table.main_executable().ok_or(LocateError::MainExecutableUnknown)?;
                table
                    .find_by_path(main)
                    .ok_or_else(|| LocateError::NoMatch(self.selector.clone()))?
            }
            selector => {
                let candidates: Vec<&ImageRecord> = table
                    .iter()
                    .filter(|image| selector.matches(image, table.main_executable()))
                    .collect();
                if candidates.len() > 1 {
                    debug!(
                        "selector '{}' matched {} images, taking the first",
                        selector,
                        candidates.len()
                    );
                }
                candidates
                    .into_iter()
                    .next()
                    .ok_or_else(|| LocateError::NoMatch(self.selector.clone()))?
            }
        };

        if image.base().is_null() {
            return Err(LocateError::NullBase(image.path().to_path_buf()));
        }

        info!("located image {}", image);
        Ok(image.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::Address;
    use std::path::Path;

    fn table() -> ImageTable {
        ImageTable::new(vec![
            ImageRecord::new("/ext", Address::new(0x1000), 0x2000),
            ImageRecord::new("/usr/lib/libobjc.so", Address::new(0x10000), 0x4000),
            ImageRecord::new("/usr/lib/libc.so.6", Address::new(0x20000), 0x8000),
        ])
        .with_main_executable("/ext")
    }

    #[test]
    fn test_locate_first() {
        let image = ImageLocator::new(ImageSelector::First).locate(&table()).unwrap();
        assert_eq!(image.path(), Path::new("/ext"));
        assert!(!image.base().is_null());
    }

    #[test]
    fn test_locate_main_executable() {
        let image = ImageLocator::new(ImageSelector::MainExecutable).locate(&table()).unwrap();
        assert_eq!(image.base(), Address::new(0x1000));

        let no_main = ImageTable::new(table().images().to_vec());
        let err = ImageLocator::new(ImageSelector::MainExecutable).locate(&no_main).unwrap_err();
        assert!(matches!(err, LocateError::MainExecutableUnknown));
    }

    #[test]
    fn test_locate_by_name() {
        let selector: ImageSelector = "name:libc.so.6".parse().unwrap();
        let image = ImageLocator::new(selector).locate(&table()).unwrap();
        assert_eq!(image.base(), Address::new(0x20000));
    }

    #[test]
    fn test_locate_no_match() {
        let selector: ImageSelector = "contains:missing".parse().unwrap();
        let err = ImageLocator::new(selector).locate(&table()).unwrap_err();
        assert!(matches!(err, LocateError::NoMatch(_)));
    }

    #[test]
    fn test_locate_empty_table() {
        let err = ImageLocator::new(ImageSelector::First).locate(&ImageTable::default()).unwrap_err();
        assert!(matches!(err, LocateError::EmptyTable));
    }

    #[test]
    fn test_locate_rejects_null_base() {
        let table = ImageTable::new(vec![ImageRecord::new("/zero", Address::zero(), 0x10)]);
        let err = ImageLocator::new(ImageSelector::First).locate(&table).unwrap_err();
        assert!(matches!(err, LocateError::NullBase(_)));
    }

    #[test]
    fn test_every_selector_returns_exactly_one() {
        let table = table();
        for text in ["first", "main", "contains:/usr/lib", "regex:\\.so"] {
            let selector: ImageSelector = text.parse().unwrap();
            let image = ImageLocator::new(selector).locate(&table).unwrap();
            assert!(table.images().contains(&image));
        }
    }
}
