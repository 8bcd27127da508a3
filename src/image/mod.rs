// Thu Oct 15 2026 - Alex

pub mod error;
pub mod locator;
pub mod maps;
pub mod record;
pub mod selector;
pub mod table;

pub use error::LocateError;
pub use locator::ImageLocator;
pub use record::ImageRecord;
pub use selector::ImageSelector;
pub use table::ImageTable;
