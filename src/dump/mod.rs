// Thu Oct 15 2026 - Alex

pub mod dumper;
pub mod error;
pub mod export;

pub use dumper::{ImageDump, MemoryDumper, DEFAULT_CHUNK_SIZE};
pub use error::{DumpError, ExportError};
pub use export::{Attachment, CollectingExporter, ExportChannel, ExportReceipt, FileExporter};
