// Thu Oct 15 2026 - Alex

pub mod config;
pub mod dump;
pub mod image;
pub mod memory;
pub mod output;
pub mod reflection;
pub mod symbol;
pub mod ui;
pub mod utils;
pub mod workflow;

pub use config::Config;
pub use dump::{ExportChannel, FileExporter, MemoryDumper};
pub use image::{ImageLocator, ImageRecord, ImageSelector, ImageTable};
pub use memory::{Address, BufferMemory, MemorySource, ProcessMemory};
pub use output::{ProcedureReport, ReportGenerator};
pub use reflection::{ClassRegistry, StaticRegistry, SymbolTableRegistry};
pub use symbol::{OffsetResolver, ResolvedOffset};
pub use workflow::{Procedure, ProcedureError};
