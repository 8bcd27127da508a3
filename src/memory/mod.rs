// Thu Oct 15 2026 - Alex

pub mod address;
pub mod buffer;
pub mod error;
pub mod process;
pub mod protection;
pub mod range;
pub mod region;
pub mod source;

pub use address::Address;
pub use buffer::BufferMemory;
pub use error::MemoryError;
pub use process::ProcessMemory;
pub use protection::Protection;
pub use range::MemoryRange;
pub use region::MemoryRegion;
pub use source::MemorySource;
