// Thu Oct 15 2026 - Alex

pub mod demangle;
pub mod error;
pub mod method;
pub mod registry;
pub mod symbols;

pub use error::ReflectionError;
pub use method::{MethodDescriptor, MethodKind};
pub use registry::{ClassRegistry, StaticRegistry};
pub use symbols::SymbolTableRegistry;
