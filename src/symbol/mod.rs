// Thu Oct 15 2026 - Alex

pub mod error;
pub mod resolver;

pub use error::ResolveError;
pub use resolver::{image_offset, parse_target, MethodTarget, OffsetResolver, ResolvedOffset};
