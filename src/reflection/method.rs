// Thu Oct 15 2026 - Alex

use crate::memory::Address;
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MethodKind {
    Instance,
    Class,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MethodDescriptor {
    pub class_name: String,
    pub selector: String,
    pub kind: MethodKind,
    pub implementation: Address,
}

impl MethodDescriptor {
    pub fn new(class_name: &str, selector: &str, kind: MethodKind, implementation: Address) -> Self {
        Self {
            class_name: class_name.to_string(),
            selector: selector.to_string(),
            kind,
            implementation,
        }
    }

    pub fn instance(class_name: &str, selector: &str, implementation: Address) -> Self {
        Self::new(class_name, selector, MethodKind::Instance, implementation)
    }

    pub fn class_method(class_name: &str, selector: &str, implementation: Address) -> Self {
        Self::new(class_name, selector, MethodKind::Class, implementation)
    }

    /// Selector with any argument list or trailing colons removed, so that
    /// `length()` and `setValue:` compare as `length` and `setValue`.
    pub fn base_selector(&self) -> &str {
        base_name(&self.selector)
    }
}

pub(crate) fn base_name(selector: &str) -> &str {
    let cut = selector.find('(').unwrap_or(selector.len());
    selector[..cut].trim_end_matches(':').trim()
}

impl fmt::Display for MethodDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sigil = match self.kind {
            MethodKind::Instance => '-',
            MethodKind::Class => '+',
        };
        write!(f, "{}[{} {}] @ {}", sigil, self.class_name, self.selector, self.implementation)
    }
}
