// Thu Oct 15 2026 - Alex

use crate::memory::Address;
use crate::reflection::{MethodDescriptor, MethodKind, ReflectionError};
use indexmap::IndexMap;

/// Runtime class/method enumeration by name.
pub trait ClassRegistry {
    fn class_names(&self) -> Vec<String>;
    fn methods(&self, class_name: &str) -> Result<Vec<MethodDescriptor>, ReflectionError>;
}

/// Registry populated up front, keyed by class name in insertion order.
#[derive(Debug, Clone, Default)]
pub struct StaticRegistry {
    classes: IndexMap<String, Vec<MethodDescriptor>>,
}

impl StaticRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_method(&mut self, method: MethodDescriptor) {
        self.classes
            .entry(method.class_name.clone())
            .or_default()
            .push(method);
    }

    pub fn with_method(mut self, class_name: &str, selector: &str, implementation: Address) -> Self {
        self.add_method(MethodDescriptor::new(class_name, selector, MethodKind::Instance, implementation));
        self
    }

    pub fn with_class_method(mut self, class_name: &str, selector: &str, implementation: Address) -> Self {
        self.add_method(MethodDescriptor::new(class_name, selector, MethodKind::Class, implementation));
        self
    }

    pub fn method_count(&self) -> usize {
        self.classes.values().map(Vec::len).sum()
    }
}

impl ClassRegistry for StaticRegistry {
    fn class_names(&self) -> Vec<String> {
        self.classes.keys().cloned().collect()
    }

    fn methods(&self, class_name: &str) -> Result<Vec<MethodDescriptor>, ReflectionError> {
        self.classes
            .get(class_name)
            .cloned()
            .ok_or_else(|| ReflectionError::ClassNotFound(class_name.to_string()))
    }
}

impl<T: ClassRegistry + ?Sized> ClassRegistry for &T {
    fn class_names(&self) -> Vec<String> {
        (**self).class_names()
    }

    fn methods(&self, class_name: &str) -> Result<Vec<MethodDescriptor>, ReflectionError> {
        (**self).methods(class_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_static_registry_lookup() {
        let registry = StaticRegistry::new()
            .with_method("Sandbox", "evaluate:", Address::new(0x1100))
            .with_method("Sandbox", "reset", Address::new(0x1200))
            .with_class_method("Runner", "shared", Address::new(0x1300));

        assert_eq!(registry.class_names(), vec!["Sandbox".to_string(), "Runner".to_string()]);
        assert_eq!(registry.method_count(), 3);

        let methods = registry.methods("Sandbox").unwrap();
        assert_eq!(methods.len(), 2);
        assert_eq!(methods[1].selector, "reset");

        assert!(matches!(
            registry.methods("Missing"),
            Err(ReflectionError::ClassNotFound(_))
        ));
    }
}
