// Thu Oct 15 2026 - Alex

use crate::image::{ImageRecord, ImageTable};
use crate::memory::Address;
use crate::reflection::demangle::split_path;
use crate::reflection::method::base_name;
use crate::reflection::{ClassRegistry, MethodDescriptor, MethodKind};
use crate::symbol::ResolveError;
use log::{debug, info};
use serde::Serialize;
use std::fmt;

/// A method implementation expressed relative to the image containing it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedOffset {
    pub method: MethodDescriptor,
    pub image: ImageRecord,
    pub offset: u64,
}

impl fmt::Display for ResolvedOffset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}.{} = {}+0x{:x}",
            self.method.class_name,
            self.method.selector,
            self.image.file_name().unwrap_or("?"),
            self.offset
        )
    }
}

pub struct OffsetResolver<'a> {
    registry: &'a dyn ClassRegistry,
    table: &'a ImageTable,
}

impl<'a> OffsetResolver<'a> {
    pub fn new(registry: &'a dyn ClassRegistry, table: &'a ImageTable) -> Self {
        Self { registry, table }
    }

    /// A leading `+` or `-` on `method_name` restricts the match to class or
    /// instance methods.
    pub fn resolve(&self, class_name: &str, method_name: &str) -> Result<ResolvedOffset, ResolveError> {
        let (kind, method_name) = split_kind(method_name);
        self.resolve_kind(class_name, method_name, kind)
    }

    /// Accepts `Class.method`, `Class::method`, `Class.+method` and the
    /// `+[Class selector]` / `-[Class selector]` forms.
    pub fn resolve_target(&self, target: &str) -> Result<ResolvedOffset, ResolveError> {
        let target = parse_target(target).ok_or_else(|| ResolveError::InvalidTarget(target.to_string()))?;
        self.resolve_kind(target.class_name, target.method_name, target.kind)
    }

    fn resolve_kind(
        &self,
        class_name: &str,
        method_name: &str,
        kind: Option<MethodKind>,
    ) -> Result<ResolvedOffset, ResolveError> {
        let methods = self.registry.methods(class_name)?;
        debug!("class {} has {} methods", class_name, methods.len());

        let method = find_method(&methods, class_name, method_name, kind)?;
        let resolved = self.resolve_method(method)?;
        info!("resolved {}", resolved);
        Ok(resolved)
    }

    pub fn resolve_method(&self, method: MethodDescriptor) -> Result<ResolvedOffset, ResolveError> {
        let (image, offset) = self.resolve_address(method.implementation)?;
        Ok(ResolvedOffset {
            method,
            image: image.clone(),
            offset,
        })
    }

    /// Finds the image holding `addr` and returns `addr - base`.
    pub fn resolve_address(&self, addr: Address) -> Result<(&'a ImageRecord, u64), ResolveError> {
        let image = self
            .table
            .find_containing(addr)
            .ok_or(ResolveError::ImageNotFound(addr.as_u64()))?;
        Ok((image, image_offset(image, addr)?))
    }

    /// `libfoo.so+0x1234` style rendering, or the raw address when no image holds it.
    pub fn describe(&self, addr: Address) -> String {
        match self.resolve_address(addr) {
            Ok((image, offset)) => format!("{}+0x{:x}", image.file_name().unwrap_or("?"), offset),
            Err(_) => addr.to_string(),
        }
    }
}

/// `addr - image.base`, which must lie in `[0, image.size)`.
pub fn image_offset(image: &ImageRecord, addr: Address) -> Result<u64, ResolveError> {
    let offset = addr
        .offset_from(image.base())
        .ok_or(ResolveError::ImageNotFound(addr.as_u64()))?;
    if offset >= image.size() {
        return Err(ResolveError::OffsetOutOfRange {
            offset,
            size: image.size(),
        });
    }
    Ok(offset)
}

/// A parsed `Class.method` target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MethodTarget<'t> {
    pub class_name: &'t str,
    pub method_name: &'t str,
    pub kind: Option<MethodKind>,
}

pub fn parse_target(target: &str) -> Option<MethodTarget<'_>> {
    let target = target.trim();

    if let Some(split) = parse_objc_target(target) {
        return Some(split);
    }

    let (class_name, method_name) = match target.rsplit_once('.') {
        Some(split) => split,
        None => split_path(target)?,
    };
    let (kind, method_name) = split_kind(method_name);
    if class_name.is_empty() || method_name.is_empty() {
        return None;
    }
    Some(MethodTarget {
        class_name,
        method_name,
        kind,
    })
}

fn parse_objc_target(target: &str) -> Option<MethodTarget<'_>> {
    let (kind, rest) = split_kind(target);
    let kind = kind?;
    let inner = rest.strip_prefix('[')?.strip_suffix(']')?;
    let (class_name, method_name) = inner.trim().split_once(' ')?;
    let method_name = method_name.trim();
    if class_name.is_empty() || method_name.is_empty() {
        return None;
    }
    Some(MethodTarget {
        class_name,
        method_name,
        kind: Some(kind),
    })
}

fn split_kind(method_name: &str) -> (Option<MethodKind>, &str) {
    if let Some(rest) = method_name.strip_prefix('+') {
        (Some(MethodKind::Class), rest)
    } else if let Some(rest) = method_name.strip_prefix('-') {
        (Some(MethodKind::Instance), rest)
    } else {
        (None, method_name)
    }
}

/// Exact selector match first, then a match ignoring argument lists and
/// trailing colons. Several entries sharing one implementation count once.
fn find_method(
    methods: &[MethodDescriptor],
    class_name: &str,
    method_name: &str,
    kind: Option<MethodKind>,
) -> Result<MethodDescriptor, ResolveError> {
    let methods: Vec<&MethodDescriptor> = methods
        .iter()
        .filter(|m| kind.map_or(true, |k| m.kind == k))
        .collect();

    let mut candidates: Vec<&MethodDescriptor> =
        methods.iter().copied().filter(|m| m.selector == method_name).collect();

    if candidates.is_empty() {
        let wanted = base_name(method_name);
        candidates = methods.iter().copied().filter(|m| m.base_selector() == wanted).collect();
    }

    candidates.sort_by_key(|m| m.implementation);
    candidates.dedup_by_key(|m| m.implementation);

    let display_name = match kind {
        Some(MethodKind::Class) => format!("+{}", method_name),
        Some(MethodKind::Instance) => format!("-{}", method_name),
        None => method_name.to_string(),
    };

    match candidates.len() {
        0 => Err(ResolveError::MethodNotFound {
            class: class_name.to_string(),
            method: display_name,
        }),
        1 => Ok(candidates[0].clone()),
        count => Err(ResolveError::Ambiguous {
            class: class_name.to_string(),
            method: display_name,
            count,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reflection::demangle::split_symbol;
    use crate::reflection::{ReflectionError, StaticRegistry};

    fn table() -> ImageTable {
        ImageTable::new(vec![
            ImageRecord::new("/ext", Address::new(0x1000), 0x2000),
            ImageRecord::new("/usr/lib/libjs.so", Address::new(0x10000), 0x8000),
        ])
    }

    fn registry() -> StaticRegistry {
        StaticRegistry::new()
            .with_method("Sandbox", "evaluateScript:", Address::new(0x1840))
            .with_method("Sandbox", "reset", Address::new(0x1900))
            .with_method("JSContext", "evaluate", Address::new(0x12345))
            .with_method("Overloaded", "run(int)", Address::new(0x1100))
            .with_method("Overloaded", "run(char)", Address::new(0x1200))
            .with_method("Stray", "lost", Address::new(0x90000))
    }

    #[test]
    fn test_offset_is_address_minus_base() {
        let table = table();
        let registry = registry();
        let resolver = OffsetResolver::new(&registry, &table);

        let resolved = resolver.resolve("Sandbox", "evaluateScript:").unwrap();
        assert_eq!(resolved.offset, 0x840);
        assert_eq!(resolved.image.base(), Address::new(0x1000));
        assert!(resolved.offset < resolved.image.size());

        let resolved = resolver.resolve("JSContext", "evaluate").unwrap();
        assert_eq!(resolved.offset, 0x2345);
        assert_eq!(resolved.image.file_name(), Some("libjs.so"));
    }

    #[test]
    fn test_match_ignoring_colons() {
        let table = table();
        let registry = registry();
        let resolver = OffsetResolver::new(&registry, &table);
        let resolved = resolver.resolve("Sandbox", "evaluateScript").unwrap();
        assert_eq!(resolved.method.selector, "evaluateScript:");
    }

    #[test]
    fn test_errors() {
        let table = table();
        let registry = registry();
        let resolver = OffsetResolver::new(&registry, &table);

        assert!(matches!(resolver.resolve("Nope", "x"), Err(ResolveError::ClassNotFound(_))));
        assert!(matches!(
            resolver.resolve("Sandbox", "missing"),
            Err(ResolveError::MethodNotFound { .. })
        ));
        assert!(matches!(
            resolver.resolve("Overloaded", "run"),
            Err(ResolveError::Ambiguous { count: 2, .. })
        ));
        assert!(matches!(
            resolver.resolve("Stray", "lost"),
            Err(ResolveError::ImageNotFound(0x90000))
        ));
        assert!(resolver.resolve("Overloaded", "run(int)").is_ok());
    }

    #[test]
    fn test_resolve_target_forms() {
        let table = table();
        let registry = registry();
        let resolver = OffsetResolver::new(&registry, &table);
        assert_eq!(resolver.resolve_target("Sandbox.reset").unwrap().offset, 0x900);
        assert_eq!(resolver.resolve_target("Sandbox::reset").unwrap().offset, 0x900);
        assert!(matches!(resolver.resolve_target("reset"), Err(ResolveError::InvalidTarget(_))));
    }

    #[test]
    fn test_describe() {
        let table = table();
        let registry = registry();
        let resolver = OffsetResolver::new(&registry, &table);
        assert_eq!(resolver.describe(Address::new(0x1010)), "ext+0x10");
        assert_eq!(resolver.describe(Address::new(0x5)), "0x0000000000000005");
    }

    #[test]
    fn test_overloads_from_demangled_symbols() {
        let mut registry = StaticRegistry::new();
        for (raw, addr) in [("_ZN7sandbox6Runner3runEi", 0x1100), ("_ZN7sandbox6Runner3runEc", 0x1200)] {
            let split = split_symbol(raw).unwrap();
            registry.add_method(MethodDescriptor::new(&split.class_name, &split.selector, split.kind, Address::new(addr)));
        }
        let table = table();
        let resolver = OffsetResolver::new(&registry, &table);

        assert_eq!(resolver.resolve("sandbox::Runner", "run(int)").unwrap().offset, 0x100);
        assert_eq!(resolver.resolve("sandbox::Runner", "run(char)").unwrap().offset, 0x200);
        assert!(matches!(
            resolver.resolve("sandbox::Runner", "run"),
            Err(ResolveError::Ambiguous { count: 2, .. })
        ));
    }

    #[test]
    fn test_class_and_instance_methods_are_told_apart() {
        let registry = StaticRegistry::new()
            .with_method("NSBundle", "bundle", Address::new(0x1400))
            .with_class_method("NSBundle", "bundle", Address::new(0x1500));
        let table = table();
        let resolver = OffsetResolver::new(&registry, &table);

        assert!(matches!(
            resolver.resolve_target("NSBundle.bundle"),
            Err(ResolveError::Ambiguous { count: 2, .. })
        ));
        assert_eq!(resolver.resolve_target("NSBundle.+bundle").unwrap().offset, 0x500);
        assert_eq!(resolver.resolve_target("NSBundle.-bundle").unwrap().offset, 0x400);
        assert_eq!(resolver.resolve_target("+[NSBundle bundle]").unwrap().offset, 0x500);
        assert_eq!(resolver.resolve_target("-[NSBundle bundle]").unwrap().offset, 0x400);
        assert_eq!(resolver.resolve("NSBundle", "+bundle").unwrap().method.kind, MethodKind::Class);
        assert!(matches!(
            resolver.resolve("Sandbox", "+reset"),
            Err(ResolveError::MethodNotFound { .. })
        ));
    }

    #[test]
    fn test_parse_target_forms() {
        let target = parse_target("+[NSBundle mainBundle]").unwrap();
        assert_eq!(target.class_name, "NSBundle");
        assert_eq!(target.method_name, "mainBundle");
        assert_eq!(target.kind, Some(MethodKind::Class));

        let target = parse_target("a::Runner::run").unwrap();
        assert_eq!((target.class_name, target.method_name, target.kind), ("a::Runner", "run", None));

        assert!(parse_target("-[NSBundle]").is_none());
        assert!(parse_target("Sandbox.+").is_none());
    }

    #[test]
    fn test_offset_must_lie_inside_image() {
        let image = ImageRecord::new("/ext", Address::new(0x1000), 0x2000);
        assert_eq!(image_offset(&image, Address::new(0x1000)).unwrap(), 0);
        assert_eq!(image_offset(&image, Address::new(0x2fff)).unwrap(), 0x1fff);
        assert!(matches!(
            image_offset(&image, Address::new(0x3000)),
            Err(ResolveError::OffsetOutOfRange { offset: 0x2000, size: 0x2000 })
        ));
        assert!(matches!(
            image_offset(&image, Address::new(0x800)),
            Err(ResolveError::ImageNotFound(0x800))
        ));
    }

    #[test]
    fn test_reflection_errors_map_to_class_not_found() {
        let err: ResolveError = ReflectionError::ClassNotFound("X".into()).into();
        assert!(matches!(err, ResolveError::ClassNotFound(_)));
    }
}
