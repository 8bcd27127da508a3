// Thu Oct 15 2026 - Alex

use crate::reflection::MethodKind;
use cpp_demangle::DemangleOptions;

/// A symbol name broken into the class that owns it and the method name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitSymbol {
    pub class_name: String,
    pub selector: String,
    pub kind: MethodKind,
}

/// Splits a raw symbol-table name into class and selector.
///
/// Understands `-[Class selector]` / `+[Class selector]`, Rust and Itanium
/// mangled names, and already readable `Class::method` paths. Plain C names
/// have no class and yield `None`. C++ selectors keep their parameter list,
/// so overloads stay distinct (`run(int)`, `run(char)`).
pub fn split_symbol(raw: &str) -> Option<SplitSymbol> {
    if let Some(split) = split_objc(raw) {
        return Some(split);
    }

    let readable = demangle(raw).unwrap_or_else(|| raw.to_string());
    let (class_name, selector) = split_path(&readable)?;
    if class_name.is_empty() || selector.is_empty() {
        return None;
    }

    Some(SplitSymbol {
        class_name: class_name.to_string(),
        selector: selector.to_string(),
        kind: MethodKind::Instance,
    })
}

pub fn demangle(raw: &str) -> Option<String> {
    // Mach-O prefixes C level names with one extra underscore.
    let name = match raw.strip_prefix('_') {
        Some(rest) if rest.starts_with("_Z") || rest.starts_with("_R") => rest,
        _ => raw,
    };

    if is_rust_symbol(name) {
        if let Ok(demangled) = rustc_demangle::try_demangle(name) {
            return Some(format!("{:#}", demangled));
        }
    }

    if name.starts_with("_Z") {
        let symbol = cpp_demangle::Symbol::new(name.as_bytes()).ok()?;
        let options = DemangleOptions::new().no_return_type();
        return symbol.demangle(&options).ok();
    }

    None
}

fn is_rust_symbol(name: &str) -> bool {
    name.starts_with("_R") || (name.starts_with("_ZN") && name.ends_with('E') && name.contains("17h"))
}

fn split_objc(raw: &str) -> Option<SplitSymbol> {
    let kind = match raw.chars().next()? {
        '-' => MethodKind::Instance,
        '+' => MethodKind::Class,
        _ => return None,
    };
    let inner = raw.get(1..)?.strip_prefix('[')?.strip_suffix(']')?;
    let (class_part, selector) = inner.split_once(' ')?;

    // `Class(Category)` belongs to `Class`.
    let class_name = class_part.split('(').next().unwrap_or(class_part);
    if class_name.is_empty() || selector.is_empty() {
        return None;
    }

    Some(SplitSymbol {
        class_name: class_name.to_string(),
        selector: selector.to_string(),
        kind,
    })
}

/// Splits `a::b::C::method` at the last top-level `::`, ignoring separators
/// nested inside `<...>` or `(...)`.
pub fn split_path(path: &str) -> Option<(&str, &str)> {
    let bytes = path.as_bytes();
    let mut depth = 0i32;
    let mut split_at = None;
    let mut i = 0usize;

    while i < bytes.len() {
        match bytes[i] {
            b'<' | b'(' => depth += 1,
            b'>' | b')' => depth -= 1,
            b':' if depth == 0 && bytes.get(i + 1) == Some(&b':') => {
                split_at = Some(i);
                i += 1;
            }
            _ => {}
        }
        i += 1;
    }

    let at = split_at?;
    Some((&path[..at], &path[at + 2..]))
}

/// Last `::` component of a class path.
pub fn short_class_name(class_name: &str) -> &str {
    match split_path(class_name) {
        Some((_, last)) => last,
        None => class_name,
    }
}
