// Thu Oct 15 2026 - Alex

use crate::memory::Address;
use crate::reflection::demangle::{short_class_name, split_symbol};
use crate::reflection::{ClassRegistry, MethodDescriptor, ReflectionError};
use goblin::elf::program_header::PT_LOAD;
use goblin::elf::Elf;
use goblin::mach::cputype::{self, CpuType};
use goblin::mach::{Mach, MachO, MultiArch, SingleArch};
use goblin::Object;
use indexmap::IndexMap;
use log::{debug, info, warn};
use memmap2::Mmap;
use std::collections::HashSet;
use std::fs::File;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

const PAGE_SIZE: u64 = 0x1000;
const N_STAB: u8 = 0xe0;
const N_TYPE: u8 = 0x0e;
const N_SECT: u8 = 0x0e;

/// Class/method reflection backed by an image's on-disk symbol table.
///
/// Symbol values are rebased onto `image_base`, the address the image was
/// found loaded at, so implementations are live addresses.
#[derive(Debug)]
pub struct SymbolTableRegistry {
    path: PathBuf,
    image_base: Address,
    classes: IndexMap<String, Vec<MethodDescriptor>>,
}

impl SymbolTableRegistry {
    pub fn load<P: AsRef<Path>>(path: P, image_base: Address) -> Result<Self, ReflectionError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| open_error(path, e))?;
        let mmap = unsafe { Mmap::map(&file) }.map_err(|e| open_error(path, e))?;
        Self::from_bytes(path, &mmap, image_base)
    }

    pub fn from_bytes(path: &Path, data: &[u8], image_base: Address) -> Result<Self, ReflectionError> {
        let object = Object::parse(data).map_err(|e| ReflectionError::ParseError {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        let mut registry = Self {
            path: path.to_path_buf(),
            image_base,
            classes: IndexMap::new(),
        };

        match object {
            Object::Elf(elf) => registry.collect_elf(&elf),
            Object::Mach(Mach::Binary(macho)) => registry.collect_macho(&macho),
            Object::Mach(Mach::Fat(multi)) => {
                let macho = host_slice(&multi, path)?;
                registry.collect_macho(&macho)
            }
            _ => {
                return Err(ReflectionError::UnsupportedFormat(format!(
                    "{} is neither ELF nor Mach-O",
                    path.display()
                )))
            }
        }

        info!(
            "loaded {} classes from symbol table of {}",
            registry.classes.len(),
            path.display()
        );
        Ok(registry)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn method_count(&self) -> usize {
        self.classes.values().map(Vec::len).sum()
    }

    fn collect_elf(&mut self, elf: &Elf) {
        let link_base = elf
            .program_headers
            .iter()
            .filter(|ph| ph.p_type == PT_LOAD)
            .map(|ph| ph.p_vaddr)
            .min()
            .map(|vaddr| Address::new(vaddr).align_down(PAGE_SIZE))
            .unwrap_or_default();

        let mut seen = HashSet::new();
        let tables = [(&elf.syms, &elf.strtab), (&elf.dynsyms, &elf.dynstrtab)];

        for (symtab, strtab) in tables {
            for sym in symtab.iter() {
                if !sym.is_function() || sym.st_value == 0 || sym.st_shndx == 0 {
                    continue;
                }
                let Some(name) = strtab.get_at(sym.st_name) else {
                    continue;
                };
                if let Some(addr) = self.rebase(sym.st_value, link_base) {
                    self.insert(name, addr, &mut seen);
                }
            }
        }
    }

    fn collect_macho(&mut self, macho: &MachO) {
        let mut link_base = Address::zero();
        for segment in &macho.segments {
            let segname = std::str::from_utf8(&segment.segname)
                .unwrap_or("")
                .trim_end_matches('\0');
            if segname == "__TEXT" {
                link_base = Address::new(segment.vmaddr);
                break;
            }
        }

        let mut seen = HashSet::new();
        for entry in macho.symbols() {
            let Ok((name, nlist)) = entry else {
                continue;
            };
            if nlist.n_type & N_STAB != 0 || nlist.n_type & N_TYPE != N_SECT || nlist.n_value == 0 {
                continue;
            }
            if let Some(addr) = self.rebase(nlist.n_value, link_base) {
                self.insert(name, addr, &mut seen);
            }
        }
    }

    fn rebase(&self, value: u64, link_base: Address) -> Option<Address> {
        let delta = Address::new(value).offset_from(link_base)?;
        self.image_base.checked_add(delta)
    }

    fn insert(&mut self, name: &str, addr: Address, seen: &mut HashSet<(String, String, Address)>) {
        let Some(split) = split_symbol(name) else {
            return;
        };
        if !seen.insert((split.class_name.clone(), split.selector.clone(), addr)) {
            return;
        }
        debug!("{}::{} -> {}", split.class_name, split.selector, addr);
        let method = MethodDescriptor::new(&split.class_name, &split.selector, split.kind, addr);
        self.classes.entry(split.class_name).or_default().push(method);
    }
}

impl ClassRegistry for SymbolTableRegistry {
    fn class_names(&self) -> Vec<String> {
        self.classes.keys().cloned().collect()
    }

    /// Exact class name first, then every class whose last path component
    /// equals `class_name` (`Runner` finds `sandbox::Runner`).
    fn methods(&self, class_name: &str) -> Result<Vec<MethodDescriptor>, ReflectionError> {
        if let Some(methods) = self.classes.get(class_name) {
            return Ok(methods.clone());
        }

        let methods: Vec<MethodDescriptor> = self
            .classes
            .iter()
            .filter(|(name, _)| short_class_name(name) == class_name)
            .flat_map(|(_, methods)| methods.iter().cloned())
            .collect();

        if methods.is_empty() {
            return Err(ReflectionError::ClassNotFound(class_name.to_string()));
        }
        Ok(methods)
    }
}

#[cfg(target_arch = "aarch64")]
const HOST_CPU_TYPE: CpuType = cputype::CPU_TYPE_ARM64;
#[cfg(not(target_arch = "aarch64"))]
const HOST_CPU_TYPE: CpuType = cputype::CPU_TYPE_X86_64;

/// The slice of a universal binary built for this host, or the first Mach-O
/// slice when none matches.
fn host_slice<'a>(multi: &MultiArch<'a>, path: &Path) -> Result<MachO<'a>, ReflectionError> {
    let parse_error = |e: goblin::error::Error| ReflectionError::ParseError {
        path: path.to_path_buf(),
        message: e.to_string(),
    };

    let arches = multi.arches().map_err(parse_error)?;
    let index = match arches.iter().position(|arch| arch.cputype == HOST_CPU_TYPE) {
        Some(index) => index,
        None => {
            warn!(
                "{} has no slice for cpu type {:#x}, using the first of {}",
                path.display(),
                HOST_CPU_TYPE,
                arches.len()
            );
            0
        }
    };
    debug!("using fat slice {} of {}", index, path.display());

    match multi.get(index).map_err(parse_error)? {
        SingleArch::MachO(macho) => Ok(macho),
        SingleArch::Archive(_) => Err(ReflectionError::UnsupportedFormat(format!(
            "slice {} of {} is a static archive",
            index,
            path.display()
        ))),
    }
}

fn open_error(path: &Path, source: std::io::Error) -> ReflectionError {
    match source.kind() {
        ErrorKind::PermissionDenied => ReflectionError::PermissionDenied(path.to_path_buf()),
        _ => ReflectionError::Io {
            path: path.to_path_buf(),
            source,
        },
    }
}
