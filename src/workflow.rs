// Thu Oct 15 2026 - Alex

use crate::config::Config;
use crate::dump::{Attachment, DumpError, ExportChannel, ExportError, MemoryDumper};
use crate::image::{ImageLocator, ImageRecord, ImageTable, LocateError};
use crate::memory::MemorySource;
use crate::output::{ProcedureReport, TargetFailure};
use crate::reflection::{ClassRegistry, ReflectionError, SymbolTableRegistry};
use crate::symbol::OffsetResolver;
use indicatif::ProgressBar;
use log::{info, warn};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProcedureError {
    #[error("Locate failed: {0}")]
    Locate(#[from] LocateError),
    #[error("Dump failed: {0}")]
    Dump(#[from] DumpError),
    #[error("Export failed: {0}")]
    Export(#[from] ExportError),
}

/// Locate, dump, export and resolve, in that order, against injected
/// process state.
pub struct Procedure<'a> {
    config: &'a Config,
    table: &'a ImageTable,
    memory: &'a dyn MemorySource,
    registry: Option<&'a dyn ClassRegistry>,
    progress: Option<ProgressBar>,
}

impl<'a> Procedure<'a> {
    pub fn new(config: &'a Config, table: &'a ImageTable, memory: &'a dyn MemorySource) -> Self {
        Self {
            config,
            table,
            memory,
            registry: None,
            progress: None,
        }
    }

    pub fn with_registry(mut self, registry: &'a dyn ClassRegistry) -> Self {
        self.registry = Some(registry);
        self
    }

    pub fn with_progress(mut self, progress: ProgressBar) -> Self {
        self.progress = Some(progress);
        self
    }

    pub fn locate(&self) -> Result<ImageRecord, LocateError> {
        ImageLocator::new(self.config.selector.clone()).locate(self.table)
    }

    pub fn run(&self, exporter: &mut dyn ExportChannel) -> Result<ProcedureReport, ProcedureError> {
        let image = self.locate()?;

        let mut dumper = MemoryDumper::new(self.memory).with_chunk_size(self.config.chunk_size);
        if let Some(pb) = &self.progress {
            dumper = dumper.with_progress(pb.clone());
        }
        let dump = if self.config.strict {
            dumper.dump_exact(&image)?
        } else {
            dumper.dump(&image)?
        };

        let requested = dump.requested();
        let dumped = dump.len();
        let complete = dump.is_complete();
        let stopped_at = dump.stopped_at();

        let mut attachment = Attachment::from_dump(dump, self.config.file_name.as_deref());
        if let Some(mime) = &self.config.mime_type {
            attachment = attachment.with_mime_type(mime);
        }
        let export = exporter.deliver(attachment)?;
        info!("exported {} via {}", export.file_name, export.channel);

        let (offsets, failures) = self.resolve_targets();

        Ok(ProcedureReport {
            image,
            requested,
            dumped,
            complete,
            stopped_at,
            export,
            offsets,
            failures,
        })
    }

    fn resolve_targets(&self) -> (Vec<crate::symbol::ResolvedOffset>, Vec<TargetFailure>) {
        let mut offsets = Vec::new();
        let mut failures = Vec::new();

        if self.config.targets.is_empty() {
            return (offsets, failures);
        }

        let Some(registry) = self.registry else {
            warn!("{} targets requested but no class registry is available", self.config.targets.len());
            failures.extend(self.config.targets.iter().map(|target| TargetFailure {
                target: target.clone(),
                error: "no class registry available".to_string(),
            }));
            return (offsets, failures);
        };

        let resolver = OffsetResolver::new(registry, self.table);
        for target in &self.config.targets {
            match resolver.resolve_target(target) {
                Ok(resolved) => offsets.push(resolved),
                Err(e) => {
                    warn!("could not resolve {}: {}", target, e);
                    failures.push(TargetFailure {
                        target: target.clone(),
                        error: e.to_string(),
                    });
                }
            }
        }

        (offsets, failures)
    }
}

/// Symbol-table reflection for `image`, read from `config.symbols_file` when
/// set and from the image's own file otherwise.
pub fn load_registry(config: &Config, image: &ImageRecord) -> Result<SymbolTableRegistry, ReflectionError> {
    let path = config
        .symbols_file
        .as_deref()
        .unwrap_or_else(|| image.path());
    SymbolTableRegistry::load(path, image.base())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dump::CollectingExporter;
    use crate::image::ImageSelector;
    use crate::memory::{Address, BufferMemory, MemoryRange};
    use crate::reflection::StaticRegistry;

    fn ext_table() -> ImageTable {
        ImageTable::new(vec![ImageRecord::new("/ext", Address::new(0x1000), 0x2000)])
    }

    #[test]
    fn test_end_to_end_single_image() {
        let table = ext_table();
        let memory = BufferMemory::patterned(Address::new(0x1000), 0x2000);
        let config = Config::default().with_selector(ImageSelector::First);

        let mut exporter = CollectingExporter::new();
        let report = Procedure::new(&config, &table, &memory).run(&mut exporter).unwrap();

        assert_eq!(report.dumped, 0x2000);
        assert!(report.complete);
        let attachments = exporter.attachments();
        assert_eq!(attachments.len(), 1);
        assert_eq!(attachments[0].bytes.len(), 0x2000);
        assert_eq!(attachments[0].bytes.as_slice(), memory.as_slice());
        assert_eq!(attachments[0].file_name, "ext.dump");
    }

    #[test]
    fn test_resolves_targets_after_dump() {
        let table = ext_table();
        let memory = BufferMemory::patterned(Address::new(0x1000), 0x2000);
        let registry = StaticRegistry::new()
            .with_method("Sandbox", "evaluateScript:", Address::new(0x1abc))
            .with_method("Sandbox", "reset", Address::new(0x1100));
        let config = Config::default()
            .with_selector("path:/ext".parse().unwrap())
            .with_target("Sandbox.evaluateScript:")
            .with_target("Sandbox.missing");

        let mut exporter = CollectingExporter::new();
        let report = Procedure::new(&config, &table, &memory)
            .with_registry(&registry)
            .run(&mut exporter)
            .unwrap();

        assert_eq!(report.offsets.len(), 1);
        assert_eq!(report.offsets[0].offset, 0xabc);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].target, "Sandbox.missing");
    }

    #[test]
    fn test_targets_without_registry_fail_softly() {
        let table = ext_table();
        let memory = BufferMemory::patterned(Address::new(0x1000), 0x2000);
        let config = Config::default()
            .with_selector(ImageSelector::First)
            .with_target("Sandbox.reset");

        let mut exporter = CollectingExporter::new();
        let report = Procedure::new(&config, &table, &memory).run(&mut exporter).unwrap();
        assert!(report.offsets.is_empty());
        assert_eq!(report.failures.len(), 1);
    }

    #[test]
    fn test_strict_mode_rejects_partial_dump() {
        let table = ext_table();
        let hole = MemoryRange::from_start_size(Address::new(0x2000), 0x1000).unwrap();
        let memory = BufferMemory::patterned(Address::new(0x1000), 0x2000).with_hole(hole);

        let config = Config::default().with_selector(ImageSelector::First);
        let mut exporter = CollectingExporter::new();
        let report = Procedure::new(&config, &table, &memory).run(&mut exporter).unwrap();
        assert_eq!(report.dumped, 0x1000);
        assert!(!report.complete);

        let config = config.with_strict(true);
        let mut exporter = CollectingExporter::new();
        let err = Procedure::new(&config, &table, &memory).run(&mut exporter).unwrap_err();
        assert!(matches!(err, ProcedureError::Dump(DumpError::PartialRead { .. })));
        assert!(exporter.attachments().is_empty());
    }

    #[test]
    fn test_locate_failure_aborts() {
        let table = ext_table();
        let memory = BufferMemory::patterned(Address::new(0x1000), 0x10);
        let config = Config::default();

        let mut exporter = CollectingExporter::new();
        let err = Procedure::new(&config, &table, &memory).run(&mut exporter).unwrap_err();
        assert!(matches!(err, ProcedureError::Locate(LocateError::MainExecutableUnknown)));
    }
}
