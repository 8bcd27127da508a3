// Thu Oct 15 2026 - Alex

use crate::dump::ExportReceipt;
use crate::image::{ImageRecord, ImageTable};
use crate::memory::Address;
use crate::symbol::ResolvedOffset;
use serde::Serialize;
use std::fmt::Write;

#[derive(Debug, Clone, Serialize)]
pub struct TargetFailure {
    pub target: String,
    pub error: String,
}

/// Outcome of one locate / dump / export / resolve pass.
#[derive(Debug, Clone, Serialize)]
pub struct ProcedureReport {
    pub image: ImageRecord,
    pub requested: u64,
    pub dumped: u64,
    pub complete: bool,
    pub stopped_at: Option<Address>,
    pub export: ExportReceipt,
    pub offsets: Vec<ResolvedOffset>,
    pub failures: Vec<TargetFailure>,
}

impl ProcedureReport {
    pub fn is_clean(&self) -> bool {
        self.complete && self.failures.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    Text,
    Json,
}

pub struct ReportGenerator {
    format: ReportFormat,
}

impl ReportGenerator {
    pub fn new(format: ReportFormat) -> Self {
        Self { format }
    }

    pub fn generate(&self, report: &ProcedureReport) -> Result<String, serde_json::Error> {
        match self.format {
            ReportFormat::Json => serde_json::to_string_pretty(report),
            ReportFormat::Text => Ok(self.generate_text(report)),
        }
    }

    pub fn generate_images(&self, table: &ImageTable) -> Result<String, serde_json::Error> {
        match self.format {
            ReportFormat::Json => serde_json::to_string_pretty(table.images()),
            ReportFormat::Text => {
                let mut out = String::new();
                for (index, image) in table.iter().enumerate() {
                    let marker = if Some(image.path()) == table.main_executable() { '*' } else { ' ' };
                    let _ = writeln!(
                        out,
                        "{:>4}{} 0x{:016x} 0x{:08x} {}",
                        index,
                        marker,
                        image.base().as_u64(),
                        image.size(),
                        image.path().display()
                    );
                }
                Ok(out)
            }
        }
    }

    fn generate_text(&self, report: &ProcedureReport) -> String {
        let mut out = String::new();

        let _ = writeln!(out, "Image:    {}", report.image.path().display());
        let _ = writeln!(out, "Base:     {}", report.image.base());
        let _ = writeln!(out, "Size:     0x{:x}", report.image.size());
        let _ = writeln!(
            out,
            "Dumped:   0x{:x} of 0x{:x} bytes{}",
            report.dumped,
            report.requested,
            if report.complete { "" } else { " (partial)" }
        );
        if let Some(addr) = report.stopped_at {
            let _ = writeln!(out, "Stopped:  {}", addr);
        }

        let location = report
            .export
            .location
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| report.export.channel.clone());
        let _ = writeln!(
            out,
            "Export:   {} ({}) -> {}",
            report.export.file_name, report.export.mime_type, location
        );

        if !report.offsets.is_empty() {
            let _ = writeln!(out);
            let _ = writeln!(out, "Offsets:");
            for resolved in &report.offsets {
                let _ = writeln!(
                    out,
                    "  {}.{}: 0x{:x} (impl {})",
                    resolved.method.class_name,
                    resolved.method.selector,
                    resolved.offset,
                    resolved.method.implementation
                );
            }
        }

        if !report.failures.is_empty() {
            let _ = writeln!(out);
            let _ = writeln!(out, "Failures:");
            for failure in &report.failures {
                let _ = writeln!(out, "  {}: {}", failure.target, failure.error);
            }
        }

        out
    }
}
