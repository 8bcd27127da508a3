// Thu Oct 15 2026 - Alex

pub mod report;

pub use report::{ProcedureReport, ReportFormat, ReportGenerator, TargetFailure};
