pub mod file_copier;
pub mod report;

pub use file_copier::{ExtractionProgress, FileCopier};
pub use report::{ConfigSnapshot, CopiedFile, ExtractionReport, ReportWriter};
