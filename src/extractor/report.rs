use crate::error::{MdExtractError, Result};
use crate::extractor::ExtractionProgress;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionReport {
    pub csv_path: PathBuf,
    pub source_directory: PathBuf,
    pub destination_directory: PathBuf,
    pub extraction_time: DateTime<Utc>,
    pub duration: Duration,
    pub rows_processed: usize,
    pub files_copied: Vec<CopiedFile>,
    pub missing_identifiers: Vec<String>,
    pub config_used: ConfigSnapshot,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CopiedFile {
    pub filename: String,
    pub size: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigSnapshot {
    pub column: String,
    pub suffix: String,
}

impl ExtractionReport {
    pub fn total_bytes(&self) -> u64 {
        self.files_copied.iter().map(|f| f.size).sum()
    }
}

/// Builds the end-of-run report and optionally persists it into the
/// destination directory.
pub struct ReportWriter {
    dest_dir: PathBuf,
}

impl ReportWriter {
    pub fn new<P: Into<PathBuf>>(dest_dir: P) -> Self {
        Self {
            dest_dir: dest_dir.into(),
        }
    }

    pub fn build_report(
        &self,
        csv_path: &Path,
        source_dir: &Path,
        progress: &ExtractionProgress,
        copied: Vec<CopiedFile>,
        config: ConfigSnapshot,
    ) -> ExtractionReport {
        ExtractionReport {
            csv_path: csv_path.to_path_buf(),
            source_directory: source_dir.to_path_buf(),
            destination_directory: self.dest_dir.clone(),
            extraction_time: Utc::now(),
            duration: progress.elapsed(),
            rows_processed: progress.rows_processed,
            files_copied: copied,
            missing_identifiers: progress.missing_identifiers.clone(),
            config_used: config,
        }
    }

    pub fn save_report_json(&self, report: &ExtractionReport) -> Result<PathBuf> {
        let report_path = self.dest_dir.join("extraction_report.json");
        let json_content =
            serde_json::to_string_pretty(report).map_err(|e| MdExtractError::Config {
                message: format!("Failed to serialize report to JSON: {}", e),
            })?;

        fs::write(&report_path, json_content).map_err(MdExtractError::Io)?;

        Ok(report_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;
    use tempfile::TempDir;

    fn sample_progress() -> ExtractionProgress {
        ExtractionProgress {
            rows_processed: 3,
            total_rows: 3,
            files_copied: 2,
            rows_missing: 1,
            bytes_copied: 30,
            current_file: Some("C3-markdown.md".to_string()),
            start_time: Instant::now(),
            missing_identifiers: vec!["B2".to_string()],
        }
    }

    fn sample_copied() -> Vec<CopiedFile> {
        vec![
            CopiedFile {
                filename: "A1-markdown.md".to_string(),
                size: 10,
            },
            CopiedFile {
                filename: "C3-markdown.md".to_string(),
                size: 20,
            },
        ]
    }

    #[test]
    fn test_report_contents() {
        let dir = TempDir::new().unwrap();
        let writer = ReportWriter::new(dir.path());

        let report = writer.build_report(
            Path::new("rows.csv"),
            Path::new("md"),
            &sample_progress(),
            sample_copied(),
            ConfigSnapshot {
                column: "XID".to_string(),
                suffix: "-markdown.md".to_string(),
            },
        );

        assert_eq!(report.rows_processed, 3);
        assert_eq!(report.files_copied.len(), 2);
        assert_eq!(report.total_bytes(), 30);
        assert_eq!(report.missing_identifiers, vec!["B2"]);
    }

    #[test]
    fn test_report_json_round_trip() {
        let dir = TempDir::new().unwrap();
        let writer = ReportWriter::new(dir.path());

        let report = writer.build_report(
            Path::new("rows.csv"),
            Path::new("md"),
            &sample_progress(),
            sample_copied(),
            ConfigSnapshot {
                column: "XID".to_string(),
                suffix: "-markdown.md".to_string(),
            },
        );

        let report_path = writer.save_report_json(&report).unwrap();
        assert!(report_path.exists());

        let content = fs::read_to_string(&report_path).unwrap();
        let parsed: ExtractionReport = serde_json::from_str(&content).unwrap();
        assert_eq!(parsed.files_copied.len(), 2);
        assert_eq!(parsed.config_used.column, "XID");
    }
}
