use crate::dataset::Dataset;
use crate::error::{MdExtractError, Result};
use crate::scanner::SourceIndex;
use std::fs;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
pub struct ExtractionProgress {
    pub rows_processed: usize,
    pub total_rows: usize,
    pub files_copied: usize,
    pub rows_missing: usize,
    pub bytes_copied: u64,
    pub current_file: Option<String>,
    pub start_time: Instant,
    /// Identifiers whose derived filename was absent from the source
    /// directory, in row order.
    pub missing_identifiers: Vec<String>,
}

impl ExtractionProgress {
    pub fn new(total_rows: usize) -> Self {
        Self {
            rows_processed: 0,
            total_rows,
            files_copied: 0,
            rows_missing: 0,
            bytes_copied: 0,
            current_file: None,
            start_time: Instant::now(),
            missing_identifiers: Vec::new(),
        }
    }

    pub fn record_copy(&mut self, filename: String, bytes: u64) {
        self.rows_processed += 1;
        self.files_copied += 1;
        self.bytes_copied += bytes;
        self.current_file = Some(filename);
    }

    pub fn record_missing(&mut self, xid: &str) {
        self.rows_processed += 1;
        self.rows_missing += 1;
        self.missing_identifiers.push(xid.to_string());
    }

    pub fn percentage(&self) -> f64 {
        if self.total_rows == 0 {
            0.0
        } else {
            (self.rows_processed as f64 / self.total_rows as f64) * 100.0
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }
}

/// Performs the match-and-copy pass over a loaded dataset.
pub struct FileCopier {
    suffix: String,
    buffer_size: usize,
}

impl FileCopier {
    pub fn new<S: Into<String>>(suffix: S) -> Self {
        Self {
            suffix: suffix.into(),
            buffer_size: 64 * 1024,
        }
    }

    pub fn with_buffer_size(mut self, size: usize) -> Self {
        self.buffer_size = size.max(4096);
        self
    }

    pub fn suffix(&self) -> &str {
        &self.suffix
    }

    /// Copy every dataset row's derived file from the indexed source
    /// directory into `dest_dir`.
    ///
    /// The destination directory is created (with parents) before any copy.
    /// Rows with no matching file are recorded and skipped; a failed copy
    /// aborts the run.
    pub fn extract(
        &self,
        dataset: &Dataset,
        source: &SourceIndex,
        dest_dir: &Path,
        progress_callback: Option<&dyn Fn(&ExtractionProgress)>,
    ) -> Result<ExtractionProgress> {
        let mut progress = ExtractionProgress::new(dataset.len());

        fs::create_dir_all(dest_dir).map_err(|e| match e.kind() {
            std::io::ErrorKind::PermissionDenied => MdExtractError::Permission {
                path: dest_dir.display().to_string(),
            },
            _ => MdExtractError::Io(e),
        })?;

        for record in dataset.records() {
            let filename = record.derived_filename(&self.suffix);

            match source.resolve(&filename) {
                Some(source_path) => {
                    let dest_path = dest_dir.join(&filename);
                    let bytes = self.copy_file(&source_path, &dest_path)?;
                    progress.record_copy(filename, bytes);
                }
                None => {
                    progress.record_missing(&record.xid);
                }
            }

            if let Some(callback) = progress_callback {
                callback(&progress);
            }
        }

        Ok(progress)
    }

    /// List the source paths that would be copied, without touching the
    /// filesystem. Duplicate rows produce duplicate entries, mirroring the
    /// redundant (idempotent) copies a real run performs.
    pub fn plan(&self, dataset: &Dataset, source: &SourceIndex) -> Vec<PathBuf> {
        dataset
            .records()
            .iter()
            .filter_map(|record| source.resolve(&record.derived_filename(&self.suffix)))
            .collect()
    }

    fn copy_file(&self, source: &Path, dest: &Path) -> Result<u64> {
        let map_err = |e: std::io::Error| MdExtractError::CopyFailed {
            path: source.to_path_buf(),
            source: e,
        };

        let source_file = fs::File::open(source).map_err(map_err)?;
        let dest_file = fs::File::create(dest).map_err(map_err)?;

        let mut reader = BufReader::with_capacity(self.buffer_size, source_file);
        let mut writer = BufWriter::with_capacity(self.buffer_size, dest_file);

        let mut total_bytes = 0u64;
        let mut buffer = vec![0u8; 8192];

        loop {
            let bytes_read = reader.read(&mut buffer).map_err(map_err)?;
            if bytes_read == 0 {
                break;
            }

            writer.write_all(&buffer[..bytes_read]).map_err(map_err)?;
            total_bytes += bytes_read as u64;
        }

        writer.flush().map_err(map_err)?;

        // Mirror the source mtime; failure here is not worth aborting for.
        if let Ok(source_metadata) = fs::metadata(source) {
            if let Ok(modified_time) = source_metadata.modified() {
                let _ = filetime::set_file_mtime(
                    dest,
                    filetime::FileTime::from_system_time(modified_time),
                );
            }
        }

        Ok(total_bytes)
    }
}

impl Default for FileCopier {
    fn default() -> Self {
        Self::new("-markdown.md")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::Dataset;
    use std::fs;
    use tempfile::TempDir;

    fn dataset_from(dir: &TempDir, csv: &str) -> Dataset {
        let path = dir.path().join("rows.csv");
        fs::write(&path, csv).unwrap();
        Dataset::load(&path, "XID").unwrap()
    }

    #[test]
    fn test_matching_rows_are_copied() {
        let work = TempDir::new().unwrap();
        let source_dir = work.path().join("md");
        let dest_dir = work.path().join("out");
        fs::create_dir(&source_dir).unwrap();
        fs::write(source_dir.join("A1-markdown.md"), "# A1 content").unwrap();
        fs::write(source_dir.join("C3-markdown.md"), "# C3 content").unwrap();

        let dataset = dataset_from(&work, "XID\nA1\nB2\nC3\n");
        let index = SourceIndex::build(&source_dir).unwrap();
        let copier = FileCopier::default();

        let progress = copier.extract(&dataset, &index, &dest_dir, None).unwrap();

        assert_eq!(progress.rows_processed, 3);
        assert_eq!(progress.files_copied, 2);
        assert_eq!(progress.rows_missing, 1);
        assert_eq!(progress.missing_identifiers, vec!["B2"]);

        assert_eq!(
            fs::read_to_string(dest_dir.join("A1-markdown.md")).unwrap(),
            "# A1 content"
        );
        assert_eq!(
            fs::read_to_string(dest_dir.join("C3-markdown.md")).unwrap(),
            "# C3 content"
        );
        assert!(!dest_dir.join("B2-markdown.md").exists());
    }

    #[test]
    fn test_destination_directory_is_created() {
        let work = TempDir::new().unwrap();
        let source_dir = work.path().join("md");
        fs::create_dir(&source_dir).unwrap();

        // Nested destination that does not exist yet, no matches at all
        let dest_dir = work.path().join("deep").join("out");

        let dataset = dataset_from(&work, "XID\nA1\n");
        let index = SourceIndex::build(&source_dir).unwrap();

        let progress = FileCopier::default()
            .extract(&dataset, &index, &dest_dir, None)
            .unwrap();

        assert!(dest_dir.is_dir());
        assert_eq!(progress.files_copied, 0);
        assert_eq!(progress.rows_missing, 1);
    }

    #[test]
    fn test_rerun_is_idempotent() {
        let work = TempDir::new().unwrap();
        let source_dir = work.path().join("md");
        let dest_dir = work.path().join("out");
        fs::create_dir(&source_dir).unwrap();
        fs::write(source_dir.join("A1-markdown.md"), "same bytes").unwrap();

        let dataset = dataset_from(&work, "XID\nA1\n");
        let index = SourceIndex::build(&source_dir).unwrap();
        let copier = FileCopier::default();

        copier.extract(&dataset, &index, &dest_dir, None).unwrap();
        copier.extract(&dataset, &index, &dest_dir, None).unwrap();

        let entries: Vec<_> = fs::read_dir(&dest_dir).unwrap().collect();
        assert_eq!(entries.len(), 1);
        assert_eq!(
            fs::read_to_string(dest_dir.join("A1-markdown.md")).unwrap(),
            "same bytes"
        );
    }

    #[test]
    fn test_duplicate_rows_recopy_in_place() {
        let work = TempDir::new().unwrap();
        let source_dir = work.path().join("md");
        let dest_dir = work.path().join("out");
        fs::create_dir(&source_dir).unwrap();
        fs::write(source_dir.join("A1-markdown.md"), "content").unwrap();

        let dataset = dataset_from(&work, "XID\nA1\nA1\nA1\n");
        let index = SourceIndex::build(&source_dir).unwrap();

        let progress = FileCopier::default()
            .extract(&dataset, &index, &dest_dir, None)
            .unwrap();

        assert_eq!(progress.files_copied, 3);
        let entries: Vec<_> = fs::read_dir(&dest_dir).unwrap().collect();
        assert_eq!(entries.len(), 1);
    }

    #[test]
    fn test_existing_destination_file_is_overwritten() {
        let work = TempDir::new().unwrap();
        let source_dir = work.path().join("md");
        let dest_dir = work.path().join("out");
        fs::create_dir(&source_dir).unwrap();
        fs::create_dir(&dest_dir).unwrap();
        fs::write(source_dir.join("A1-markdown.md"), "new").unwrap();
        fs::write(dest_dir.join("A1-markdown.md"), "stale").unwrap();

        let dataset = dataset_from(&work, "XID\nA1\n");
        let index = SourceIndex::build(&source_dir).unwrap();

        FileCopier::default()
            .extract(&dataset, &index, &dest_dir, None)
            .unwrap();

        assert_eq!(
            fs::read_to_string(dest_dir.join("A1-markdown.md")).unwrap(),
            "new"
        );
    }

    #[test]
    fn test_custom_suffix() {
        let work = TempDir::new().unwrap();
        let source_dir = work.path().join("md");
        let dest_dir = work.path().join("out");
        fs::create_dir(&source_dir).unwrap();
        fs::write(source_dir.join("A1.md"), "short").unwrap();

        let dataset = dataset_from(&work, "XID\nA1\n");
        let index = SourceIndex::build(&source_dir).unwrap();

        let progress = FileCopier::new(".md")
            .extract(&dataset, &index, &dest_dir, None)
            .unwrap();

        assert_eq!(progress.files_copied, 1);
        assert!(dest_dir.join("A1.md").exists());
    }

    #[test]
    fn test_plan_lists_matches_only() {
        let work = TempDir::new().unwrap();
        let source_dir = work.path().join("md");
        fs::create_dir(&source_dir).unwrap();
        fs::write(source_dir.join("A1-markdown.md"), "a").unwrap();

        let dataset = dataset_from(&work, "XID\nA1\nB2\n");
        let index = SourceIndex::build(&source_dir).unwrap();

        let plan = FileCopier::default().plan(&dataset, &index);
        assert_eq!(plan, vec![source_dir.join("A1-markdown.md")]);
    }

    #[test]
    fn test_progress_tracking() {
        let mut progress = ExtractionProgress::new(4);
        assert_eq!(progress.percentage(), 0.0);

        progress.record_copy("A1-markdown.md".to_string(), 100);
        assert_eq!(progress.percentage(), 25.0);
        assert_eq!(progress.bytes_copied, 100);

        progress.record_missing("B2");
        assert_eq!(progress.rows_processed, 2);
        assert_eq!(progress.missing_identifiers, vec!["B2"]);
    }
}
