use crate::error::{MdExtractError, Result};
use csv::ReaderBuilder;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// One row of the dataset, reduced to the single field the tool consumes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    /// The identifier value, kept as text. CSV line number retained for
    /// diagnostics.
    pub xid: String,
    pub line: u64,
}

impl Record {
    /// Filename this record selects in the source directory.
    pub fn derived_filename(&self, suffix: &str) -> String {
        format!("{}{}", self.xid, suffix)
    }
}

/// Ordered collection of records, insertion order = CSV row order.
#[derive(Debug, Default)]
pub struct Dataset {
    records: Vec<Record>,
    skipped_empty: usize,
    source_path: PathBuf,
}

impl Dataset {
    /// Load the identifier column named `column` from the CSV at `path`.
    ///
    /// The header row is required; a header with no matching column is a
    /// fatal error. Rows with an empty identifier are skipped and counted,
    /// never matched.
    pub fn load<P: AsRef<Path>>(path: P, column: &str) -> Result<Self> {
        let path = path.as_ref();

        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_path(path)
            .map_err(|e| map_csv_error(e, path))?;

        let headers = reader
            .headers()
            .map_err(|e| map_csv_error(e, path))?
            .clone();

        let column_index = headers
            .iter()
            .position(|h| h.trim() == column)
            .ok_or_else(|| MdExtractError::MissingColumn {
                column: column.to_string(),
                path: path.to_path_buf(),
            })?;

        let mut records = Vec::new();
        let mut skipped_empty = 0usize;

        for result in reader.records() {
            let row = result.map_err(|e| map_csv_error(e, path))?;
            let line = row.position().map(|p| p.line()).unwrap_or(0);

            let value = row.get(column_index).unwrap_or("").trim();
            if value.is_empty() {
                skipped_empty += 1;
                continue;
            }

            records.push(Record {
                xid: value.to_string(),
                line,
            });
        }

        Ok(Self {
            records,
            skipped_empty,
            source_path: path.to_path_buf(),
        })
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn skipped_empty(&self) -> usize {
        self.skipped_empty
    }

    pub fn source_path(&self) -> &Path {
        &self.source_path
    }

    pub fn statistics(&self) -> DatasetStatistics {
        let mut seen = HashSet::new();
        let mut duplicates = 0usize;

        for record in &self.records {
            if !seen.insert(record.xid.as_str()) {
                duplicates += 1;
            }
        }

        DatasetStatistics {
            total_rows: self.records.len(),
            unique_identifiers: seen.len(),
            duplicate_rows: duplicates,
            skipped_empty: self.skipped_empty,
        }
    }
}

#[derive(Debug, Default)]
pub struct DatasetStatistics {
    pub total_rows: usize,
    pub unique_identifiers: usize,
    pub duplicate_rows: usize,
    pub skipped_empty: usize,
}

impl DatasetStatistics {
    pub fn display_summary(&self) -> String {
        let mut summary = format!(
            "Dataset:\n  Rows: {}\n  Unique identifiers: {}\n",
            self.total_rows, self.unique_identifiers
        );

        if self.duplicate_rows > 0 {
            summary.push_str(&format!("  Duplicate rows: {}\n", self.duplicate_rows));
        }

        if self.skipped_empty > 0 {
            summary.push_str(&format!("  Skipped empty values: {}\n", self.skipped_empty));
        }

        summary
    }
}

fn map_csv_error(error: csv::Error, path: &Path) -> MdExtractError {
    if let csv::ErrorKind::Io(ref io_err) = *error.kind() {
        if io_err.kind() == std::io::ErrorKind::PermissionDenied {
            return MdExtractError::Permission {
                path: path.display().to_string(),
            };
        }
    }

    MdExtractError::Csv {
        path: path.to_path_buf(),
        source: error,
    }
}
