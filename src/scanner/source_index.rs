use crate::error::{MdExtractError, Result};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Filename index of the source directory, built with a single flat scan.
///
/// The directory is listed once up front instead of once per dataset row;
/// lookups are then exact-equality set membership, which observably matches
/// rescanning for every row.
pub struct SourceIndex {
    root: PathBuf,
    filenames: HashSet<String>,
}

impl SourceIndex {
    pub fn build<P: AsRef<Path>>(root: P) -> Result<Self> {
        let root_path = root.as_ref();

        if !root_path.exists() {
            return Err(MdExtractError::InvalidPath {
                path: root_path.display().to_string(),
            });
        }

        if !root_path.is_dir() {
            return Err(MdExtractError::InvalidPath {
                path: format!("{} is not a directory", root_path.display()),
            });
        }

        let mut filenames = HashSet::new();

        // Flat listing only; the tool never looks into subdirectories.
        let walker = WalkDir::new(root_path)
            .min_depth(1)
            .max_depth(1)
            .follow_links(false);

        for entry in walker {
            let entry = entry.map_err(|err| {
                if err
                    .io_error()
                    .is_some_and(|e| e.kind() == std::io::ErrorKind::PermissionDenied)
                {
                    MdExtractError::Permission {
                        path: root_path.display().to_string(),
                    }
                } else {
                    MdExtractError::InvalidPath {
                        path: format!("{}: {}", root_path.display(), err),
                    }
                }
            })?;

            if !entry.file_type().is_file() {
                continue;
            }

            if let Some(name) = entry.file_name().to_str() {
                filenames.insert(name.to_string());
            }
        }

        Ok(Self {
            root: root_path.to_path_buf(),
            filenames,
        })
    }

    pub fn contains(&self, filename: &str) -> bool {
        self.filenames.contains(filename)
    }

    /// Full path of an indexed entry, or None when the name was never seen.
    pub fn resolve(&self, filename: &str) -> Option<PathBuf> {
        if self.contains(filename) {
            Some(self.root.join(filename))
        } else {
            None
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn len(&self) -> usize {
        self.filenames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.filenames.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_index_lists_flat_files() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("A1-markdown.md"), "# A1").unwrap();
        fs::write(dir.path().join("C3-markdown.md"), "# C3").unwrap();

        let index = SourceIndex::build(dir.path()).unwrap();

        assert_eq!(index.len(), 2);
        assert!(index.contains("A1-markdown.md"));
        assert!(index.contains("C3-markdown.md"));
        assert!(!index.contains("B2-markdown.md"));
    }

    #[test]
    fn test_subdirectories_are_not_descended() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("top.md"), "top").unwrap();

        let nested = dir.path().join("nested");
        fs::create_dir(&nested).unwrap();
        fs::write(nested.join("deep.md"), "deep").unwrap();

        let index = SourceIndex::build(dir.path()).unwrap();

        assert!(index.contains("top.md"));
        assert!(!index.contains("deep.md"));
        assert!(!index.contains("nested"));
    }

    #[test]
    fn test_resolve_returns_full_path() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("A1-markdown.md"), "# A1").unwrap();

        let index = SourceIndex::build(dir.path()).unwrap();

        let resolved = index.resolve("A1-markdown.md").unwrap();
        assert_eq!(resolved, dir.path().join("A1-markdown.md"));
        assert!(index.resolve("missing.md").is_none());
    }

    #[test]
    fn test_missing_directory_is_fatal() {
        let dir = TempDir::new().unwrap();
        let result = SourceIndex::build(dir.path().join("absent"));
        assert!(matches!(result, Err(MdExtractError::InvalidPath { .. })));
    }

    #[test]
    fn test_file_as_source_is_fatal() {
        let dir = TempDir::new().unwrap();
        let file_path = dir.path().join("not-a-dir");
        fs::write(&file_path, "x").unwrap();

        let result = SourceIndex::build(&file_path);
        assert!(matches!(result, Err(MdExtractError::InvalidPath { .. })));
    }

    #[test]
    fn test_empty_directory_indexes_nothing() {
        let dir = TempDir::new().unwrap();
        let index = SourceIndex::build(dir.path()).unwrap();
        assert!(index.is_empty());
    }
}
