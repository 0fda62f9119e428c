use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum MdExtractError {
    #[error("Failed to read CSV {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("CSV {path} has no column named '{column}'")]
    MissingColumn { column: String, path: PathBuf },

    #[error("IO operation failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Invalid path: {path}")]
    InvalidPath { path: String },

    #[error("Permission denied: {path}")]
    Permission { path: String },

    #[error("Failed to copy {path}: {source}")]
    CopyFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub trait UserFriendlyError {
    fn user_message(&self) -> String;
    fn suggestion(&self) -> Option<String>;
}

impl UserFriendlyError for MdExtractError {
    fn user_message(&self) -> String {
        match self {
            MdExtractError::Csv { path, source } => {
                format!("Could not read CSV file {}: {}", path.display(), source)
            }
            MdExtractError::MissingColumn { column, path } => {
                format!(
                    "CSV file {} does not contain a '{}' column",
                    path.display(),
                    column
                )
            }
            MdExtractError::Config { message } => {
                format!("Configuration error: {}", message)
            }
            MdExtractError::InvalidPath { path } => {
                format!("Invalid path: {}", path)
            }
            MdExtractError::Permission { path } => {
                format!("Permission denied accessing: {}", path)
            }
            MdExtractError::CopyFailed { path, source } => {
                format!("Failed to copy {}: {}", path.display(), source)
            }
            _ => self.to_string(),
        }
    }

    fn suggestion(&self) -> Option<String> {
        match self {
            MdExtractError::Csv { .. } => Some(
                "Check that the file exists and is valid CSV. The path can be given as the first positional argument or in the [inputs] section of the config file.".to_string(),
            ),
            MdExtractError::MissingColumn { column, .. } => Some(format!(
                "Verify the CSV header row. A different identifier column can be selected with --column (currently '{}').",
                column
            )),
            MdExtractError::Config { .. } => Some(
                "Check your configuration file syntax and ensure all required fields are present.".to_string(),
            ),
            MdExtractError::InvalidPath { .. } => Some(
                "Verify the source directory exists and is a directory.".to_string(),
            ),
            MdExtractError::Permission { .. } => Some(
                "Ensure you have the necessary read/write permissions for the source and destination directories.".to_string(),
            ),
            MdExtractError::CopyFailed { .. } => Some(
                "Check free disk space and write permissions on the destination directory.".to_string(),
            ),
            _ => None,
        }
    }
}

impl From<toml::de::Error> for MdExtractError {
    fn from(error: toml::de::Error) -> Self {
        MdExtractError::Config {
            message: error.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, MdExtractError>;
