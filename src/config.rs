use crate::error::{MdExtractError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub inputs: InputConfig,
    pub matching: MatchConfig,
    pub output: OutputConfig,
}

/// Where the dataset and the directories live. The defaults reproduce the
/// relative paths the tool originally operated on.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct InputConfig {
    pub csv: PathBuf,
    pub source: PathBuf,
    pub dest: PathBuf,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MatchConfig {
    /// Header name of the identifier column in the CSV.
    pub column: String,
    /// Appended to each identifier to derive the expected filename.
    pub suffix: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OutputConfig {
    /// Write extraction_report.json into the destination directory.
    pub generate_report: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            inputs: InputConfig::default(),
            matching: MatchConfig::default(),
            output: OutputConfig::default(),
        }
    }
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            csv: PathBuf::from("output3.csv"),
            source: PathBuf::from("md"),
            dest: PathBuf::from("extracted_md_files"),
        }
    }
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            column: "XID".to_string(),
            suffix: "-markdown.md".to_string(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            generate_report: false,
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(MdExtractError::Config {
                message: format!("Configuration file not found: {}", path.display()),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| MdExtractError::Config {
            message: format!("Failed to read config file {}: {}", path.display(), e),
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| MdExtractError::Config {
            message: format!("Failed to parse config file {}: {}", path.display(), e),
        })?;

        Ok(config)
    }

    pub fn load_with_defaults<P: AsRef<Path>>(config_path: Option<P>) -> Result<Self> {
        match config_path {
            Some(path) => Self::load_from_file(path),
            None => {
                let default_paths = ["mdextract.toml", ".mdextract.toml"];

                for default_path in &default_paths {
                    if Path::new(default_path).exists() {
                        return Self::load_from_file(default_path);
                    }
                }

                Ok(Self::default())
            }
        }
    }

    pub fn merge_with_cli_args(&mut self, cli_args: &CliOverrides) {
        if let Some(ref csv) = cli_args.csv {
            self.inputs.csv = csv.clone();
        }

        if let Some(ref source) = cli_args.source {
            self.inputs.source = source.clone();
        }

        if let Some(ref dest) = cli_args.dest {
            self.inputs.dest = dest.clone();
        }

        if let Some(ref column) = cli_args.column {
            self.matching.column = column.clone();
        }

        if let Some(ref suffix) = cli_args.suffix {
            self.matching.suffix = suffix.clone();
        }

        if let Some(generate_report) = cli_args.generate_report {
            self.output.generate_report = generate_report;
        }
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let content = toml::to_string_pretty(self).map_err(|e| MdExtractError::Config {
            message: format!("Failed to serialize config: {}", e),
        })?;

        std::fs::write(path, content).map_err(|e| MdExtractError::Config {
            message: format!("Failed to write config file {}: {}", path.display(), e),
        })?;

        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.matching.column.trim().is_empty() {
            return Err(MdExtractError::Config {
                message: "Identifier column name must not be empty".to_string(),
            });
        }

        if self.matching.suffix.is_empty() {
            return Err(MdExtractError::Config {
                message: "Filename suffix must not be empty".to_string(),
            });
        }

        if self.inputs.csv.as_os_str().is_empty() {
            return Err(MdExtractError::Config {
                message: "CSV path must not be empty".to_string(),
            });
        }

        if self.inputs.source.as_os_str().is_empty() || self.inputs.dest.as_os_str().is_empty() {
            return Err(MdExtractError::Config {
                message: "Source and destination directories must not be empty".to_string(),
            });
        }

        Ok(())
    }

    pub fn create_sample_config() -> String {
        let sample_config = Self::default();
        toml::to_string_pretty(&sample_config).unwrap_or_else(|_| String::new())
    }
}

#[derive(Debug, Default)]
pub struct CliOverrides {
    pub csv: Option<PathBuf>,
    pub source: Option<PathBuf>,
    pub dest: Option<PathBuf>,
    pub column: Option<String>,
    pub suffix: Option<String>,
    pub generate_report: Option<bool>,
}

impl CliOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_csv(mut self, csv: Option<PathBuf>) -> Self {
        self.csv = csv;
        self
    }

    pub fn with_source(mut self, source: Option<PathBuf>) -> Self {
        self.source = source;
        self
    }

    pub fn with_dest(mut self, dest: Option<PathBuf>) -> Self {
        self.dest = dest;
        self
    }

    pub fn with_column(mut self, column: Option<String>) -> Self {
        self.column = column;
        self
    }

    pub fn with_suffix(mut self, suffix: Option<String>) -> Self {
        self.suffix = suffix;
        self
    }

    pub fn with_generate_report(mut self, generate_report: Option<bool>) -> Self {
        self.generate_report = generate_report;
        self
    }
}
