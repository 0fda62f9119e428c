pub mod cli;
pub mod config;
pub mod dataset;
pub mod error;
pub mod extractor;
pub mod scanner;
pub mod ui;

// Public API re-exports
pub use cli::{Cli, OutputFormat};
pub use config::{CliOverrides, Config, InputConfig, MatchConfig, OutputConfig};
pub use error::{MdExtractError, Result, UserFriendlyError};

// Core functionality re-exports
pub use dataset::{Dataset, DatasetStatistics, Record};
pub use extractor::{ConfigSnapshot, CopiedFile, ExtractionProgress, ExtractionReport, FileCopier, ReportWriter};
pub use scanner::SourceIndex;
pub use ui::{OutputFormatter, OutputMode, ProgressManager};

use std::path::Path;

/// Main library interface for MdExtract functionality
pub struct MdExtract {
    config: Config,
    output_formatter: OutputFormatter,
    progress_manager: ProgressManager,
}

impl MdExtract {
    /// Create a new MdExtract instance with the provided configuration
    pub fn new(config: Config, output_mode: OutputMode, verbose: u8, quiet: bool) -> Self {
        let output_formatter = OutputFormatter::new(output_mode, verbose, quiet);
        let progress_manager =
            ProgressManager::new(!quiet && output_mode == OutputMode::Human);

        Self {
            config,
            output_formatter,
            progress_manager,
        }
    }

    /// Create MdExtract instance from CLI arguments
    pub fn from_cli(cli_args: &Cli) -> Result<Self> {
        let config = cli_args.load_config()?;
        let output_mode = match cli_args.output_format {
            crate::cli::OutputFormat::Human => OutputMode::Human,
            crate::cli::OutputFormat::Json => OutputMode::Json,
            crate::cli::OutputFormat::Plain => OutputMode::Plain,
        };

        Ok(Self::new(
            config,
            output_mode,
            cli_args.verbose,
            cli_args.quiet,
        ))
    }

    /// Run the full match-and-copy pass and return the final report.
    pub fn extract(&self) -> Result<ExtractionReport> {
        self.output_formatter.start_operation("Starting extraction");

        // Step 1: Load the dataset
        let dataset = self.load_dataset()?;

        // Step 2: Index the source directory
        let source = self.index_source()?;

        // Step 3: Copy every matching row into the destination
        let (progress, copied) = self.copy_matches(&dataset, &source)?;

        // Step 4: Build (and optionally persist) the report
        let report_writer = ReportWriter::new(&self.config.inputs.dest);
        let report = report_writer.build_report(
            &self.config.inputs.csv,
            &self.config.inputs.source,
            &progress,
            copied,
            self.create_config_snapshot(),
        );

        if self.config.output.generate_report {
            let report_path = report_writer.save_report_json(&report)?;
            self.output_formatter
                .debug(&format!("Report written to {}", report_path.display()));
        }

        self.output_formatter.print_extraction_summary(&progress);

        Ok(report)
    }

    /// List the source files a run would copy, without copying.
    pub fn plan(&self) -> Result<Vec<std::path::PathBuf>> {
        let dataset = self.load_dataset()?;
        let source = self.index_source()?;
        let copier = FileCopier::new(self.config.matching.suffix.clone());
        Ok(copier.plan(&dataset, &source))
    }

    fn load_dataset(&self) -> Result<Dataset> {
        self.output_formatter.start_operation("Loading dataset");

        let dataset = Dataset::load(&self.config.inputs.csv, &self.config.matching.column)?;

        self.output_formatter
            .debug(&dataset.statistics().display_summary());

        Ok(dataset)
    }

    fn index_source(&self) -> Result<SourceIndex> {
        self.output_formatter
            .start_operation("Indexing source directory");

        let source = SourceIndex::build(&self.config.inputs.source)?;

        self.output_formatter.debug(&format!(
            "Indexed {} files in {}",
            source.len(),
            source.root().display()
        ));

        Ok(source)
    }

    fn copy_matches(
        &self,
        dataset: &Dataset,
        source: &SourceIndex,
    ) -> Result<(ExtractionProgress, Vec<CopiedFile>)> {
        self.output_formatter.start_operation("Copying matches");

        let row_progress = self.progress_manager.create_row_progress(dataset.len() as u64);
        let progress_callback = {
            let pb = row_progress.clone();
            move |progress: &ExtractionProgress| {
                ui::progress::update_row_progress(&pb, progress);
            }
        };

        let copier = FileCopier::new(self.config.matching.suffix.clone());
        let progress = copier.extract(
            dataset,
            source,
            &self.config.inputs.dest,
            Some(&progress_callback),
        )?;

        ui::progress::finish_progress_with_summary(
            &row_progress,
            &format!("Copied {} files", progress.files_copied),
            progress.elapsed(),
        );

        // Rebuild per-file info from the destination so sizes reflect what
        // actually landed on disk.
        let mut copied = Vec::new();
        for record in dataset.records() {
            let filename = record.derived_filename(copier.suffix());
            if source.contains(&filename) {
                let dest_path = self.config.inputs.dest.join(&filename);
                let size = std::fs::metadata(&dest_path).map(|m| m.len()).unwrap_or(0);
                if !copied.iter().any(|f: &CopiedFile| f.filename == filename) {
                    copied.push(CopiedFile { filename, size });
                }
            }
        }

        Ok((progress, copied))
    }

    fn create_config_snapshot(&self) -> ConfigSnapshot {
        ConfigSnapshot {
            column: self.config.matching.column.clone(),
            suffix: self.config.matching.suffix.clone(),
        }
    }

    /// Generate sample configuration file
    pub fn generate_sample_config<P: AsRef<Path>>(output_path: P) -> Result<()> {
        let sample_config = Config::create_sample_config();
        std::fs::write(output_path.as_ref(), sample_config).map_err(MdExtractError::Io)?;
        Ok(())
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn output_formatter(&self) -> &OutputFormatter {
        &self.output_formatter
    }

    pub fn progress_manager(&self) -> &ProgressManager {
        &self.progress_manager
    }

    /// Handle error with user-friendly output
    pub fn handle_error(&self, error: &MdExtractError) {
        self.output_formatter.print_user_friendly_error(error);
    }
}

/// Convenience function to run an extraction with minimal setup
pub fn extract_simple(
    csv_path: &Path,
    source_dir: &Path,
    dest_dir: &Path,
) -> Result<ExtractionReport> {
    let mut config = Config::default();
    config.inputs.csv = csv_path.to_path_buf();
    config.inputs.source = source_dir.to_path_buf();
    config.inputs.dest = dest_dir.to_path_buf();

    let mdextract = MdExtract::new(config, OutputMode::Plain, 0, true);
    mdextract.extract()
}

/// Get version information
pub fn version_info() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
