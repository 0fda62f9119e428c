use crate::config::{CliOverrides, Config};
use crate::error::Result;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "mdextract")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Copy markdown files selected by identifiers in a CSV dataset")]
#[command(
    long_about = "MdExtract reads an identifier column from a CSV file, derives the \
                       expected markdown filename for each row, and copies every matching \
                       file from a source directory into a destination directory."
)]
#[command(after_help = "EXAMPLES:\n  \
    mdextract output3.csv md extracted_md_files\n  \
    mdextract rows.csv articles out --column ID --suffix .md\n  \
    mdextract --config my-config.toml --verbose\n  \
    mdextract output3.csv md out --dry-run")]
pub struct Cli {
    /// CSV file with the identifier column (defaults to config value)
    pub csv: Option<PathBuf>,

    /// Source directory containing the markdown files
    pub source: Option<PathBuf>,

    /// Destination directory, created if absent
    pub dest: Option<PathBuf>,

    /// Header name of the identifier column
    #[arg(long, help = "Identifier column in the CSV header (default: XID)")]
    pub column: Option<String>,

    /// Filename suffix appended to each identifier
    #[arg(long, help = "Suffix deriving the filename from an identifier (default: -markdown.md)")]
    pub suffix: Option<String>,

    /// Configuration file path
    #[arg(short, long, help = "Path to TOML configuration file")]
    pub config: Option<PathBuf>,

    /// Output format for results
    #[arg(long, value_enum, default_value_t = OutputFormat::Human)]
    pub output_format: OutputFormat,

    /// Write extraction_report.json into the destination directory
    #[arg(long, help = "Persist a JSON report next to the copied files")]
    pub report: bool,

    /// Verbose output level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (suppress non-essential output)
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Dry run (show what would be copied without executing)
    #[arg(long, help = "Show which files would be copied without copying them")]
    pub dry_run: bool,

    /// Generate sample configuration file
    #[arg(long, help = "Generate a sample configuration file")]
    pub generate_config: bool,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable colored output
    Human,
    /// JSON formatted output
    Json,
    /// Plain text output
    Plain,
}

impl Cli {
    pub fn load_config(&self) -> Result<Config> {
        let mut config = Config::load_with_defaults(self.config.as_ref())?;

        let overrides = self.create_cli_overrides();
        config.merge_with_cli_args(&overrides);
        config.validate()?;

        Ok(config)
    }

    pub fn create_cli_overrides(&self) -> CliOverrides {
        CliOverrides::new()
            .with_csv(self.csv.clone())
            .with_source(self.source.clone())
            .with_dest(self.dest.clone())
            .with_column(self.column.clone())
            .with_suffix(self.suffix.clone())
            .with_generate_report(if self.report { Some(true) } else { None })
    }

    pub fn is_verbose(&self) -> bool {
        self.verbose > 0 && !self.quiet
    }

    pub fn verbosity_level(&self) -> u8 {
        if self.quiet {
            0
        } else {
            self.verbose
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bare_cli() -> Cli {
        Cli {
            csv: None,
            source: None,
            dest: None,
            column: None,
            suffix: None,
            config: None,
            output_format: OutputFormat::Human,
            report: false,
            verbose: 0,
            quiet: false,
            dry_run: false,
            generate_config: false,
        }
    }

    #[test]
    fn test_defaults_without_arguments() {
        let cli = bare_cli();
        let config = cli.load_config().unwrap();

        assert_eq!(config.inputs.csv, PathBuf::from("output3.csv"));
        assert_eq!(config.inputs.source, PathBuf::from("md"));
        assert_eq!(config.inputs.dest, PathBuf::from("extracted_md_files"));
        assert_eq!(config.matching.column, "XID");
    }

    #[test]
    fn test_positionals_override_config() {
        let cli = Cli {
            csv: Some(PathBuf::from("rows.csv")),
            source: Some(PathBuf::from("input")),
            dest: Some(PathBuf::from("output")),
            column: Some("ID".to_string()),
            ..bare_cli()
        };

        let config = cli.load_config().unwrap();
        assert_eq!(config.inputs.csv, PathBuf::from("rows.csv"));
        assert_eq!(config.inputs.source, PathBuf::from("input"));
        assert_eq!(config.inputs.dest, PathBuf::from("output"));
        assert_eq!(config.matching.column, "ID");
        // Unset options keep their defaults
        assert_eq!(config.matching.suffix, "-markdown.md");
    }

    #[test]
    fn test_report_flag_only_overrides_when_set() {
        let overrides = bare_cli().create_cli_overrides();
        assert!(overrides.generate_report.is_none());

        let cli = Cli {
            report: true,
            ..bare_cli()
        };
        assert_eq!(cli.create_cli_overrides().generate_report, Some(true));
    }

    #[test]
    fn test_verbosity_levels() {
        let cli = Cli {
            verbose: 2,
            ..bare_cli()
        };
        assert!(cli.is_verbose());
        assert_eq!(cli.verbosity_level(), 2);

        let quiet = Cli {
            verbose: 0,
            quiet: true,
            ..bare_cli()
        };
        assert!(!quiet.is_verbose());
        assert_eq!(quiet.verbosity_level(), 0);
    }

    #[test]
    fn test_clap_parsing() {
        let cli = Cli::parse_from([
            "mdextract",
            "rows.csv",
            "md",
            "out",
            "--column",
            "ID",
            "--dry-run",
            "-v",
        ]);

        assert_eq!(cli.csv, Some(PathBuf::from("rows.csv")));
        assert_eq!(cli.source, Some(PathBuf::from("md")));
        assert_eq!(cli.dest, Some(PathBuf::from("out")));
        assert_eq!(cli.column, Some("ID".to_string()));
        assert!(cli.dry_run);
        assert_eq!(cli.verbose, 1);
    }
}
