use clap::Parser;
use mdextract::{Cli, MdExtract, MdExtractError, OutputFormatter, OutputMode, UserFriendlyError};
use std::process;

fn main() {
    let exit_code = run();
    process::exit(exit_code);
}

fn run() -> i32 {
    let cli = Cli::parse();

    // Handle special commands first
    if cli.generate_config {
        return handle_generate_config(&cli);
    }

    let mdextract = match MdExtract::from_cli(&cli) {
        Ok(mdextract) => mdextract,
        Err(e) => {
            print_startup_error(&e);
            return exit_code_for(&e);
        }
    };

    if cli.dry_run {
        return handle_dry_run(&mdextract);
    }

    match mdextract.extract() {
        Ok(report) => {
            mdextract.output_formatter().print_extraction_report(&report);
            0
        }
        Err(e) => {
            mdextract.handle_error(&e);
            exit_code_for(&e)
        }
    }
}

fn exit_code_for(error: &MdExtractError) -> i32 {
    match error {
        MdExtractError::Config { .. } | MdExtractError::MissingColumn { .. } => 2,
        MdExtractError::Csv { .. } | MdExtractError::InvalidPath { .. } => 3,
        MdExtractError::Permission { .. } => 7,
        _ => 1,
    }
}

fn handle_generate_config(cli: &Cli) -> i32 {
    let config_path = cli
        .config
        .as_ref()
        .map(|p| p.to_string_lossy().to_string())
        .unwrap_or_else(|| "mdextract.toml".to_string());

    match MdExtract::generate_sample_config(&config_path) {
        Ok(()) => {
            println!("Generated sample configuration file: {}", config_path);
            println!("\nTo use this configuration:");
            println!("  mdextract --config {}", config_path);
            println!("\nEdit the file to customize settings for your needs.");
            0
        }
        Err(e) => {
            eprintln!(
                "Failed to generate configuration file: {}",
                e.user_message()
            );
            if let Some(suggestion) = e.suggestion() {
                eprintln!("Suggestion: {}", suggestion);
            }
            1
        }
    }
}

fn handle_dry_run(mdextract: &MdExtract) -> i32 {
    let formatter = mdextract.output_formatter();

    formatter.info("DRY RUN MODE - No files will be copied");
    formatter.print_separator();

    let config = mdextract.config();
    println!("  CSV: {}", config.inputs.csv.display());
    println!("  Source: {}", config.inputs.source.display());
    println!("  Destination: {}", config.inputs.dest.display());
    println!("  Column: {}", config.matching.column);
    println!("  Suffix: {}", config.matching.suffix);

    formatter.print_separator();

    let plan = match mdextract.plan() {
        Ok(plan) => plan,
        Err(e) => {
            mdextract.handle_error(&e);
            return exit_code_for(&e);
        }
    };

    if plan.is_empty() {
        formatter.info("No files would be copied");
    } else {
        formatter.info(&format!("{} files would be copied:", plan.len()));
        for path in &plan {
            println!("  {}", path.display());
        }
    }

    formatter.print_separator();
    formatter.success("Dry run completed successfully");
    formatter.info("Run without --dry-run to perform the extraction");

    0
}

fn print_startup_error(error: &MdExtractError) {
    // Basic formatter for errors that occur before setup completes
    let formatter = OutputFormatter::new(OutputMode::Human, 0, false);
    formatter.print_user_friendly_error(error);
}
