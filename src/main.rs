use clap::Parser;
use colored::*;
use std::process;
use taxon_search::cli::{Cli, Commands};
use taxon_search::TaxonSearchError;
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();

    // TAXON_SEARCH_LOG overrides the verbosity flags
    let log_level =
        std::env::var("TAXON_SEARCH_LOG").unwrap_or_else(|_| cli.default_log_level().to_string());

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_new(&log_level).unwrap_or_else(|_| EnvFilter::new(cli.default_log_level())),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(cli) {
        eprintln!("{} {:#}", "Error:".red().bold(), e);

        // Use appropriate exit codes based on error type
        let exit_code = match e.downcast_ref::<TaxonSearchError>() {
            Some(TaxonSearchError::Config(_)) => 2,
            Some(TaxonSearchError::Io(_)) => 3,
            Some(TaxonSearchError::Parse(_)) | Some(TaxonSearchError::Serialization(_)) => 4,
            Some(TaxonSearchError::Integrity { .. }) => 5,
            _ => 1,
        };
        process::exit(exit_code);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let config_path = cli.config.as_deref();

    match cli.command {
        Commands::Lookup(args) => taxon_search::cli::commands::lookup::run(args, config_path),
        Commands::Parents(args) => taxon_search::cli::commands::parents::run(args, config_path),
        Commands::Normalize(args) => taxon_search::cli::commands::normalize::run(args),
        Commands::Check(args) => taxon_search::cli::commands::check::run(args),
        Commands::Config(args) => taxon_search::cli::commands::config::run(args, config_path),
    }
}
