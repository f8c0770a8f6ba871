pub mod commands;
pub mod output;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "taxon-search",
    version,
    about = "Autocomplete lookup of scientific and vernacular taxon names",
    long_about = "taxon-search resolves free-text, abbreviated, hybrid or vernacular queries \
                  against a taxon checklist, returning a short ranked list of candidate names \
                  with synonyms resolved to their accepted taxa."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Verbosity level (can be repeated)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Search configuration file (TOML)
    #[arg(long, value_name = "FILE", env = "TAXON_SEARCH_CONFIG", global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Look up taxa matching one or more queries
    Lookup(commands::lookup::LookupArgs),

    /// List taxa sharing an ancestor with a taxon
    Parents(commands::parents::ParentsArgs),

    /// Show the normalized form of names
    Normalize(commands::normalize::NormalizeArgs),

    /// Check checklist integrity
    Check(commands::check::CheckArgs),

    /// Show or write the search configuration
    Config(commands::config::ConfigArgs),
}

impl Cli {
    /// Log filter used when `TAXON_SEARCH_LOG` is not set
    pub fn default_log_level(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }
}
