pub mod check;
pub mod config;
pub mod lookup;
pub mod normalize;
pub mod parents;

use crate::core::config::load_config;
use crate::{SearchConfig, TaxonRegistry};
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

#[derive(Clone, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

/// Checklist location shared by every command that searches
#[derive(clap::Args, Clone, Debug)]
pub struct ChecklistArgs {
    /// Compact JSON taxon checklist
    #[arg(short = 'c', long, value_name = "FILE", env = "TAXON_SEARCH_CHECKLIST")]
    pub checklist: PathBuf,
}

impl ChecklistArgs {
    pub fn load(&self) -> Result<TaxonRegistry> {
        TaxonRegistry::from_json_path(&self.checklist)
            .with_context(|| format!("Failed to load checklist {}", self.checklist.display()))
    }
}

/// Search configuration from `path`, or the defaults when no file is given
pub fn load_search_config(path: Option<&Path>) -> Result<SearchConfig> {
    match path {
        Some(path) => {
            tracing::debug!("Loading search config {}", path.display());
            load_config(path)
                .with_context(|| format!("Failed to load config {}", path.display()))
        }
        None => Ok(SearchConfig::default()),
    }
}
