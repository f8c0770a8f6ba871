//! Taxon name lookup for autocomplete
//!
//! Resolves free-text, abbreviated, hybrid or vernacular queries into a short,
//! deterministically ranked list of entries from a static taxon checklist.
//!
//! - `bio/`: taxon records, the checklist registry, name normalization and
//!   match pattern construction
//! - `core/`: the search engine, result ranking, row formatting and
//!   configuration
//! - `cli/`: the `taxon-search` command line front end

pub mod bio;
pub mod cli;
pub mod core;

pub use crate::bio::{NameNormalizer, PatternBuilder, TaxonRecord, TaxonRegistry};
pub use crate::core::{
    MatchCandidate, ResultRow, RowFormatter, SearchConfig, TaxonSearch, TaxonSelection,
};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TaxonSearchError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Search engine construction failed: {0}")]
    Construction(String),

    #[error("Failed to find taxon for accepted entity id {accepted_id} (referenced by {entity_id})")]
    Integrity {
        entity_id: String,
        accepted_id: String,
    },

    #[error("Taxon not found: {0}")]
    NotFound(String),

    #[error("Pattern error: {0}")]
    Pattern(#[from] regex::Error),
}

impl From<serde_json::Error> for TaxonSearchError {
    fn from(err: serde_json::Error) -> Self {
        TaxonSearchError::Serialization(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, TaxonSearchError>;
