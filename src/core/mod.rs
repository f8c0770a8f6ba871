pub mod collation;
pub mod config;
pub mod formatter;
pub mod ranker;
pub mod search;
pub mod selection;

pub use config::SearchConfig;
pub use formatter::RowFormatter;
pub use ranker::{CandidateSet, MatchCandidate, ResultRanker, ResultRow};
pub use search::TaxonSearch;
pub use selection::TaxonSelection;
