pub mod normalize;
pub mod patterns;
pub mod taxonomy;

pub use normalize::NameNormalizer;
pub use patterns::{GenusPatterns, PatternBuilder};
pub use taxonomy::{TaxonRecord, TaxonRegistry};
