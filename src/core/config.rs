use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Only return taxa that have occurrence records
    pub require_extant_records: bool,
    /// Drop taxa ranked below this sort value (`None` or 0 = no filter)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minimum_rank_sort: Option<i32>,
    /// Match and display vernacular names
    pub show_vernacular: bool,
    pub max_results: usize,
    /// Queries shorter than this (after normalization) return the previous results
    pub min_search_length: usize,
    /// Below this many results a broad word-anywhere pass is run
    pub broad_match_threshold: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            require_extant_records: false,
            minimum_rank_sort: None,
            show_vernacular: true,
            max_results: 20,
            min_search_length: 1,
            broad_match_threshold: 5,
        }
    }
}

impl SearchConfig {
    pub fn validate(&self) -> Result<(), crate::TaxonSearchError> {
        if self.max_results == 0 {
            return Err(crate::TaxonSearchError::Config(
                "max_results must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Rank-sort threshold when filtering is active
    pub fn rank_threshold(&self) -> Option<i32> {
        self.minimum_rank_sort.filter(|&rank| rank > 0)
    }
}

pub fn default_config() -> SearchConfig {
    SearchConfig::default()
}

pub fn load_config<P: AsRef<Path>>(path: P) -> Result<SearchConfig, crate::TaxonSearchError> {
    let contents = std::fs::read_to_string(path)?;
    let config: SearchConfig = toml::from_str(&contents)
        .map_err(|e| crate::TaxonSearchError::Config(format!("Failed to parse config: {}", e)))?;
    config.validate()?;
    Ok(config)
}

pub fn save_config<P: AsRef<Path>>(
    path: P,
    config: &SearchConfig,
) -> Result<(), crate::TaxonSearchError> {
    let contents = toml::to_string_pretty(config)
        .map_err(|e| crate::TaxonSearchError::Config(format!("Failed to serialize config: {}", e)))?;
    std::fs::write(path, contents)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = default_config();
        assert_eq!(config.max_results, 20);
        assert_eq!(config.broad_match_threshold, 5);
        assert!(config.show_vernacular);
        assert_eq!(config.rank_threshold(), None);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_rank_threshold_ignores_non_positive() {
        let mut config = SearchConfig::default();
        config.minimum_rank_sort = Some(0);
        assert_eq!(config.rank_threshold(), None);
        config.minimum_rank_sort = Some(40);
        assert_eq!(config.rank_threshold(), Some(40));
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("search.toml");

        let mut config = SearchConfig::default();
        config.max_results = 8;
        config.minimum_rank_sort = Some(60);
        config.show_vernacular = false;

        save_config(&path, &config).unwrap();
        assert_eq!(load_config(&path).unwrap(), config);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("search.toml");
        std::fs::write(&path, "max_results = 5\n").unwrap();

        let config = load_config(&path).unwrap();
        assert_eq!(config.max_results, 5);
        assert!(config.show_vernacular);
        assert_eq!(config.min_search_length, 1);
    }

    #[test]
    fn test_invalid_config() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("search.toml");

        std::fs::write(&path, "max_results = 0\n").unwrap();
        assert!(matches!(
            load_config(&path),
            Err(crate::TaxonSearchError::Config(_))
        ));

        std::fs::write(&path, "max_results = \"many\"\n").unwrap();
        assert!(matches!(
            load_config(&path),
            Err(crate::TaxonSearchError::Config(_))
        ));
    }
}
