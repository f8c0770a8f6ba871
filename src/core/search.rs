//! Query matching against the taxon registry
//!
//! A lookup normalizes the query, picks the abbreviated-genus or full-name
//! branch, scans every record in registry order collecting flagged
//! candidates, and hands them to the ranker. A lookup that produces a single
//! row is broadened once, either to the genus or to taxa sharing an ancestor.

use crate::bio::{NameNormalizer, PatternBuilder, TaxonRecord, TaxonRegistry};
use crate::core::collation;
use crate::core::config::SearchConfig;
use crate::core::ranker::{CandidateSet, MatchCandidate, ResultRanker, ResultRow};
use crate::{Result, TaxonSearchError};
use lazy_static::lazy_static;
use regex::Regex;
use std::collections::HashSet;

/// Top-level call plus one broadening call
pub const MAX_LOOKUP_DEPTH: usize = 2;

lazy_static! {
    static ref ABBREVIATED_GENUS: Regex = Regex::new(r"(?i)^(X\s+)?([a-z])[.\s]+(.*?)$").unwrap();
    static ref HYBRID_QUERY: Regex = Regex::new(r" x\b").unwrap();
    static ref TRAILING_HYBRID: Regex = Regex::new(r"(?i)\s+x$").unwrap();
}

/// Autocomplete search over a borrowed registry
pub struct TaxonSearch<'a> {
    registry: &'a TaxonRegistry,
    config: SearchConfig,
    normalizer: NameNormalizer,
}

/// Query text after decoding and normalization
struct PreparedQuery {
    /// Percent-decoded, trimmed, otherwise as typed
    decoded: String,
    /// Normalized, trailing hybrid marker removed
    taxon_string: String,
    prefer_hybrids: bool,
}

impl<'a> TaxonSearch<'a> {
    pub fn new(registry: &'a TaxonRegistry, config: SearchConfig) -> Result<Self> {
        if registry.is_empty() {
            return Err(TaxonSearchError::Construction(
                "taxon registry must be loaded before searching".to_string(),
            ));
        }
        config.validate()?;

        Ok(Self {
            registry,
            config,
            normalizer: NameNormalizer::new(),
        })
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: SearchConfig) -> Result<()> {
        config.validate()?;
        self.config = config;
        Ok(())
    }

    pub fn registry(&self) -> &'a TaxonRegistry {
        self.registry
    }

    fn ranker(&self) -> ResultRanker<'_> {
        ResultRanker::new(self.registry, &self.config)
    }

    /// Ranked rows for `query`, appended to and sorted together with `previous`
    ///
    /// `allow_exact = false` never flags rows as exact matches. An empty (or
    /// too short) query returns `previous` unchanged.
    pub fn lookup(
        &self,
        query: &str,
        previous: Vec<ResultRow>,
        allow_exact: bool,
    ) -> Result<Vec<ResultRow>> {
        self.lookup_at_depth(query, previous, allow_exact, 0)
    }

    pub fn compile_results(
        &self,
        candidates: &CandidateSet,
        prefer_hybrids: bool,
        previous: Vec<ResultRow>,
    ) -> Result<Vec<ResultRow>> {
        self.ranker()
            .compile_results(candidates, prefer_hybrids, previous)
    }

    pub fn lookup_parent_results(
        &self,
        taxon_id: &str,
        use_vernacular: bool,
    ) -> Result<Vec<ResultRow>> {
        self.ranker().lookup_parent_results(taxon_id, use_vernacular)
    }

    /// Normalized form of a query or name
    pub fn normalize(&self, raw: &str) -> String {
        self.normalizer.normalize(raw)
    }

    fn prepare(&self, query: &str) -> PreparedQuery {
        let decoded = urlencoding::decode(query)
            .map(|decoded| decoded.into_owned())
            .unwrap_or_else(|_| query.to_string());
        let decoded = decoded.trim().to_string();

        let normalized = self.normalizer.normalize(&decoded);
        let prefer_hybrids = HYBRID_QUERY.is_match(&normalized);
        let taxon_string = TRAILING_HYBRID.replace(&normalized, "").into_owned();

        PreparedQuery {
            decoded,
            taxon_string,
            prefer_hybrids,
        }
    }

    fn lookup_at_depth(
        &self,
        query: &str,
        previous: Vec<ResultRow>,
        allow_exact: bool,
        depth: usize,
    ) -> Result<Vec<ResultRow>> {
        let prepared = self.prepare(query);
        let taxon_string = prepared.taxon_string.as_str();

        if taxon_string.is_empty()
            || taxon_string.chars().count() < self.config.min_search_length
        {
            tracing::debug!("Query {:?} too short, keeping previous results", query);
            return Ok(previous);
        }

        let top_level = previous.is_empty();

        let rows = match ABBREVIATED_GENUS.captures(taxon_string) {
            Some(captures) => {
                let genus_letter = captures.get(2).map_or("", |m| m.as_str());
                let remainder = captures.get(3).map_or("", |m| m.as_str());
                tracing::debug!(
                    "Abbreviated genus lookup {:?} / {:?}",
                    genus_letter,
                    remainder
                );

                let candidates =
                    self.match_abbreviated(taxon_string, genus_letter, remainder, allow_exact)?;
                self.compile_results(&candidates, prepared.prefer_hybrids, previous)?
            }
            None => self.lookup_full_name(&prepared, previous, allow_exact)?,
        };

        if rows.len() == 1 && top_level && depth + 1 < MAX_LOOKUP_DEPTH {
            return self.broaden(rows, taxon_string, depth);
        }

        Ok(rows)
    }

    fn match_abbreviated(
        &self,
        taxon_string: &str,
        genus_letter: &str,
        remainder: &str,
        allow_exact: bool,
    ) -> Result<CandidateSet> {
        let patterns = PatternBuilder::abbreviated_genus(genus_letter, remainder)?;
        let mut candidates = CandidateSet::new();

        for record in self.registry.iter() {
            let matched = patterns.loose.is_match(record.canonical())
                || (!record.hybrid_canonical_name.is_empty()
                    && patterns.loose.is_match(&record.hybrid_canonical_name));

            if matched {
                candidates.insert(
                    record.id.clone(),
                    MatchCandidate::name(
                        allow_exact && record.name_string == taxon_string,
                        patterns.near.is_match(&record.name_string),
                    ),
                );
            }
        }

        Ok(candidates)
    }

    fn lookup_full_name(
        &self,
        prepared: &PreparedQuery,
        previous: Vec<ResultRow>,
        allow_exact: bool,
    ) -> Result<Vec<ResultRow>> {
        let taxon_string = prepared.taxon_string.as_str();
        let name_pattern = PatternBuilder::canonical_prefix(taxon_string)?;
        tracing::trace!("Full name pattern {}", name_pattern);

        let mut candidates = CandidateSet::new();

        if !self.config.show_vernacular {
            for record in self.registry.iter() {
                if matches_name(&name_pattern, record) {
                    candidates.insert(
                        record.id.clone(),
                        MatchCandidate::name(
                            allow_exact && collation::base_equal(&record.name_string, taxon_string),
                            false,
                        ),
                    );
                }
            }

            tracing::debug!("{} name candidates for {:?}", candidates.len(), taxon_string);
            return self.compile_results(&candidates, prepared.prefer_hybrids, previous);
        }

        let near_pattern = PatternBuilder::near_prefix(taxon_string)?;
        let vernacular_pattern = PatternBuilder::vernacular_prefix(&prepared.decoded)?;

        for record in self.registry.iter() {
            if matches_name(&name_pattern, record) {
                let near = near_pattern.is_match(&record.name_string)
                    || near_pattern.is_match(record.canonical());

                candidates.insert(
                    record.id.clone(),
                    MatchCandidate::name(
                        allow_exact && collation::base_equal(&record.name_string, taxon_string),
                        near,
                    ),
                );
            } else if !record.bad_vernacular
                && (vernacular_pattern.is_match(&record.vernacular_name)
                    || vernacular_pattern.is_match(&record.vernacular_root))
            {
                candidates.insert(
                    record.id.clone(),
                    MatchCandidate::vernacular(
                        allow_exact && collation::base_equal(&record.vernacular_name, taxon_string),
                    ),
                );
            }
        }

        tracing::debug!(
            "{} name/vernacular candidates for {:?}",
            candidates.len(),
            taxon_string
        );

        let rows = self.compile_results(&candidates, prepared.prefer_hybrids, previous.clone())?;
        if rows.len() >= self.config.broad_match_threshold {
            return Ok(rows);
        }

        let added = self.match_broad(prepared, &mut candidates, allow_exact)?;
        tracing::debug!("Broad pass added {} candidates", added);

        if added == 0 {
            return Ok(rows);
        }
        self.compile_results(&candidates, prepared.prefer_hybrids, previous)
    }

    /// Word-anywhere pass over records not already matched; never flags `near`
    ///
    /// Only a hit on the name string counts as a name match. Canonical name
    /// and vernacular hits are flagged as vernacular matches.
    fn match_broad(
        &self,
        prepared: &PreparedQuery,
        candidates: &mut CandidateSet,
        allow_exact: bool,
    ) -> Result<usize> {
        let taxon_string = prepared.taxon_string.as_str();
        let broad_name = PatternBuilder::broad(taxon_string)?;
        let broad_vernacular = PatternBuilder::broad(&prepared.decoded)?;
        let before = candidates.len();

        for record in self.registry.iter() {
            if candidates.contains_key(&record.id) {
                continue;
            }

            let exact = allow_exact && record.name_string == taxon_string;

            let candidate = if broad_name.is_match(&record.name_string) {
                MatchCandidate::name(exact, false)
            } else if record
                .canonical_name
                .as_deref()
                .is_some_and(|canonical| broad_name.is_match(canonical))
                || (!record.bad_vernacular && broad_vernacular.is_match(&record.vernacular_name))
            {
                MatchCandidate::vernacular(exact)
            } else {
                continue;
            };

            candidates.insert(record.id.clone(), candidate);
        }

        Ok(candidates.len() - before)
    }

    /// Widen a single-row result to its genus, or to related taxa for an
    /// exact vernacular hit
    fn broaden(
        &self,
        rows: Vec<ResultRow>,
        taxon_string: &str,
        depth: usize,
    ) -> Result<Vec<ResultRow>> {
        let single = &rows[0];

        let extra = if single.vernacular_matched && single.exact {
            tracing::debug!("Broadening exact vernacular match {}", single.entity_id);
            self.lookup_parent_results(&single.entity_id, true)?
        } else if let Some((genus, _)) = taxon_string.split_once(' ') {
            tracing::debug!("Broadening {:?} to genus {:?}", taxon_string, genus);
            self.lookup_at_depth(genus, rows.clone(), false, depth + 1)?
        } else {
            return Ok(rows);
        };

        let mut seen = HashSet::new();
        let mut broadened: Vec<ResultRow> = rows
            .into_iter()
            .chain(extra)
            .filter(|row| seen.insert(row.entity_id.clone()))
            .collect();
        broadened.truncate(self.config.max_results);

        Ok(broadened)
    }
}

/// Name string, or a canonical name that differs from it
fn matches_name(pattern: &Regex, record: &TaxonRecord) -> bool {
    pattern.is_match(&record.name_string)
        || record
            .canonical_name
            .as_deref()
            .is_some_and(|canonical| pattern.is_match(canonical))
}
