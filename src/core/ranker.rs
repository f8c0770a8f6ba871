//! Candidate filtering, row construction and ordering
//!
//! Rows are ordered by a fixed chain of tie-breaks: exact matches, then near
//! matches, then hybrid preference, then same-name disambiguation (accepted
//! names and qualifier priority), then vernacular length, then accepted before
//! synonym, and finally a collated comparison of the bare name. The chain is
//! not a total order for every input, so rows are sorted with a merge sort
//! that never assumes one.

use crate::bio::taxonomy::{qualified, TaxonRecord};
use crate::core::collation;
use crate::core::config::SearchConfig;
use crate::core::formatter::RowFormatter;
use crate::{Result, TaxonRegistry};
use indexmap::IndexMap;
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::HashSet;

lazy_static! {
    static ref HYBRID_TOKEN: Regex = Regex::new(r"(?i)\bx\b").unwrap();
    static ref CLEAN_RANK_NAMES: Regex = Regex::new(
        r"\s(subfam\.|subg\.|sect\.|subsect\.|ser\.|subser\.|subsp\.|nothosubsp\.|microsp\.|praesp\.|agsp\.|race|convar\.|nm\.|microgene|f\.|subvar\.|var\.|nothovar\.|cv\.|sublusus|taxon|morph\.|group|sp\.)\s"
    )
    .unwrap();
    static ref HYBRID_PREFIX: Regex = Regex::new(r"(?i)\bx ").unwrap();
}

/// Same-name tie-break: later entries sort first (agg. before s.l. before plain before s.s.)
const QUALIFIER_PRIORITY: [&str; 4] = ["s.s.", "", "s.l.", "agg."];

/// Match flags for one record during a single lookup
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MatchCandidate {
    pub exact: bool,
    pub near: bool,
    /// Matched through a vernacular name
    pub vernacular: bool,
}

impl MatchCandidate {
    pub fn name(exact: bool, near: bool) -> Self {
        Self {
            exact,
            near,
            vernacular: false,
        }
    }

    pub fn vernacular(exact: bool) -> Self {
        Self {
            exact,
            near: false,
            vernacular: true,
        }
    }
}

/// Candidates keyed by taxon id, in scan order
pub type CandidateSet = IndexMap<String, MatchCandidate>;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultRow {
    pub entity_id: String,
    pub vernacular: String,
    /// Name string with qualifier
    pub qname: String,
    pub name: String,
    pub qualifier: String,
    pub authority: String,
    /// Bare name string
    pub uname: String,
    pub vernacular_matched: bool,
    pub exact: bool,
    pub near: bool,
    pub formatted: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accepted_entity_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accepted_name_string: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accepted_qualifier: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accepted_authority: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accepted_qname: Option<String>,
}

impl ResultRow {
    pub fn is_synonym(&self) -> bool {
        self.accepted_entity_id.is_some()
    }
}

pub struct ResultRanker<'a> {
    registry: &'a TaxonRegistry,
    config: &'a SearchConfig,
    formatter: RowFormatter,
}

impl<'a> ResultRanker<'a> {
    pub fn new(registry: &'a TaxonRegistry, config: &'a SearchConfig) -> Self {
        Self {
            registry,
            config,
            formatter: RowFormatter::new(config.show_vernacular),
        }
    }

    /// Append rows for `candidates` to `previous`, sort and truncate
    ///
    /// A synonym whose accepted taxon is missing from the registry is an
    /// integrity error.
    pub fn compile_results(
        &self,
        candidates: &CandidateSet,
        prefer_hybrids: bool,
        previous: Vec<ResultRow>,
    ) -> Result<Vec<ResultRow>> {
        let mut rows = previous;
        rows.reserve(candidates.len());

        for (id, candidate) in candidates {
            let record = self.registry.from_id(id)?;
            if self.passes_filters(record) {
                rows.push(self.build_row(record, candidate)?);
            }
        }

        merge_sort_by(&mut rows, &|a, b| compare_rows(a, b, prefer_hybrids));
        rows.truncate(self.config.max_results);

        tracing::debug!(
            "Compiled {} rows from {} candidates",
            rows.len(),
            candidates.len()
        );
        Ok(rows)
    }

    /// Rows for taxa sharing an ancestor with `taxon_id`
    ///
    /// With `use_vernacular` only taxa that have a vernacular name are
    /// returned (flagged as vernacular matches), otherwise only accepted taxa.
    pub fn lookup_parent_results(
        &self,
        taxon_id: &str,
        use_vernacular: bool,
    ) -> Result<Vec<ResultRow>> {
        let reference = self.registry.from_id(taxon_id)?;
        if reference.parent_ids.is_empty() {
            return Ok(Vec::new());
        }

        let parent_ids: HashSet<&str> = reference.parent_ids.iter().map(String::as_str).collect();
        let mut candidates = CandidateSet::new();

        for record in self.registry.iter() {
            let related = record
                .parent_ids
                .iter()
                .any(|id| parent_ids.contains(id.as_str()));
            if !related {
                continue;
            }

            if use_vernacular {
                if !record.vernacular_name.is_empty() {
                    candidates.insert(record.id.clone(), MatchCandidate::vernacular(false));
                }
            } else if !record.is_synonym() {
                candidates.insert(record.id.clone(), MatchCandidate::default());
            }
        }

        tracing::debug!(
            "{} taxa share an ancestor with {}",
            candidates.len(),
            taxon_id
        );
        self.compile_results(&candidates, false, Vec::new())
    }

    fn passes_filters(&self, record: &TaxonRecord) -> bool {
        if self.config.require_extant_records && !record.used {
            return false;
        }

        match self.config.rank_threshold() {
            Some(threshold) => record.min_rank_sort >= threshold,
            None => true,
        }
    }

    fn build_row(&self, record: &TaxonRecord, candidate: &MatchCandidate) -> Result<ResultRow> {
        let qname = record.qualified_name();

        let mut row = ResultRow {
            entity_id: record.id.clone(),
            vernacular: record.vernacular_name.clone(),
            name: qname.clone(),
            qname,
            qualifier: record.qualifier.clone(),
            authority: record.authority.clone(),
            uname: record.name_string.clone(),
            vernacular_matched: candidate.vernacular,
            exact: candidate.exact,
            near: candidate.near,
            ..ResultRow::default()
        };

        if let Some(accepted) = self.registry.accepted_of(record)? {
            row.accepted_entity_id = Some(accepted.id.clone());
            row.accepted_name_string = Some(accepted.name_string.clone());
            row.accepted_qualifier = Some(accepted.qualifier.clone());
            row.accepted_authority = Some(accepted.authority.clone());
            row.accepted_qname = Some(qualified(&accepted.name_string, &accepted.qualifier));
        }

        row.formatted = self.formatter.format(&row);
        Ok(row)
    }
}

/// Ordering of two rows; `prefer_hybrids` lifts hybrid names above non-hybrids
pub fn compare_rows(a: &ResultRow, b: &ResultRow, prefer_hybrids: bool) -> Ordering {
    if a.exact {
        if b.exact {
            return accepted_first(a);
        }
        return Ordering::Less;
    } else if b.exact {
        return Ordering::Greater;
    }

    if a.near {
        if !b.near {
            return Ordering::Less;
        }
    } else if b.near {
        return Ordering::Greater;
    }

    let a_hybrid = HYBRID_TOKEN.is_match(&a.uname);
    let b_hybrid = HYBRID_TOKEN.is_match(&b.uname);

    if a_hybrid {
        if b_hybrid {
            if a.uname == b.uname {
                return if a.is_synonym() {
                    Ordering::Greater
                } else {
                    Ordering::Equal
                };
            }
            return if collation::compare(&a.qname, &b.qname) == Ordering::Less {
                Ordering::Less
            } else {
                Ordering::Greater
            };
        }
        return if prefer_hybrids {
            Ordering::Less
        } else {
            Ordering::Greater
        };
    } else if b_hybrid {
        return if prefer_hybrids {
            Ordering::Greater
        } else {
            Ordering::Less
        };
    } else if a.uname == b.uname {
        if a.is_synonym() != b.is_synonym() {
            return accepted_first(a);
        }

        let a_priority = qualifier_priority(&a.qualifier);
        let b_priority = qualifier_priority(&b.qualifier);
        return b_priority.cmp(&a_priority);
    } else if a.vernacular_matched && b.vernacular_matched && a.vernacular != b.vernacular {
        return if a.vernacular.chars().count() < b.vernacular.chars().count() {
            Ordering::Less
        } else {
            Ordering::Greater
        };
    }

    match (a.is_synonym(), b.is_synonym()) {
        (true, false) => return Ordering::Greater,
        (false, true) => return Ordering::Less,
        _ => {}
    }

    collation::compare(&sort_name(&a.uname), &sort_name(&b.uname))
}

fn accepted_first(a: &ResultRow) -> Ordering {
    if a.is_synonym() {
        Ordering::Greater
    } else {
        Ordering::Less
    }
}

fn qualifier_priority(qualifier: &str) -> i32 {
    QUALIFIER_PRIORITY
        .iter()
        .position(|&q| q == qualifier)
        .map_or(-1, |index| index as i32)
}

/// Name with rank tokens, apostrophes and hybrid markers removed
fn sort_name(uname: &str) -> String {
    let stripped = CLEAN_RANK_NAMES.replace_all(uname, " ").replace('\'', "");
    HYBRID_PREFIX.replace_all(&stripped, "").into_owned()
}

/// Stable top-down merge sort; only asks whether the right element sorts
/// strictly before the left one, so inconsistent comparators cannot panic
pub fn merge_sort_by<T, F>(items: &mut Vec<T>, compare: &F)
where
    F: Fn(&T, &T) -> Ordering,
{
    if items.len() < 2 {
        return;
    }

    let mut right = items.split_off(items.len() / 2);
    merge_sort_by(items, compare);
    merge_sort_by(&mut right, compare);

    let left = std::mem::take(items);
    items.reserve(left.len() + right.len());

    let mut left = left.into_iter().peekable();
    let mut right = right.into_iter().peekable();

    loop {
        let take_right = match (left.peek(), right.peek()) {
            (Some(l), Some(r)) => compare(l, r) == Ordering::Greater,
            (Some(_), None) => false,
            (None, Some(_)) => true,
            (None, None) => break,
        };

        let next = if take_right { right.next() } else { left.next() };
        items.extend(next);
    }
}
