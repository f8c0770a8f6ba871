//! Resolving a picked result (or a typed id) to the value a form stores

use crate::core::ranker::ResultRow;
use crate::{Result, TaxonRegistry};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaxonSelection {
    pub taxon_id: String,
    pub taxon_name: String,
    /// `None` when nothing was matched
    pub vernacular_match: Option<bool>,
}

impl TaxonSelection {
    /// Selection for a chosen row; synonyms resolve to their accepted name
    /// when `always_use_accepted` is set
    pub fn from_row(row: &ResultRow, always_use_accepted: bool) -> Self {
        if always_use_accepted {
            if let (Some(accepted_id), Some(accepted_qname)) =
                (&row.accepted_entity_id, &row.accepted_qname)
            {
                return Self {
                    taxon_id: accepted_id.clone(),
                    taxon_name: accepted_qname.clone(),
                    vernacular_match: Some(false),
                };
            }
        }

        Self {
            taxon_id: row.entity_id.clone(),
            taxon_name: if row.vernacular_matched {
                row.vernacular.clone()
            } else {
                row.qname.clone()
            },
            vernacular_match: Some(row.vernacular_matched),
        }
    }

    /// First exact row, if any
    pub fn exact_match(rows: &[ResultRow], always_use_accepted: bool) -> Option<Self> {
        rows.iter()
            .find(|row| row.exact)
            .map(|row| Self::from_row(row, always_use_accepted))
    }

    /// Value for free text that matched nothing exactly
    pub fn unmatched(raw_input: &str, allow_mismatches: bool) -> Self {
        Self {
            taxon_id: String::new(),
            taxon_name: if allow_mismatches {
                raw_input.trim().to_string()
            } else {
                String::new()
            },
            vernacular_match: None,
        }
    }

    /// Exact row if the list has one, otherwise an unmatched value
    pub fn resolve_input(
        rows: &[ResultRow],
        raw_input: &str,
        always_use_accepted: bool,
        allow_mismatches: bool,
    ) -> Self {
        Self::exact_match(rows, always_use_accepted)
            .unwrap_or_else(|| Self::unmatched(raw_input, allow_mismatches))
    }

    /// Selection for a stored taxon id, always the accepted name
    ///
    /// An empty id gives an empty selection.
    pub fn from_taxon_id(registry: &TaxonRegistry, taxon_id: &str) -> Result<Self> {
        if taxon_id.is_empty() {
            return Ok(Self::default());
        }

        let record = registry.from_id(taxon_id)?;
        let taxon = registry.accepted_of(record)?.unwrap_or(record);

        Ok(Self {
            taxon_id: taxon.id.clone(),
            taxon_name: taxon.qualified_name(),
            vernacular_match: Some(false),
        })
    }

    pub fn is_empty(&self) -> bool {
        self.taxon_id.is_empty()
    }
}
