/// Taxon records and the read-only checklist registry they live in
use crate::{Result, TaxonSearchError};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// One entry of the taxon checklist
///
/// Records are immutable once loaded into a [`TaxonRegistry`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxonRecord {
    pub id: String,
    /// Scientific name including expanded rank tokens, e.g. `Rosa canina var. dumalis`
    pub name_string: String,
    /// Alternate canonical form, `None` when identical to `name_string`
    pub canonical_name: Option<String>,
    /// Canonical form used for hybrid display, empty when not applicable
    pub hybrid_canonical_name: String,
    /// Accepted taxon for a synonym, `None` for accepted names
    pub accepted_entity_id: Option<String>,
    pub qualifier: String,
    pub authority: String,
    pub vernacular_name: String,
    /// Vernacular name normalized for matching
    pub vernacular_root: String,
    /// Taxon has occurrence records
    pub used: bool,
    pub min_rank_sort: i32,
    /// Vernacular name is unreliable and excluded from vernacular matching
    pub bad_vernacular: bool,
    /// Ancestor ids, nearest last
    pub parent_ids: Vec<String>,
}

impl TaxonRecord {
    pub fn new(id: impl Into<String>, name_string: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name_string: name_string.into(),
            canonical_name: None,
            hybrid_canonical_name: String::new(),
            accepted_entity_id: None,
            qualifier: String::new(),
            authority: String::new(),
            vernacular_name: String::new(),
            vernacular_root: String::new(),
            used: true,
            min_rank_sort: 0,
            bad_vernacular: false,
            parent_ids: Vec::new(),
        }
    }

    pub fn with_canonical(mut self, canonical: impl Into<String>) -> Self {
        self.canonical_name = Some(canonical.into());
        self
    }

    pub fn with_hybrid_canonical(mut self, canonical: impl Into<String>) -> Self {
        self.hybrid_canonical_name = canonical.into();
        self
    }

    pub fn with_qualifier(mut self, qualifier: impl Into<String>) -> Self {
        self.qualifier = qualifier.into();
        self
    }

    pub fn with_authority(mut self, authority: impl Into<String>) -> Self {
        self.authority = authority.into();
        self
    }

    pub fn with_vernacular(mut self, vernacular: impl Into<String>) -> Self {
        let vernacular = vernacular.into();
        self.vernacular_root = vernacular.to_lowercase();
        self.vernacular_name = vernacular;
        self
    }

    pub fn synonym_of(mut self, accepted_id: impl Into<String>) -> Self {
        self.accepted_entity_id = Some(accepted_id.into());
        self
    }

    pub fn with_parents<I, S>(mut self, parent_ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.parent_ids = parent_ids.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_rank_sort(mut self, rank_sort: i32) -> Self {
        self.min_rank_sort = rank_sort;
        self
    }

    pub fn with_used(mut self, used: bool) -> Self {
        self.used = used;
        self
    }

    pub fn with_bad_vernacular(mut self, bad: bool) -> Self {
        self.bad_vernacular = bad;
        self
    }

    /// Canonical name, falling back to `name_string` when none is stored
    pub fn canonical(&self) -> &str {
        self.canonical_name.as_deref().unwrap_or(&self.name_string)
    }

    /// Name string with the qualifier appended, e.g. `Rubus fruticosus agg.`
    pub fn qualified_name(&self) -> String {
        qualified(&self.name_string, &self.qualifier)
    }

    pub fn is_synonym(&self) -> bool {
        self.accepted_entity_id.is_some()
    }
}

pub(crate) fn qualified(name: &str, qualifier: &str) -> String {
    if qualifier.is_empty() {
        name.to_string()
    } else {
        format!("{} {}", name, qualifier)
    }
}

/// Immutable checklist of taxa keyed by id
///
/// Iteration follows insertion (file) order, which is the scan order of every
/// search pass.
#[derive(Debug, Default, Clone)]
pub struct TaxonRegistry {
    taxa: IndexMap<String, TaxonRecord>,
}

impl TaxonRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_records<I: IntoIterator<Item = TaxonRecord>>(records: I) -> Self {
        let mut registry = Self::new();
        for record in records {
            registry.add_taxon(record);
        }
        registry
    }

    /// Load a compact JSON checklist, see [`checklist`]
    pub fn from_json_reader<R: std::io::Read>(reader: R) -> Result<Self> {
        checklist::from_json_reader(reader)
    }

    pub fn from_json_path<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        checklist::from_json_path(path)
    }

    /// Add (or replace) a record; only possible while the registry is still owned
    pub fn add_taxon(&mut self, record: TaxonRecord) {
        self.taxa.insert(record.id.clone(), record);
    }

    pub fn get(&self, id: &str) -> Option<&TaxonRecord> {
        self.taxa.get(id)
    }

    /// Like [`get`](Self::get) but an unknown id is an error
    pub fn from_id(&self, id: &str) -> Result<&TaxonRecord> {
        self.taxa
            .get(id)
            .ok_or_else(|| TaxonSearchError::NotFound(id.to_string()))
    }

    pub fn contains(&self, id: &str) -> bool {
        self.taxa.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.taxa.len()
    }

    pub fn is_empty(&self) -> bool {
        self.taxa.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TaxonRecord> {
        self.taxa.values()
    }

    /// Follow a synonym link, `Ok(None)` for accepted names
    pub fn accepted_of(&self, record: &TaxonRecord) -> Result<Option<&TaxonRecord>> {
        match record.accepted_entity_id.as_deref() {
            None => Ok(None),
            Some(accepted_id) => {
                self.taxa
                    .get(accepted_id)
                    .map(Some)
                    .ok_or_else(|| TaxonSearchError::Integrity {
                        entity_id: record.id.clone(),
                        accepted_id: accepted_id.to_string(),
                    })
            }
        }
    }

    /// All `(synonym id, missing accepted id)` pairs
    pub fn dangling_links(&self) -> Vec<(&str, &str)> {
        self.taxa
            .values()
            .filter_map(|record| {
                let accepted_id = record.accepted_entity_id.as_deref()?;
                if self.taxa.contains_key(accepted_id) {
                    None
                } else {
                    Some((record.id.as_str(), accepted_id))
                }
            })
            .collect()
    }

    /// Fails with the first dangling accepted link
    pub fn validate_links(&self) -> Result<()> {
        match self.dangling_links().first() {
            None => Ok(()),
            Some((entity_id, accepted_id)) => Err(TaxonSearchError::Integrity {
                entity_id: entity_id.to_string(),
                accepted_id: accepted_id.to_string(),
            }),
        }
    }
}

/// Compact JSON checklist format
///
/// The file is an object mapping taxon id to a positional row:
///
/// ```text
/// [nameString, canonical (0 = same as nameString), hybridCanonical,
///  acceptedEntityId, qualifier, authority, vernacular, vernacularRoot,
///  used (0/1), minRankSort, parentIds, badVernacular (0/1)]
/// ```
///
/// Trailing columns after `authority` may be omitted.
pub mod checklist {
    use super::*;
    use serde_json::Value;
    use std::fs::File;
    use std::io::{BufReader, Read};
    use std::path::Path;

    pub const NAME_STRING_COLUMN: usize = 0;
    pub const CANONICAL_COLUMN: usize = 1;
    pub const HYBRID_CANONICAL_COLUMN: usize = 2;
    pub const ACCEPTED_ENTITY_ID_COLUMN: usize = 3;
    pub const QUALIFIER_COLUMN: usize = 4;
    pub const AUTHORITY_COLUMN: usize = 5;
    pub const VERNACULAR_COLUMN: usize = 6;
    pub const VERNACULAR_ROOT_COLUMN: usize = 7;
    pub const USED_COLUMN: usize = 8;
    pub const MIN_RANK_COLUMN: usize = 9;
    pub const PARENT_IDS_COLUMN: usize = 10;
    pub const BAD_VERNACULAR_COLUMN: usize = 11;

    pub fn from_json_reader<R: Read>(reader: R) -> Result<TaxonRegistry> {
        let rows: IndexMap<String, Vec<Value>> = serde_json::from_reader(reader)?;
        let mut registry = TaxonRegistry::new();

        for (id, columns) in rows {
            let record = record_from_columns(&id, &columns)?;
            registry.add_taxon(record);
        }

        tracing::info!("Loaded {} taxa", registry.len());
        Ok(registry)
    }

    pub fn from_json_str(json: &str) -> Result<TaxonRegistry> {
        from_json_reader(json.as_bytes())
    }

    pub fn from_json_path<P: AsRef<Path>>(path: P) -> Result<TaxonRegistry> {
        let path = path.as_ref();
        tracing::debug!("Reading checklist {}", path.display());
        let file = File::open(path)?;
        from_json_reader(BufReader::new(file))
    }

    pub fn record_from_columns(id: &str, columns: &[Value]) -> Result<TaxonRecord> {
        if columns.len() <= AUTHORITY_COLUMN {
            return Err(TaxonSearchError::Parse(format!(
                "taxon {} has {} columns, expected at least {}",
                id,
                columns.len(),
                AUTHORITY_COLUMN + 1
            )));
        }

        let name_string = string_column(id, columns, NAME_STRING_COLUMN)?;
        if name_string.is_empty() {
            return Err(TaxonSearchError::Parse(format!(
                "taxon {} has an empty name string",
                id
            )));
        }

        // canonical name is stored as 0 when it is the same as the name string
        let canonical_name = match columns.get(CANONICAL_COLUMN) {
            None | Some(Value::Null) => None,
            Some(Value::Number(n)) if n.as_i64() == Some(0) => None,
            Some(Value::String(s)) if s.is_empty() || *s == name_string => None,
            Some(Value::String(s)) => Some(s.clone()),
            Some(other) => return Err(column_error(id, CANONICAL_COLUMN, other)),
        };

        let accepted_entity_id = Some(string_column(id, columns, ACCEPTED_ENTITY_ID_COLUMN)?)
            .filter(|accepted| !accepted.is_empty());

        Ok(TaxonRecord {
            id: id.to_string(),
            name_string,
            canonical_name,
            hybrid_canonical_name: string_column(id, columns, HYBRID_CANONICAL_COLUMN)?,
            accepted_entity_id,
            qualifier: string_column(id, columns, QUALIFIER_COLUMN)?,
            authority: string_column(id, columns, AUTHORITY_COLUMN)?,
            vernacular_name: string_column(id, columns, VERNACULAR_COLUMN)?,
            vernacular_root: string_column(id, columns, VERNACULAR_ROOT_COLUMN)?,
            used: flag_column(id, columns, USED_COLUMN)?,
            min_rank_sort: rank_column(id, columns, MIN_RANK_COLUMN)?,
            parent_ids: id_list_column(id, columns, PARENT_IDS_COLUMN)?,
            bad_vernacular: flag_column(id, columns, BAD_VERNACULAR_COLUMN)?,
        })
    }

    fn column_error(id: &str, column: usize, value: &Value) -> TaxonSearchError {
        TaxonSearchError::Parse(format!(
            "taxon {} column {} has unexpected value {}",
            id, column, value
        ))
    }

    fn string_column(id: &str, columns: &[Value], column: usize) -> Result<String> {
        match columns.get(column) {
            None | Some(Value::Null) => Ok(String::new()),
            Some(Value::String(s)) => Ok(s.clone()),
            // numeric ids are sometimes written unquoted
            Some(Value::Number(n)) if column == ACCEPTED_ENTITY_ID_COLUMN => {
                Ok(if n.as_i64() == Some(0) {
                    String::new()
                } else {
                    n.to_string()
                })
            }
            Some(other) => Err(column_error(id, column, other)),
        }
    }

    fn flag_column(id: &str, columns: &[Value], column: usize) -> Result<bool> {
        match columns.get(column) {
            None | Some(Value::Null) => Ok(false),
            Some(Value::Bool(b)) => Ok(*b),
            Some(Value::Number(n)) => Ok(n.as_i64().unwrap_or(0) != 0),
            Some(other) => Err(column_error(id, column, other)),
        }
    }

    fn rank_column(id: &str, columns: &[Value], column: usize) -> Result<i32> {
        match columns.get(column) {
            None | Some(Value::Null) => Ok(0),
            Some(Value::Number(n)) => n
                .as_i64()
                .and_then(|v| i32::try_from(v).ok())
                .ok_or_else(|| column_error(id, column, &Value::Number(n.clone()))),
            Some(other) => Err(column_error(id, column, other)),
        }
    }

    fn id_list_column(id: &str, columns: &[Value], column: usize) -> Result<Vec<String>> {
        match columns.get(column) {
            None | Some(Value::Null) => Ok(Vec::new()),
            Some(Value::Array(items)) => items
                .iter()
                .map(|item| match item {
                    Value::String(s) => Ok(s.clone()),
                    Value::Number(n) => Ok(n.to_string()),
                    other => Err(column_error(id, column, other)),
                })
                .collect(),
            Some(other) => Err(column_error(id, column, other)),
        }
    }
}
