//! Shared fixtures for the integration tests
//!
//! A small British checklist: roses (with a synonym listed before its
//! accepted name), brambles, willows including two hybrids, and a taxon whose
//! vernacular name is flagged as unreliable.

#![allow(dead_code)]

use taxon_search::{ResultRow, SearchConfig, TaxonRecord, TaxonRegistry, TaxonSearch};

pub const GENUS_RANK: i32 = 50;
pub const SPECIES_RANK: i32 = 60;

fn genus(id: &str, name: &str, vernacular: &str) -> TaxonRecord {
    TaxonRecord::new(id, name)
        .with_authority("L.")
        .with_vernacular(vernacular)
        .with_rank_sort(GENUS_RANK)
}

fn species(id: &str, name: &str, vernacular: &str, genus_id: &str) -> TaxonRecord {
    let record = TaxonRecord::new(id, name)
        .with_authority("L.")
        .with_parents([genus_id])
        .with_rank_sort(SPECIES_RANK);

    if vernacular.is_empty() {
        record
    } else {
        record.with_vernacular(vernacular)
    }
}

pub fn fixture_records() -> Vec<TaxonRecord> {
    vec![
        genus("rosa", "Rosa", "Rose"),
        TaxonRecord::new("r_canina_syn", "Rosa canina")
            .with_qualifier("s.l.")
            .with_authority("auct.")
            .synonym_of("r_canina")
            .with_parents(["rosa"])
            .with_rank_sort(SPECIES_RANK),
        species("r_canina", "Rosa canina", "Dog-rose", "rosa"),
        species("r_arvensis", "Rosa arvensis", "Field-rose", "rosa"),
        species("r_stylosa", "Rosa stylosa", "Short-styled Field-rose", "rosa"),
        species("r_rubiginosa", "Rosa rubiginosa", "Sweet-briar", "rosa").with_used(false),
        species("r_x_alba", "Rosa x alba", "", "rosa"),
        genus("rubus", "Rubus", "Brambles"),
        species("r_fruticosus", "Rubus fruticosus", "Bramble", "rubus").with_qualifier("agg."),
        species("r_caesius", "Rubus caesius", "Dewberry", "rubus"),
        genus("salix", "Salix", "Willows"),
        species("s_alba", "Salix alba", "White Willow", "salix"),
        species("s_fragilis", "Salix fragilis", "Crack-willow", "salix"),
        species("s_rubens", "Salix x rubens", "Hybrid Crack-willow", "salix"),
        species("s_alba_fragilis", "Salix alba x fragilis", "", "salix"),
        genus("galium", "Galium", "Bedstraws"),
        species("g_album", "Galium album", "Hedge Bedstraw", "galium").with_bad_vernacular(true),
    ]
}

pub fn fixture_registry() -> TaxonRegistry {
    TaxonRegistry::from_records(fixture_records())
}

pub fn default_search(registry: &TaxonRegistry) -> TaxonSearch<'_> {
    TaxonSearch::new(registry, SearchConfig::default()).expect("fixture registry is not empty")
}

/// Entity ids of `rows`, in order
pub fn ids(rows: &[ResultRow]) -> Vec<&str> {
    rows.iter().map(|row| row.entity_id.as_str()).collect()
}

/// `count` species of one genus, inserted in reverse alphabetical order
pub fn numbered_species(count: usize) -> Vec<TaxonRecord> {
    (1..=count)
        .rev()
        .map(|i| TaxonRecord::new(format!("t{:02}", i), format!("Testia epithet{:02}", i)))
        .collect()
}

/// A smaller checklist in the compact JSON format
pub const FIXTURE_JSON: &str = r#"{
    "rosa": ["Rosa", 0, "", "", "", "L.", "Rose", "rose", 1, 50, [], 0],
    "r_canina_syn": ["Rosa canina", 0, "", "r_canina", "s.l.", "auct.", "", "", 1, 60, ["rosa"], 0],
    "r_canina": ["Rosa canina", 0, "", "", "", "L.", "Dog-rose", "dog-rose", 1, 60, ["rosa"], 0],
    "r_arvensis": ["Rosa arvensis", 0, "", "", "", "Huds.", "Field-rose", "field-rose", 1, 60, ["rosa"], 0],
    "s_rubens": ["Salix x rubens", "Salix rubens", "X Salix rubens", "", "", "Schrank", "Hybrid Crack-willow", "", 1, 60, ["salix"], 0],
    "salix": ["Salix", 0, "", "", "", "L.", "Willows", "willow", 1, 50, [], 0]
}"#;
