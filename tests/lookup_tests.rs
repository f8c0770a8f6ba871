mod common;

use common::*;
use pretty_assertions::assert_eq;
use rstest::rstest;
use taxon_search::{SearchConfig, TaxonRecord, TaxonRegistry, TaxonSearch, TaxonSearchError};

#[rstest]
#[case("Rosa canina")]
#[case("rosa canina")]
#[case("Rosa%20canina")]
fn test_exact_match_ranks_first_with_accepted_before_synonym(#[case] query: &str) {
    let registry = fixture_registry();
    let search = default_search(&registry);

    let rows = search.lookup(query, Vec::new(), true).unwrap();

    assert_eq!(ids(&rows), vec!["r_canina", "r_canina_syn"]);
    assert!(rows.iter().all(|row| row.exact));

    let synonym = &rows[1];
    assert_eq!(synonym.qname, "Rosa canina s.l.");
    assert_eq!(synonym.accepted_entity_id.as_deref(), Some("r_canina"));
    assert_eq!(synonym.accepted_qname.as_deref(), Some("Rosa canina"));
}

#[test]
fn test_allow_exact_false_never_flags_exact() {
    let registry = fixture_registry();
    let search = default_search(&registry);

    let rows = search.lookup("Rosa canina", Vec::new(), false).unwrap();
    assert!(!rows.is_empty());
    assert!(rows.iter().all(|row| !row.exact));
}

#[rstest]
#[case("R. canina")]
#[case("R canina")]
#[case("R.%20canina")]
fn test_abbreviated_genus_is_near_not_exact(#[case] query: &str) {
    let registry = fixture_registry();
    let search = default_search(&registry);

    let rows = search.lookup(query, Vec::new(), true).unwrap();

    assert_eq!(ids(&rows), vec!["r_canina", "r_canina_syn"]);
    assert!(rows.iter().all(|row| row.near && !row.exact));
}

#[test]
fn test_hybrid_epithets_match_in_any_order() {
    let registry = fixture_registry();
    let search = default_search(&registry);

    let rows = search.lookup("Salix fragilis x alba", Vec::new(), true).unwrap();

    // the single hybrid hit is broadened to the rest of the genus
    assert_eq!(
        ids(&rows),
        vec!["s_alba_fragilis", "salix", "s_alba", "s_fragilis", "s_rubens"]
    );
    assert!(rows[0].near);
    assert!(!rows[0].exact);
}

#[test]
fn test_hybrid_requires_x_connector() {
    let registry = fixture_registry();
    let search = default_search(&registry);

    let rows = search.lookup("Salix fragilis alba", Vec::new(), true).unwrap();
    assert!(rows.iter().all(|row| row.entity_id != "s_alba_fragilis"));
}

#[test]
fn test_trailing_hybrid_marker_prefers_hybrids() {
    let registry = fixture_registry();
    let search = default_search(&registry);

    let plain = search.lookup("Salix", Vec::new(), true).unwrap();
    assert_eq!(
        ids(&plain),
        vec!["salix", "s_alba", "s_fragilis", "s_alba_fragilis", "s_rubens"]
    );

    let hybrids = search.lookup("Salix ×", Vec::new(), true).unwrap();
    assert_eq!(
        ids(&hybrids),
        vec!["salix", "s_alba_fragilis", "s_rubens", "s_alba", "s_fragilis"]
    );
}

#[test]
fn test_truncates_to_twenty_in_rank_order() {
    let registry = TaxonRegistry::from_records(numbered_species(30));
    let search = default_search(&registry);

    let rows = search.lookup("Testia", Vec::new(), true).unwrap();

    let expected: Vec<String> = (1..=20).map(|i| format!("t{:02}", i)).collect();
    assert_eq!(ids(&rows), expected.iter().map(String::as_str).collect::<Vec<_>>());
}

#[test]
fn test_dangling_accepted_link_is_integrity_error() {
    let registry = TaxonRegistry::from_records(vec![
        TaxonRecord::new("a", "Rosa canina"),
        TaxonRecord::new("b", "Rosa lutetiana").synonym_of("gone"),
    ]);
    let search = default_search(&registry);

    match search.lookup("Rosa lutetiana", Vec::new(), true) {
        Err(TaxonSearchError::Integrity {
            entity_id,
            accepted_id,
        }) => {
            assert_eq!(entity_id, "b");
            assert_eq!(accepted_id, "gone");
        }
        other => panic!("expected integrity error, got {:?}", other),
    }

    // still an error when the synonym is only one of several hits
    assert!(matches!(
        search.lookup("Rosa", Vec::new(), true),
        Err(TaxonSearchError::Integrity { .. })
    ));
}

#[test]
fn test_bad_vernacular_is_not_matched() {
    let registry = fixture_registry();
    let search = default_search(&registry);

    assert!(search
        .lookup("Hedge Bedstraw", Vec::new(), true)
        .unwrap()
        .is_empty());

    let rows = search.lookup("Galium", Vec::new(), true).unwrap();
    assert_eq!(ids(&rows), vec!["galium", "g_album"]);
}

#[test]
fn test_vernacular_disabled() {
    let registry = fixture_registry();
    let config = SearchConfig {
        show_vernacular: false,
        ..SearchConfig::default()
    };
    let search = TaxonSearch::new(&registry, config).unwrap();

    assert!(search.lookup("Dog-rose", Vec::new(), true).unwrap().is_empty());

    let rows = search.lookup("Rosa canina", Vec::new(), true).unwrap();
    assert_eq!(ids(&rows), vec!["r_canina", "r_canina_syn"]);
    assert!(!rows[0].formatted.contains("Dog-rose"));
    assert!(rows.iter().all(|row| !row.near));
}

#[test]
fn test_require_extant_records() {
    let registry = fixture_registry();
    let search = default_search(&registry);
    assert!(ids(&search.lookup("Rosa", Vec::new(), true).unwrap()).contains(&"r_rubiginosa"));

    let config = SearchConfig {
        require_extant_records: true,
        ..SearchConfig::default()
    };
    let search = TaxonSearch::new(&registry, config).unwrap();
    let rows = search.lookup("Rosa", Vec::new(), true).unwrap();

    assert_eq!(rows.len(), 6);
    assert!(!ids(&rows).contains(&"r_rubiginosa"));
}

#[test]
fn test_minimum_rank_sort() {
    let registry = fixture_registry();
    let config = SearchConfig {
        minimum_rank_sort: Some(SPECIES_RANK),
        ..SearchConfig::default()
    };
    let search = TaxonSearch::new(&registry, config).unwrap();

    let rows = search.lookup("Rosa", Vec::new(), true).unwrap();
    assert_eq!(rows.len(), 6);
    assert!(!ids(&rows).contains(&"rosa"));
}

#[test]
fn test_max_results_from_config() {
    let registry = fixture_registry();
    let config = SearchConfig {
        max_results: 3,
        ..SearchConfig::default()
    };
    let search = TaxonSearch::new(&registry, config).unwrap();

    let rows = search.lookup("Salix", Vec::new(), true).unwrap();
    assert_eq!(ids(&rows), vec!["salix", "s_alba", "s_fragilis"]);
}

#[test]
fn test_rows_serialize_with_camel_case_names() {
    let registry = fixture_registry();
    let search = default_search(&registry);
    let rows = search.lookup("Rosa canina", Vec::new(), true).unwrap();

    let accepted = serde_json::to_value(&rows[0]).unwrap();
    assert_eq!(accepted["entityId"], "r_canina");
    assert_eq!(accepted["vernacularMatched"], false);
    assert!(accepted.get("acceptedEntityId").is_none());

    let synonym = serde_json::to_value(&rows[1]).unwrap();
    assert_eq!(synonym["acceptedEntityId"], "r_canina");
    assert_eq!(synonym["acceptedQname"], "Rosa canina");
}

#[test]
fn test_synonym_markup_names_accepted_taxon() {
    let registry = fixture_registry();
    let search = default_search(&registry);
    let rows = search.lookup("Rosa canina", Vec::new(), true).unwrap();

    assert!(rows[1].formatted.ends_with(concat!(
        r#"<span class="pref-taxon-name"> = <span class="italictaxon">Rosa canina</span>"#,
        r#" <span class="taxauthority">L.</span></span>"#
    )));
    assert!(rows[0]
        .formatted
        .ends_with(r#" <q class="taxon-vernacular"><b>Dog-rose</b></q>"#));
}

#[test]
fn test_six_epithet_hybrid_matches_reversed_order() {
    let registry = TaxonRegistry::from_records(vec![TaxonRecord::new(
        "sextuple",
        "Salix f x e x d x c x b x a",
    )]);
    let search = default_search(&registry);

    let rows = search
        .lookup("Salix a x b x c x d x e x f", Vec::new(), true)
        .unwrap();
    assert_eq!(ids(&rows), vec!["sextuple"]);
    assert!(rows[0].near);
}

#[test]
fn test_broad_pass_finds_epithet_anywhere() {
    let registry = fixture_registry();
    let search = default_search(&registry);

    let rows = search.lookup("canina", Vec::new(), true).unwrap();

    assert_eq!(ids(&rows), vec!["r_canina", "r_canina_syn"]);
    assert!(rows
        .iter()
        .all(|row| !row.near && !row.exact && !row.vernacular_matched));
}

#[test]
fn test_broad_pass_finds_vernacular_word_mid_string() {
    let registry = fixture_registry();
    let search = default_search(&registry);

    let rows = search.lookup("willow", Vec::new(), true).unwrap();
    let found = ids(&rows);

    assert_eq!(found.len(), 4);
    assert_eq!(found[0], "salix");
    assert_eq!(found[3], "s_rubens");
    assert!(found.contains(&"s_alba"));
    assert!(found.contains(&"s_fragilis"));
    assert!(rows.iter().all(|row| row.vernacular_matched && !row.near));
}

#[test]
fn test_broad_pass_skipped_at_threshold() {
    let registry = fixture_registry();
    let config = SearchConfig {
        broad_match_threshold: 1,
        ..SearchConfig::default()
    };
    let search = TaxonSearch::new(&registry, config).unwrap();

    // the prefix pass already finds "Willows"
    let rows = search.lookup("willow", Vec::new(), true).unwrap();
    assert_eq!(ids(&rows), vec!["salix"]);
    assert!(rows[0].vernacular_matched);

    // nothing starts with "canina" so the broad pass never runs
    let config = SearchConfig {
        broad_match_threshold: 0,
        ..SearchConfig::default()
    };
    let search = TaxonSearch::new(&registry, config).unwrap();
    assert!(search.lookup("canina", Vec::new(), true).unwrap().is_empty());
}
