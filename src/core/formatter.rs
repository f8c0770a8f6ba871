//! HTML-ish display markup for result rows

use crate::core::ranker::ResultRow;
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref HYBRID_WORD: Regex = Regex::new(r"\bx\b").unwrap();
    static ref RANK_DISPLAY_NAMES: Regex = Regex::new(
        r"\b(subg\.|sect\.|subsect\.|ser\.|group|subsp\.|morph\.|var\.|nothovar\.|f\.|nothosubsp\.|pv\.)"
    )
    .unwrap();
}

const RANK_SPAN: &str = r#"<span class="rank-name">${1}</span>"#;

#[derive(Debug, Clone, Copy)]
pub struct RowFormatter {
    pub show_vernacular: bool,
}

impl Default for RowFormatter {
    fn default() -> Self {
        Self {
            show_vernacular: true,
        }
    }
}

impl RowFormatter {
    pub fn new(show_vernacular: bool) -> Self {
        Self { show_vernacular }
    }

    /// Render one row; vernacular-matched rows lead with the vernacular name
    pub fn format(&self, row: &ResultRow) -> String {
        let mut markup = String::new();

        if self.show_vernacular && row.vernacular_matched {
            markup.push_str(&format!("<q><b>{}</b></q> ", row.vernacular));
        }

        markup.push_str(&format!(
            r#"<span class="italictaxon">{}{}</span> <span class="taxauthority">{}</span>"#,
            display_name(&row.uname),
            qualifier_markup(&row.qualifier),
            row.authority
        ));

        if self.show_vernacular && !row.vernacular_matched && !row.vernacular.is_empty() {
            markup.push_str(&format!(
                r#" <q class="taxon-vernacular"><b>{}</b></q>"#,
                row.vernacular
            ));
        }

        if let Some(accepted_name) = &row.accepted_name_string {
            let accepted_qualifier = row.accepted_qualifier.as_deref().unwrap_or_default();
            let accepted_qualifier = if accepted_qualifier.is_empty() {
                String::new()
            } else {
                format!(" <b>{}</b>", accepted_qualifier)
            };

            markup.push_str(&format!(
                r#"<span class="pref-taxon-name"> = <span class="italictaxon">{}{}</span> <span class="taxauthority">{}</span></span>"#,
                display_name(accepted_name),
                accepted_qualifier,
                row.accepted_authority.as_deref().unwrap_or_default()
            ));
        }

        markup
    }
}

/// `x` becomes `×` and rank tokens are wrapped for de-italicised display
fn display_name(name: &str) -> String {
    let name = HYBRID_WORD.replace_all(name, "×");
    RANK_DISPLAY_NAMES.replace_all(&name, RANK_SPAN).into_owned()
}

fn qualifier_markup(qualifier: &str) -> String {
    if qualifier.is_empty() {
        return String::new();
    }

    let class = if qualifier == "s.s." || qualifier == "s.l." {
        "taxon-qualifier-latin"
    } else {
        "taxon-qualifier"
    };

    format!(r#" <span class="{}">{}</span>"#, class, qualifier)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn row(uname: &str) -> ResultRow {
        ResultRow {
            entity_id: "t1".to_string(),
            qname: uname.to_string(),
            name: uname.to_string(),
            uname: uname.to_string(),
            authority: "L.".to_string(),
            ..ResultRow::default()
        }
    }

    #[test]
    fn test_plain_name() {
        let formatter = RowFormatter::default();
        assert_eq!(
            formatter.format(&row("Rosa canina")),
            r#"<span class="italictaxon">Rosa canina</span> <span class="taxauthority">L.</span>"#
        );
    }

    #[test]
    fn test_hybrid_and_rank_markup() {
        let formatter = RowFormatter::default();
        let mut hybrid = row("Salix x rubens var. basfordiana");
        hybrid.qualifier = "s.l.".to_string();

        assert_eq!(
            formatter.format(&hybrid),
            concat!(
                r#"<span class="italictaxon">Salix × rubens <span class="rank-name">var.</span> basfordiana"#,
                r#" <span class="taxon-qualifier-latin">s.l.</span></span> <span class="taxauthority">L.</span>"#
            )
        );
    }

    #[test]
    fn test_vernacular_placement() {
        let formatter = RowFormatter::default();
        let mut dog_rose = row("Rosa canina");
        dog_rose.vernacular = "Dog-rose".to_string();

        assert!(formatter
            .format(&dog_rose)
            .ends_with(r#" <q class="taxon-vernacular"><b>Dog-rose</b></q>"#));

        dog_rose.vernacular_matched = true;
        assert!(formatter
            .format(&dog_rose)
            .starts_with("<q><b>Dog-rose</b></q> <span class=\"italictaxon\">"));

        let hidden = RowFormatter::new(false);
        assert!(!hidden.format(&dog_rose).contains("Dog-rose"));
    }

    #[test]
    fn test_synonym_shows_accepted_name() {
        let formatter = RowFormatter::default();
        let mut synonym = row("Rosa lutetiana");
        synonym.accepted_entity_id = Some("t0".to_string());
        synonym.accepted_name_string = Some("Rosa x canina".to_string());
        synonym.accepted_qualifier = Some("agg.".to_string());
        synonym.accepted_authority = Some("L.".to_string());
        synonym.accepted_qname = Some("Rosa x canina agg.".to_string());

        assert!(formatter.format(&synonym).ends_with(concat!(
            r#"<span class="pref-taxon-name"> = <span class="italictaxon">Rosa × canina <b>agg.</b></span>"#,
            r#" <span class="taxauthority">L.</span></span>"#
        )));
    }
}
