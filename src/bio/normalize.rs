//! Taxon name normalization
//!
//! Canonicalizes raw names and queries so that hybrid markers, rank
//! abbreviations and informal qualifiers compare equal however they were typed:
//!
//! 1. hybrid symbols become a space-delimited `x`, whitespace is collapsed
//! 2. rank abbreviations are rewritten to canonical tokens (`var.`, `subsp.`, ...)
//! 3. qualifier phrases are rewritten (`sens. lat.` -> `s.l.`, `aggregate` -> `agg.`, ...)
//!
//! Each table entry rewrites its first match only and entries run in table
//! order, so later rules see the output of earlier ones. Stages 2 and 3 repeat
//! until the text stops changing, which makes `normalize` idempotent.

use lazy_static::lazy_static;
use regex::Regex;

/// Minimum pass budget; real names settle in one or two passes, and chains of
/// trailing deletions (`sp. sp. sp.`) need at most one pass per character
const MIN_PASS_BUDGET: usize = 8;

/// One ordered rewrite: first match of `pattern` becomes `replacement`
#[derive(Debug)]
pub struct RewriteRule {
    pub pattern: Regex,
    pub replacement: &'static str,
}

impl RewriteRule {
    fn new(pattern: &str, replacement: &'static str) -> Self {
        Self {
            pattern: Regex::new(pattern).unwrap(),
            replacement,
        }
    }

    fn apply(&self, text: &str) -> String {
        self.pattern
            .replacen(text, 1, self.replacement)
            .into_owned()
    }
}

lazy_static! {
    static ref HYBRID_MARKER: Regex = Regex::new("[×✕]").unwrap();
    static ref WHITESPACE: Regex = Regex::new(r"\s+").unwrap();

    /// Rank abbreviations, in application order
    pub static ref RANK_RULES: Vec<RewriteRule> = vec![
        RewriteRule::new(r"(?i)\s+sub-?g(?:en(?:us)?)?[.\s]+", " subg. "),
        RewriteRule::new(r"(?i)\s+sect(?:ion)?[.\s]+", " sect. "),
        RewriteRule::new(r"(?i)\s+subsect(?:ion)?[.\s]+", " subsect. "),
        RewriteRule::new(r"(?i)\s+ser(?:ies)?[.\s]+", " ser. "),
        RewriteRule::new(r"(?i)\s+gp[.\s]+", " group "),
        RewriteRule::new(r"(?i)\s+s(?:ub)?-?sp(?:ecies)?[.\s]+", " subsp. "),
        RewriteRule::new(r"(?i)\s+morphotype\s+", " morph. "),
        RewriteRule::new(r"(?i)\s+var[.\s]+", " var. "),
        // cultivar epithets are conventionally quoted, the rank token is kept for matching
        RewriteRule::new(r"(?i)\s+cv[.\s]+", " cv. "),
        RewriteRule::new(r"(?i)\s+n(?:otho)?v(?:ar)?[.\s]+", " nothovar. "),
        RewriteRule::new(r"(?i)\s+f[.\s]+|\s+forma?\s+", " f. "),
        RewriteRule::new(r"(?i)\s+n(?:otho)?ssp[.\s]+", " nothosubsp. "),
    ];

    /// Informal qualifiers, in application order
    pub static ref QUALIFIER_RULES: Vec<RewriteRule> = vec![
        // (f x m or m x f) is the default cross so no explicit qualifier is kept
        RewriteRule::new(r"(?i)\s*\(?\bf\s*x\s*m or m\s*x\s*f\)?\s*$", " "),
        RewriteRule::new(r"(?i)\s*\(?\bm\s*x\s*f or f\s*x\s*m\)?\s*$", " "),
        RewriteRule::new(r"(?i)\s*\(?\bf\s*x\s*m\)?\s*$", " (f x m)"),
        RewriteRule::new(r"(?i)\s*\(?\bm\s*x\s*f\)?\s*$", " (m x f)"),
        RewriteRule::new(r"(?i)\s*\(?\bfemale\s*x\s*male\)?\s*$", " (f x m)"),
        RewriteRule::new(r"(?i)\s*\(?\bmale\s*x\s*female\)?\s*$", " (m x f)"),
        // stand-alone sex qualifier (e.g. Petasites hybridus), quotes dropped
        RewriteRule::new(r"(?i)\s*'male'\s*$", " male"),
        RewriteRule::new(r"(?i)\s*'female'\s*$", " female"),

        // mid-string sensu lato / stricto
        RewriteRule::new(r"(?i)\b\s*sens\.?\s*lat[.\s]+", " s.l. "),
        RewriteRule::new(r"(?i)\b\s*s\.\s*lat\.?\s*\b", " s.l. "),
        RewriteRule::new(r"(?i)\b\s*s\.?\s*l\.?\s+\b", " s.l. "),
        RewriteRule::new(r"(?i)\b\s*sensu\s*lato\s+\b|\(\s*sensu\s*lato\s*\)", " s.l. "),
        RewriteRule::new(r"(?i)\b\s*sensu\s*stricto\s+\b|\(\s*sensu\s*stricto\s*\)", " s.s. "),
        RewriteRule::new(r"(?i)\b\s*sens\.?\s*strict[.\s]+", " s.s. "),
        // a closing paren is kept in place ('\b' can't separate '.' and ')')
        RewriteRule::new(r"(?i)\b\s*sens\.?\s*str\.?\s*(\))|\b\s*sens\.?\s*str[.\s]+", " s.s. ${1}"),
        RewriteRule::new(r"(?i)\b\s*s\.\s*str[.\s]+", " s.s. "),
        RewriteRule::new(r"(?i)\b\s*s\.?\s*s\.?\s+\b", " s.s. "),

        // end-of-string sensu lato / stricto
        RewriteRule::new(r"(?i)\b\s*sens\.?\s*lat\.?\s*$", " s.l."),
        RewriteRule::new(r"(?i)\b\s*s\.\s*lat\.?\s*$", " s.l."),
        RewriteRule::new(r"(?i)\b\s*s\.?\s*l\.?\s*$", " s.l."),
        RewriteRule::new(r"(?i)\b\s*sensu\s*lato\s*$", " s.l."),
        RewriteRule::new(r"(?i)\b\s*sensu\s*stricto\s*$", " s.s."),
        RewriteRule::new(r"(?i)\b\s*sens\.?\s*strict\.?\s*$", " s.s."),
        RewriteRule::new(r"(?i)\b\s*sens\.?\s*str\.?\s*$", " s.s."),
        RewriteRule::new(r"(?i)\b\s*s\.\s*str\.?\s*$", " s.s."),
        RewriteRule::new(r"(?i)\b\s*s\.?\s*s\.?\s*$", " s.s."),

        RewriteRule::new(r"(?i)\b\s*agg\.?\s*$", " agg."),
        RewriteRule::new(r"(?i)\b\s*aggregate\s*$", " agg."),

        RewriteRule::new(r"(?i)\b\s*sp\.?\s*cultivar\s*$", " cv. "),
        RewriteRule::new(r"(?i)\b\s*sp\.?\s*cv\.?\s*$", " cv. "),
        RewriteRule::new(r"(?i)\b\s*cultivars?\s*$", " cv. "),
        RewriteRule::new(r"(?i)\b\s*cv\s+$", " cv. "),
        RewriteRule::new(r"(?i)\b\s*cv$", " cv. "),

        RewriteRule::new(r"(?i)\b\s*cf\s*$", " cf."),
        RewriteRule::new(r"(?i)\b\s*aff\s*$", " aff."),
        RewriteRule::new(r"(?i)\b\s*s\.?n\.?\s*$", " sp.nov."),
        RewriteRule::new(r"(?i)\b\s*sp\.?\s*nov\.?\s*$", " sp.nov."),
        RewriteRule::new(r"(?i)\b\s*auct[.\s]*$", " auct."),
        RewriteRule::new(r"(?i)\b\s*ined[.\s]*$", " ined."),
        RewriteRule::new(r"(?i)\b\s*nom\.?\snud[.\s]*$", " nom. nud."),
        RewriteRule::new(r"(?i)\b\s*p\.p[.\s?]*$", " pro parte"),

        RewriteRule::new(r"(?i)\b\s*spp?\.?[\s?]*$", ""),
        RewriteRule::new(r"(?i)\b\s*species\s*$", ""),
        // e.g. "Ulmus sp. (excluding Ulmus glabra)"
        RewriteRule::new(r"(?i)\b\s*spp?\.?\s*\(", " ("),
        RewriteRule::new(r"(?i)\b\s*species\s*\(", " ("),
    ];
}

/// Ordered rewrite pipeline over the rank and qualifier tables
#[derive(Debug, Clone, Copy)]
pub struct NameNormalizer {
    rank_rules: &'static [RewriteRule],
    qualifier_rules: &'static [RewriteRule],
}

impl Default for NameNormalizer {
    fn default() -> Self {
        Self {
            rank_rules: RANK_RULES.as_slice(),
            qualifier_rules: QUALIFIER_RULES.as_slice(),
        }
    }
}

impl NameNormalizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Normalize a raw name or query string
    pub fn normalize(&self, raw: &str) -> String {
        let mut text = collapse_whitespace(&HYBRID_MARKER.replace_all(raw, " x "));

        let budget = MIN_PASS_BUDGET.max(text.len());
        for _ in 0..budget {
            let rewritten = self.rewrite_pass(&text);
            if rewritten == text {
                return text;
            }
            text = rewritten;
        }

        tracing::warn!("Normalization of {:?} did not settle", raw);
        text
    }

    fn rewrite_pass(&self, text: &str) -> String {
        let mut text = text.to_string();

        for rule in self.rank_rules {
            text = rule.apply(&text);
        }

        for rule in self.qualifier_rules {
            text = rule.apply(&text);
        }

        collapse_whitespace(&text)
    }
}

fn collapse_whitespace(text: &str) -> String {
    WHITESPACE.replace_all(text, " ").trim().to_string()
}

/// Normalize with the default rule tables
pub fn normalize_taxon_name(raw: &str) -> String {
    NameNormalizer::default().normalize(raw)
}
