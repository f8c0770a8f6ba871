//! Match pattern construction for taxon name lookups
//!
//! Hybrid names are matched regardless of epithet order by expanding the
//! `x`-joined epithets of a query into every ordering. Abbreviated genus
//! queries (`R. canina`) get a loose inclusion pattern plus a stricter one
//! used only to rank matches as near rather than vague.

use crate::Result;
use lazy_static::lazy_static;
use regex::{Regex, RegexBuilder};

/// Compiled program budget for name patterns; hybrid alternations grow as n!
pub const PATTERN_SIZE_LIMIT: usize = 256 * (1 << 20);

/// Joins consecutive epithets; tolerates an unfinished epithet before the `x`
const HYBRID_CONNECTOR: &str = "[a-zA-Z]* x ";

lazy_static! {
    static ref HYBRID_SEPARATOR: Regex = Regex::new(r"(?i)\s+x\s+").unwrap();
}

/// Loose/strict pattern pair for an abbreviated genus query
#[derive(Debug, Clone)]
pub struct GenusPatterns {
    /// Inclusion test against canonical names
    pub loose: Regex,
    /// Ranking test against the name string
    pub near: Regex,
}

#[derive(Debug, Default, Clone, Copy)]
pub struct PatternBuilder;

impl PatternBuilder {
    /// Regex source matching the `x`-joined epithets of `names` in any order
    ///
    /// `"carex x nigra"` becomes `(?:carex[a-zA-Z]* x nigra|nigra[a-zA-Z]* x carex)`;
    /// a single term is returned escaped and unchanged.
    pub fn hybrid_combinations(names: &str) -> String {
        let escaped = regex::escape(names);
        let parts: Vec<&str> = HYBRID_SEPARATOR.split(&escaped).collect();

        if parts.len() < 2 {
            return parts.first().map(|p| p.to_string()).unwrap_or_default();
        }

        let mut permutations = Vec::new();
        permute(&parts, Vec::new(), &mut permutations);

        tracing::trace!(
            "{} hybrid epithets, {} orderings",
            parts.len(),
            permutations.len()
        );
        format!("(?:{})", permutations.join("|"))
    }

    /// Patterns for `<letter>. <remainder>` queries
    ///
    /// A genus letter of `X` may be either a genus starting with X or the
    /// hybrid-genus marker, so both readings are accepted and there is no
    /// separate near pattern.
    pub fn abbreviated_genus(genus_letter: &str, remainder: &str) -> Result<GenusPatterns> {
        let hybrid = Self::hybrid_combinations(remainder);

        if genus_letter.eq_ignore_ascii_case("x") {
            let pattern = compile(&format!(r"(?i)^(X\s|X[a-z]+\s+)(x )?\b{}.*", hybrid))?;
            tracing::trace!("hybrid genus pattern {}", pattern);

            return Ok(GenusPatterns {
                loose: pattern.clone(),
                near: pattern,
            });
        }

        let letter = regex::escape(genus_letter);
        let loose = compile(&format!(
            r"(?i)^(X )?{}[a-z]+ (x )?.*\b{}.*",
            letter, hybrid
        ))?;
        let near = compile(&format!(r"(?i)^(X )?{}[a-z]+ (x )?\b{}.*", letter, hybrid))?;
        tracing::trace!("abbreviated genus patterns {} / {}", loose, near);

        Ok(GenusPatterns { loose, near })
    }

    /// Inclusion pattern for a full (unabbreviated) normalized query
    ///
    /// The first token is the genus; hybrids written `Genus x epithet` and
    /// `Genus epithet` are treated as equivalent.
    pub fn canonical_prefix(taxon_string: &str) -> Result<Regex> {
        let source = match taxon_string.split_once(' ') {
            Some((genus, rest)) => format!(
                r"(?i)^(?:X\s+)?{} (x )?.*\b{}.*",
                regex::escape(genus),
                Self::hybrid_combinations(rest)
            ),
            None => format!(r"(?i)^(?:X\s+)?{}.*", regex::escape(taxon_string)),
        };

        compile(&source)
    }

    /// Like [`canonical_prefix`](Self::canonical_prefix) without the wildcard
    /// after the genus; ranks matches as near
    pub fn near_prefix(taxon_string: &str) -> Result<Regex> {
        let source = match taxon_string.split_once(' ') {
            Some((genus, rest)) => format!(
                r"(?i)^(?:X\s+)?{} (x )?\b{}.*",
                regex::escape(genus),
                Self::hybrid_combinations(rest)
            ),
            // single-token near matches are case sensitive
            None => format!(r"^{}.*", regex::escape(taxon_string)),
        };

        compile(&source)
    }

    /// Anchored vernacular pattern built from the raw (un-normalized) query
    pub fn vernacular_prefix(raw_query: &str) -> Result<Regex> {
        compile(&format!("(?i)^{}.*", Self::space_tolerant(raw_query)))
    }

    /// Unanchored word-start pattern used by the broad fallback pass
    pub fn broad(text: &str) -> Result<Regex> {
        compile(&format!(r"(?i)\b{}.*", Self::space_tolerant(text)))
    }

    /// Escape `text`, letting spaces and hyphens between letters match any run
    /// of spaces or hyphens (including none), so `dog rose` finds `Dog-rose`
    pub fn space_tolerant(text: &str) -> String {
        let chars: Vec<char> = text.chars().collect();
        let mut pattern = String::with_capacity(text.len() * 2);
        let mut i = 0;

        while i < chars.len() {
            if is_joiner(chars[i]) {
                let start = i;
                while i < chars.len() && is_joiner(chars[i]) {
                    i += 1;
                }

                let between_letters = start > 0
                    && chars[start - 1].is_alphabetic()
                    && i < chars.len()
                    && chars[i].is_alphabetic();

                if between_letters {
                    pattern.push_str(r"[\s-]*");
                } else {
                    for c in &chars[start..i] {
                        pattern.push_str(&regex::escape(c.encode_utf8(&mut [0; 4])));
                    }
                }
            } else {
                pattern.push_str(&regex::escape(chars[i].encode_utf8(&mut [0; 4])));
                i += 1;
            }
        }

        pattern
    }
}

fn compile(source: &str) -> Result<Regex> {
    Ok(RegexBuilder::new(source)
        .size_limit(PATTERN_SIZE_LIMIT)
        .build()?)
}

fn is_joiner(c: char) -> bool {
    c.is_whitespace() || c == '-'
}

/// Prepend each remaining item in turn, last index first, until none remain
fn permute(items: &[&str], perms: Vec<&str>, out: &mut Vec<String>) {
    if items.is_empty() {
        out.push(perms.join(HYBRID_CONNECTOR));
        return;
    }

    for i in (0..items.len()).rev() {
        let mut remaining = items.to_vec();
        let item = remaining.remove(i);

        let mut next = Vec::with_capacity(perms.len() + 1);
        next.push(item);
        next.extend_from_slice(&perms);

        permute(&remaining, next, out);
    }
}
