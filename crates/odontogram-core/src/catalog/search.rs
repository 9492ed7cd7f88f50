//! Label search for the diagnosis toolbar.
//!
//! Exact substring hits on label or id rank first; remaining definitions are
//! scored with a blend of Jaro-Winkler and normalized Levenshtein so typos
//! like "extracton" still find "Extraction".

use strsim::{jaro_winkler, normalized_levenshtein};

use crate::models::TreatmentDefinition;

use super::TreatmentCatalog;

/// Minimum similarity for a fuzzy hit.
const MIN_SIMILARITY: f64 = 0.80;

/// A search hit with its similarity score (1.0 for substring matches).
#[derive(Debug, Clone, PartialEq)]
pub struct SearchHit<'a> {
    pub definition: &'a TreatmentDefinition,
    pub score: f64,
}

impl TreatmentCatalog {
    /// Search definitions by label.
    ///
    /// An empty query returns every definition in catalog order.
    pub fn search(&self, query: &str) -> Vec<SearchHit<'_>> {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return self
                .definitions()
                .iter()
                .map(|definition| SearchHit { definition, score: 1.0 })
                .collect();
        }

        let mut hits: Vec<SearchHit<'_>> = self
            .definitions()
            .iter()
            .filter_map(|definition| {
                let score = score_definition(definition, &query);
                (score >= MIN_SIMILARITY).then_some(SearchHit { definition, score })
            })
            .collect();

        // Stable sort keeps catalog order among equal scores
        hits.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        hits
    }
}

fn score_definition(definition: &TreatmentDefinition, query: &str) -> f64 {
    let label = definition.label.to_lowercase();
    if label.contains(query) || definition.id.contains(query) {
        return 1.0;
    }

    // Compare against the whole label and each word of it
    std::iter::once(label.as_str())
        .chain(label.split_whitespace())
        .chain(std::iter::once(definition.id.as_str()))
        .map(|candidate| fuzzy_match(query, candidate))
        .fold(0.0, f64::max)
}

fn fuzzy_match(a: &str, b: &str) -> f64 {
    // Jaro-Winkler favours shared prefixes, Levenshtein overall edit distance
    let jw = jaro_winkler(a, b);
    let lev = normalized_levenshtein(a, b);

    jw * 0.6 + lev * 0.4
}
