//! Query resolution: map free text to a catalogue product.
//!
//! Stages, first hit wins:
//!
//! 1. **Exact** — case-insensitive equality with the product name.
//! 2. **Substring** — the query is contained in the name; first in catalogue order.
//! 3. **Fuzzy** — best [`fuzzy::ratio`] over all names, accepted when it
//!    reaches `fuzzy_threshold`; ties go to the earlier product.
//!
//! Products sharing a normalized name are represented by the first one.

use std::collections::HashSet;

use serde::Serialize;
use tracing::debug;

use crate::catalogue::CatalogueSnapshot;
use crate::error::{RecsError, Result};
use crate::fuzzy;

/// Thresholds for fuzzy resolution, suggestions, and autocomplete.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolverParams {
    /// Minimum fuzzy ratio accepted by [`QueryResolver::resolve`].
    pub fuzzy_threshold: f64,
    /// Minimum ratio for "did you mean" suggestions.
    pub suggestion_cutoff: f64,
    /// Minimum score for autocomplete entries.
    pub autocomplete_cutoff: f64,
}

impl Default for ResolverParams {
    fn default() -> Self {
        Self {
            fuzzy_threshold: 0.6,
            suggestion_cutoff: 0.6,
            autocomplete_cutoff: 0.4,
        }
    }
}

impl ResolverParams {
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("fuzzy_threshold", self.fuzzy_threshold),
            ("suggestion_cutoff", self.suggestion_cutoff),
            ("autocomplete_cutoff", self.autocomplete_cutoff),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(RecsError::Config(format!("{} must be in [0.0, 1.0]", name)));
            }
        }
        Ok(())
    }
}

/// Which resolver stage produced the match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchStage {
    Exact,
    Substring,
    Fuzzy,
}

impl std::fmt::Display for MatchStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            MatchStage::Exact => "exact",
            MatchStage::Substring => "substring",
            MatchStage::Fuzzy => "fuzzy",
        };
        f.write_str(s)
    }
}

/// A query resolved to one catalogue product.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedProduct {
    pub product_id: usize,
    pub name: String,
    pub stage: MatchStage,
    /// `1.0` for exact and substring matches, the fuzzy ratio otherwise.
    pub match_score: f64,
}

/// A ranked name candidate for "did you mean" or autocomplete.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NameSuggestion {
    pub product_id: usize,
    pub name: String,
    pub score: f64,
}

#[derive(Debug, Clone)]
struct NameEntry {
    product_id: usize,
    name: String,
    normalized: String,
}

/// Name lookup table built once per catalogue snapshot.
#[derive(Debug, Clone)]
pub struct QueryResolver {
    entries: Vec<NameEntry>,
    params: ResolverParams,
}

impl QueryResolver {
    pub fn build(snapshot: &CatalogueSnapshot, params: ResolverParams) -> Result<Self> {
        params.validate()?;
        let mut seen: HashSet<&str> = HashSet::new();
        let entries = snapshot
            .iter()
            .filter(|p| !p.normalized_name().is_empty())
            .filter(|p| seen.insert(p.normalized_name()))
            .map(|p| NameEntry {
                product_id: p.id,
                name: p.name.clone(),
                normalized: p.normalized_name().to_string(),
            })
            .collect();
        Ok(Self { entries, params })
    }

    /// Resolve `query` to a single product.
    ///
    /// Fails with [`RecsError::InvalidQuery`] for a blank query and
    /// [`RecsError::NotFound`] when no stage accepts a product.
    pub fn resolve(&self, query: &str) -> Result<ResolvedProduct> {
        let q = normalize_query(query)
            .ok_or_else(|| RecsError::InvalidQuery("query must not be empty".to_string()))?;

        let exact: Vec<&NameEntry> = self.entries.iter().filter(|e| e.normalized == q).collect();
        if let [entry] = exact.as_slice() {
            debug!(query = %q, product_id = entry.product_id, "resolved by exact match");
            return Ok(resolved(entry, MatchStage::Exact, 1.0));
        }

        if let Some(entry) = self.entries.iter().find(|e| e.normalized.contains(&q)) {
            debug!(query = %q, product_id = entry.product_id, "resolved by substring match");
            return Ok(resolved(entry, MatchStage::Substring, 1.0));
        }

        let mut best: Option<(&NameEntry, f64)> = None;
        for entry in &self.entries {
            let score = fuzzy::ratio(&q, &entry.normalized);
            if best.map_or(true, |(_, b)| score > b) {
                best = Some((entry, score));
            }
        }

        match best {
            Some((entry, score)) if score >= self.params.fuzzy_threshold => {
                debug!(query = %q, product_id = entry.product_id, score, "resolved by fuzzy match");
                Ok(resolved(entry, MatchStage::Fuzzy, score))
            }
            Some((_, score)) => {
                debug!(query = %q, best_score = score, "fuzzy match below threshold");
                Err(not_found(query))
            }
            None => Err(not_found(query)),
        }
    }

    /// "Did you mean" candidates: names whose [`fuzzy::ratio`] against the
    /// query reaches `suggestion_cutoff`, best first.
    pub fn suggest(&self, query: &str, limit: usize) -> Vec<NameSuggestion> {
        self.rank(query, limit, self.params.suggestion_cutoff, fuzzy::ratio)
    }

    /// Search-as-you-type candidates scored by the better of the full and
    /// partial ratio, with the looser `autocomplete_cutoff`.
    pub fn autocomplete(&self, query: &str, limit: usize) -> Vec<NameSuggestion> {
        self.rank(query, limit, self.params.autocomplete_cutoff, |q, name| {
            fuzzy::ratio(q, name).max(fuzzy::partial_ratio(q, name))
        })
    }

    fn rank(
        &self,
        query: &str,
        limit: usize,
        cutoff: f64,
        scorer: impl Fn(&str, &str) -> f64,
    ) -> Vec<NameSuggestion> {
        let q = match normalize_query(query) {
            Some(q) => q,
            None => return Vec::new(),
        };

        let mut ranked: Vec<NameSuggestion> = self
            .entries
            .iter()
            .filter_map(|e| {
                let score = scorer(q.as_str(), e.normalized.as_str());
                (score >= cutoff).then(|| NameSuggestion {
                    product_id: e.product_id,
                    name: e.name.clone(),
                    score,
                })
            })
            .collect();

        ranked.sort_by(|a, b| {
            b.score
                .total_cmp(&a.score)
                .then(a.product_id.cmp(&b.product_id))
        });
        ranked.truncate(limit);
        ranked
    }
}

fn normalize_query(query: &str) -> Option<String> {
    let q = query.trim().to_lowercase();
    (!q.is_empty()).then_some(q)
}

fn resolved(entry: &NameEntry, stage: MatchStage, match_score: f64) -> ResolvedProduct {
    ResolvedProduct {
        product_id: entry.product_id,
        name: entry.name.clone(),
        stage,
        match_score,
    }
}

fn not_found(query: &str) -> RecsError {
    RecsError::NotFound(format!("no product matches '{}'", query.trim()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalogue::{load, tests::table};

    fn resolver() -> QueryResolver {
        let snap = load(&table(&[
            ("OPI Infinite Shine", "OPI", "Nails", "", "", "4", "10"),
            ("OPI Infinite Shine Top Coat", "OPI", "Nails", "", "", "4", "10"),
            ("Lip Balm", "Burt's Bees", "Lips", "", "", "5", "100"),
            ("lip balm", "Other", "Lips", "", "", "3", "1"),
            ("Volume Shampoo", "Dove", "Hair", "", "", "3", "1"),
        ]))
        .unwrap();
        QueryResolver::build(&snap, ResolverParams::default()).unwrap()
    }

    #[test]
    fn test_exact_match_case_insensitive() {
        let r = resolver().resolve("  opi INFINITE shine ").unwrap();
        assert_eq!(r.product_id, 0);
        assert_eq!(r.stage, MatchStage::Exact);
    }

    #[test]
    fn test_exact_ignores_fuzzy_threshold() {
        let snap = load(&table(&[("Volume Shampoo", "", "", "", "", "", "")])).unwrap();
        let params = ResolverParams {
            fuzzy_threshold: 1.0,
            ..ResolverParams::default()
        };
        let r = QueryResolver::build(&snap, params)
            .unwrap()
            .resolve("volume shampoo")
            .unwrap();
        assert_eq!(r.stage, MatchStage::Exact);
    }

    #[test]
    fn test_duplicate_names_resolve_to_first() {
        let r = resolver().resolve("LIP BALM").unwrap();
        assert_eq!(r.product_id, 2);
        assert_eq!(r.stage, MatchStage::Exact);
    }

    #[test]
    fn test_substring_first_in_order() {
        let r = resolver().resolve("infinite").unwrap();
        assert_eq!(r.product_id, 0);
        assert_eq!(r.stage, MatchStage::Substring);

        let r = resolver().resolve("top coat").unwrap();
        assert_eq!(r.product_id, 1);
    }

    #[test]
    fn test_fuzzy_single_typo() {
        let r = resolver().resolve("Volume Shampo0").unwrap();
        assert_eq!(r.product_id, 4);
        assert_eq!(r.stage, MatchStage::Fuzzy);
        assert!(r.match_score >= 0.6);
    }

    #[test]
    fn test_unrelated_query_not_found() {
        let err = resolver().resolve("xqzzwv kkjjh").unwrap_err();
        assert!(matches!(err, RecsError::NotFound(_)));
    }

    #[test]
    fn test_blank_query_invalid() {
        assert!(matches!(resolver().resolve("   "), Err(RecsError::InvalidQuery(_))));
        assert!(matches!(resolver().resolve(""), Err(RecsError::InvalidQuery(_))));
    }

    #[test]
    fn test_fuzzy_tie_prefers_earlier_row() {
        let snap = load(&table(&[
            ("abcd", "", "", "", "", "", ""),
            ("abce", "", "", "", "", "", ""),
        ]))
        .unwrap();
        let r = QueryResolver::build(&snap, ResolverParams::default())
            .unwrap()
            .resolve("abcx")
            .unwrap();
        assert_eq!(r.product_id, 0);
        assert!((r.match_score - 0.75).abs() < 1e-9);
    }

    #[test]
    fn test_suggest_orders_and_dedupes() {
        let s = resolver().suggest("lip balms", 5);
        assert_eq!(s.len(), 1);
        assert_eq!(s[0].product_id, 2);
        assert!(resolver().suggest("", 5).is_empty());
    }

    #[test]
    fn test_autocomplete_prefix() {
        let s = resolver().autocomplete("opi inf", 10);
        let ids: Vec<usize> = s.iter().map(|n| n.product_id).collect();
        assert_eq!(&ids[..2], &[0usize, 1][..]);
        assert!(s.iter().all(|n| n.score >= 0.4));
    }

    #[test]
    fn test_invalid_threshold() {
        let p = ResolverParams {
            fuzzy_threshold: -0.1,
            ..ResolverParams::default()
        };
        assert!(matches!(p.validate(), Err(RecsError::Config(_))));
    }
}
