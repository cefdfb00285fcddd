//! Sparse TF-IDF index over each product's `combined_text`.
//!
//! # Build
//!
//! 1. Analyze every document (tokenize, drop stop words, add n-grams).
//! 2. Count document frequency and corpus frequency per term.
//! 3. Drop terms with `df < min_df`.
//! 4. Keep the `max_features` most frequent terms (ties: first seen wins).
//! 5. Weight: `tf × (ln((1 + n) / (1 + df)) + 1)`, then L2-normalize each row.
//!
//! Neighbor queries are brute-force cosine similarity over all rows.

use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

use tracing::{info, warn};

use crate::catalogue::CatalogueSnapshot;
use crate::error::{RecsError, Result};
use crate::text::{Analyzer, StopWords};

/// Index construction parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct TextIndexParams {
    /// Vocabulary cap (`TFIDF_MAX_FEATURES`).
    pub max_features: usize,
    /// Minimum number of documents a term must occur in (`TFIDF_MIN_DF`).
    pub min_df: usize,
    /// Longest word n-gram indexed.
    pub ngram_max: usize,
    pub stop_words: StopWords,
}

impl Default for TextIndexParams {
    fn default() -> Self {
        Self {
            max_features: 20_000,
            min_df: 2,
            ngram_max: 2,
            stop_words: StopWords::English,
        }
    }
}

impl TextIndexParams {
    pub fn validate(&self) -> Result<()> {
        if self.max_features == 0 {
            return Err(RecsError::Config("max_features must be >= 1".to_string()));
        }
        if self.min_df == 0 {
            return Err(RecsError::Config("min_df must be >= 1".to_string()));
        }
        if !(1..=3).contains(&self.ngram_max) {
            return Err(RecsError::Config("ngram_max must be in 1..=3".to_string()));
        }
        Ok(())
    }
}

/// Term-weight vector with entries sorted by term id.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SparseVector {
    entries: Vec<(usize, f64)>,
}

impl SparseVector {
    /// Build from `(term_id, weight)` pairs; zero weights are dropped and
    /// duplicate ids are summed.
    pub fn from_pairs(pairs: impl IntoIterator<Item = (usize, f64)>) -> Self {
        let mut entries: Vec<(usize, f64)> = pairs.into_iter().filter(|(_, w)| *w != 0.0).collect();
        entries.sort_by_key(|(t, _)| *t);
        entries.dedup_by(|next, prev| {
            if next.0 == prev.0 {
                prev.1 += next.1;
                true
            } else {
                false
            }
        });
        Self { entries }
    }

    fn nnz(&self) -> usize {
        self.entries.len()
    }

    pub fn norm(&self) -> f64 {
        self.entries.iter().map(|(_, w)| w * w).sum::<f64>().sqrt()
    }

    fn dot(&self, other: &SparseVector) -> f64 {
        let (mut i, mut j) = (0, 0);
        let (a, b) = (&self.entries, &other.entries);
        let mut dot = 0.0;
        while i < a.len() && j < b.len() {
            match a[i].0.cmp(&b[j].0) {
                Ordering::Less => i += 1,
                Ordering::Greater => j += 1,
                Ordering::Equal => {
                    dot += a[i].1 * b[j].1;
                    i += 1;
                    j += 1;
                }
            }
        }
        dot
    }
}

/// Cosine similarity of two non-negative term-weight vectors, in `[0, 1]`.
///
/// Returns `0.0` when either vector has zero norm.
pub fn similarity(a: &SparseVector, b: &SparseVector) -> f64 {
    let denom = a.norm() * b.norm();
    if denom < f64::EPSILON {
        return 0.0;
    }
    (a.dot(b) / denom).clamp(0.0, 1.0)
}

#[derive(Debug)]
struct TermStats {
    df: usize,
    tf: usize,
    first_seen: usize,
}

/// Read-only TF-IDF index, one row per catalogue product.
#[derive(Debug, Clone)]
pub struct TextIndex {
    vocabulary: Vec<String>,
    idf: Vec<f64>,
    rows: Vec<SparseVector>,
}

impl TextIndex {
    /// Build the index over every product in `snapshot`.
    pub fn build(snapshot: &CatalogueSnapshot, params: &TextIndexParams) -> Result<Self> {
        params.validate()?;
        let analyzer = Analyzer::new(&params.stop_words, params.ngram_max);

        let docs: Vec<Vec<String>> = snapshot
            .iter()
            .map(|p| analyzer.analyze(p.combined_text()))
            .collect();

        let mut stats: HashMap<&str, TermStats> = HashMap::new();
        let mut seen = 0usize;
        for terms in &docs {
            let mut in_doc: HashSet<&str> = HashSet::new();
            for term in terms {
                let entry = stats.entry(term.as_str()).or_insert_with(|| {
                    seen += 1;
                    TermStats {
                        df: 0,
                        tf: 0,
                        first_seen: seen,
                    }
                });
                entry.tf += 1;
                if in_doc.insert(term.as_str()) {
                    entry.df += 1;
                }
            }
        }

        let mut kept: Vec<(&str, TermStats)> = stats
            .into_iter()
            .filter(|(_, s)| s.df >= params.min_df)
            .collect();
        kept.sort_by(|a, b| b.1.tf.cmp(&a.1.tf).then(a.1.first_seen.cmp(&b.1.first_seen)));
        kept.truncate(params.max_features);
        kept.sort_by_key(|(_, s)| s.first_seen);

        let n_docs = docs.len() as f64;
        let mut term_ids: HashMap<&str, usize> = HashMap::with_capacity(kept.len());
        let mut vocabulary = Vec::with_capacity(kept.len());
        let mut idf = Vec::with_capacity(kept.len());
        for (id, (term, s)) in kept.iter().enumerate() {
            term_ids.insert(*term, id);
            vocabulary.push(term.to_string());
            idf.push(((1.0 + n_docs) / (1.0 + s.df as f64)).ln() + 1.0);
        }

        if vocabulary.is_empty() {
            warn!(
                min_df = params.min_df,
                "no terms survived pruning; all text similarities will be 0"
            );
        }

        let rows: Vec<SparseVector> = docs
            .iter()
            .map(|terms| {
                let raw = SparseVector::from_pairs(
                    terms
                        .iter()
                        .filter_map(|t| term_ids.get(t.as_str()).map(|&id| (id, idf[id]))),
                );
                let norm = raw.norm();
                if norm < f64::EPSILON {
                    raw
                } else {
                    SparseVector::from_pairs(raw.entries.iter().map(|&(t, w)| (t, w / norm)))
                }
            })
            .collect();

        info!(
            documents = rows.len(),
            vocabulary = vocabulary.len(),
            "text index built"
        );

        Ok(Self {
            vocabulary,
            idf,
            rows,
        })
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn vocabulary_size(&self) -> usize {
        self.vocabulary.len()
    }

    pub fn vocabulary(&self) -> &[String] {
        &self.vocabulary
    }

    /// The L2-normalized row for `product_id`.
    pub fn vector(&self, product_id: usize) -> Option<&SparseVector> {
        self.rows.get(product_id)
    }

    /// Mean number of non-zero terms per product.
    pub fn mean_terms_per_product(&self) -> f64 {
        if self.rows.is_empty() {
            return 0.0;
        }
        self.rows.iter().map(SparseVector::nnz).sum::<usize>() as f64 / self.rows.len() as f64
    }

    /// The `k` most similar other products to `product_id`.
    ///
    /// Ordered by similarity descending, ties by ascending id. The query
    /// product itself is never included.
    pub fn neighbors(&self, product_id: usize, k: usize) -> Result<Vec<(usize, f64)>> {
        let query = self.vector(product_id).ok_or_else(|| {
            RecsError::NotFound(format!("product id {} is not indexed", product_id))
        })?;

        let mut scored: Vec<(usize, f64)> = self
            .rows
            .iter()
            .enumerate()
            .filter(|(id, _)| *id != product_id)
            .map(|(id, row)| (id, similarity(query, row)))
            .collect();

        scored.sort_by(|a, b| b.1.total_cmp(&a.1).then(a.0.cmp(&b.0)));
        scored.truncate(k);
        Ok(scored)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalogue::{load, tests::table};

    fn params(min_df: usize, max_features: usize) -> TextIndexParams {
        TextIndexParams {
            max_features,
            min_df,
            ngram_max: 1,
            stop_words: StopWords::English,
        }
    }

    fn idf_of(index: &TextIndex, term: &str) -> f64 {
        let pos = index.vocabulary.iter().position(|t| t == term).unwrap();
        index.idf[pos]
    }

    fn sample() -> CatalogueSnapshot {
        load(&table(&[
            ("Red Nail Polish", "OPI", "Nails", "polish red", "Glossy red nail polish", "4", "100"),
            ("Pink Nail Polish", "OPI", "Nails", "polish pink", "Glossy pink nail polish", "4", "50"),
            ("Hair Shampoo", "Dove", "Hair", "shampoo", "Gentle daily shampoo", "3", "10"),
            ("Volume Shampoo", "Dove", "Hair", "shampoo volume", "Shampoo for volume", "5", "0"),
        ]))
        .unwrap()
    }

    #[test]
    fn test_similarity_identical() {
        let v = SparseVector::from_pairs([(0, 1.0), (3, 2.0)]);
        assert!((similarity(&v, &v) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_similarity_disjoint() {
        let a = SparseVector::from_pairs([(0, 1.0)]);
        let b = SparseVector::from_pairs([(1, 1.0)]);
        assert_eq!(similarity(&a, &b), 0.0);
    }

    #[test]
    fn test_similarity_zero_norm() {
        let a = SparseVector::default();
        let b = SparseVector::from_pairs([(1, 1.0)]);
        assert_eq!(similarity(&a, &b), 0.0);
        assert_eq!(similarity(&a, &a), 0.0);
    }

    #[test]
    fn test_from_pairs_sums_duplicates() {
        let v = SparseVector::from_pairs([(2, 1.0), (0, 0.0), (2, 2.0), (1, 1.0)]);
        assert_eq!(v.entries.as_slice(), &[(1usize, 1.0), (2usize, 3.0)][..]);
    }

    #[test]
    fn test_rows_are_unit_length() {
        let index = TextIndex::build(&sample(), &params(1, 100)).unwrap();
        for id in 0..index.len() {
            let norm = index.vector(id).unwrap().norm();
            assert!((norm - 1.0).abs() < 1e-9, "row {} norm {}", id, norm);
        }
    }

    #[test]
    fn test_min_df_prunes_rare_terms() {
        let index = TextIndex::build(&sample(), &params(2, 100)).unwrap();
        assert!(index.vocabulary().iter().any(|t| t == "shampoo"));
        assert!(!index.vocabulary().iter().any(|t| t == "gentle"));
    }

    #[test]
    fn test_max_features_keeps_most_frequent() {
        let index = TextIndex::build(&sample(), &params(1, 2)).unwrap();
        let mut vocab = index.vocabulary().to_vec();
        vocab.sort();
        assert_eq!(vocab, vec!["polish".to_string(), "shampoo".to_string()]);
    }

    #[test]
    fn test_max_features_tie_keeps_first_seen() {
        let snapshot = load(&table(&[
            ("Zeta Alpha", "", "", "", "", "", ""),
            ("Alpha Zeta", "", "", "", "", "", ""),
        ]))
        .unwrap();
        let p = TextIndexParams {
            max_features: 1,
            min_df: 1,
            ngram_max: 1,
            stop_words: StopWords::None,
        };
        let index = TextIndex::build(&snapshot, &p).unwrap();
        assert_eq!(index.vocabulary(), &["zeta".to_string()][..]);
    }

    #[test]
    fn test_idf_rarer_terms_weigh_more() {
        let index = TextIndex::build(&sample(), &params(1, 100)).unwrap();
        let common = idf_of(&index, "nails");
        let rare = idf_of(&index, "gentle");
        assert!(rare > common);
        assert!((rare - ((5.0f64 / 2.0).ln() + 1.0)).abs() < 1e-9);
    }

    #[test]
    fn test_neighbors_prefers_same_kind() {
        let index = TextIndex::build(&sample(), &params(1, 100)).unwrap();
        let n = index.neighbors(0, 3).unwrap();
        assert_eq!(n.len(), 3);
        assert_eq!(n[0].0, 1);
        assert!(n.iter().all(|(id, _)| *id != 0));
        assert!(n.windows(2).all(|w| w[0].1 >= w[1].1));
    }

    #[test]
    fn test_neighbors_ties_by_id() {
        let index = TextIndex::build(&sample(), &params(1, 100)).unwrap();
        let n = index.neighbors(0, 10).unwrap();
        // Products 2 and 3 share nothing with product 0.
        assert_eq!(&n[1..], &[(2usize, 0.0), (3usize, 0.0)][..]);
    }

    #[test]
    fn test_neighbors_unknown_id() {
        let index = TextIndex::build(&sample(), &params(1, 100)).unwrap();
        assert!(matches!(index.neighbors(99, 3), Err(RecsError::NotFound(_))));
    }

    #[test]
    fn test_empty_vocabulary_is_not_fatal() {
        let index = TextIndex::build(&sample(), &params(10, 100)).unwrap();
        assert_eq!(index.vocabulary_size(), 0);
        let n = index.neighbors(0, 2).unwrap();
        assert_eq!(n, vec![(1usize, 0.0), (2usize, 0.0)]);
    }

    #[test]
    fn test_invalid_params() {
        let mut p = params(1, 100);
        p.ngram_max = 0;
        assert!(matches!(p.validate(), Err(RecsError::Config(_))));
        let p = params(0, 100);
        assert!(matches!(p.validate(), Err(RecsError::Config(_))));
    }
}
