//! Blended ranking of text neighbors and popularity.
//!
//! # Algorithm
//!
//! 1. Clamp `top_n` to the catalogue size (`0` is rejected).
//! 2. Fetch `max(candidate_pool_size, top_n)` text neighbors of the resolved product.
//! 3. Score: `score = w × similarity + (1 − w) × popularity`.
//! 4. Sort by score (desc), product id (asc).
//! 5. Truncate to `top_n`.

use serde::Serialize;
use tracing::debug;

use crate::catalogue::CatalogueSnapshot;
use crate::error::{RecsError, Result};
use crate::popularity::PopularityScores;
use crate::resolver::ResolvedProduct;
use crate::text_index::TextIndex;

/// Ranking tunables.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RecommendParams {
    /// Weight of text similarity vs popularity (`SIMILARITY_WEIGHT`).
    pub similarity_weight: f64,
    /// Neighbors fetched before blending and truncation.
    pub candidate_pool_size: usize,
}

impl Default for RecommendParams {
    fn default() -> Self {
        Self {
            similarity_weight: 0.75,
            candidate_pool_size: 50,
        }
    }
}

impl RecommendParams {
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.similarity_weight) {
            return Err(RecsError::Config(
                "similarity_weight must be in [0.0, 1.0]".to_string(),
            ));
        }
        if self.candidate_pool_size == 0 {
            return Err(RecsError::Config(
                "candidate_pool_size must be >= 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// One ranked recommendation with display fields copied from the catalogue.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredProduct {
    pub product_id: usize,
    pub name: String,
    pub brand: String,
    pub image_url: Option<String>,
    pub rating: f64,
    pub review_count: u64,
    /// Cosine similarity to the resolved product, in `[0, 1]`.
    pub similarity: f64,
    /// Normalized popularity, in `[0, 1]`.
    pub popularity: f64,
    /// Blended score, in `[0, 1]`.
    pub score: f64,
}

/// Ranked output of one `recommend` call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecommendationResult {
    pub resolved: ResolvedProduct,
    pub items: Vec<ScoredProduct>,
}

impl RecommendationResult {
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// `weight × similarity + (1 − weight) × popularity`.
pub fn blend(similarity: f64, popularity: f64, weight: f64) -> f64 {
    weight * similarity + (1.0 - weight) * popularity
}

/// Rank neighbors of an already-resolved product.
///
/// All three inputs must come from the same catalogue snapshot.
pub fn rank(
    catalogue: &CatalogueSnapshot,
    index: &TextIndex,
    popularity: &PopularityScores,
    resolved: ResolvedProduct,
    top_n: usize,
    params: &RecommendParams,
) -> Result<RecommendationResult> {
    if top_n == 0 {
        return Err(RecsError::Config("top_n must be >= 1".to_string()));
    }
    params.validate()?;

    let top_n = top_n.min(catalogue.len());
    let pool = params.candidate_pool_size.max(top_n);
    let neighbors = index.neighbors(resolved.product_id, pool)?;
    debug!(
        product_id = resolved.product_id,
        candidates = neighbors.len(),
        top_n,
        "ranking candidate pool"
    );

    let mut items: Vec<ScoredProduct> = neighbors
        .into_iter()
        .filter_map(|(id, similarity)| {
            let product = catalogue.get(id)?;
            let popularity = popularity.score(id)?;
            Some(ScoredProduct {
                product_id: id,
                name: product.name.clone(),
                brand: product.brand.clone(),
                image_url: product.image_url.clone(),
                rating: product.rating,
                review_count: product.review_count,
                similarity,
                popularity,
                score: blend(similarity, popularity, params.similarity_weight),
            })
        })
        .collect();

    items.sort_by(|a, b| {
        b.score
            .total_cmp(&a.score)
            .then(a.product_id.cmp(&b.product_id))
    });
    items.truncate(top_n);

    Ok(RecommendationResult { resolved, items })
}
