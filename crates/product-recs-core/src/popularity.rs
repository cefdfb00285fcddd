//! Popularity signal from rating and review volume.
//!
//! `popularity = w × rating / MAX_RATING + (1 − w) × ln(1 + reviews) / ln(1 + max_reviews)`
//!
//! The log term gives diminishing returns on review count. When no product
//! has any reviews the volume term is `0` for everyone.

use crate::catalogue::{CatalogueSnapshot, Product, MAX_RATING};
use crate::error::{RecsError, Result};

/// Weighting between the rating and review-volume components.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PopularityParams {
    /// Weight of the normalized rating; the review-volume term gets `1 - rating_weight`.
    pub rating_weight: f64,
}

impl Default for PopularityParams {
    fn default() -> Self {
        Self { rating_weight: 0.5 }
    }
}

impl PopularityParams {
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.rating_weight) {
            return Err(RecsError::Config(
                "rating_weight must be in [0.0, 1.0]".to_string(),
            ));
        }
        Ok(())
    }
}

/// Cached per-product popularity for one catalogue snapshot.
#[derive(Debug, Clone)]
pub struct PopularityScores {
    scores: Vec<f64>,
}

impl PopularityScores {
    /// Score every product in `snapshot`.
    pub fn build(snapshot: &CatalogueSnapshot, params: &PopularityParams) -> Result<Self> {
        params.validate()?;
        let max_log_reviews = snapshot
            .iter()
            .map(|p| log_volume(p.review_count))
            .fold(0.0, f64::max);

        let scores = snapshot
            .iter()
            .map(|p| score_with(p, max_log_reviews, params.rating_weight))
            .collect();
        Ok(Self { scores })
    }

    /// Popularity of `product_id` in `[0, 1]`, or `None` for an unknown id.
    pub fn score(&self, product_id: usize) -> Option<f64> {
        self.scores.get(product_id).copied()
    }

    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    /// `(min, max)` over the catalogue; `(0, 0)` when empty.
    pub fn range(&self) -> (f64, f64) {
        if self.scores.is_empty() {
            return (0.0, 0.0);
        }
        let min = self.scores.iter().copied().fold(f64::INFINITY, f64::min);
        let max = self.scores.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        (min, max)
    }
}

fn log_volume(review_count: u64) -> f64 {
    (review_count as f64).ln_1p()
}

fn score_with(product: &Product, max_log_reviews: f64, rating_weight: f64) -> f64 {
    let rating = (product.rating / MAX_RATING).clamp(0.0, 1.0);
    let volume = if max_log_reviews > 0.0 {
        log_volume(product.review_count) / max_log_reviews
    } else {
        0.0
    };
    (rating_weight * rating + (1.0 - rating_weight) * volume).clamp(0.0, 1.0)
}
