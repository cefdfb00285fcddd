//! Trending-products carousel data.
//!
//! Read from an optional CSV next to the catalogue. The engine never sees
//! these rows; they only feed `recs trending`.

use anyhow::{Context, Result};
use product_recs_core::catalogue::primary_image;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::warn;

use crate::catalogue::find_data_file;
use crate::config::Config;
use crate::output::truncate;

/// Default number of carousel entries.
pub const DEFAULT_TRENDING_LIMIT: usize = 8;

#[derive(Debug, Deserialize)]
struct TrendingRecord {
    #[serde(rename = "Name", default)]
    name: String,
    #[serde(rename = "Brand", default)]
    brand: String,
    #[serde(rename = "Rating", default)]
    rating: Option<f64>,
    #[serde(rename = "ReviewCount", default)]
    review_count: Option<f64>,
    #[serde(rename = "ImageURL", default)]
    image_url: Option<String>,
}

/// One carousel entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendingProduct {
    pub name: String,
    pub brand: String,
    pub rating: f64,
    pub review_count: u64,
    pub primary_image: Option<String>,
}

/// Read up to `limit` trending rows from `path`.
pub fn read_trending(path: &Path, limit: usize) -> Result<Vec<TrendingProduct>> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .with_context(|| format!("Failed to open trending products: {}", path.display()))?;

    let mut out = Vec::new();
    for record in reader.deserialize::<TrendingRecord>().take(limit) {
        let r = record.with_context(|| format!("Malformed trending row in {}", path.display()))?;
        out.push(TrendingProduct {
            name: r.name,
            brand: r.brand,
            rating: r.rating.filter(|v| v.is_finite()).unwrap_or(0.0),
            review_count: r.review_count.filter(|v| v.is_finite()).unwrap_or(0.0).max(0.0)
                as u64,
            primary_image: r.image_url.as_deref().and_then(primary_image),
        });
    }
    Ok(out)
}

/// Trending rows for the configured file; empty when none is configured or found.
pub fn load_trending(config: &Config, limit: usize) -> Result<Vec<TrendingProduct>> {
    let configured = match &config.catalogue.trending_path {
        Some(p) => p,
        None => return Ok(Vec::new()),
    };
    match find_data_file(&config.base_dir, configured) {
        Some(path) => read_trending(&path, limit),
        None => {
            warn!(path = %configured.display(), "trending products file not found");
            Ok(Vec::new())
        }
    }
}

/// CLI entry point for `recs trending`.
pub fn run_trending(config: &Config, limit: Option<usize>, json: bool) -> Result<()> {
    let products = load_trending(config, limit.unwrap_or(DEFAULT_TRENDING_LIMIT))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&products)?);
        return Ok(());
    }

    if products.is_empty() {
        println!("No trending products.");
        return Ok(());
    }

    for (i, p) in products.iter().enumerate() {
        println!(
            "{}. {} by {} [{:.1}, {} reviews]",
            i + 1,
            truncate(&p.name, 60),
            p.brand,
            p.rating,
            p.review_count
        );
        if let Some(ref img) = p.primary_image {
            println!("    image: {}", img);
        }
    }
    Ok(())
}
