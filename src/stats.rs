//! Catalogue and index overview.
//!
//! Gives a quick summary of what was loaded: product count, vocabulary size,
//! how dense the product vectors are, and the popularity spread. Used by
//! `recs stats` and after `:reload` in the shell.

use anyhow::Result;
use product_recs_core::engine::BundleStats;
use product_recs_core::Recommender;

use crate::catalogue::find_data_file;
use crate::config::Config;

pub fn print_stats(stats: &BundleStats) {
    println!("  Products:    {}", stats.products);
    println!("  Vocabulary:  {}", stats.vocabulary);
    println!("  Terms/item:  {:.1}", stats.mean_terms_per_product);
    println!(
        "  Popularity:  {:.3} .. {:.3}",
        stats.popularity_min, stats.popularity_max
    );
}

/// Run the stats command against the loaded recommender.
pub fn run_stats(recommender: &Recommender, config: &Config) -> Result<()> {
    let stats = recommender.snapshot().stats();

    let catalogue = find_data_file(&config.base_dir, &config.catalogue.path)
        .unwrap_or_else(|| config.catalogue.path.clone());
    let size = std::fs::metadata(&catalogue).map(|m| m.len()).unwrap_or(0);

    println!("Product Recs — Catalogue Stats");
    println!("==============================");
    println!();
    println!("  Catalogue:   {}", catalogue.display());
    println!("  Size:        {}", format_bytes(size));
    println!();
    print_stats(&stats);

    let params = recommender.params();
    println!();
    println!("  Tuning:");
    println!(
        "    n-grams 1..={}, min_df {}, max_features {}",
        params.text.ngram_max, params.text.min_df, params.text.max_features
    );
    println!(
        "    similarity_weight {:.2}, candidate_pool_size {}, rating_weight {:.2}",
        params.ranking.similarity_weight,
        params.ranking.candidate_pool_size,
        params.popularity.rating_weight
    );
    println!();
    Ok(())
}

/// Human-readable file size, e.g. `1.5 MB`.
fn format_bytes(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["KB", "MB", "GB", "TB"];
    if bytes < 1024 {
        return format!("{} B", bytes);
    }
    let mut size = bytes as f64 / 1024.0;
    let mut unit = 0;
    while size >= 1024.0 && unit + 1 < UNITS.len() {
        size /= 1024.0;
        unit += 1;
    }
    format!("{:.1} {}", size, UNITS[unit])
}
