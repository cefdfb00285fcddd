//! `recs recommend`, `recs resolve` and `recs autocomplete`.
//!
//! Each command returns `Ok(true)` when the query matched. An unmatched or
//! empty query is reported to stdout (with "did you mean" suggestions) and
//! yields `Ok(false)` so the binary can exit non-zero. Any other core error
//! propagates.

use anyhow::Result;
use product_recs_core::{Recommender, RecsError};
use tracing::debug;

use crate::config::Config;
use crate::output::{print_not_found, print_recommendations, print_resolved};

/// Print the fallback for a query that did not resolve.
///
/// Returns `Ok(false)` for the user-facing failures and the error otherwise.
fn handle_miss(
    recommender: &Recommender,
    config: &Config,
    query: &str,
    err: RecsError,
) -> Result<bool> {
    match err {
        RecsError::NotFound(_) => {
            let suggestions = recommender.suggest(query, config.resolver.suggestion_limit);
            debug!(query, suggestions = suggestions.len(), "query did not resolve");
            print_not_found(&suggestions);
            Ok(false)
        }
        RecsError::InvalidQuery(_) => {
            println!("Please enter a product name.");
            Ok(false)
        }
        other => Err(other.into()),
    }
}

/// Recommend against an already-open recommender; used by the CLI and the shell.
pub fn recommend_with(
    recommender: &Recommender,
    config: &Config,
    query: &str,
    top_n: usize,
    json: bool,
) -> Result<bool> {
    match recommender.recommend(query, top_n) {
        Ok(result) => {
            if json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                print_recommendations(&result);
            }
            Ok(true)
        }
        Err(e) => handle_miss(recommender, config, query, e),
    }
}

pub fn run_recommend(
    recommender: &Recommender,
    config: &Config,
    query: &str,
    top_n: Option<usize>,
    json: bool,
) -> Result<bool> {
    let top_n = top_n.unwrap_or(config.ranking.default_top_n);
    recommend_with(recommender, config, query, top_n, json)
}

pub fn run_resolve(
    recommender: &Recommender,
    config: &Config,
    query: &str,
    json: bool,
) -> Result<bool> {
    match recommender.resolve(query) {
        Ok(resolved) => {
            if json {
                println!("{}", serde_json::to_string_pretty(&resolved)?);
            } else {
                print_resolved(&resolved);
            }
            Ok(true)
        }
        Err(e) => handle_miss(recommender, config, query, e),
    }
}

pub fn run_autocomplete(recommender: &Recommender, prefix: &str, limit: usize) -> Result<()> {
    let completions = recommender.autocomplete(prefix, limit);
    if completions.is_empty() {
        println!("No matches.");
        return Ok(());
    }
    for c in &completions {
        println!("{:.2}  {}", c.score, c.name);
    }
    Ok(())
}
