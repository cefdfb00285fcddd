//! Human-readable rendering shared by the CLI commands and the shell.

use product_recs_core::recommend::RecommendationResult;
use product_recs_core::resolver::{NameSuggestion, ResolvedProduct};

/// Cut `text` to at most `len` characters, appending `...` when shortened.
pub fn truncate(text: &str, len: usize) -> String {
    if text.chars().count() <= len {
        return text.to_string();
    }
    let kept: String = text.chars().take(len).collect();
    format!("{}...", kept)
}

pub const NOT_FOUND_MESSAGE: &str = "Product not found. Please refine your search query.";

pub fn print_not_found(suggestions: &[NameSuggestion]) {
    println!("{}", NOT_FOUND_MESSAGE);
    if suggestions.is_empty() {
        return;
    }
    println!("Did you mean:");
    for s in suggestions {
        println!("  - {} ({:.2})", s.name, s.score);
    }
}

pub fn print_resolved(resolved: &ResolvedProduct) {
    println!(
        "Matched: {} [{} {:.2}] id={}",
        resolved.name, resolved.stage, resolved.match_score, resolved.product_id
    );
}

pub fn print_recommendations(result: &RecommendationResult) {
    print_resolved(&result.resolved);
    println!();

    if result.is_empty() {
        println!("No results.");
        return;
    }

    for (i, item) in result.items.iter().enumerate() {
        println!("{}. [{:.3}] {} / {}", i + 1, item.score, item.brand, truncate(&item.name, 60));
        println!(
            "    similarity: {:.3}  popularity: {:.3}",
            item.similarity, item.popularity
        );
        println!("    rating: {:.1} ({} reviews)", item.rating, item.review_count);
        if let Some(ref url) = item.image_url {
            println!("    image: {}", url);
        }
        println!("    id: {}", item.product_id);
        println!();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_short_text_untouched() {
        assert_eq!(truncate("Lip Balm", 20), "Lip Balm");
        assert_eq!(truncate("Lip Balm", 8), "Lip Balm");
    }

    #[test]
    fn test_truncate_appends_ellipsis() {
        assert_eq!(truncate("Vitamin C Serum", 7), "Vitamin...");
    }

    #[test]
    fn test_truncate_counts_chars_not_bytes() {
        assert_eq!(truncate("crème brûlée", 5), "crème...");
    }
}
