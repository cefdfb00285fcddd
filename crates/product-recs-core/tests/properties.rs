//! Property-based checks for neighbor retrieval, ranking, and popularity.

use proptest::{
    collection::vec,
    prelude::{prop_assert, prop_assert_eq, Strategy},
    proptest,
    test_runner::Config as ProptestConfig,
};
use product_recs_core::catalogue::CatalogueTable;
use product_recs_core::text::StopWords;
use product_recs_core::text_index::TextIndexParams;
use product_recs_core::{EngineParams, IndexBundle};

const PROP_CASES: u32 = 64;

const WORDS: &[&str] = &[
    "serum", "shampoo", "nail", "polish", "red", "matte", "vitamin", "glow", "hair", "lip",
    "balm", "cream", "oil", "spray", "repair", "gloss",
];

#[derive(Debug, Clone)]
struct Row {
    words: Vec<usize>,
    rating: u8,
    reviews: u32,
}

fn row_strategy() -> impl Strategy<Value = Row> {
    (vec(0..WORDS.len(), 1..6), 0u8..=5, 0u32..5000).prop_map(|(words, rating, reviews)| Row {
        words,
        rating,
        reviews,
    })
}

fn catalogue_strategy() -> impl Strategy<Value = Vec<Row>> {
    vec(row_strategy(), 2..12)
}

fn name(i: usize) -> String {
    format!("Item{:03}", i)
}

fn build(rows: &[Row]) -> IndexBundle {
    let mut table = CatalogueTable::new([
        "Name",
        "Brand",
        "Category",
        "Tags",
        "Description",
        "Rating",
        "ReviewCount",
    ]);
    for (i, row) in rows.iter().enumerate() {
        let text: Vec<&str> = row.words.iter().map(|&w| WORDS[w]).collect();
        table.push_row([
            name(i),
            "Brand".to_string(),
            "Beauty".to_string(),
            text.join(" "),
            text.join(" "),
            row.rating.to_string(),
            row.reviews.to_string(),
        ]);
    }
    let params = EngineParams {
        text: TextIndexParams {
            max_features: 500,
            min_df: 1,
            ngram_max: 2,
            stop_words: StopWords::English,
        },
        ..EngineParams::default()
    };
    IndexBundle::build(&table, &params).unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(PROP_CASES))]

    #[test]
    fn neighbors_exclude_self_and_stay_in_unit_range(rows in catalogue_strategy(), k in 0usize..20) {
        let bundle = build(&rows);
        for id in 0..rows.len() {
            let n = bundle.neighbors(id, k).unwrap();
            prop_assert!(n.len() <= k);
            prop_assert!(n.iter().all(|(other, _)| *other != id));
            prop_assert!(n.iter().all(|(_, s)| (0.0..=1.0).contains(s)));
            prop_assert!(n.windows(2).all(|w| w[0].1 >= w[1].1));
        }
    }

    #[test]
    fn recommend_is_sorted_and_idempotent(rows in catalogue_strategy(), top_n in 1usize..15) {
        let bundle = build(&rows);
        for id in 0..rows.len() {
            let first = bundle.recommend(&name(id), top_n).unwrap();
            let second = bundle.recommend(&name(id), top_n).unwrap();
            prop_assert_eq!(&first, &second);
            prop_assert_eq!(first.resolved.product_id, id);
            prop_assert!(first.items.windows(2).all(|w| w[0].score >= w[1].score));
            prop_assert!(first.items.iter().all(|i| i.product_id != id));
        }
    }

    #[test]
    fn oversized_top_n_returns_rest_of_catalogue(rows in catalogue_strategy()) {
        let bundle = build(&rows);
        let result = bundle.recommend(&name(0), rows.len() + 10).unwrap();
        prop_assert_eq!(result.len(), rows.len() - 1);
    }

    #[test]
    fn more_reviews_never_lower_popularity(rows in catalogue_strategy()) {
        let bundle = build(&rows);
        let pop = bundle.popularity();
        for (i, a) in rows.iter().enumerate() {
            for (j, b) in rows.iter().enumerate() {
                if a.rating == b.rating && a.reviews > b.reviews {
                    prop_assert!(pop.score(i).unwrap() >= pop.score(j).unwrap());
                }
            }
        }
    }
}
