//! # Product Recs Core
//!
//! Content-based product recommendation for a fixed catalogue: a TF-IDF text
//! index blended with a rating/review popularity signal, plus a typo-tolerant
//! query resolver.
//!
//! This crate has no file I/O, CLI, or config-file dependencies. Loaders hand
//! it a [`catalogue::CatalogueTable`]; callers read through
//! [`engine::Recommender`] or a single [`engine::IndexBundle`].
//!
//! ```text
//! CatalogueTable ──▶ CatalogueSnapshot ──┬──▶ TextIndex ─────────┐
//!                                        ├──▶ PopularityScores ──┼──▶ recommend
//!                                        └──▶ QueryResolver ─────┘
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`catalogue`] | Schema validation and the immutable product snapshot |
//! | [`text`] | Tokenizer, stop words, n-grams |
//! | [`text_index`] | TF-IDF vectors, cosine similarity, nearest neighbors |
//! | [`popularity`] | Rating + log review volume score |
//! | [`fuzzy`] | Levenshtein distance and ratios |
//! | [`resolver`] | Exact → substring → fuzzy name resolution, suggestions |
//! | [`recommend`] | Blended scoring and top-K ranking |
//! | [`engine`] | Bundle of all of the above with atomic reload |
//! | [`error`] | `RecsError` taxonomy |

pub mod catalogue;
pub mod engine;
pub mod error;
pub mod fuzzy;
pub mod popularity;
pub mod recommend;
pub mod resolver;
pub mod text;
pub mod text_index;

pub use engine::{EngineParams, IndexBundle, Recommender};
pub use error::{RecsError, Result};
