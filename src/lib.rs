//! # Product Recs
//!
//! Content-based product recommendations for a beauty/e-commerce catalogue.
//!
//! The scoring engine lives in `product-recs-core`. This crate wires it to
//! the outside world: a TOML config, a CSV catalogue on disk, an optional
//! trending-products CSV, and the `recs` command-line interface.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐   ┌──────────────┐   ┌─────────────────┐
//! │ recs.toml   │──▶│ CSV loader   │──▶│ Recommender     │
//! │ clean_data  │   │ (catalogue)  │   │ (core, RwLock)  │
//! └─────────────┘   └──────────────┘   └───────┬─────────┘
//!                                              │
//!                      ┌───────────────────────┤
//!                      ▼                       ▼
//!                 ┌──────────┐           ┌──────────┐
//!                 │   CLI    │           │  shell   │
//!                 │  (recs)  │           │ :reload  │
//!                 └──────────┘           └──────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```bash
//! recs recommend "vitamin c serum" --top-n 5
//! recs resolve "vitmin serum"
//! recs autocomplete "lip"
//! recs trending
//! recs shell
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration parsing |
//! | [`catalogue`] | Data-file lookup and CSV catalogue loading |
//! | [`trending`] | Trending-products carousel |
//! | [`recommend`] | `recommend`, `resolve`, `autocomplete` commands |
//! | [`output`] | Text rendering helpers |
//! | [`stats`] | Catalogue statistics |
//! | [`shell`] | Interactive session with live reload |

pub mod catalogue;
pub mod config;
pub mod output;
pub mod recommend;
pub mod shell;
pub mod stats;
pub mod trending;
