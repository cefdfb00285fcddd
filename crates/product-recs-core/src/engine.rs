//! Published engine state and atomic reload.
//!
//! An [`IndexBundle`] ties a catalogue snapshot to the text index, popularity
//! scores, and name resolver built from it. Bundles are immutable; a
//! [`Recommender`] publishes one behind an `Arc` and swaps the whole `Arc` on
//! reload, so readers always see a consistent triple. A reader that cloned the
//! old `Arc` finishes against the old bundle.
//!
//! Reloads are serialized: a second reload while one is building fails with
//! [`RecsError::ReloadInProgress`] instead of queueing.

use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use serde::Serialize;
use tracing::{info, warn};

use crate::catalogue::{self, CatalogueSnapshot, CatalogueTable};
use crate::error::{RecsError, Result};
use crate::popularity::{PopularityParams, PopularityScores};
use crate::recommend::{self, RecommendParams, RecommendationResult};
use crate::resolver::{NameSuggestion, QueryResolver, ResolvedProduct, ResolverParams};
use crate::text_index::{TextIndex, TextIndexParams};

/// Every build-time tunable, validated together.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EngineParams {
    pub text: TextIndexParams,
    pub popularity: PopularityParams,
    pub resolver: ResolverParams,
    pub ranking: RecommendParams,
}

impl EngineParams {
    pub fn validate(&self) -> Result<()> {
        self.text.validate()?;
        self.popularity.validate()?;
        self.resolver.validate()?;
        self.ranking.validate()
    }
}

/// Summary numbers for a built bundle.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BundleStats {
    pub products: usize,
    pub vocabulary: usize,
    pub mean_terms_per_product: f64,
    pub popularity_min: f64,
    pub popularity_max: f64,
}

/// One consistent catalogue snapshot with everything derived from it.
#[derive(Debug)]
pub struct IndexBundle {
    catalogue: CatalogueSnapshot,
    index: TextIndex,
    popularity: PopularityScores,
    resolver: QueryResolver,
    ranking: RecommendParams,
}

impl IndexBundle {
    /// Load `table` and build the index, popularity scores, and resolver.
    pub fn build(table: &CatalogueTable, params: &EngineParams) -> Result<Self> {
        params.validate()?;
        let catalogue = catalogue::load(table)?;
        let index = TextIndex::build(&catalogue, &params.text)?;
        let popularity = PopularityScores::build(&catalogue, &params.popularity)?;
        let resolver = QueryResolver::build(&catalogue, params.resolver)?;
        Ok(Self {
            catalogue,
            index,
            popularity,
            resolver,
            ranking: params.ranking,
        })
    }

    pub fn catalogue(&self) -> &CatalogueSnapshot {
        &self.catalogue
    }

    pub fn popularity(&self) -> &PopularityScores {
        &self.popularity
    }

    pub fn resolve(&self, query: &str) -> Result<ResolvedProduct> {
        self.resolver.resolve(query)
    }

    pub fn suggest(&self, query: &str, limit: usize) -> Vec<NameSuggestion> {
        self.resolver.suggest(query, limit)
    }

    pub fn autocomplete(&self, query: &str, limit: usize) -> Vec<NameSuggestion> {
        self.resolver.autocomplete(query, limit)
    }

    pub fn neighbors(&self, product_id: usize, k: usize) -> Result<Vec<(usize, f64)>> {
        self.index.neighbors(product_id, k)
    }

    /// Resolve `query` and rank its neighbors.
    ///
    /// Resolution errors propagate unchanged; no partial result is produced.
    pub fn recommend(&self, query: &str, top_n: usize) -> Result<RecommendationResult> {
        if top_n == 0 {
            return Err(RecsError::Config("top_n must be >= 1".to_string()));
        }
        let resolved = self.resolve(query)?;
        recommend::rank(
            &self.catalogue,
            &self.index,
            &self.popularity,
            resolved,
            top_n,
            &self.ranking,
        )
    }

    pub fn stats(&self) -> BundleStats {
        let (popularity_min, popularity_max) = self.popularity.range();
        BundleStats {
            products: self.catalogue.len(),
            vocabulary: self.index.vocabulary_size(),
            mean_terms_per_product: self.index.mean_terms_per_product(),
            popularity_min,
            popularity_max,
        }
    }
}

/// Thread-safe handle that serves reads from the current bundle.
pub struct Recommender {
    current: RwLock<Arc<IndexBundle>>,
    reload_lock: Mutex<()>,
    params: EngineParams,
}

impl Recommender {
    /// Build the first bundle. Fails if the catalogue or params are invalid.
    pub fn new(table: &CatalogueTable, params: EngineParams) -> Result<Self> {
        let bundle = IndexBundle::build(table, &params)?;
        info!(products = bundle.catalogue.len(), "recommender ready");
        Ok(Self {
            current: RwLock::new(Arc::new(bundle)),
            reload_lock: Mutex::new(()),
            params,
        })
    }

    pub fn params(&self) -> &EngineParams {
        &self.params
    }

    /// The currently published bundle.
    pub fn snapshot(&self) -> Arc<IndexBundle> {
        Arc::clone(&self.current.read())
    }

    /// Build a bundle from `table` and publish it.
    ///
    /// On failure the previous bundle keeps serving reads. Returns the
    /// statistics of the newly published bundle.
    pub fn reload(&self, table: &CatalogueTable) -> Result<BundleStats> {
        let _guard = self
            .reload_lock
            .try_lock()
            .ok_or(RecsError::ReloadInProgress)?;

        let bundle = match IndexBundle::build(table, &self.params) {
            Ok(b) => b,
            Err(e) => {
                warn!(error = %e, "reload failed; keeping previous catalogue");
                return Err(e);
            }
        };
        let stats = bundle.stats();
        *self.current.write() = Arc::new(bundle);
        info!(products = stats.products, vocabulary = stats.vocabulary, "catalogue reloaded");
        Ok(stats)
    }

    pub fn resolve(&self, query: &str) -> Result<ResolvedProduct> {
        self.snapshot().resolve(query)
    }

    pub fn recommend(&self, query: &str, top_n: usize) -> Result<RecommendationResult> {
        self.snapshot().recommend(query, top_n)
    }

    pub fn suggest(&self, query: &str, limit: usize) -> Vec<NameSuggestion> {
        self.snapshot().suggest(query, limit)
    }

    pub fn autocomplete(&self, query: &str, limit: usize) -> Vec<NameSuggestion> {
        self.snapshot().autocomplete(query, limit)
    }
}
