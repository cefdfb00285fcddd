use anyhow::{Context, Result};
use product_recs_core::popularity::PopularityParams;
use product_recs_core::recommend::RecommendParams;
use product_recs_core::resolver::ResolverParams;
use product_recs_core::text::StopWords;
use product_recs_core::text_index::TextIndexParams;
use product_recs_core::EngineParams;
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub catalogue: CatalogueConfig,
    #[serde(default)]
    pub text_index: TextIndexConfig,
    #[serde(default)]
    pub ranking: RankingConfig,
    #[serde(default)]
    pub resolver: ResolverConfig,
    /// Directory of the config file; relative data paths resolve against it.
    #[serde(skip)]
    pub base_dir: PathBuf,
}

#[derive(Debug, Deserialize, Clone)]
pub struct CatalogueConfig {
    pub path: PathBuf,
    #[serde(default)]
    pub trending_path: Option<PathBuf>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct TextIndexConfig {
    #[serde(default = "default_max_features")]
    pub max_features: usize,
    #[serde(default = "default_min_df")]
    pub min_df: usize,
    #[serde(default = "default_ngram_max")]
    pub ngram_max: usize,
    #[serde(default)]
    pub stop_words: StopWordsConfig,
}

/// `stop_words = "english"`, `"none"`, or an explicit list of words.
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(untagged)]
pub enum StopWordsConfig {
    Named(String),
    Words(Vec<String>),
}

impl Default for StopWordsConfig {
    fn default() -> Self {
        StopWordsConfig::Named("english".to_string())
    }
}

impl Default for TextIndexConfig {
    fn default() -> Self {
        Self {
            max_features: default_max_features(),
            min_df: default_min_df(),
            ngram_max: default_ngram_max(),
            stop_words: StopWordsConfig::default(),
        }
    }
}

fn default_max_features() -> usize {
    20_000
}
fn default_min_df() -> usize {
    2
}
fn default_ngram_max() -> usize {
    2
}

#[derive(Debug, Deserialize, Clone)]
pub struct RankingConfig {
    #[serde(default = "default_similarity_weight")]
    pub similarity_weight: f64,
    #[serde(default = "default_candidate_pool_size")]
    pub candidate_pool_size: usize,
    #[serde(default = "default_top_n")]
    pub default_top_n: usize,
    #[serde(default = "default_rating_weight")]
    pub rating_weight: f64,
}

impl Default for RankingConfig {
    fn default() -> Self {
        Self {
            similarity_weight: default_similarity_weight(),
            candidate_pool_size: default_candidate_pool_size(),
            default_top_n: default_top_n(),
            rating_weight: default_rating_weight(),
        }
    }
}

fn default_similarity_weight() -> f64 {
    0.75
}
fn default_candidate_pool_size() -> usize {
    50
}
fn default_top_n() -> usize {
    10
}
fn default_rating_weight() -> f64 {
    0.5
}

#[derive(Debug, Deserialize, Clone)]
pub struct ResolverConfig {
    #[serde(default = "default_fuzzy_threshold")]
    pub fuzzy_threshold: f64,
    #[serde(default = "default_suggestion_limit")]
    pub suggestion_limit: usize,
    #[serde(default = "default_suggestion_cutoff")]
    pub suggestion_cutoff: f64,
    #[serde(default = "default_autocomplete_cutoff")]
    pub autocomplete_cutoff: f64,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            fuzzy_threshold: default_fuzzy_threshold(),
            suggestion_limit: default_suggestion_limit(),
            suggestion_cutoff: default_suggestion_cutoff(),
            autocomplete_cutoff: default_autocomplete_cutoff(),
        }
    }
}

fn default_fuzzy_threshold() -> f64 {
    0.6
}
fn default_suggestion_limit() -> usize {
    5
}
fn default_suggestion_cutoff() -> f64 {
    0.6
}
fn default_autocomplete_cutoff() -> f64 {
    0.4
}

impl Config {
    /// Build-time engine parameters derived from this config.
    pub fn engine_params(&self) -> Result<EngineParams> {
        let stop_words = match &self.text_index.stop_words {
            StopWordsConfig::Named(name) => match name.as_str() {
                "english" => StopWords::English,
                "none" => StopWords::None,
                other => anyhow::bail!(
                    "Unknown text_index.stop_words: '{}'. Must be english, none, or a list of words.",
                    other
                ),
            },
            StopWordsConfig::Words(words) => StopWords::Custom(words.clone()),
        };
        Ok(EngineParams {
            text: TextIndexParams {
                max_features: self.text_index.max_features,
                min_df: self.text_index.min_df,
                ngram_max: self.text_index.ngram_max,
                stop_words,
            },
            popularity: PopularityParams {
                rating_weight: self.ranking.rating_weight,
            },
            resolver: ResolverParams {
                fuzzy_threshold: self.resolver.fuzzy_threshold,
                suggestion_cutoff: self.resolver.suggestion_cutoff,
                autocomplete_cutoff: self.resolver.autocomplete_cutoff,
            },
            ranking: RecommendParams {
                similarity_weight: self.ranking.similarity_weight,
                candidate_pool_size: self.ranking.candidate_pool_size,
            },
        })
    }
}

pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let mut config: Config =
        toml::from_str(&content).with_context(|| "Failed to parse config file")?;
    config.base_dir = path
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_default();

    if config.ranking.default_top_n == 0 {
        anyhow::bail!("ranking.default_top_n must be >= 1");
    }

    if config.resolver.suggestion_limit == 0 {
        anyhow::bail!("resolver.suggestion_limit must be >= 1");
    }

    // Remaining tunables are range-checked by the core.
    config
        .engine_params()?
        .validate()
        .with_context(|| format!("Invalid tuning values in {}", path.display()))?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write(dir: &TempDir, body: &str) -> PathBuf {
        let path = dir.path().join("recs.toml");
        fs::write(&path, body).unwrap();
        path
    }

    #[test]
    fn test_minimal_config_uses_defaults() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "[catalogue]\npath = \"data/clean_data.csv\"\n");
        let cfg = load_config(&path).unwrap();
        assert_eq!(cfg.text_index.max_features, 20_000);
        assert_eq!(cfg.text_index.min_df, 2);
        assert_eq!(cfg.ranking.default_top_n, 10);
        assert!((cfg.ranking.similarity_weight - 0.75).abs() < 1e-9);
        assert!((cfg.resolver.fuzzy_threshold - 0.6).abs() < 1e-9);
        assert_eq!(cfg.base_dir, dir.path());
        assert!(cfg.catalogue.trending_path.is_none());
    }

    #[test]
    fn test_out_of_range_weight_rejected() {
        let dir = TempDir::new().unwrap();
        let path = write(
            &dir,
            "[catalogue]\npath = \"x.csv\"\n[ranking]\nsimilarity_weight = 1.5\n",
        );
        let err = load_config(&path).unwrap_err();
        assert!(format!("{:#}", err).contains("similarity_weight"));
    }

    #[test]
    fn test_unknown_stop_words_rejected() {
        let dir = TempDir::new().unwrap();
        let path = write(
            &dir,
            "[catalogue]\npath = \"x.csv\"\n[text_index]\nstop_words = \"klingon\"\n",
        );
        assert!(load_config(&path).is_err());
    }

    #[test]
    fn test_custom_stop_word_list() {
        let dir = TempDir::new().unwrap();
        let path = write(
            &dir,
            "[catalogue]\npath = \"x.csv\"\n[text_index]\nstop_words = [\"serum\", \"Glow\"]\n",
        );
        let params = load_config(&path).unwrap().engine_params().unwrap();
        assert_eq!(
            params.text.stop_words,
            StopWords::Custom(vec!["serum".to_string(), "Glow".to_string()])
        );
    }

    #[test]
    fn test_zero_top_n_rejected() {
        let dir = TempDir::new().unwrap();
        let path = write(
            &dir,
            "[catalogue]\npath = \"x.csv\"\n[ranking]\ndefault_top_n = 0\n",
        );
        assert!(load_config(&path).is_err());
    }

    #[test]
    fn test_engine_params_mapping() {
        let dir = TempDir::new().unwrap();
        let path = write(
            &dir,
            r#"[catalogue]
path = "x.csv"

[text_index]
min_df = 1
ngram_max = 1
stop_words = "none"

[ranking]
candidate_pool_size = 7
rating_weight = 0.25
"#,
        );
        let params = load_config(&path).unwrap().engine_params().unwrap();
        assert_eq!(params.text.min_df, 1);
        assert_eq!(params.text.stop_words, StopWords::None);
        assert_eq!(params.ranking.candidate_pool_size, 7);
        assert!((params.popularity.rating_weight - 0.25).abs() < 1e-9);
    }
}
