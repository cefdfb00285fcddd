//! CSV catalogue loading and data-file lookup.
//!
//! The core accepts an already-parsed [`CatalogueTable`]; this module reads
//! it from disk with the `csv` crate. Data files are looked up relative to the
//! config directory first, then under `data/`, then as given.

use anyhow::{Context, Result};
use product_recs_core::catalogue::CatalogueTable;
use product_recs_core::{EngineParams, Recommender};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::config::Config;

/// Candidate locations for `file`, in lookup order.
fn candidates(base_dir: &Path, file: &Path) -> Vec<PathBuf> {
    if file.is_absolute() {
        return vec![file.to_path_buf()];
    }
    let mut out = vec![base_dir.join(file)];
    if let Some(name) = file.file_name() {
        out.push(base_dir.join("data").join(name));
        out.push(PathBuf::from("data").join(name));
    }
    out.push(file.to_path_buf());
    out
}

/// First existing location for `file`, or `None`.
pub fn find_data_file(base_dir: &Path, file: &Path) -> Option<PathBuf> {
    candidates(base_dir, file).into_iter().find(|p| p.is_file())
}

/// Like [`find_data_file`] but fails with the list of places searched.
pub fn resolve_data_file(base_dir: &Path, file: &Path) -> Result<PathBuf> {
    find_data_file(base_dir, file).ok_or_else(|| {
        let searched: Vec<String> = candidates(base_dir, file)
            .iter()
            .map(|p| p.display().to_string())
            .collect();
        anyhow::anyhow!(
            "Unable to locate '{}'. Looked in: {}",
            file.display(),
            searched.join(", ")
        )
    })
}

/// Read a CSV file into a [`CatalogueTable`], keeping every column as text.
pub fn read_table(path: &Path) -> Result<CatalogueTable> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::Headers)
        .from_path(path)
        .with_context(|| format!("Failed to open catalogue: {}", path.display()))?;

    let headers = reader
        .headers()
        .with_context(|| format!("Failed to read CSV header: {}", path.display()))?
        .clone();
    let mut table = CatalogueTable::new(headers.iter());

    for (i, record) in reader.records().enumerate() {
        let record =
            record.with_context(|| format!("Malformed CSV record {} in {}", i + 1, path.display()))?;
        table.push_row(record.iter());
    }

    debug!(path = %path.display(), rows = table.rows.len(), "catalogue CSV parsed");
    Ok(table)
}

/// Locate and read the configured catalogue.
pub fn load_catalogue(config: &Config) -> Result<CatalogueTable> {
    let path = resolve_data_file(&config.base_dir, &config.catalogue.path)?;
    info!(path = %path.display(), "loading catalogue");
    read_table(&path)
}

/// Load the catalogue and build a [`Recommender`] from the config.
pub fn open_recommender(config: &Config) -> Result<Recommender> {
    let params: EngineParams = config.engine_params()?;
    let table = load_catalogue(config)?;
    Recommender::new(&table, params).context("Failed to build recommender")
}
