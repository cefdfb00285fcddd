//! Catalogue store: validated, immutable product snapshot.
//!
//! An external loader (CSV, database export, fixtures) hands the core a
//! [`CatalogueTable`]: a header row plus string cells. [`load`] validates the
//! schema up front and produces a [`CatalogueSnapshot`] whose products carry
//! stable row-position ids and a derived `combined_text` used for indexing.
//!
//! # Columns
//!
//! | Column | Required | Missing / empty cell |
//! |--------|----------|----------------------|
//! | `Name`, `Brand`, `Category`, `Tags`, `Description` | yes | empty text |
//! | `Rating` | no | `0.0` |
//! | `ReviewCount` | no | `0` |
//! | `ImageURL` | no | `None` |

use serde::Serialize;
use tracing::info;

use crate::error::{RecsError, Result};

/// Columns whose absence aborts the load.
pub const REQUIRED_COLUMNS: [&str; 5] = ["Name", "Brand", "Category", "Tags", "Description"];

/// Upper bound of the rating scale.
pub const MAX_RATING: f64 = 5.0;

/// Largest magnitude accepted in a numeric cell.
const MAX_CELL_VALUE: f64 = 1e15;

const RATING_COLUMN: &str = "Rating";
const REVIEW_COUNT_COLUMN: &str = "ReviewCount";
const IMAGE_URL_COLUMN: &str = "ImageURL";

/// Already-parsed tabular catalogue as handed over by a loader.
///
/// Rows shorter than the header are padded with empty cells on read.
#[derive(Debug, Clone, Default)]
pub struct CatalogueTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl CatalogueTable {
    pub fn new<S: Into<String>>(headers: impl IntoIterator<Item = S>) -> Self {
        Self {
            headers: headers.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    pub fn push_row<S: Into<String>>(&mut self, row: impl IntoIterator<Item = S>) {
        self.rows.push(row.into_iter().map(Into::into).collect());
    }

    fn column(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h.trim() == name)
    }
}

/// One catalogue entry.
#[derive(Debug, Clone, Serialize)]
pub struct Product {
    /// Row position in the source table, assigned at load time.
    pub id: usize,
    pub name: String,
    pub brand: String,
    pub category: String,
    pub tags: String,
    pub description: String,
    /// Clamped to `[0, MAX_RATING]`.
    pub rating: f64,
    pub review_count: u64,
    /// First entry of the pipe-delimited `ImageURL` cell.
    pub image_url: Option<String>,
    #[serde(skip)]
    normalized_name: String,
    #[serde(skip)]
    combined_text: String,
}

impl Product {
    /// Lower-cased, trimmed name used for exact/substring matching.
    pub fn normalized_name(&self) -> &str {
        &self.normalized_name
    }

    /// Lower-cased concatenation of the non-empty text fields.
    pub fn combined_text(&self) -> &str {
        &self.combined_text
    }
}

/// Immutable, ordered product table.
#[derive(Debug, Clone)]
pub struct CatalogueSnapshot {
    products: Vec<Product>,
}

impl CatalogueSnapshot {
    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    pub fn get(&self, id: usize) -> Option<&Product> {
        self.products.get(id)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Product> {
        self.products.iter()
    }
}

/// Validate `table` and build a [`CatalogueSnapshot`].
///
/// Fails with [`RecsError::Data`] when a required column is absent, when the
/// table has no rows, or when a numeric cell cannot be parsed.
pub fn load(table: &CatalogueTable) -> Result<CatalogueSnapshot> {
    let missing: Vec<&str> = REQUIRED_COLUMNS
        .iter()
        .copied()
        .filter(|col| table.column(col).is_none())
        .collect();
    if !missing.is_empty() {
        return Err(RecsError::Data(format!(
            "missing required column(s): {}",
            missing.join(", ")
        )));
    }
    if table.rows.is_empty() {
        return Err(RecsError::Data(
            "catalogue is empty; cannot build recommender".to_string(),
        ));
    }

    let text_cols: Vec<usize> = REQUIRED_COLUMNS
        .iter()
        .filter_map(|col| table.column(col))
        .collect();
    let rating_col = table.column(RATING_COLUMN);
    let reviews_col = table.column(REVIEW_COUNT_COLUMN);
    let image_col = table.column(IMAGE_URL_COLUMN);

    let mut products = Vec::with_capacity(table.rows.len());
    for (id, row) in table.rows.iter().enumerate() {
        let fields: Vec<String> = text_cols
            .iter()
            .map(|&i| cell(row, Some(i)).trim().to_string())
            .collect();
        let [name, brand, category, tags, description]: [String; 5] =
            fields.try_into().map_err(|_| {
                RecsError::Data(format!("row {}: unexpected column layout", id + 1))
            })?;

        let rating = parse_number(cell(row, rating_col), RATING_COLUMN, id)?.clamp(0.0, MAX_RATING);
        let review_count = parse_number(cell(row, reviews_col), REVIEW_COUNT_COLUMN, id)?
            .max(0.0)
            .round() as u64;
        let image_url = primary_image(cell(row, image_col));

        let normalized_name = name.to_lowercase();
        let combined_text = combine_text(&[&name, &brand, &category, &tags, &description]);

        products.push(Product {
            id,
            name,
            brand,
            category,
            tags,
            description,
            rating,
            review_count,
            image_url,
            normalized_name,
            combined_text,
        });
    }

    info!(products = products.len(), "catalogue snapshot loaded");
    Ok(CatalogueSnapshot { products })
}

/// Lower-case and space-join the non-empty fields.
pub fn combine_text(fields: &[&str]) -> String {
    fields
        .iter()
        .map(|f| f.trim())
        .filter(|f| !f.is_empty())
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join(" ")
}

/// First non-empty entry of a pipe-delimited image list.
pub fn primary_image(cell: &str) -> Option<String> {
    cell.split('|')
        .next()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn cell(row: &[String], idx: Option<usize>) -> &str {
    idx.and_then(|i| row.get(i)).map(String::as_str).unwrap_or("")
}

fn parse_number(cell: &str, column: &str, id: usize) -> Result<f64> {
    let trimmed = cell.trim();
    if trimmed.is_empty() {
        return Ok(0.0);
    }
    let value: f64 = trimmed.parse().map_err(|_| {
        RecsError::Data(format!(
            "row {}: column {} has non-numeric value '{}'",
            id + 1,
            column,
            trimmed
        ))
    })?;
    if value.is_nan() {
        return Ok(0.0);
    }
    if !value.is_finite() || value.abs() > MAX_CELL_VALUE {
        return Err(RecsError::Data(format!(
            "row {}: column {} value '{}' is out of range",
            id + 1,
            column,
            trimmed
        )));
    }
    Ok(value)
}
