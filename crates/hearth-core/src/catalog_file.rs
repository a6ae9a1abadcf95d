//! Catalog import from TOML.
//!
//! ```toml
//! [[recipes]]
//! name = "Masala Oats"
//! dietary_pattern = "veg"
//! tags = ["Breakfast"]
//! allergens = []
//! cuisine = "indian"
//!
//! [[exercises]]
//! name = "Push-up"
//! tags = ["push"]
//! description = "3 x 12"
//! ```

use std::collections::HashSet;

use anyhow::Result;
use serde::Deserialize;
use sqlx::PgPool;
use thiserror::Error;
use tracing::info;

use hearth_db::models::{Exercise, Recipe};
use hearth_db::queries::{exercises, recipes};

use crate::planner::tags::name_key;

/// Parsed contents of a catalog file.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct CatalogFile {
    #[serde(default)]
    pub recipes: Vec<Recipe>,
    #[serde(default)]
    pub exercises: Vec<Exercise>,
}

#[derive(Debug, Error)]
pub enum CatalogFileError {
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("{kind} #{index} has an empty name")]
    EmptyName { kind: &'static str, index: usize },

    #[error("duplicate {kind} name: {name:?}")]
    DuplicateName { kind: &'static str, name: String },

    #[error("catalog file contains no recipes or exercises")]
    Empty,
}

/// Counts written by [`import_catalog`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportSummary {
    pub recipes: usize,
    pub exercises: usize,
}

/// Parse and validate a catalog TOML document.
///
/// Names must be non-empty and unique per kind after normalization, since
/// the planner treats "Oat Bowl" and "oat  bowl" as the same item.
pub fn parse_catalog_toml(content: &str) -> Result<CatalogFile, CatalogFileError> {
    let file: CatalogFile = toml::from_str(content)?;
    if file.recipes.is_empty() && file.exercises.is_empty() {
        return Err(CatalogFileError::Empty);
    }
    check_names("recipe", file.recipes.iter().map(|r| r.name.as_str()))?;
    check_names("exercise", file.exercises.iter().map(|e| e.name.as_str()))?;
    Ok(file)
}

fn check_names<'a>(
    kind: &'static str,
    names: impl Iterator<Item = &'a str>,
) -> Result<(), CatalogFileError> {
    let mut seen = HashSet::new();
    for (index, name) in names.enumerate() {
        let key = name_key(name);
        if key.is_empty() {
            return Err(CatalogFileError::EmptyName { kind, index });
        }
        if !seen.insert(key) {
            return Err(CatalogFileError::DuplicateName {
                kind,
                name: name.to_owned(),
            });
        }
    }
    Ok(())
}

/// Upsert every recipe and exercise in `file`, keyed by name.
pub async fn import_catalog(pool: &PgPool, file: &CatalogFile) -> Result<ImportSummary> {
    for recipe in &file.recipes {
        recipes::upsert_recipe(pool, recipe).await?;
    }
    for exercise in &file.exercises {
        exercises::upsert_exercise(pool, exercise).await?;
    }

    info!(
        recipes = file.recipes.len(),
        exercises = file.exercises.len(),
        "catalog imported"
    );
    Ok(ImportSummary {
        recipes: file.recipes.len(),
        exercises: file.exercises.len(),
    })
}
