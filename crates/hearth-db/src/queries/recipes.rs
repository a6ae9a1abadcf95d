//! Database query functions for the `recipes` catalog.

use anyhow::{Context, Result};
use serde_json::json;
use sqlx::PgPool;

use crate::models::{Recipe, RecipeRow};

/// Fetch recipes with at least one tag containing `tag` (case-insensitive
/// substring), ordered by name.
///
/// When `pattern` is given, only recipes whose dietary pattern equals it
/// exactly are returned.
pub async fn recipes_by_tag(pool: &PgPool, tag: &str, pattern: Option<&str>) -> Result<Vec<Recipe>> {
    let rows = sqlx::query_as::<_, RecipeRow>(
        "SELECT name, dietary_pattern, allergens, tags, ingredients, cuisine \
         FROM recipes r \
         WHERE EXISTS ( \
             SELECT 1 FROM jsonb_array_elements_text( \
                 CASE WHEN jsonb_typeof(r.tags) = 'array' THEN r.tags ELSE '[]'::jsonb END \
             ) AS t(tag) \
             WHERE t.tag ILIKE '%' || $1 || '%' \
         ) \
         AND ($2::text IS NULL OR r.dietary_pattern = $2) \
         ORDER BY name",
    )
    .bind(tag)
    .bind(pattern)
    .fetch_all(pool)
    .await
    .with_context(|| format!("failed to fetch recipes tagged {tag:?}"))?;

    Ok(rows.into_iter().map(Recipe::from).collect())
}

/// Insert a recipe or replace the existing one whose name matches
/// ignoring case and spacing.
pub async fn upsert_recipe(pool: &PgPool, recipe: &Recipe) -> Result<()> {
    sqlx::query(
        "INSERT INTO recipes (name, dietary_pattern, allergens, tags, ingredients, cuisine) \
         VALUES ($1, $2, $3, $4, $5, $6) \
         ON CONFLICT (name_key) DO UPDATE SET \
             name = EXCLUDED.name, \
             dietary_pattern = EXCLUDED.dietary_pattern, \
             allergens = EXCLUDED.allergens, \
             tags = EXCLUDED.tags, \
             ingredients = EXCLUDED.ingredients, \
             cuisine = EXCLUDED.cuisine",
    )
    .bind(&recipe.name)
    .bind(&recipe.dietary_pattern)
    .bind(json!(recipe.allergens))
    .bind(json!(recipe.tags))
    .bind(json!(recipe.ingredients))
    .bind(&recipe.cuisine)
    .execute(pool)
    .await
    .with_context(|| format!("failed to upsert recipe {:?}", recipe.name))?;

    Ok(())
}
