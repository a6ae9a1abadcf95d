//! Database query functions for the `exercises` catalog.

use anyhow::{Context, Result};
use serde_json::json;
use sqlx::PgPool;

use crate::models::{Exercise, ExerciseRow};

/// Fetch the whole exercise catalog, ordered by name.
pub async fn list_exercises(pool: &PgPool) -> Result<Vec<Exercise>> {
    let rows = sqlx::query_as::<_, ExerciseRow>(
        "SELECT name, tags, equipment, contraindications, description \
         FROM exercises ORDER BY name",
    )
    .fetch_all(pool)
    .await
    .context("failed to list exercises")?;

    Ok(rows.into_iter().map(Exercise::from).collect())
}

/// Insert an exercise or replace the existing one whose name matches
/// ignoring case and spacing.
pub async fn upsert_exercise(pool: &PgPool, exercise: &Exercise) -> Result<()> {
    sqlx::query(
        "INSERT INTO exercises (name, tags, equipment, contraindications, description) \
         VALUES ($1, $2, $3, $4, $5) \
         ON CONFLICT (name_key) DO UPDATE SET \
             name = EXCLUDED.name, \
             tags = EXCLUDED.tags, \
             equipment = EXCLUDED.equipment, \
             contraindications = EXCLUDED.contraindications, \
             description = EXCLUDED.description",
    )
    .bind(&exercise.name)
    .bind(json!(exercise.tags))
    .bind(json!(exercise.equipment))
    .bind(json!(exercise.contraindications))
    .bind(&exercise.description)
    .execute(pool)
    .await
    .with_context(|| format!("failed to upsert exercise {:?}", exercise.name))?;

    Ok(())
}
