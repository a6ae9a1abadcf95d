//! Database query functions for the `profiles` table.

use anyhow::{Context, Result};
use serde_json::json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::{Profile, ProfileRow};

const PROFILE_COLUMNS: &str = "user_id, dietary_pattern, meat_policy, allergies, dislikes, \
     cuisine_prefs, injuries, health_conditions, equipment";

/// List every profile, ordered by user id.
pub async fn list_profiles(pool: &PgPool) -> Result<Vec<Profile>> {
    let rows = sqlx::query_as::<_, ProfileRow>(&format!(
        "SELECT {PROFILE_COLUMNS} FROM profiles ORDER BY user_id"
    ))
    .fetch_all(pool)
    .await
    .context("failed to list profiles")?;

    Ok(rows.into_iter().map(Profile::from).collect())
}

/// Fetch a single profile by user id.
pub async fn get_profile(pool: &PgPool, user_id: Uuid) -> Result<Option<Profile>> {
    let row = sqlx::query_as::<_, ProfileRow>(&format!(
        "SELECT {PROFILE_COLUMNS} FROM profiles WHERE user_id = $1"
    ))
    .bind(user_id)
    .fetch_optional(pool)
    .await
    .context("failed to fetch profile")?;

    Ok(row.map(Profile::from))
}

/// Insert or replace a profile.
///
/// Profiles are normally written by the account layer; this exists for
/// seeding and tests.
pub async fn upsert_profile(pool: &PgPool, profile: &Profile) -> Result<()> {
    sqlx::query(
        "INSERT INTO profiles \
             (user_id, dietary_pattern, meat_policy, allergies, dislikes, \
              cuisine_prefs, injuries, health_conditions, equipment) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9) \
         ON CONFLICT (user_id) DO UPDATE SET \
             dietary_pattern = EXCLUDED.dietary_pattern, \
             meat_policy = EXCLUDED.meat_policy, \
             allergies = EXCLUDED.allergies, \
             dislikes = EXCLUDED.dislikes, \
             cuisine_prefs = EXCLUDED.cuisine_prefs, \
             injuries = EXCLUDED.injuries, \
             health_conditions = EXCLUDED.health_conditions, \
             equipment = EXCLUDED.equipment",
    )
    .bind(profile.user_id)
    .bind(&profile.dietary_pattern)
    .bind(&profile.meat_policy)
    .bind(json!(profile.allergies))
    .bind(json!(profile.dislikes))
    .bind(json!(profile.cuisine_prefs))
    .bind(json!(profile.injuries))
    .bind(json!(profile.health_conditions))
    .bind(json!(profile.equipment))
    .execute(pool)
    .await
    .with_context(|| format!("failed to upsert profile {}", profile.user_id))?;

    Ok(())
}
