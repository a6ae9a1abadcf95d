//! PostgreSQL-backed [`Catalog`] and [`PlanStore`].

use std::collections::{HashMap, HashSet};

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::PgPool;
use tracing::debug;
use uuid::Uuid;

use hearth_db::models::{Exercise, NewMeal, NewWorkoutBlock, Profile, Recipe};
use hearth_db::queries::{exercises, plan_days, profiles, recipes, workout_days};

use super::{Catalog, PlanStore};

/// Both repository traits over one connection pool.
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

/// Dates from `days` that have no entry in `existing`.
fn missing_dates(days: &[NaiveDate], existing: &HashMap<NaiveDate, Uuid>) -> Vec<NaiveDate> {
    days.iter()
        .copied()
        .filter(|d| !existing.contains_key(d))
        .collect()
}

#[async_trait]
impl Catalog for PgStore {
    async fn recipes_by_tag(&self, tag: &str, pattern: Option<&str>) -> Result<Vec<Recipe>> {
        recipes::recipes_by_tag(&self.pool, tag, pattern).await
    }

    async fn exercises(&self) -> Result<Vec<Exercise>> {
        exercises::list_exercises(&self.pool).await
    }
}

#[async_trait]
impl PlanStore for PgStore {
    async fn profiles(&self) -> Result<Vec<Profile>> {
        profiles::list_profiles(&self.pool).await
    }

    async fn ensure_plan_days(
        &self,
        user_id: Uuid,
        days: &[NaiveDate],
    ) -> Result<HashMap<NaiveDate, Uuid>> {
        let mut existing: HashMap<NaiveDate, Uuid> =
            plan_days::plan_days_for_dates(&self.pool, user_id, days)
                .await?
                .into_iter()
                .map(|d| (d.day, d.id))
                .collect();

        let missing = missing_dates(days, &existing);
        if !missing.is_empty() {
            let created = plan_days::insert_plan_days(&self.pool, user_id, &missing).await?;
            debug!(user_id = %user_id, created, "created plan days");
            existing.extend(
                plan_days::plan_days_for_dates(&self.pool, user_id, &missing)
                    .await?
                    .into_iter()
                    .map(|d| (d.day, d.id)),
            );
        }

        Ok(existing)
    }

    async fn ensure_workout_days(
        &self,
        user_id: Uuid,
        days: &[NaiveDate],
    ) -> Result<HashMap<NaiveDate, Uuid>> {
        let mut existing: HashMap<NaiveDate, Uuid> =
            workout_days::workout_days_for_dates(&self.pool, user_id, days)
                .await?
                .into_iter()
                .map(|d| (d.day, d.id))
                .collect();

        let missing = missing_dates(days, &existing);
        if !missing.is_empty() {
            let created = workout_days::insert_workout_days(&self.pool, user_id, &missing).await?;
            debug!(user_id = %user_id, created, "created workout days");
            existing.extend(
                workout_days::workout_days_for_dates(&self.pool, user_id, &missing)
                    .await?
                    .into_iter()
                    .map(|d| (d.day, d.id)),
            );
        }

        Ok(existing)
    }

    async fn plan_days_with_meals(&self, plan_day_ids: &[Uuid]) -> Result<HashSet<Uuid>> {
        Ok(plan_days::plan_days_with_meals(&self.pool, plan_day_ids)
            .await?
            .into_iter()
            .collect())
    }

    async fn workout_days_with_blocks(&self, workout_day_ids: &[Uuid]) -> Result<HashSet<Uuid>> {
        Ok(workout_days::workout_days_with_blocks(&self.pool, workout_day_ids)
            .await?
            .into_iter()
            .collect())
    }

    async fn insert_generated(
        &self,
        meals: &[NewMeal],
        blocks: &[NewWorkoutBlock],
    ) -> Result<(u64, u64)> {
        let mut tx = self.pool.begin().await.context("failed to begin transaction")?;

        let meal_count = plan_days::insert_meals(&mut *tx, meals).await?;
        let block_count = workout_days::insert_blocks(&mut *tx, blocks).await?;

        tx.commit().await.context("failed to commit generated rows")?;
        Ok((meal_count, block_count))
    }
}
