//! Repository seams for the generator.
//!
//! [`Catalog`] is the read-only source of candidates; [`PlanStore`] reads
//! profiles and owns the day containers and their rows. The week generator
//! only talks to these traits, so the selection logic runs the same against
//! PostgreSQL ([`postgres::PgStore`]) or an in-memory fake.

pub mod postgres;

use std::collections::{HashMap, HashSet};

use anyhow::Result;
use async_trait::async_trait;
use chrono::NaiveDate;
use uuid::Uuid;

use hearth_db::models::{Exercise, NewMeal, NewWorkoutBlock, Profile, Recipe};

pub use postgres::PgStore;

/// Read-only recipe and exercise catalogs.
#[async_trait]
pub trait Catalog: Send + Sync {
    /// Recipes with a tag containing `tag` (case-insensitive). `pattern`, when
    /// given, restricts to recipes whose dietary pattern equals it exactly.
    /// Results must come back in a stable order.
    async fn recipes_by_tag(&self, tag: &str, pattern: Option<&str>) -> Result<Vec<Recipe>>;

    /// The whole exercise catalog in a stable order.
    async fn exercises(&self) -> Result<Vec<Exercise>>;
}

/// Profiles plus the plan-day / workout-day sinks.
#[async_trait]
pub trait PlanStore: Send + Sync {
    /// Every profile, in a stable order.
    async fn profiles(&self) -> Result<Vec<Profile>>;

    /// Make sure a plan day exists for each of `days`, creating only the
    /// missing ones. Returns the container id for every requested date.
    async fn ensure_plan_days(
        &self,
        user_id: Uuid,
        days: &[NaiveDate],
    ) -> Result<HashMap<NaiveDate, Uuid>>;

    /// Workout-track counterpart of [`PlanStore::ensure_plan_days`].
    async fn ensure_workout_days(
        &self,
        user_id: Uuid,
        days: &[NaiveDate],
    ) -> Result<HashMap<NaiveDate, Uuid>>;

    /// The subset of `plan_day_ids` that already own at least one meal.
    async fn plan_days_with_meals(&self, plan_day_ids: &[Uuid]) -> Result<HashSet<Uuid>>;

    /// The subset of `workout_day_ids` that already own at least one block.
    async fn workout_days_with_blocks(&self, workout_day_ids: &[Uuid]) -> Result<HashSet<Uuid>>;

    /// Insert all generated rows for one unit. Returns `(meals, blocks)`
    /// inserted.
    async fn insert_generated(
        &self,
        meals: &[NewMeal],
        blocks: &[NewWorkoutBlock],
    ) -> Result<(u64, u64)>;
}
