//! Database query functions for the `plan_days` and `meals` tables.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use sqlx::{FromRow, PgConnection, PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::models::{Meal, NewMeal, PlanDay};

/// Fetch the plan days that exist for `user_id` on any of `days`.
pub async fn plan_days_for_dates(
    pool: &PgPool,
    user_id: Uuid,
    days: &[NaiveDate],
) -> Result<Vec<PlanDay>> {
    let rows = sqlx::query_as::<_, PlanDay>(
        "SELECT * FROM plan_days WHERE user_id = $1 AND day = ANY($2) ORDER BY day",
    )
    .bind(user_id)
    .bind(days)
    .fetch_all(pool)
    .await
    .context("failed to fetch plan days")?;

    Ok(rows)
}

/// Insert one plan day per date in a single statement.
///
/// Dates that already have a container are left alone (`ON CONFLICT DO
/// NOTHING`). Returns the number of rows created.
pub async fn insert_plan_days(pool: &PgPool, user_id: Uuid, days: &[NaiveDate]) -> Result<u64> {
    if days.is_empty() {
        return Ok(0);
    }

    let result = sqlx::query(
        "INSERT INTO plan_days (user_id, day) \
         SELECT $1, d FROM unnest($2::date[]) AS d \
         ON CONFLICT (user_id, day) DO NOTHING",
    )
    .bind(user_id)
    .bind(days)
    .execute(pool)
    .await
    .context("failed to insert plan days")?;

    Ok(result.rows_affected())
}

/// Return the subset of `plan_day_ids` that already own at least one meal.
pub async fn plan_days_with_meals(pool: &PgPool, plan_day_ids: &[Uuid]) -> Result<Vec<Uuid>> {
    if plan_day_ids.is_empty() {
        return Ok(Vec::new());
    }

    let ids: Vec<Uuid> =
        sqlx::query_scalar("SELECT DISTINCT plan_day_id FROM meals WHERE plan_day_id = ANY($1)")
            .bind(plan_day_ids)
            .fetch_all(pool)
            .await
            .context("failed to check populated plan days")?;

    Ok(ids)
}

/// Insert all meals in one multi-row statement.
pub async fn insert_meals(conn: &mut PgConnection, meals: &[NewMeal]) -> Result<u64> {
    if meals.is_empty() {
        return Ok(0);
    }

    let mut builder =
        QueryBuilder::<Postgres>::new("INSERT INTO meals (plan_day_id, meal_type, recipe_name) ");
    builder.push_values(meals, |mut row, meal| {
        row.push_bind(meal.plan_day_id)
            .push_bind(meal.meal_type)
            .push_bind(&meal.recipe_name);
    });

    let result = builder
        .build()
        .execute(conn)
        .await
        .context("failed to insert meals")?;

    Ok(result.rows_affected())
}

/// A meal joined with the date of its plan day.
#[derive(Debug, Clone, FromRow)]
pub struct DatedMeal {
    pub day: NaiveDate,
    #[sqlx(flatten)]
    pub meal: Meal,
}

/// List a user's meals between `from` and `to` (inclusive), ordered by day
/// then slot.
pub async fn meals_in_range(
    pool: &PgPool,
    user_id: Uuid,
    from: NaiveDate,
    to: NaiveDate,
) -> Result<Vec<DatedMeal>> {
    let rows = sqlx::query_as::<_, DatedMeal>(
        "SELECT pd.day, m.* \
         FROM meals m \
         JOIN plan_days pd ON pd.id = m.plan_day_id \
         WHERE pd.user_id = $1 AND pd.day BETWEEN $2 AND $3 \
         ORDER BY pd.day, \
             CASE m.meal_type WHEN 'breakfast' THEN 0 WHEN 'lunch' THEN 1 ELSE 2 END",
    )
    .bind(user_id)
    .bind(from)
    .bind(to)
    .fetch_all(pool)
    .await
    .context("failed to fetch meals in range")?;

    Ok(rows)
}
