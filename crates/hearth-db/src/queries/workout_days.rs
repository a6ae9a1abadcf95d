//! Database query functions for the `workout_days` and `workout_blocks`
//! tables.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use sqlx::{FromRow, PgConnection, PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::models::{NewWorkoutBlock, WorkoutBlock, WorkoutDay};

/// Fetch the workout days that exist for `user_id` on any of `days`.
pub async fn workout_days_for_dates(
    pool: &PgPool,
    user_id: Uuid,
    days: &[NaiveDate],
) -> Result<Vec<WorkoutDay>> {
    let rows = sqlx::query_as::<_, WorkoutDay>(
        "SELECT * FROM workout_days WHERE user_id = $1 AND day = ANY($2) ORDER BY day",
    )
    .bind(user_id)
    .bind(days)
    .fetch_all(pool)
    .await
    .context("failed to fetch workout days")?;

    Ok(rows)
}

/// Insert one workout day per date, skipping dates that already have one.
/// Returns the number of rows created.
pub async fn insert_workout_days(
    pool: &PgPool,
    user_id: Uuid,
    days: &[NaiveDate],
) -> Result<u64> {
    if days.is_empty() {
        return Ok(0);
    }

    let result = sqlx::query(
        "INSERT INTO workout_days (user_id, day) \
         SELECT $1, d FROM unnest($2::date[]) AS d \
         ON CONFLICT (user_id, day) DO NOTHING",
    )
    .bind(user_id)
    .bind(days)
    .execute(pool)
    .await
    .context("failed to insert workout days")?;

    Ok(result.rows_affected())
}

/// Return the subset of `workout_day_ids` that already own at least one
/// block.
pub async fn workout_days_with_blocks(
    pool: &PgPool,
    workout_day_ids: &[Uuid],
) -> Result<Vec<Uuid>> {
    if workout_day_ids.is_empty() {
        return Ok(Vec::new());
    }

    let ids: Vec<Uuid> = sqlx::query_scalar(
        "SELECT DISTINCT workout_day_id FROM workout_blocks WHERE workout_day_id = ANY($1)",
    )
    .bind(workout_day_ids)
    .fetch_all(pool)
    .await
    .context("failed to check populated workout days")?;

    Ok(ids)
}

/// Insert all blocks in one multi-row statement.
pub async fn insert_blocks(conn: &mut PgConnection, blocks: &[NewWorkoutBlock]) -> Result<u64> {
    if blocks.is_empty() {
        return Ok(0);
    }

    let mut builder = QueryBuilder::<Postgres>::new(
        "INSERT INTO workout_blocks (workout_day_id, position, kind, title, details) ",
    );
    builder.push_values(blocks, |mut row, block| {
        row.push_bind(block.workout_day_id)
            .push_bind(block.position)
            .push_bind(block.kind)
            .push_bind(&block.title)
            .push_bind(&block.details);
    });

    let result = builder
        .build()
        .execute(conn)
        .await
        .context("failed to insert workout blocks")?;

    Ok(result.rows_affected())
}

/// A block joined with the date of its workout day.
#[derive(Debug, Clone, FromRow)]
pub struct DatedBlock {
    pub day: NaiveDate,
    #[sqlx(flatten)]
    pub block: WorkoutBlock,
}

/// List a user's workout blocks between `from` and `to` (inclusive),
/// ordered by day then position.
pub async fn blocks_in_range(
    pool: &PgPool,
    user_id: Uuid,
    from: NaiveDate,
    to: NaiveDate,
) -> Result<Vec<DatedBlock>> {
    let rows = sqlx::query_as::<_, DatedBlock>(
        "SELECT wd.day, wb.* \
         FROM workout_blocks wb \
         JOIN workout_days wd ON wd.id = wb.workout_day_id \
         WHERE wd.user_id = $1 AND wd.day BETWEEN $2 AND $3 \
         ORDER BY wd.day, wb.position",
    )
    .bind(user_id)
    .bind(from)
    .bind(to)
    .fetch_all(pool)
    .await
    .context("failed to fetch workout blocks in range")?;

    Ok(rows)
}
