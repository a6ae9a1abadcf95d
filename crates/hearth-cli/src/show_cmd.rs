//! `hearth show` and `hearth preview`: print a stored week or a dry-run day.

use std::collections::BTreeMap;
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::{DateTime, FixedOffset, NaiveDate, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use hearth_core::planner::calendar::{monday_of, today_in, week_dates};
use hearth_core::planner::DayPlan;
use hearth_core::store::PgStore;
use hearth_core::{GeneratorConfig, WeekGenerator};
use hearth_db::queries::plan_days::{self, DatedMeal};
use hearth_db::queries::profiles;
use hearth_db::queries::workout_days::{self, DatedBlock};

/// Print the persisted meals and workout blocks of the week containing
/// `date` (today when `None`).
pub async fn run_show(
    pool: &PgPool,
    config: GeneratorConfig,
    user_id: Uuid,
    date: Option<NaiveDate>,
) -> Result<()> {
    let dates = week_containing(date, config.reference_offset, Utc::now());
    let (from, to) = (dates[0], dates[6]);

    let meals = plan_days::meals_in_range(pool, user_id, from, to).await?;
    let blocks = workout_days::blocks_in_range(pool, user_id, from, to).await?;

    println!("Week of {from} for {user_id}");
    if meals.is_empty() && blocks.is_empty() {
        println!();
        println!("Nothing generated yet. Run `hearth generate --user {user_id}`.");
        return Ok(());
    }

    let mut by_day: BTreeMap<NaiveDate, (Vec<&DatedMeal>, Vec<&DatedBlock>)> = BTreeMap::new();
    for meal in &meals {
        by_day.entry(meal.day).or_default().0.push(meal);
    }
    for block in &blocks {
        by_day.entry(block.day).or_default().1.push(block);
    }

    for day in dates {
        println!();
        println!("{} {day}", day.format("%a"));
        let Some((day_meals, day_blocks)) = by_day.get(&day) else {
            println!("  (empty)");
            continue;
        };
        for m in day_meals {
            println!("  {:<10} {}", m.meal.meal_type.to_string(), m.meal.recipe_name);
        }
        for b in day_blocks {
            println!(
                "  {}. {:<9} {} ({})",
                b.block.position,
                b.block.kind.to_string(),
                b.block.title,
                b.block.details
            );
        }
    }

    Ok(())
}

/// The Monday..Sunday week containing `date`, or today's week in `offset`.
fn week_containing(
    date: Option<NaiveDate>,
    offset: FixedOffset,
    now: DateTime<Utc>,
) -> [NaiveDate; 7] {
    week_dates(monday_of(date.unwrap_or_else(|| today_in(offset, now))))
}

/// Plan one day for `user_id` without writing anything.
pub async fn run_preview(
    pool: &PgPool,
    config: GeneratorConfig,
    user_id: Uuid,
    date: Option<NaiveDate>,
    json: bool,
) -> Result<()> {
    let profile = profiles::get_profile(pool, user_id)
        .await?
        .with_context(|| format!("profile {user_id} not found"))?;

    let store = Arc::new(PgStore::new(pool.clone()));
    let generator = WeekGenerator::new(store.clone(), store, config);
    let date = date.unwrap_or_else(|| generator.today());
    let plan = generator.preview_day(&profile, date).await?;

    if json {
        let out = serde_json::to_string_pretty(&plan).context("failed to serialize day plan")?;
        println!("{out}");
    } else {
        print_day(&plan);
    }
    Ok(())
}

fn print_day(plan: &DayPlan) {
    println!("{} {} (focus: {})", plan.date.format("%a"), plan.date, plan.focus);
    println!();
    println!("Meals:");
    for m in &plan.meals {
        println!("  {:<10} {}", m.meal_type.to_string(), m.recipe_name);
    }
    println!();
    println!("Workout:");
    for b in &plan.blocks {
        println!("  {}. {:<9} {} ({})", b.position, b.kind.to_string(), b.title, b.details);
    }
}
