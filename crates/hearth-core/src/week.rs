//! Week orchestrator: fills the current and next week for every profile.
//!
//! A unit of work is one (user, week). For each unit the generator first
//! makes sure all fourteen day containers exist (meal and workout track),
//! then plans only the dates whose container is still empty, and finally
//! writes every generated row in one batch. Units are independent: a failing
//! unit is reported and the run moves on.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::{NaiveDate, Utc};
use futures::future::join_all;
use tokio::sync::Semaphore;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use uuid::Uuid;

use hearth_db::models::{Exercise, MealType, NewMeal, NewWorkoutBlock, Profile};

use crate::config::GeneratorConfig;
use crate::planner::calendar::{monday_of, target_mondays, today_in, week_dates};
use crate::planner::{Constraints, DayPlan, MealPools, SeededRng, plan_day, seed_key};
use crate::store::{Catalog, PlanStore};

/// Rows written for one (user, week).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WeekCounts {
    pub meals_inserted: u64,
    pub blocks_inserted: u64,
    /// Plan days left alone because they already had meals.
    pub meal_days_skipped: usize,
    /// Workout days left alone because they already had blocks.
    pub workout_days_skipped: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnitOutcome {
    Generated(WeekCounts),
    Failed { error: String },
    /// Not started because the run was cancelled.
    Skipped,
}

/// Result of one (user, week) unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnitReport {
    pub user_id: Uuid,
    pub week_start: NaiveDate,
    pub outcome: UnitOutcome,
}

impl fmt::Display for UnitReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} week of {}: ", self.user_id, self.week_start)?;
        match &self.outcome {
            UnitOutcome::Generated(c) => write!(
                f,
                "{} meals, {} blocks inserted ({} meal days / {} workout days already filled)",
                c.meals_inserted, c.blocks_inserted, c.meal_days_skipped, c.workout_days_skipped
            ),
            UnitOutcome::Failed { error } => write!(f, "failed: {error}"),
            UnitOutcome::Skipped => f.write_str("skipped (cancelled)"),
        }
    }
}

/// Drives the day planner across users and weeks.
#[derive(Clone)]
pub struct WeekGenerator {
    catalog: Arc<dyn Catalog>,
    store: Arc<dyn PlanStore>,
    config: GeneratorConfig,
}

impl WeekGenerator {
    pub fn new(
        catalog: Arc<dyn Catalog>,
        store: Arc<dyn PlanStore>,
        config: GeneratorConfig,
    ) -> Self {
        Self {
            catalog,
            store,
            config,
        }
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Today's date in the reference offset.
    pub fn today(&self) -> NaiveDate {
        today_in(self.config.reference_offset, Utc::now())
    }

    /// Generate this week and next for every profile (or only `only_user`).
    ///
    /// Fails only if the profile list cannot be read; per-unit failures are
    /// carried in the returned reports, sorted by user then week.
    pub async fn run(
        &self,
        today: NaiveDate,
        only_user: Option<Uuid>,
        cancel: CancellationToken,
    ) -> Result<Vec<UnitReport>> {
        let profiles: Vec<Profile> = self
            .store
            .profiles()
            .await
            .context("failed to load profiles")?
            .into_iter()
            .filter(|p| only_user.is_none_or(|id| p.user_id == id))
            .collect();

        let mondays = target_mondays(today);
        let workers = self.config.max_workers.clamp(1, Semaphore::MAX_PERMITS);
        info!(
            users = profiles.len(),
            weeks = %format!("{} and {}", mondays[0], mondays[1]),
            workers,
            "starting plan generation"
        );

        let semaphore = Arc::new(Semaphore::new(workers));
        let mut handles = Vec::new();
        let mut reports = Vec::new();

        for profile in profiles {
            for monday in mondays {
                let permit = tokio::select! {
                    biased;
                    () = cancel.cancelled() => None,
                    permit = Arc::clone(&semaphore).acquire_owned() => permit.ok(),
                };
                let Some(permit) = permit else {
                    reports.push(UnitReport {
                        user_id: profile.user_id,
                        week_start: monday,
                        outcome: UnitOutcome::Skipped,
                    });
                    continue;
                };

                let generator = self.clone();
                let unit_profile = profile.clone();
                let handle = tokio::spawn(async move {
                    let _permit = permit;
                    generator.run_unit(&unit_profile, monday).await
                });
                handles.push((profile.user_id, monday, handle));
            }
        }

        let (units, tasks): (Vec<_>, Vec<_>) = handles
            .into_iter()
            .map(|(user_id, monday, handle)| ((user_id, monday), handle))
            .unzip();
        for ((user_id, week_start), joined) in units.into_iter().zip(join_all(tasks).await) {
            let outcome = match joined {
                Ok(outcome) => outcome,
                Err(e) => UnitOutcome::Failed {
                    error: format!("worker task panicked: {e}"),
                },
            };
            reports.push(UnitReport {
                user_id,
                week_start,
                outcome,
            });
        }

        reports.sort_by_key(|r| (r.user_id, r.week_start));
        Ok(reports)
    }

    async fn run_unit(&self, profile: &Profile, monday: NaiveDate) -> UnitOutcome {
        match self.generate_week(profile, monday).await {
            Ok(counts) => {
                info!(
                    user_id = %profile.user_id,
                    week = %monday,
                    meals = counts.meals_inserted,
                    blocks = counts.blocks_inserted,
                    "week generated"
                );
                UnitOutcome::Generated(counts)
            }
            Err(e) => {
                warn!(user_id = %profile.user_id, week = %monday, error = %format!("{e:#}"), "week generation failed");
                UnitOutcome::Failed {
                    error: format!("{e:#}"),
                }
            }
        }
    }

    /// Fill the week starting `monday` for one profile.
    ///
    /// Containers are created for all seven dates on both tracks before any
    /// content is planned. A container that already has a child row is not
    /// touched, so running this twice inserts nothing the second time.
    pub async fn generate_week(&self, profile: &Profile, monday: NaiveDate) -> Result<WeekCounts> {
        let user_id = profile.user_id;
        let dates = week_dates(monday);

        let plan_days = self.store.ensure_plan_days(user_id, &dates).await?;
        let workout_days = self.store.ensure_workout_days(user_id, &dates).await?;

        let plan_ids = container_ids(&plan_days, &dates, "plan day")?;
        let workout_ids = container_ids(&workout_days, &dates, "workout day")?;

        let with_meals = self.store.plan_days_with_meals(&plan_ids).await?;
        let with_blocks = self.store.workout_days_with_blocks(&workout_ids).await?;

        let mut counts = WeekCounts {
            meal_days_skipped: with_meals.len(),
            workout_days_skipped: with_blocks.len(),
            ..WeekCounts::default()
        };

        let pending = pending_days(&dates, &plan_ids, &workout_ids, &with_meals, &with_blocks);
        if pending.is_empty() {
            debug!(user_id = %user_id, week = %monday, "week already populated");
            return Ok(counts);
        }

        let (pools, exercises) = self.load_pools(profile).await?;

        let mut meals = Vec::new();
        let mut blocks = Vec::new();
        for day in pending {
            let plan = self.plan_for(user_id, monday, day.date, &pools, &exercises);
            if let Some(plan_day_id) = day.plan_day {
                meals.extend(plan.meals.into_iter().map(|m| NewMeal {
                    plan_day_id,
                    meal_type: m.meal_type,
                    recipe_name: m.recipe_name,
                }));
            }
            if let Some(workout_day_id) = day.workout_day {
                blocks.extend(plan.blocks.into_iter().map(|b| NewWorkoutBlock {
                    workout_day_id,
                    position: b.position,
                    kind: b.kind,
                    title: b.title,
                    details: b.details,
                }));
            }
        }

        let (meals_inserted, blocks_inserted) = self
            .store
            .insert_generated(&meals, &blocks)
            .await
            .with_context(|| format!("failed to write plan rows for week of {monday}"))?;
        counts.meals_inserted = meals_inserted;
        counts.blocks_inserted = blocks_inserted;

        Ok(counts)
    }

    /// Plan `date` for `profile` without writing anything.
    ///
    /// Uses the same seed and pools as [`Self::generate_week`], so the result
    /// matches what generation writes for a date that is still empty.
    pub async fn preview_day(&self, profile: &Profile, date: NaiveDate) -> Result<DayPlan> {
        let (pools, exercises) = self.load_pools(profile).await?;
        Ok(self.plan_for(profile.user_id, monday_of(date), date, &pools, &exercises))
    }

    fn plan_for(
        &self,
        user_id: Uuid,
        monday: NaiveDate,
        date: NaiveDate,
        pools: &MealPools,
        exercises: &[Exercise],
    ) -> DayPlan {
        let mut rng = SeededRng::from_key(&seed_key(user_id, monday, date));
        plan_day(date, pools, exercises, &mut rng, self.config.cuisine_cap)
    }

    /// Fetch the candidate pools once per unit and filter them for `profile`.
    async fn load_pools(&self, profile: &Profile) -> Result<(MealPools, Vec<Exercise>)> {
        let constraints = Constraints::new(profile);
        let pattern = (self.config.strict_pattern_match && constraints.is_vegetarian()).then_some("veg");

        let mut pools = MealPools::default();
        for meal_type in MealType::ALL {
            let recipes = self
                .catalog
                .recipes_by_tag(meal_type.catalog_tag(), pattern)
                .await
                .with_context(|| format!("failed to load {meal_type} recipes"))?;
            *pools.pool_mut(meal_type) = recipes
                .into_iter()
                .filter(|r| constraints.admits_recipe(r))
                .collect();
        }

        let exercises = self
            .catalog
            .exercises()
            .await
            .context("failed to load exercises")?
            .into_iter()
            .filter(|e| constraints.admits_exercise(e))
            .collect();

        Ok((pools, exercises))
    }
}

/// A date that still needs content on at least one track.
struct PendingDay {
    date: NaiveDate,
    plan_day: Option<Uuid>,
    workout_day: Option<Uuid>,
}

fn container_ids(
    containers: &HashMap<NaiveDate, Uuid>,
    dates: &[NaiveDate],
    label: &str,
) -> Result<Vec<Uuid>> {
    dates
        .iter()
        .map(|d| {
            containers
                .get(d)
                .copied()
                .with_context(|| format!("{label} for {d} is missing after insert"))
        })
        .collect()
}

fn pending_days(
    dates: &[NaiveDate],
    plan_ids: &[Uuid],
    workout_ids: &[Uuid],
    with_meals: &HashSet<Uuid>,
    with_blocks: &HashSet<Uuid>,
) -> Vec<PendingDay> {
    dates
        .iter()
        .zip(plan_ids.iter().zip(workout_ids))
        .filter_map(|(&date, (plan_id, workout_id))| {
            let plan_day = (!with_meals.contains(plan_id)).then_some(*plan_id);
            let workout_day = (!with_blocks.contains(workout_id)).then_some(*workout_id);
            (plan_day.is_some() || workout_day.is_some()).then_some(PendingDay {
                date,
                plan_day,
                workout_day,
            })
        })
        .collect()
}
