//! In-memory `Catalog` / `PlanStore` used by the orchestrator tests.

#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use anyhow::{Result, bail};
use async_trait::async_trait;
use chrono::NaiveDate;
use uuid::Uuid;

use hearth_core::planner::tags::tag_contains;
use hearth_core::store::{Catalog, PlanStore};
use hearth_db::models::{Exercise, NewMeal, NewWorkoutBlock, Profile, Recipe};

#[derive(Default)]
pub struct MemoryCatalog {
    pub recipes: Vec<Recipe>,
    pub exercises: Vec<Exercise>,
}

#[async_trait]
impl Catalog for MemoryCatalog {
    async fn recipes_by_tag(&self, tag: &str, pattern: Option<&str>) -> Result<Vec<Recipe>> {
        Ok(self
            .recipes
            .iter()
            .filter(|r| tag_contains(&r.tags, tag))
            .filter(|r| pattern.is_none_or(|p| r.dietary_pattern == p))
            .cloned()
            .collect())
    }

    async fn exercises(&self) -> Result<Vec<Exercise>> {
        Ok(self.exercises.clone())
    }
}

#[derive(Default)]
struct Tables {
    plan_days: HashMap<(Uuid, NaiveDate), Uuid>,
    workout_days: HashMap<(Uuid, NaiveDate), Uuid>,
    meals: Vec<NewMeal>,
    blocks: Vec<NewWorkoutBlock>,
    container_inserts: usize,
}

#[derive(Default)]
pub struct MemoryStore {
    profiles: Vec<Profile>,
    tables: Mutex<Tables>,
    /// Users whose writes fail, to exercise per-unit isolation.
    failing_users: HashSet<Uuid>,
}

impl MemoryStore {
    pub fn new(profiles: Vec<Profile>) -> Self {
        Self {
            profiles,
            ..Self::default()
        }
    }

    pub fn failing_for(mut self, user_id: Uuid) -> Self {
        self.failing_users.insert(user_id);
        self
    }

    pub fn meals(&self) -> Vec<NewMeal> {
        self.tables.lock().unwrap().meals.clone()
    }

    pub fn blocks(&self) -> Vec<NewWorkoutBlock> {
        self.tables.lock().unwrap().blocks.clone()
    }

    pub fn plan_day_count(&self) -> usize {
        self.tables.lock().unwrap().plan_days.len()
    }

    pub fn workout_day_count(&self) -> usize {
        self.tables.lock().unwrap().workout_days.len()
    }

    pub fn container_inserts(&self) -> usize {
        self.tables.lock().unwrap().container_inserts
    }

    /// Plan day id for (user, date), if created.
    pub fn plan_day_id(&self, user_id: Uuid, day: NaiveDate) -> Option<Uuid> {
        self.tables.lock().unwrap().plan_days.get(&(user_id, day)).copied()
    }

    /// Meal names of one plan day, in insertion order.
    pub fn meals_for(&self, plan_day_id: Uuid) -> Vec<String> {
        self.meals()
            .into_iter()
            .filter(|m| m.plan_day_id == plan_day_id)
            .map(|m| m.recipe_name)
            .collect()
    }

    /// Seed a meal directly, as if written by an earlier run.
    pub fn seed_meal(&self, meal: NewMeal) {
        self.tables.lock().unwrap().meals.push(meal);
    }

    fn owner_of_plan_day(tables: &Tables, id: Uuid) -> Option<Uuid> {
        tables
            .plan_days
            .iter()
            .find(|(_, v)| **v == id)
            .map(|((user, _), _)| *user)
    }
}

fn ensure(
    map: &mut HashMap<(Uuid, NaiveDate), Uuid>,
    inserts: &mut usize,
    user_id: Uuid,
    days: &[NaiveDate],
) -> HashMap<NaiveDate, Uuid> {
    days.iter()
        .map(|&day| {
            let id = *map.entry((user_id, day)).or_insert_with(|| {
                *inserts += 1;
                Uuid::new_v4()
            });
            (day, id)
        })
        .collect()
}

#[async_trait]
impl PlanStore for MemoryStore {
    async fn profiles(&self) -> Result<Vec<Profile>> {
        Ok(self.profiles.clone())
    }

    async fn ensure_plan_days(
        &self,
        user_id: Uuid,
        days: &[NaiveDate],
    ) -> Result<HashMap<NaiveDate, Uuid>> {
        let mut guard = self.tables.lock().unwrap();
        let tables = &mut *guard;
        Ok(ensure(&mut tables.plan_days, &mut tables.container_inserts, user_id, days))
    }

    async fn ensure_workout_days(
        &self,
        user_id: Uuid,
        days: &[NaiveDate],
    ) -> Result<HashMap<NaiveDate, Uuid>> {
        let mut guard = self.tables.lock().unwrap();
        let tables = &mut *guard;
        Ok(ensure(&mut tables.workout_days, &mut tables.container_inserts, user_id, days))
    }

    async fn plan_days_with_meals(&self, plan_day_ids: &[Uuid]) -> Result<HashSet<Uuid>> {
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .meals
            .iter()
            .map(|m| m.plan_day_id)
            .filter(|id| plan_day_ids.contains(id))
            .collect())
    }

    async fn workout_days_with_blocks(&self, workout_day_ids: &[Uuid]) -> Result<HashSet<Uuid>> {
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .blocks
            .iter()
            .map(|b| b.workout_day_id)
            .filter(|id| workout_day_ids.contains(id))
            .collect())
    }

    async fn insert_generated(
        &self,
        meals: &[NewMeal],
        blocks: &[NewWorkoutBlock],
    ) -> Result<(u64, u64)> {
        let mut tables = self.tables.lock().unwrap();
        if let Some(first) = meals.first() {
            if let Some(owner) = Self::owner_of_plan_day(&tables, first.plan_day_id) {
                if self.failing_users.contains(&owner) {
                    bail!("simulated write failure for {owner}");
                }
            }
        }
        tables.meals.extend_from_slice(meals);
        tables.blocks.extend_from_slice(blocks);
        Ok((meals.len() as u64, blocks.len() as u64))
    }
}

pub fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

pub fn recipe(name: &str, pattern: &str, allergens: &[&str], tags: &[&str], cuisine: &str) -> Recipe {
    Recipe {
        name: name.into(),
        dietary_pattern: pattern.into(),
        allergens: strings(allergens),
        tags: strings(tags),
        ingredients: Vec::new(),
        cuisine: cuisine.into(),
    }
}

pub fn exercise(name: &str, tags: &[&str], equipment: &[&str], description: &str) -> Exercise {
    Exercise {
        name: name.into(),
        tags: strings(tags),
        equipment: strings(equipment),
        contraindications: Vec::new(),
        description: description.into(),
    }
}

/// A mixed catalog: veg and meat dishes across cuisines, some with peanut,
/// and at least two exercises per focus tag (some needing equipment).
pub fn sample_catalog() -> MemoryCatalog {
    let recipes = vec![
        recipe("Masala Oats", "veg", &[], &["Breakfast"], "indian"),
        recipe("Poha", "veg", &["peanut"], &["Breakfast"], "indian"),
        recipe("Veg Oats Bowl", "veg", &[], &["Breakfast"], "continental"),
        recipe("Peanut Butter Toast", "veg", &["peanut"], &["Breakfast"], "continental"),
        recipe("Chicken Omelette", "non_veg", &["egg"], &["Breakfast"], "continental"),
        recipe("Idli Sambar", "veg", &[], &["Breakfast", "Dinner"], "south indian"),
        recipe("Rajma Chawal", "veg", &[], &["Lunch"], "indian"),
        recipe("Grilled Chicken Bowl", "non_veg", &[], &["Lunch"], "continental"),
        recipe("Paneer Wrap", "veg", &["dairy"], &["Lunch"], "indian"),
        recipe("Satay Tofu Salad", "veg", &["peanut", "soy"], &["Lunch"], "thai"),
        recipe("Chole Rice", "veg", &[], &["Lunch", "Dinner"], "indian"),
        recipe("Veg Pulao", "veg", &[], &["Lunch", "Dinner"], "indian"),
        recipe("Fish Curry", "non_veg", &["fish"], &["Dinner"], "south indian"),
        recipe("Palak Paneer", "veg", &["dairy"], &["Dinner"], "indian"),
        recipe("Thai Green Curry", "veg", &[], &["Dinner"], "thai"),
        recipe("Kung Pao Peanut Tofu", "veg", &["peanut"], &["Dinner"], "chinese"),
        recipe("Mutton Biryani", "non_veg", &[], &["Dinner"], "indian"),
        recipe("Dal Khichdi", "", &[], &["Dinner"], "indian"),
    ];

    let mut exercises = Vec::new();
    for focus in ["push", "pull", "legs", "core", "hinge", "squat", "cardio"] {
        exercises.push(exercise(&format!("{focus} bodyweight"), &[focus], &[], "3 x 12"));
        exercises.push(exercise(&format!("{focus} band"), &[focus], &["band"], "3 x 15"));
        exercises.push(exercise(&format!("{focus} dumbbell"), &[focus], &["dumbbell"], ""));
    }

    MemoryCatalog { recipes, exercises }
}
