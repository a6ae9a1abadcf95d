//! Assembly of a single calendar day: three meals and a five-block workout.

use std::collections::HashSet;

use chrono::NaiveDate;
use serde::Serialize;

use hearth_db::models::{BlockKind, Exercise, MealType, Recipe};

use super::calendar::day_index;
use super::rng::SeededRng;
use super::select::{choose_varied, take_by_tag_distinct};
use super::tags::name_key;

/// Primary workout focus by weekday, Monday first.
pub const FOCUS_CYCLE: [&str; 7] = ["push", "pull", "legs", "core", "hinge", "squat", "cardio"];

const WARMUP_TITLE: &str = "Warm-up";
const WARMUP_DETAILS: &str = "5 min easy cardio + dynamic mobility";
const COOLDOWN_TITLE: &str = "Cool-down";
const COOLDOWN_DETAILS: &str = "5 min walk + static stretching";
const DEFAULT_GUIDANCE: &str = "3 x 10-12";

/// Stand-ins for the three main movements, in block order.
const FALLBACK_MOVEMENTS: [(&str, &str); 3] = [
    ("Bodyweight Squat", "3 x 15"),
    ("Row (band)", "3 x 12"),
    ("Plank", "3 x 30s"),
];

/// Recipe name used when a slot has nothing admissible left.
pub fn fallback_recipe(meal_type: MealType) -> &'static str {
    match meal_type {
        MealType::Breakfast => "Oat Bowl",
        MealType::Lunch => "Chicken Wrap",
        MealType::Dinner => "Veg Stir Fry",
    }
}

/// Admissible recipes per meal slot.
#[derive(Debug, Clone, Default)]
pub struct MealPools {
    pub breakfast: Vec<Recipe>,
    pub lunch: Vec<Recipe>,
    pub dinner: Vec<Recipe>,
}

impl MealPools {
    pub fn pool(&self, meal_type: MealType) -> &[Recipe] {
        match meal_type {
            MealType::Breakfast => &self.breakfast,
            MealType::Lunch => &self.lunch,
            MealType::Dinner => &self.dinner,
        }
    }

    pub fn pool_mut(&mut self, meal_type: MealType) -> &mut Vec<Recipe> {
        match meal_type {
            MealType::Breakfast => &mut self.breakfast,
            MealType::Lunch => &mut self.lunch,
            MealType::Dinner => &mut self.dinner,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlannedMeal {
    pub meal_type: MealType,
    pub recipe_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlannedBlock {
    pub position: i32,
    pub kind: BlockKind,
    pub title: String,
    pub details: String,
}

impl PlannedBlock {
    fn new(position: i32, kind: BlockKind, title: &str, details: &str) -> Self {
        Self {
            position,
            kind,
            title: title.to_owned(),
            details: details.to_owned(),
        }
    }
}

/// One generated day, not yet persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DayPlan {
    pub date: NaiveDate,
    pub focus: &'static str,
    pub meals: Vec<PlannedMeal>,
    pub blocks: Vec<PlannedBlock>,
}

/// Plan `date` from pre-filtered pools.
///
/// Draw order from `rng` is fixed: breakfast, lunch, dinner, primary
/// movement, secondary focus shuffle, secondary movements. Callers that only
/// need one track still run the whole day so the other track's draws do not
/// shift.
pub fn plan_day(
    date: NaiveDate,
    meals: &MealPools,
    exercises: &[Exercise],
    rng: &mut SeededRng,
    cuisine_cap: usize,
) -> DayPlan {
    let mut seen = HashSet::new();
    let planned_meals = MealType::ALL
        .iter()
        .map(|&meal_type| {
            let recipe_name =
                choose_varied(meals.pool(meal_type), 1, rng, &mut seen, cuisine_cap)
                    .first()
                    .map_or_else(|| fallback_recipe(meal_type).to_owned(), |r| r.name.clone());
            PlannedMeal {
                meal_type,
                recipe_name,
            }
        })
        .collect();

    let index = day_index(date);
    let focus = FOCUS_CYCLE[index % FOCUS_CYCLE.len()];

    DayPlan {
        date,
        focus,
        meals: planned_meals,
        blocks: plan_workout(focus, exercises, rng),
    }
}

fn plan_workout(focus: &str, exercises: &[Exercise], rng: &mut SeededRng) -> Vec<PlannedBlock> {
    let mut used = HashSet::new();

    let primary = take_by_tag_distinct(exercises, focus, rng, &mut used);

    let mut others: Vec<&str> = FOCUS_CYCLE.iter().copied().filter(|f| *f != focus).collect();
    rng.shuffle(&mut others);

    let mut movements = vec![primary];
    for tag in others.iter().take(2) {
        movements.push(take_by_tag_distinct(exercises, tag, rng, &mut used));
    }

    let mut blocks = Vec::with_capacity(5);
    blocks.push(PlannedBlock::new(1, BlockKind::Warmup, WARMUP_TITLE, WARMUP_DETAILS));
    for (slot, movement) in movements.into_iter().enumerate() {
        let position = slot as i32 + 2;
        let block = match movement {
            Some(exercise) => {
                let details = if exercise.description.trim().is_empty() {
                    DEFAULT_GUIDANCE
                } else {
                    exercise.description.trim()
                };
                PlannedBlock::new(position, BlockKind::Circuit, &exercise.name, details)
            }
            None => {
                let (title, details) = fallback_movement(slot, &mut used);
                PlannedBlock::new(position, BlockKind::Circuit, title, details)
            }
        };
        blocks.push(block);
    }
    blocks.push(PlannedBlock::new(5, BlockKind::Cooldown, COOLDOWN_TITLE, COOLDOWN_DETAILS));
    blocks
}

/// Default movement for an empty `slot`: the slot's own stand-in, or the
/// next one not already in `used`. Runs after every catalog pick so the
/// picks themselves are unaffected.
fn fallback_movement(slot: usize, used: &mut HashSet<String>) -> (&'static str, &'static str) {
    let n = FALLBACK_MOVEMENTS.len();
    let (title, details) = (0..n)
        .map(|step| FALLBACK_MOVEMENTS[(slot + step) % n])
        .find(|(title, _)| !used.contains(&name_key(title)))
        .unwrap_or(FALLBACK_MOVEMENTS[slot % n]);
    used.insert(name_key(title));
    (title, details)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recipe(name: &str, cuisine: &str) -> Recipe {
        Recipe {
            name: name.into(),
            cuisine: cuisine.into(),
            ..Recipe::default()
        }
    }

    fn exercise(name: &str, tag: &str, description: &str) -> Exercise {
        Exercise {
            name: name.into(),
            tags: vec![tag.to_owned()],
            description: description.into(),
            ..Exercise::default()
        }
    }

    fn full_catalog() -> Vec<Exercise> {
        FOCUS_CYCLE
            .iter()
            .flat_map(|focus| {
                (0..2).map(move |i| exercise(&format!("{focus} move {i}"), focus, "4 x 8"))
            })
            .collect()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn empty_pools_fall_back_to_defaults() {
        let plan = plan_day(
            date(2025, 3, 3),
            &MealPools::default(),
            &[],
            &mut SeededRng::new(1),
            2,
        );

        let names: Vec<&str> = plan.meals.iter().map(|m| m.recipe_name.as_str()).collect();
        assert_eq!(names, ["Oat Bowl", "Chicken Wrap", "Veg Stir Fry"]);

        let titles: Vec<&str> = plan.blocks.iter().map(|b| b.title.as_str()).collect();
        assert_eq!(
            titles,
            ["Warm-up", "Bodyweight Squat", "Row (band)", "Plank", "Cool-down"]
        );
    }

    #[test]
    fn workout_has_five_blocks_in_fixed_order() {
        let plan = plan_day(
            date(2025, 3, 4),
            &MealPools::default(),
            &full_catalog(),
            &mut SeededRng::new(9),
            2,
        );

        let kinds: Vec<BlockKind> = plan.blocks.iter().map(|b| b.kind).collect();
        assert_eq!(
            kinds,
            [
                BlockKind::Warmup,
                BlockKind::Circuit,
                BlockKind::Circuit,
                BlockKind::Circuit,
                BlockKind::Cooldown
            ]
        );
        let positions: Vec<i32> = plan.blocks.iter().map(|b| b.position).collect();
        assert_eq!(positions, [1, 2, 3, 4, 5]);
    }

    #[test]
    fn primary_movement_follows_the_focus_cycle() {
        let catalog = full_catalog();
        // 2025-03-03 is a Monday.
        for offset in 0..7u32 {
            let day = date(2025, 3, 3 + offset);
            let plan = plan_day(day, &MealPools::default(), &catalog, &mut SeededRng::new(offset), 2);
            let focus = FOCUS_CYCLE[offset as usize];
            assert_eq!(plan.focus, focus);
            assert!(plan.blocks[1].title.starts_with(focus), "{day}: {:?}", plan.blocks[1]);
        }
    }

    #[test]
    fn main_movements_are_distinct_and_off_focus() {
        let catalog = full_catalog();
        let plan = plan_day(date(2025, 3, 6), &MealPools::default(), &catalog, &mut SeededRng::new(77), 2);

        let main: Vec<&str> = plan.blocks[1..4].iter().map(|b| b.title.as_str()).collect();
        let unique: HashSet<&str> = main.iter().copied().collect();
        assert_eq!(unique.len(), 3);
        assert!(!main[1].starts_with(plan.focus));
        assert!(!main[2].starts_with(plan.focus));
        assert_eq!(plan.blocks[1].details, "4 x 8");
    }

    #[test]
    fn fallback_never_repeats_a_catalog_movement() {
        let catalog = vec![exercise("Plank", "core", "3 x 45s")];
        for seed in 0..200 {
            let mut rng = SeededRng::new(seed);
            let plan = plan_day(date(2025, 3, 3), &MealPools::default(), &catalog, &mut rng, 2);
            let main: Vec<&str> = plan.blocks[1..4].iter().map(|b| b.title.as_str()).collect();
            let unique: HashSet<&str> = main.iter().copied().collect();
            assert_eq!(unique.len(), 3, "seed {seed}: {main:?}");
        }
    }

    #[test]
    fn fallback_skips_to_the_next_unused_default() {
        let mut used: HashSet<String> = ["plank".to_owned()].into();
        assert_eq!(fallback_movement(2, &mut used).0, "Bodyweight Squat");
        assert!(used.contains("bodyweight squat"));
        assert_eq!(fallback_movement(1, &mut used).0, "Row (band)");
    }

    #[test]
    fn blank_description_gets_default_guidance() {
        let catalog = vec![exercise("Push-up", "push", "  ")];
        let plan = plan_day(date(2025, 3, 3), &MealPools::default(), &catalog, &mut SeededRng::new(2), 2);
        assert_eq!(plan.blocks[1].title, "Push-up");
        assert_eq!(plan.blocks[1].details, DEFAULT_GUIDANCE);
    }

    #[test]
    fn meals_do_not_repeat_within_a_day() {
        let shared = vec![
            recipe("Idli", "south indian"),
            recipe("Dosa", "south indian"),
            recipe("Upma", "south indian"),
        ];
        let pools = MealPools {
            breakfast: shared.clone(),
            lunch: shared.clone(),
            dinner: shared,
        };
        for seed in 0..50 {
            let plan = plan_day(date(2025, 3, 5), &pools, &[], &mut SeededRng::new(seed), 2);
            let names: HashSet<&str> = plan.meals.iter().map(|m| m.recipe_name.as_str()).collect();
            assert_eq!(names.len(), 3, "seed {seed}: {:?}", plan.meals);
        }
    }

    #[test]
    fn exhausted_slot_uses_its_default() {
        let pools = MealPools {
            breakfast: vec![recipe("Poha", "")],
            lunch: vec![recipe("Poha", "")],
            dinner: vec![],
        };
        let plan = plan_day(date(2025, 3, 5), &pools, &[], &mut SeededRng::new(0), 2);
        assert_eq!(plan.meals[0].recipe_name, "Poha");
        assert_eq!(plan.meals[1].recipe_name, "Chicken Wrap");
        assert_eq!(plan.meals[2].recipe_name, "Veg Stir Fry");
    }

    #[test]
    fn same_seed_same_day() {
        let catalog = full_catalog();
        let pools = MealPools {
            breakfast: (0..6).map(|i| recipe(&format!("B{i}"), "x")).collect(),
            lunch: (0..6).map(|i| recipe(&format!("L{i}"), "y")).collect(),
            dinner: (0..6).map(|i| recipe(&format!("D{i}"), "z")).collect(),
        };
        let day = date(2025, 3, 8);
        let a = plan_day(day, &pools, &catalog, &mut SeededRng::from_key("k"), 2);
        let b = plan_day(day, &pools, &catalog, &mut SeededRng::from_key("k"), 2);
        assert_eq!(a, b);
    }
}
