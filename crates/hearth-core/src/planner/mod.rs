//! Plan assembly: seeded randomness, constraint filters, varied selection,
//! calendar helpers, and the per-day planner.

pub mod calendar;
pub mod day;
pub mod filters;
pub mod rng;
pub mod select;
pub mod tags;

pub use day::{DayPlan, MealPools, PlannedBlock, PlannedMeal, plan_day};
pub use filters::{Constraints, exercise_allowed, recipe_allowed};
pub use rng::{SeededRng, fnv1a32, seed_key};
pub use select::{Candidate, DEFAULT_CUISINE_CAP, choose_varied, take_by_tag_distinct};
