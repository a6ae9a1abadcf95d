pub mod exercises;
pub mod plan_days;
pub mod profiles;
pub mod recipes;
pub mod workout_days;
