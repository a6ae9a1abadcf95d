//! Weekly meal and workout plan generation.
//!
//! The [`planner`] module holds the pure pieces (seeded RNG, constraint
//! filters, varied selection, day assembly). [`week`] drives them across
//! users and weeks against the injected [`store`] traits.

pub mod catalog_file;
pub mod config;
pub mod planner;
pub mod store;
pub mod week;

pub use config::GeneratorConfig;
pub use week::{UnitOutcome, UnitReport, WeekCounts, WeekGenerator};
