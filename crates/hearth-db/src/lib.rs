//! PostgreSQL persistence for hearth: connection config, pool and
//! migrations, typed row models, and per-table query functions.

pub mod config;
pub mod models;
pub mod pool;
pub mod queries;
