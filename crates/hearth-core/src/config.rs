use anyhow::{Context, Result};
use chrono::FixedOffset;

use crate::planner::DEFAULT_CUISINE_CAP;

/// Tunables for a generation run.
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    /// Offset used to decide what "today" is, independent of server locale.
    pub reference_offset: FixedOffset,
    /// Per-cuisine cap for varied selection.
    pub cuisine_cap: usize,
    /// Number of (user, week) units processed concurrently.
    pub max_workers: usize,
    /// When set, vegetarian profiles only see recipes whose dietary pattern
    /// is exactly `"veg"`.
    pub strict_pattern_match: bool,
}

impl GeneratorConfig {
    /// Default reference offset: UTC+05:30.
    pub const DEFAULT_UTC_OFFSET_MINUTES: i32 = 330;

    /// Build a fixed offset from minutes east of UTC.
    pub fn offset_from_minutes(minutes: i32) -> Result<FixedOffset> {
        minutes
            .checked_mul(60)
            .and_then(FixedOffset::east_opt)
            .with_context(|| format!("UTC offset of {minutes} minutes is out of range"))
    }
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            reference_offset: FixedOffset::east_opt(Self::DEFAULT_UTC_OFFSET_MINUTES * 60)
                .expect("+05:30 is a valid UTC offset"),
            cuisine_cap: DEFAULT_CUISINE_CAP,
            max_workers: 1,
            strict_pattern_match: false,
        }
    }
}
