//! String normalization for names, tags, and profile attributes.
//!
//! Catalog rows are free text; every comparison the planner makes goes
//! through these helpers.

use std::collections::HashSet;

/// Cuisine bucket used when a candidate has no cuisine.
pub const MISC_CUISINE: &str = "misc";

/// Trimmed and lowercased.
pub fn normalize(s: &str) -> String {
    s.trim().to_lowercase()
}

/// Identity key for a recipe or exercise name: lowercased with runs of
/// whitespace collapsed, so "Oat  Bowl " and "oat bowl" are the same item.
pub fn name_key(name: &str) -> String {
    name.split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Normalized, non-empty entries of `items` as a set.
pub fn normalized_set<'a, I>(items: I) -> HashSet<String>
where
    I: IntoIterator<Item = &'a String>,
{
    items
        .into_iter()
        .map(|s| normalize(s))
        .filter(|s| !s.is_empty())
        .collect()
}

/// Whether `tags` holds `tag`, ignoring case and surrounding whitespace.
pub fn has_tag(tags: &[String], tag: &str) -> bool {
    let wanted = normalize(tag);
    tags.iter().any(|t| normalize(t) == wanted)
}

/// Whether any of `tags` contains `needle` as a case-insensitive substring.
/// This is how the recipe catalog matches meal slots.
pub fn tag_contains(tags: &[String], needle: &str) -> bool {
    let needle = normalize(needle);
    tags.iter().any(|t| t.to_lowercase().contains(&needle))
}

/// Bucket key for the per-cuisine cap.
pub fn cuisine_bucket(cuisine: &str) -> String {
    let c = normalize(cuisine);
    if c.is_empty() { MISC_CUISINE.to_owned() } else { c }
}
