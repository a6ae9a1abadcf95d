//! Varied, non-repeating selection from a candidate pool.

use std::collections::{HashMap, HashSet};

use hearth_db::models::{Exercise, Recipe};

use super::rng::SeededRng;
use super::tags::{cuisine_bucket, has_tag, name_key};

/// Maximum picks per cuisine in one [`choose_varied`] call before the
/// uncapped fallback pass.
pub const DEFAULT_CUISINE_CAP: usize = 2;

/// Anything the selector can pick: a named item with tags and an optional
/// cuisine.
pub trait Candidate {
    fn name(&self) -> &str;

    fn tags(&self) -> &[String];

    /// Empty when the item has no cuisine.
    fn cuisine(&self) -> &str {
        ""
    }
}

impl Candidate for Recipe {
    fn name(&self) -> &str {
        &self.name
    }

    fn tags(&self) -> &[String] {
        &self.tags
    }

    fn cuisine(&self) -> &str {
        &self.cuisine
    }
}

impl Candidate for Exercise {
    fn name(&self) -> &str {
        &self.name
    }

    fn tags(&self) -> &[String] {
        &self.tags
    }
}

/// Pick up to `count` distinct candidates, favouring cuisine variety.
///
/// The pool is shuffled once with `rng`. A first walk accepts candidates
/// whose name key is not yet in `used` and whose cuisine bucket is still
/// under `cuisine_cap`; if that leaves the request short, a second walk over
/// the same order ignores the cap. Every accepted name is added to `used`.
pub fn choose_varied<'a, T: Candidate>(
    candidates: &'a [T],
    count: usize,
    rng: &mut SeededRng,
    used: &mut HashSet<String>,
    cuisine_cap: usize,
) -> Vec<&'a T> {
    let mut order: Vec<&T> = candidates.iter().collect();
    rng.shuffle(&mut order);

    let mut picked = Vec::with_capacity(count);
    let mut per_cuisine: HashMap<String, usize> = HashMap::new();

    for candidate in &order {
        if picked.len() >= count {
            break;
        }
        let key = name_key(candidate.name());
        if key.is_empty() || used.contains(&key) {
            continue;
        }
        let bucket = per_cuisine
            .entry(cuisine_bucket(candidate.cuisine()))
            .or_insert(0);
        if *bucket >= cuisine_cap {
            continue;
        }
        *bucket += 1;
        used.insert(key);
        picked.push(*candidate);
    }

    if picked.len() < count {
        for candidate in &order {
            if picked.len() >= count {
                break;
            }
            let key = name_key(candidate.name());
            if key.is_empty() || used.contains(&key) {
                continue;
            }
            used.insert(key);
            picked.push(*candidate);
        }
    }

    picked
}

/// Pick one candidate tagged `tag` whose name is not in `used`, marking it
/// used. Returns `None` when no such candidate exists.
pub fn take_by_tag_distinct<'a, T: Candidate>(
    pool: &'a [T],
    tag: &str,
    rng: &mut SeededRng,
    used: &mut HashSet<String>,
) -> Option<&'a T> {
    let mut tagged: Vec<&T> = pool.iter().filter(|c| has_tag(c.tags(), tag)).collect();
    rng.shuffle(&mut tagged);

    let found = tagged.into_iter().find(|c| {
        let key = name_key(c.name());
        !key.is_empty() && !used.contains(&key)
    })?;
    used.insert(name_key(found.name()));
    Some(found)
}
