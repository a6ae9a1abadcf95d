//! Admissibility predicates for recipes and exercises.
//!
//! [`Constraints`] normalizes a [`Profile`] once so a whole candidate pool
//! can be filtered without re-normalizing per candidate. The free functions
//! [`recipe_allowed`] and [`exercise_allowed`] are one-shot conveniences.

use std::collections::HashSet;

use hearth_db::models::{Exercise, Profile, Recipe};

use super::tags::{name_key, normalize, normalized_set};

/// Words that mark a recipe name as containing meat or seafood.
const MEAT_WORDS: [&str; 12] = [
    "chicken", "beef", "pork", "mutton", "lamb", "fish", "tuna", "salmon", "prawn", "shrimp",
    "shellfish", "bacon",
];

/// Pattern value for households that eat chicken but no other meat.
const CHICKEN_ONLY: &str = "non_veg_chicken_only";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Diet {
    Vegetarian,
    ChickenOnly,
    Unrestricted,
}

impl Diet {
    fn from_pattern(pattern: &str) -> Self {
        let p = normalize(pattern);
        if p == "veg" || p.contains("vegetarian") {
            Self::Vegetarian
        } else if p == CHICKEN_ONLY {
            Self::ChickenOnly
        } else {
            Self::Unrestricted
        }
    }

    fn banned_words(self) -> &'static [&'static str] {
        match self {
            Self::Vegetarian => &MEAT_WORDS,
            // Same list without "chicken".
            Self::ChickenOnly => &MEAT_WORDS[1..],
            Self::Unrestricted => &[],
        }
    }
}

/// A profile's constraints, normalized for repeated checks.
#[derive(Debug, Clone)]
pub struct Constraints {
    diet: Diet,
    allergies: HashSet<String>,
    dislikes: Vec<String>,
    equipment: HashSet<String>,
    flags: HashSet<String>,
}

impl Constraints {
    pub fn new(profile: &Profile) -> Self {
        let mut flags = normalized_set(&profile.injuries);
        flags.extend(normalized_set(&profile.health_conditions));

        Self {
            diet: Diet::from_pattern(profile.effective_pattern()),
            allergies: normalized_set(&profile.allergies),
            dislikes: profile
                .dislikes
                .iter()
                .map(|d| name_key(d))
                .filter(|d| !d.is_empty())
                .collect(),
            equipment: normalized_set(&profile.equipment),
            flags,
        }
    }

    /// Whether the profile is vegetarian ("veg", or any pattern mentioning
    /// "vegetarian").
    pub fn is_vegetarian(&self) -> bool {
        self.diet == Diet::Vegetarian
    }

    pub fn admits_recipe(&self, recipe: &Recipe) -> bool {
        let name = name_key(&recipe.name);

        if self.diet == Diet::Vegetarian {
            let pattern = normalize(&recipe.dietary_pattern);
            if !pattern.is_empty() && !pattern.contains("veg") {
                return false;
            }
        }

        if self
            .diet
            .banned_words()
            .iter()
            .any(|word| name.contains(word))
        {
            return false;
        }

        if recipe
            .allergens
            .iter()
            .any(|a| self.allergies.contains(&normalize(a)))
        {
            return false;
        }

        !self.dislikes.iter().any(|d| name.contains(d.as_str()))
    }

    pub fn admits_exercise(&self, exercise: &Exercise) -> bool {
        let required = normalized_set(&exercise.equipment);
        let equipment_ok = required.is_empty()
            || required.contains("none")
            || required.is_subset(&self.equipment);

        let contraindicated = exercise
            .contraindications
            .iter()
            .any(|c| self.flags.contains(&normalize(c)));

        equipment_ok && !contraindicated
    }
}

/// Whether `recipe` is admissible for `profile`.
pub fn recipe_allowed(recipe: &Recipe, profile: &Profile) -> bool {
    Constraints::new(profile).admits_recipe(recipe)
}

/// Whether `exercise` is admissible for `profile`.
pub fn exercise_allowed(exercise: &Exercise, profile: &Profile) -> bool {
    Constraints::new(profile).admits_exercise(exercise)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn recipe(name: &str, pattern: &str, allergens: &[&str]) -> Recipe {
        Recipe {
            name: name.into(),
            dietary_pattern: pattern.into(),
            allergens: strings(allergens),
            ..Recipe::default()
        }
    }

    fn exercise(name: &str, equipment: &[&str], contraindications: &[&str]) -> Exercise {
        Exercise {
            name: name.into(),
            equipment: strings(equipment),
            contraindications: strings(contraindications),
            ..Exercise::default()
        }
    }

    fn profile_with_pattern(pattern: &str) -> Profile {
        Profile {
            dietary_pattern: pattern.into(),
            ..Profile::default()
        }
    }

    #[test]
    fn vegetarian_rejects_meat_names() {
        let profile = profile_with_pattern("vegetarian");
        assert!(!recipe_allowed(&recipe("Grilled Chicken Bowl", "", &[]), &profile));
        assert!(recipe_allowed(&recipe("Veg Oats Bowl", "", &[]), &profile));
    }

    #[test]
    fn vegetarian_rejects_non_veg_pattern_tags() {
        let profile = profile_with_pattern("Veg");
        assert!(!recipe_allowed(&recipe("Egg Curry", "eggetarian", &[]), &profile));
        assert!(recipe_allowed(&recipe("Paneer Tikka", "veg", &[]), &profile));
        assert!(recipe_allowed(&recipe("Dal Tadka", "", &[]), &profile));
    }

    #[test]
    fn vegetarian_ban_list_applies_even_with_veg_pattern_tag() {
        let profile = profile_with_pattern("lacto vegetarian");
        assert!(!recipe_allowed(&recipe("Bacon Pasta", "veg", &[]), &profile));
    }

    #[test]
    fn chicken_only_allows_chicken_but_not_other_meat() {
        let profile = profile_with_pattern("non_veg_chicken_only");
        assert!(recipe_allowed(&recipe("Chicken Wrap", "non_veg", &[]), &profile));
        assert!(!recipe_allowed(&recipe("Lamb Rogan Josh", "non_veg", &[]), &profile));
        assert!(!recipe_allowed(&recipe("Tuna Salad", "", &[]), &profile));
    }

    #[test]
    fn meat_policy_fills_in_for_missing_pattern() {
        let profile = Profile {
            meat_policy: "veg".into(),
            ..Profile::default()
        };
        assert!(!recipe_allowed(&recipe("Fish Tacos", "", &[]), &profile));
    }

    #[test]
    fn unrestricted_pattern_allows_meat() {
        let profile = profile_with_pattern("non_veg");
        assert!(recipe_allowed(&recipe("Beef Stew", "non_veg", &[]), &profile));
    }

    #[test]
    fn allergens_are_matched_case_insensitively() {
        let profile = Profile {
            allergies: strings(&["Peanut"]),
            ..Profile::default()
        };
        assert!(!recipe_allowed(&recipe("Satay Noodles", "", &[" peanut"]), &profile));
        assert!(recipe_allowed(&recipe("Plain Noodles", "", &["gluten"]), &profile));
    }

    #[test]
    fn dislikes_are_name_substrings() {
        let profile = Profile {
            dislikes: strings(&["Mushroom", ""]),
            ..Profile::default()
        };
        assert!(!recipe_allowed(&recipe("Mushroom Risotto", "", &[]), &profile));
        assert!(recipe_allowed(&recipe("Tomato Risotto", "", &[]), &profile));
    }

    #[test]
    fn dislikes_ignore_internal_spacing() {
        let profile = Profile {
            dislikes: strings(&[" Ice  Cream "]),
            ..Profile::default()
        };
        assert!(!recipe_allowed(&recipe("Mango ice cream", "", &[]), &profile));
        assert!(!recipe_allowed(&recipe("Vanilla Ice\tCream Sundae", "", &[]), &profile));
        assert!(recipe_allowed(&recipe("Iced Coffee", "", &[]), &profile));
    }

    #[test]
    fn equipment_gating() {
        let needs_dumbbell = exercise("Dumbbell Press", &["dumbbell"], &[]);
        let bare = Profile::default();
        let equipped = Profile {
            equipment: strings(&["Dumbbell"]),
            ..Profile::default()
        };
        assert!(!exercise_allowed(&needs_dumbbell, &bare));
        assert!(exercise_allowed(&needs_dumbbell, &equipped));
    }

    #[test]
    fn no_equipment_needed() {
        let bare = Profile::default();
        assert!(exercise_allowed(&exercise("Push-up", &[], &[]), &bare));
        assert!(exercise_allowed(&exercise("Burpee", &["none"], &[]), &bare));
    }

    #[test]
    fn every_required_item_must_be_owned() {
        let profile = Profile {
            equipment: strings(&["bench"]),
            ..Profile::default()
        };
        let press = exercise("Bench Press", &["bench", "barbell"], &[]);
        assert!(!exercise_allowed(&press, &profile));
    }

    #[test]
    fn contraindications_check_injuries_and_conditions() {
        let lunge = exercise("Walking Lunge", &[], &["knee"]);
        let sprint = exercise("Sprint Intervals", &[], &["hypertension"]);
        let profile = Profile {
            injuries: strings(&["Knee "]),
            health_conditions: strings(&["hypertension"]),
            ..Profile::default()
        };
        assert!(!exercise_allowed(&lunge, &profile));
        assert!(!exercise_allowed(&sprint, &profile));
        assert!(exercise_allowed(&exercise("Plank", &[], &["shoulder"]), &profile));
    }
}
