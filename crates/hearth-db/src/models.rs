use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// Meal slot within a plan day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "text", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum MealType {
    Breakfast,
    Lunch,
    Dinner,
}

impl MealType {
    /// Every slot, in the order meals are planned and displayed.
    pub const ALL: [MealType; 3] = [Self::Breakfast, Self::Lunch, Self::Dinner];

    /// The catalog tag that marks a recipe as suitable for this slot.
    pub fn catalog_tag(self) -> &'static str {
        match self {
            Self::Breakfast => "Breakfast",
            Self::Lunch => "Lunch",
            Self::Dinner => "Dinner",
        }
    }
}

impl fmt::Display for MealType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Breakfast => "breakfast",
            Self::Lunch => "lunch",
            Self::Dinner => "dinner",
        };
        f.write_str(s)
    }
}

impl FromStr for MealType {
    type Err = MealTypeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "breakfast" => Ok(Self::Breakfast),
            "lunch" => Ok(Self::Lunch),
            "dinner" => Ok(Self::Dinner),
            other => Err(MealTypeParseError(other.to_owned())),
        }
    }
}

/// Error returned when parsing an invalid [`MealType`] string.
#[derive(Debug, Clone)]
pub struct MealTypeParseError(pub String);

impl fmt::Display for MealTypeParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid meal type: {:?}", self.0)
    }
}

impl std::error::Error for MealTypeParseError {}

// ---------------------------------------------------------------------------

/// Kind of a workout block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "text", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum BlockKind {
    Warmup,
    Circuit,
    Cooldown,
}

impl fmt::Display for BlockKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Warmup => "warmup",
            Self::Circuit => "circuit",
            Self::Cooldown => "cooldown",
        };
        f.write_str(s)
    }
}

impl FromStr for BlockKind {
    type Err = BlockKindParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "warmup" => Ok(Self::Warmup),
            "circuit" => Ok(Self::Circuit),
            "cooldown" => Ok(Self::Cooldown),
            other => Err(BlockKindParseError(other.to_owned())),
        }
    }
}

/// Error returned when parsing an invalid [`BlockKind`] string.
#[derive(Debug, Clone)]
pub struct BlockKindParseError(pub String);

impl fmt::Display for BlockKindParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid block kind: {:?}", self.0)
    }
}

impl std::error::Error for BlockKindParseError {}

// ---------------------------------------------------------------------------
// JSON list decoding
// ---------------------------------------------------------------------------

/// Decode a JSON column that should hold an array of strings.
///
/// Anything that is not an array yields an empty list; non-string elements
/// are dropped. Profiles and catalog rows are written by other services, so
/// the shape is not guaranteed.
pub fn string_list(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|item| item.as_str().map(str::to_owned))
            .collect(),
        _ => Vec::new(),
    }
}

// ---------------------------------------------------------------------------
// Row structs
// ---------------------------------------------------------------------------

/// Raw `profiles` row. Convert with [`Profile::from`] before use.
#[derive(Debug, Clone, FromRow)]
pub struct ProfileRow {
    pub user_id: Uuid,
    pub dietary_pattern: Option<String>,
    pub meat_policy: Option<String>,
    pub allergies: Option<Value>,
    pub dislikes: Option<Value>,
    pub cuisine_prefs: Option<Value>,
    pub injuries: Option<Value>,
    pub health_conditions: Option<Value>,
    pub equipment: Option<Value>,
}

/// Raw `recipes` row.
#[derive(Debug, Clone, FromRow)]
pub struct RecipeRow {
    pub name: String,
    pub dietary_pattern: Option<String>,
    pub allergens: Option<Value>,
    pub tags: Option<Value>,
    pub ingredients: Option<Value>,
    pub cuisine: Option<String>,
}

/// Raw `exercises` row.
#[derive(Debug, Clone, FromRow)]
pub struct ExerciseRow {
    pub name: String,
    pub tags: Option<Value>,
    pub equipment: Option<Value>,
    pub contraindications: Option<Value>,
    pub description: Option<String>,
}

/// A plan day -- the per-date container for a user's meals.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct PlanDay {
    pub id: Uuid,
    pub user_id: Uuid,
    pub day: NaiveDate,
    pub created_at: DateTime<Utc>,
}

/// A meal assigned to a plan day.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Meal {
    pub id: Uuid,
    pub plan_day_id: Uuid,
    pub meal_type: MealType,
    pub recipe_name: String,
    pub created_at: DateTime<Utc>,
}

/// A workout day -- the per-date container for a user's workout blocks.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct WorkoutDay {
    pub id: Uuid,
    pub user_id: Uuid,
    pub day: NaiveDate,
    pub created_at: DateTime<Utc>,
}

/// One block of a workout day, ordered by `position`.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct WorkoutBlock {
    pub id: Uuid,
    pub workout_day_id: Uuid,
    pub position: i32,
    pub kind: BlockKind,
    pub title: String,
    pub details: String,
    pub created_at: DateTime<Utc>,
}

/// A meal row waiting to be inserted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMeal {
    pub plan_day_id: Uuid,
    pub meal_type: MealType,
    pub recipe_name: String,
}

/// A workout block row waiting to be inserted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewWorkoutBlock {
    pub workout_day_id: Uuid,
    pub position: i32,
    pub kind: BlockKind,
    pub title: String,
    pub details: String,
}

// ---------------------------------------------------------------------------
// Typed entities
// ---------------------------------------------------------------------------

/// Constraint attributes of a user, read once per generation run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub user_id: Uuid,
    pub dietary_pattern: String,
    pub meat_policy: String,
    pub allergies: Vec<String>,
    pub dislikes: Vec<String>,
    /// Informational only; selection does not filter on it.
    pub cuisine_prefs: Vec<String>,
    pub injuries: Vec<String>,
    pub health_conditions: Vec<String>,
    pub equipment: Vec<String>,
}

impl Profile {
    /// An unconstrained profile for `user_id`.
    pub fn new(user_id: Uuid) -> Self {
        Self {
            user_id,
            ..Self::default()
        }
    }

    /// The dietary pattern in effect: `dietary_pattern` when set, otherwise
    /// `meat_policy`. Both columns fill the same slot.
    pub fn effective_pattern(&self) -> &str {
        if self.dietary_pattern.trim().is_empty() {
            &self.meat_policy
        } else {
            &self.dietary_pattern
        }
    }
}

impl From<ProfileRow> for Profile {
    fn from(row: ProfileRow) -> Self {
        Self {
            user_id: row.user_id,
            dietary_pattern: row.dietary_pattern.unwrap_or_default(),
            meat_policy: row.meat_policy.unwrap_or_default(),
            allergies: string_list(row.allergies.as_ref()),
            dislikes: string_list(row.dislikes.as_ref()),
            cuisine_prefs: string_list(row.cuisine_prefs.as_ref()),
            injuries: string_list(row.injuries.as_ref()),
            health_conditions: string_list(row.health_conditions.as_ref()),
            equipment: string_list(row.equipment.as_ref()),
        }
    }
}

/// A recipe candidate from the catalog.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recipe {
    pub name: String,
    #[serde(default)]
    pub dietary_pattern: String,
    #[serde(default)]
    pub allergens: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub ingredients: Vec<String>,
    #[serde(default)]
    pub cuisine: String,
}

impl From<RecipeRow> for Recipe {
    fn from(row: RecipeRow) -> Self {
        Self {
            name: row.name,
            dietary_pattern: row.dietary_pattern.unwrap_or_default(),
            allergens: string_list(row.allergens.as_ref()),
            tags: string_list(row.tags.as_ref()),
            ingredients: string_list(row.ingredients.as_ref()),
            cuisine: row.cuisine.unwrap_or_default(),
        }
    }
}

/// An exercise candidate from the catalog.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Exercise {
    pub name: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub equipment: Vec<String>,
    #[serde(default)]
    pub contraindications: Vec<String>,
    /// Set/rep guidance shown as the block details.
    #[serde(default)]
    pub description: String,
}

impl From<ExerciseRow> for Exercise {
    fn from(row: ExerciseRow) -> Self {
        Self {
            name: row.name,
            tags: string_list(row.tags.as_ref()),
            equipment: string_list(row.equipment.as_ref()),
            contraindications: string_list(row.contraindications.as_ref()),
            description: row.description.unwrap_or_default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn meal_type_round_trips_through_strings() {
        for meal in MealType::ALL {
            assert_eq!(meal.to_string().parse::<MealType>().unwrap(), meal);
        }
        assert!("brunch".parse::<MealType>().is_err());
    }

    #[test]
    fn block_kind_rejects_unknown() {
        let err = "stretch".parse::<BlockKind>().unwrap_err();
        assert_eq!(err.to_string(), "invalid block kind: \"stretch\"");
    }

    #[test]
    fn string_list_tolerates_malformed_json() {
        assert!(string_list(None).is_empty());
        assert!(string_list(Some(&json!("dumbbell"))).is_empty());
        assert!(string_list(Some(&json!({"a": 1}))).is_empty());
        assert_eq!(
            string_list(Some(&json!(["band", 3, null, "mat"]))),
            vec!["band".to_owned(), "mat".to_owned()]
        );
    }

    #[test]
    fn profile_row_defaults_missing_fields() {
        let row = ProfileRow {
            user_id: Uuid::nil(),
            dietary_pattern: None,
            meat_policy: Some("non_veg_chicken_only".into()),
            allergies: Some(json!(["peanut"])),
            dislikes: None,
            cuisine_prefs: None,
            injuries: Some(json!("knee")),
            health_conditions: None,
            equipment: Some(json!(null)),
        };
        let profile = Profile::from(row);
        assert_eq!(profile.effective_pattern(), "non_veg_chicken_only");
        assert_eq!(profile.allergies, vec!["peanut".to_owned()]);
        assert!(profile.injuries.is_empty());
        assert!(profile.equipment.is_empty());
    }

    #[test]
    fn dietary_pattern_wins_over_meat_policy() {
        let profile = Profile {
            dietary_pattern: "veg".into(),
            meat_policy: "non_veg".into(),
            ..Profile::default()
        };
        assert_eq!(profile.effective_pattern(), "veg");
    }
}
