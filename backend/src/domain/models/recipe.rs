use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use shared::{null_as_default, Difficulty, Ingredient, MealType, NutritionalInfo};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recipe {
    pub id: String,
    pub title: String,
    pub description: String,
    pub ingredients: Vec<Ingredient>,
    pub instructions: Vec<String>,
    pub nutritional_info: NutritionalInfo,
    pub meal_type: MealType,
    pub difficulty: Difficulty,
    pub prep_time_minutes: Option<u32>,
    pub health_benefits: Vec<String>,
    pub allergens: Vec<String>,
    pub min_age: Option<u32>,
    pub max_age: Option<u32>,
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Recipe {
    pub fn generate_id() -> String {
        format!("recipe_{}", Uuid::new_v4().simple())
    }

    pub fn normalized_title(&self) -> String {
        normalize_title(&self.title)
    }

    /// Build a stored recipe from a generated one.
    /// Missing or unrecognised meal type/difficulty fall back to the given defaults.
    pub fn from_generated(
        generated: GeneratedRecipe,
        default_meal_type: MealType,
        default_difficulty: Difficulty,
        now: DateTime<Utc>,
    ) -> Self {
        let meal_type = generated
            .meal_type
            .as_deref()
            .and_then(|m| MealType::from_string(m).ok())
            .unwrap_or(default_meal_type);
        let difficulty = generated
            .difficulty
            .as_deref()
            .and_then(|d| Difficulty::from_string(d).ok())
            .unwrap_or(default_difficulty);

        Recipe {
            id: Self::generate_id(),
            title: generated.title.trim().to_string(),
            description: generated.description.trim().to_string(),
            ingredients: generated
                .ingredients
                .into_iter()
                .filter(|i| !i.item.trim().is_empty())
                .collect(),
            instructions: generated.instructions,
            nutritional_info: generated.nutritional_info,
            meal_type,
            difficulty,
            prep_time_minutes: generated.prep_time_minutes,
            health_benefits: generated.health_benefits,
            allergens: generated.allergens,
            min_age: generated.min_age,
            max_age: generated.max_age,
            image_url: None,
            created_at: now,
        }
    }
}

/// Trimmed, lower-cased, inner whitespace collapsed
pub fn normalize_title(title: &str) -> String {
    title
        .split_whitespace()
        .map(|w| w.to_lowercase())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Recipe object as returned by the AI recipe function
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct GeneratedRecipe {
    #[serde(default, alias = "name", alias = "recipe_title", deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub ingredients: Vec<Ingredient>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub instructions: Vec<String>,
    #[serde(default, alias = "nutrition", deserialize_with = "null_as_default")]
    pub nutritional_info: NutritionalInfo,
    #[serde(default)]
    pub meal_type: Option<String>,
    #[serde(default)]
    pub difficulty: Option<String>,
    #[serde(default, alias = "prep_time", deserialize_with = "lenient_u32")]
    pub prep_time_minutes: Option<u32>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub health_benefits: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub allergens: Vec<String>,
    #[serde(default, deserialize_with = "lenient_u32")]
    pub min_age: Option<u32>,
    #[serde(default, deserialize_with = "lenient_u32")]
    pub max_age: Option<u32>,
}

/// Reads `20`, `"20"` and `"20 minutes"` as 20; anything else as `None`
fn lenient_u32<'de, D>(deserializer: D) -> Result<Option<u32>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::Number(n) => n.as_f64().filter(|v| *v >= 0.0).map(|v| v.round() as u32),
        serde_json::Value::String(s) => {
            let digits: String = s.trim().chars().take_while(|c| c.is_ascii_digit()).collect();
            digits.parse::<u32>().ok()
        }
        _ => None,
    })
}
