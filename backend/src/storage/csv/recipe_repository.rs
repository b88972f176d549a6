//! # CSV Recipe Repository
//!
//! Recipes live in `{profile_id}/recipes.csv`. List-valued fields and the
//! nutrition block are stored as JSON text inside their columns and parsed
//! back on read.
//!
//! ```csv
//! id,title,description,ingredients,instructions,nutritional_info,meal_type,difficulty,...
//! recipe_3f2a...,Tomato Soup,,"[{""item"":""tomato"",""quantity"":3.0,""unit"":""pcs""}]",...
//! ```

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shared::{Difficulty, MealType};
use std::collections::HashSet;
use std::path::PathBuf;
use tracing::{debug, info, warn};

use super::connection::CsvConnection;
use crate::domain::models::recipe::Recipe;
use crate::storage::traits::RecipeStorage;

const RECIPES_FILE: &str = "recipes.csv";
const HEADER: &[&str] = &[
    "id",
    "title",
    "description",
    "ingredients",
    "instructions",
    "nutritional_info",
    "meal_type",
    "difficulty",
    "prep_time_minutes",
    "health_benefits",
    "allergens",
    "min_age",
    "max_age",
    "image_url",
    "created_at",
];

/// CSV record structure for recipes
#[derive(Debug, Clone, Serialize, Deserialize)]
struct RecipeRecord {
    id: String,
    title: String,
    description: String,
    ingredients: String,
    instructions: String,
    nutritional_info: String,
    meal_type: String,
    difficulty: String,
    prep_time_minutes: Option<u32>,
    health_benefits: String,
    allergens: String,
    min_age: Option<u32>,
    max_age: Option<u32>,
    image_url: Option<String>,
    created_at: String,
}

impl TryFrom<&Recipe> for RecipeRecord {
    type Error = anyhow::Error;

    fn try_from(recipe: &Recipe) -> Result<Self> {
        Ok(RecipeRecord {
            id: recipe.id.clone(),
            title: recipe.title.clone(),
            description: recipe.description.clone(),
            ingredients: serde_json::to_string(&recipe.ingredients)?,
            instructions: serde_json::to_string(&recipe.instructions)?,
            nutritional_info: serde_json::to_string(&recipe.nutritional_info)?,
            meal_type: recipe.meal_type.to_string(),
            difficulty: recipe.difficulty.to_string(),
            prep_time_minutes: recipe.prep_time_minutes,
            health_benefits: serde_json::to_string(&recipe.health_benefits)?,
            allergens: serde_json::to_string(&recipe.allergens)?,
            min_age: recipe.min_age,
            max_age: recipe.max_age,
            image_url: recipe.image_url.clone(),
            created_at: recipe.created_at.to_rfc3339(),
        })
    }
}

impl TryFrom<RecipeRecord> for Recipe {
    type Error = anyhow::Error;

    fn try_from(record: RecipeRecord) -> Result<Self> {
        let meal_type = MealType::from_string(&record.meal_type).map_err(|e| anyhow::anyhow!(e))?;
        let difficulty =
            Difficulty::from_string(&record.difficulty).map_err(|e| anyhow::anyhow!(e))?;

        Ok(Recipe {
            ingredients: parse_json_column("ingredients", &record.ingredients)?,
            instructions: parse_json_column("instructions", &record.instructions)?,
            nutritional_info: parse_json_column("nutritional_info", &record.nutritional_info)?,
            health_benefits: parse_json_column("health_benefits", &record.health_benefits)?,
            allergens: parse_json_column("allergens", &record.allergens)?,
            created_at: DateTime::parse_from_rfc3339(&record.created_at)
                .context("Failed to parse created_at")?
                .with_timezone(&Utc),
            id: record.id,
            title: record.title,
            description: record.description,
            meal_type,
            difficulty,
            prep_time_minutes: record.prep_time_minutes,
            min_age: record.min_age,
            max_age: record.max_age,
            image_url: record.image_url.filter(|url| !url.is_empty()),
        })
    }
}

/// Empty columns read as the type's default
fn parse_json_column<T>(column: &str, value: &str) -> Result<T>
where
    T: serde::de::DeserializeOwned + Default,
{
    if value.trim().is_empty() {
        return Ok(T::default());
    }
    serde_json::from_str(value).with_context(|| format!("Failed to parse {} column", column))
}

/// CSV-based recipe repository
#[derive(Clone)]
pub struct RecipeRepository {
    connection: CsvConnection,
}

impl RecipeRepository {
    pub fn new(connection: CsvConnection) -> Self {
        Self { connection }
    }

    fn recipes_file_path(&self, profile_id: &str) -> Result<PathBuf> {
        self.connection.ensure_profile_file(profile_id, RECIPES_FILE)
    }

    fn read_recipes(&self, profile_id: &str) -> Result<Vec<Recipe>> {
        let path = self.recipes_file_path(profile_id)?;
        let records: Vec<RecipeRecord> = self.connection.read_csv(&path)?;

        let mut recipes = Vec::with_capacity(records.len());
        for record in records {
            let id = record.id.clone();
            match Recipe::try_from(record) {
                Ok(recipe) => recipes.push(recipe),
                Err(e) => warn!("Failed to parse recipe record {}: {}. Skipping.", id, e),
            }
        }
        Ok(recipes)
    }

    fn write_recipes(&self, profile_id: &str, recipes: &[Recipe]) -> Result<()> {
        let path = self.recipes_file_path(profile_id)?;
        let records = recipes
            .iter()
            .map(RecipeRecord::try_from)
            .collect::<Result<Vec<_>>>()?;
        self.connection.write_csv(&path, HEADER, &records)
    }
}

#[async_trait]
impl RecipeStorage for RecipeRepository {
    async fn store_new_recipes(&self, profile_id: &str, new_recipes: &[Recipe]) -> Result<Vec<Recipe>> {
        let _guard = self.connection.write_lock().await;
        let mut recipes = self.read_recipes(profile_id)?;
        let mut titles: HashSet<String> = recipes.iter().map(Recipe::normalized_title).collect();

        let mut stored = Vec::with_capacity(new_recipes.len());
        for recipe in new_recipes {
            if titles.insert(recipe.normalized_title()) {
                stored.push(recipe.clone());
            } else {
                debug!("Recipe {} already in the library", recipe.title);
            }
        }
        if stored.is_empty() {
            return Ok(stored);
        }

        recipes.extend(stored.iter().cloned());
        self.write_recipes(profile_id, &recipes)?;
        info!("Stored {} recipes for profile {}", stored.len(), profile_id);
        Ok(stored)
    }

    async fn get_recipe(&self, profile_id: &str, recipe_id: &str) -> Result<Option<Recipe>> {
        let _guard = self.connection.read_lock().await;
        Ok(self
            .read_recipes(profile_id)?
            .into_iter()
            .find(|r| r.id == recipe_id))
    }

    async fn list_recipes(&self, profile_id: &str) -> Result<Vec<Recipe>> {
        let _guard = self.connection.read_lock().await;
        let mut recipes = self.read_recipes(profile_id)?;
        recipes.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(recipes)
    }

    async fn delete_recipe(&self, profile_id: &str, recipe_id: &str) -> Result<bool> {
        let _guard = self.connection.write_lock().await;
        let mut recipes = self.read_recipes(profile_id)?;
        let before = recipes.len();
        recipes.retain(|r| r.id != recipe_id);
        if recipes.len() == before {
            return Ok(false);
        }
        self.write_recipes(profile_id, &recipes)?;
        info!("Deleted recipe {} for profile {}", recipe_id, profile_id);
        Ok(true)
    }
}
