use shared::{Difficulty, MealType};

use crate::domain::models::recipe::Recipe;

#[derive(Debug, Clone)]
pub struct ListRecipesCommand {
    pub profile_id: String,
    /// Only recipes compatible with every listed child are returned
    pub child_ids: Vec<String>,
    pub meal_type: Option<MealType>,
}

#[derive(Debug, Clone)]
pub struct ListRecipesResult {
    pub recipes: Vec<Recipe>,
}

#[derive(Debug, Clone)]
pub struct GenerateRecipesCommand {
    pub profile_id: String,
    pub child_ids: Vec<String>,
    pub meal_type: MealType,
    pub difficulty: Option<Difficulty>,
    pub count: u8,
    pub use_leftovers: bool,
    pub notes: Option<String>,
}

#[derive(Debug, Clone)]
pub struct GenerateRecipesResult {
    pub recipes: Vec<Recipe>,
    pub skipped_duplicates: usize,
    pub skipped_incompatible: usize,
}
