use shared::{GenerateRecipesResponse, Recipe as SharedRecipe, RecipeListResponse};

use crate::domain::commands::recipe::GenerateRecipesResult;
use crate::domain::models::recipe::Recipe as DomainRecipe;

pub struct RecipeMapper;

impl RecipeMapper {
    pub fn to_dto(domain: DomainRecipe) -> SharedRecipe {
        SharedRecipe {
            id: domain.id,
            title: domain.title,
            description: domain.description,
            ingredients: domain.ingredients,
            instructions: domain.instructions,
            nutritional_info: domain.nutritional_info,
            meal_type: domain.meal_type,
            difficulty: domain.difficulty,
            prep_time_minutes: domain.prep_time_minutes,
            health_benefits: domain.health_benefits,
            allergens: domain.allergens,
            min_age: domain.min_age,
            max_age: domain.max_age,
            image_url: domain.image_url,
            created_at: domain.created_at.to_rfc3339(),
        }
    }

    pub fn to_recipe_list_dto(recipes: Vec<DomainRecipe>) -> RecipeListResponse {
        RecipeListResponse {
            recipes: recipes.into_iter().map(Self::to_dto).collect(),
        }
    }

    pub fn to_generate_response_dto(result: GenerateRecipesResult) -> GenerateRecipesResponse {
        GenerateRecipesResponse {
            recipes: result.recipes.into_iter().map(Self::to_dto).collect(),
            skipped_duplicates: result.skipped_duplicates,
            skipped_incompatible: result.skipped_incompatible,
        }
    }
}
