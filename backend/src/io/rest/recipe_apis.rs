//! # REST API for Recipes
//!
//! The recipe library (filtered by child compatibility) and AI generation.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde::Deserialize;
use tracing::info;

use super::error::error_response;
use super::mappers::RecipeMapper;
use crate::domain::commands::recipe::{GenerateRecipesCommand, ListRecipesCommand};
use crate::domain::errors::DomainError;
use crate::AppState;
use shared::{GenerateRecipesRequest, MealType};

/// Query parameters for the recipe list endpoint
#[derive(Deserialize, Debug, Default)]
pub struct RecipeListQuery {
    /// Comma-separated child IDs
    pub child_ids: Option<String>,
    pub meal_type: Option<String>,
}

impl RecipeListQuery {
    fn child_ids(&self) -> Vec<String> {
        self.child_ids
            .as_deref()
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(str::to_string)
            .collect()
    }

    fn meal_type(&self) -> Result<Option<MealType>, DomainError> {
        match self.meal_type.as_deref().map(str::trim).filter(|m| !m.is_empty()) {
            Some(meal_type) => MealType::from_string(meal_type)
                .map(Some)
                .map_err(DomainError::Validation),
            None => Ok(None),
        }
    }
}

/// List recipes compatible with the selected children
pub async fn list_recipes(
    State(state): State<AppState>,
    Path(profile_id): Path<String>,
    Query(query): Query<RecipeListQuery>,
) -> impl IntoResponse {
    info!("GET /api/profiles/{}/recipes - query: {:?}", profile_id, query);

    let meal_type = match query.meal_type() {
        Ok(meal_type) => meal_type,
        Err(e) => return error_response("list recipes", e.into()),
    };
    let command = ListRecipesCommand {
        profile_id,
        child_ids: query.child_ids(),
        meal_type,
    };
    match state.recipe_service.list_recipes(command).await {
        Ok(result) => (StatusCode::OK, Json(RecipeMapper::to_recipe_list_dto(result.recipes))).into_response(),
        Err(e) => error_response("list recipes", e),
    }
}

pub async fn get_recipe(
    State(state): State<AppState>,
    Path((profile_id, recipe_id)): Path<(String, String)>,
) -> impl IntoResponse {
    info!("GET /api/profiles/{}/recipes/{}", profile_id, recipe_id);

    match state.recipe_service.get_recipe(&profile_id, &recipe_id).await {
        Ok(recipe) => (StatusCode::OK, Json(RecipeMapper::to_dto(recipe))).into_response(),
        Err(e) => error_response("get recipe", e),
    }
}

pub async fn delete_recipe(
    State(state): State<AppState>,
    Path((profile_id, recipe_id)): Path<(String, String)>,
) -> impl IntoResponse {
    info!("DELETE /api/profiles/{}/recipes/{}", profile_id, recipe_id);

    match state.recipe_service.delete_recipe(&profile_id, &recipe_id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => error_response("delete recipe", e),
    }
}

/// Generate recipes with the AI recipe function
pub async fn generate_recipes(
    State(state): State<AppState>,
    Path(profile_id): Path<String>,
    Json(request): Json<GenerateRecipesRequest>,
) -> impl IntoResponse {
    info!("POST /api/profiles/{}/recipes/generate - request: {:?}", profile_id, request);

    let command = GenerateRecipesCommand {
        profile_id,
        child_ids: request.child_ids,
        meal_type: request.meal_type,
        difficulty: request.difficulty,
        count: request.count,
        use_leftovers: request.use_leftovers,
        notes: request.notes,
    };
    match state.recipe_service.generate_recipes(command).await {
        Ok(result) => (StatusCode::CREATED, Json(RecipeMapper::to_generate_response_dto(result))).into_response(),
        Err(e) => error_response("generate recipes", e),
    }
}
