//! # REST API for the Shopping List

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use tracing::info;

use super::error::error_response;
use super::mappers::ShoppingMapper;
use crate::domain::commands::shopping_list::{GenerateShoppingListCommand, SetItemCheckedCommand};
use crate::AppState;
use shared::{GenerateShoppingListRequest, UpdateShoppingItemRequest};

pub async fn get_shopping_list(
    State(state): State<AppState>,
    Path(profile_id): Path<String>,
) -> impl IntoResponse {
    info!("GET /api/profiles/{}/shopping-list", profile_id);

    match state.shopping_list_service.get(&profile_id).await {
        Ok(list) => (StatusCode::OK, Json(ShoppingMapper::to_shopping_list_dto(list))).into_response(),
        Err(e) => error_response("get shopping list", e),
    }
}

/// Rebuild the list from the meals planned in a date window
pub async fn generate_shopping_list(
    State(state): State<AppState>,
    Path(profile_id): Path<String>,
    Json(request): Json<GenerateShoppingListRequest>,
) -> impl IntoResponse {
    info!("POST /api/profiles/{}/shopping-list/generate - request: {:?}", profile_id, request);

    let command = GenerateShoppingListCommand {
        profile_id,
        start_date: request.start_date,
        end_date: request.end_date,
    };
    match state.shopping_list_service.generate(command).await {
        Ok(list) => (StatusCode::OK, Json(ShoppingMapper::to_shopping_list_dto(list))).into_response(),
        Err(e) => error_response("generate shopping list", e),
    }
}

pub async fn update_shopping_item(
    State(state): State<AppState>,
    Path((profile_id, index)): Path<(String, usize)>,
    Json(request): Json<UpdateShoppingItemRequest>,
) -> impl IntoResponse {
    info!(
        "PUT /api/profiles/{}/shopping-list/items/{} - checked={}",
        profile_id, index, request.checked
    );

    let command = SetItemCheckedCommand {
        profile_id,
        index,
        checked: request.checked,
    };
    match state.shopping_list_service.set_item_checked(command).await {
        Ok(list) => (StatusCode::OK, Json(ShoppingMapper::to_shopping_list_dto(list))).into_response(),
        Err(e) => error_response("update shopping list item", e),
    }
}
