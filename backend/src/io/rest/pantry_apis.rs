//! # REST API for the Pantry

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use tracing::info;

use super::error::error_response;
use super::mappers::ShoppingMapper;
use crate::domain::commands::pantry::UpsertPantryItemCommand;
use crate::AppState;
use shared::UpsertPantryItemRequest;

pub async fn list_pantry(
    State(state): State<AppState>,
    Path(profile_id): Path<String>,
) -> impl IntoResponse {
    info!("GET /api/profiles/{}/pantry", profile_id);

    match state.pantry_service.list_items(&profile_id).await {
        Ok(items) => (StatusCode::OK, Json(ShoppingMapper::to_pantry_dto(items))).into_response(),
        Err(e) => error_response("list pantry", e),
    }
}

/// Add an item or replace the one with the same name
pub async fn upsert_pantry_item(
    State(state): State<AppState>,
    Path(profile_id): Path<String>,
    Json(request): Json<UpsertPantryItemRequest>,
) -> impl IntoResponse {
    info!("POST /api/profiles/{}/pantry - request: {:?}", profile_id, request);

    let command = UpsertPantryItemCommand {
        profile_id,
        name: request.name,
        quantity: request.quantity,
        unit: request.unit,
    };
    match state.pantry_service.upsert_item(command).await {
        Ok(item) => (StatusCode::OK, Json(ShoppingMapper::to_pantry_item_dto(item))).into_response(),
        Err(e) => error_response("upsert pantry item", e),
    }
}

pub async fn delete_pantry_item(
    State(state): State<AppState>,
    Path((profile_id, item_id)): Path<(String, String)>,
) -> impl IntoResponse {
    info!("DELETE /api/profiles/{}/pantry/{}", profile_id, item_id);

    match state.pantry_service.delete_item(&profile_id, &item_id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => error_response("delete pantry item", e),
    }
}
