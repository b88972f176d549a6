//! # REST API for Child Profiles
//!
//! Endpoints for creating, retrieving, updating, and deleting the children of
//! a household profile. Responses carry the age computed at request time.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use chrono::Local;
use tracing::info;

use super::error::error_response;
use super::mappers::ChildMapper;
use crate::domain::commands::child::{
    CreateChildCommand, DeleteChildCommand, GetChildCommand, UpdateChildCommand,
};
use crate::AppState;
use shared::{CreateChildRequest, UpdateChildRequest};

/// Create a new child
pub async fn create_child(
    State(state): State<AppState>,
    Path(profile_id): Path<String>,
    Json(request): Json<CreateChildRequest>,
) -> impl IntoResponse {
    info!("POST /api/profiles/{}/children - request: {:?}", profile_id, request);

    let command = CreateChildCommand {
        profile_id,
        name: request.name,
        birth_date: request.birth_date,
        allergies: request.allergies,
        preferences: request.preferences,
    };
    match state.child_service.create_child(command).await {
        Ok(result) => {
            let response = ChildMapper::to_child_response_dto(
                result.child,
                Local::now().date_naive(),
                "Child created successfully",
            );
            (StatusCode::CREATED, Json(response)).into_response()
        }
        Err(e) => error_response("create child", e),
    }
}

/// List all children
pub async fn list_children(
    State(state): State<AppState>,
    Path(profile_id): Path<String>,
) -> impl IntoResponse {
    info!("GET /api/profiles/{}/children", profile_id);

    match state.child_service.list_children(&profile_id).await {
        Ok(result) => {
            let response = ChildMapper::to_child_list_dto(result.children, Local::now().date_naive());
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => error_response("list children", e),
    }
}

/// Get a child by ID
pub async fn get_child(
    State(state): State<AppState>,
    Path((profile_id, child_id)): Path<(String, String)>,
) -> impl IntoResponse {
    info!("GET /api/profiles/{}/children/{}", profile_id, child_id);

    let command = GetChildCommand { profile_id, child_id };
    match state.child_service.get_child(command).await {
        Ok(result) => {
            let child = ChildMapper::to_dto(result.child, Local::now().date_naive());
            (StatusCode::OK, Json(child)).into_response()
        }
        Err(e) => error_response("get child", e),
    }
}

/// Update a child
pub async fn update_child(
    State(state): State<AppState>,
    Path((profile_id, child_id)): Path<(String, String)>,
    Json(request): Json<UpdateChildRequest>,
) -> impl IntoResponse {
    info!("PUT /api/profiles/{}/children/{} - request: {:?}", profile_id, child_id, request);

    let command = UpdateChildCommand {
        profile_id,
        child_id,
        name: request.name,
        birth_date: request.birth_date,
        allergies: request.allergies,
        preferences: request.preferences,
    };
    match state.child_service.update_child(command).await {
        Ok(result) => {
            let response = ChildMapper::to_child_response_dto(
                result.child,
                Local::now().date_naive(),
                "Child updated successfully",
            );
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => error_response("update child", e),
    }
}

/// Delete a child and its meal plans
pub async fn delete_child(
    State(state): State<AppState>,
    Path((profile_id, child_id)): Path<(String, String)>,
) -> impl IntoResponse {
    info!("DELETE /api/profiles/{}/children/{}", profile_id, child_id);

    let command = DeleteChildCommand { profile_id, child_id };
    match state.child_service.delete_child(command).await {
        Ok(_) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => error_response("delete child", e),
    }
}
