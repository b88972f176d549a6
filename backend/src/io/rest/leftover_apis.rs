//! # REST API for Leftovers
//!
//! Leftover tracking, photo uploads (raw request body, type taken from the
//! `Content-Type` header) and AI analysis.

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Json},
};
use tracing::info;

use super::error::error_response;
use super::mappers::LeftoverMapper;
use crate::domain::commands::leftover::{
    AddPhotoCommand, AnalyzeLeftoversCommand, CreateLeftoverCommand, UpdateLeftoverCommand,
};
use crate::AppState;
use shared::{AnalyzeLeftoversRequest, AnalyzeLeftoversResponse, CreateLeftoverRequest, UpdateLeftoverRequest};

pub async fn list_leftovers(
    State(state): State<AppState>,
    Path(profile_id): Path<String>,
) -> impl IntoResponse {
    info!("GET /api/profiles/{}/leftovers", profile_id);

    match state.leftover_service.list_leftovers(&profile_id).await {
        Ok(leftovers) => {
            let service = &state.leftover_service;
            let response = LeftoverMapper::to_leftover_list_dto(leftovers, |p| service.photo_url(p));
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => error_response("list leftovers", e),
    }
}

pub async fn create_leftover(
    State(state): State<AppState>,
    Path(profile_id): Path<String>,
    Json(request): Json<CreateLeftoverRequest>,
) -> impl IntoResponse {
    info!("POST /api/profiles/{}/leftovers - request: {:?}", profile_id, request);

    let command = CreateLeftoverCommand {
        profile_id,
        ingredient_name: request.ingredient_name,
        quantity: request.quantity,
        unit: request.unit,
        expiry_date: request.expiry_date,
    };
    match state.leftover_service.create_leftover(command).await {
        Ok(result) => {
            let service = &state.leftover_service;
            let response = LeftoverMapper::to_leftover_response_dto(
                result.leftover,
                |p| service.photo_url(p),
                "Leftover added successfully",
            );
            (StatusCode::CREATED, Json(response)).into_response()
        }
        Err(e) => error_response("create leftover", e),
    }
}

pub async fn update_leftover(
    State(state): State<AppState>,
    Path((profile_id, leftover_id)): Path<(String, String)>,
    Json(request): Json<UpdateLeftoverRequest>,
) -> impl IntoResponse {
    info!("PUT /api/profiles/{}/leftovers/{} - request: {:?}", profile_id, leftover_id, request);

    let command = UpdateLeftoverCommand {
        profile_id,
        leftover_id,
        ingredient_name: request.ingredient_name,
        quantity: request.quantity,
        unit: request.unit,
        expiry_date: request.expiry_date,
    };
    match state.leftover_service.update_leftover(command).await {
        Ok(result) => {
            let service = &state.leftover_service;
            let response = LeftoverMapper::to_leftover_response_dto(
                result.leftover,
                |p| service.photo_url(p),
                "Leftover updated successfully",
            );
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => error_response("update leftover", e),
    }
}

pub async fn delete_leftover(
    State(state): State<AppState>,
    Path((profile_id, leftover_id)): Path<(String, String)>,
) -> impl IntoResponse {
    info!("DELETE /api/profiles/{}/leftovers/{}", profile_id, leftover_id);

    match state.leftover_service.delete_leftover(&profile_id, &leftover_id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => error_response("delete leftover", e),
    }
}

/// Upload one photo as the raw request body
pub async fn upload_photo(
    State(state): State<AppState>,
    Path((profile_id, leftover_id)): Path<(String, String)>,
    headers: HeaderMap,
    body: Bytes,
) -> impl IntoResponse {
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    info!(
        "POST /api/profiles/{}/leftovers/{}/photos - {} bytes, content type {:?}",
        profile_id,
        leftover_id,
        body.len(),
        content_type
    );

    let command = AddPhotoCommand {
        profile_id,
        leftover_id,
        content_type,
        bytes: body.to_vec(),
    };
    match state.leftover_service.add_photo(command).await {
        Ok(result) => {
            let service = &state.leftover_service;
            let response = LeftoverMapper::to_leftover_response_dto(
                result.leftover,
                |p| service.photo_url(p),
                "Photo uploaded successfully",
            );
            (StatusCode::CREATED, Json(response)).into_response()
        }
        Err(e) => error_response("upload photo", e),
    }
}

/// Run the AI analysis over some or all leftovers
pub async fn analyze_leftovers(
    State(state): State<AppState>,
    Path(profile_id): Path<String>,
    Json(request): Json<AnalyzeLeftoversRequest>,
) -> impl IntoResponse {
    info!("POST /api/profiles/{}/leftovers/analyze - request: {:?}", profile_id, request);

    let command = AnalyzeLeftoversCommand {
        profile_id,
        leftover_ids: request.leftover_ids,
    };
    match state.leftover_service.analyze_leftovers(command).await {
        Ok(result) => (
            StatusCode::OK,
            Json(AnalyzeLeftoversResponse {
                analysis: result.analysis,
            }),
        )
            .into_response(),
        Err(e) => error_response("analyze leftovers", e),
    }
}
