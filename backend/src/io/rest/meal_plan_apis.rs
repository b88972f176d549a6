//! # REST API for the Weekly Meal Planner

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde::Deserialize;
use tracing::info;

use super::error::error_response;
use super::mappers::MealPlanMapper;
use crate::domain::commands::meal_plan::{AssignMealCommand, GetWeekCommand};
use crate::AppState;
use shared::AssignMealRequest;

#[derive(Deserialize, Debug)]
pub struct WeekQuery {
    pub week_start: String,
}

/// Seven days of plans starting at `week_start`
pub async fn get_week(
    State(state): State<AppState>,
    Path(profile_id): Path<String>,
    Query(query): Query<WeekQuery>,
) -> impl IntoResponse {
    info!("GET /api/profiles/{}/meal-plans - week_start={}", profile_id, query.week_start);

    let command = GetWeekCommand {
        profile_id,
        week_start: query.week_start,
    };
    match state.meal_plan_service.get_week(command).await {
        Ok(result) => (StatusCode::OK, Json(MealPlanMapper::to_week_dto(result))).into_response(),
        Err(e) => error_response("get week plan", e),
    }
}

/// Assign a recipe to a (date, meal time, child) slot
pub async fn assign_meal(
    State(state): State<AppState>,
    Path(profile_id): Path<String>,
    Json(request): Json<AssignMealRequest>,
) -> impl IntoResponse {
    info!("PUT /api/profiles/{}/meal-plans - request: {:?}", profile_id, request);

    let command = AssignMealCommand {
        profile_id,
        child_id: request.child_id,
        recipe_id: request.recipe_id,
        date: request.date,
        meal_time: request.meal_time,
    };
    match state.meal_plan_service.assign_meal(command).await {
        Ok(result) => {
            let response = MealPlanMapper::to_meal_plan_response_dto(result.planned_meal, "Meal planned successfully");
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => error_response("assign meal", e),
    }
}

pub async fn remove_meal(
    State(state): State<AppState>,
    Path((profile_id, plan_id)): Path<(String, String)>,
) -> impl IntoResponse {
    info!("DELETE /api/profiles/{}/meal-plans/{}", profile_id, plan_id);

    match state.meal_plan_service.remove_meal(&profile_id, &plan_id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => error_response("remove meal", e),
    }
}
