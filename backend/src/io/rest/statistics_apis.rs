//! # REST API for Statistics

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde::Deserialize;
use tracing::info;

use super::error::error_response;
use crate::domain::commands::statistics::GetStatisticsCommand;
use crate::AppState;

#[derive(Deserialize, Debug)]
pub struct StatisticsQuery {
    pub start_date: String,
    pub end_date: String,
}

pub async fn get_statistics(
    State(state): State<AppState>,
    Path(profile_id): Path<String>,
    Query(query): Query<StatisticsQuery>,
) -> impl IntoResponse {
    info!("GET /api/profiles/{}/statistics - query: {:?}", profile_id, query);

    let command = GetStatisticsCommand {
        profile_id,
        start_date: query.start_date,
        end_date: query.end_date,
    };
    match state.statistics_service.get_statistics(command).await {
        Ok(statistics) => (StatusCode::OK, Json(statistics)).into_response(),
        Err(e) => error_response("compute statistics", e),
    }
}
