//! Translation of service errors into HTTP responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use tracing::error;

use crate::ai::AiError;
use crate::domain::errors::DomainError;

/// Status code for an error returned by a service
pub fn status_for(e: &anyhow::Error) -> StatusCode {
    if let Some(domain_error) = e.downcast_ref::<DomainError>() {
        return match domain_error {
            DomainError::NotFound { .. } => StatusCode::NOT_FOUND,
            DomainError::Validation(_) => StatusCode::BAD_REQUEST,
            DomainError::Conflict(_) => StatusCode::CONFLICT,
        };
    }
    if e.downcast_ref::<AiError>().is_some() {
        return StatusCode::BAD_GATEWAY;
    }
    StatusCode::INTERNAL_SERVER_ERROR
}

/// Log the failure and answer with its status code and message
pub fn error_response(action: &str, e: anyhow::Error) -> Response {
    let status = status_for(&e);
    error!("Failed to {}: {:?}", action, e);
    (status, e.to_string()).into_response()
}
