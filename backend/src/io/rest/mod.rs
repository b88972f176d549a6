//! # REST API Interface Layer
//!
//! HTTP endpoints for the meal planner. Handlers translate requests into
//! domain commands, call the services and map results back to the shared
//! DTOs. Errors are logged and turned into status codes in [`error`].

pub mod child_apis;
pub mod error;
pub mod leftover_apis;
pub mod mappers;
pub mod meal_plan_apis;
pub mod pantry_apis;
pub mod recipe_apis;
pub mod shopping_list_apis;
pub mod statistics_apis;
