//! # Domain Layer
//!
//! Business rules of the meal planner. Services take commands, validate them,
//! talk to storage through the repository traits and return domain models.
//! The pure pieces (age, compatibility, shopping aggregation, statistics) have
//! no I/O and are tested directly.

pub mod age;
pub mod child_service;
pub mod commands;
pub mod compatibility;
pub mod errors;
pub mod leftover_service;
pub mod meal_plan_service;
pub mod models;
pub mod pantry_service;
pub mod prompts;
pub mod recipe_service;
pub mod shopping_aggregation;
pub mod shopping_list_service;
pub mod statistics_service;
pub mod validation;

pub use child_service::ChildService;
pub use errors::DomainError;
pub use leftover_service::LeftoverService;
pub use meal_plan_service::MealPlanService;
pub use pantry_service::PantryService;
pub use recipe_service::RecipeService;
pub use shopping_list_service::ShoppingListService;
pub use statistics_service::StatisticsService;
