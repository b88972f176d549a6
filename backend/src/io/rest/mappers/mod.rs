//! Conversions from domain models to the shared API DTOs.

pub mod child_mapper;
pub mod leftover_mapper;
pub mod meal_plan_mapper;
pub mod recipe_mapper;
pub mod shopping_mapper;

pub use child_mapper::ChildMapper;
pub use leftover_mapper::LeftoverMapper;
pub use meal_plan_mapper::MealPlanMapper;
pub use recipe_mapper::RecipeMapper;
pub use shopping_mapper::ShoppingMapper;
