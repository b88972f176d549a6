//! File-based storage: CSV tables, YAML child documents, a JSON shopping list
//! and raw photo files, all under one data directory.

pub mod child_repository;
pub mod connection;
pub mod leftover_repository;
pub mod meal_plan_repository;
pub mod pantry_repository;
pub mod photo_store;
pub mod recipe_repository;
pub mod shopping_list_repository;

#[cfg(test)]
pub mod test_utils;

pub use child_repository::ChildRepository;
pub use connection::CsvConnection;
pub use leftover_repository::LeftoverRepository;
pub use meal_plan_repository::MealPlanRepository;
pub use pantry_repository::PantryRepository;
pub use photo_store::PhotoStore;
pub use recipe_repository::RecipeRepository;
pub use shopping_list_repository::ShoppingListRepository;
