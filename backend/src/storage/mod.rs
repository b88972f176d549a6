//! # Storage Module
//!
//! Persistence for the meal planner. The domain layer talks to the traits in
//! [`traits`]; [`csv`] implements them on top of plain files in the data
//! directory.

pub mod csv;
pub mod traits;

pub use traits::{
    ChildStorage, LeftoverStorage, MealPlanStorage, PantryStorage, PhotoStorage, RecipeStorage,
    ShoppingListStorage,
};
