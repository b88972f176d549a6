pub mod child;
pub mod leftover;
pub mod meal_plan;
pub mod pantry;
pub mod recipe;
pub mod shopping_list;
