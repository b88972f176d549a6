//! Command and result types passed between the REST layer and the services.

pub mod child;
pub mod leftover;
pub mod meal_plan;
pub mod pantry;
pub mod recipe;
pub mod shopping_list;
pub mod statistics;
