//! # Storage Traits
//!
//! Storage abstraction used by the domain layer. Every operation is scoped to
//! a household profile.

use anyhow::Result;
use async_trait::async_trait;
use chrono::NaiveDate;

use crate::domain::models::child::Child;
use crate::domain::models::leftover::Leftover;
use crate::domain::models::meal_plan::MealPlan;
use crate::domain::models::pantry::AvailableIngredient;
use crate::domain::models::recipe::Recipe;
use crate::domain::models::shopping_list::ShoppingList;

#[async_trait]
pub trait ChildStorage: Send + Sync {
    /// Store a new child. Fails with a conflict when another child of the
    /// profile already has the same name, ignoring case.
    async fn store_child(&self, profile_id: &str, child: &Child) -> Result<()>;

    /// Retrieve a specific child by ID
    async fn get_child(&self, profile_id: &str, child_id: &str) -> Result<Option<Child>>;

    /// List all children ordered by name
    async fn list_children(&self, profile_id: &str) -> Result<Vec<Child>>;

    /// Apply `apply` to a stored child and save it, all under the write lock.
    /// Returns None when the child does not exist; a rename onto another
    /// child's name fails with a conflict.
    async fn modify_child<F>(&self, profile_id: &str, child_id: &str, apply: F) -> Result<Option<Child>>
    where
        F: FnOnce(&mut Child) -> Result<()> + Send + 'static;

    /// Delete a child; returns false when it did not exist
    async fn delete_child(&self, profile_id: &str, child_id: &str) -> Result<bool>;
}

#[async_trait]
pub trait RecipeStorage: Send + Sync {
    /// Append the recipes whose normalized title is not in the library yet
    /// (nor earlier in the batch). Returns the recipes actually stored.
    async fn store_new_recipes(&self, profile_id: &str, recipes: &[Recipe]) -> Result<Vec<Recipe>>;

    async fn get_recipe(&self, profile_id: &str, recipe_id: &str) -> Result<Option<Recipe>>;

    /// List recipes, most recent first
    async fn list_recipes(&self, profile_id: &str) -> Result<Vec<Recipe>>;

    async fn delete_recipe(&self, profile_id: &str, recipe_id: &str) -> Result<bool>;
}

#[async_trait]
pub trait MealPlanStorage: Send + Sync {
    /// Insert a plan, or repoint the existing plan occupying the same
    /// (date, meal time, child) slot. Returns the stored row.
    async fn upsert_meal_plan(&self, plan: &MealPlan) -> Result<MealPlan>;

    /// Plans with `start <= date <= end`, ordered by date then meal time
    async fn list_meal_plans(
        &self,
        profile_id: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<MealPlan>>;

    async fn delete_meal_plan(&self, profile_id: &str, plan_id: &str) -> Result<bool>;

    /// Remove every plan of a child; returns the number removed
    async fn delete_meal_plans_for_child(&self, profile_id: &str, child_id: &str) -> Result<u32>;
}

#[async_trait]
pub trait LeftoverStorage: Send + Sync {
    async fn store_leftover(&self, profile_id: &str, leftover: &Leftover) -> Result<()>;

    async fn get_leftover(&self, profile_id: &str, leftover_id: &str) -> Result<Option<Leftover>>;

    /// List leftovers, soonest expiry first
    async fn list_leftovers(&self, profile_id: &str) -> Result<Vec<Leftover>>;

    /// Apply `apply` to a stored leftover and save it under the write lock.
    /// Returns None when the leftover does not exist.
    async fn modify_leftover<F>(&self, profile_id: &str, leftover_id: &str, apply: F) -> Result<Option<Leftover>>
    where
        F: FnOnce(&mut Leftover) + Send + 'static;

    async fn delete_leftover(&self, profile_id: &str, leftover_id: &str) -> Result<bool>;
}

#[async_trait]
pub trait PantryStorage: Send + Sync {
    /// Add an item, replacing one with the same case-insensitive name
    async fn upsert_item(&self, profile_id: &str, item: &AvailableIngredient) -> Result<AvailableIngredient>;

    /// List items ordered by name
    async fn list_items(&self, profile_id: &str) -> Result<Vec<AvailableIngredient>>;

    async fn delete_item(&self, profile_id: &str, item_id: &str) -> Result<bool>;
}

#[async_trait]
pub trait ShoppingListStorage: Send + Sync {
    async fn get_shopping_list(&self, profile_id: &str) -> Result<Option<ShoppingList>>;

    /// Overwrite the profile's list wholesale
    async fn save_shopping_list(&self, list: &ShoppingList) -> Result<()>;

    /// Apply `apply` to the stored list (an empty one when none exists) and
    /// save it under the write lock. Nothing is written when `apply` fails.
    async fn modify_shopping_list<F>(&self, profile_id: &str, apply: F) -> Result<ShoppingList>
    where
        F: FnOnce(&mut ShoppingList) -> Result<()> + Send + 'static;
}

#[async_trait]
pub trait PhotoStorage: Send + Sync {
    /// Store photo bytes; returns the path relative to the data directory
    async fn store_photo(&self, profile_id: &str, bytes: &[u8], extension: &str) -> Result<String>;

    /// Remove a stored photo given its relative path
    async fn delete_photo(&self, relative_path: &str) -> Result<()>;
}
