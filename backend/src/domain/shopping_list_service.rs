use anyhow::Result;
use chrono::Utc;
use std::collections::HashMap;
use tracing::info;

use crate::domain::commands::shopping_list::{GenerateShoppingListCommand, SetItemCheckedCommand};
use crate::domain::errors::DomainError;
use crate::domain::models::shopping_list::ShoppingList;
use crate::domain::shopping_aggregation::aggregate_meal_plans;
use crate::domain::validation::parse_date;
use crate::storage::csv::{
    CsvConnection, MealPlanRepository, PantryRepository, RecipeRepository, ShoppingListRepository,
};
use crate::storage::traits::{MealPlanStorage, PantryStorage, RecipeStorage, ShoppingListStorage};

/// Service deriving shopping lists from planned meals
#[derive(Clone)]
pub struct ShoppingListService {
    meal_plan_repository: MealPlanRepository,
    recipe_repository: RecipeRepository,
    pantry_repository: PantryRepository,
    shopping_list_repository: ShoppingListRepository,
}

impl ShoppingListService {
    pub fn new(connection: CsvConnection) -> Self {
        Self {
            meal_plan_repository: MealPlanRepository::new(connection.clone()),
            recipe_repository: RecipeRepository::new(connection.clone()),
            pantry_repository: PantryRepository::new(connection.clone()),
            shopping_list_repository: ShoppingListRepository::new(connection),
        }
    }

    /// Aggregate the ingredients of every meal planned in the window, minus
    /// the pantry, and overwrite the stored list
    pub async fn generate(&self, command: GenerateShoppingListCommand) -> Result<ShoppingList> {
        info!(
            "Generating shopping list for profile {} from {} to {}",
            command.profile_id, command.start_date, command.end_date
        );

        let start = parse_date("Start date", &command.start_date)?;
        let end = parse_date("End date", &command.end_date)?;
        if end < start {
            return Err(DomainError::validation("End date cannot be before start date").into());
        }

        let plans = self
            .meal_plan_repository
            .list_meal_plans(&command.profile_id, start, end)
            .await?;
        let recipes: HashMap<_, _> = self
            .recipe_repository
            .list_recipes(&command.profile_id)
            .await?
            .into_iter()
            .map(|r| (r.id.clone(), r))
            .collect();
        let on_hand = self.pantry_repository.list_items(&command.profile_id).await?;

        let list = ShoppingList {
            profile_id: command.profile_id,
            items: aggregate_meal_plans(&plans, &recipes, &on_hand),
            updated_at: Some(Utc::now()),
        };
        self.shopping_list_repository.save_shopping_list(&list).await?;

        info!("Shopping list has {} items from {} meals", list.items.len(), plans.len());
        Ok(list)
    }

    /// The stored list, empty when none was generated yet
    pub async fn get(&self, profile_id: &str) -> Result<ShoppingList> {
        info!("Getting shopping list for profile {}", profile_id);
        Ok(self
            .shopping_list_repository
            .get_shopping_list(profile_id)
            .await?
            .unwrap_or_else(|| ShoppingList::empty(profile_id)))
    }

    pub async fn set_item_checked(&self, command: SetItemCheckedCommand) -> Result<ShoppingList> {
        info!(
            "Setting shopping list item {} checked={} for profile {}",
            command.index, command.checked, command.profile_id
        );

        let SetItemCheckedCommand { profile_id, index, checked } = command;
        self.shopping_list_repository
            .modify_shopping_list(&profile_id, move |list| {
                let item = list
                    .items
                    .get_mut(index)
                    .ok_or_else(|| DomainError::not_found("Shopping list item", index.to_string()))?;
                item.checked = checked;
                list.updated_at = Some(Utc::now());
                Ok(())
            })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::meal_plan::MealPlan;
    use crate::domain::models::pantry::AvailableIngredient;
    use crate::storage::csv::test_utils::{sample_recipe, TestEnvironment};
    use chrono::NaiveDate;
    use shared::{Ingredient, MealType, ShoppingListItem};

    fn ingredient(item: &str, quantity: f64, unit: &str) -> Ingredient {
        Ingredient {
            item: item.to_string(),
            quantity,
            unit: unit.to_string(),
        }
    }

    async fn plan(env: &TestEnvironment, recipe_id: &str, date: &str, meal_time: MealType) {
        MealPlanRepository::new(env.connection.clone())
            .upsert_meal_plan(&MealPlan {
                id: MealPlan::generate_id(),
                profile_id: "family".to_string(),
                child_id: "child_a".to_string(),
                recipe_id: recipe_id.to_string(),
                date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
                meal_time,
            })
            .await
            .unwrap();
    }

    fn window(start: &str, end: &str) -> GenerateShoppingListCommand {
        GenerateShoppingListCommand {
            profile_id: "family".to_string(),
            start_date: start.to_string(),
            end_date: end.to_string(),
        }
    }

    #[tokio::test]
    async fn test_generate_subtracts_pantry_and_overwrites() {
        let env = TestEnvironment::new().await.unwrap();
        let service = ShoppingListService::new(env.connection.clone());

        let mut salad = sample_recipe("Salad");
        salad.ingredients = vec![ingredient("Tomato", 2.0, "pcs"), ingredient("cucumber", 1.0, "pcs")];
        let mut soup = sample_recipe("Soup");
        soup.ingredients = vec![ingredient("tomato", 1.0, "pcs"), ingredient("milk", 0.5, "l")];
        RecipeRepository::new(env.connection.clone())
            .store_new_recipes("family", &[salad.clone(), soup.clone()])
            .await
            .unwrap();
        plan(&env, &salad.id, "2025-03-10", MealType::Lunch).await;
        plan(&env, &soup.id, "2025-03-11", MealType::Dinner).await;
        plan(&env, &soup.id, "2025-03-20", MealType::Dinner).await;
        plan(&env, "recipe_deleted", "2025-03-11", MealType::Lunch).await;

        PantryRepository::new(env.connection.clone())
            .upsert_item(
                "family",
                &AvailableIngredient {
                    id: AvailableIngredient::generate_id(),
                    name: "TOMATO".to_string(),
                    quantity: 2.0,
                    unit: "pcs".to_string(),
                },
            )
            .await
            .unwrap();

        let list = service.generate(window("2025-03-10", "2025-03-16")).await.unwrap();
        let items: Vec<(&str, f64)> = list.items.iter().map(|i| (i.item.as_str(), i.quantity)).collect();
        assert_eq!(items, vec![("cucumber", 1.0), ("milk", 0.5), ("tomato", 1.0)]);

        let stored = service.get("family").await.unwrap();
        assert_eq!(stored, list);

        let narrower = service.generate(window("2025-03-11", "2025-03-11")).await.unwrap();
        assert_eq!(narrower.items.len(), 1);
        assert_eq!(service.get("family").await.unwrap().items.len(), 1);
    }

    #[tokio::test]
    async fn test_check_items() {
        let env = TestEnvironment::new().await.unwrap();
        let service = ShoppingListService::new(env.connection.clone());

        let mut salad = sample_recipe("Salad");
        salad.ingredients = vec![ingredient("tomato", 2.0, "pcs")];
        RecipeRepository::new(env.connection.clone())
            .store_new_recipes("family", &[salad.clone()])
            .await
            .unwrap();
        plan(&env, &salad.id, "2025-03-10", MealType::Lunch).await;
        service.generate(window("2025-03-10", "2025-03-10")).await.unwrap();

        let list = service
            .set_item_checked(SetItemCheckedCommand {
                profile_id: "family".to_string(),
                index: 0,
                checked: true,
            })
            .await
            .unwrap();
        assert!(list.items[0].checked);
        assert!(service.get("family").await.unwrap().items[0].checked);

        let err = service
            .set_item_checked(SetItemCheckedCommand {
                profile_id: "family".to_string(),
                index: 3,
                checked: true,
            })
            .await
            .unwrap_err();
        assert!(matches!(err.downcast_ref::<DomainError>(), Some(DomainError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_concurrent_checks_all_land() {
        let env = TestEnvironment::new().await.unwrap();
        let service = ShoppingListService::new(env.connection.clone());

        let mut list = ShoppingList::empty("family");
        list.items = (0..16)
            .map(|i| ShoppingListItem {
                item: format!("item {}", i),
                quantity: 1.0,
                unit: "pcs".to_string(),
                checked: false,
            })
            .collect();
        ShoppingListRepository::new(env.connection.clone())
            .save_shopping_list(&list)
            .await
            .unwrap();

        let mut handles = Vec::new();
        for index in 0..16 {
            let service = service.clone();
            handles.push(tokio::spawn(async move {
                service
                    .set_item_checked(SetItemCheckedCommand {
                        profile_id: "family".to_string(),
                        index,
                        checked: true,
                    })
                    .await
            }));
        }
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        let stored = service.get("family").await.unwrap();
        assert_eq!(stored.items.iter().filter(|item| item.checked).count(), 16);
    }

    #[tokio::test]
    async fn test_empty_list_and_bad_window() {
        let env = TestEnvironment::new().await.unwrap();
        let service = ShoppingListService::new(env.connection.clone());

        let list = service.get("family").await.unwrap();
        assert!(list.items.is_empty());
        assert!(list.updated_at.is_none());

        assert!(service.generate(window("2025-03-12", "2025-03-10")).await.is_err());
    }
}
