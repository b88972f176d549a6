use anyhow::Result;
use chrono::{Local, NaiveDate, Utc};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{info, warn};

use crate::ai::{parse_generated_recipes, AiClient};
use crate::domain::child_service::ChildService;
use crate::domain::commands::recipe::{
    GenerateRecipesCommand, GenerateRecipesResult, ListRecipesCommand, ListRecipesResult,
};
use crate::domain::compatibility::{filter_compatible, is_compatible};
use crate::domain::errors::DomainError;
use crate::domain::models::recipe::Recipe;
use crate::domain::prompts::{recipe_image_prompt, recipe_prompt, RecipePromptInput};
use crate::storage::csv::{CsvConnection, LeftoverRepository, RecipeRepository};
use crate::storage::traits::{LeftoverStorage, RecipeStorage};

pub const MAX_RECIPES_PER_REQUEST: u8 = 10;

/// Service for the recipe library and AI recipe generation
#[derive(Clone)]
pub struct RecipeService {
    recipe_repository: RecipeRepository,
    leftover_repository: LeftoverRepository,
    child_service: ChildService,
    ai_client: Arc<dyn AiClient>,
}

impl RecipeService {
    pub fn new(connection: CsvConnection, child_service: ChildService, ai_client: Arc<dyn AiClient>) -> Self {
        Self {
            recipe_repository: RecipeRepository::new(connection.clone()),
            leftover_repository: LeftoverRepository::new(connection),
            child_service,
            ai_client,
        }
    }

    /// List recipes, most recent first, keeping only those compatible with
    /// every selected child and matching the meal type when one is given
    pub async fn list_recipes(&self, command: ListRecipesCommand) -> Result<ListRecipesResult> {
        info!(
            "Listing recipes: profile={}, children={:?}, meal_type={:?}",
            command.profile_id, command.child_ids, command.meal_type
        );

        let children = self
            .child_service
            .load_children(&command.profile_id, &command.child_ids)
            .await?;
        let recipes = self.recipe_repository.list_recipes(&command.profile_id).await?;

        let recipes = filter_compatible(recipes, &children, today())
            .into_iter()
            .filter(|r| command.meal_type.map_or(true, |m| r.meal_type == m))
            .collect::<Vec<_>>();

        info!("Found {} matching recipes", recipes.len());
        Ok(ListRecipesResult { recipes })
    }

    pub async fn get_recipe(&self, profile_id: &str, recipe_id: &str) -> Result<Recipe> {
        info!("Getting recipe: {}", recipe_id);
        let recipe = self
            .recipe_repository
            .get_recipe(profile_id, recipe_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Recipe", recipe_id))?;
        Ok(recipe)
    }

    pub async fn delete_recipe(&self, profile_id: &str, recipe_id: &str) -> Result<()> {
        info!("Deleting recipe: {}", recipe_id);
        if !self.recipe_repository.delete_recipe(profile_id, recipe_id).await? {
            return Err(DomainError::not_found("Recipe", recipe_id).into());
        }
        Ok(())
    }

    /// Generate recipes with the AI recipe function, keep the ones every
    /// selected child can eat and that are not already in the library, then
    /// store them
    pub async fn generate_recipes(&self, command: GenerateRecipesCommand) -> Result<GenerateRecipesResult> {
        info!(
            "Generating {} {} recipes for profile {} and children {:?}",
            command.count, command.meal_type, command.profile_id, command.child_ids
        );

        if command.count == 0 || command.count > MAX_RECIPES_PER_REQUEST {
            return Err(DomainError::validation(format!(
                "Recipe count must be between 1 and {}",
                MAX_RECIPES_PER_REQUEST
            ))
            .into());
        }
        if command.child_ids.is_empty() {
            return Err(DomainError::validation("Select at least one child").into());
        }

        let today = today();
        let children = self
            .child_service
            .load_children(&command.profile_id, &command.child_ids)
            .await?;
        let leftovers = if command.use_leftovers {
            self.leftover_repository
                .list_leftovers(&command.profile_id)
                .await?
                .into_iter()
                .filter(|l| !l.is_expired(today))
                .collect()
        } else {
            Vec::new()
        };

        let prompt = recipe_prompt(&RecipePromptInput {
            children: &children,
            meal_type: command.meal_type,
            difficulty: command.difficulty,
            count: command.count,
            leftovers: &leftovers,
            notes: command.notes.as_deref(),
            today,
        });

        // No lock is held while the AI call is in flight
        let raw = self.ai_client.complete_recipes(&prompt).await?;
        let generated = parse_generated_recipes(&raw)?;
        info!("AI returned {} recipes", generated.len());

        let now = Utc::now();
        let difficulty = command.difficulty.unwrap_or_default();
        let mut seen_titles: HashSet<String> = self
            .recipe_repository
            .list_recipes(&command.profile_id)
            .await?
            .iter()
            .map(Recipe::normalized_title)
            .collect();

        let mut recipes = Vec::new();
        let mut skipped_duplicates = 0;
        let mut skipped_incompatible = 0;
        for generated_recipe in generated {
            let recipe = Recipe::from_generated(generated_recipe, command.meal_type, difficulty, now);
            if recipe.title.is_empty() {
                warn!("Dropping generated recipe without a title");
                skipped_incompatible += 1;
                continue;
            }
            if !is_compatible(&recipe, &children, today) {
                warn!("Dropping incompatible recipe: {}", recipe.title);
                skipped_incompatible += 1;
                continue;
            }
            if !seen_titles.insert(recipe.normalized_title()) {
                info!("Dropping duplicate recipe: {}", recipe.title);
                skipped_duplicates += 1;
                continue;
            }
            if recipes.len() < command.count as usize {
                recipes.push(recipe);
            }
        }

        for recipe in recipes.iter_mut() {
            match self.ai_client.generate_image(&recipe_image_prompt(recipe)).await {
                Ok(url) => recipe.image_url = url,
                Err(e) => warn!("Image generation failed for {}: {}", recipe.title, e),
            }
        }

        // The library may have changed while the AI calls were in flight
        if !recipes.is_empty() {
            let stored = self
                .recipe_repository
                .store_new_recipes(&command.profile_id, &recipes)
                .await?;
            skipped_duplicates += recipes.len() - stored.len();
            recipes = stored;
        }

        info!(
            "Generated {} recipes ({} duplicates, {} incompatible skipped)",
            recipes.len(),
            skipped_duplicates,
            skipped_incompatible
        );
        Ok(GenerateRecipesResult {
            recipes,
            skipped_duplicates,
            skipped_incompatible,
        })
    }
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::stub::StubAiClient;
    use crate::ai::AiError;
    use crate::domain::commands::child::CreateChildCommand;
    use crate::storage::csv::test_utils::{sample_recipe, TestEnvironment};
    use shared::MealType;

    struct Fixture {
        service: RecipeService,
        child_id: String,
        env: TestEnvironment,
    }

    async fn setup_test(ai: StubAiClient) -> Fixture {
        let env = TestEnvironment::new().await.unwrap();
        let child_service = ChildService::new(env.connection.clone());
        let child = child_service
            .create_child(CreateChildCommand {
                profile_id: "family".to_string(),
                name: "Alice".to_string(),
                birth_date: "2019-05-01".to_string(),
                allergies: vec!["gluten".to_string()],
                preferences: vec!["pasta".to_string()],
            })
            .await
            .unwrap()
            .child;
        let service = RecipeService::new(env.connection.clone(), child_service, Arc::new(ai));
        Fixture { service, child_id: child.id, env }
    }

    fn generate_command(child_id: &str, count: u8) -> GenerateRecipesCommand {
        GenerateRecipesCommand {
            profile_id: "family".to_string(),
            child_ids: vec![child_id.to_string()],
            meal_type: MealType::Dinner,
            difficulty: None,
            count,
            use_leftovers: false,
            notes: None,
        }
    }

    const GENERATED: &str = r#"```json
    [
        {"title": "Veggie Rice Bowl", "ingredients": [{"item": "rice", "quantity": 1, "unit": "cup"}]},
        {"title": "Wheat Pasta", "allergens": ["gluten"]},
        {"title": "veggie  rice bowl"},
        {"title": "Fish Tacos", "meal_type": "lunch", "difficulty": "hard"}
    ]
    ```"#;

    #[tokio::test]
    async fn test_generate_filters_dedups_and_stores() {
        let fixture = setup_test(StubAiClient::with_recipes(GENERATED)).await;

        let result = fixture
            .service
            .generate_recipes(generate_command(&fixture.child_id, 5))
            .await
            .unwrap();

        let titles: Vec<&str> = result.recipes.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, vec!["Veggie Rice Bowl", "Fish Tacos"]);
        assert_eq!(result.skipped_incompatible, 1);
        assert_eq!(result.skipped_duplicates, 1);
        assert_eq!(result.recipes[0].meal_type, MealType::Dinner);
        assert_eq!(result.recipes[1].meal_type, MealType::Lunch);

        let stored = RecipeRepository::new(fixture.env.connection.clone())
            .list_recipes("family")
            .await
            .unwrap();
        assert_eq!(stored.len(), 2);
    }

    #[tokio::test]
    async fn test_generate_skips_titles_already_in_library() {
        let fixture = setup_test(StubAiClient::with_recipes(GENERATED)).await;
        RecipeRepository::new(fixture.env.connection.clone())
            .store_new_recipes("family", &[sample_recipe("  FISH tacos")])
            .await
            .unwrap();

        let result = fixture
            .service
            .generate_recipes(generate_command(&fixture.child_id, 5))
            .await
            .unwrap();
        assert_eq!(result.recipes.len(), 1);
        assert_eq!(result.skipped_duplicates, 2);
    }

    #[tokio::test]
    async fn test_generate_accepts_null_fields() {
        let raw = r#"[
            {"title": "Egg Fried Rice", "description": null, "ingredients": [{"item": "egg", "quantity": 2, "unit": null}], "allergens": null},
            {"title": null, "description": "nameless"}
        ]"#;
        let fixture = setup_test(StubAiClient::with_recipes(raw)).await;

        let result = fixture
            .service
            .generate_recipes(generate_command(&fixture.child_id, 3))
            .await
            .unwrap();
        assert_eq!(result.recipes.len(), 1);
        assert_eq!(result.recipes[0].ingredients[0].unit, "");
        assert_eq!(result.skipped_incompatible, 1);
    }

    #[tokio::test]
    async fn test_concurrent_generations_store_each_title_once() {
        let fixture = setup_test(StubAiClient::with_recipes(GENERATED)).await;

        let mut handles = Vec::new();
        for _ in 0..4 {
            let service = fixture.service.clone();
            let command = generate_command(&fixture.child_id, 5);
            handles.push(tokio::spawn(async move { service.generate_recipes(command).await }));
        }
        let mut returned = 0;
        for handle in handles {
            returned += handle.await.unwrap().unwrap().recipes.len();
        }

        assert_eq!(returned, 2);
        let stored = RecipeRepository::new(fixture.env.connection.clone())
            .list_recipes("family")
            .await
            .unwrap();
        assert_eq!(stored.len(), 2);
    }

    #[tokio::test]
    async fn test_generate_truncates_to_count_and_attaches_images() {
        let ai = StubAiClient {
            image_url: Some("https://images.example/dish.png".to_string()),
            ..StubAiClient::with_recipes(GENERATED)
        };
        let fixture = setup_test(ai).await;

        let result = fixture
            .service
            .generate_recipes(generate_command(&fixture.child_id, 1))
            .await
            .unwrap();
        assert_eq!(result.recipes.len(), 1);
        assert_eq!(
            result.recipes[0].image_url.as_deref(),
            Some("https://images.example/dish.png")
        );
    }

    #[tokio::test]
    async fn test_image_failures_are_ignored() {
        let ai = StubAiClient {
            fail_images: true,
            ..StubAiClient::with_recipes(GENERATED)
        };
        let fixture = setup_test(ai).await;

        let result = fixture
            .service
            .generate_recipes(generate_command(&fixture.child_id, 5))
            .await
            .unwrap();
        assert_eq!(result.recipes.len(), 2);
        assert!(result.recipes.iter().all(|r| r.image_url.is_none()));
    }

    #[tokio::test]
    async fn test_generate_validation_and_ai_errors() {
        let fixture = setup_test(StubAiClient::with_recipes("not json at all")).await;

        let err = fixture
            .service
            .generate_recipes(generate_command(&fixture.child_id, 11))
            .await
            .unwrap_err();
        assert!(err.downcast_ref::<DomainError>().is_some());

        let err = fixture
            .service
            .generate_recipes(generate_command("child_missing", 2))
            .await
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<DomainError>(),
            Some(DomainError::NotFound { .. })
        ));

        let err = fixture
            .service
            .generate_recipes(generate_command(&fixture.child_id, 2))
            .await
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<AiError>(),
            Some(AiError::InvalidResponse(_))
        ));
    }

    #[tokio::test]
    async fn test_list_recipes_filters_by_children_and_meal_type() {
        let fixture = setup_test(StubAiClient::default()).await;
        let repo = RecipeRepository::new(fixture.env.connection.clone());

        let mut bread = sample_recipe("Bread");
        bread.allergens = vec!["gluten".to_string()];
        let mut porridge = sample_recipe("Porridge");
        porridge.meal_type = MealType::Breakfast;
        let soup = sample_recipe("Soup");
        repo.store_new_recipes("family", &[bread, porridge, soup]).await.unwrap();

        let all = fixture
            .service
            .list_recipes(ListRecipesCommand {
                profile_id: "family".to_string(),
                child_ids: Vec::new(),
                meal_type: None,
            })
            .await
            .unwrap();
        assert_eq!(all.recipes.len(), 3);

        let for_alice = fixture
            .service
            .list_recipes(ListRecipesCommand {
                profile_id: "family".to_string(),
                child_ids: vec![fixture.child_id.clone()],
                meal_type: Some(MealType::Dinner),
            })
            .await
            .unwrap();
        let titles: Vec<&str> = for_alice.recipes.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, vec!["Soup"]);
    }

    #[tokio::test]
    async fn test_get_and_delete_recipe() {
        let fixture = setup_test(StubAiClient::default()).await;
        let recipe = sample_recipe("Soup");
        RecipeRepository::new(fixture.env.connection.clone())
            .store_new_recipes("family", &[recipe.clone()])
            .await
            .unwrap();

        assert_eq!(fixture.service.get_recipe("family", &recipe.id).await.unwrap().title, "Soup");
        fixture.service.delete_recipe("family", &recipe.id).await.unwrap();
        assert!(fixture.service.get_recipe("family", &recipe.id).await.is_err());
        assert!(fixture.service.delete_recipe("family", &recipe.id).await.is_err());
    }
}
