use anyhow::Result;
use tracing::info;

use crate::domain::commands::pantry::UpsertPantryItemCommand;
use crate::domain::errors::DomainError;
use crate::domain::models::pantry::AvailableIngredient;
use crate::domain::validation::{validate_name, validate_quantity};
use crate::storage::csv::{CsvConnection, PantryRepository};
use crate::storage::traits::PantryStorage;

/// Service for the on-hand inventory subtracted from shopping lists
#[derive(Clone)]
pub struct PantryService {
    pantry_repository: PantryRepository,
}

impl PantryService {
    pub fn new(connection: CsvConnection) -> Self {
        Self {
            pantry_repository: PantryRepository::new(connection),
        }
    }

    /// Add an item, replacing one with the same case-insensitive name
    pub async fn upsert_item(&self, command: UpsertPantryItemCommand) -> Result<AvailableIngredient> {
        info!(
            "Upserting pantry item: {} {} {}",
            command.quantity, command.unit, command.name
        );

        let item = AvailableIngredient {
            id: AvailableIngredient::generate_id(),
            name: validate_name("Ingredient name", &command.name)?,
            quantity: validate_quantity(command.quantity)?,
            unit: command.unit.trim().to_string(),
        };
        self.pantry_repository.upsert_item(&command.profile_id, &item).await
    }

    pub async fn list_items(&self, profile_id: &str) -> Result<Vec<AvailableIngredient>> {
        info!("Listing pantry for profile {}", profile_id);
        self.pantry_repository.list_items(profile_id).await
    }

    pub async fn delete_item(&self, profile_id: &str, item_id: &str) -> Result<()> {
        info!("Deleting pantry item {}", item_id);
        if !self.pantry_repository.delete_item(profile_id, item_id).await? {
            return Err(DomainError::not_found("Pantry item", item_id).into());
        }
        Ok(())
    }
}
