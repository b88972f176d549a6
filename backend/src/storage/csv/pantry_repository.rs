//! # CSV Pantry Repository
//!
//! On-hand ingredients live in `{profile_id}/pantry.csv`, at most one row per
//! case-insensitive ingredient name.

use anyhow::Result;
use async_trait::async_trait;
use std::path::PathBuf;
use tracing::info;

use super::connection::CsvConnection;
use crate::domain::models::pantry::AvailableIngredient;
use crate::storage::traits::PantryStorage;

const PANTRY_FILE: &str = "pantry.csv";
const HEADER: &[&str] = &["id", "name", "quantity", "unit"];

/// CSV-based pantry repository; rows map directly onto the domain model
#[derive(Clone)]
pub struct PantryRepository {
    connection: CsvConnection,
}

impl PantryRepository {
    pub fn new(connection: CsvConnection) -> Self {
        Self { connection }
    }

    fn pantry_file_path(&self, profile_id: &str) -> Result<PathBuf> {
        self.connection.ensure_profile_file(profile_id, PANTRY_FILE)
    }

    fn read_items(&self, profile_id: &str) -> Result<Vec<AvailableIngredient>> {
        let path = self.pantry_file_path(profile_id)?;
        self.connection.read_csv(&path)
    }

    fn write_items(&self, profile_id: &str, items: &[AvailableIngredient]) -> Result<()> {
        let path = self.pantry_file_path(profile_id)?;
        self.connection.write_csv(&path, HEADER, items)
    }
}

#[async_trait]
impl PantryStorage for PantryRepository {
    async fn upsert_item(&self, profile_id: &str, item: &AvailableIngredient) -> Result<AvailableIngredient> {
        let _guard = self.connection.write_lock().await;
        let mut items = self.read_items(profile_id)?;
        let key = item.match_key();

        let stored = match items.iter_mut().find(|existing| existing.match_key() == key) {
            Some(existing) => {
                existing.name = item.name.clone();
                existing.quantity = item.quantity;
                existing.unit = item.unit.clone();
                existing.clone()
            }
            None => {
                items.push(item.clone());
                item.clone()
            }
        };

        self.write_items(profile_id, &items)?;
        info!(
            "Pantry now has {} {} of {}",
            stored.quantity, stored.unit, stored.name
        );
        Ok(stored)
    }

    async fn list_items(&self, profile_id: &str) -> Result<Vec<AvailableIngredient>> {
        let _guard = self.connection.read_lock().await;
        let mut items = self.read_items(profile_id)?;
        items.sort_by_key(|item| item.match_key());
        Ok(items)
    }

    async fn delete_item(&self, profile_id: &str, item_id: &str) -> Result<bool> {
        let _guard = self.connection.write_lock().await;
        let mut items = self.read_items(profile_id)?;
        let before = items.len();
        items.retain(|i| i.id != item_id);
        if items.len() == before {
            return Ok(false);
        }
        self.write_items(profile_id, &items)?;
        info!("Deleted pantry item {}", item_id);
        Ok(true)
    }
}
