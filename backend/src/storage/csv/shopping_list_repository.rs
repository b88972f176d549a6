//! # Shopping List Repository
//!
//! A single JSON document per profile at `{profile_id}/shopping_list.json`,
//! replaced wholesale on every save.

use anyhow::{Context, Result};
use async_trait::async_trait;
use std::fs;
use tracing::info;

use super::connection::CsvConnection;
use crate::domain::models::shopping_list::ShoppingList;
use crate::storage::traits::ShoppingListStorage;

const SHOPPING_LIST_FILE: &str = "shopping_list.json";

#[derive(Clone)]
pub struct ShoppingListRepository {
    connection: CsvConnection,
}

impl ShoppingListRepository {
    pub fn new(connection: CsvConnection) -> Self {
        Self { connection }
    }

    fn read_list(&self, profile_id: &str) -> Result<Option<ShoppingList>> {
        let path = self
            .connection
            .profile_directory(profile_id)?
            .join(SHOPPING_LIST_FILE);
        if !path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(&path)?;
        let list: ShoppingList = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        Ok(Some(list))
    }

    fn write_list(&self, list: &ShoppingList) -> Result<()> {
        let path = self
            .connection
            .ensure_profile_file(&list.profile_id, SHOPPING_LIST_FILE)?;
        let content = serde_json::to_vec_pretty(list)?;
        self.connection.write_atomic(&path, &content)
    }
}

#[async_trait]
impl ShoppingListStorage for ShoppingListRepository {
    async fn get_shopping_list(&self, profile_id: &str) -> Result<Option<ShoppingList>> {
        let _guard = self.connection.read_lock().await;
        self.read_list(profile_id)
    }

    async fn save_shopping_list(&self, list: &ShoppingList) -> Result<()> {
        let _guard = self.connection.write_lock().await;
        self.write_list(list)?;
        info!(
            "Saved shopping list with {} items for profile {}",
            list.items.len(),
            list.profile_id
        );
        Ok(())
    }

    async fn modify_shopping_list<F>(&self, profile_id: &str, apply: F) -> Result<ShoppingList>
    where
        F: FnOnce(&mut ShoppingList) -> Result<()> + Send + 'static,
    {
        let _guard = self.connection.write_lock().await;
        let mut list = self
            .read_list(profile_id)?
            .unwrap_or_else(|| ShoppingList::empty(profile_id));
        apply(&mut list)?;
        self.write_list(&list)?;
        info!("Updated shopping list for profile {}", profile_id);
        Ok(list)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::csv::test_utils::TestEnvironment;
    use chrono::Utc;
    use shared::ShoppingListItem;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_save_overwrites_wholesale() {
        let env = TestEnvironment::new().await.unwrap();
        let repo = ShoppingListRepository::new(env.connection.clone());

        assert!(repo.get_shopping_list("family").await.unwrap().is_none());

        let mut list = ShoppingList::empty("family");
        list.items = vec![
            ShoppingListItem { item: "milk".into(), quantity: 1.0, unit: "l".into(), checked: false },
            ShoppingListItem { item: "eggs".into(), quantity: 6.0, unit: "".into(), checked: true },
        ];
        list.updated_at = Some(Utc::now());
        repo.save_shopping_list(&list).await.unwrap();

        let mut replacement = ShoppingList::empty("family");
        replacement.items = vec![list.items[0].clone()];
        repo.save_shopping_list(&replacement).await.unwrap();

        let loaded = repo.get_shopping_list("family").await.unwrap().unwrap();
        assert_eq!(loaded.items.len(), 1);
        assert_eq!(loaded.items[0].item, "milk");
        assert!(loaded.updated_at.is_none());
    }

    fn numbered_list(len: usize) -> ShoppingList {
        let mut list = ShoppingList::empty("family");
        list.items = (0..len)
            .map(|i| ShoppingListItem {
                item: format!("item {}", i),
                quantity: 1.0,
                unit: "pcs".into(),
                checked: false,
            })
            .collect();
        list
    }

    #[tokio::test]
    async fn test_failed_modification_writes_nothing() {
        let env = TestEnvironment::new().await.unwrap();
        let repo = ShoppingListRepository::new(env.connection.clone());
        repo.save_shopping_list(&numbered_list(2)).await.unwrap();

        let result = repo
            .modify_shopping_list("family", |list| {
                list.items.clear();
                Err(anyhow::anyhow!("rejected"))
            })
            .await;
        assert!(result.is_err());
        assert_eq!(repo.get_shopping_list("family").await.unwrap().unwrap().items.len(), 2);
    }

    #[tokio::test]
    async fn test_concurrent_modifications_all_land() {
        let env = TestEnvironment::new().await.unwrap();
        let repo = Arc::new(ShoppingListRepository::new(env.connection.clone()));
        repo.save_shopping_list(&numbered_list(16)).await.unwrap();

        let mut handles = Vec::new();
        for i in 0..16 {
            let repo = repo.clone();
            handles.push(tokio::spawn(async move {
                repo.modify_shopping_list("family", move |list| {
                    list.items[i].checked = true;
                    Ok(())
                })
                .await
            }));
        }
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        let loaded = repo.get_shopping_list("family").await.unwrap().unwrap();
        assert!(loaded.items.iter().all(|item| item.checked));
    }
}
