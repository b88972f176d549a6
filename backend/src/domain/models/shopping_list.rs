use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shared::ShoppingListItem;

/// The single shopping list of a profile, overwritten wholesale on regeneration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShoppingList {
    pub profile_id: String,
    pub items: Vec<ShoppingListItem>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl ShoppingList {
    pub fn empty(profile_id: &str) -> Self {
        Self {
            profile_id: profile_id.to_string(),
            items: Vec::new(),
            updated_at: None,
        }
    }
}
