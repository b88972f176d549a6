use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An ingredient the household already has on hand
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AvailableIngredient {
    pub id: String,
    pub name: String,
    pub quantity: f64,
    pub unit: String,
}

impl AvailableIngredient {
    pub fn generate_id() -> String {
        format!("pantry_{}", Uuid::new_v4().simple())
    }

    /// Key used to match pantry items against recipe ingredients
    pub fn match_key(&self) -> String {
        self.name.trim().to_lowercase()
    }
}
