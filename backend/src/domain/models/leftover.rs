use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Leftover {
    pub id: String,
    pub ingredient_name: String,
    pub quantity: f64,
    pub unit: String,
    pub expiry_date: NaiveDate,
    /// Photo paths relative to the data directory
    pub photos: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl Leftover {
    pub fn generate_id() -> String {
        format!("leftover_{}", Uuid::new_v4().simple())
    }

    pub fn is_expired(&self, today: NaiveDate) -> bool {
        self.expiry_date < today
    }

    /// Not yet expired but expiring within `days` of `today` (inclusive)
    pub fn expires_within(&self, today: NaiveDate, days: i64) -> bool {
        !self.is_expired(today) && (self.expiry_date - today).num_days() <= days
    }
}
