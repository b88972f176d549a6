use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::errors::DomainError;

/// Domain model representing a child profile.
/// Age is never stored; it is derived from `birth_date` when read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Child {
    pub id: String,
    pub name: String,
    pub birth_date: NaiveDate,
    pub allergies: Vec<String>,
    pub preferences: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Child {
    /// Generate a unique ID for a child
    pub fn generate_id() -> String {
        format!("child_{}", Uuid::new_v4().simple())
    }
}

/// Child names are unique per profile, ignoring case
pub fn ensure_name_free(children: &[Child], name: &str, except_id: Option<&str>) -> Result<(), DomainError> {
    let lowered = name.to_lowercase();
    let taken = children
        .iter()
        .any(|c| c.name.to_lowercase() == lowered && Some(c.id.as_str()) != except_id);
    if taken {
        return Err(DomainError::Conflict(format!("A child named '{}' already exists", name)));
    }
    Ok(())
}
