//! # CSV Leftover Repository
//!
//! Leftovers live in `{profile_id}/leftovers.csv`; the `photos` column holds a
//! JSON array of storage URLs.

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::{info, warn};

use super::connection::CsvConnection;
use crate::domain::models::leftover::Leftover;
use crate::storage::traits::LeftoverStorage;

const LEFTOVERS_FILE: &str = "leftovers.csv";
const HEADER: &[&str] = &[
    "id",
    "ingredient_name",
    "quantity",
    "unit",
    "expiry_date",
    "photos",
    "created_at",
];

#[derive(Debug, Clone, Serialize, Deserialize)]
struct LeftoverRecord {
    id: String,
    ingredient_name: String,
    quantity: f64,
    unit: String,
    expiry_date: String,
    photos: String,
    created_at: String,
}

impl TryFrom<&Leftover> for LeftoverRecord {
    type Error = anyhow::Error;

    fn try_from(leftover: &Leftover) -> Result<Self> {
        Ok(LeftoverRecord {
            id: leftover.id.clone(),
            ingredient_name: leftover.ingredient_name.clone(),
            quantity: leftover.quantity,
            unit: leftover.unit.clone(),
            expiry_date: leftover.expiry_date.format("%Y-%m-%d").to_string(),
            photos: serde_json::to_string(&leftover.photos)?,
            created_at: leftover.created_at.to_rfc3339(),
        })
    }
}

impl TryFrom<LeftoverRecord> for Leftover {
    type Error = anyhow::Error;

    fn try_from(record: LeftoverRecord) -> Result<Self> {
        let photos = if record.photos.trim().is_empty() {
            Vec::new()
        } else {
            serde_json::from_str(&record.photos).context("Failed to parse photos column")?
        };

        Ok(Leftover {
            expiry_date: NaiveDate::parse_from_str(&record.expiry_date, "%Y-%m-%d")
                .context("Failed to parse expiry_date")?,
            created_at: DateTime::parse_from_rfc3339(&record.created_at)
                .context("Failed to parse created_at")?
                .with_timezone(&Utc),
            id: record.id,
            ingredient_name: record.ingredient_name,
            quantity: record.quantity,
            unit: record.unit,
            photos,
        })
    }
}

/// CSV-based leftover repository
#[derive(Clone)]
pub struct LeftoverRepository {
    connection: CsvConnection,
}

impl LeftoverRepository {
    pub fn new(connection: CsvConnection) -> Self {
        Self { connection }
    }

    fn leftovers_file_path(&self, profile_id: &str) -> Result<PathBuf> {
        self.connection.ensure_profile_file(profile_id, LEFTOVERS_FILE)
    }

    fn read_leftovers(&self, profile_id: &str) -> Result<Vec<Leftover>> {
        let path = self.leftovers_file_path(profile_id)?;
        let records: Vec<LeftoverRecord> = self.connection.read_csv(&path)?;
        let mut leftovers = Vec::with_capacity(records.len());
        for record in records {
            let id = record.id.clone();
            match Leftover::try_from(record) {
                Ok(leftover) => leftovers.push(leftover),
                Err(e) => warn!("Failed to parse leftover record {}: {}. Skipping.", id, e),
            }
        }
        Ok(leftovers)
    }

    fn write_leftovers(&self, profile_id: &str, leftovers: &[Leftover]) -> Result<()> {
        let path = self.leftovers_file_path(profile_id)?;
        let records = leftovers
            .iter()
            .map(LeftoverRecord::try_from)
            .collect::<Result<Vec<_>>>()?;
        self.connection.write_csv(&path, HEADER, &records)
    }
}

#[async_trait]
impl LeftoverStorage for LeftoverRepository {
    async fn store_leftover(&self, profile_id: &str, leftover: &Leftover) -> Result<()> {
        let _guard = self.connection.write_lock().await;
        let mut leftovers = self.read_leftovers(profile_id)?;
        leftovers.push(leftover.clone());
        self.write_leftovers(profile_id, &leftovers)?;
        info!("Stored leftover {} ({})", leftover.ingredient_name, leftover.id);
        Ok(())
    }

    async fn get_leftover(&self, profile_id: &str, leftover_id: &str) -> Result<Option<Leftover>> {
        let _guard = self.connection.read_lock().await;
        Ok(self
            .read_leftovers(profile_id)?
            .into_iter()
            .find(|l| l.id == leftover_id))
    }

    async fn list_leftovers(&self, profile_id: &str) -> Result<Vec<Leftover>> {
        let _guard = self.connection.read_lock().await;
        let mut leftovers = self.read_leftovers(profile_id)?;
        leftovers.sort_by(|a, b| {
            a.expiry_date
                .cmp(&b.expiry_date)
                .then_with(|| a.ingredient_name.cmp(&b.ingredient_name))
        });
        Ok(leftovers)
    }

    async fn modify_leftover<F>(&self, profile_id: &str, leftover_id: &str, apply: F) -> Result<Option<Leftover>>
    where
        F: FnOnce(&mut Leftover) + Send + 'static,
    {
        let _guard = self.connection.write_lock().await;
        let mut leftovers = self.read_leftovers(profile_id)?;
        let Some(leftover) = leftovers.iter_mut().find(|l| l.id == leftover_id) else {
            return Ok(None);
        };
        apply(leftover);
        let modified = leftover.clone();

        self.write_leftovers(profile_id, &leftovers)?;
        info!("Updated leftover {}", leftover_id);
        Ok(Some(modified))
    }

    async fn delete_leftover(&self, profile_id: &str, leftover_id: &str) -> Result<bool> {
        let _guard = self.connection.write_lock().await;
        let mut leftovers = self.read_leftovers(profile_id)?;
        let before = leftovers.len();
        leftovers.retain(|l| l.id != leftover_id);
        if leftovers.len() == before {
            return Ok(false);
        }
        self.write_leftovers(profile_id, &leftovers)?;
        info!("Deleted leftover {}", leftover_id);
        Ok(true)
    }
}
