//! # Child Repository
//!
//! One YAML document per child under `{profile_id}/children/{child_id}.yaml`.
//! Children are discovered by scanning that directory.

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use tracing::{debug, info, warn};

use super::connection::{validate_path_component, CsvConnection};
use crate::domain::models::child::{ensure_name_free, Child};
use crate::storage::traits::ChildStorage;

/// On-disk representation of a child
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ChildRecord {
    id: String,
    name: String,
    birth_date: String,
    #[serde(default)]
    allergies: Vec<String>,
    #[serde(default)]
    preferences: Vec<String>,
    created_at: String,
    updated_at: String,
}

impl From<&Child> for ChildRecord {
    fn from(child: &Child) -> Self {
        ChildRecord {
            id: child.id.clone(),
            name: child.name.clone(),
            birth_date: child.birth_date.format("%Y-%m-%d").to_string(),
            allergies: child.allergies.clone(),
            preferences: child.preferences.clone(),
            created_at: child.created_at.to_rfc3339(),
            updated_at: child.updated_at.to_rfc3339(),
        }
    }
}

impl TryFrom<ChildRecord> for Child {
    type Error = anyhow::Error;

    fn try_from(record: ChildRecord) -> Result<Self> {
        let birth_date = NaiveDate::parse_from_str(&record.birth_date, "%Y-%m-%d")
            .context("Failed to parse birth_date")?;
        let created_at = DateTime::parse_from_rfc3339(&record.created_at)
            .context("Failed to parse created_at")?
            .with_timezone(&Utc);
        let updated_at = DateTime::parse_from_rfc3339(&record.updated_at)
            .context("Failed to parse updated_at")?
            .with_timezone(&Utc);

        Ok(Child {
            id: record.id,
            name: record.name,
            birth_date,
            allergies: record.allergies,
            preferences: record.preferences,
            created_at,
            updated_at,
        })
    }
}

/// YAML-file child repository
#[derive(Clone)]
pub struct ChildRepository {
    connection: CsvConnection,
}

impl ChildRepository {
    pub fn new(connection: CsvConnection) -> Self {
        Self { connection }
    }

    fn children_directory(&self, profile_id: &str) -> Result<PathBuf> {
        Ok(self.connection.profile_directory(profile_id)?.join("children"))
    }

    fn child_yaml_path(&self, profile_id: &str, child_id: &str) -> Result<PathBuf> {
        validate_path_component("Child id", child_id)?;
        Ok(self.children_directory(profile_id)?.join(format!("{}.yaml", child_id)))
    }

    fn load_child(&self, path: &PathBuf) -> Result<Child> {
        let yaml_content = fs::read_to_string(path)?;
        let record: ChildRecord = serde_yaml::from_str(&yaml_content)?;
        Child::try_from(record)
    }

    fn save_child(&self, profile_id: &str, child: &Child) -> Result<()> {
        let path = self.child_yaml_path(profile_id, &child.id)?;
        let yaml_content = serde_yaml::to_string(&ChildRecord::from(child))?;
        self.connection.write_atomic(&path, yaml_content.as_bytes())?;
        debug!("Saved child {} to {}", child.id, path.display());
        Ok(())
    }

    /// Discover all children by scanning the profile's children directory
    fn discover_children(&self, profile_id: &str) -> Result<Vec<Child>> {
        let dir = self.children_directory(profile_id)?;
        if !dir.exists() {
            debug!("No children directory for profile {}", profile_id);
            return Ok(Vec::new());
        }

        let mut children = Vec::new();
        for entry in fs::read_dir(&dir)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("yaml") {
                continue;
            }
            match self.load_child(&path) {
                Ok(child) => children.push(child),
                Err(e) => warn!("Skipping unreadable child file {}: {}", path.display(), e),
            }
        }

        children.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
        debug!("Discovered {} children for profile {}", children.len(), profile_id);
        Ok(children)
    }
}

#[async_trait]
impl ChildStorage for ChildRepository {
    async fn store_child(&self, profile_id: &str, child: &Child) -> Result<()> {
        let _guard = self.connection.write_lock().await;
        ensure_name_free(&self.discover_children(profile_id)?, &child.name, None)?;
        self.save_child(profile_id, child)?;
        info!("Stored child {} ({}) for profile {}", child.name, child.id, profile_id);
        Ok(())
    }

    async fn get_child(&self, profile_id: &str, child_id: &str) -> Result<Option<Child>> {
        let _guard = self.connection.read_lock().await;
        let path = self.child_yaml_path(profile_id, child_id)?;
        if !path.exists() {
            return Ok(None);
        }
        self.load_child(&path).map(Some)
    }

    async fn list_children(&self, profile_id: &str) -> Result<Vec<Child>> {
        let _guard = self.connection.read_lock().await;
        self.discover_children(profile_id)
    }

    async fn modify_child<F>(&self, profile_id: &str, child_id: &str, apply: F) -> Result<Option<Child>>
    where
        F: FnOnce(&mut Child) -> Result<()> + Send + 'static,
    {
        let _guard = self.connection.write_lock().await;
        let path = self.child_yaml_path(profile_id, child_id)?;
        if !path.exists() {
            return Ok(None);
        }

        let mut child = self.load_child(&path)?;
        apply(&mut child)?;
        ensure_name_free(&self.discover_children(profile_id)?, &child.name, Some(child_id))?;
        self.save_child(profile_id, &child)?;
        info!("Updated child {} ({}) for profile {}", child.name, child.id, profile_id);
        Ok(Some(child))
    }

    async fn delete_child(&self, profile_id: &str, child_id: &str) -> Result<bool> {
        let _guard = self.connection.write_lock().await;
        let path = self.child_yaml_path(profile_id, child_id)?;
        if !path.exists() {
            return Ok(false);
        }
        fs::remove_file(&path)?;
        info!("Deleted child file: {}", path.display());
        Ok(true)
    }
}
