//! # Photo Store
//!
//! Leftover photos are written to `{profile_id}/photos/{uuid}.{ext}` and served
//! back by the file route; callers get the path relative to the data directory.

use anyhow::Result;
use async_trait::async_trait;
use std::fs;
use std::path::PathBuf;
use tracing::info;
use uuid::Uuid;

use super::connection::{validate_path_component, CsvConnection};
use crate::domain::errors::DomainError;
use crate::storage::traits::PhotoStorage;

pub const MAX_PHOTO_BYTES: usize = 10 * 1024 * 1024;

#[derive(Clone)]
pub struct PhotoStore {
    connection: CsvConnection,
}

impl PhotoStore {
    pub fn new(connection: CsvConnection) -> Self {
        Self { connection }
    }

    /// Location of a stored photo; fails for names this store never produces
    pub fn photo_path(&self, profile_id: &str, file_name: &str) -> Result<PathBuf> {
        let (stem, extension) = file_name
            .split_once('.')
            .ok_or_else(|| DomainError::validation(format!("Not a photo file: {}", file_name)))?;
        validate_path_component("Photo name", stem)?;
        validate_path_component("Photo extension", extension)?;
        Ok(self
            .connection
            .profile_directory(profile_id)?
            .join("photos")
            .join(file_name))
    }
}

#[async_trait]
impl PhotoStorage for PhotoStore {
    async fn store_photo(&self, profile_id: &str, bytes: &[u8], extension: &str) -> Result<String> {
        if bytes.is_empty() {
            return Err(DomainError::validation("Photo is empty").into());
        }
        if bytes.len() > MAX_PHOTO_BYTES {
            return Err(DomainError::validation(format!(
                "Photo exceeds {} bytes",
                MAX_PHOTO_BYTES
            ))
            .into());
        }
        validate_path_component("Photo extension", extension)?;

        let _guard = self.connection.write_lock().await;
        let file_name = format!("{}.{}", Uuid::new_v4().simple(), extension);
        let path = self
            .connection
            .profile_directory(profile_id)?
            .join("photos")
            .join(&file_name);
        self.connection.write_atomic(&path, bytes)?;

        info!("Stored photo {} ({} bytes)", path.display(), bytes.len());
        Ok(format!("{}/photos/{}", profile_id, file_name))
    }

    async fn delete_photo(&self, relative_path: &str) -> Result<()> {
        let components: Vec<&str> = relative_path.split('/').collect();
        let [profile_id, "photos", file_name] = components.as_slice() else {
            return Err(DomainError::validation(format!("Not a photo path: {}", relative_path)).into());
        };
        let path = self.photo_path(profile_id, file_name)?;

        let _guard = self.connection.write_lock().await;
        if path.exists() {
            fs::remove_file(&path)?;
            info!("Deleted photo {}", path.display());
        }
        Ok(())
    }
}
