use anyhow::Result;
use chrono::{Local, Utc};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

use crate::ai::AiClient;
use crate::domain::commands::leftover::{
    AddPhotoCommand, AnalyzeLeftoversCommand, AnalyzeLeftoversResult, CreateLeftoverCommand,
    LeftoverResult, UpdateLeftoverCommand,
};
use crate::domain::errors::DomainError;
use crate::domain::models::leftover::Leftover;
use crate::domain::prompts::leftover_analysis_prompt;
use crate::domain::validation::{parse_date, validate_name, validate_quantity};
use crate::storage::csv::{CsvConnection, LeftoverRepository, PhotoStore};
use crate::storage::traits::{LeftoverStorage, PhotoStorage};

/// Extension for an uploaded image's content type
pub fn photo_extension(content_type: Option<&str>) -> Result<&'static str, DomainError> {
    let mime = content_type
        .and_then(|ct| ct.split(';').next())
        .map(|ct| ct.trim().to_ascii_lowercase());
    match mime.as_deref() {
        Some("image/jpeg") | Some("image/jpg") => Ok("jpg"),
        Some("image/png") => Ok("png"),
        Some("image/webp") => Ok("webp"),
        Some("image/gif") => Ok("gif"),
        Some("image/heic") => Ok("heic"),
        other => Err(DomainError::validation(format!(
            "Unsupported photo content type: {}",
            other.unwrap_or("none")
        ))),
    }
}

/// Service for tracked leftovers, their photos and AI analysis
#[derive(Clone)]
pub struct LeftoverService {
    leftover_repository: LeftoverRepository,
    photo_store: PhotoStore,
    ai_client: Arc<dyn AiClient>,
    files_base_url: String,
}

impl LeftoverService {
    /// `files_base_url` is the public URL under which stored files are served
    pub fn new(connection: CsvConnection, ai_client: Arc<dyn AiClient>, files_base_url: String) -> Self {
        Self {
            leftover_repository: LeftoverRepository::new(connection.clone()),
            photo_store: PhotoStore::new(connection),
            ai_client,
            files_base_url: files_base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Public URL of a stored photo
    pub fn photo_url(&self, relative_path: &str) -> String {
        format!("{}/{}", self.files_base_url, relative_path)
    }

    /// On-disk location of a photo served back to clients
    pub fn photo_file(&self, profile_id: &str, file_name: &str) -> Result<PathBuf> {
        self.photo_store.photo_path(profile_id, file_name)
    }

    pub async fn create_leftover(&self, command: CreateLeftoverCommand) -> Result<LeftoverResult> {
        info!(
            "Creating leftover: {} {} {} expiring {}",
            command.quantity, command.unit, command.ingredient_name, command.expiry_date
        );

        let leftover = Leftover {
            id: Leftover::generate_id(),
            ingredient_name: validate_name("Ingredient name", &command.ingredient_name)?,
            quantity: validate_quantity(command.quantity)?,
            unit: command.unit.trim().to_string(),
            expiry_date: parse_date("Expiry date", &command.expiry_date)?,
            photos: Vec::new(),
            created_at: Utc::now(),
        };
        self.leftover_repository
            .store_leftover(&command.profile_id, &leftover)
            .await?;

        Ok(LeftoverResult { leftover })
    }

    /// Leftovers of a profile, soonest expiry first
    pub async fn list_leftovers(&self, profile_id: &str) -> Result<Vec<Leftover>> {
        info!("Listing leftovers for profile {}", profile_id);
        self.leftover_repository.list_leftovers(profile_id).await
    }

    pub async fn update_leftover(&self, command: UpdateLeftoverCommand) -> Result<LeftoverResult> {
        info!("Updating leftover: {}", command.leftover_id);

        let ingredient_name = command
            .ingredient_name
            .map(|name| validate_name("Ingredient name", &name))
            .transpose()?;
        let quantity = command.quantity.map(validate_quantity).transpose()?;
        let unit = command.unit.map(|unit| unit.trim().to_string());
        let expiry_date = command
            .expiry_date
            .map(|date| parse_date("Expiry date", &date))
            .transpose()?;

        let leftover = self
            .leftover_repository
            .modify_leftover(&command.profile_id, &command.leftover_id, move |leftover| {
                if let Some(name) = ingredient_name {
                    leftover.ingredient_name = name;
                }
                if let Some(quantity) = quantity {
                    leftover.quantity = quantity;
                }
                if let Some(unit) = unit {
                    leftover.unit = unit;
                }
                if let Some(expiry_date) = expiry_date {
                    leftover.expiry_date = expiry_date;
                }
            })
            .await?
            .ok_or_else(|| DomainError::not_found("Leftover", &command.leftover_id))?;
        Ok(LeftoverResult { leftover })
    }

    /// Delete a leftover and its photos
    pub async fn delete_leftover(&self, profile_id: &str, leftover_id: &str) -> Result<()> {
        info!("Deleting leftover: {}", leftover_id);

        let leftover = self.require_leftover(profile_id, leftover_id).await?;
        self.leftover_repository.delete_leftover(profile_id, leftover_id).await?;
        for photo in &leftover.photos {
            if let Err(e) = self.photo_store.delete_photo(photo).await {
                warn!("Failed to delete photo {}: {}", photo, e);
            }
        }
        Ok(())
    }

    /// Store an uploaded photo and attach it to the leftover
    pub async fn add_photo(&self, command: AddPhotoCommand) -> Result<LeftoverResult> {
        info!(
            "Adding photo ({} bytes) to leftover {}",
            command.bytes.len(),
            command.leftover_id
        );

        let extension = photo_extension(command.content_type.as_deref())?;
        self.require_leftover(&command.profile_id, &command.leftover_id).await?;

        let relative_path = self
            .photo_store
            .store_photo(&command.profile_id, &command.bytes, extension)
            .await?;
        let photo = relative_path.clone();
        let attached = self
            .leftover_repository
            .modify_leftover(&command.profile_id, &command.leftover_id, move |leftover| {
                leftover.photos.push(photo)
            })
            .await;

        match attached {
            Ok(Some(leftover)) => Ok(LeftoverResult { leftover }),
            Ok(None) => {
                // The leftover was deleted while the photo was being written
                self.photo_store.delete_photo(&relative_path).await?;
                Err(DomainError::not_found("Leftover", &command.leftover_id).into())
            }
            Err(e) => {
                if let Err(cleanup) = self.photo_store.delete_photo(&relative_path).await {
                    warn!("Failed to remove unattached photo {}: {}", relative_path, cleanup);
                }
                Err(e)
            }
        }
    }

    /// Ask the AI analysis function what to do with the selected leftovers
    pub async fn analyze_leftovers(&self, command: AnalyzeLeftoversCommand) -> Result<AnalyzeLeftoversResult> {
        info!("Analyzing leftovers for profile {}", command.profile_id);

        let all = self.leftover_repository.list_leftovers(&command.profile_id).await?;
        let selected = match command.leftover_ids {
            None => all,
            Some(ids) => {
                let mut selected = Vec::with_capacity(ids.len());
                for id in &ids {
                    let leftover = all
                        .iter()
                        .find(|l| &l.id == id)
                        .ok_or_else(|| DomainError::not_found("Leftover", id))?;
                    if !selected.iter().any(|l: &Leftover| &l.id == id) {
                        selected.push(leftover.clone());
                    }
                }
                selected
            }
        };
        if selected.is_empty() {
            return Err(DomainError::validation("No leftovers to analyze").into());
        }

        let prompt = leftover_analysis_prompt(&selected, Local::now().date_naive());
        let photo_urls: Vec<String> = selected
            .iter()
            .flat_map(|l| l.photos.iter())
            .map(|p| self.photo_url(p))
            .collect();

        let analysis = self.ai_client.analyze_leftovers(&prompt, &photo_urls).await?;
        info!("Received leftover analysis ({} chars)", analysis.len());
        Ok(AnalyzeLeftoversResult { analysis })
    }

    async fn require_leftover(&self, profile_id: &str, leftover_id: &str) -> Result<Leftover> {
        let leftover = self
            .leftover_repository
            .get_leftover(profile_id, leftover_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Leftover", leftover_id))?;
        Ok(leftover)
    }
}
