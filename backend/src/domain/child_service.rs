use anyhow::Result;
use chrono::{Local, NaiveDate, Utc};
use tracing::{info, warn};

use crate::domain::commands::child::{
    CreateChildCommand, CreateChildResult, DeleteChildCommand, DeleteChildResult, GetChildCommand,
    GetChildResult, ListChildrenResult, UpdateChildCommand, UpdateChildResult,
};
use crate::domain::errors::DomainError;
use crate::domain::models::child::Child;
use crate::domain::validation::{normalize_tags, parse_birth_date, validate_name};
use crate::storage::csv::{ChildRepository, CsvConnection, MealPlanRepository};
use crate::storage::traits::{ChildStorage, MealPlanStorage};

/// Service for managing the child profiles of a household
#[derive(Clone)]
pub struct ChildService {
    child_repository: ChildRepository,
    meal_plan_repository: MealPlanRepository,
}

impl ChildService {
    pub fn new(connection: CsvConnection) -> Self {
        Self {
            child_repository: ChildRepository::new(connection.clone()),
            meal_plan_repository: MealPlanRepository::new(connection),
        }
    }

    /// Create a new child
    pub async fn create_child(&self, command: CreateChildCommand) -> Result<CreateChildResult> {
        info!(
            "Creating child: profile={}, name={}, birth_date={}",
            command.profile_id, command.name, command.birth_date
        );

        let name = validate_name("Child name", &command.name)?;
        let birth_date = parse_birth_date(&command.birth_date, today())?;
        let allergies = normalize_tags("Allergy", command.allergies)?;
        let preferences = normalize_tags("Preference", command.preferences)?;

        let now = Utc::now();
        let child = Child {
            id: Child::generate_id(),
            name,
            birth_date,
            allergies,
            preferences,
            created_at: now,
            updated_at: now,
        };
        self.child_repository
            .store_child(&command.profile_id, &child)
            .await?;

        info!("Created child: {} with ID: {}", child.name, child.id);
        Ok(CreateChildResult { child })
    }

    /// Get a child by ID
    pub async fn get_child(&self, command: GetChildCommand) -> Result<GetChildResult> {
        info!("Getting child: {}", command.child_id);

        let child = self
            .child_repository
            .get_child(&command.profile_id, &command.child_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Child", &command.child_id))?;

        Ok(GetChildResult { child })
    }

    /// List all children of a profile, ordered by name
    pub async fn list_children(&self, profile_id: &str) -> Result<ListChildrenResult> {
        info!("Listing children for profile {}", profile_id);

        let children = self.child_repository.list_children(profile_id).await?;
        info!("Found {} children", children.len());

        Ok(ListChildrenResult { children })
    }

    /// Load the given children, failing on the first unknown ID.
    /// Duplicate IDs are collapsed.
    pub async fn load_children(&self, profile_id: &str, child_ids: &[String]) -> Result<Vec<Child>> {
        let mut children: Vec<Child> = Vec::with_capacity(child_ids.len());
        for child_id in child_ids {
            if children.iter().any(|c| &c.id == child_id) {
                continue;
            }
            let child = self
                .child_repository
                .get_child(profile_id, child_id)
                .await?
                .ok_or_else(|| DomainError::not_found("Child", child_id))?;
            children.push(child);
        }
        Ok(children)
    }

    /// Update an existing child
    pub async fn update_child(&self, command: UpdateChildCommand) -> Result<UpdateChildResult> {
        info!("Updating child: {}", command.child_id);

        let name = command
            .name
            .map(|name| validate_name("Child name", &name))
            .transpose()?;
        let birth_date = command
            .birth_date
            .map(|date| parse_birth_date(&date, today()))
            .transpose()?;
        let allergies = command
            .allergies
            .map(|tags| normalize_tags("Allergy", tags))
            .transpose()?;
        let preferences = command
            .preferences
            .map(|tags| normalize_tags("Preference", tags))
            .transpose()?;

        let child = self
            .child_repository
            .modify_child(&command.profile_id, &command.child_id, move |child| {
                if let Some(name) = name {
                    child.name = name;
                }
                if let Some(birth_date) = birth_date {
                    child.birth_date = birth_date;
                }
                if let Some(allergies) = allergies {
                    child.allergies = allergies;
                }
                if let Some(preferences) = preferences {
                    child.preferences = preferences;
                }
                child.updated_at = Utc::now();
                Ok(())
            })
            .await?
            .ok_or_else(|| DomainError::not_found("Child", &command.child_id))?;

        info!("Updated child: {} with ID: {}", child.name, child.id);
        Ok(UpdateChildResult { child })
    }

    /// Delete a child together with its meal plans
    pub async fn delete_child(&self, command: DeleteChildCommand) -> Result<DeleteChildResult> {
        info!("Deleting child: {}", command.child_id);

        let child = self
            .child_repository
            .get_child(&command.profile_id, &command.child_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Child", &command.child_id))?;

        if !self
            .child_repository
            .delete_child(&command.profile_id, &command.child_id)
            .await?
        {
            warn!("Child {} disappeared before it could be deleted", child.id);
        }
        let removed_meal_plans = self
            .meal_plan_repository
            .delete_meal_plans_for_child(&command.profile_id, &command.child_id)
            .await?;

        info!(
            "Deleted child: {} with ID: {} ({} meal plans removed)",
            child.name, child.id, removed_meal_plans
        );
        Ok(DeleteChildResult {
            success_message: format!("Child '{}' deleted successfully", child.name),
            removed_meal_plans,
        })
    }
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}
