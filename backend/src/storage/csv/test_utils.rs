//! Test utilities for storage and service tests.
//!
//! `TestEnvironment` owns a temporary data directory that is removed when the
//! environment is dropped, even if the test panics.

use anyhow::Result;
use chrono::{NaiveDate, Utc};
use shared::{Difficulty, MealType, NutritionalInfo};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use super::connection::CsvConnection;
use crate::domain::models::child::Child;
use crate::domain::models::recipe::Recipe;

pub struct TestEnvironment {
    /// Kept alive so the directory survives until drop
    _temp_dir: TempDir,
    pub connection: CsvConnection,
    pub base_path: PathBuf,
}

impl TestEnvironment {
    pub async fn new() -> Result<Self> {
        let temp_dir = TempDir::new()?;
        let base_path = temp_dir.path().to_path_buf();
        let connection = CsvConnection::new(&base_path)?;

        Ok(TestEnvironment {
            _temp_dir: temp_dir,
            connection,
            base_path,
        })
    }

    pub fn base_directory(&self) -> &Path {
        &self.base_path
    }
}

impl Drop for TestEnvironment {
    fn drop(&mut self) {
        if std::env::var("MEAL_PLANNER_DEBUG_TESTS").is_ok() {
            println!("Cleaning up test environment: {:?}", self.base_path);
        }
    }
}

/// A recipe with no allergens or age bounds
pub fn sample_recipe(title: &str) -> Recipe {
    Recipe {
        id: Recipe::generate_id(),
        title: title.to_string(),
        description: format!("{} for the whole family", title),
        ingredients: Vec::new(),
        instructions: vec!["Cook".to_string()],
        nutritional_info: NutritionalInfo::default(),
        meal_type: MealType::Dinner,
        difficulty: Difficulty::Easy,
        prep_time_minutes: Some(30),
        health_benefits: Vec::new(),
        allergens: Vec::new(),
        min_age: None,
        max_age: None,
        image_url: None,
        created_at: Utc::now(),
    }
}

pub fn sample_child(name: &str, birth_date: NaiveDate, allergies: &[&str]) -> Child {
    let now = Utc::now();
    Child {
        id: Child::generate_id(),
        name: name.to_string(),
        birth_date,
        allergies: allergies.iter().map(|a| a.to_string()).collect(),
        preferences: Vec::new(),
        created_at: now,
        updated_at: now,
    }
}
