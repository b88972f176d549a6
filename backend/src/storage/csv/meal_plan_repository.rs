//! # CSV Meal Plan Repository
//!
//! Plans live in `{profile_id}/meal_plans.csv`, one row per
//! (date, meal time, child) slot. Upserts run under the connection's write
//! lock so two requests cannot both insert into the same slot.

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use shared::MealType;
use std::path::PathBuf;
use tracing::{debug, info, warn};

use super::connection::CsvConnection;
use crate::domain::models::meal_plan::MealPlan;
use crate::storage::traits::MealPlanStorage;

const MEAL_PLANS_FILE: &str = "meal_plans.csv";
const HEADER: &[&str] = &["id", "profile_id", "child_id", "recipe_id", "date", "meal_time"];

#[derive(Debug, Clone, Serialize, Deserialize)]
struct MealPlanRecord {
    id: String,
    profile_id: String,
    child_id: String,
    recipe_id: String,
    date: String,
    meal_time: String,
}

impl From<&MealPlan> for MealPlanRecord {
    fn from(plan: &MealPlan) -> Self {
        MealPlanRecord {
            id: plan.id.clone(),
            profile_id: plan.profile_id.clone(),
            child_id: plan.child_id.clone(),
            recipe_id: plan.recipe_id.clone(),
            date: plan.date.format("%Y-%m-%d").to_string(),
            meal_time: plan.meal_time.to_string(),
        }
    }
}

impl TryFrom<MealPlanRecord> for MealPlan {
    type Error = anyhow::Error;

    fn try_from(record: MealPlanRecord) -> Result<Self> {
        Ok(MealPlan {
            date: NaiveDate::parse_from_str(&record.date, "%Y-%m-%d")
                .context("Failed to parse date")?,
            meal_time: MealType::from_string(&record.meal_time).map_err(|e| anyhow::anyhow!(e))?,
            id: record.id,
            profile_id: record.profile_id,
            child_id: record.child_id,
            recipe_id: record.recipe_id,
        })
    }
}

/// CSV-based meal plan repository
#[derive(Clone)]
pub struct MealPlanRepository {
    connection: CsvConnection,
}

impl MealPlanRepository {
    pub fn new(connection: CsvConnection) -> Self {
        Self { connection }
    }

    fn meal_plans_file_path(&self, profile_id: &str) -> Result<PathBuf> {
        self.connection.ensure_profile_file(profile_id, MEAL_PLANS_FILE)
    }

    fn read_plans(&self, profile_id: &str) -> Result<Vec<MealPlan>> {
        let path = self.meal_plans_file_path(profile_id)?;
        let records: Vec<MealPlanRecord> = self.connection.read_csv(&path)?;
        let mut plans = Vec::with_capacity(records.len());
        for record in records {
            let id = record.id.clone();
            match MealPlan::try_from(record) {
                Ok(plan) => plans.push(plan),
                Err(e) => warn!("Failed to parse meal plan record {}: {}. Skipping.", id, e),
            }
        }
        Ok(plans)
    }

    fn write_plans(&self, profile_id: &str, plans: &[MealPlan]) -> Result<()> {
        let path = self.meal_plans_file_path(profile_id)?;
        let records: Vec<MealPlanRecord> = plans.iter().map(MealPlanRecord::from).collect();
        self.connection.write_csv(&path, HEADER, &records)
    }
}

#[async_trait]
impl MealPlanStorage for MealPlanRepository {
    async fn upsert_meal_plan(&self, plan: &MealPlan) -> Result<MealPlan> {
        let _guard = self.connection.write_lock().await;
        let mut plans = self.read_plans(&plan.profile_id)?;

        let stored = match plans.iter_mut().find(|existing| existing.same_slot(plan)) {
            Some(existing) => {
                debug!(
                    "Replacing recipe {} with {} in plan {}",
                    existing.recipe_id, plan.recipe_id, existing.id
                );
                existing.recipe_id = plan.recipe_id.clone();
                existing.clone()
            }
            None => {
                plans.push(plan.clone());
                plan.clone()
            }
        };

        self.write_plans(&plan.profile_id, &plans)?;
        info!(
            "Planned recipe {} for child {} on {} ({})",
            stored.recipe_id, stored.child_id, stored.date, stored.meal_time
        );
        Ok(stored)
    }

    async fn list_meal_plans(
        &self,
        profile_id: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<MealPlan>> {
        let _guard = self.connection.read_lock().await;
        let mut plans: Vec<MealPlan> = self
            .read_plans(profile_id)?
            .into_iter()
            .filter(|p| p.date >= start && p.date <= end)
            .collect();
        plans.sort_by(|a, b| {
            a.date
                .cmp(&b.date)
                .then(a.meal_time.cmp(&b.meal_time))
                .then(a.child_id.cmp(&b.child_id))
        });
        Ok(plans)
    }

    async fn delete_meal_plan(&self, profile_id: &str, plan_id: &str) -> Result<bool> {
        let _guard = self.connection.write_lock().await;
        let mut plans = self.read_plans(profile_id)?;
        let before = plans.len();
        plans.retain(|p| p.id != plan_id);
        if plans.len() == before {
            return Ok(false);
        }
        self.write_plans(profile_id, &plans)?;
        info!("Deleted meal plan {} for profile {}", plan_id, profile_id);
        Ok(true)
    }

    async fn delete_meal_plans_for_child(&self, profile_id: &str, child_id: &str) -> Result<u32> {
        let _guard = self.connection.write_lock().await;
        let mut plans = self.read_plans(profile_id)?;
        let before = plans.len();
        plans.retain(|p| p.child_id != child_id);
        let removed = (before - plans.len()) as u32;
        if removed > 0 {
            self.write_plans(profile_id, &plans)?;
            info!("Deleted {} meal plans of child {}", removed, child_id);
        }
        Ok(removed)
    }
}
