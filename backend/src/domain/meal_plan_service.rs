use anyhow::Result;
use chrono::Duration;
use std::collections::HashMap;
use tracing::info;

use crate::domain::commands::meal_plan::{
    AssignMealCommand, AssignMealResult, GetWeekCommand, GetWeekResult, PlannedMeal, WeekDay,
};
use crate::domain::errors::DomainError;
use crate::domain::models::meal_plan::MealPlan;
use crate::domain::validation::parse_date;
use crate::storage::csv::{ChildRepository, CsvConnection, MealPlanRepository, RecipeRepository};
use crate::storage::traits::{ChildStorage, MealPlanStorage, RecipeStorage};

const DAYS_PER_WEEK: i64 = 7;

/// Service for the weekly meal planner
#[derive(Clone)]
pub struct MealPlanService {
    meal_plan_repository: MealPlanRepository,
    child_repository: ChildRepository,
    recipe_repository: RecipeRepository,
}

impl MealPlanService {
    pub fn new(connection: CsvConnection) -> Self {
        Self {
            meal_plan_repository: MealPlanRepository::new(connection.clone()),
            child_repository: ChildRepository::new(connection.clone()),
            recipe_repository: RecipeRepository::new(connection),
        }
    }

    /// Assign a recipe to a child's (date, meal time) slot, replacing
    /// whatever was planned there before
    pub async fn assign_meal(&self, command: AssignMealCommand) -> Result<AssignMealResult> {
        info!(
            "Assigning recipe {} to child {} on {} ({})",
            command.recipe_id, command.child_id, command.date, command.meal_time
        );

        let date = parse_date("Date", &command.date)?;
        self.child_repository
            .get_child(&command.profile_id, &command.child_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Child", &command.child_id))?;
        let recipe = self
            .recipe_repository
            .get_recipe(&command.profile_id, &command.recipe_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Recipe", &command.recipe_id))?;

        let plan = MealPlan {
            id: MealPlan::generate_id(),
            profile_id: command.profile_id,
            child_id: command.child_id,
            recipe_id: command.recipe_id,
            date,
            meal_time: command.meal_time,
        };
        let stored = self.meal_plan_repository.upsert_meal_plan(&plan).await?;

        info!("Stored meal plan {}", stored.id);
        Ok(AssignMealResult {
            planned_meal: PlannedMeal {
                meal_plan: stored,
                recipe_title: Some(recipe.title),
            },
        })
    }

    /// The seven days starting at `week_start` with their planned meals
    pub async fn get_week(&self, command: GetWeekCommand) -> Result<GetWeekResult> {
        info!("Getting week starting {} for profile {}", command.week_start, command.profile_id);

        let week_start = parse_date("Week start", &command.week_start)?;
        let week_end = week_start + Duration::days(DAYS_PER_WEEK - 1);

        let plans = self
            .meal_plan_repository
            .list_meal_plans(&command.profile_id, week_start, week_end)
            .await?;
        let titles: HashMap<String, String> = self
            .recipe_repository
            .list_recipes(&command.profile_id)
            .await?
            .into_iter()
            .map(|r| (r.id, r.title))
            .collect();

        let mut days: Vec<WeekDay> = (0..DAYS_PER_WEEK)
            .map(|offset| WeekDay {
                date: week_start + Duration::days(offset),
                meals: Vec::new(),
            })
            .collect();
        for plan in plans {
            let index = (plan.date - week_start).num_days() as usize;
            let recipe_title = titles.get(&plan.recipe_id).cloned();
            if let Some(day) = days.get_mut(index) {
                day.meals.push(PlannedMeal {
                    meal_plan: plan,
                    recipe_title,
                });
            }
        }

        Ok(GetWeekResult { week_start, days })
    }

    pub async fn remove_meal(&self, profile_id: &str, plan_id: &str) -> Result<()> {
        info!("Removing meal plan {}", plan_id);
        if !self.meal_plan_repository.delete_meal_plan(profile_id, plan_id).await? {
            return Err(DomainError::not_found("Meal plan", plan_id).into());
        }
        Ok(())
    }
}
