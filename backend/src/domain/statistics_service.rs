use anyhow::Result;
use chrono::{Duration, Local, NaiveDate};
use shared::{ChildMealCount, MealTimeCount, MealType, NutritionalInfo, RecipeUsage, StatisticsResponse};
use std::collections::HashMap;
use tracing::info;

use crate::domain::commands::statistics::GetStatisticsCommand;
use crate::domain::errors::DomainError;
use crate::domain::models::child::Child;
use crate::domain::models::leftover::Leftover;
use crate::domain::models::meal_plan::MealPlan;
use crate::domain::models::recipe::Recipe;
use crate::domain::validation::parse_date;
use crate::storage::csv::{ChildRepository, CsvConnection, LeftoverRepository, MealPlanRepository, RecipeRepository};
use crate::storage::traits::{ChildStorage, LeftoverStorage, MealPlanStorage, RecipeStorage};

pub const TOP_RECIPE_LIMIT: usize = 5;
pub const EXPIRING_SOON_DAYS: i64 = 3;

/// Service computing meal and nutrition statistics over a date window
#[derive(Clone)]
pub struct StatisticsService {
    child_repository: ChildRepository,
    recipe_repository: RecipeRepository,
    meal_plan_repository: MealPlanRepository,
    leftover_repository: LeftoverRepository,
}

impl StatisticsService {
    pub fn new(connection: CsvConnection) -> Self {
        Self {
            child_repository: ChildRepository::new(connection.clone()),
            recipe_repository: RecipeRepository::new(connection.clone()),
            meal_plan_repository: MealPlanRepository::new(connection.clone()),
            leftover_repository: LeftoverRepository::new(connection),
        }
    }

    pub async fn get_statistics(&self, command: GetStatisticsCommand) -> Result<StatisticsResponse> {
        info!(
            "Computing statistics for profile {} from {} to {}",
            command.profile_id, command.start_date, command.end_date
        );

        let start = parse_date("Start date", &command.start_date)?;
        let end = parse_date("End date", &command.end_date)?;
        if end < start {
            return Err(DomainError::validation("End date cannot be before start date").into());
        }

        let plans = self
            .meal_plan_repository
            .list_meal_plans(&command.profile_id, start, end)
            .await?;
        let children = self.child_repository.list_children(&command.profile_id).await?;
        let recipes: HashMap<String, Recipe> = self
            .recipe_repository
            .list_recipes(&command.profile_id)
            .await?
            .into_iter()
            .map(|r| (r.id.clone(), r))
            .collect();
        let leftovers = self.leftover_repository.list_leftovers(&command.profile_id).await?;

        let statistics = compute_statistics(
            &StatisticsInput {
                start,
                end,
                plans: &plans,
                children: &children,
                recipes: &recipes,
                leftovers: &leftovers,
            },
            Local::now().date_naive(),
        );
        info!("Statistics cover {} planned meals", statistics.total_meals);
        Ok(statistics)
    }
}

pub struct StatisticsInput<'a> {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub plans: &'a [MealPlan],
    pub children: &'a [Child],
    pub recipes: &'a HashMap<String, Recipe>,
    pub leftovers: &'a [Leftover],
}

/// Pure statistics over already loaded data
pub fn compute_statistics(input: &StatisticsInput<'_>, today: NaiveDate) -> StatisticsResponse {
    let days_in_window = (input.end - input.start).num_days() + 1;

    let mut per_child: HashMap<&str, usize> = HashMap::new();
    let mut per_meal_time: HashMap<MealType, usize> = HashMap::new();
    let mut per_recipe: HashMap<&str, usize> = HashMap::new();
    let mut nutrition_totals = NutritionalInfo::default();

    for plan in input.plans {
        *per_child.entry(plan.child_id.as_str()).or_insert(0) += 1;
        *per_meal_time.entry(plan.meal_time).or_insert(0) += 1;
        if let Some(recipe) = input.recipes.get(&plan.recipe_id) {
            *per_recipe.entry(recipe.id.as_str()).or_insert(0) += 1;
            nutrition_totals.add(&recipe.nutritional_info);
        }
    }

    let mut meals_per_child: Vec<ChildMealCount> = per_child
        .into_iter()
        .map(|(child_id, count)| ChildMealCount {
            child_id: child_id.to_string(),
            child_name: input
                .children
                .iter()
                .find(|c| c.id == child_id)
                .map(|c| c.name.clone())
                .unwrap_or_else(|| child_id.to_string()),
            count,
        })
        .collect();
    meals_per_child.sort_by(|a, b| {
        a.child_name
            .to_lowercase()
            .cmp(&b.child_name.to_lowercase())
            .then_with(|| a.child_id.cmp(&b.child_id))
    });

    let meals_per_meal_time = MealType::ALL
        .iter()
        .map(|meal_time| MealTimeCount {
            meal_time: *meal_time,
            count: per_meal_time.get(meal_time).copied().unwrap_or(0),
        })
        .collect();

    let mut top_recipes: Vec<RecipeUsage> = per_recipe
        .into_iter()
        .filter_map(|(recipe_id, count)| {
            input.recipes.get(recipe_id).map(|recipe| RecipeUsage {
                recipe_id: recipe.id.clone(),
                title: recipe.title.clone(),
                count,
            })
        })
        .collect();
    top_recipes.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.title.cmp(&b.title)));
    top_recipes.truncate(TOP_RECIPE_LIMIT);

    let expiring_cutoff = input.end + Duration::days(EXPIRING_SOON_DAYS);
    let leftovers_expiring_soon = input
        .leftovers
        .iter()
        .filter(|l| !l.is_expired(today) && l.expiry_date <= expiring_cutoff)
        .count();
    let leftovers_expired = input.leftovers.iter().filter(|l| l.is_expired(today)).count();

    StatisticsResponse {
        start_date: input.start.format("%Y-%m-%d").to_string(),
        end_date: input.end.format("%Y-%m-%d").to_string(),
        total_meals: input.plans.len(),
        meals_per_child,
        meals_per_meal_time,
        top_recipes,
        daily_average: nutrition_totals.divided_by(days_in_window as f64),
        nutrition_totals,
        leftovers_expiring_soon,
        leftovers_expired,
    }
}
