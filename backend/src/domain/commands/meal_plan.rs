use chrono::NaiveDate;
use shared::MealType;

use crate::domain::models::meal_plan::MealPlan;

#[derive(Debug, Clone)]
pub struct AssignMealCommand {
    pub profile_id: String,
    pub child_id: String,
    pub recipe_id: String,
    pub date: String,
    pub meal_time: MealType,
}

/// A stored plan with its recipe title joined in
#[derive(Debug, Clone, PartialEq)]
pub struct PlannedMeal {
    pub meal_plan: MealPlan,
    pub recipe_title: Option<String>,
}

#[derive(Debug, Clone)]
pub struct AssignMealResult {
    pub planned_meal: PlannedMeal,
}

#[derive(Debug, Clone)]
pub struct GetWeekCommand {
    pub profile_id: String,
    pub week_start: String,
}

#[derive(Debug, Clone)]
pub struct WeekDay {
    pub date: NaiveDate,
    pub meals: Vec<PlannedMeal>,
}

#[derive(Debug, Clone)]
pub struct GetWeekResult {
    pub week_start: NaiveDate,
    /// Always seven consecutive days
    pub days: Vec<WeekDay>,
}
