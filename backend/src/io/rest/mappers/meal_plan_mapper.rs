use shared::{MealPlan as SharedMealPlan, MealPlanResponse, WeekPlanDay, WeekPlanResponse};

use crate::domain::commands::meal_plan::{GetWeekResult, PlannedMeal};

pub struct MealPlanMapper;

impl MealPlanMapper {
    pub fn to_dto(planned: PlannedMeal) -> SharedMealPlan {
        let plan = planned.meal_plan;
        SharedMealPlan {
            id: plan.id,
            profile_id: plan.profile_id,
            child_id: plan.child_id,
            recipe_id: plan.recipe_id,
            date: plan.date.format("%Y-%m-%d").to_string(),
            meal_time: plan.meal_time,
            recipe_title: planned.recipe_title,
        }
    }

    pub fn to_meal_plan_response_dto(planned: PlannedMeal, message: &str) -> MealPlanResponse {
        MealPlanResponse {
            meal_plan: Self::to_dto(planned),
            success_message: message.to_string(),
        }
    }

    pub fn to_week_dto(result: GetWeekResult) -> WeekPlanResponse {
        WeekPlanResponse {
            week_start: result.week_start.format("%Y-%m-%d").to_string(),
            days: result
                .days
                .into_iter()
                .map(|day| WeekPlanDay {
                    date: day.date.format("%Y-%m-%d").to_string(),
                    meals: day.meals.into_iter().map(Self::to_dto).collect(),
                })
                .collect(),
        }
    }
}
